//! Relief planning run: normalize, cluster, rebalance, route.
//!
//! Every run recomputes from its inputs. Nothing is cached between runs.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::cluster::{KMeans, KMeansConfig, Partition};
use crate::error::{Entity, PlannerError};
use crate::haversine::GreatCircle;
use crate::normalize::normalize_need;
use crate::rebalance::{rebalance, ClusterState, MoveSelection, RecipientTable, Relocation};
use crate::route::{build_route, RouteStop, Waypoint};
use crate::traits::{DistanceModel, Donor, Id, Partitioner, Recipient, Volunteer};

/// Tunables for a planning run. Defaults match `optimize`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanOptions {
    pub clustering: KMeansConfig,
    /// Fixed number of rebalancing passes.
    pub rebalance_passes: usize,
    pub move_selection: MoveSelection,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            clustering: KMeansConfig::default(),
            rebalance_passes: 3,
            move_selection: MoveSelection::SmallestNeed,
        }
    }
}

/// One volunteer's ordered stops and the records behind them.
#[derive(Debug, Clone)]
pub struct VolunteerRoute<VolunteerId, DonorId, RecipientId> {
    pub volunteer_id: VolunteerId,
    pub cluster: usize,
    pub stops: Vec<RouteStop>,
    /// Donors in pickup order.
    pub donor_ids: Vec<DonorId>,
    /// Recipients in drop-off order.
    pub recipient_ids: Vec<RecipientId>,
    pub total_distance_km: f64,
}

/// Informational findings that do not fail a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The volunteer's cluster has no donors and no recipients.
    DegenerateCluster { cluster: usize },
}

/// A volunteer whose cluster ended up empty.
#[derive(Debug, Clone)]
pub struct IdleVolunteer<VolunteerId> {
    pub volunteer_id: VolunteerId,
    pub advisory: Advisory,
}

#[derive(Debug, Clone)]
pub struct RecipientAssignment<RecipientId, VolunteerId> {
    pub recipient_id: RecipientId,
    pub volunteer_id: VolunteerId,
    pub people_in_need: u32,
    pub adjusted_need: u32,
}

#[derive(Debug, Clone)]
pub struct DonorAssignment<DonorId, VolunteerId> {
    pub donor_id: DonorId,
    pub volunteer_id: VolunteerId,
}

/// Totals for one cluster after rebalancing.
#[derive(Debug, Clone)]
pub struct ClusterSummary<VolunteerId> {
    pub cluster: usize,
    pub volunteer_id: VolunteerId,
    pub centroid: (f64, f64),
    pub supply: f64,
    pub need: u64,
    pub donors: usize,
    pub recipients: usize,
}

impl<VolunteerId> ClusterSummary<VolunteerId> {
    /// Supply minus adjusted need. Negative for a deficient cluster.
    pub fn excess(&self) -> f64 {
        self.supply - self.need as f64
    }
}

#[derive(Debug, Clone)]
pub struct PlanResult<VolunteerId, DonorId, RecipientId> {
    /// One entry per volunteer with something to do, in volunteer order.
    pub routes: Vec<VolunteerRoute<VolunteerId, DonorId, RecipientId>>,
    pub idle: Vec<IdleVolunteer<VolunteerId>>,
    pub donors: Vec<DonorAssignment<DonorId, VolunteerId>>,
    pub recipients: Vec<RecipientAssignment<RecipientId, VolunteerId>>,
    pub clusters: Vec<ClusterSummary<VolunteerId>>,
    pub relocations: Vec<Relocation>,
}

impl<VolunteerId: Id, DonorId, RecipientId> PlanResult<VolunteerId, DonorId, RecipientId> {
    /// Ordered stops per volunteer. Idle volunteers are absent.
    pub fn routes_by_volunteer(&self) -> HashMap<&VolunteerId, &[RouteStop]> {
        self.routes
            .iter()
            .map(|route| (&route.volunteer_id, route.stops.as_slice()))
            .collect()
    }

    /// The route assigned to `volunteer_id`, if the volunteer is not idle.
    pub fn route_for(&self, volunteer_id: &VolunteerId) -> Option<&VolunteerRoute<VolunteerId, DonorId, RecipientId>> {
        self.routes.iter().find(|route| &route.volunteer_id == volunteer_id)
    }
}

type Plan<D, R, V> = PlanResult<<V as Volunteer>::Id, <D as Donor>::Id, <R as Recipient>::Id>;

/// Plans routes with the default k-means partitioner and great-circle distances.
pub fn optimize<D, R, V>(donors: &[D], recipients: &[R], volunteers: &[V]) -> Result<Plan<D, R, V>, PlannerError>
where
    D: Donor,
    R: Recipient,
    V: Volunteer,
{
    let options = PlanOptions::default();
    let partitioner = KMeans::new(options.clustering.clone());
    plan(donors, recipients, volunteers, &partitioner, &GreatCircle, &options)
}

/// Plans routes with an injected partitioner and distance model.
///
/// Validates the records, scales need to supply, partitions donors and
/// recipients into one cluster per volunteer, rebalances, then builds one
/// greedy route per non-empty cluster.
#[instrument(
    level = "info",
    skip_all,
    fields(donors = donors.len(), recipients = recipients.len(), volunteers = volunteers.len())
)]
pub fn plan<D, R, V, P, M>(
    donors: &[D],
    recipients: &[R],
    volunteers: &[V],
    partitioner: &P,
    distance: &M,
    options: &PlanOptions,
) -> Result<Plan<D, R, V>, PlannerError>
where
    D: Donor,
    R: Recipient,
    V: Volunteer,
    P: Partitioner,
    M: DistanceModel,
{
    validate(donors, recipients, volunteers)?;

    let normalized = normalize_need(donors, recipients)?;
    info!(
        total_supply = normalized.total_supply,
        total_need = normalized.total_need,
        scaled = normalized.scale.is_some(),
        "normalized recipient need"
    );

    let k = volunteers.len();
    let points: Vec<(f64, f64)> = donors
        .iter()
        .map(|donor| donor.location())
        .chain(recipients.iter().map(|recipient| recipient.location()))
        .collect();
    let partition = partitioner.partition(&points, k);
    check_partition(&partition, points.len(), k)?;
    let (donor_labels, recipient_labels) = partition.labels.split_at(donors.len());

    let supplies: Vec<f64> = donors.iter().map(|donor| donor.food_availability()).collect();
    let recipient_locations: Vec<(f64, f64)> = recipients.iter().map(|r| r.location()).collect();
    let state = ClusterState::from_labels(
        donor_labels,
        recipient_labels,
        &supplies,
        &normalized.adjusted,
        partition.centroids,
    );

    let table = RecipientTable {
        locations: &recipient_locations,
        needs: &normalized.adjusted,
    };
    let (state, relocations) = rebalance(state, table, options.rebalance_passes, options.move_selection);
    debug!(moves = relocations.len(), "rebalanced clusters");

    let mut routes = Vec::new();
    let mut idle = Vec::new();
    let mut clusters = Vec::with_capacity(k);
    let mut donor_volunteer: Vec<Option<&V::Id>> = vec![None; donors.len()];
    let mut recipient_volunteer: Vec<Option<&V::Id>> = vec![None; recipients.len()];

    // Cluster i is served by volunteer i.
    for (index, (volunteer, members)) in volunteers.iter().zip(&state.clusters).enumerate() {
        for &donor in &members.donors {
            donor_volunteer[donor] = Some(volunteer.id());
        }
        for &recipient in &members.recipients {
            recipient_volunteer[recipient] = Some(volunteer.id());
        }

        clusters.push(ClusterSummary {
            cluster: index,
            volunteer_id: volunteer.id().clone(),
            centroid: state.centroids[index],
            supply: members.supply,
            need: members.need,
            donors: members.donors.len(),
            recipients: members.recipients.len(),
        });

        let pickups: Vec<Waypoint> = members
            .donors
            .iter()
            .map(|&d| Waypoint {
                location: donors[d].location(),
                quantity: donors[d].food_availability(),
            })
            .collect();
        let dropoffs: Vec<Waypoint> = members
            .recipients
            .iter()
            .map(|&r| Waypoint {
                location: recipients[r].location(),
                quantity: normalized.adjusted[r] as f64,
            })
            .collect();

        match build_route(volunteer.start_location(), &pickups, &dropoffs, distance) {
            Some(built) => {
                debug!(
                    volunteer = ?volunteer.id(),
                    stops = built.stops.len(),
                    distance_km = built.total_distance_km,
                    "built route"
                );
                routes.push(VolunteerRoute {
                    volunteer_id: volunteer.id().clone(),
                    cluster: index,
                    donor_ids: built
                        .pickup_order
                        .iter()
                        .map(|&i| donors[members.donors[i]].id().clone())
                        .collect(),
                    recipient_ids: built
                        .dropoff_order
                        .iter()
                        .map(|&i| recipients[members.recipients[i]].id().clone())
                        .collect(),
                    stops: built.stops,
                    total_distance_km: built.total_distance_km,
                });
            }
            None => {
                warn!(volunteer = ?volunteer.id(), cluster = index, "cluster is empty, volunteer is idle");
                idle.push(IdleVolunteer {
                    volunteer_id: volunteer.id().clone(),
                    advisory: Advisory::DegenerateCluster { cluster: index },
                });
            }
        }
    }

    let donor_assignments = donors
        .iter()
        .zip(donor_volunteer)
        .filter_map(|(donor, volunteer_id)| {
            volunteer_id.map(|volunteer_id| DonorAssignment {
                donor_id: donor.id().clone(),
                volunteer_id: volunteer_id.clone(),
            })
        })
        .collect();

    let recipient_assignments = recipients
        .iter()
        .zip(recipient_volunteer)
        .zip(&normalized.adjusted)
        .filter_map(|((recipient, volunteer_id), &adjusted_need)| {
            volunteer_id.map(|volunteer_id| RecipientAssignment {
                recipient_id: recipient.id().clone(),
                volunteer_id: volunteer_id.clone(),
                people_in_need: recipient.people_in_need(),
                adjusted_need,
            })
        })
        .collect();

    info!(routes = routes.len(), idle = idle.len(), "planning run finished");

    Ok(PlanResult {
        routes,
        idle,
        donors: donor_assignments,
        recipients: recipient_assignments,
        clusters,
        relocations,
    })
}

/// Rejects inputs the run cannot plan for. Checks run in a fixed order so the
/// reported failure is stable.
fn validate<D, R, V>(donors: &[D], recipients: &[R], volunteers: &[V]) -> Result<(), PlannerError>
where
    D: Donor,
    R: Recipient,
    V: Volunteer,
{
    if volunteers.is_empty() {
        return Err(PlannerError::NoVolunteers);
    }

    for donor in donors {
        check_coordinate(Entity::Donor, donor.id(), donor.location())?;
        let value = donor.food_availability();
        if !value.is_finite() || value < 0.0 {
            return Err(PlannerError::InvalidQuantity {
                id: format!("{:?}", donor.id()),
                value,
            });
        }
    }
    for recipient in recipients {
        check_coordinate(Entity::Recipient, recipient.id(), recipient.location())?;
    }
    for volunteer in volunteers {
        check_coordinate(Entity::Volunteer, volunteer.id(), volunteer.start_location())?;
    }

    check_unique(Entity::Donor, donors.iter().map(|d| d.id()))?;
    check_unique(Entity::Recipient, recipients.iter().map(|r| r.id()))?;
    check_unique(Entity::Volunteer, volunteers.iter().map(|v| v.id()))?;

    Ok(())
}

fn check_partition(partition: &Partition, points: usize, clusters: usize) -> Result<(), PlannerError> {
    if partition.labels.len() != points || partition.centroids.len() != clusters {
        return Err(PlannerError::PartitionShape {
            points,
            clusters,
            labels: partition.labels.len(),
            centroids: partition.centroids.len(),
        });
    }
    if let Some((point, &label)) = partition.labels.iter().enumerate().find(|&(_, &label)| label >= clusters) {
        return Err(PlannerError::PartitionLabel { point, label, clusters });
    }
    Ok(())
}

fn check_coordinate<I: Id>(entity: Entity, id: &I, (latitude, longitude): (f64, f64)) -> Result<(), PlannerError> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if valid {
        Ok(())
    } else {
        Err(PlannerError::InvalidCoordinate {
            entity,
            id: format!("{:?}", id),
            latitude,
            longitude,
        })
    }
}

fn check_unique<'a, I: Id + 'a>(entity: Entity, ids: impl Iterator<Item = &'a I>) -> Result<(), PlannerError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PlannerError::DuplicateId {
                entity,
                id: format!("{:?}", id),
            });
        }
    }
    Ok(())
}
