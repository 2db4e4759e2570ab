//! Cluster rebalancing.
//!
//! A fixed number of passes. In each pass every cluster whose need exceeds
//! its supply and which holds more than one recipient hands exactly one
//! recipient to the cluster with the nearest centroid. Deficits are not
//! guaranteed to be resolved.

use serde::Deserialize;
use tracing::debug;

use crate::haversine::haversine_km;

/// Which recipient a deficient cluster gives away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSelection {
    /// Smallest adjusted need, ties broken by input position.
    #[default]
    SmallestNeed,
    /// First recipient in the cluster's current membership order.
    InputOrder,
}

/// Members and aggregates of one cluster. Members are input positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterMembers {
    pub donors: Vec<usize>,
    pub recipients: Vec<usize>,
    pub supply: f64,
    pub need: u64,
}

impl ClusterMembers {
    /// Supply minus need. Negative means the cluster is deficient.
    pub fn excess(&self) -> f64 {
        self.supply - self.need as f64
    }

    /// No donors and no recipients.
    pub fn is_empty(&self) -> bool {
        self.donors.is_empty() && self.recipients.is_empty()
    }
}

/// Cluster memberships plus the centroids they were clustered around.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterState {
    pub clusters: Vec<ClusterMembers>,
    pub centroids: Vec<(f64, f64)>,
}

impl ClusterState {
    /// Builds the state from per-entity cluster labels.
    ///
    /// `supplies` and `needs` are indexed like the donor and recipient labels.
    pub fn from_labels(
        donor_labels: &[usize],
        recipient_labels: &[usize],
        supplies: &[f64],
        needs: &[u32],
        centroids: Vec<(f64, f64)>,
    ) -> Self {
        let mut clusters = vec![ClusterMembers::default(); centroids.len()];

        for (donor, &label) in donor_labels.iter().enumerate() {
            let cluster = &mut clusters[label];
            cluster.donors.push(donor);
            cluster.supply += supplies[donor];
        }
        for (recipient, &label) in recipient_labels.iter().enumerate() {
            let cluster = &mut clusters[label];
            cluster.recipients.push(recipient);
            cluster.need += needs[recipient] as u64;
        }

        Self { clusters, centroids }
    }

    /// Recipients across all clusters.
    pub fn recipient_count(&self) -> usize {
        self.clusters.iter().map(|cluster| cluster.recipients.len()).sum()
    }

    /// Cluster label per recipient input position.
    pub fn recipient_labels(&self, recipient_count: usize) -> Vec<Option<usize>> {
        let mut labels = vec![None; recipient_count];
        for (index, cluster) in self.clusters.iter().enumerate() {
            for &recipient in &cluster.recipients {
                labels[recipient] = Some(index);
            }
        }
        labels
    }
}

/// Recipient attributes the rebalancer reads, indexed by input position.
#[derive(Debug, Clone, Copy)]
pub struct RecipientTable<'a> {
    pub locations: &'a [(f64, f64)],
    pub needs: &'a [u32],
}

/// A recipient handed from one cluster to another during `pass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub recipient: usize,
    pub from: usize,
    pub to: usize,
    pub pass: usize,
}

/// Runs `passes` rebalancing passes, threading the state through each.
pub fn rebalance(
    state: ClusterState,
    table: RecipientTable<'_>,
    passes: usize,
    selection: MoveSelection,
) -> (ClusterState, Vec<Relocation>) {
    let mut relocations = Vec::new();
    let mut state = state;

    for pass in 0..passes {
        let (next, moved) = rebalance_pass(state, table, selection, pass);
        state = next;
        if moved.is_empty() {
            debug!(pass, "rebalancing made no moves");
        }
        relocations.extend(moved);
    }

    (state, relocations)
}

/// One rebalancing pass over clusters in ascending index order.
///
/// A recipient moved into a later cluster may be moved again when that
/// cluster is visited in the same pass.
pub fn rebalance_pass(
    mut state: ClusterState,
    table: RecipientTable<'_>,
    selection: MoveSelection,
    pass: usize,
) -> (ClusterState, Vec<Relocation>) {
    let mut moved = Vec::new();

    for from in 0..state.clusters.len() {
        let cluster = &state.clusters[from];
        if cluster.excess() >= 0.0 || cluster.recipients.len() <= 1 {
            continue;
        }

        let Some(position) = select_recipient(&cluster.recipients, table.needs, selection) else {
            continue;
        };
        let recipient = cluster.recipients[position];

        let Some(to) = nearest_other_centroid(table.locations[recipient], &state.centroids, from) else {
            continue;
        };

        let need = table.needs[recipient] as u64;
        let source = &mut state.clusters[from];
        source.recipients.remove(position);
        source.need -= need;

        let target = &mut state.clusters[to];
        target.recipients.push(recipient);
        target.need += need;

        debug!(recipient, from, to, pass, need, "relocated recipient");
        moved.push(Relocation {
            recipient,
            from,
            to,
            pass,
        });
    }

    (state, moved)
}

/// Position within `members` of the recipient to hand away.
fn select_recipient(members: &[usize], needs: &[u32], selection: MoveSelection) -> Option<usize> {
    match selection {
        MoveSelection::InputOrder => (!members.is_empty()).then_some(0),
        MoveSelection::SmallestNeed => members
            .iter()
            .enumerate()
            .min_by_key(|&(_, &recipient)| (needs[recipient], recipient))
            .map(|(position, _)| position),
    }
}

/// Nearest centroid other than `exclude`; ties go to the lowest index.
fn nearest_other_centroid(point: (f64, f64), centroids: &[(f64, f64)], exclude: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &centroid) in centroids.iter().enumerate() {
        if index == exclude {
            continue;
        }
        let dist = haversine_km(point, centroid);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((index, dist));
        }
    }
    best.map(|(index, _)| index)
}
