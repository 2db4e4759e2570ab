//! Core domain traits for the relief planner.
//!
//! These are intentionally minimal. Host applications implement them for
//! their own record types; `crate::records` provides plain implementations.

use std::fmt::Debug;
use std::hash::Hash;

use crate::cluster::Partition;
use crate::error::GeometryError;
use crate::polyline::Polyline;

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Debug {}

/// An NGO offering surplus food at a fixed location.
pub trait Donor {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Location coordinates (lat, lng).
    fn location(&self) -> (f64, f64);

    /// Food units available for pickup.
    fn food_availability(&self) -> f64;
}

/// A destination with people in need of food.
pub trait Recipient {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Location coordinates (lat, lng).
    fn location(&self) -> (f64, f64);

    fn people_in_need(&self) -> u32;
}

/// A volunteer performing pickups and drop-offs.
pub trait Volunteer {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Start location (lat, lng).
    fn start_location(&self) -> (f64, f64);

    /// Informational only, routing ignores it.
    fn vehicle_type(&self) -> &str;
}

/// Scalar travel cost between two (lat, lng) points.
pub trait DistanceModel {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}

/// Partitions points into exactly `k` groups.
///
/// Implementations must be deterministic: identical input yields an
/// identical partition. The result holds one label per point, each below
/// `k`, and exactly `k` centroids; `plan` rejects anything else with
/// `PlannerError::PartitionShape` or `PlannerError::PartitionLabel`.
pub trait Partitioner {
    fn partition(&self, points: &[(f64, f64)], k: usize) -> Partition;
}

/// External routing service used only to render routes.
pub trait RouteGeometryProvider {
    /// Road geometry through the given (lat, lng) waypoints, in order.
    fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Result<Polyline, GeometryError>;

    /// Nearest routable point within `radius_m` meters.
    fn nearest(&self, point: (f64, f64), radius_m: f64) -> Result<(f64, f64), GeometryError>;
}
