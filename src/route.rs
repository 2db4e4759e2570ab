//! Greedy nearest-neighbor route construction.
//!
//! A route starts at the volunteer's location, visits every pickup in
//! nearest-first order, then continues from the last pickup through every
//! drop-off in nearest-first order. Each step scans all remaining points,
//! so a leg of `n` points costs O(n²).

use serde::{Deserialize, Serialize};

use crate::haversine::path_length_km;
use crate::traits::DistanceModel;

/// Role of a point within a volunteer's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRole {
    Start,
    Pickup,
    Dropoff,
    Transit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// (lat, lng)
    pub location: (f64, f64),
    pub role: StopRole,
    /// Units picked up or dropped off at this stop.
    pub quantity: Option<f64>,
}

impl RouteStop {
    pub fn start(location: (f64, f64)) -> Self {
        Self {
            location,
            role: StopRole::Start,
            quantity: None,
        }
    }
}

/// A point to be visited, carrying the quantity handled there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub location: (f64, f64),
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRoute {
    pub stops: Vec<RouteStop>,
    /// Positions into the pickup slice, in visiting order.
    pub pickup_order: Vec<usize>,
    /// Positions into the drop-off slice, in visiting order.
    pub dropoff_order: Vec<usize>,
    pub total_distance_km: f64,
}

impl BuiltRoute {
    pub fn locations(&self) -> Vec<(f64, f64)> {
        self.stops.iter().map(|stop| stop.location).collect()
    }
}

/// Visiting order over `points` starting from `start`.
///
/// Always moves to the nearest unvisited point; ties go to the earliest input.
pub fn greedy_order<M: DistanceModel>(start: (f64, f64), points: &[(f64, f64)], model: &M) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut order = Vec::with_capacity(points.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (slot, &candidate) in remaining.iter().enumerate() {
            let dist = model.distance_km(current, points[candidate]);
            if dist < best_dist {
                best_dist = dist;
                best = slot;
            }
        }

        let next = remaining.remove(best);
        current = points[next];
        order.push(next);
    }

    order
}

/// Builds the pickup-then-drop-off route. `None` when there is nothing to visit.
pub fn build_route<M: DistanceModel>(
    start: (f64, f64),
    pickups: &[Waypoint],
    dropoffs: &[Waypoint],
    model: &M,
) -> Option<BuiltRoute> {
    if pickups.is_empty() && dropoffs.is_empty() {
        return None;
    }

    let mut stops = Vec::with_capacity(1 + pickups.len() + dropoffs.len());
    stops.push(RouteStop::start(start));

    let pickup_locations: Vec<(f64, f64)> = pickups.iter().map(|p| p.location).collect();
    let pickup_order = greedy_order(start, &pickup_locations, model);
    stops.extend(pickup_order.iter().map(|&i| RouteStop {
        location: pickups[i].location,
        role: StopRole::Pickup,
        quantity: Some(pickups[i].quantity),
    }));

    // The drop-off leg begins where the pickup leg ends; that reference
    // point is already on the route and is not repeated.
    let terminus = stops.last().map_or(start, |stop| stop.location);
    let dropoff_locations: Vec<(f64, f64)> = dropoffs.iter().map(|d| d.location).collect();
    let dropoff_order = greedy_order(terminus, &dropoff_locations, model);
    stops.extend(dropoff_order.iter().map(|&i| RouteStop {
        location: dropoffs[i].location,
        role: StopRole::Dropoff,
        quantity: Some(dropoffs[i].quantity),
    }));

    let locations: Vec<(f64, f64)> = stops.iter().map(|stop| stop.location).collect();
    let total_distance_km = path_length_km(&locations, model);

    Some(BuiltRoute {
        stops,
        pickup_order,
        dropoff_order,
        total_distance_km,
    })
}
