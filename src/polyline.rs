//! Route geometry as decoded coordinates.
//!
//! Geometry only matters for display. The planner itself works on stop
//! sequences; a polyline is either road geometry from a routing service or
//! the straight-line path through the stops.

use serde::{Deserialize, Serialize};

use crate::haversine::{path_length_km, GreatCircle};

/// A polyline of (latitude, longitude) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Builds a polyline from GeoJSON positions, which are `[lng, lat]`.
    pub fn from_geojson(coordinates: &[[f64; 2]]) -> Self {
        Self {
            points: coordinates.iter().map(|&[lng, lat]| (lat, lng)).collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Great-circle length along the polyline.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.points, &GreatCircle)
    }
}
