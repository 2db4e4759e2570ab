//! Great-circle distance model.
//!
//! Used as the cost metric for clustering, rebalancing and route building.
//! Ignores roads; road geometry is a presentation concern.

use crate::traits::DistanceModel;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` marginally above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based distance model.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceModel for GreatCircle {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        haversine_km(from, to)
    }
}

/// Total length of a path through `points`, in kilometers.
pub fn path_length_km<M: DistanceModel>(points: &[(f64, f64)], model: &M) -> f64 {
    points
        .windows(2)
        .map(|leg| model.distance_km(leg[0], leg[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_km((18.52, 73.85), (18.52, 73.85));
        assert_eq!(dist, 0.0, "Same point should have zero distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Pune (18.52, 73.86) to Mumbai (19.08, 72.88)
        // Straight-line distance ~120 km
        let dist = haversine_km((18.52, 73.86), (19.08, 72.88));
        assert!(dist > 110.0 && dist < 130.0, "Pune to Mumbai should be ~120km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = (12.97, 77.59);
        let b = (13.08, 80.27);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let dist = GreatCircle.distance_km((0.0, 0.0), (0.0, 1.0));
        assert!((dist - 111.19).abs() < 0.01, "got {}", dist);
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let dist = haversine_km((0.0, 0.0), (0.0, 180.0));
        assert!(dist.is_finite());
        assert!((dist - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_path_length_sums_legs() {
        let points = [(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)];
        let total = path_length_km(&points, &GreatCircle);
        let leg = haversine_km((0.0, 0.0), (0.0, 1.0));
        assert!((total - 2.0 * leg).abs() < 1e-9);
        assert_eq!(path_length_km(&points[..1], &GreatCircle), 0.0);
    }
}
