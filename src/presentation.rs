//! Route presentation: turns planned stops into displayable geometry.
//!
//! Everything here is downstream of the planner. Routing service failures
//! degrade to straight-line geometry and never touch the computed plan.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::polyline::Polyline;
use crate::route::{RouteStop, StopRole};
use crate::traits::RouteGeometryProvider;

const PALETTE: [&str; 15] = [
    "#FF5733", "#33FF57", "#3357FF", "#F39C12", "#9B59B6", "#1ABC9C", "#E74C3C", "#8E44AD", "#2ECC71",
    "#3498DB", "#E67E22", "#16A085", "#2980B9", "#D35400", "#C0392B",
];

/// Display colour for the route at `index`. Stable across runs, builds and
/// platforms: past the palette the colour is a fixed bit mix of the index.
pub fn route_color(index: usize) -> String {
    if let Some(color) = PALETTE.get(index) {
        return (*color).to_string();
    }
    format!("#{:06X}", mix_index(index as u64) & 0xFF_FFFF)
}

// splitmix64 finalizer.
fn mix_index(index: u64) -> u64 {
    let mut z = index.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Assigns roles to a bare coordinate sequence by matching known locations.
///
/// Donor matches win over recipient matches. Unmatched points are the start
/// at position 0 and transit elsewhere.
pub fn classify_stops(
    points: &[(f64, f64)],
    donor_locations: &[(f64, f64)],
    recipient_locations: &[(f64, f64)],
) -> Vec<StopRole> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if donor_locations.contains(point) {
                StopRole::Pickup
            } else if recipient_locations.contains(point) {
                StopRole::Dropoff
            } else if i == 0 {
                StopRole::Start
            } else {
                StopRole::Transit
            }
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Attempts with a radius growing by `base_radius_m` each time.
    pub max_retries: usize,
    pub base_radius_m: f64,
    /// Single wide attempt after the expanding retries.
    pub fallback_radius_m: f64,
    /// Attempts at randomly jittered positions around the point.
    pub jitter_attempts: usize,
    /// Half-width of the jitter box in degrees. Values outside `(0, 180]`,
    /// NaN included, disable jitter.
    pub jitter_degrees: f64,
    pub seed: u64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_radius_m: 350.0,
            fallback_radius_m: 1000.0,
            jitter_attempts: 5,
            jitter_degrees: 0.0005,
            seed: 7,
        }
    }
}

/// Snaps `point` to the road network, or returns it unchanged.
pub fn snap_point<P, G>(provider: &P, point: (f64, f64), config: &SnapConfig, rng: &mut G) -> (f64, f64)
where
    P: RouteGeometryProvider,
    G: Rng,
{
    for attempt in 1..=config.max_retries {
        let radius = config.base_radius_m * attempt as f64;
        match provider.nearest(point, radius) {
            Ok(snapped) => return snapped,
            Err(err) => debug!(?point, radius, %err, "snap attempt failed"),
        }
    }

    if let Ok(snapped) = provider.nearest(point, config.fallback_radius_m) {
        return snapped;
    }

    let spread = config.jitter_degrees;
    if !(spread > 0.0 && spread <= 180.0) {
        warn!(?point, spread, "failed to snap point, jitter disabled, keeping original coordinate");
        return point;
    }

    for _ in 0..config.jitter_attempts {
        let jittered = (
            point.0 + rng.gen_range(-spread..=spread),
            point.1 + rng.gen_range(-spread..=spread),
        );
        if let Ok(snapped) = provider.nearest(jittered, config.base_radius_m) {
            return snapped;
        }
    }

    warn!(?point, "failed to snap point, keeping original coordinate");
    point
}

/// Where a rendered route's geometry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    Road,
    StraightLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub location: (f64, f64),
    pub role: StopRole,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRoute {
    pub geometry: Polyline,
    pub source: GeometrySource,
    pub markers: Vec<Marker>,
    pub color: String,
}

pub fn marker_label(stop: &RouteStop) -> String {
    match (stop.role, stop.quantity) {
        (StopRole::Pickup, Some(units)) => format!("Pickup: {} units", units),
        (StopRole::Dropoff, Some(units)) => format!("Drop-off: {} units", units),
        (StopRole::Pickup, None) => "Pickup".to_string(),
        (StopRole::Dropoff, None) => "Drop-off".to_string(),
        (StopRole::Start, _) => "Start".to_string(),
        (StopRole::Transit, _) => "Transit".to_string(),
    }
}

pub struct RouteRenderer<P> {
    provider: P,
    snap: Option<SnapConfig>,
}

impl<P: RouteGeometryProvider> RouteRenderer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, snap: None }
    }

    /// Snap stops to the road network before requesting geometry.
    pub fn with_snapping(mut self, config: SnapConfig) -> Self {
        self.snap = Some(config);
        self
    }

    /// Renders one route. Never fails: geometry errors fall back to the
    /// straight line through the stops.
    pub fn render(&self, index: usize, stops: &[RouteStop]) -> RenderedRoute {
        let locations: Vec<(f64, f64)> = stops.iter().map(|stop| stop.location).collect();

        let waypoints = match &self.snap {
            Some(config) => {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
                locations
                    .iter()
                    .map(|&point| snap_point(&self.provider, point, config, &mut rng))
                    .collect()
            }
            None => locations.clone(),
        };

        let (geometry, source) = match self.provider.route_geometry(&waypoints) {
            Ok(geometry) if !geometry.is_empty() => (geometry, GeometrySource::Road),
            Ok(_) => {
                warn!(route = index, "routing service returned empty geometry, drawing straight lines");
                (Polyline::new(locations), GeometrySource::StraightLine)
            }
            Err(err) => {
                warn!(route = index, %err, "routing service failed, drawing straight lines");
                (Polyline::new(locations), GeometrySource::StraightLine)
            }
        };

        let markers = stops
            .iter()
            .map(|stop| Marker {
                location: stop.location,
                role: stop.role,
                label: marker_label(stop),
            })
            .collect();

        RenderedRoute {
            geometry,
            source,
            markers,
            color: route_color(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::GeometryError;

    /// Provider that fails a fixed number of nearest calls, then succeeds.
    struct FlakyProvider {
        failures: Cell<usize>,
        route_ok: bool,
    }

    impl RouteGeometryProvider for FlakyProvider {
        fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Result<Polyline, GeometryError> {
            if self.route_ok {
                let mut points = waypoints.to_vec();
                points.insert(1, (9.0, 9.0));
                Ok(Polyline::new(points))
            } else {
                Err(GeometryError::EmptyResponse)
            }
        }

        fn nearest(&self, point: (f64, f64), _radius_m: f64) -> Result<(f64, f64), GeometryError> {
            let remaining = self.failures.get();
            if remaining > 0 {
                self.failures.set(remaining - 1);
                Err(GeometryError::EmptyResponse)
            } else {
                Ok((point.0 + 1.0, point.1))
            }
        }
    }

    fn stops() -> Vec<RouteStop> {
        vec![
            RouteStop::start((0.0, 0.0)),
            RouteStop {
                location: (0.0, 1.0),
                role: StopRole::Pickup,
                quantity: Some(100.0),
            },
            RouteStop {
                location: (0.0, 2.0),
                role: StopRole::Dropoff,
                quantity: Some(40.0),
            },
        ]
    }

    #[test]
    fn test_palette_then_fixed_mixed_colors() {
        assert_eq!(route_color(0), "#FF5733");
        assert_eq!(route_color(14), "#C0392B");
        // Pinned values: these must not change between builds or platforms.
        assert_eq!(route_color(15), "#F55005");
        assert_eq!(route_color(16), "#779207");
        assert_eq!(route_color(1000), "#CCC148");
    }

    #[test]
    fn test_classify_stops() {
        let points = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        let roles = classify_stops(&points, &[(1.0, 1.0)], &[(2.0, 2.0)]);
        assert_eq!(roles, vec![StopRole::Start, StopRole::Pickup, StopRole::Dropoff, StopRole::Transit]);
    }

    #[test]
    fn test_start_on_donor_location_is_pickup() {
        let roles = classify_stops(&[(1.0, 1.0)], &[(1.0, 1.0)], &[]);
        assert_eq!(roles, vec![StopRole::Pickup]);
    }

    #[test]
    fn test_snap_retries_with_expanding_radius() {
        let provider = FlakyProvider {
            failures: Cell::new(3),
            route_ok: true,
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let snapped = snap_point(&provider, (10.0, 20.0), &SnapConfig::default(), &mut rng);
        assert_eq!(snapped, (11.0, 20.0));
        assert_eq!(provider.failures.get(), 0);
    }

    #[test]
    fn test_snap_gives_up_and_keeps_point() {
        let provider = FlakyProvider {
            failures: Cell::new(usize::MAX),
            route_ok: true,
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let snapped = snap_point(&provider, (10.0, 20.0), &SnapConfig::default(), &mut rng);
        assert_eq!(snapped, (10.0, 20.0));
        // 5 expanding + 1 wide + 5 jittered attempts
        assert_eq!(provider.failures.get(), usize::MAX - 11);
    }

    fn never_snaps() -> FlakyProvider {
        FlakyProvider {
            failures: Cell::new(usize::MAX),
            route_ok: true,
        }
    }

    #[test]
    fn test_negative_jitter_keeps_point() {
        let provider = never_snaps();
        let config = SnapConfig {
            jitter_degrees: -0.001,
            ..SnapConfig::default()
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let snapped = snap_point(&provider, (10.0, 20.0), &config, &mut rng);
        assert_eq!(snapped, (10.0, 20.0));
        // 5 expanding + 1 wide, no jittered attempts
        assert_eq!(provider.failures.get(), usize::MAX - 6);
    }

    #[test]
    fn test_out_of_range_jitter_keeps_point() {
        for spread in [f64::NAN, f64::INFINITY, f64::MAX, 0.0] {
            let provider = never_snaps();
            let config = SnapConfig {
                jitter_degrees: spread,
                ..SnapConfig::default()
            };
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
            assert_eq!(snap_point(&provider, (10.0, 20.0), &config, &mut rng), (10.0, 20.0));
        }
    }

    #[test]
    fn test_render_with_negative_jitter_falls_back() {
        let renderer = RouteRenderer::new(FlakyProvider {
            failures: Cell::new(usize::MAX),
            route_ok: false,
        })
        .with_snapping(SnapConfig {
            jitter_degrees: -0.001,
            ..SnapConfig::default()
        });
        let rendered = renderer.render(0, &stops());
        assert_eq!(rendered.source, GeometrySource::StraightLine);
        assert_eq!(rendered.geometry.points(), &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    }

    #[test]
    fn test_render_uses_road_geometry() {
        let renderer = RouteRenderer::new(FlakyProvider {
            failures: Cell::new(0),
            route_ok: true,
        });
        let rendered = renderer.render(1, &stops());
        assert_eq!(rendered.source, GeometrySource::Road);
        assert_eq!(rendered.geometry.points().len(), 4);
        assert_eq!(rendered.color, "#33FF57");
        assert_eq!(rendered.markers[1].label, "Pickup: 100 units");
        assert_eq!(rendered.markers[2].label, "Drop-off: 40 units");
    }

    #[test]
    fn test_render_falls_back_to_straight_lines() {
        let renderer = RouteRenderer::new(FlakyProvider {
            failures: Cell::new(0),
            route_ok: false,
        })
        .with_snapping(SnapConfig::default());
        let rendered = renderer.render(0, &stops());
        assert_eq!(rendered.source, GeometrySource::StraightLine);
        assert_eq!(rendered.geometry.points(), &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        assert_eq!(rendered.markers[0].label, "Start");
    }
}
