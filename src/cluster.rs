//! Geographic clustering of donors and recipients.
//!
//! Seeded k-means++ with Lloyd iterations. Assignment and inertia use
//! great-circle kilometers; centroids are the mean of member coordinates.
//! With `k` at or above the number of distinct points the partition
//! degenerates to one point per cluster and the remaining clusters stay empty.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::haversine::haversine_km;
use crate::traits::Partitioner;

/// Result of partitioning points into `k` clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Cluster index per input point, each in `0..k`.
    pub labels: Vec<usize>,
    /// One centroid per cluster. Empty clusters keep their seed position.
    pub centroids: Vec<(f64, f64)>,
}

impl Partition {
    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }

    /// Number of points assigned to each cluster.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Seed for centroid initialization.
    pub seed: u64,
    /// Maximum Lloyd iterations per restart.
    pub max_iterations: usize,
    /// Stop once no centroid moves further than this.
    pub tolerance_km: f64,
    /// Independent initializations; the lowest inertia wins.
    pub restarts: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iterations: 300,
            tolerance_km: 1e-4,
            restarts: 8,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KMeans {
    pub config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }
}

impl Partitioner for KMeans {
    #[instrument(level = "debug", skip_all, fields(points = points.len(), k = k))]
    fn partition(&self, points: &[(f64, f64)], k: usize) -> Partition {
        if k == 0 {
            return Partition {
                labels: Vec::new(),
                centroids: Vec::new(),
            };
        }
        if points.is_empty() {
            return Partition {
                labels: Vec::new(),
                centroids: vec![(0.0, 0.0); k],
            };
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
        let mut best: Option<(Partition, f64)> = None;

        for restart in 0..self.config.restarts.max(1) {
            let seeds = seed_centroids(points, k, &mut rng);
            let (partition, inertia) = lloyd(points, seeds, &self.config);
            debug!(restart, inertia, "k-means restart finished");

            let improves = best
                .as_ref()
                .is_none_or(|(_, best_inertia)| inertia < *best_inertia);
            if improves {
                best = Some((partition, inertia));
            }
        }

        match best {
            Some((partition, _)) => partition,
            None => Partition {
                labels: vec![0; points.len()],
                centroids: vec![points[0]; k],
            },
        }
    }
}

/// k-means++ seeding: each further centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen centroid.
fn seed_centroids<G: Rng>(points: &[(f64, f64)], k: usize, rng: &mut G) -> Vec<(f64, f64)> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    let mut weights: Vec<f64> = points
        .iter()
        .map(|&point| haversine_km(point, centroids[0]).powi(2))
        .collect();

    while centroids.len() < k {
        let total: f64 = weights.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.gen_range(0.0..total);
            let mut chosen = weights.len() - 1;
            for (i, &weight) in weights.iter().enumerate() {
                if target < weight {
                    chosen = i;
                    break;
                }
                target -= weight;
            }
            chosen
        } else {
            // Every point coincides with a centroid already.
            rng.gen_range(0..points.len())
        };

        let centroid = points[chosen];
        centroids.push(centroid);
        for (weight, &point) in weights.iter_mut().zip(points) {
            *weight = weight.min(haversine_km(point, centroid).powi(2));
        }
    }

    centroids
}

fn lloyd(points: &[(f64, f64)], mut centroids: Vec<(f64, f64)>, config: &KMeansConfig) -> (Partition, f64) {
    let mut labels = vec![0usize; points.len()];

    for iteration in 0..config.max_iterations {
        for (label, &point) in labels.iter_mut().zip(points) {
            *label = nearest_centroid(point, &centroids);
        }

        let mut sums = vec![(0.0, 0.0, 0usize); centroids.len()];
        for (&label, &(lat, lng)) in labels.iter().zip(points) {
            let entry = &mut sums[label];
            entry.0 += lat;
            entry.1 += lng;
            entry.2 += 1;
        }

        let mut shift: f64 = 0.0;
        for (centroid, &(lat_sum, lng_sum, count)) in centroids.iter_mut().zip(&sums) {
            if count == 0 {
                continue;
            }
            let updated = (lat_sum / count as f64, lng_sum / count as f64);
            shift = shift.max(haversine_km(*centroid, updated));
            *centroid = updated;
        }

        if shift <= config.tolerance_km {
            debug!(iteration, "k-means converged");
            break;
        }
    }

    // Final assignment against the settled centroids.
    for (label, &point) in labels.iter_mut().zip(points) {
        *label = nearest_centroid(point, &centroids);
    }

    let inertia = labels
        .iter()
        .zip(points)
        .map(|(&label, &point)| haversine_km(point, centroids[label]).powi(2))
        .sum();

    (Partition { labels, centroids }, inertia)
}

/// Index of the nearest centroid; ties go to the lowest index.
pub fn nearest_centroid(point: (f64, f64), centroids: &[(f64, f64)]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let dist = haversine_km(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}
