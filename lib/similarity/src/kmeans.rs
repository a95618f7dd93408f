//! Seeded k-means
//!
//! Lloyd's algorithm with k-means++ seeding and several restarts, keeping
//! the restart with the lowest inertia. Everything is driven from a single
//! base seed, so identical input always yields identical labels.

use moodmix_core::{squared_l2_distance, Error, FeatureVector, Result, FEATURE_DIM};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Labels for a batch of points
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    /// Cluster id per input point, each in `0..k`
    pub labels: Vec<usize>,
    /// Sum of squared distances from each point to its centroid
    pub inertia: f64,
}

/// Partitions feature vectors into `k` groups
///
/// Implementations must be deterministic for a given input and label every
/// point with an id in `0..k`, using every id at least once when
/// `points.len() >= k`.
pub trait ClusterAlgorithm: Send + Sync {
    fn assign(&self, points: &[FeatureVector], k: usize) -> Result<ClusterAssignment>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    pub seed: u64,
    /// Number of restarts
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on centroid movement, relative to the data variance
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    fn run_once(&self, points: &[FeatureVector], k: usize, seed: u64, tol: f64) -> ClusterAssignment {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = init_plus_plus(points, k, &mut rng);
        let mut labels = vec![0; points.len()];

        for _ in 0..self.config.max_iter {
            assign_nearest(points, &centroids, &mut labels);
            fill_empty_clusters(points, &mut centroids, &mut labels);
            let updated = compute_centroids(points, &labels, k);

            let shift: f64 = centroids
                .iter()
                .zip(updated.iter())
                .map(|(a, b)| squared_l2_distance(a, b))
                .sum();
            centroids = updated;
            if shift <= tol {
                break;
            }
        }

        assign_nearest(points, &centroids, &mut labels);
        fill_empty_clusters(points, &mut centroids, &mut labels);
        let centroids = compute_centroids(points, &labels, k);
        let inertia = points
            .iter()
            .zip(labels.iter())
            .map(|(p, &l)| squared_l2_distance(p, &centroids[l]))
            .sum();

        ClusterAssignment { labels, inertia }
    }
}

impl ClusterAlgorithm for KMeans {
    fn assign(&self, points: &[FeatureVector], k: usize) -> Result<ClusterAssignment> {
        if k == 0 {
            return Err(Error::InvalidClusterCount(k));
        }
        if points.len() < k {
            return Err(Error::TooFewTracks {
                required: k,
                actual: points.len(),
            });
        }
        if self.config.n_init == 0 {
            return Err(Error::InvalidConfig("n_init must be at least 1".to_string()));
        }

        let tol = self.config.tolerance * mean_variance(points);

        let mut seeder = StdRng::seed_from_u64(self.config.seed);
        let seeds: Vec<u64> = (0..self.config.n_init).map(|_| seeder.random()).collect();

        let runs: Vec<ClusterAssignment> = seeds
            .par_iter()
            .map(|&seed| self.run_once(points, k, seed, tol))
            .collect();

        // First restart wins ties so the result does not depend on scheduling
        let mut best: Option<ClusterAssignment> = None;
        for run in runs {
            match &best {
                Some(b) if b.inertia <= run.inertia => {}
                _ => best = Some(run),
            }
        }

        let best = best.ok_or_else(|| Error::InvalidConfig("no k-means restarts ran".to_string()))?;
        debug!(
            "k-means: {} points, k={}, {} restarts, inertia {:.4}",
            points.len(),
            k,
            self.config.n_init,
            best.inertia
        );
        Ok(best)
    }
}

fn mean_variance(points: &[FeatureVector]) -> f64 {
    let n = points.len() as f64;
    let mut total = 0.0;
    for dim in 0..FEATURE_DIM {
        let mean = points.iter().map(|p| p[dim]).sum::<f64>() / n;
        total += points.iter().map(|p| (p[dim] - mean).powi(2)).sum::<f64>() / n;
    }
    total / FEATURE_DIM as f64
}

/// k-means++: each new centroid is drawn with probability proportional to
/// its squared distance from the nearest centroid chosen so far
fn init_plus_plus(points: &[FeatureVector], k: usize, rng: &mut StdRng) -> Vec<FeatureVector> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    let mut closest: Vec<f64> = points
        .iter()
        .map(|p| squared_l2_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (i, d) in closest.iter().enumerate() {
                if *d <= 0.0 {
                    continue;
                }
                if target < *d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        } else {
            // Every point coincides with a centroid already
            rng.random_range(0..points.len())
        };

        let centroid = points[next];
        for (c, p) in closest.iter_mut().zip(points.iter()) {
            *c = c.min(squared_l2_distance(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Label each point with its nearest centroid; ties go to the lower id
fn assign_nearest(points: &[FeatureVector], centroids: &[FeatureVector], labels: &mut [usize]) {
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (id, centroid) in centroids.iter().enumerate() {
            let dist = squared_l2_distance(point, centroid);
            if dist < best_dist {
                best = id;
                best_dist = dist;
            }
        }
        *label = best;
    }
}

/// Move the worst-fitting point of a multi-member cluster into each empty
/// cluster, so every id in `0..k` ends up used
fn fill_empty_clusters(
    points: &[FeatureVector],
    centroids: &mut [FeatureVector],
    labels: &mut [usize],
) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (i, (point, &label)) in points.iter().zip(labels.iter()).enumerate() {
            if counts[label] < 2 {
                continue;
            }
            let dist = squared_l2_distance(point, &centroids[label]);
            if donor.map_or(true, |(_, d)| dist > d) {
                donor = Some((i, dist));
            }
        }

        if let Some((i, _)) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
            centroids[empty] = points[i];
        }
    }
}

fn compute_centroids(points: &[FeatureVector], labels: &[usize], k: usize) -> Vec<FeatureVector> {
    let mut sums = vec![[0.0; FEATURE_DIM]; k];
    let mut counts = vec![0usize; k];
    for (point, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (s, x) in sums[label].iter_mut().zip(point.iter()) {
            *s += x;
        }
    }

    for (sum, &count) in sums.iter_mut().zip(counts.iter()) {
        if count > 0 {
            for s in sum.iter_mut() {
                *s /= count as f64;
            }
        }
    }
    sums
}
