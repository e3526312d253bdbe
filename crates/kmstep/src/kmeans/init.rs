use super::distance;
use crate::points::PointSet;
use crate::rng::random_index;
use crate::{EngineError, InvalidParameterSnafu};
use rand::RngExt;

/// Centroid seeding strategy. The discriminants are the mode codes the
/// control panel sends.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InitMode {
    /// Every coordinate drawn uniformly from the sampling range; centroids need
    /// not coincide with any point.
    UniformRandom = 0,
    /// K points picked by independent random index draws, duplicates allowed.
    RandomSample = 1,
    /// One random point, then greedily the point with the largest summed
    /// distance to the centroids picked so far.
    FarthestPoint = 2,
}

impl TryFrom<u8> for InitMode {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::UniformRandom),
            1 => Ok(Self::RandomSample),
            2 => Ok(Self::FarthestPoint),
            _ => InvalidParameterSnafu {
                name: "initialization mode",
                reason: format!("{code} is not one of 0, 1, 2"),
            }
            .fail(),
        }
    }
}

#[derive(Debug)]
pub struct Initial {
    /// `k * dimension` coordinates, row-major.
    pub centroids: Vec<f32>,
    /// Point index that seeded each centroid slot; empty for
    /// [`InitMode::UniformRandom`].
    pub seeds: Vec<usize>,
}

pub fn uniform_random(rng: &mut impl RngExt, dimension: usize, k: usize, range: f32) -> Vec<f32> {
    (0..k * dimension)
        .map(|_| rng.random_range(-range..range))
        .collect()
}

pub fn random_sample(rng: &mut impl RngExt, n: usize, k: usize) -> Vec<usize> {
    (0..k).map(|_| random_index(rng, n)).collect()
}

pub fn farthest_point(rng: &mut impl RngExt, points: &PointSet, k: usize) -> Vec<usize> {
    let first = random_index(rng, points.len());
    farthest_point_from(points, first, k)
}

fn farthest_point_from(points: &PointSet, first: usize, k: usize) -> Vec<usize> {
    let mut seeds = Vec::with_capacity(k);
    seeds.push(first);

    // Summed distance from every point to all seeds chosen so far, updated
    // incrementally with the newest seed only
    let mut summed = vec![0.0f32; points.len()];
    let mut newest = first;

    for _ in 1..k {
        let c = points.point(newest);
        let mut best = 0;
        let mut best_sum = f32::NEG_INFINITY;

        for (i, (p, sum)) in points.iter().zip(summed.iter_mut()).enumerate() {
            *sum += distance(p, c);
            // Strict comparison: the first index in scan order wins ties
            if *sum > best_sum {
                best_sum = *sum;
                best = i;
            }
        }

        seeds.push(best);
        newest = best;
    }

    seeds
}

fn gather(points: &PointSet, seeds: &[usize]) -> Vec<f32> {
    let mut centroids = Vec::with_capacity(seeds.len() * points.dimension());
    for &idx in seeds {
        centroids.extend_from_slice(points.point(idx));
    }
    centroids
}

/// Caller guarantees `2 <= k <= points.len()`.
pub fn find_initial(
    rng: &mut impl RngExt,
    points: &PointSet,
    k: usize,
    mode: InitMode,
    range: f32,
) -> Initial {
    debug_assert!(k <= points.len());

    match mode {
        InitMode::UniformRandom => Initial {
            centroids: uniform_random(rng, points.dimension(), k, range),
            seeds: Vec::new(),
        },
        InitMode::RandomSample => {
            let seeds = random_sample(rng, points.len(), k);
            Initial {
                centroids: gather(points, &seeds),
                seeds,
            }
        }
        InitMode::FarthestPoint => {
            let seeds = farthest_point(rng, points, k);
            Initial {
                centroids: gather(points, &seeds),
                seeds,
            }
        }
    }
}
