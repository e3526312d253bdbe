use super::{centroid, distance};
use crate::points::PointSet;
use rand::RngExt;

/// Assigns every point to its nearest centroid. A strictly closer centroid
/// always wins; an exactly equal distance switches the assignment with
/// probability 1/2, so ties are resolved at random.
pub fn assign_points(
    rng: &mut impl RngExt,
    points: &PointSet,
    centroids: &[f32],
    assignments: &mut [usize],
) {
    let dimension = points.dimension();
    let k = centroids.len() / dimension;
    assert_eq!(points.len(), assignments.len());
    assert!(k > 0);

    for (point, assignment) in points.iter().zip(assignments.iter_mut()) {
        let mut min = distance(point, centroid(centroids, dimension, 0));
        let mut min_idx = 0;
        for j in 1..k {
            let d = distance(point, centroid(centroids, dimension, j));
            if d < min {
                min = d;
                min_idx = j;
            } else if d == min && rng.random_bool(0.5) {
                min_idx = j;
            }
        }

        *assignment = min_idx;
    }
}

#[derive(Debug)]
pub struct UpdateResult {
    pub counts: Vec<usize>,
}

impl UpdateResult {
    pub fn empty_clusters(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(j, _)| j)
    }
}

/// Moves every centroid to the mean of its assigned points. A centroid with no
/// points keeps its position.
pub fn update_centroids(
    points: &PointSet,
    k: usize,
    assignments: &[usize],
    centroids: &mut [f32],
) -> UpdateResult {
    let dimension = points.dimension();
    assert_eq!(centroids.len(), k * dimension);

    let mut counts = vec![0usize; k];
    let mut sums = vec![0f32; k * dimension];

    for (point, &assigned_c) in points.iter().zip(assignments) {
        assert!(assigned_c < k);

        counts[assigned_c] += 1;
        let sum = &mut sums[assigned_c * dimension..(assigned_c + 1) * dimension];
        for (s, &c) in sum.iter_mut().zip(point) {
            *s += c;
        }
    }

    for (j, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }

        let sum = &sums[j * dimension..(j + 1) * dimension];
        let target = &mut centroids[j * dimension..(j + 1) * dimension];
        for (t, &s) in target.iter_mut().zip(sum) {
            *t = s / count as f32;
        }
    }

    UpdateResult { counts }
}

/// Sum of Euclidean distances from every point to its assigned centroid.
pub fn energy(points: &PointSet, centroids: &[f32], assignments: &[usize]) -> f32 {
    let dimension = points.dimension();
    points
        .iter()
        .zip(assignments)
        .map(|(point, &j)| distance(point, centroid(centroids, dimension, j)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use pretty_assertions::assert_eq;

    const N_PER_CLUSTER: usize = 256;
    const CENTERS: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [10.0, 0.0, 0.0],
        [0.0, 10.0, 0.0],
        [0.0, 0.0, 10.0],
    ];

    fn make_four_clusters() -> PointSet {
        let mut coords = Vec::with_capacity(N_PER_CLUSTER * 4 * 3);
        for center in &CENTERS {
            for i in 0..N_PER_CLUSTER {
                let offset = i as f32 * 0.001;
                coords.extend(center.iter().map(|c| c + offset));
            }
        }
        PointSet::from_flat(3, coords).unwrap()
    }

    #[test]
    fn test_assign_points() {
        let mut rng = rng::new();
        let points = make_four_clusters();
        let centroids: Vec<f32> = CENTERS.iter().flatten().copied().collect();

        let mut assignments = vec![0usize; points.len()];
        assign_points(&mut rng, &points, &centroids, &mut assignments);

        for ci in 0..4 {
            let start = ci * N_PER_CLUSTER;
            let end = start + N_PER_CLUSTER;
            assert!(
                assignments[start..end].iter().all(|&a| a == ci),
                "cluster {ci}: not all points assigned to its own centroid",
            );
        }
    }

    #[test]
    fn nearest_centroid_wins() {
        let mut rng = rng::new();
        let points = PointSet::from_flat(2, vec![0.0, 0.0, 4.0, 4.0, 9.0, 1.0]).unwrap();
        let centroids = [10.0, 0.0, 0.0, 1.0, 5.0, 5.0];

        let mut assignments = vec![0usize; 3];
        assign_points(&mut rng, &points, &centroids, &mut assignments);
        assert_eq!(assignments, vec![1, 2, 0]);
    }

    #[test]
    fn exact_ties_are_split_at_random() {
        let mut rng = rng::new();
        let points = PointSet::from_flat(2, vec![0.0, 0.0, 0.0, 5.0]).unwrap();
        // Both points are exactly equidistant from the two centroids
        let centroids = [-1.0, 0.0, 1.0, 0.0];

        let mut switched = 0;
        let trials = 400;
        for _ in 0..trials {
            let mut assignments = vec![0usize; 2];
            assign_points(&mut rng, &points, &centroids, &mut assignments);
            switched += assignments.iter().filter(|&&a| a == 1).count();
        }

        let share = switched as f32 / (trials * 2) as f32;
        assert!(
            (0.4..0.6).contains(&share),
            "tie switches should be close to half, got {share}",
        );
    }

    #[test]
    fn test_update_centroids() {
        let points = make_four_clusters();
        let k = 4;
        let assignments: Vec<usize> = (0..points.len()).map(|i| i / N_PER_CLUSTER).collect();

        let mut centroids = vec![99.0f32; k * 3];
        let result = update_centroids(&points, k, &assignments, &mut centroids);

        // Per-cluster offsets are 0..256 * 0.001, so the mean offset is ~0.13
        for (j, center) in CENTERS.iter().enumerate() {
            for (axis, &c) in center.iter().enumerate() {
                let got = centroids[j * 3 + axis];
                assert!(
                    (got - c - 0.1275).abs() < 1e-3,
                    "centroid {j} axis {axis}: expected ~{c}, got {got}",
                );
            }
        }

        assert_eq!(result.counts, vec![N_PER_CLUSTER; k]);
        assert_eq!(result.empty_clusters().count(), 0);
    }

    #[test]
    fn empty_cluster_keeps_position() {
        let points = PointSet::from_flat(2, vec![0.0, 0.0, 2.0, 2.0]).unwrap();
        let assignments = [0, 0];
        let mut centroids = vec![5.0, 5.0, -7.0, 3.5];

        let result = update_centroids(&points, 2, &assignments, &mut centroids);
        assert_eq!(centroids, vec![1.0, 1.0, -7.0, 3.5]);
        assert_eq!(result.empty_clusters().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn energy_sums_plain_distances() {
        let points = PointSet::from_flat(2, vec![0.0, 0.0, 3.0, 4.0, 10.0, 0.0]).unwrap();
        let centroids = [0.0, 0.0, 10.0, 1.0];
        let assignments = [0, 0, 1];
        // 0 + 5 + 1
        let e = energy(&points, &centroids, &assignments);
        assert!((e - 6.0).abs() < 1e-6);
    }
}
