pub mod init;
pub mod lloyds;

// References:
// - Lloyd, Least squares quantization in PCM
// - Gonzalez, Clustering to minimize the maximum intercluster distance
//   (the farthest-point seeding here sums distances instead of taking the minimum)

pub const MIN_K: usize = 2;

#[inline(always)]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| {
        let d = x - y;
        d.mul_add(d, acc)
    })
}

#[inline(always)]
pub fn distance(a: &[f32], b: &[f32]) -> f32 {
    squared_distance(a, b).sqrt()
}

#[inline(always)]
pub fn centroid(centroids: &[f32], dimension: usize, j: usize) -> &[f32] {
    &centroids[j * dimension..(j + 1) * dimension]
}
