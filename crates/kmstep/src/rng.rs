use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

// e * 100_000
pub const DEFAULT_SEED: u64 = 271828;

pub type DefaultRng = Xoshiro256PlusPlus;

pub fn new() -> DefaultRng {
    from_seed(DEFAULT_SEED)
}

pub fn from_seed(seed: u64) -> DefaultRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Maps one uniform draw onto `0..n`: normalize to `[0, 1)`, scale by `n`, truncate.
#[inline]
pub fn random_index(rng: &mut impl rand::RngExt, n: usize) -> usize {
    debug_assert!(n > 0);
    let idx = (rng.random::<f32>() * n as f32) as usize;
    // f32 rounding can land exactly on n for large sets
    idx.min(n - 1)
}
