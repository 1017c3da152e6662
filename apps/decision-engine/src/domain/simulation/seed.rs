//! Per-path seed derivation.

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for path `path_index` of a run seeded with `base_seed`.
///
/// SplitMix64 finalizer over `base_seed + (index + 1) * gamma`; adjacent
/// indices map to unrelated seeds.
#[must_use]
pub const fn derive_seed(base_seed: u64, path_index: u64) -> u64 {
    let mut z = base_seed.wrapping_add(path_index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
