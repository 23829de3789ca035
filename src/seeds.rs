//! Seed management for cube generation
//!
//! Cubes may be generated in any order, so every random stream used while
//! generating a cube must be reproducible from the world seed and the cube's
//! coordinate alone.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cube::CubePos;

/// Create the random stream for a single cube.
///
/// Three multipliers are drawn from a stream seeded with the world seed and
/// combined with the cube coordinate; the result seeds the returned stream.
pub fn cube_random(world_seed: u64, pos: CubePos) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(cube_seed(world_seed, pos))
}

/// The seed `cube_random` uses for `pos`.
pub fn cube_seed(world_seed: u64, pos: CubePos) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(world_seed);
    let x_mul: u64 = rng.gen();
    let y_mul: u64 = rng.gen();
    let z_mul: u64 = rng.gen();

    // Sign-extend so negative cube coordinates mix the same way positive ones do
    x_mul.wrapping_mul(pos.x as i64 as u64)
        ^ y_mul.wrapping_mul(pos.y as i64 as u64)
        ^ z_mul.wrapping_mul(pos.z as i64 as u64)
}

/// Derive a sub-seed from a master seed and a system name.
/// Different systems get different but deterministic seeds.
pub fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}
