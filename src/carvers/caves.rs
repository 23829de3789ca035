//! Noise caves
//!
//! Samples 3D Perlin noise in world block coordinates, so a cave crossing a
//! cube face is carved identically on both sides of it.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::{CubicStructureGenerator, WorldContext};
use crate::cube::{BlockState, CubePos, CUBE_SIZE};
use crate::error::Result;
use crate::primer::CubePrimer;
use crate::seeds::derive_seed;

/// Parameters for noise cave generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    pub enabled: bool,

    /// Frequency of the main cave noise (lower = larger caves)
    pub frequency: f64,

    /// Noise value above which a voxel becomes air
    pub threshold: f64,

    /// Vertical frequency multiplier; below 1.0 stretches caves vertically
    pub vertical_squeeze: f64,

    /// Frequency of the detail noise that roughens cave walls
    pub detail_frequency: f64,

    /// Weight of the detail noise
    pub detail_weight: f64,

    /// Caves are not carved above this world block height
    pub max_block_y: Option<i64>,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: 0.045,
            threshold: 0.35,
            vertical_squeeze: 0.6,
            detail_frequency: 0.12,
            detail_weight: 0.25,
            max_block_y: None,
        }
    }
}

pub struct NoiseCaveCarver {
    params: CaveParams,
    base: Perlin,
    detail: Perlin,
}

impl NoiseCaveCarver {
    pub fn new(world_seed: u64, params: CaveParams) -> Self {
        let seed = derive_seed(world_seed, "caves");
        Self {
            params,
            base: Perlin::new(seed as u32),
            detail: Perlin::new((seed >> 32) as u32),
        }
    }

    /// Cave density at a world block position; air where above the threshold
    pub fn density(&self, bx: i64, by: i64, bz: i64) -> f64 {
        let p = &self.params;
        let (x, y, z) = (bx as f64, by as f64, bz as f64);

        let base = self.base.get([
            x * p.frequency,
            y * p.frequency * p.vertical_squeeze,
            z * p.frequency,
        ]);
        let detail = self.detail.get([
            x * p.detail_frequency,
            y * p.detail_frequency,
            z * p.detail_frequency,
        ]);

        base + detail * p.detail_weight
    }

    pub fn is_cave(&self, bx: i64, by: i64, bz: i64) -> bool {
        if let Some(max_y) = self.params.max_block_y {
            if by > max_y {
                return false;
            }
        }
        self.density(bx, by, bz) > self.params.threshold
    }
}

impl CubicStructureGenerator for NoiseCaveCarver {
    fn name(&self) -> &str {
        "caves"
    }

    fn generate(&self, _world: &WorldContext, primer: &mut CubePrimer, pos: CubePos) -> Result<()> {
        for x in 0..CUBE_SIZE {
            for z in 0..CUBE_SIZE {
                for y in 0..CUBE_SIZE {
                    let (bx, by, bz) = pos.to_block(x, y, z);
                    if !primer.is_air(x, y, z) && self.is_cave(bx, by, bz) {
                        primer.set(x, y, z, BlockState::AIR);
                    }
                }
            }
        }
        Ok(())
    }
}
