//! Ravines: narrow, tall slots following the zero crossings of a 2D noise field

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::{CubicStructureGenerator, WorldContext};
use crate::cube::{BlockState, CubePos, CUBE_SIZE};
use crate::error::Result;
use crate::primer::CubePrimer;
use crate::seeds::derive_seed;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RavineParams {
    pub enabled: bool,

    /// Frequency of the noise whose zero crossings trace ravine paths
    pub path_frequency: f64,

    /// Half-width of a ravine in noise units around the zero crossing
    pub width: f64,

    /// Frequency of the mask that decides where ravines exist at all
    pub mask_frequency: f64,

    /// Mask value above which ravines are carved (higher = rarer)
    pub mask_threshold: f64,

    /// World block height of the ravine center line
    pub center_block_y: f64,

    /// How far the center line wanders up and down
    pub center_amplitude: f64,

    /// Half of the ravine height in blocks
    pub half_height: f64,
}

impl Default for RavineParams {
    fn default() -> Self {
        Self {
            enabled: true,
            path_frequency: 0.01,
            width: 0.035,
            mask_frequency: 0.004,
            mask_threshold: 0.1,
            center_block_y: 8.0,
            center_amplitude: 12.0,
            half_height: 14.0,
        }
    }
}

pub struct RavineCarver {
    params: RavineParams,
    path: Perlin,
    mask: Perlin,
    center: Perlin,
}

impl RavineCarver {
    pub fn new(world_seed: u64, params: RavineParams) -> Self {
        let seed = derive_seed(world_seed, "ravines");
        Self {
            params,
            path: Perlin::new(seed as u32),
            mask: Perlin::new((seed >> 16) as u32),
            center: Perlin::new((seed >> 32) as u32),
        }
    }

    /// Vertical extent `(bottom, top)` of the ravine in a world column, if any
    pub fn column_span(&self, bx: i64, bz: i64) -> Option<(f64, f64)> {
        let p = &self.params;
        let (x, z) = (bx as f64, bz as f64);

        if self.mask.get([x * p.mask_frequency, z * p.mask_frequency]) <= p.mask_threshold {
            return None;
        }

        let distance = self.path.get([x * p.path_frequency, z * p.path_frequency]).abs();
        if distance >= p.width {
            return None;
        }

        // Narrower toward the rim, so walls slope instead of standing vertical
        let taper = 1.0 - distance / p.width;
        let center = p.center_block_y + self.center.get([x * p.path_frequency, z * p.path_frequency]) * p.center_amplitude;
        let half = p.half_height * taper.sqrt();
        Some((center - half, center + half))
    }
}

impl CubicStructureGenerator for RavineCarver {
    fn name(&self) -> &str {
        "ravines"
    }

    fn generate(&self, _world: &WorldContext, primer: &mut CubePrimer, pos: CubePos) -> Result<()> {
        for x in 0..CUBE_SIZE {
            for z in 0..CUBE_SIZE {
                let (bx, _, bz) = pos.to_block(x, 0, z);
                let Some((bottom, top)) = self.column_span(bx, bz) else {
                    continue;
                };
                for y in 0..CUBE_SIZE {
                    let by = (pos.min_block_y() + y as i64) as f64;
                    if by >= bottom && by <= top {
                        primer.set(x, y, z, BlockState::AIR);
                    }
                }
            }
        }
        Ok(())
    }
}
