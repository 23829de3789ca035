//! Scratch cubes carved by the raw cave generators

use std::sync::Arc;

use crate::carvers::{CubicStructureGenerator, WorldContext};
use crate::cube::{BlockState, CubePos};
use crate::error::Result;
use crate::primer::CubePrimer;

/// Raw cave layouts of the current cube and the cube below it.
///
/// Both start uniformly solid and receive exactly what the generators would
/// carve when generating those cubes directly.
pub struct ScratchPair {
    pub here: CubePrimer,
    pub below: CubePrimer,
}

impl ScratchPair {
    pub fn generate(
        generators: &[Arc<dyn CubicStructureGenerator>],
        world: &WorldContext,
        pos: CubePos,
        fill: BlockState,
    ) -> Result<Self> {
        let mut here = CubePrimer::try_uniform(fill)?;
        let mut below = CubePrimer::try_uniform(fill)?;
        let below_pos = pos.below();

        for generator in generators {
            generator.generate(world, &mut here, pos)?;
            generator.generate(world, &mut below, below_pos)?;
        }

        Ok(Self { here, below })
    }
}
