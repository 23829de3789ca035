//! Raw cave generators
//!
//! Each generator carves its own independent pattern into one cube at a time.
//! Generators must depend only on the world and the cube position so the cave
//! connector can replay them on scratch cubes.

pub mod caves;
pub mod ravines;

pub use caves::{CaveParams, NoiseCaveCarver};
pub use ravines::{RavineCarver, RavineParams};

use std::sync::Arc;

use crate::cube::CubePos;
use crate::error::Result;
use crate::primer::CubePrimer;

/// Per-world input shared by every cube generation request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldContext {
    pub seed: u64,
}

impl WorldContext {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Something that carves structures (caves, ravines, connectors) into a cube.
pub trait CubicStructureGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, world: &WorldContext, primer: &mut CubePrimer, pos: CubePos) -> Result<()>;
}

/// Generator backed by a closure
pub struct FnCarver<F> {
    name: String,
    carve: F,
}

impl<F> FnCarver<F>
where
    F: Fn(&WorldContext, &mut CubePrimer, CubePos) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, carve: F) -> Self {
        Self {
            name: name.into(),
            carve,
        }
    }
}

impl<F> CubicStructureGenerator for FnCarver<F>
where
    F: Fn(&WorldContext, &mut CubePrimer, CubePos) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, world: &WorldContext, primer: &mut CubePrimer, pos: CubePos) -> Result<()> {
        (self.carve)(world, primer, pos)
    }
}

/// Build the enabled reference carvers in their generation order:
/// caves first, then ravines.
pub fn build_carvers(world_seed: u64, caves: &CaveParams, ravines: &RavineParams) -> Vec<Arc<dyn CubicStructureGenerator>> {
    let mut carvers: Vec<Arc<dyn CubicStructureGenerator>> = Vec::new();
    if caves.enabled {
        carvers.push(Arc::new(NoiseCaveCarver::new(world_seed, caves.clone())));
    }
    if ravines.enabled {
        carvers.push(Arc::new(RavineCarver::new(world_seed, ravines.clone())));
    }
    carvers
}
