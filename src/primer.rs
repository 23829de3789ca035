//! Voxel buffer for a single cube during generation

use crate::cube::{BlockState, CUBE_SIZE, CUBE_VOLUME};
use crate::error::{GenerationError, Result};

/// Mutable block storage backing one cube while it is being generated.
#[derive(Clone, PartialEq, Eq)]
pub struct CubePrimer {
    blocks: Vec<BlockState>,
}

impl CubePrimer {
    /// Create a primer filled entirely with air.
    pub fn new() -> Self {
        Self::uniform(BlockState::AIR)
    }

    /// Create a primer where every voxel holds `material`.
    ///
    /// Panics if the allocation fails; use [`CubePrimer::try_uniform`] where a
    /// failure has to stay local to one cube.
    pub fn uniform(material: BlockState) -> Self {
        Self {
            blocks: vec![material; CUBE_VOLUME],
        }
    }

    /// Fallible version of [`CubePrimer::uniform`].
    pub fn try_uniform(material: BlockState) -> Result<Self> {
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(CUBE_VOLUME)
            .map_err(|_| GenerationError::BufferAllocation {
                bytes: CUBE_VOLUME * std::mem::size_of::<BlockState>(),
            })?;
        blocks.resize(CUBE_VOLUME, material);
        Ok(Self { blocks })
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(
            x < CUBE_SIZE && y < CUBE_SIZE && z < CUBE_SIZE,
            "local coordinate ({}, {}, {}) out of cube",
            x, y, z
        );
        (x * CUBE_SIZE + z) * CUBE_SIZE + y
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockState {
        self.blocks[Self::index(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, state: BlockState) {
        self.blocks[Self::index(x, y, z)] = state;
    }

    pub fn is_air(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).is_air()
    }

    pub fn fill(&mut self, state: BlockState) {
        self.blocks.fill(state);
    }

    /// Count voxels matching a predicate.
    pub fn count(&self, mut predicate: impl FnMut(BlockState) -> bool) -> usize {
        self.blocks.iter().filter(|&&b| predicate(b)).count()
    }

    /// Iterate over all voxels with their local coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, usize, BlockState)> + '_ {
        self.blocks.iter().enumerate().map(|(idx, &state)| {
            let y = idx % CUBE_SIZE;
            let z = (idx / CUBE_SIZE) % CUBE_SIZE;
            let x = idx / (CUBE_SIZE * CUBE_SIZE);
            (x, y, z, state)
        })
    }

    /// Voxels whose state differs from `other`, with the state held here.
    pub fn diff(&self, other: &CubePrimer) -> Vec<(usize, usize, usize, BlockState)> {
        self.iter()
            .filter(|&(x, y, z, state)| other.get(x, y, z) != state)
            .collect()
    }
}

impl Default for CubePrimer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CubePrimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let air = self.count(|b| b.is_air());
        f.debug_struct("CubePrimer")
            .field("air", &air)
            .field("solid", &(CUBE_VOLUME - air))
            .finish()
    }
}
