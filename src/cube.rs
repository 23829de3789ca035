//! Cube coordinates and block states
//!
//! The world is split into cubic chunks of `CUBE_SIZE` blocks per edge, stacked
//! vertically. A `CubePos` identifies one cube; local coordinates inside a cube
//! run from `0` to `CUBE_MAX` on every axis.

use serde::{Deserialize, Serialize};

/// Blocks per cube edge
pub const CUBE_SIZE: usize = 16;

/// Largest local coordinate inside a cube
pub const CUBE_MAX: usize = CUBE_SIZE - 1;

/// Total number of voxels in one cube
pub const CUBE_VOLUME: usize = CUBE_SIZE * CUBE_SIZE * CUBE_SIZE;

/// Position of a cube in the cube grid (not in blocks)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CubePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubePos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cube directly underneath this one
    pub fn below(&self) -> Self {
        Self { y: self.y - 1, ..*self }
    }

    /// The cube directly above this one
    pub fn above(&self) -> Self {
        Self { y: self.y + 1, ..*self }
    }

    pub fn min_block_x(&self) -> i64 {
        self.x as i64 * CUBE_SIZE as i64
    }

    pub fn min_block_y(&self) -> i64 {
        self.y as i64 * CUBE_SIZE as i64
    }

    pub fn min_block_z(&self) -> i64 {
        self.z as i64 * CUBE_SIZE as i64
    }

    /// World block position of a local voxel in this cube
    pub fn to_block(&self, x: usize, y: usize, z: usize) -> (i64, i64, i64) {
        (
            self.min_block_x() + x as i64,
            self.min_block_y() + y as i64,
            self.min_block_z() + z as i64,
        )
    }

    /// All cubes in a square of the given radius around this one, same Y
    pub fn horizontal_neighborhood(&self, radius: i32) -> Vec<CubePos> {
        let mut result = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)).max(0) as usize);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                result.push(CubePos::new(self.x + dx, self.y, self.z + dz));
            }
        }
        result
    }
}

impl std::fmt::Display for CubePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Opaque block state id.
///
/// Only the air/solid classification matters to cave generation; the other
/// constants exist so terrain and debug output can tell materials apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockState(pub u16);

impl BlockState {
    pub const AIR: BlockState = BlockState(0);
    pub const STONE: BlockState = BlockState(1);
    pub const DIRT: BlockState = BlockState(2);
    pub const WATER: BlockState = BlockState(3);
    /// Air carved by cave generation, passable like `AIR`
    pub const CAVE_AIR: BlockState = BlockState(4);
    /// Solid, visually distinct marker useful for inspecting connector output
    pub const GLASS: BlockState = BlockState(5);

    /// Whether this state counts as open space
    pub fn is_air(&self) -> bool {
        matches!(*self, BlockState::AIR | BlockState::CAVE_AIR)
    }

    pub fn name(&self) -> &'static str {
        match *self {
            BlockState::AIR => "air",
            BlockState::STONE => "stone",
            BlockState::DIRT => "dirt",
            BlockState::WATER => "water",
            BlockState::CAVE_AIR => "cave_air",
            BlockState::GLASS => "glass",
            _ => "unknown",
        }
    }
}

impl std::fmt::Display for BlockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name(), self.0)
    }
}
