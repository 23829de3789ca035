//! Connector configuration

use serde::{Deserialize, Serialize};

use crate::cube::BlockState;
use crate::error::{GenerationError, Result};

/// Materials used by the cave connector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorParams {
    /// Material written into the destination cube for carved-open voxels
    pub marker: BlockState,

    /// Material scratch buffers are filled with before raw carvers run.
    /// Must be solid, otherwise every column of the cube below looks open.
    pub scratch_fill: BlockState,
}

impl Default for ConnectorParams {
    fn default() -> Self {
        Self {
            marker: BlockState::CAVE_AIR,
            scratch_fill: BlockState::STONE,
        }
    }
}

impl ConnectorParams {
    /// Writes glass instead of air so the connecting shaft can be seen in-world
    pub fn debug_marker() -> Self {
        Self {
            marker: BlockState::GLASS,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scratch_fill.is_air() {
            return Err(GenerationError::InvalidConfig(format!(
                "scratch fill {} must be solid",
                self.scratch_fill
            )));
        }
        if self.marker == self.scratch_fill {
            return Err(GenerationError::InvalidConfig(format!(
                "marker {} must differ from the scratch fill",
                self.marker
            )));
        }
        Ok(())
    }
}
