//! Cave connector
//!
//! Caves are carved independently per cube, so a cave leaving the top of one
//! cube usually runs into solid rock at the bottom of the cube above. The
//! connector looks at what the raw cave generators carve into the cube below,
//! then carves a tapering shaft into the bottom of the current cube so the two
//! cavities join.
//!
//! Steps per cube:
//! - **Scratch**: run every raw generator on two solid scratch cubes, one for
//!   this cube and one for the cube below
//! - **Depth map**: per column, how high the open space of the cube below
//!   reaches from its floor
//! - **Erosion**: layer by layer from `y = 0`, erode the open region from
//!   randomly chosen sides and write what is left into the destination cube

pub mod depth;
pub mod erosion;
pub mod observer;
pub mod params;
pub mod scratch;

pub use depth::{ColumnBounds, DepthGrid, DepthMap, FULLY_OPEN};
pub use erosion::{ErosionSides, LayerReport, Side, Termination};
pub use observer::{ConnectorObserver, LayerRecorder, NoopObserver};
pub use params::ConnectorParams;
pub use scratch::ScratchPair;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, enabled, trace, Level};

use crate::ascii;
use crate::carvers::{CubicStructureGenerator, WorldContext};
use crate::cube::CubePos;
use crate::error::Result;
use crate::primer::CubePrimer;
use crate::seeds::cube_random;

/// What the connector did to one cube.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub pos: CubePos,
    /// Highest first-solid height found in the cube below
    pub max_y: usize,
    /// Open region of the cube below, before any erosion
    pub initial_bounds: Option<ColumnBounds>,
    pub layers: usize,
    pub voxels_written: usize,
    pub termination: Termination,
}

/// Joins caves of a cube with the caves of the cube below it.
pub struct CaveConnector {
    generators: Vec<Arc<dyn CubicStructureGenerator>>,
    params: ConnectorParams,
}

impl CaveConnector {
    /// `generators` run in order on both scratch cubes.
    pub fn new(generators: Vec<Arc<dyn CubicStructureGenerator>>, params: ConnectorParams) -> Self {
        Self { generators, params }
    }

    pub fn generators(&self) -> &[Arc<dyn CubicStructureGenerator>] {
        &self.generators
    }

    pub fn params(&self) -> &ConnectorParams {
        &self.params
    }

    /// Carve the connection into `primer`, the cube at `pos`.
    ///
    /// On error nothing has been written to `primer`.
    pub fn connect(&self, world: &WorldContext, primer: &mut CubePrimer, pos: CubePos) -> Result<ConnectionSummary> {
        self.connect_observed(world, primer, pos, &mut NoopObserver)
    }

    /// Same as [`CaveConnector::connect`], reporting progress to `observer`.
    pub fn connect_observed(
        &self,
        world: &WorldContext,
        primer: &mut CubePrimer,
        pos: CubePos,
        observer: &mut dyn ConnectorObserver,
    ) -> Result<ConnectionSummary> {
        let mut rng = cube_random(world.seed, pos);
        let scratch = ScratchPair::generate(&self.generators, world, pos, self.params.scratch_fill)?;

        let mut depth_map = DepthMap::build(&scratch.below);
        observer.on_depth_map(pos, &depth_map);

        let mut summary = ConnectionSummary {
            pos,
            max_y: depth_map.max_y,
            initial_bounds: depth_map.bounds,
            layers: 0,
            voxels_written: 0,
            termination: Termination::NothingToConnect,
        };

        match depth_map.bounds {
            Some(bounds) if !depth_map.is_empty() => {
                debug!(%pos, max_y = depth_map.max_y, %bounds, "connecting caves");
                if enabled!(Level::TRACE) {
                    trace!(%pos, "initial depth grid\n{}", ascii::render_depth_grid(&depth_map.grid));
                }

                let outcome = erosion::carve_layers(
                    &mut depth_map.grid,
                    bounds,
                    depth_map.max_y,
                    &mut rng,
                    primer,
                    self.params.marker,
                    observer,
                );
                summary.layers = outcome.layers;
                summary.voxels_written = outcome.voxels_written;
                summary.termination = outcome.termination;
            }
            _ => {
                trace!(%pos, "nothing to connect");
            }
        }

        debug!(
            %pos,
            layers = summary.layers,
            voxels = summary.voxels_written,
            termination = ?summary.termination,
            "cave connection finished"
        );
        observer.on_finish(&summary);
        Ok(summary)
    }
}

impl CubicStructureGenerator for CaveConnector {
    fn name(&self) -> &str {
        "cave_connector"
    }

    fn generate(&self, world: &WorldContext, primer: &mut CubePrimer, pos: CubePos) -> Result<()> {
        self.connect(world, primer, pos).map(|_| ())
    }
}
