//! Cube generation pipeline
//!
//! Produces a base cube, then applies raw carvers or the cave connector
//! depending on where the cube sits relative to the band generated by the
//! other terrain strategy:
//!
//! | Cube Y                    | Raw carvers | Connector |
//! |---------------------------|-------------|-----------|
//! | outside the band          | yes         | no        |
//! | `band_min`, `band_max - 1`| yes         | no        |
//! | `band_min + 1`            | no          | yes       |
//! | rest of the band          | no          | no        |

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::carvers::{build_carvers, CubicStructureGenerator, WorldContext};
use crate::config::WorldGenConfig;
use crate::connector::{CaveConnector, ConnectionSummary, ConnectorObserver, ConnectorParams, NoopObserver};
use crate::cube::{BlockState, CubePos, CUBE_SIZE};
use crate::error::{GenerationError, Result};
use crate::primer::CubePrimer;

/// Produces the uncarved content of a cube.
pub trait BaseTerrain: Send + Sync {
    fn generate_base(&self, world: &WorldContext, pos: CubePos) -> Result<CubePrimer>;
}

/// Flat terrain: stone up to the surface, a dirt cap, air above.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredTerrain {
    /// World block height of the topmost solid block
    pub surface_block_y: i64,
    /// Dirt layers at the top of the ground
    pub dirt_depth: i64,
}

impl Default for LayeredTerrain {
    fn default() -> Self {
        Self {
            surface_block_y: 64,
            dirt_depth: 3,
        }
    }
}

impl BaseTerrain for LayeredTerrain {
    fn generate_base(&self, _world: &WorldContext, pos: CubePos) -> Result<CubePrimer> {
        let mut primer = CubePrimer::try_uniform(BlockState::STONE)?;
        for y in 0..CUBE_SIZE {
            let by = pos.min_block_y() + y as i64;
            let state = if by > self.surface_block_y {
                BlockState::AIR
            } else if by > self.surface_block_y - self.dirt_depth {
                BlockState::DIRT
            } else {
                continue;
            };
            for x in 0..CUBE_SIZE {
                for z in 0..CUBE_SIZE {
                    primer.set(x, y, z, state);
                }
            }
        }
        Ok(primer)
    }
}

/// Vertical band of cubes `band_min..band_max` generated by another strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryLayout {
    pub band_min: i32,
    pub band_max: i32,
}

impl Default for BoundaryLayout {
    fn default() -> Self {
        Self {
            band_min: 0,
            band_max: 16,
        }
    }
}

impl BoundaryLayout {
    pub fn in_band(&self, cube_y: i32) -> bool {
        cube_y >= self.band_min && cube_y < self.band_max
    }

    /// The cube whose floor meets the ceiling of the band's lowest cube
    pub fn is_connector_cube(&self, cube_y: i32) -> bool {
        cube_y == self.band_min + 1
    }

    /// Cubes that receive the raw carvers directly
    pub fn is_carved_cube(&self, cube_y: i32) -> bool {
        !self.in_band(cube_y) || cube_y == self.band_min || cube_y == self.band_max - 1
    }

    pub fn validate(&self) -> Result<()> {
        // Lowest cube, connector cube, and a top edge cube
        if self.band_max - self.band_min < 3 {
            return Err(GenerationError::InvalidConfig(format!(
                "band {}..{} must span at least 3 cubes",
                self.band_min, self.band_max
            )));
        }
        Ok(())
    }
}

/// Generates cubes for one world.
pub struct CubePipeline {
    world: WorldContext,
    base: Arc<dyn BaseTerrain>,
    carvers: Vec<Arc<dyn CubicStructureGenerator>>,
    connector: CaveConnector,
    layout: BoundaryLayout,
}

impl CubePipeline {
    pub fn new(
        world: WorldContext,
        base: Arc<dyn BaseTerrain>,
        carvers: Vec<Arc<dyn CubicStructureGenerator>>,
        connector_params: ConnectorParams,
        layout: BoundaryLayout,
    ) -> Self {
        let connector = CaveConnector::new(carvers.clone(), connector_params);
        Self {
            world,
            base,
            carvers,
            connector,
            layout,
        }
    }

    /// Build the pipeline described by a validated configuration.
    pub fn from_config(world_seed: u64, config: &WorldGenConfig) -> Result<Self> {
        config.validate()?;
        let carvers = build_carvers(world_seed, &config.caves, &config.ravines);
        Ok(Self::new(
            WorldContext::new(world_seed),
            Arc::new(config.terrain.clone()),
            carvers,
            config.connector,
            config.layout,
        ))
    }

    /// Rebuild carvers and connector after the configuration changed.
    pub fn reload(&mut self, config: &WorldGenConfig) -> Result<()> {
        *self = Self::from_config(self.world.seed, config)?;
        Ok(())
    }

    pub fn world(&self) -> &WorldContext {
        &self.world
    }

    pub fn layout(&self) -> &BoundaryLayout {
        &self.layout
    }

    pub fn connector(&self) -> &CaveConnector {
        &self.connector
    }

    /// Generate a single cube.
    ///
    /// Base terrain and raw carver failures fail the cube. A connector failure
    /// only skips the connection; the cube keeps its base content.
    pub fn generate_cube(&self, pos: CubePos) -> Result<CubePrimer> {
        self.generate_cube_observed(pos, &mut NoopObserver)
            .map(|(primer, _)| primer)
    }

    /// Same as [`CubePipeline::generate_cube`], reporting connector progress
    /// to `observer` and returning the connection summary if one ran.
    pub fn generate_cube_observed(
        &self,
        pos: CubePos,
        observer: &mut dyn ConnectorObserver,
    ) -> Result<(CubePrimer, Option<ConnectionSummary>)> {
        let mut primer = self.base.generate_base(&self.world, pos)?;

        if self.layout.is_carved_cube(pos.y) {
            for carver in &self.carvers {
                carver.generate(&self.world, &mut primer, pos)?;
            }
        }

        let summary = if self.layout.is_connector_cube(pos.y) {
            self.apply_connector(&mut primer, pos, observer)
        } else {
            None
        };

        Ok((primer, summary))
    }

    /// Run the connector on `primer`, logging and swallowing failures.
    fn apply_connector(
        &self,
        primer: &mut CubePrimer,
        pos: CubePos,
        observer: &mut dyn ConnectorObserver,
    ) -> Option<ConnectionSummary> {
        match self.connector.connect_observed(&self.world, primer, pos, observer) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(%pos, error = %e, "cave connection skipped");
                None
            }
        }
    }

    /// Generate many cubes in parallel, results in input order.
    pub fn generate_cubes(&self, positions: &[CubePos]) -> Vec<(CubePos, Result<CubePrimer>)> {
        debug!(count = positions.len(), "generating cubes");
        positions
            .par_iter()
            .map(|&pos| (pos, self.generate_cube(pos)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carvers::FnCarver;
    use crate::cube::CUBE_MAX;

    fn pipeline_with(carvers: Vec<Arc<dyn CubicStructureGenerator>>) -> CubePipeline {
        CubePipeline::new(
            WorldContext::new(11),
            Arc::new(LayeredTerrain::default()),
            carvers,
            ConnectorParams::debug_marker(),
            BoundaryLayout::default(),
        )
    }

    #[test]
    fn test_layout_roles() {
        let layout = BoundaryLayout::default();
        assert!(layout.is_carved_cube(-1));
        assert!(layout.is_carved_cube(0));
        assert!(layout.is_connector_cube(1));
        assert!(!layout.is_carved_cube(1));
        assert!(!layout.is_carved_cube(7));
        assert!(layout.is_carved_cube(15));
        assert!(layout.is_carved_cube(16));
        assert!(!layout.is_connector_cube(0));
        assert!(layout.validate().is_ok());
        assert!(BoundaryLayout { band_min: 0, band_max: 2 }.validate().is_err());
    }

    #[test]
    fn test_layered_terrain() {
        let terrain = LayeredTerrain { surface_block_y: 20, dirt_depth: 2 };
        let primer = terrain.generate_base(&WorldContext::new(0), CubePos::new(0, 1, 0)).unwrap();

        // World y 16..=18 stone, 19..=20 dirt, 21.. air
        assert_eq!(primer.get(0, 2, 0), BlockState::STONE);
        assert_eq!(primer.get(0, 3, 0), BlockState::DIRT);
        assert_eq!(primer.get(0, 4, 0), BlockState::DIRT);
        assert_eq!(primer.get(0, 5, 0), BlockState::AIR);
    }

    #[test]
    fn test_connector_failure_keeps_base_cube() {
        // Fails whenever asked for the band's lowest cube
        let flaky: Arc<dyn CubicStructureGenerator> = Arc::new(FnCarver::new("flaky", |_, _, pos| {
            if pos.y == 0 {
                Err(GenerationError::Carver {
                    generator: "flaky".to_string(),
                    pos,
                    reason: "simulated".to_string(),
                })
            } else {
                Ok(())
            }
        }));
        let pipeline = pipeline_with(vec![flaky]);
        let pos = CubePos::new(0, 1, 0);

        let (cube, summary) = pipeline.generate_cube_observed(pos, &mut NoopObserver).unwrap();
        assert!(summary.is_none());
        let base = LayeredTerrain::default().generate_base(pipeline.world(), pos).unwrap();
        assert_eq!(cube, base);

        // The lowest cube itself runs the carver directly and fails
        assert!(pipeline.generate_cube(CubePos::new(0, 0, 0)).is_err());
        // Neighbors are unaffected
        assert!(pipeline.generate_cube(CubePos::new(0, 2, 0)).is_ok());
    }

    #[test]
    fn test_connector_runs_only_on_boundary_cube() {
        // Cube 0 is fully hollow, so the connector has a full-width region
        let hollow: Arc<dyn CubicStructureGenerator> = Arc::new(FnCarver::new("hollow", |_, primer, pos| {
            if pos.y == 0 {
                primer.fill(BlockState::AIR);
            }
            Ok(())
        }));
        let pipeline = pipeline_with(vec![hollow]);

        let (connected, summary) = pipeline
            .generate_cube_observed(CubePos::new(0, 1, 0), &mut NoopObserver)
            .unwrap();
        assert!(connected.count(|b| b == BlockState::GLASS) > 0);
        assert_eq!(summary.unwrap().max_y, CUBE_MAX);

        let inner = pipeline.generate_cube(CubePos::new(0, 2, 0)).unwrap();
        assert_eq!(inner.count(|b| b == BlockState::GLASS), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = WorldGenConfig::default();
        let pipeline = CubePipeline::from_config(2718, &config).unwrap();
        let mut positions = CubePos::new(0, 1, 0).horizontal_neighborhood(2);
        positions.extend(CubePos::new(0, 0, 0).horizontal_neighborhood(1));

        let parallel = pipeline.generate_cubes(&positions);
        assert_eq!(parallel.len(), positions.len());

        for (pos, result) in parallel {
            let sequential = pipeline.generate_cube(pos).unwrap();
            assert!(result.unwrap() == sequential, "cube {} differs", pos);
        }
    }

    #[test]
    fn test_reload_swaps_configuration() {
        let mut pipeline = CubePipeline::from_config(5, &WorldGenConfig::default()).unwrap();
        assert_eq!(pipeline.connector().generators().len(), 2);

        let mut config = WorldGenConfig::default();
        config.ravines.enabled = false;
        pipeline.reload(&config).unwrap();
        assert_eq!(pipeline.connector().generators().len(), 1);
        assert_eq!(pipeline.world().seed, 5);
    }
}
