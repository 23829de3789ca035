//! Cubic cave generation library
//!
//! Generates caves in a world of vertically stacked cubes and joins caves that
//! were carved independently in neighboring cubes.

pub mod ascii;
pub mod carvers;
pub mod config;
pub mod connector;
pub mod cube;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod primer;
pub mod seeds;

pub use carvers::{CubicStructureGenerator, WorldContext};
pub use config::{CavePreset, WorldGenConfig};
pub use connector::{CaveConnector, ConnectionSummary, ConnectorObserver, ConnectorParams, LayerRecorder};
pub use cube::{BlockState, CubePos, CUBE_MAX, CUBE_SIZE};
pub use error::GenerationError;
pub use pipeline::{BaseTerrain, BoundaryLayout, CubePipeline, LayeredTerrain};
pub use primer::CubePrimer;
