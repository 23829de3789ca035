//! Observation hooks for the connector
//!
//! Lets callers inspect the depth grid and the working rectangle as the
//! connector runs, without the connector printing anything itself.

use serde::{Deserialize, Serialize};

use super::depth::{ColumnBounds, DepthGrid, DepthMap};
use super::erosion::LayerReport;
use super::ConnectionSummary;
use crate::cube::CubePos;

/// Receives connector state while a cube is being connected.
pub trait ConnectorObserver {
    /// Called once after the depth map of the cube below has been built.
    fn on_depth_map(&mut self, _pos: CubePos, _map: &DepthMap) {}

    /// Called after every layer with the eroded depth grid.
    fn on_layer(&mut self, _report: &LayerReport, _grid: &DepthGrid) {}

    /// Called once when the connector is done.
    fn on_finish(&mut self, _summary: &ConnectionSummary) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl ConnectorObserver for NoopObserver {}

/// Depth grid snapshot as rows along X
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub pos: CubePos,
    pub max_y: usize,
    pub bounds: Option<ColumnBounds>,
    pub grid: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    #[serde(flatten)]
    pub report: LayerReport,
    pub grid: Vec<Vec<u8>>,
}

/// Records every callback so a run can be inspected or exported afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayerRecorder {
    pub initial: Option<DepthSnapshot>,
    pub layers: Vec<LayerSnapshot>,
    pub summary: Option<ConnectionSummary>,
}

impl LayerRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ConnectorObserver for LayerRecorder {
    fn on_depth_map(&mut self, pos: CubePos, map: &DepthMap) {
        self.initial = Some(DepthSnapshot {
            pos,
            max_y: map.max_y,
            bounds: map.bounds,
            grid: map.grid.rows(),
        });
    }

    fn on_layer(&mut self, report: &LayerReport, grid: &DepthGrid) {
        self.layers.push(LayerSnapshot {
            report: report.clone(),
            grid: grid.rows(),
        });
    }

    fn on_finish(&mut self, summary: &ConnectionSummary) {
        self.summary = Some(summary.clone());
    }
}
