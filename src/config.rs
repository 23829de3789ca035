//! World generation configuration
//!
//! Groups the parameters of every generation stage. Serialized as JSON; any
//! field left out falls back to its default.

use serde::{Deserialize, Serialize};

use crate::carvers::{CaveParams, RavineParams};
use crate::connector::ConnectorParams;
use crate::error::{GenerationError, Result};
use crate::pipeline::{BoundaryLayout, LayeredTerrain};

/// Generation preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CavePreset {
    /// No raw caves; the connector has nothing to join
    None,
    /// Noise caves and ravines
    #[default]
    Normal,
    /// Larger, more frequent caves
    Hollow,
    /// Normal caves with a visible glass connector
    Debug,
}

impl CavePreset {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Normal, Self::Hollow, Self::Debug]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No caves",
            Self::Normal => "Noise caves and ravines",
            Self::Hollow => "Large, frequent caves",
            Self::Debug => "Glass connector for inspection",
        }
    }
}

impl std::fmt::Display for CavePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Normal => write!(f, "normal"),
            Self::Hollow => write!(f, "hollow"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

impl std::str::FromStr for CavePreset {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.to_string() == s.to_ascii_lowercase())
            .ok_or_else(|| GenerationError::InvalidConfig(format!("unknown preset '{}'", s)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub connector: ConnectorParams,
    pub caves: CaveParams,
    pub ravines: RavineParams,
    pub terrain: LayeredTerrain,
    pub layout: BoundaryLayout,
}

impl WorldGenConfig {
    pub fn from_preset(preset: CavePreset) -> Self {
        match preset {
            CavePreset::None => Self {
                caves: CaveParams { enabled: false, ..Default::default() },
                ravines: RavineParams { enabled: false, ..Default::default() },
                ..Default::default()
            },
            CavePreset::Normal => Self::default(),
            CavePreset::Hollow => Self {
                caves: CaveParams {
                    frequency: 0.03,
                    threshold: 0.15,
                    ..Default::default()
                },
                ravines: RavineParams {
                    mask_threshold: -0.2,
                    ..Default::default()
                },
                ..Default::default()
            },
            CavePreset::Debug => Self {
                connector: ConnectorParams::debug_marker(),
                ..Default::default()
            },
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.connector.validate()?;
        self.layout.validate()?;
        if self.caves.enabled && self.caves.frequency <= 0.0 {
            return Err(GenerationError::InvalidConfig("cave frequency must be positive".to_string()));
        }
        if self.ravines.enabled && self.ravines.width <= 0.0 {
            return Err(GenerationError::InvalidConfig("ravine width must be positive".to_string()));
        }
        Ok(())
    }
}
