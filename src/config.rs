use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::{coord, Rect};
use serde::{Deserialize, Serialize};

use crate::corridor::{compile_rules, CornerRule};
use crate::graph::AdjacencyMode;
use crate::propagate::DecayWeights;
use crate::zone::ZonePartitioner;
use crate::ConfigError;

/// Settings for one run, usually read from a JSON file. Every section and
/// field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corridor: CorridorConfig,

    #[serde(default)]
    pub walkable: WalkableConfig,

    #[serde(default)]
    pub partition: PartitionConfig,

    #[serde(default)]
    pub adjacency: AdjacencyConfig,

    #[serde(default)]
    pub propagation: PropagationConfig,
}

/// How the four corridor corners are found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorridorConfig {
    /// Rough `[min_x, min_y, max_x, max_y]` box; only streets meeting it are
    /// considered. Required.
    #[serde(default)]
    pub search: Option<[f64; 4]>,

    /// Growth of the corner bounding box on every side, in coordinate units.
    #[serde(default = "default_margin")]
    pub margin: f64,

    /// One rule per corner.
    #[serde(default)]
    pub corners: Vec<CornerRule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkableConfig {
    /// Clip zones to buffered streets; when false zones cover the whole corridor.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Buffer distance around each centerline, in metres.
    #[serde(default = "default_buffer_width")]
    pub buffer_width: f64,

    /// Only streets tagged with one of these boroughs (case-insensitive).
    #[serde(default)]
    pub boroughs: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Radius of the stand-in zone for sensors whose cell clips to nothing, in metres.
    #[serde(default = "default_fallback_radius")]
    pub fallback_radius: f64,

    /// Zone vertices closer than this (metres) are merged.
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyConfig {
    #[serde(default)]
    pub mode: AdjacencyMode,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Per-hop weights after the owning zone, e.g. `[0.5, 0.25]`.
    #[serde(default)]
    pub weights: DecayWeights,
}

fn default_margin() -> f64 { 0.0005 }

fn default_true() -> bool { true }

fn default_buffer_width() -> f64 { 10.0 }

fn default_fallback_radius() -> f64 { ZonePartitioner::DEFAULT_FALLBACK_RADIUS }

fn default_snap_tolerance() -> f64 { ZonePartitioner::DEFAULT_SNAP_TOLERANCE }

impl Default for CorridorConfig {
    fn default() -> Self {
        Self { search: None, margin: default_margin(), corners: Vec::new() }
    }
}

impl Default for WalkableConfig {
    fn default() -> Self {
        Self { enabled: true, buffer_width: default_buffer_width(), boroughs: None }
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { fallback_radius: default_fallback_radius(), snap_tolerance: default_snap_tolerance() }
    }
}

impl CorridorConfig {
    /// The search box as a rectangle; fails when it is missing or inverted.
    pub fn search_rect(&self) -> Result<Rect<f64>> {
        let Some([min_x, min_y, max_x, max_y]) = self.search else {
            bail!(ConfigError::InvalidParameter {
                name: "corridor.search",
                reason: "a rough [min_x, min_y, max_x, max_y] search box is required".into(),
            });
        };
        if !(min_x <= max_x && min_y <= max_y) {
            bail!(ConfigError::InvalidParameter {
                name: "corridor.search",
                reason: format!("[{min_x}, {min_y}, {max_x}, {max_y}] is not min-then-max"),
            });
        }
        Ok(Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y }))
    }
}

impl Config {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| anyhow!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| anyhow!("in config {}", path.display()))
    }

    /// Check every setting that can be checked before touching any data.
    pub fn validate(&self) -> Result<()> {
        compile_rules(&self.corridor.corners)?;

        if !(self.corridor.margin >= 0.0 && self.corridor.margin.is_finite()) {
            bail!(ConfigError::InvalidParameter {
                name: "corridor.margin",
                reason: format!("{} is not a non-negative distance", self.corridor.margin),
            });
        }
        self.corridor.search_rect()?;
        if self.walkable.enabled && !(self.walkable.buffer_width > 0.0 && self.walkable.buffer_width.is_finite()) {
            bail!(ConfigError::InvalidBufferWidth(self.walkable.buffer_width));
        }
        if !(self.partition.fallback_radius > 0.0 && self.partition.fallback_radius.is_finite()) {
            bail!(ConfigError::InvalidParameter {
                name: "partition.fallback_radius",
                reason: format!("{} is not a positive distance", self.partition.fallback_radius),
            });
        }
        if !(self.partition.snap_tolerance >= 0.0 && self.partition.snap_tolerance.is_finite()) {
            bail!(ConfigError::InvalidParameter {
                name: "partition.snap_tolerance",
                reason: format!("{} is not a non-negative distance", self.partition.snap_tolerance),
            });
        }
        Ok(())
    }
}
