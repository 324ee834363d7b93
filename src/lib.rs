#![doc = "Zonal public API: sensor influence zones and stress propagation over a street corridor"]
mod config;
mod corridor;
mod error;
mod geom;
mod graph;
mod propagate;
mod types;
mod walkable;
mod zone;
mod zonemap;

pub mod io;

#[doc(inline)]
pub use error::ConfigError;

#[doc(inline)]
pub use types::{ScoreTable, Sensor, SensorId, StreetSegment};

#[doc(inline)]
pub use config::{AdjacencyConfig, Config, CorridorConfig, PartitionConfig, PropagationConfig, WalkableConfig};

#[doc(inline)]
pub use corridor::{compile_rules, resolve_corridor, Corner, CornerPredicate, CornerRule, CorridorBounds, NamePattern};

#[doc(inline)]
pub use walkable::{select_streets, WalkableArea};

#[doc(inline)]
pub use zone::{Approximation, Zone, ZonePartitioner};

#[doc(inline)]
pub use graph::{AdjacencyGraph, AdjacencyMode};

#[doc(inline)]
pub use propagate::{DecayWeights, PropagationResult, StressPropagationEngine};

#[doc(inline)]
pub use zonemap::ZoneMap;

#[doc(inline)]
pub use geom::Projection;
