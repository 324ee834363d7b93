use thiserror::Error;

use crate::corridor::Corner;
use crate::types::SensorId;

/// Structural problems with the inputs or configuration of a run.
///
/// These are always fatal: they are raised through `anyhow` and callers can
/// recover the typed value with `err.downcast_ref::<ConfigError>()`.
/// Geometric degeneracies are never reported here; they are recovered locally
/// and flagged `approximated` on the returned records instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("corridor needs exactly one predicate per corner, got {0}")]
    InvalidCornerPredicates(String),

    #[error("only {found} of 4 corridor corners resolved (missing: {missing:?})")]
    MissingCorners { found: usize, missing: Vec<Corner> },

    #[error("corridor corners {0} and {1} resolved to the same point")]
    DuplicateCorners(Corner, Corner),

    #[error("streets {first} and {second} satisfy both the {a} and {b} corner predicates")]
    CornerConflict { first: String, second: String, a: Corner, b: Corner },

    #[error("no street segments to build the walkable area from")]
    EmptyStreets,

    #[error("buffer width must be positive, got {0}")]
    InvalidBufferWidth(f64),

    #[error("partitioning needs at least 2 sensors, got {0}")]
    TooFewSensors(usize),

    #[error("sensor id {0} appears more than once")]
    DuplicateSensorId(SensorId),

    #[error("sensors {0} and {1} are at the same position (closer than the snap tolerance)")]
    DuplicateSensorPosition(SensorId, SensorId),

    #[error("decay weights must be strictly decreasing within (0, 1], got {0:?}")]
    InvalidDecayWeights(Vec<f64>),

    #[error("unknown sensor {0}")]
    UnknownSensor(SensorId),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
