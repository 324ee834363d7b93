use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

/// Identifies a sensor (camera) across a run. Zones, adjacency rows and
/// score entries are all keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub u32);

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed sensor with a position in geographic (lon/lat) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub position: Point<f64>,
}

impl Sensor {
    pub fn new(id: u32, name: impl Into<String>, position: Point<f64>) -> Self {
        Self { id: SensorId(id), name: name.into(), position }
    }
}
