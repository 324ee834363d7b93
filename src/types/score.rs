use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SensorId;

/// Externally supplied stress scores, keyed by sensor. Missing entries count as 0.
///
/// The table is independent of the zone geometry: it can be swapped out between
/// queries without rebuilding zones or adjacency.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    scores: BTreeMap<SensorId, f64>,
}

impl ScoreTable {
    pub fn new() -> Self { Self::default() }

    /// Score for `sensor`, or 0 when the table has no entry for it.
    #[inline]
    pub fn get(&self, sensor: SensorId) -> f64 {
        self.scores.get(&sensor).copied().unwrap_or(0.0)
    }

    #[inline] pub fn insert(&mut self, sensor: SensorId, score: f64) -> Option<f64> { self.scores.insert(sensor, score) }

    #[inline] pub fn len(&self) -> usize { self.scores.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.scores.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (SensorId, f64)> + '_ {
        self.scores.iter().map(|(&id, &score)| (id, score))
    }
}

impl FromIterator<(SensorId, f64)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (SensorId, f64)>>(iter: I) -> Self {
        Self { scores: iter.into_iter().collect() }
    }
}
