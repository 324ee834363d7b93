use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Per-hop decay weights for propagation. Entry `k - 1` weighs neighbors
/// exactly `k` hops from the owning zone; the owning zone itself always has
/// weight 1.
///
/// Weights are strictly decreasing and lie in (0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct DecayWeights(Vec<f64>);

impl DecayWeights {
    pub fn new(weights: Vec<f64>) -> Result<Self, ConfigError> {
        let in_range = weights.iter().all(|&w| w > 0.0 && w <= 1.0);
        let decreasing = weights.windows(2).all(|pair| pair[1] < pair[0]);
        if !(in_range && decreasing) { return Err(ConfigError::InvalidDecayWeights(weights)) }
        Ok(Self(weights))
    }

    /// Direct-neighbor and second-order weights.
    #[inline]
    pub fn two_hop(direct: f64, second_order: f64) -> Result<Self, ConfigError> {
        Self::new(vec![direct, second_order])
    }

    /// Number of hops beyond the owning zone.
    #[inline] pub fn depth(&self) -> usize { self.0.len() }

    /// Weight at hop distance `hop` (1 at the owning zone, 0 beyond the last hop).
    #[inline]
    pub fn at(&self, hop: usize) -> f64 {
        if hop == 0 { return 1.0 }
        self.0.get(hop - 1).copied().unwrap_or(0.0)
    }

    #[inline] pub fn as_slice(&self) -> &[f64] { &self.0 }
}

impl Default for DecayWeights {
    fn default() -> Self { Self(vec![0.5, 0.25]) }
}

impl TryFrom<Vec<f64>> for DecayWeights {
    type Error = ConfigError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> { Self::new(weights) }
}

impl From<DecayWeights> for Vec<f64> {
    fn from(weights: DecayWeights) -> Self { weights.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_half_then_quarter() {
        let weights = DecayWeights::default();
        assert_eq!(weights.as_slice(), &[0.5, 0.25]);
        assert_eq!(weights.at(0), 1.0);
        assert_eq!(weights.at(1), 0.5);
        assert_eq!(weights.at(2), 0.25);
        assert_eq!(weights.at(3), 0.0);
    }

    #[test]
    fn weights_must_decrease_strictly() {
        assert!(DecayWeights::two_hop(0.5, 0.5).is_err());
        assert!(DecayWeights::two_hop(0.25, 0.5).is_err());
        assert!(DecayWeights::new(vec![1.0, 0.5, 0.1]).is_ok());
    }

    #[test]
    fn weights_must_lie_in_unit_interval() {
        assert_eq!(
            DecayWeights::two_hop(1.5, 0.25),
            Err(ConfigError::InvalidDecayWeights(vec![1.5, 0.25]))
        );
        assert!(DecayWeights::two_hop(0.5, 0.0).is_err());
        assert!(DecayWeights::two_hop(f64::NAN, 0.25).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let weights: DecayWeights = serde_json::from_str("[0.6, 0.3, 0.1]").unwrap();
        assert_eq!(weights.depth(), 3);
        assert!(serde_json::from_str::<DecayWeights>("[0.3, 0.6]").is_err());
    }
}
