mod engine;
mod weights;

pub use engine::{PropagationResult, StressPropagationEngine};
pub use weights::DecayWeights;
