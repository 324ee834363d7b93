pub mod propagate;
pub mod zones;
