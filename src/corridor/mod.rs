mod bounds;
mod predicate;
mod resolve;

pub use bounds::CorridorBounds;
pub use predicate::{compile_rules, Corner, CornerPredicate, CornerRule, NamePattern};
pub use resolve::resolve_corridor;
