mod adjacency;
mod graph;

pub use adjacency::AdjacencyMode;
pub use graph::AdjacencyGraph;
