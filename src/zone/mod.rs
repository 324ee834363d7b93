mod partition;
mod voronoi;
mod zone;

pub use partition::ZonePartitioner;
pub use zone::{Approximation, Zone};
