mod bbox;
mod polygon;
mod proj;
mod snap;

pub(crate) use bbox::{envelope, BoundingBox};
pub(crate) use polygon::{angular_sort, clip_to_rect, disk, largest_polygon};
pub use proj::Projection;
pub(crate) use snap::snap_polygons;
