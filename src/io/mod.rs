//! File formats: GeoJSON for street, sensor and zone geometry; plain JSON
//! for scores, query points, adjacency lists and propagation results.

mod file;
mod geojson;
mod json;

pub use file::{read_file, write_atomic, write_json};
pub use geojson::{corridor_to_geojson, read_sensors, read_streets, walkable_to_geojson, zones_to_geojson};
pub use json::{adjacency_to_json, read_points, read_scores, results_to_json};
