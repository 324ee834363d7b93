use anyhow::Result;
use geo::{BoundingRect, Polygon, Relate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geom::{envelope, BoundingBox};
use crate::graph::AdjacencyGraph;
use crate::zone::Zone;

/// DE-9IM pattern for "interiors disjoint, boundaries share a segment".
const ROOK_PATTERN: &str = "F***1****";

/// Which boundary contact makes two zones neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjacencyMode {
    /// Boundaries share a segment of positive length.
    #[default]
    Rook,
    /// Boundaries share at least one point.
    Queen,
}

impl AdjacencyMode {
    /// Whether two interior-disjoint polygons are neighbors under this mode.
    pub fn adjacent(self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        let matrix = a.relate(b);
        match self {
            AdjacencyMode::Rook => matrix.matches(ROOK_PATTERN).unwrap_or(false),
            AdjacencyMode::Queen => matrix.is_touches(),
        }
    }
}

impl AdjacencyGraph {
    /// Neighbor relation between zones, one node per zone in input order.
    ///
    /// Candidate pairs come from an R-tree over zone bounding boxes; the
    /// exact relation is decided by [`AdjacencyMode::adjacent`].
    pub fn from_zones(zones: &[Zone], mode: AdjacencyMode) -> Result<Self> {
        let rects = zones.iter()
            .map(|zone| zone.polygon().bounding_rect())
            .collect::<Vec<_>>();

        let tree = BoundingBox::index(rects.iter().enumerate()
            .filter_map(|(i, rect)| rect.map(|rect| (i, rect))));

        let mut rows = vec![Vec::new(); zones.len()];
        for (i, rect) in rects.iter().enumerate() {
            let Some(rect) = rect else { continue };
            for j in tree.locate_in_envelope_intersecting(&envelope(rect, 1e-9)).map(|b| b.idx()) {
                if j <= i { continue }
                if mode.adjacent(zones[i].polygon(), zones[j].polygon()) {
                    rows[i].push(j as u32);
                    rows[j].push(i as u32);
                }
            }
        }

        let graph = Self::new(zones.iter().map(Zone::sensor).collect(), rows)?;
        info!(zones = graph.len(), edges = graph.edge_count(), ?mode, "built zone adjacency");
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;
    use crate::types::SensorId;

    fn square(id: u32, x: f64, y: f64) -> Zone {
        let p = polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0)];
        Zone::new(SensorId(id), p, 1.0, None)
    }

    /// 2x2 grid: 0 1 on top, 2 3 below.
    fn grid() -> Vec<Zone> {
        vec![square(0, 0.0, 1.0), square(1, 1.0, 1.0), square(2, 0.0, 0.0), square(3, 1.0, 0.0)]
    }

    #[test]
    fn rook_ignores_diagonals() {
        let graph = AdjacencyGraph::from_zones(&grid(), AdjacencyMode::Rook).unwrap();
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.are_adjacent(SensorId(0), SensorId(1)));
        assert!(graph.are_adjacent(SensorId(0), SensorId(2)));
        assert!(!graph.are_adjacent(SensorId(0), SensorId(3)));
        assert!(!graph.are_adjacent(SensorId(1), SensorId(2)));
    }

    #[test]
    fn queen_includes_diagonals() {
        let graph = AdjacencyGraph::from_zones(&grid(), AdjacencyMode::Queen).unwrap();
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.are_adjacent(SensorId(0), SensorId(3)));
        assert!(graph.are_adjacent(SensorId(2), SensorId(1)));
    }

    #[test]
    fn separated_zones_are_not_neighbors() {
        let zones = vec![square(0, 0.0, 0.0), square(1, 1.5, 0.0)];
        let graph = AdjacencyGraph::from_zones(&zones, AdjacencyMode::Queen).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn overlapping_zones_are_not_neighbors() {
        let zones = vec![square(0, 0.0, 0.0), square(1, 0.5, 0.0)];
        assert!(!AdjacencyMode::Rook.adjacent(zones[0].polygon(), zones[1].polygon()));
        assert!(!AdjacencyMode::Queen.adjacent(zones[0].polygon(), zones[1].polygon()));
    }

    #[test]
    fn mode_deserializes_lowercase() {
        assert_eq!(serde_json::from_str::<AdjacencyMode>("\"queen\"").unwrap(), AdjacencyMode::Queen);
        assert_eq!(AdjacencyMode::default(), AdjacencyMode::Rook);
    }
}
