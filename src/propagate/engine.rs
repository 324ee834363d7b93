use std::collections::VecDeque;

use anyhow::{bail, Result};
use geo::{BoundingRect, Intersects, Point, Rect};
use rayon::prelude::*;
use rstar::RTree;
use tracing::{debug, warn};

use crate::geom::{envelope, BoundingBox};
use crate::graph::AdjacencyGraph;
use crate::propagate::DecayWeights;
use crate::types::{ScoreTable, SensorId};
use crate::zone::Zone;
use crate::ConfigError;

/// Score breakdown at one query point.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationResult {
    pub point: Point<f64>,
    /// Sensor owning the zone the point resolved to.
    pub zone: SensorId,
    pub base: f64,
    pub direct: f64,
    pub second_order: f64,
    /// Weighted sum per hop distance; `layers[0]` is `base`.
    pub layers: Vec<f64>,
    pub total: f64,
    /// No zone contained the point; the nearest zone by centroid was used.
    pub lookup_approximated: bool,
    /// The resolved zone itself is approximated.
    pub zone_approximated: bool,
}

impl PropagationResult {
    #[inline] pub fn is_approximated(&self) -> bool { self.lookup_approximated || self.zone_approximated }
}

/// Spreads per-sensor scores across the zone adjacency graph with
/// per-hop decay.
#[derive(Debug)]
pub struct StressPropagationEngine {
    zones: Vec<Zone>,
    graph: AdjacencyGraph,
    weights: DecayWeights,
    nodes: Vec<usize>, // graph node of each zone
    centroids: Vec<Option<Point<f64>>>,
    tree: RTree<BoundingBox>,
}

impl StressPropagationEngine {
    /// Every zone's sensor must be a node of `graph`.
    pub fn new(zones: Vec<Zone>, graph: AdjacencyGraph, weights: DecayWeights) -> Result<Self> {
        if zones.is_empty() { bail!("cannot propagate over an empty zone set") }

        let nodes = zones.iter()
            .map(|zone| graph.index_of(zone.sensor()).ok_or(ConfigError::UnknownSensor(zone.sensor())))
            .collect::<Result<Vec<_>, _>>()?;

        let centroids = zones.iter().map(Zone::centroid).collect::<Vec<_>>();
        let tree = BoundingBox::index(zones.iter().enumerate()
            .filter_map(|(i, zone)| zone.polygon().bounding_rect().map(|rect| (i, rect))));

        Ok(Self { zones, graph, weights, nodes, centroids, tree })
    }

    #[inline] pub fn zones(&self) -> &[Zone] { &self.zones }

    #[inline] pub fn graph(&self) -> &AdjacencyGraph { &self.graph }

    #[inline] pub fn weights(&self) -> &DecayWeights { &self.weights }

    /// Index of the zone covering `point` (boundary included, lowest index
    /// wins), or of the zone with the nearest centroid when none does. The
    /// flag is set in the second case.
    pub fn locate(&self, point: &Point<f64>) -> (usize, bool) {
        let rect = Rect::new(point.0, point.0);
        let mut candidates = self.tree.locate_in_envelope_intersecting(&envelope(&rect, 0.0))
            .map(|b| b.idx())
            .collect::<Vec<_>>();
        candidates.sort_unstable();

        if let Some(&i) = candidates.iter().find(|&&i| self.zones[i].polygon().intersects(point)) {
            return (i, false)
        }

        // Equirectangular distance is enough to rank centroids within a corridor.
        let scale = point.y().to_radians().cos();
        let nearest = self.centroids.iter().enumerate()
            .filter_map(|(i, c)| c.map(|c| {
                let (dx, dy) = ((c.x() - point.x()) * scale, c.y() - point.y());
                (i, dx * dx + dy * dy)
            }))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(i, _)| i);

        warn!(x = point.x(), y = point.y(), zone = %self.zones[nearest].sensor(), "point is outside every zone; using nearest centroid");
        (nearest, true)
    }

    /// Decomposed propagated score at `point`.
    pub fn propagate(&self, scores: &ScoreTable, point: Point<f64>) -> PropagationResult {
        let (zone, lookup_approximated) = self.locate(&point);
        let layers = weighted_bfs(&self.graph, self.nodes[zone], &self.weights, |node| scores.get(self.graph.ids()[node]));
        let layer = |hop: usize| layers.get(hop).copied().unwrap_or(0.0);

        let result = PropagationResult {
            point,
            zone: self.zones[zone].sensor(),
            base: layer(0),
            direct: layer(1),
            second_order: layer(2),
            total: layers.iter().sum(),
            layers,
            lookup_approximated,
            zone_approximated: self.zones[zone].is_approximated(),
        };
        debug!(zone = %result.zone, total = result.total, "propagated score");
        result
    }

    /// [`propagate`](Self::propagate) over many points in parallel; output
    /// order matches `points`.
    pub fn propagate_all(&self, scores: &ScoreTable, points: &[Point<f64>]) -> Vec<PropagationResult> {
        points.par_iter().map(|&point| self.propagate(scores, point)).collect()
    }
}

/// Breadth-first traversal from `start` out to `weights.depth()` hops,
/// returning for each hop distance the sum of `value(node) * weight(hop)`.
/// Every node counts once, at its shortest hop distance.
pub(crate) fn weighted_bfs(
    graph: &AdjacencyGraph,
    start: usize,
    weights: &DecayWeights,
    value: impl Fn(usize) -> f64,
) -> Vec<f64> {
    let depth = weights.depth();
    let mut layers = vec![0.0; depth + 1];
    let mut hops = vec![usize::MAX; graph.len()];
    hops[start] = 0;

    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        layers[hops[u]] += value(u) * weights.at(hops[u]);
        if hops[u] == depth { continue }
        for v in graph.edges(u) {
            if hops[v] == usize::MAX {
                hops[v] = hops[u] + 1;
                queue.push_back(v);
            }
        }
    }
    layers
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    /// Row of unit squares 0 | 1 | 2 | 3 with a chain graph.
    fn row(n: u32) -> (Vec<Zone>, AdjacencyGraph) {
        let zones = (0..n)
            .map(|i| {
                let x = i as f64;
                Zone::new(SensorId(i), polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0)], 1.0, None)
            })
            .collect::<Vec<_>>();
        let ids = zones.iter().map(Zone::sensor).collect::<Vec<_>>();
        let edges = (1..n).map(|i| (SensorId(i - 1), SensorId(i))).collect::<Vec<_>>();
        (zones, AdjacencyGraph::from_edges(&ids, &edges).unwrap())
    }

    #[test]
    fn second_order_only_from_two_hops_away() {
        let (zones, graph) = row(3);
        let engine = StressPropagationEngine::new(zones, graph, DecayWeights::default()).unwrap();
        let scores = ScoreTable::from_iter([(SensorId(0), 10.0), (SensorId(1), 0.0), (SensorId(2), 0.0)]);

        let result = engine.propagate(&scores, Point::new(2.5, 0.5));
        assert_eq!(result.zone, SensorId(2));
        assert_eq!(result.base, 0.0);
        assert_eq!(result.direct, 0.0);
        assert_eq!(result.second_order, 2.5);
        assert_eq!(result.total, 2.5);
        assert!(!result.is_approximated());
    }

    #[test]
    fn nodes_are_counted_once_at_shortest_distance() {
        // Triangle 0-1-2: from 0 both others are direct, nothing is second order.
        let (zones, _) = row(3);
        let graph = AdjacencyGraph::from_edges(
            &[SensorId(0), SensorId(1), SensorId(2)],
            &[(SensorId(0), SensorId(1)), (SensorId(1), SensorId(2)), (SensorId(0), SensorId(2))],
        ).unwrap();
        let engine = StressPropagationEngine::new(zones, graph, DecayWeights::default()).unwrap();
        let scores = ScoreTable::from_iter([(SensorId(0), 1.0), (SensorId(1), 2.0), (SensorId(2), 4.0)]);

        let result = engine.propagate(&scores, Point::new(0.5, 0.5));
        assert_eq!(result.base, 1.0);
        assert_eq!(result.direct, 3.0);
        assert_eq!(result.second_order, 0.0);
        assert_eq!(result.total, 4.0);
    }

    #[test]
    fn deeper_weights_add_layers() {
        let (zones, graph) = row(4);
        let weights = DecayWeights::new(vec![0.5, 0.25, 0.125]).unwrap();
        let engine = StressPropagationEngine::new(zones, graph, weights).unwrap();
        let scores = ScoreTable::from_iter([(SensorId(3), 8.0)]);

        let result = engine.propagate(&scores, Point::new(0.5, 0.5));
        assert_eq!(result.layers, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(result.total, 1.0);
    }

    #[test]
    fn outside_point_falls_back_to_nearest_centroid() {
        let (zones, graph) = row(3);
        let engine = StressPropagationEngine::new(zones, graph, DecayWeights::default()).unwrap();

        let result = engine.propagate(&ScoreTable::new(), Point::new(3.4, 5.0));
        assert_eq!(result.zone, SensorId(2));
        assert!(result.lookup_approximated);
        assert!(!result.zone_approximated);
    }

    #[test]
    fn shared_boundary_goes_to_lowest_zone() {
        let (zones, graph) = row(2);
        let engine = StressPropagationEngine::new(zones, graph, DecayWeights::default()).unwrap();
        assert_eq!(engine.locate(&Point::new(1.0, 0.5)), (0, false));
    }

    #[test]
    fn batch_matches_single_queries() {
        let (zones, graph) = row(4);
        let engine = StressPropagationEngine::new(zones, graph, DecayWeights::default()).unwrap();
        let scores = ScoreTable::from_iter([(SensorId(0), 1.0), (SensorId(1), 2.0), (SensorId(2), 3.0), (SensorId(3), 4.0)]);
        let points = (0..40).map(|i| Point::new(i as f64 * 0.1, 0.5)).collect::<Vec<_>>();

        let batch = engine.propagate_all(&scores, &points);
        assert_eq!(batch.len(), points.len());
        for (result, &point) in batch.iter().zip(&points) {
            assert_eq!(result, &engine.propagate(&scores, point));
        }
    }

    #[test]
    fn zones_missing_from_graph_are_rejected() {
        let (zones, _) = row(2);
        let graph = AdjacencyGraph::from_edges(&[SensorId(0)], &[]).unwrap();
        let err = StressPropagationEngine::new(zones, graph, DecayWeights::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::UnknownSensor(SensorId(1))));
    }
}
