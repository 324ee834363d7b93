use anyhow::{Context, Result};
use geo::Point;
use tracing::info;

use crate::config::Config;
use crate::corridor::{compile_rules, resolve_corridor, CorridorBounds};
use crate::graph::AdjacencyGraph;
use crate::propagate::{PropagationResult, StressPropagationEngine};
use crate::types::{ScoreTable, Sensor, StreetSegment};
use crate::walkable::{select_streets, WalkableArea};
use crate::zone::{Zone, ZonePartitioner};

/// Everything derived from one street network and sensor set: the corridor,
/// its walkable ground, the sensor zones and their adjacency.
///
/// Scores are not part of the map; any [`ScoreTable`] can be evaluated
/// against it. A changed sensor set needs a fresh [`ZoneMap::build`].
#[derive(Debug)]
pub struct ZoneMap {
    corridor: CorridorBounds,
    walkable: Option<WalkableArea>,
    engine: StressPropagationEngine,
}

impl ZoneMap {
    /// Run corridor resolution, walkable-area construction, partitioning and
    /// adjacency in order.
    pub fn build(streets: &[StreetSegment], sensors: &[Sensor], config: &Config) -> Result<Self> {
        config.validate()?;

        let predicates = compile_rules(&config.corridor.corners)?;
        let corridor = resolve_corridor(streets, &predicates, config.corridor.search_rect()?, config.corridor.margin)
            .context("failed to resolve corridor")?;

        let walkable = if config.walkable.enabled {
            let selected = select_streets(streets, corridor.extent(), config.walkable.boroughs.as_deref());
            Some(WalkableArea::build(selected, config.walkable.buffer_width).context("failed to build walkable area")?)
        } else {
            None
        };

        let bounds = corridor.polygon();
        let mut partitioner = ZonePartitioner::new(&bounds)
            .with_fallback_radius(config.partition.fallback_radius)
            .with_snap_tolerance(config.partition.snap_tolerance);
        if let Some(walkable) = &walkable { partitioner = partitioner.with_walkable(walkable) }
        let zones = partitioner.partition(sensors).context("failed to partition sensor zones")?;

        let graph = AdjacencyGraph::from_zones(&zones, config.adjacency.mode)?;
        let engine = StressPropagationEngine::new(zones, graph, config.propagation.weights.clone())?;

        info!(
            sensors = sensors.len(),
            edges = engine.graph().edge_count(),
            walkable = walkable.is_some(),
            "built zone map"
        );

        Ok(Self { corridor, walkable, engine })
    }

    #[inline] pub fn corridor(&self) -> &CorridorBounds { &self.corridor }

    #[inline] pub fn walkable(&self) -> Option<&WalkableArea> { self.walkable.as_ref() }

    /// Zones in sensor input order.
    #[inline] pub fn zones(&self) -> &[Zone] { self.engine.zones() }

    #[inline] pub fn graph(&self) -> &AdjacencyGraph { self.engine.graph() }

    #[inline] pub fn engine(&self) -> &StressPropagationEngine { &self.engine }

    #[inline]
    pub fn propagate(&self, scores: &ScoreTable, point: Point<f64>) -> PropagationResult {
        self.engine.propagate(scores, point)
    }

    #[inline]
    pub fn propagate_all(&self, scores: &ScoreTable, points: &[Point<f64>]) -> Vec<PropagationResult> {
        self.engine.propagate_all(scores, points)
    }
}
