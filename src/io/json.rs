use anyhow::{anyhow, Context, Result};
use geo::Point;
use serde_json::{json, Value};

use crate::graph::AdjacencyGraph;
use crate::propagate::PropagationResult;
use crate::types::ScoreTable;

/// Read a score table from a JSON object `{ "<sensor id>": score, ... }`.
pub fn read_scores(bytes: &[u8]) -> Result<ScoreTable> {
    serde_json::from_slice(bytes).context("failed to parse score table")
}

/// Read query points from a JSON array of `[x, y]` pairs.
pub fn read_points(bytes: &[u8]) -> Result<Vec<Point<f64>>> {
    let pairs: Vec<[f64; 2]> = serde_json::from_slice(bytes)
        .with_context(|| anyhow!("query points must be a JSON array of [x, y] pairs"))?;
    Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
}

/// Adjacency lists as `{ "<sensor id>": [neighbor ids...] }`.
pub fn adjacency_to_json(graph: &AdjacencyGraph) -> Value {
    json!(graph.to_lists())
}

pub fn results_to_json(results: &[PropagationResult]) -> Value {
    Value::Array(results.iter()
        .map(|r| json!({
            "point": [r.point.x(), r.point.y()],
            "zone": r.zone,
            "base": r.base,
            "direct": r.direct,
            "second_order": r.second_order,
            "layers": r.layers,
            "total": r.total,
            "approximated": r.is_approximated(),
            "lookup_approximated": r.lookup_approximated,
            "zone_approximated": r.zone_approximated,
        }))
        .collect())
}
