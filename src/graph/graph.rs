use std::collections::BTreeMap;

use ahash::AHashMap;
use anyhow::{bail, Result};

use crate::types::SensorId;
use crate::ConfigError;

/// An undirected graph over sensors in compressed sparse row format.
///
/// Nodes are numbered by position in `ids`; every neighbor row is sorted
/// and free of duplicates and self-loops, and the relation is symmetric.
#[derive(Debug, Default, Clone)]
pub struct AdjacencyGraph {
    ids: Vec<SensorId>,
    index: AHashMap<SensorId, u32>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl AdjacencyGraph {
    /// Construct a graph from per-node neighbor lists.
    ///
    /// Rows are sorted and deduplicated; `rows` must already be symmetric.
    pub(crate) fn new(ids: Vec<SensorId>, mut rows: Vec<Vec<u32>>) -> Result<Self> {
        assert!(rows.len() == ids.len(), "rows.len() must equal ids.len()");

        let mut index = AHashMap::with_capacity(ids.len());
        for (i, &id) in ids.iter().enumerate() {
            if index.insert(id, i as u32).is_some() { bail!(ConfigError::DuplicateSensorId(id)) }
        }

        for (i, row) in rows.iter_mut().enumerate() {
            row.retain(|&j| j as usize != i);
            row.sort_unstable();
            row.dedup();
        }

        Ok(Self {
            offsets: std::iter::once(0u32).chain(
                rows.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: rows.into_iter().flatten().collect(),
            ids,
            index,
        })
    }

    /// Build from an explicit list of undirected edges between known sensors.
    pub fn from_edges(ids: &[SensorId], edges: &[(SensorId, SensorId)]) -> Result<Self> {
        let mut index = AHashMap::with_capacity(ids.len());
        for (i, &id) in ids.iter().enumerate() { index.entry(id).or_insert(i as u32); }

        let mut rows = vec![Vec::new(); ids.len()];
        for &(a, b) in edges {
            let Some(&i) = index.get(&a) else { bail!(ConfigError::UnknownSensor(a)) };
            let Some(&j) = index.get(&b) else { bail!(ConfigError::UnknownSensor(b)) };
            rows[i as usize].push(j);
            rows[j as usize].push(i);
        }

        Self::new(ids.to_vec(), rows)
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() / 2 }

    /// Sensor ids in node order.
    #[inline] pub fn ids(&self) -> &[SensorId] { &self.ids }

    /// Node index of a sensor.
    #[inline] pub fn index_of(&self, id: SensorId) -> Option<usize> { self.index.get(&id).map(|&i| i as usize) }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub(crate) fn degree_of(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub(crate) fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Number of neighbors of a sensor (0 if unknown).
    pub fn degree(&self, id: SensorId) -> usize {
        self.index_of(id).map_or(0, |node| self.degree_of(node))
    }

    /// Neighbors of a sensor in ascending node order (empty if unknown).
    pub fn neighbors(&self, id: SensorId) -> impl Iterator<Item = SensorId> + '_ {
        self.index_of(id).into_iter()
            .flat_map(move |node| self.edges(node))
            .map(move |j| self.ids[j])
    }

    pub fn are_adjacent(&self, a: SensorId, b: SensorId) -> bool {
        let (Some(i), Some(j)) = (self.index_of(a), self.index_of(b)) else { return false };
        self.edges[self.range(i)].binary_search(&(j as u32)).is_ok()
    }

    /// Adjacency lists keyed by sensor id, neighbors sorted by id.
    pub fn to_lists(&self) -> BTreeMap<SensorId, Vec<SensorId>> {
        self.ids.iter().enumerate()
            .map(|(node, &id)| {
                let mut row = self.edges(node).map(|j| self.ids[j]).collect::<Vec<_>>();
                row.sort_unstable();
                (id, row)
            })
            .collect()
    }
}
