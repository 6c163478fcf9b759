//! In-memory view over the knowledge graph's edges.
//!
//! The graph is naturally cyclic (calls, imports can loop). We keep nodes in
//! an arena keyed by their stable [`EntityId`] and edges as plain
//! `(from, to, kind)` tuples with a secondary index by target — never as
//! owned back-pointers, so removing or re-deriving one side never leaves a
//! dangling reference on the other.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::model::{EntityId, EntityKind, GraphEdge};

/// A queryable view of graph edges, indexed for fast neighbor lookups in
/// both directions.
pub struct Graph {
    inner: StableDiGraph<(EntityId, EntityKind), GraphEdge>,
    index_of: HashMap<EntityId, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            index_of: HashMap::new(),
        }
    }

    fn node_index(&mut self, id: EntityId, kind: EntityKind) -> NodeIndex {
        if let Some(&idx) = self.index_of.get(&id) {
            return idx;
        }
        let idx = self.inner.add_node((id, kind));
        self.index_of.insert(id, idx);
        idx
    }

    /// Insert an edge, creating arena entries for its endpoints if needed.
    /// Every edge endpoint referenced here is guaranteed present in the
    /// arena — invariant (a) of the Knowledge Store.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        let from = self.node_index(edge.from.0, edge.from.1);
        let to = self.node_index(edge.to.0, edge.to.1);
        self.inner.add_edge(from, to, edge);
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of.contains_key(&id)
    }

    /// Outgoing edges from an entity, optionally filtered by kind.
    pub fn edges_from(&self, id: EntityId) -> impl Iterator<Item = &GraphEdge> {
        let idx = self.index_of.get(&id).copied();
        idx.into_iter().flat_map(move |idx| {
            self.inner
                .edges_directed(idx, Direction::Outgoing)
                .map(|e| e.weight())
        })
    }

    /// Incoming edges to an entity — derived by scanning the secondary
    /// index rather than stored as owned back-pointers on the target.
    pub fn edges_to(&self, id: EntityId) -> impl Iterator<Item = &GraphEdge> {
        let idx = self.index_of.get(&id).copied();
        idx.into_iter().flat_map(move |idx| {
            self.inner
                .edges_directed(idx, Direction::Incoming)
                .map(|e| e.weight())
        })
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.inner.edge_references().map(|e| e.weight())
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        if let Some(idx) = self.index_of.remove(&id) {
            self.inner.remove_node(idx);
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeKind;
    use std::path::PathBuf;

    fn edge(from: u64, to: u64) -> GraphEdge {
        GraphEdge {
            from: (EntityId(from), EntityKind::Function),
            to: (EntityId(to), EntityKind::Function),
            kind: EdgeKind::Calls,
            source_file: PathBuf::from("a.rs"),
            confidence: 1.0,
        }
    }

    #[test]
    fn cyclic_edges_round_trip() {
        let mut g = Graph::new();
        g.add_edge(edge(1, 2));
        g.add_edge(edge(2, 1));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges_from(EntityId(1)).count(), 1);
        assert_eq!(g.edges_to(EntityId(1)).count(), 1);
    }

    #[test]
    fn removing_entity_drops_its_edges_without_dangling() {
        let mut g = Graph::new();
        g.add_edge(edge(1, 2));
        g.remove_entity(EntityId(1));
        assert!(!g.contains(EntityId(1)));
        assert_eq!(g.edges_to(EntityId(2)).count(), 0);
    }
}
