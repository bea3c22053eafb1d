use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use thiserror::Error;

/// Handle to a node. Ids are monotonic per session and never reused, so a
/// stale handle misses the map instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Handle to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Failure to resolve a handle against the live graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
}

/// A position in world space, independent of the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub pos: Point,
    pub selected: bool,
    pub highlighted: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    /// Source endpoint (tail when the graph is directed).
    pub a: NodeId,
    /// Target endpoint (head when the graph is directed).
    pub b: NodeId,
    pub weight: Option<f32>,
    pub selected: bool,
}

impl Edge {
    /// The endpoint that is not `id`. For self-loops both ends coincide.
    pub fn other(&self, id: NodeId) -> NodeId {
        if self.a == id { self.b } else { self.a }
    }
}

/// The graph store: nodes, edges, and an adjacency index kept consistent
/// with every mutation. Exactly one writer (the control loop) mutates it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    adjacency: HashMap<NodeId, HashSet<EdgeId>>,
    next_node: u32,
    next_edge: u32,
    revision: u64,
    directed: bool,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Topology revision. Bumps on every successful mutation; the layout
    /// engine compares it against the last revision it synced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                label: label.into(),
                pos: Point::default(),
                selected: false,
                highlighted: false,
                pinned: false,
            },
        );
        self.adjacency.insert(id, HashSet::new());
        self.revision += 1;
        id
    }

    /// Connect `a` to `b`. Fails with `UnknownNode` (store unchanged) when
    /// either endpoint is absent.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: Option<f32>,
    ) -> Result<EdgeId, GraphError> {
        if !self.nodes.contains_key(&a) {
            return Err(GraphError::UnknownNode(a));
        }
        if !self.nodes.contains_key(&b) {
            return Err(GraphError::UnknownNode(b));
        }
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(
            id,
            Edge {
                id,
                a,
                b,
                weight,
                selected: false,
            },
        );
        self.adjacency.entry(a).or_default().insert(id);
        self.adjacency.entry(b).or_default().insert(id);
        self.revision += 1;
        Ok(id)
    }

    /// Remove a node, cascading removal of its incident edges.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::UnknownNode(id));
        }
        let incident: Vec<EdgeId> = self
            .adjacency
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        for edge_id in incident {
            if let Some(edge) = self.edges.remove(&edge_id) {
                let other = edge.other(id);
                if let Some(set) = self.adjacency.get_mut(&other) {
                    set.remove(&edge_id);
                }
            }
        }
        self.adjacency.remove(&id);
        self.nodes.remove(&id);
        self.revision += 1;
        Ok(())
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let Some(edge) = self.edges.remove(&id) else {
            return Err(GraphError::UnknownEdge(id));
        };
        if let Some(set) = self.adjacency.get_mut(&edge.a) {
            set.remove(&id);
        }
        if let Some(set) = self.adjacency.get_mut(&edge.b) {
            set.remove(&id);
        }
        self.revision += 1;
        Ok(())
    }

    /// Edge ids incident to `id`, in stable order.
    pub fn incident_edges(&self, id: NodeId) -> Vec<EdgeId> {
        let mut out: Vec<_> = self
            .adjacency
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    /// Distinct neighbor node ids of `id`, in stable order.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let Some(incident) = self.adjacency.get(&id) else {
            return Vec::new();
        };
        let mut out = BTreeSet::new();
        for edge_id in incident {
            if let Some(edge) = self.edges.get(edge_id) {
                out.insert(edge.other(id));
            }
        }
        out.into_iter().collect()
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let incident = self.adjacency.get(&a)?;
        let mut matches: Vec<EdgeId> = incident
            .iter()
            .filter(|edge_id| {
                self.edges
                    .get(edge_id)
                    .map(|e| (e.a == a && e.b == b) || (e.a == b && e.b == a))
                    .unwrap_or(false)
            })
            .copied()
            .collect();
        matches.sort();
        matches.first().copied()
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        node.label = label.into();
        Ok(())
    }

    /// Pin-state changes do not bump the revision; the controller tells the
    /// layout engine directly so convergence resets without a reseed pass.
    pub fn set_pinned(&mut self, id: NodeId, pinned: bool) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        node.pinned = pinned;
        Ok(())
    }

    /// Mark `id` selected, its neighbors highlighted, and its incident
    /// edges selected; every other visual state is cleared.
    pub fn select_only(&mut self, id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::UnknownNode(id));
        }
        let neighbors: HashSet<NodeId> = self.neighbors(id).into_iter().collect();
        let incident: HashSet<EdgeId> = self.adjacency.get(&id).cloned().unwrap_or_default();
        for node in self.nodes.values_mut() {
            node.selected = node.id == id;
            node.highlighted = node.id != id && neighbors.contains(&node.id);
        }
        for edge in self.edges.values_mut() {
            edge.selected = incident.contains(&edge.id);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
            node.highlighted = false;
        }
        for edge in self.edges.values_mut() {
            edge.selected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_adjacency_consistent(g: &Graph) {
        // Every edge appears in both endpoints' adjacency sets...
        for edge in g.edges() {
            assert!(g.incident_edges(edge.a).contains(&edge.id));
            assert!(g.incident_edges(edge.b).contains(&edge.id));
        }
        // ...and every adjacency entry points at a live edge touching the node.
        for id in g.node_ids() {
            for edge_id in g.incident_edges(id) {
                let edge = g.edge(edge_id).expect("adjacency references dead edge");
                assert!(edge.a == id || edge.b == id);
            }
        }
    }

    #[test]
    fn add_edge_requires_live_endpoints() {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        g.remove_node(b).unwrap();

        let before = g.revision();
        let err = g.add_edge(a, b, None).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(b));
        assert_eq!(g.edge_count(), 0);
        assert_eq!(
            g.revision(),
            before,
            "failed mutation must not bump revision"
        );
        assert_adjacency_consistent(&g);
    }

    #[test]
    fn remove_node_cascades_exactly_incident_edges() {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        let ab = g.add_edge(a, b, None).unwrap();
        let bc = g.add_edge(b, c, None).unwrap();
        let ac = g.add_edge(a, c, Some(2.0)).unwrap();

        g.remove_node(b).unwrap();

        assert!(g.edge(ab).is_none());
        assert!(g.edge(bc).is_none());
        assert!(g.edge(ac).is_some(), "edge not touching b must survive");
        assert_eq!(g.node_count(), 2);
        assert_adjacency_consistent(&g);
    }

    #[test]
    fn adjacency_stays_consistent_across_mutation_sequence() {
        let mut g = Graph::new(true);
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(g.add_node(format!("n{i}")));
        }
        for w in ids.windows(2) {
            g.add_edge(w[0], w[1], None).unwrap();
            assert_adjacency_consistent(&g);
        }
        g.add_edge(ids[0], ids[5], Some(3.0)).unwrap();
        g.remove_node(ids[2]).unwrap();
        assert_adjacency_consistent(&g);
        g.remove_node(ids[0]).unwrap();
        assert_adjacency_consistent(&g);

        // Edges whose endpoints are both still present are exactly the ones left.
        for edge in g.edges() {
            assert!(g.node(edge.a).is_some());
            assert!(g.node(edge.b).is_some());
        }
    }

    #[test]
    fn neighbors_reports_distinct_nodes() {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.add_edge(b, a, None).unwrap();
        g.add_edge(b, c, None).unwrap();

        assert_eq!(g.neighbors(b), vec![a, c]);
        assert_eq!(g.neighbors(a), vec![b]);
        assert!(g.neighbors(NodeId(99)).is_empty());
    }

    #[test]
    fn remove_edge_unknown_handle() {
        let mut g = Graph::new(false);
        g.add_node("a");
        let err = g.remove_edge(EdgeId(7)).unwrap_err();
        assert_eq!(err, GraphError::UnknownEdge(EdgeId(7)));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        g.remove_node(a).unwrap();
        let b = g.add_node("b");
        assert_ne!(a, b);
        assert!(g.node(a).is_none());
    }

    #[test]
    fn select_only_is_exclusive_and_highlights_neighbors() {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        let ab = g.add_edge(a, b, None).unwrap();
        g.add_edge(b, c, None).unwrap();

        g.select_only(a).unwrap();
        assert!(g.node(a).unwrap().selected);
        assert!(g.node(b).unwrap().highlighted);
        assert!(!g.node(c).unwrap().highlighted);
        assert!(g.edge(ab).unwrap().selected);

        g.select_only(b).unwrap();
        assert!(!g.node(a).unwrap().selected);
        assert!(g.node(b).unwrap().selected);
        assert!(g.node(a).unwrap().highlighted);
        assert!(g.node(c).unwrap().highlighted);

        g.clear_selection();
        assert!(g.nodes().all(|n| !n.selected && !n.highlighted));
        assert!(g.edges().all(|e| !e.selected));
    }

    #[test]
    fn edge_between_ignores_direction() {
        let mut g = Graph::new(true);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let e = g.add_edge(a, b, None).unwrap();
        assert_eq!(g.edge_between(b, a), Some(e));
    }
}
