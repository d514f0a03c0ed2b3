//! Pedestrian network graph.
//!
//! Nodes carry their coordinate and external id; edges are undirected and
//! weighted by walking length in meters. Built either by a
//! [`GraphProvider`](crate::traits::GraphProvider) or by hand in tests.

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::model::{BoundingBox, GeoPoint, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub point: GeoPoint,
}

/// Undirected walking network with metre edge weights.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    graph: UnGraph<GraphNode, f64>,
    index: HashMap<NodeId, NodeIndex>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing index if `id` is already present.
    pub fn add_node(&mut self, id: NodeId, point: GeoPoint) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode { id, point });
        self.index.insert(id, idx);
        idx
    }

    /// Connects two existing nodes, weighting the edge by their haversine distance.
    ///
    /// Returns `false` if either node is unknown.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let (Some(pa), Some(pb)) = (self.point(a), self.point(b)) else {
            return false;
        };
        self.add_edge_with_length(a, b, pa.distance_m(&pb))
    }

    /// Connects two existing nodes with an explicit non-negative length.
    pub fn add_edge_with_length(&mut self, a: NodeId, b: NodeId, length_m: f64) -> bool {
        if !length_m.is_finite() || length_m < 0.0 {
            return false;
        }
        let (Some(&ia), Some(&ib)) = (self.index.get(&a), self.index.get(&b)) else {
            return false;
        };
        self.graph.add_edge(ia, ib, length_m);
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn point(&self, id: NodeId) -> Option<GeoPoint> {
        self.index.get(&id).map(|&idx| self.graph[idx].point)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Node closest to `point` by great-circle distance. Ties go to the lowest id.
    pub fn nearest_node(&self, point: GeoPoint) -> Option<NodeId> {
        self.graph
            .node_weights()
            .min_by_key(|node| (OrderedFloat(node.point.distance_m(&point)), node.id))
            .map(|node| node.id)
    }

    /// Minimum-length path between two nodes, endpoints included.
    ///
    /// `None` when either node is missing or they lie in different components.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let start = *self.index.get(&from)?;
        let goal = *self.index.get(&to)?;

        // A* with a zero heuristic is Dijkstra that also returns the path.
        let (_, path) = astar(
            &self.graph,
            start,
            |n| n == goal,
            |e| OrderedFloat(*e.weight()),
            |_| OrderedFloat(0.0),
        )?;

        Some(path.into_iter().map(|idx| self.graph[idx].id).collect())
    }

    /// Coordinates for a sequence of node ids. Unknown ids are skipped.
    pub fn path_points(&self, path: &[NodeId]) -> Vec<GeoPoint> {
        path.iter().filter_map(|&id| self.point(id)).collect()
    }

    /// Copy of the graph without nodes outside `bbox` (and their edges).
    pub fn truncated_to(&self, bbox: &BoundingBox) -> NetworkGraph {
        self.retain(|node| bbox.contains(&node.point))
    }

    /// Copy of the graph restricted to its largest connected component.
    ///
    /// Equal-sized components are resolved towards the one holding the
    /// earliest-inserted node.
    pub fn largest_component(&self) -> NetworkGraph {
        let n = self.graph.node_count();
        if n == 0 {
            return NetworkGraph::new();
        }

        let mut components = UnionFind::<usize>::new(n);
        for edge in self.graph.edge_references() {
            components.union(edge.source().index(), edge.target().index());
        }
        let labels = components.into_labeling();

        let mut sizes = vec![0usize; n];
        for &label in &labels {
            sizes[label] += 1;
        }
        let mut keep = labels[0];
        for &label in &labels {
            if sizes[label] > sizes[keep] {
                keep = label;
            }
        }

        let kept: Vec<bool> = labels.iter().map(|&label| label == keep).collect();
        self.retain_indices(|idx| kept[idx.index()])
    }

    fn retain<F>(&self, keep: F) -> NetworkGraph
    where
        F: Fn(&GraphNode) -> bool,
    {
        self.retain_indices(|idx| keep(&self.graph[idx]))
    }

    fn retain_indices<F>(&self, keep: F) -> NetworkGraph
    where
        F: Fn(NodeIndex) -> bool,
    {
        let mut out = NetworkGraph::new();
        for idx in self.graph.node_indices() {
            if keep(idx) {
                let node = self.graph[idx];
                out.add_node(node.id, node.point);
            }
        }
        for edge in self.graph.edge_references() {
            if keep(edge.source()) && keep(edge.target()) {
                let a = self.graph[edge.source()].id;
                let b = self.graph[edge.target()].id;
                out.add_edge_with_length(a, b, *edge.weight());
            }
        }
        out
    }
}
