//! Conforms waypoints onto the walking network.

use rayon::prelude::*;
use tracing::info;

use crate::cancel::CancelToken;
use crate::error::{PlanError, Result};
use crate::graph::NetworkGraph;
use crate::model::{BoundingBox, NodeBinding, WaypointSequence};
use crate::traits::GraphProvider;

/// Default margin added around the waypoints before fetching the network.
pub const DEFAULT_MARGIN_M: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct NetworkSnapper {
    /// When false, [`snap`](Self::snap) passes waypoints through untouched.
    pub enabled: bool,
    /// Distance the bounding box corners are pushed outwards, in meters.
    pub margin_m: f64,
}

impl Default for NetworkSnapper {
    fn default() -> Self {
        Self {
            enabled: true,
            margin_m: DEFAULT_MARGIN_M,
        }
    }
}

/// Result of snapping: moved waypoints, their node binding and the graph used.
#[derive(Debug, Clone)]
pub struct SnapOutcome {
    pub waypoints: WaypointSequence,
    pub binding: NodeBinding,
    /// `None` when snapping was disabled.
    pub graph: Option<NetworkGraph>,
}

impl NetworkSnapper {
    pub fn new(enabled: bool, margin_m: f64) -> Self {
        Self { enabled, margin_m }
    }

    /// Region requested from the provider: the waypoints' box plus the margin.
    pub fn region_for(&self, waypoints: &WaypointSequence) -> Option<BoundingBox> {
        waypoints
            .bounding_box()
            .map(|bbox| bbox.expand_by_meters(self.margin_m))
    }

    /// Fetches the network around `waypoints` and moves each one onto its nearest node.
    pub fn snap<P: GraphProvider + ?Sized>(
        &self,
        waypoints: WaypointSequence,
        provider: &P,
        cancel: &CancelToken,
    ) -> Result<SnapOutcome> {
        if !self.enabled || waypoints.is_empty() {
            return Ok(SnapOutcome {
                waypoints,
                binding: NodeBinding::empty(),
                graph: None,
            });
        }

        let Some(region) = self.region_for(&waypoints) else {
            return Err(PlanError::invalid_input("no waypoints to snap"));
        };

        cancel.check()?;
        let graph = provider.graph_for(&region)?;
        if graph.is_empty() {
            return Err(PlanError::EmptyGraphRegion(region));
        }

        let (snapped, binding) = snap_to_graph(&waypoints, &graph)?;
        info!(
            "Snapped {} waypoints onto a {}-node network",
            snapped.len(),
            graph.node_count()
        );

        Ok(SnapOutcome {
            waypoints: snapped,
            binding,
            graph: Some(graph),
        })
    }
}

/// Replaces every waypoint with the coordinate of its nearest graph node.
///
/// Output keeps the input's length and order. Snapping an already snapped
/// sequence against the same graph returns it unchanged.
pub fn snap_to_graph(
    waypoints: &WaypointSequence,
    graph: &NetworkGraph,
) -> Result<(WaypointSequence, NodeBinding)> {
    let matches: Vec<_> = waypoints
        .points()
        .par_iter()
        .map(|&point| {
            graph
                .nearest_node(point)
                .and_then(|id| graph.point(id).map(|p| (id, p)))
        })
        .collect();

    let mut nodes = Vec::with_capacity(matches.len());
    let mut points = Vec::with_capacity(matches.len());
    for found in matches {
        let Some((id, point)) = found else {
            return Err(PlanError::invalid_input("cannot snap onto an empty graph"));
        };
        nodes.push(id);
        points.push(point);
    }

    Ok((WaypointSequence::from_points(points), NodeBinding::new(nodes)))
}
