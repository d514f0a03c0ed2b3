//! Joins snapped waypoints into one closed walking route.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{PlanError, Result};
use crate::graph::NetworkGraph;
use crate::model::{GeoPoint, NodeBinding};
use crate::polyline::RoutePolyline;

#[derive(Debug, Clone, Default)]
pub struct RouteStitcher;

impl RouteStitcher {
    pub fn new() -> Self {
        Self
    }

    /// Shortest-path route visiting every bound node in order and returning
    /// to the first one.
    ///
    /// Segments are searched in parallel; the first unreachable segment in
    /// tour order is reported and no partial route is returned.
    pub fn stitch(
        &self,
        graph: &NetworkGraph,
        binding: &NodeBinding,
        cancel: &CancelToken,
    ) -> Result<RoutePolyline> {
        if binding.len() < 2 {
            return Ok(RoutePolyline::empty());
        }

        let pairs = binding.cycle_pairs();
        let segments: Vec<Result<Vec<GeoPoint>>> = pairs
            .par_iter()
            .enumerate()
            .map(|(segment, &(from, to))| -> Result<Vec<GeoPoint>> {
                cancel.check()?;
                let path = graph
                    .shortest_path(from, to)
                    .ok_or(PlanError::RouteUnreachable { segment, from, to })?;
                debug!(segment, from, to, nodes = path.len(), "segment routed");
                Ok(graph.path_points(&path))
            })
            .collect();

        let mut route = RoutePolyline::empty();
        for segment in segments {
            match segment {
                Ok(points) => route.push_segment(&points),
                Err(err) => {
                    if let PlanError::RouteUnreachable { segment, from, to } = &err {
                        warn!(segment, from, to, "no walkable path between waypoints");
                    }
                    return Err(err);
                }
            }
        }

        info!(
            "Stitched {} segments into a {}-point route ({:.0} m)",
            pairs.len(),
            route.len(),
            route.length_m()
        );
        Ok(route)
    }
}
