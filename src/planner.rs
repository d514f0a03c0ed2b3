//! Planning entry point: Generator → Snapper → Stitcher.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::generator::{DEFAULT_MAX_ATTEMPTS, WaypointGenerator};
use crate::model::{GeoPoint, NodeBinding, WaypointSequence};
use crate::polyline::RoutePolyline;
use crate::snapper::{DEFAULT_MARGIN_M, NetworkSnapper};
use crate::stitcher::RouteStitcher;
use crate::traits::GraphProvider;

/// What the caller wants walked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub origin: GeoPoint,
    /// Number of waypoints besides the origin.
    pub count: usize,
    /// Straight-line distance between consecutive waypoints, in meters.
    pub separation_m: f64,
    /// Conform waypoints to the walking network and compute the route.
    pub snap: bool,
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Bearings tried per waypoint before the request is declared infeasible.
    pub max_attempts: usize,
    /// Margin around the waypoints when fetching the network, in meters.
    pub margin_m: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            margin_m: DEFAULT_MARGIN_M,
        }
    }
}

/// Output handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub waypoints: WaypointSequence,
    pub binding: NodeBinding,
    pub route: RoutePolyline,
}

impl RoutePlan {
    pub fn distance_m(&self) -> f64 {
        self.route.length_m()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: PlanOptions,
}

impl Planner {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Plans one closed walk.
    ///
    /// With `count == 0` the origin is returned as-is with an empty route and
    /// the provider is never contacted.
    pub fn plan<P, R>(
        &self,
        request: &PlanRequest,
        provider: &P,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Result<RoutePlan>
    where
        P: GraphProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let generator = WaypointGenerator::new(self.options.max_attempts);
        let waypoints =
            generator.generate(rng, request.count, request.separation_m, request.origin)?;
        info!(
            "Generated {} waypoints around {} ({} m apart)",
            request.count, request.origin, request.separation_m
        );

        if request.count == 0 {
            return Ok(RoutePlan {
                waypoints,
                binding: NodeBinding::empty(),
                route: RoutePolyline::empty(),
            });
        }

        let snapper = NetworkSnapper::new(request.snap, self.options.margin_m);
        let snapped = snapper.snap(waypoints, provider, cancel)?;

        let route = match &snapped.graph {
            Some(graph) => RouteStitcher::new().stitch(graph, &snapped.binding, cancel)?,
            None => RoutePolyline::empty(),
        };

        Ok(RoutePlan {
            waypoints: snapped.waypoints,
            binding: snapped.binding,
            route,
        })
    }
}
