//! walk-planner core
//!
//! Plans closed walking tours: random waypoints around a home point, snapped
//! onto a pedestrian network and joined by shortest paths.

pub mod cancel;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod haversine;
pub mod model;
pub mod overpass;
pub mod planner;
pub mod polyline;
pub mod snapper;
pub mod stitcher;
pub mod telemetry;
pub mod traits;

pub use error::{PlanError, Result};
pub use model::{BoundingBox, GeoPoint, NodeBinding, NodeId, WaypointSequence};
pub use planner::{PlanOptions, PlanRequest, Planner, RoutePlan};
pub use polyline::RoutePolyline;
