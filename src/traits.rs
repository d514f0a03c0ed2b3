//! Seams between the planning core and its collaborators.

use crate::error::Result;
use crate::graph::NetworkGraph;
use crate::model::BoundingBox;

/// Supplies the pedestrian network covering a bounding box.
///
/// Implementations report transport failures as
/// [`PlanError::NetworkUnavailable`](crate::error::PlanError::NetworkUnavailable)
/// and a region without walkable nodes as
/// [`PlanError::EmptyGraphRegion`](crate::error::PlanError::EmptyGraphRegion).
pub trait GraphProvider {
    fn graph_for(&self, bbox: &BoundingBox) -> Result<NetworkGraph>;
}

impl<P: GraphProvider + ?Sized> GraphProvider for &P {
    fn graph_for(&self, bbox: &BoundingBox) -> Result<NetworkGraph> {
        (**self).graph_for(bbox)
    }
}
