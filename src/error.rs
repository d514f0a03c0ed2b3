use thiserror::Error;

use crate::model::{BoundingBox, NodeId};

pub type Result<T> = std::result::Result<T, PlanError>;

/// Failures that end a planning request. None of these are retried internally.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("no acceptable bearing for waypoint {index} after {attempts} attempts")]
    GenerationInfeasible { index: usize, attempts: usize },

    #[error("graph provider unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("graph provider returned no walkable nodes in {0}")]
    EmptyGraphRegion(BoundingBox),

    #[error("no walkable path for segment {segment} (node {from} -> node {to})")]
    RouteUnreachable {
        segment: usize,
        from: NodeId,
        to: NodeId,
    },

    #[error("planning cancelled")]
    Cancelled,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl PlanError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnavailable(message.into())
    }
}

impl From<reqwest::Error> for PlanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PlanError::NetworkUnavailable(format!("request timed out: {}", err))
        } else {
            PlanError::NetworkUnavailable(err.to_string())
        }
    }
}
