use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed catalog {path}: {source}")]
    Serde {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("plan {name} has invalid cost {cost}")]
    InvalidCost { name: String, cost: f64 },
    #[error("plan at position {position} is invalid: {reason}")]
    InvalidPlan { position: usize, reason: String },
    #[error("request needs {required} combinations, limit is {limit}")]
    EnumerationLimit { limit: usize, required: u128 },
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;
