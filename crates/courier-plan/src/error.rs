use thiserror::Error;

use courier_map::MapError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("planner configuration error: {0}")]
    Config(String),

    #[error("delivery file parse error: {0}")]
    Parse(String),

    #[error("routing failed: {0}")]
    Route(#[from] MapError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
