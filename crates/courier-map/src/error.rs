//! Map-subsystem error type.

use thiserror::Error;

use courier_core::{Coordinate, CoreError};

/// Errors produced by `courier-map`.
#[derive(Debug, Error)]
pub enum MapError {
    /// A query endpoint never appeared in any loaded segment.
    #[error("coordinate {0} is not on the street map")]
    UnknownCoordinate(Coordinate),

    /// Both endpoints are known but lie in disconnected parts of the map.
    #[error("no route from {from} to {to}")]
    NoRoute { from: Coordinate, to: Coordinate },

    #[error("map parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type MapResult<T> = Result<T, MapError>;
