//! Semantic error kinds for the solver pipeline.
//!
//! Validation is performed before any ACO/GA work begins; numeric edge
//! cases inside the optimizers (weight underflow, division by near-zero)
//! are handled inline with epsilon terms instead of surfacing as errors.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A parcel references a city id >= N, or the base id is >= N.
    InvalidGraph(String),
    /// A required parameter is out of its valid range (iterations,
    /// ants, population, generations < 1; alpha/beta <= 0;
    /// rho not in (0,1); mutation rate not in [0,1]).
    InvalidParameters(String),
    /// After Floyd-Warshall, some (base, pickup) or (pickup, delivery)
    /// pair is unreachable. Not fatal: the ACO still runs but the
    /// returned tour will include a sentinel-sized segment.
    Disconnected(String),
    /// The fixed tour has zero edges; the GA degenerates to an empty
    /// chromosome and a flat history of base_revenue.
    DegenerateGa,
    Io(String),
    Json(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidGraph(msg) => write!(f, "invalid graph: {msg}"),
            SolverError::InvalidParameters(msg) => write!(f, "invalid parameters: {msg}"),
            SolverError::Disconnected(msg) => write!(f, "disconnected: {msg}"),
            SolverError::DegenerateGa => write!(f, "degenerate GA input: empty tour"),
            SolverError::Io(msg) => write!(f, "I/O error: {msg}"),
            SolverError::Json(msg) => write!(f, "JSON error: {msg}"),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<std::io::Error> for SolverError {
    fn from(e: std::io::Error) -> Self {
        SolverError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(e: serde_json::Error) -> Self {
        SolverError::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
