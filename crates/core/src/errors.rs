//! Core error types for the reservation planner.
//!
//! Data-quality problems (unpriced rows, invalid catalog entries, missing
//! rates) are not errors: they are collected as diagnostics next to the
//! results. This module only covers contract violations and the hard
//! failures of renewal projection.

use chrono::NaiveDate;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the planner core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Renewal projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation errors for caller-supplied arguments.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported term length: {0} months")]
    UnsupportedTerm(u32),

    #[error("Scenario '{0}' cannot be used to purchase a renewal")]
    NotARenewalScenario(String),
}

/// Hard failures of a single reservation's renewal chain.
///
/// These point at broken date logic rather than gaps in the data, so they are
/// reported apart from the aggregation diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("Renewal chain for reservation {reservation_id} did not reach the horizon after {iterations} renewals")]
    RunawayProjection {
        reservation_id: String,
        iterations: usize,
    },

    #[error("Renewal chain for reservation {reservation_id} stalled at {date}")]
    Stalled {
        reservation_id: String,
        date: NaiveDate,
    },

    #[error("Date arithmetic for reservation {reservation_id} left the supported range after {date}")]
    DateOutOfRange {
        reservation_id: String,
        date: NaiveDate,
    },
}

impl ProjectionError {
    pub fn reservation_id(&self) -> &str {
        match self {
            ProjectionError::RunawayProjection { reservation_id, .. }
            | ProjectionError::Stalled { reservation_id, .. }
            | ProjectionError::DateOutOfRange { reservation_id, .. } => reservation_id,
        }
    }
}

// === From implementations for common error types ===

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
