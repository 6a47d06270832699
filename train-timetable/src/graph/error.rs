//! Timetable graph error types.
//!
//! Format and fetch errors pass through from the layers below. The
//! remaining variants indicate data that does not hang together.

use crate::domain::{StationId, TimeError};
use crate::source::FetchError;

/// Errors raised while building or resolving the timetable graph.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// Malformed time-of-day text
    #[error(transparent)]
    Time(#[from] TimeError),

    /// A collaborator could not produce data
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A stop could not be matched against its service's stop list
    #[error("stop at station {station} ({time}) not found in service {path}")]
    StopNotFound {
        station: StationId,
        time: String,
        path: String,
    },

    /// The station lookup does not know this id
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// A service resolved to no stops, so it has no origin or destination
    #[error("service {0} has no stops")]
    EmptyService(String),

    /// A lazy field was read while it was being resolved
    #[error("re-entrant resolution of {0}")]
    ReentrantResolution(&'static str),

    /// Board hour outside 0-23
    #[error("invalid board hour {0}: must be 0-23")]
    InvalidHour(u8),

    /// A key that does not belong to this timetable
    #[error("invalid handle: not part of this timetable")]
    InvalidHandle,
}
