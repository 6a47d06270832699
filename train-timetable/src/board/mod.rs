//! Departure boards.
//!
//! A board query fetches one hourly window at a time from the
//! [`TimetableSource`](crate::source::TimetableSource) and turns each row
//! into a stop. Transport filtering is only a request parameter: rows are
//! never filtered after fetching.

mod aggregate;
mod config;
mod transport;

pub use aggregate::estimate_time_to_destination;
pub use config::BoardConfig;
pub use transport::{TransportMask, TransportType, UnknownTransportType};
