//! Domain value types for the timetable model.
//!
//! These are plain values with no knowledge of where timetable data comes
//! from: clock times, the midnight rollover resolver, station identity and
//! the three-valued `Field` used by lazily completed records.

mod field;
mod rollover;
mod station;
mod time;

pub use field::Field;
pub use rollover::{RolloverResolver, SECONDS_PER_DAY, resolve_sequence};
pub use station::{Coordinates, Station, StationId};
pub use time::{ClockTime, TimeError};
