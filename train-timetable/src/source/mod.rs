//! External collaborators of the timetable core.
//!
//! The core never fetches or parses documents itself. It asks two
//! collaborators for already structured rows:
//!
//! - [`TimetableSource`] serves departure boards (one hourly window at a
//!   time) and full service pages.
//! - [`StationLookup`] resolves station ids and free-text names.
//!
//! Every call is a blocking round-trip that may fail with [`FetchError`].
//! Retries and timeouts, if any, belong to the implementation.
//! [`FixtureSource`] implements both from a JSON document.

mod error;
mod fixture;
mod types;

pub use error::FetchError;
pub use fixture::{FetchCounts, FixtureSource};
pub use types::{BoardDestination, BoardRow, ServiceDetails, ServiceRow, StationRecord};

use crate::board::TransportMask;
use crate::domain::StationId;

/// Supplier of departure boards and service detail pages.
pub trait TimetableSource {
    /// Rows of the departure board at `station` for one hourly window.
    fn departure_board(
        &self,
        station: StationId,
        hour: u8,
        transport: TransportMask,
    ) -> Result<Vec<BoardRow>, FetchError>;

    /// Full stop list of the service at `path`.
    fn service(&self, path: &str) -> Result<ServiceDetails, FetchError>;
}

/// Station lookup by id or by name.
pub trait StationLookup {
    /// The station with this id, or `None` if the lookup does not know it.
    fn station_by_id(&self, id: StationId) -> Result<Option<StationRecord>, FetchError>;

    /// All candidates matching free text, best first.
    fn search_stations(&self, text: &str) -> Result<Vec<StationRecord>, FetchError>;
}

impl<T: TimetableSource + ?Sized> TimetableSource for &T {
    fn departure_board(
        &self,
        station: StationId,
        hour: u8,
        transport: TransportMask,
    ) -> Result<Vec<BoardRow>, FetchError> {
        (**self).departure_board(station, hour, transport)
    }

    fn service(&self, path: &str) -> Result<ServiceDetails, FetchError> {
        (**self).service(path)
    }
}

impl<L: StationLookup + ?Sized> StationLookup for &L {
    fn station_by_id(&self, id: StationId) -> Result<Option<StationRecord>, FetchError> {
        (**self).station_by_id(id)
    }

    fn search_stations(&self, text: &str) -> Result<Vec<StationRecord>, FetchError> {
        (**self).search_stations(text)
    }
}
