//! Lazily completed graph of stations, services and stops.
//!
//! The [`Timetable`] owns every entity. Services own their stop sequence;
//! a stop refers back to its service by [`ServiceKey`] and to its station by
//! [`StationId`], so the cyclic Service/Stop/Station relations are plain
//! lookups into the timetable rather than shared ownership.
//!
//! Entities may be created with only part of their data known. Reading a
//! field that is still unresolved performs one round-trip to a collaborator
//! and memoizes the answer, including a definite "absent". All access is
//! through `&mut Timetable`, which makes each entity single-threaded by
//! construction.

mod error;
mod service;
mod station;
mod stop;

pub use error::TimetableError;
pub use stop::{StopInit, StopSummary};

use std::collections::HashMap;

use crate::domain::{Station, StationId};
use crate::source::{StationLookup, TimetableSource};

use service::ServiceEntry;
use stop::StopEntry;

/// Handle to a service owned by a [`Timetable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(usize);

/// Handle to a stop owned by a [`Timetable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopKey(usize);

/// Resolve-once state of a lazily fetched value.
#[derive(Debug, Clone)]
enum Memo<T> {
    Unresolved,
    /// A fetch for this value is in progress.
    Resolving,
    Ready(T),
}

impl<T> Memo<T> {
    fn is_ready(&self) -> bool {
        matches!(self, Memo::Ready(_))
    }
}

/// Owner of the timetable graph and its two collaborators.
///
/// # Examples
///
/// ```
/// use train_timetable::domain::{ClockTime, StationId};
/// use train_timetable::graph::{StopInit, Timetable};
/// use train_timetable::source::FixtureSource;
///
/// let fixture = FixtureSource::from_json("{}").unwrap();
/// let mut timetable = Timetable::new(&fixture, &fixture);
///
/// let t = |s| ClockTime::parse(s).unwrap();
/// let service = timetable.add_service_with_stops(
///     "/service/1",
///     Some("S 3".to_string()),
///     vec![
///         StopInit::new(StationId(1)).arrival_time(None).departure_time(Some(t("10:00"))),
///         StopInit::new(StationId(2)).arrival_time(Some(t("10:20"))).departure_time(None),
///     ],
/// );
///
/// let origin = timetable.service_origin(service).unwrap();
/// assert_eq!(timetable.departure_time(origin).unwrap(), Some(t("10:00")));
/// assert_eq!(timetable.departure_time_to_destination(origin).unwrap(), Some(1200));
/// assert_eq!(fixture.fetch_counts().services, 0);
/// ```
pub struct Timetable<S, L> {
    source: S,
    lookup: L,
    stations: HashMap<StationId, Memo<Station>>,
    services: Vec<ServiceEntry>,
    stops: Vec<StopEntry>,
}

impl<S: TimetableSource, L: StationLookup> Timetable<S, L> {
    /// Create an empty timetable backed by the given collaborators.
    pub fn new(source: S, lookup: L) -> Self {
        Self {
            source,
            lookup,
            stations: HashMap::new(),
            services: Vec::new(),
            stops: Vec::new(),
        }
    }

    /// The timetable collaborator.
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Number of services in the graph.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Number of stops in the graph, including ad hoc board stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
