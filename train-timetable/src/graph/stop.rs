//! Stops and their on-demand completion.
//!
//! A stop can start life knowing only part of its data, typically a board
//! row that shows the departure time and platform at one station. Reading
//! any field that is still unresolved completes the stop from its
//! service's full stop list, matched by station and a known time. Fields
//! that were already known, including ones known to be absent, are never
//! overwritten.

use serde::Serialize;
use tracing::trace;

use crate::domain::{ClockTime, Field, Station, StationId};
use crate::source::{StationLookup, TimetableSource};

use super::{ServiceKey, StopKey, Timetable, TimetableError};

/// What is known about a stop when it is created.
///
/// Every field starts unresolved. Setting a field to `None` records that
/// it is absent, which is different from leaving it unresolved.
///
/// # Examples
///
/// ```
/// use train_timetable::domain::{ClockTime, StationId};
/// use train_timetable::graph::StopInit;
///
/// // A board row: departure and platform known, the rest to be looked up.
/// let init = StopInit::new(StationId(8503000))
///     .departure_time(Some(ClockTime::parse("08:02").unwrap()))
///     .platform(Some("31".to_string()))
///     .estimated_time_to_destination(3360);
/// ```
#[derive(Debug, Clone)]
pub struct StopInit {
    pub(super) station: StationId,
    pub(super) arrival_time: Field<ClockTime>,
    pub(super) departure_time: Field<ClockTime>,
    pub(super) platform: Field<String>,
    pub(super) arrival_from_origin: Field<i64>,
    pub(super) departure_from_origin: Field<i64>,
    pub(super) estimate: Option<i64>,
}

impl StopInit {
    /// A stop at `station` with every field unresolved.
    pub fn new(station: StationId) -> Self {
        Self {
            station,
            arrival_time: Field::Unresolved,
            departure_time: Field::Unresolved,
            platform: Field::Unresolved,
            arrival_from_origin: Field::Unresolved,
            departure_from_origin: Field::Unresolved,
            estimate: None,
        }
    }

    pub fn arrival_time(mut self, time: Option<ClockTime>) -> Self {
        self.arrival_time = time.into();
        self
    }

    pub fn departure_time(mut self, time: Option<ClockTime>) -> Self {
        self.departure_time = time.into();
        self
    }

    pub fn platform(mut self, platform: Option<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Seconds from the origin departure to arrival here.
    pub fn arrival_from_origin(mut self, seconds: Option<i64>) -> Self {
        self.arrival_from_origin = seconds.into();
        self
    }

    /// Seconds from the origin departure to departure from here.
    pub fn departure_from_origin(mut self, seconds: Option<i64>) -> Self {
        self.departure_from_origin = seconds.into();
        self
    }

    /// A cheap estimate of seconds to the destination.
    ///
    /// Preferred over values that need the full service to be fetched.
    pub fn estimated_time_to_destination(mut self, seconds: i64) -> Self {
        self.estimate = Some(seconds);
        self
    }
}

/// Progress of completing a stop from its service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Details {
    Pending,
    Resolving,
    Done,
}

/// A stop as stored in the timetable.
#[derive(Debug)]
pub(super) struct StopEntry {
    station: StationId,
    service: ServiceKey,
    arrival_time: Field<ClockTime>,
    departure_time: Field<ClockTime>,
    platform: Field<String>,
    arrival_from_origin: Field<i64>,
    departure_from_origin: Field<i64>,
    arrival_to_destination: Field<i64>,
    departure_to_destination: Field<i64>,
    estimate: Option<i64>,
    details: Details,
}

impl StopEntry {
    pub(super) fn new(service: ServiceKey, init: StopInit) -> Self {
        let mut entry = Self {
            station: init.station,
            service,
            arrival_time: init.arrival_time,
            departure_time: init.departure_time,
            platform: init.platform,
            arrival_from_origin: init.arrival_from_origin,
            departure_from_origin: init.departure_from_origin,
            arrival_to_destination: Field::Unresolved,
            departure_to_destination: Field::Unresolved,
            estimate: init.estimate,
            details: Details::Pending,
        };
        if !entry.has_unresolved_details() {
            entry.details = Details::Done;
        }
        entry
    }

    fn has_unresolved_details(&self) -> bool {
        self.arrival_time.is_unresolved()
            || self.departure_time.is_unresolved()
            || self.platform.is_unresolved()
            || self.arrival_from_origin.is_unresolved()
            || self.departure_from_origin.is_unresolved()
    }

    /// The time this stop is identified by within its service.
    fn match_time(&self) -> Option<MatchTime> {
        if let Field::Present(time) = self.arrival_time {
            Some(MatchTime::Arrival(time))
        } else if let Field::Present(time) = self.departure_time {
            Some(MatchTime::Departure(time))
        } else {
            None
        }
    }

    fn matches(&self, station: StationId, time: MatchTime) -> bool {
        self.station == station
            && match time {
                MatchTime::Arrival(t) => self.arrival_time.present() == Some(&t),
                MatchTime::Departure(t) => self.departure_time.present() == Some(&t),
            }
    }

    fn fill_from(&mut self, other: &StopSnapshot) {
        self.arrival_time.fill_from(&other.arrival_time);
        self.departure_time.fill_from(&other.departure_time);
        self.platform.fill_from(&other.platform);
        self.arrival_from_origin.fill_from(&other.arrival_from_origin);
        self.departure_from_origin.fill_from(&other.departure_from_origin);
    }

    fn snapshot(&self) -> StopSnapshot {
        StopSnapshot {
            arrival_time: self.arrival_time.clone(),
            departure_time: self.departure_time.clone(),
            platform: self.platform.clone(),
            arrival_from_origin: self.arrival_from_origin.clone(),
            departure_from_origin: self.departure_from_origin.clone(),
        }
    }
}

/// Detail fields copied from the matching stop of the full list.
struct StopSnapshot {
    arrival_time: Field<ClockTime>,
    departure_time: Field<ClockTime>,
    platform: Field<String>,
    arrival_from_origin: Field<i64>,
    departure_from_origin: Field<i64>,
}

#[derive(Debug, Clone, Copy)]
enum MatchTime {
    Arrival(ClockTime),
    Departure(ClockTime),
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Arrival,
    Departure,
}

/// Fully resolved view of a stop.
#[derive(Debug, Clone, Serialize)]
pub struct StopSummary {
    pub station: Station,
    pub service_path: String,
    pub service_name: Option<String>,
    pub arrival_time: Option<ClockTime>,
    pub departure_time: Option<ClockTime>,
    /// `None` when the stop has no platform
    pub platform: Option<String>,
    pub arrival_time_from_origin: Option<i64>,
    pub departure_time_from_origin: Option<i64>,
    pub arrival_time_to_destination: Option<i64>,
    pub departure_time_to_destination: Option<i64>,
    pub inferred_time_to_destination: Option<i64>,
}

impl<S: TimetableSource, L: StationLookup> Timetable<S, L> {
    /// Create a stop outside its service's stop list.
    ///
    /// Used for stops seen before the service is fetched, such as a row of a
    /// departure board. The stop refers to `service` but is not part of its
    /// stop list.
    pub fn add_stop(&mut self, service: ServiceKey, init: StopInit) -> Result<StopKey, TimetableError> {
        self.service_entry(service)?;
        Ok(self.push_stop(service, init))
    }

    /// The station this stop is at.
    pub fn stop_station(&self, stop: StopKey) -> Result<StationId, TimetableError> {
        Ok(self.stop_entry(stop)?.station)
    }

    /// The service making this stop.
    pub fn stop_service(&self, stop: StopKey) -> Result<ServiceKey, TimetableError> {
        Ok(self.stop_entry(stop)?.service)
    }

    pub fn arrival_time(&mut self, stop: StopKey) -> Result<Option<ClockTime>, TimetableError> {
        let entry = self.detailed_stop(stop, |s| s.arrival_time.is_unresolved())?;
        Ok(entry.arrival_time.present().copied())
    }

    pub fn departure_time(&mut self, stop: StopKey) -> Result<Option<ClockTime>, TimetableError> {
        let entry = self.detailed_stop(stop, |s| s.departure_time.is_unresolved())?;
        Ok(entry.departure_time.present().copied())
    }

    /// Platform, or `None` when the stop has no platform.
    pub fn platform(&mut self, stop: StopKey) -> Result<Option<String>, TimetableError> {
        let entry = self.detailed_stop(stop, |s| s.platform.is_unresolved())?;
        Ok(entry.platform.present().cloned())
    }

    /// Seconds from the origin departure to arrival at this stop.
    pub fn arrival_time_from_origin(&mut self, stop: StopKey) -> Result<Option<i64>, TimetableError> {
        let entry = self.detailed_stop(stop, |s| s.arrival_from_origin.is_unresolved())?;
        Ok(entry.arrival_from_origin.present().copied())
    }

    /// Seconds from the origin departure to departure from this stop.
    pub fn departure_time_from_origin(
        &mut self,
        stop: StopKey,
    ) -> Result<Option<i64>, TimetableError> {
        let entry = self.detailed_stop(stop, |s| s.departure_from_origin.is_unresolved())?;
        Ok(entry.departure_from_origin.present().copied())
    }

    /// Seconds from arrival here to arrival at the destination.
    pub fn arrival_time_to_destination(
        &mut self,
        stop: StopKey,
    ) -> Result<Option<i64>, TimetableError> {
        self.time_to_destination(stop, Side::Arrival)
    }

    /// Seconds from departure here to arrival at the destination.
    pub fn departure_time_to_destination(
        &mut self,
        stop: StopKey,
    ) -> Result<Option<i64>, TimetableError> {
        self.time_to_destination(stop, Side::Departure)
    }

    /// The estimate supplied at construction, if any. Never fetches.
    pub fn estimated_time_to_destination(&self, stop: StopKey) -> Result<Option<i64>, TimetableError> {
        Ok(self.stop_entry(stop)?.estimate)
    }

    /// Best available seconds to the destination.
    ///
    /// While the service's stop list has not been fetched, a
    /// construction-time estimate wins, so a board row never forces its
    /// service to be fetched just for this. Otherwise the authoritative
    /// departure value, then the arrival value, then the estimate.
    pub fn inferred_time_to_destination(
        &mut self,
        stop: StopKey,
    ) -> Result<Option<i64>, TimetableError> {
        let entry = self.stop_entry(stop)?;
        let (estimate, service) = (entry.estimate, entry.service);
        if estimate.is_some() && !self.is_service_resolved(service)? {
            return Ok(estimate);
        }
        if let Some(seconds) = self.departure_time_to_destination(stop)? {
            return Ok(Some(seconds));
        }
        if let Some(seconds) = self.arrival_time_to_destination(stop)? {
            return Ok(Some(seconds));
        }
        Ok(estimate)
    }

    /// Complete the stop's unresolved fields from its service.
    ///
    /// Runs at most once per stop. The service's stop list is searched for
    /// the stop at the same station with the same arrival time, or the same
    /// departure time when the arrival time is not known.
    pub fn resolve_stop_details(&mut self, stop: StopKey) -> Result<(), TimetableError> {
        let entry = self
            .stops
            .get_mut(stop.0)
            .ok_or(TimetableError::InvalidHandle)?;
        match entry.details {
            Details::Done => return Ok(()),
            Details::Resolving => return Err(TimetableError::ReentrantResolution("stop details")),
            Details::Pending => {}
        }
        entry.details = Details::Resolving;

        let snapshot = match self.find_in_service(stop) {
            Ok(found) => self.stops[found.0].snapshot(),
            Err(e) => {
                self.stops[stop.0].details = Details::Pending;
                return Err(e);
            }
        };

        let entry = &mut self.stops[stop.0];
        entry.fill_from(&snapshot);
        entry.details = Details::Done;
        Ok(())
    }

    /// Force every field and return a snapshot.
    pub fn stop_summary(&mut self, stop: StopKey) -> Result<StopSummary, TimetableError> {
        let service = self.stop_service(stop)?;
        let station_id = self.stop_station(stop)?;
        let station = self.station(station_id)?.clone();

        Ok(StopSummary {
            station,
            service_path: self.service_path(service)?.to_string(),
            service_name: self.service_name(service)?.map(str::to_string),
            arrival_time: self.arrival_time(stop)?,
            departure_time: self.departure_time(stop)?,
            platform: self.platform(stop)?,
            arrival_time_from_origin: self.arrival_time_from_origin(stop)?,
            departure_time_from_origin: self.departure_time_from_origin(stop)?,
            arrival_time_to_destination: self.arrival_time_to_destination(stop)?,
            departure_time_to_destination: self.departure_time_to_destination(stop)?,
            inferred_time_to_destination: self.inferred_time_to_destination(stop)?,
        })
    }

    fn stop_entry(&self, stop: StopKey) -> Result<&StopEntry, TimetableError> {
        self.stops.get(stop.0).ok_or(TimetableError::InvalidHandle)
    }

    /// The stop entry, completed first if `needs_details` says so.
    fn detailed_stop(
        &mut self,
        stop: StopKey,
        needs_details: impl Fn(&StopEntry) -> bool,
    ) -> Result<&StopEntry, TimetableError> {
        if needs_details(self.stop_entry(stop)?) {
            self.resolve_stop_details(stop)?;
        }
        self.stop_entry(stop)
    }

    fn find_in_service(&mut self, stop: StopKey) -> Result<StopKey, TimetableError> {
        let entry = self.stop_entry(stop)?;
        let (station, service, time) = (entry.station, entry.service, entry.match_time());

        let candidates = self.service_stops(service)?.to_vec();
        let found = time.and_then(|time| {
            candidates
                .into_iter()
                .find(|c| self.stops[c.0].matches(station, time))
        });

        match found {
            Some(found) => {
                trace!(?stop, ?found, %station, "matched stop in service");
                Ok(found)
            }
            None => Err(TimetableError::StopNotFound {
                station,
                time: match time {
                    Some(MatchTime::Arrival(t)) => format!("arrival {t}"),
                    Some(MatchTime::Departure(t)) => format!("departure {t}"),
                    None => "no known time".to_string(),
                },
                path: self.service_path(service)?.to_string(),
            }),
        }
    }

    fn time_to_destination(&mut self, stop: StopKey, side: Side) -> Result<Option<i64>, TimetableError> {
        let entry = self.stop_entry(stop)?;
        let memo = match side {
            Side::Arrival => &entry.arrival_to_destination,
            Side::Departure => &entry.departure_to_destination,
        };
        if let Some(known) = memo.known() {
            return Ok(known.copied());
        }

        let own = match side {
            Side::Arrival => self.arrival_time_from_origin(stop)?,
            Side::Departure => self.departure_time_from_origin(stop)?,
        };
        let value = match own {
            Some(own) => {
                let service = self.stop_service(stop)?;
                let destination = self.service_destination(service)?;
                self.arrival_time_from_origin(destination)?
                    .map(|at_destination| at_destination - own)
            }
            None => None,
        };

        let entry = &mut self.stops[stop.0];
        let memo = match side {
            Side::Arrival => &mut entry.arrival_to_destination,
            Side::Departure => &mut entry.departure_to_destination,
        };
        *memo = value.into();
        Ok(value)
    }
}
