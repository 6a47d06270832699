//! Services and their lazily fetched stop lists.
//!
//! A `Service` is a scheduled run at a time of day, not a dated trip. Its
//! stop list is either supplied up front or fetched in full from the
//! service page the first time anything needs it, and is never fetched
//! again after that.

use tracing::{debug, trace};

use crate::domain::{
    ClockTime, RolloverResolver, SECONDS_PER_DAY, Station, TimeError, resolve_sequence,
};
use crate::source::{ServiceDetails, ServiceRow, StationLookup, TimetableSource};

use super::stop::{StopEntry, StopInit};
use super::{Memo, ServiceKey, StopKey, Timetable, TimetableError};

/// A service as stored in the timetable.
#[derive(Debug)]
pub(super) struct ServiceEntry {
    path: String,
    name: Option<String>,
    stops: Memo<Vec<StopKey>>,
    features: Vec<String>,
    /// Destination known before the stop list, e.g. from a board row.
    destination_hint: Option<StopKey>,
}

impl<S: TimetableSource, L: StationLookup> Timetable<S, L> {
    /// Register a service whose stops are fetched from `path` on demand.
    pub fn add_service(&mut self, path: impl Into<String>, name: Option<String>) -> ServiceKey {
        self.push_service(path.into(), name, Memo::Unresolved)
    }

    /// Register a service with a stop list that is already known.
    ///
    /// The list is final: it is never replaced by a fetch. Times from
    /// origin that were left unresolved are derived from the stops' known
    /// clock times.
    pub fn add_service_with_stops(
        &mut self,
        path: impl Into<String>,
        name: Option<String>,
        mut stops: Vec<StopInit>,
    ) -> ServiceKey {
        fill_elapsed_times(&mut stops);
        let key = self.push_service(path.into(), name, Memo::Resolving);
        let stops = stops
            .into_iter()
            .map(|init| self.push_stop(key, init))
            .collect::<Vec<_>>();
        self.services[key.0].stops = Memo::Ready(stops);
        key
    }

    /// The external locator of the service page.
    pub fn service_path(&self, key: ServiceKey) -> Result<&str, TimetableError> {
        Ok(&self.service_entry(key)?.path)
    }

    /// The service name, if known. Never triggers a fetch.
    pub fn service_name(&self, key: ServiceKey) -> Result<Option<&str>, TimetableError> {
        Ok(self.service_entry(key)?.name.as_deref())
    }

    /// Whether the stop list is already materialized.
    pub fn is_service_resolved(&self, key: ServiceKey) -> Result<bool, TimetableError> {
        Ok(self.service_entry(key)?.stops.is_ready())
    }

    /// The full stop list in travel order, fetching it on first access.
    pub fn service_stops(&mut self, key: ServiceKey) -> Result<&[StopKey], TimetableError> {
        self.ensure_stops(key)?;
        match &self.service_entry(key)?.stops {
            Memo::Ready(stops) => Ok(stops),
            _ => Err(TimetableError::ReentrantResolution("service stops")),
        }
    }

    /// Service attributes published on the service page.
    pub fn service_features(&mut self, key: ServiceKey) -> Result<&[String], TimetableError> {
        self.ensure_stops(key)?;
        Ok(&self.service_entry(key)?.features)
    }

    /// The first stop of the stop list.
    pub fn service_origin(&mut self, key: ServiceKey) -> Result<StopKey, TimetableError> {
        let first = self.service_stops(key)?.first().copied();
        first.ok_or_else(|| self.empty_service(key))
    }

    /// The last stop of the stop list.
    ///
    /// Before the list is fetched, a destination supplied at construction
    /// stands in for it; its own unresolved fields still resolve against
    /// the full list.
    pub fn service_destination(&mut self, key: ServiceKey) -> Result<StopKey, TimetableError> {
        let entry = self.service_entry(key)?;
        if !entry.stops.is_ready()
            && let Some(hint) = entry.destination_hint
        {
            return Ok(hint);
        }
        let last = self.service_stops(key)?.last().copied();
        last.ok_or_else(|| self.empty_service(key))
    }

    pub(crate) fn set_destination_hint(&mut self, key: ServiceKey, stop: StopKey) {
        if let Some(entry) = self.services.get_mut(key.0) {
            entry.destination_hint = Some(stop);
        }
    }

    pub(super) fn service_entry(&self, key: ServiceKey) -> Result<&ServiceEntry, TimetableError> {
        self.services.get(key.0).ok_or(TimetableError::InvalidHandle)
    }

    fn push_service(
        &mut self,
        path: String,
        name: Option<String>,
        stops: Memo<Vec<StopKey>>,
    ) -> ServiceKey {
        let key = ServiceKey(self.services.len());
        self.services.push(ServiceEntry {
            path,
            name,
            stops,
            features: Vec::new(),
            destination_hint: None,
        });
        key
    }

    pub(super) fn push_stop(&mut self, service: ServiceKey, init: StopInit) -> StopKey {
        let key = StopKey(self.stops.len());
        self.add_station_id(init.station);
        self.stops.push(StopEntry::new(service, init));
        key
    }

    fn empty_service(&self, key: ServiceKey) -> TimetableError {
        let path = self
            .service_entry(key)
            .map(|e| e.path.clone())
            .unwrap_or_default();
        TimetableError::EmptyService(path)
    }

    /// Materialize the stop list, at most once.
    fn ensure_stops(&mut self, key: ServiceKey) -> Result<(), TimetableError> {
        let entry = self
            .services
            .get_mut(key.0)
            .ok_or(TimetableError::InvalidHandle)?;
        match entry.stops {
            Memo::Ready(_) => return Ok(()),
            Memo::Resolving => return Err(TimetableError::ReentrantResolution("service stops")),
            Memo::Unresolved => {}
        }
        entry.stops = Memo::Resolving;
        let path = entry.path.clone();

        debug!(path = %path, "fetching service");
        let built = self
            .source
            .service(&path)
            .map_err(TimetableError::from)
            .and_then(|details| {
                let inits = stops_from_rows(&details.rows)?;
                Ok((details, inits))
            });

        let (details, inits) = match built {
            Ok(built) => built,
            Err(e) => {
                self.services[key.0].stops = Memo::Unresolved;
                return Err(e);
            }
        };

        let ServiceDetails {
            name,
            features,
            rows,
        } = details;
        for row in rows {
            if let Some(station_name) = row.station_name {
                self.add_station(Station::new(row.station_id, station_name, row.coordinates));
            }
        }
        let stops = inits
            .into_iter()
            .map(|init| self.push_stop(key, init))
            .collect::<Vec<_>>();
        trace!(path = %path, stops = stops.len(), "service materialized");

        let entry = &mut self.services[key.0];
        entry.stops = Memo::Ready(stops);
        entry.features = features;
        if entry.name.is_none() {
            entry.name = name;
        }
        Ok(())
    }
}

/// Turn service page rows into fully settled stops.
///
/// Elapsed times are measured from the origin departure, see
/// [`elapsed_from_origin`]. Missing times and platforms become absent,
/// never unresolved.
fn stops_from_rows(rows: &[ServiceRow]) -> Result<Vec<StopInit>, TimeError> {
    let mut times = Vec::with_capacity(rows.len() * 2);
    for row in rows {
        times.push(row.arrival_text().map(ClockTime::parse).transpose()?);
        times.push(row.departure_text().map(ClockTime::parse).transpose()?);
    }
    let elapsed = elapsed_from_origin(&times);

    Ok(rows
        .iter()
        .zip(times.chunks(2).zip(elapsed.chunks(2)))
        .map(|(row, (time, from_origin))| {
            StopInit::new(row.station_id)
                .arrival_time(time[0])
                .departure_time(time[1])
                .platform(row.platform_text().map(str::to_string))
                .arrival_from_origin(from_origin[0])
                .departure_from_origin(from_origin[1])
        })
        .collect())
}

/// Seconds from the origin departure for interleaved arrival/departure
/// samples in travel order.
///
/// The origin's departure is the baseline even when the origin also lists
/// an arrival; that arrival resolves to minus its dwell time. Without an
/// origin departure the first present sample is the baseline.
fn elapsed_from_origin(times: &[Option<ClockTime>]) -> Vec<Option<i64>> {
    let Some(baseline) = times.get(1).copied().flatten() else {
        return resolve_sequence(times);
    };

    let origin_arrival = times[0]
        .map(|arrival| -baseline.seconds_since(arrival).rem_euclid(SECONDS_PER_DAY));
    let mut resolver = RolloverResolver::new(baseline);
    std::iter::once(origin_arrival)
        .chain(times[1..].iter().map(|time| time.map(|t| resolver.advance(t))))
        .collect()
}

/// Derive unresolved times from origin from known clock times.
///
/// A from-origin value stays unresolved when its clock time is unresolved.
fn fill_elapsed_times(stops: &mut [StopInit]) {
    let times = stops
        .iter()
        .flat_map(|s| [s.arrival_time.present().copied(), s.departure_time.present().copied()])
        .collect::<Vec<_>>();
    let elapsed = elapsed_from_origin(&times);

    for (stop, from_origin) in stops.iter_mut().zip(elapsed.chunks(2)) {
        if stop.arrival_from_origin.is_unresolved() && !stop.arrival_time.is_unresolved() {
            stop.arrival_from_origin = from_origin[0].into();
        }
        if stop.departure_from_origin.is_unresolved() && !stop.departure_time.is_unresolved() {
            stop.departure_from_origin = from_origin[1].into();
        }
    }
}
