//! Station registration and lazy lookup.

use tracing::debug;

use crate::domain::{Station, StationId};
use crate::source::{StationLookup, TimetableSource};

use super::{Memo, Timetable, TimetableError};

impl<S: TimetableSource, L: StationLookup> Timetable<S, L> {
    /// Register a fully specified station.
    ///
    /// A station that is already resolved keeps its original fields.
    pub fn add_station(&mut self, station: Station) -> StationId {
        let id = station.id;
        let slot = self.stations.entry(id).or_insert(Memo::Unresolved);
        if !slot.is_ready() {
            *slot = Memo::Ready(station);
        }
        id
    }

    /// Register a station known only by id.
    ///
    /// Its name and coordinates are looked up on first access.
    pub fn add_station_id(&mut self, id: StationId) -> StationId {
        self.stations.entry(id).or_insert(Memo::Unresolved);
        id
    }

    /// Whether the station's fields are known without a lookup.
    pub fn is_station_resolved(&self, id: StationId) -> bool {
        self.stations.get(&id).is_some_and(Memo::is_ready)
    }

    /// The station with this id, looking it up if needed.
    ///
    /// Name and coordinates are filled together from a single lookup.
    pub fn station(&mut self, id: StationId) -> Result<&Station, TimetableError> {
        if !self.is_station_resolved(id) {
            self.resolve_station(id)?;
        }
        match self.stations.get(&id) {
            Some(Memo::Ready(station)) => Ok(station),
            _ => Err(TimetableError::UnknownStation(id)),
        }
    }

    /// Search the station lookup by free text.
    ///
    /// Every candidate is registered as a resolved station. Ids are
    /// returned in lookup order.
    pub fn find_stations(&mut self, text: &str) -> Result<Vec<StationId>, TimetableError> {
        debug!(text, "searching stations");
        let records = self.lookup.search_stations(text)?;
        Ok(records
            .into_iter()
            .map(|record| self.add_station(record.into()))
            .collect())
    }

    fn resolve_station(&mut self, id: StationId) -> Result<(), TimetableError> {
        match self.stations.get(&id) {
            Some(Memo::Ready(_)) => return Ok(()),
            Some(Memo::Resolving) => return Err(TimetableError::ReentrantResolution("station")),
            _ => {}
        }
        self.stations.insert(id, Memo::Resolving);

        debug!(%id, "looking up station");
        let record = match self.lookup.station_by_id(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.stations.insert(id, Memo::Unresolved);
                return Err(TimetableError::UnknownStation(id));
            }
            Err(e) => {
                self.stations.insert(id, Memo::Unresolved);
                return Err(e.into());
            }
        };

        let station = Station::new(id, record.name.clone(), record.coordinates());
        self.stations.insert(id, Memo::Ready(station));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{Coordinates, Station, StationId};
    use crate::graph::{Timetable, TimetableError};
    use crate::testing::StubSource;

    #[test]
    fn id_only_station_resolves_once() {
        let stub = StubSource::new().with_station(8507000, "Bern", Some((7.43, 46.94)));
        let mut timetable = Timetable::new(&stub, &stub);

        let id = timetable.add_station_id(StationId(8507000));
        assert!(!timetable.is_station_resolved(id));
        assert_eq!(stub.station_lookups(), 0);

        let station = timetable.station(id).unwrap();
        assert_eq!(station.name, "Bern");
        assert_eq!(station.x_coord(), Some(7.43));
        assert_eq!(station.y_coord(), Some(46.94));

        let again = timetable.station(id).unwrap().clone();
        assert_eq!(again.name, "Bern");
        assert_eq!(stub.station_lookups(), 1);
    }

    #[test]
    fn full_station_never_looked_up() {
        let stub = StubSource::new();
        let mut timetable = Timetable::new(&stub, &stub);

        let id = timetable.add_station(Station::new(
            StationId(8503000),
            "Zürich HB",
            Some(Coordinates { x: 8.54, y: 47.37 }),
        ));
        assert_eq!(timetable.station(id).unwrap().name, "Zürich HB");
        assert_eq!(stub.station_lookups(), 0);
    }

    #[test]
    fn resolved_station_fields_never_change() {
        let stub = StubSource::new();
        let mut timetable = Timetable::new(&stub, &stub);

        timetable.add_station(Station::new(StationId(1), "First", None));
        timetable.add_station(Station::new(StationId(1), "Second", None));
        timetable.add_station_id(StationId(1));

        assert_eq!(timetable.station(StationId(1)).unwrap().name, "First");
    }

    #[test]
    fn unknown_station_is_an_error_and_retried() {
        let stub = StubSource::new();
        let mut timetable = Timetable::new(&stub, &stub);
        timetable.add_station_id(StationId(99));

        let err = timetable.station(StationId(99)).unwrap_err();
        assert!(matches!(err, TimetableError::UnknownStation(StationId(99))));
        assert!(!timetable.is_station_resolved(StationId(99)));

        assert!(timetable.station(StationId(99)).is_err());
        assert_eq!(stub.station_lookups(), 2);
    }

    #[test]
    fn find_stations_registers_candidates() {
        let stub = StubSource::new()
            .with_station(8503000, "Zürich HB", None)
            .with_station(8503003, "Zürich Stadelhofen", None)
            .with_station(8507000, "Bern", None);
        let mut timetable = Timetable::new(&stub, &stub);

        let ids = timetable.find_stations("Zürich").unwrap();
        assert_eq!(ids, vec![StationId(8503000), StationId(8503003)]);
        assert!(timetable.is_station_resolved(StationId(8503003)));
        assert!(!timetable.is_station_resolved(StationId(8507000)));
    }
}
