//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::board::TransportMask;
use crate::domain::StationId;
use crate::source::{
    BoardDestination, BoardRow, FetchError, ServiceDetails, ServiceRow, StationLookup,
    StationRecord, TimetableSource,
};

/// Stub serving both collaborator roles and counting every call.
#[derive(Default)]
pub(crate) struct StubSource {
    stations: Vec<StationRecord>,
    boards: HashMap<(StationId, u8), Vec<BoardRow>>,
    services: HashMap<String, ServiceDetails>,
    forbid_service_fetch: bool,
    board_requests: RefCell<Vec<(StationId, u8, TransportMask)>>,
    service_fetches: Cell<usize>,
    station_lookups: Cell<usize>,
}

impl StubSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_station(mut self, id: u32, name: &str, coords: Option<(f64, f64)>) -> Self {
        self.stations.push(StationRecord {
            id: StationId(id),
            name: name.to_string(),
            x_coord: coords.map(|c| c.0),
            y_coord: coords.map(|c| c.1),
        });
        self
    }

    pub(crate) fn with_board(mut self, station: u32, hour: u8, rows: Vec<BoardRow>) -> Self {
        self.boards.insert((StationId(station), hour), rows);
        self
    }

    pub(crate) fn with_service(mut self, path: &str, name: Option<&str>, rows: Vec<ServiceRow>) -> Self {
        self.services.insert(
            path.to_string(),
            ServiceDetails {
                name: name.map(str::to_string),
                features: Vec::new(),
                rows,
            },
        );
        self
    }

    pub(crate) fn with_service_features(
        mut self,
        path: &str,
        rows: Vec<ServiceRow>,
        features: Vec<String>,
    ) -> Self {
        self.services.insert(
            path.to_string(),
            ServiceDetails {
                name: None,
                features,
                rows,
            },
        );
        self
    }

    /// Panic on any service fetch.
    pub(crate) fn forbid_service_fetch(mut self) -> Self {
        self.forbid_service_fetch = true;
        self
    }

    pub(crate) fn service_fetches(&self) -> usize {
        self.service_fetches.get()
    }

    pub(crate) fn station_lookups(&self) -> usize {
        self.station_lookups.get()
    }

    pub(crate) fn board_requests(&self) -> Vec<(StationId, u8, TransportMask)> {
        self.board_requests.borrow().clone()
    }
}

impl TimetableSource for StubSource {
    fn departure_board(
        &self,
        station: StationId,
        hour: u8,
        transport: TransportMask,
    ) -> Result<Vec<BoardRow>, FetchError> {
        self.board_requests
            .borrow_mut()
            .push((station, hour, transport));
        Ok(self
            .boards
            .get(&(station, hour))
            .cloned()
            .unwrap_or_default())
    }

    fn service(&self, path: &str) -> Result<ServiceDetails, FetchError> {
        assert!(!self.forbid_service_fetch, "unexpected service fetch: {path}");
        self.service_fetches.set(self.service_fetches.get() + 1);
        self.services
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

impl StationLookup for StubSource {
    fn station_by_id(&self, id: StationId) -> Result<Option<StationRecord>, FetchError> {
        self.station_lookups.set(self.station_lookups.get() + 1);
        Ok(self.stations.iter().find(|s| s.id == id).cloned())
    }

    fn search_stations(&self, text: &str) -> Result<Vec<StationRecord>, FetchError> {
        self.station_lookups.set(self.station_lookups.get() + 1);
        Ok(self
            .stations
            .iter()
            .filter(|s| s.name.contains(text))
            .cloned()
            .collect())
    }
}

/// A service page row.
pub(crate) fn row(id: u32, arr: Option<&str>, dep: Option<&str>, platform: Option<&str>) -> ServiceRow {
    ServiceRow {
        station_id: StationId(id),
        station_name: None,
        coordinates: None,
        arrival_time: arr.map(str::to_string),
        departure_time: dep.map(str::to_string),
        platform: platform.map(str::to_string),
    }
}

/// A departure board row with no intermediate times.
pub(crate) fn board_row(
    path: &str,
    departure: &str,
    platform: &str,
    destination: u32,
    arrival: &str,
) -> BoardRow {
    BoardRow {
        service_path: path.to_string(),
        service_name: None,
        destination: BoardDestination {
            station_id: StationId(destination),
            arrival_time: arrival.to_string(),
        },
        intermediate_times: Vec::new(),
        departure_time: departure.to_string(),
        platform: platform.to_string(),
    }
}
