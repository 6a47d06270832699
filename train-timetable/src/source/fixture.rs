//! Fixture-backed collaborator for offline use and testing.
//!
//! Loads boards, service pages and stations from a single JSON document and
//! serves them as if they came from the live source.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::board::TransportMask;
use crate::domain::StationId;

use super::error::FetchError;
use super::types::{BoardRow, ServiceDetails, StationRecord};
use super::{StationLookup, TimetableSource};

/// On-disk layout of a fixture document.
#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    stations: Vec<StationRecord>,
    #[serde(default)]
    boards: Vec<FixtureBoard>,
    #[serde(default)]
    services: HashMap<String, ServiceDetails>,
}

#[derive(Debug, Deserialize)]
struct FixtureBoard {
    station: StationId,
    hour: u8,
    rows: Vec<BoardRow>,
}

/// How many round-trips a [`FixtureSource`] has served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounts {
    pub boards: usize,
    pub services: usize,
    pub stations: usize,
}

/// Collaborator serving data from a JSON fixture.
///
/// The transport mask is ignored: fixture data is static. Every call is
/// counted so callers can check how often the core went to the source.
#[derive(Debug)]
pub struct FixtureSource {
    stations: Vec<StationRecord>,
    boards: HashMap<(StationId, u8), Vec<BoardRow>>,
    services: HashMap<String, ServiceDetails>,
    counts: Cell<FetchCounts>,
}

impl FixtureSource {
    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let document: FixtureDocument = serde_json::from_str(json)?;

        let boards = document
            .boards
            .into_iter()
            .map(|b| ((b.station, b.hour), b.rows))
            .collect();

        Ok(Self {
            stations: document.stations,
            boards,
            services: document.services,
            counts: Cell::new(FetchCounts::default()),
        })
    }

    /// Load a fixture from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading timetable fixture");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Round-trips served so far.
    pub fn fetch_counts(&self) -> FetchCounts {
        self.counts.get()
    }

    fn count(&self, update: impl FnOnce(&mut FetchCounts)) {
        let mut counts = self.counts.get();
        update(&mut counts);
        self.counts.set(counts);
    }
}

impl TimetableSource for FixtureSource {
    fn departure_board(
        &self,
        station: StationId,
        hour: u8,
        _transport: TransportMask,
    ) -> Result<Vec<BoardRow>, FetchError> {
        self.count(|c| c.boards += 1);
        Ok(self
            .boards
            .get(&(station, hour))
            .cloned()
            .unwrap_or_default())
    }

    fn service(&self, path: &str) -> Result<ServiceDetails, FetchError> {
        self.count(|c| c.services += 1);
        self.services
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

impl StationLookup for FixtureSource {
    fn station_by_id(&self, id: StationId) -> Result<Option<StationRecord>, FetchError> {
        self.count(|c| c.stations += 1);
        Ok(self.stations.iter().find(|s| s.id == id).cloned())
    }

    fn search_stations(&self, text: &str) -> Result<Vec<StationRecord>, FetchError> {
        self.count(|c| c.stations += 1);
        let needle = text.trim().to_lowercase();
        Ok(self
            .stations
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
