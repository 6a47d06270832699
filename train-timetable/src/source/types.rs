//! Row records handed over by the external collaborators.
//!
//! These mirror the structured rows a timetable page yields once parsed.
//! Text fields are kept as the source wrote them; the graph layer parses
//! times and decides what is absent. Scraped cells are often empty rather
//! than missing, so the accessors treat blank text as no value.

use serde::Deserialize;

use crate::domain::{Coordinates, Station, StationId};

/// One row of a departure board for a single hourly window.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardRow {
    /// Locator of the full service page.
    pub service_path: String,

    /// Service name as shown on the board (e.g. "IC 8").
    pub service_name: Option<String>,

    /// Where the service terminates.
    pub destination: BoardDestination,

    /// Times at the stops between this station and the destination, in
    /// travel order.
    #[serde(default)]
    pub intermediate_times: Vec<String>,

    /// Departure time from the board station.
    pub departure_time: String,

    /// Platform text; empty when the board shows none.
    #[serde(default)]
    pub platform: String,
}

impl BoardRow {
    /// Platform text, or `None` for a blank cell.
    pub fn platform(&self) -> Option<&str> {
        non_blank(Some(&self.platform))
    }

    /// Intermediate stop times with blank cells dropped.
    pub fn intermediate_times(&self) -> impl Iterator<Item = &str> {
        self.intermediate_times
            .iter()
            .filter_map(|t| non_blank(Some(t)))
    }
}

/// Destination link and time from a board row.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardDestination {
    pub station_id: StationId,
    pub arrival_time: String,
}

/// Full detail page of one service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDetails {
    /// Service name, if the page shows one.
    pub name: Option<String>,

    /// Service attributes (e.g. "Restaurant", "Bicycles conveyed").
    #[serde(default)]
    pub features: Vec<String>,

    /// Stops in document (travel) order.
    pub rows: Vec<ServiceRow>,
}

/// One stop row of a service detail page.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRow {
    pub station_id: StationId,
    pub station_name: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
    pub platform: Option<String>,
}

impl ServiceRow {
    /// Arrival time text, `None` for a missing or blank cell.
    pub fn arrival_text(&self) -> Option<&str> {
        non_blank(self.arrival_time.as_ref())
    }

    /// Departure time text, `None` for a missing or blank cell.
    pub fn departure_text(&self) -> Option<&str> {
        non_blank(self.departure_time.as_ref())
    }

    /// Platform text, `None` for a missing or blank cell.
    pub fn platform_text(&self) -> Option<&str> {
        non_blank(self.platform.as_ref())
    }
}

/// Candidate returned by the station lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
    pub id: StationId,
    pub name: String,
    pub x_coord: Option<f64>,
    pub y_coord: Option<f64>,
}

impl StationRecord {
    /// Coordinates, when both axes are published.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.x_coord, self.y_coord) {
            (Some(x), Some(y)) => Some(Coordinates { x, y }),
            _ => None,
        }
    }
}

impl From<StationRecord> for Station {
    fn from(record: StationRecord) -> Self {
        let coordinates = record.coordinates();
        Station::new(record.id, record.name, coordinates)
    }
}

fn non_blank(text: Option<&String>) -> Option<&str> {
    text.map(|t| t.trim()).filter(|t| !t.is_empty())
}
