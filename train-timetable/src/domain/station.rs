//! Station identity and record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source-assigned numeric station identifier.
///
/// The upstream timetable numbers every station; two stations are the same
/// station exactly when their ids match.
///
/// # Examples
///
/// ```
/// use train_timetable::domain::StationId;
///
/// let bern = StationId(8507000);
/// assert_eq!(bern.to_string(), "8507000");
/// assert_eq!(StationId::from(8507000), bern);
/// ```
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl From<u32> for StationId {
    fn from(value: u32) -> Self {
        StationId(value)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic position as published by the station lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// A fully resolved station.
///
/// Once a `Station` exists its fields never change; unresolved stations
/// live only inside the timetable until their lookup succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Source-assigned identifier
    pub id: StationId,
    /// Display name
    pub name: String,
    /// Position, when the lookup publishes one
    pub coordinates: Option<Coordinates>,
}

impl Station {
    /// Creates a station from fully known fields.
    pub fn new(id: StationId, name: impl Into<String>, coordinates: Option<Coordinates>) -> Self {
        Self {
            id,
            name: name.into(),
            coordinates,
        }
    }

    /// Horizontal coordinate, if known.
    pub fn x_coord(&self) -> Option<f64> {
        self.coordinates.map(|c| c.x)
    }

    /// Vertical coordinate, if known.
    pub fn y_coord(&self) -> Option<f64> {
        self.coordinates.map(|c| c.y)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_equality_and_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(StationId(8503000));
        assert!(set.contains(&StationId(8503000)));
        assert!(!set.contains(&StationId(8507000)));
    }

    #[test]
    fn station_id_debug() {
        assert_eq!(format!("{:?}", StationId(42)), "StationId(42)");
    }

    #[test]
    fn station_coords() {
        let station = Station::new(
            StationId(8503000),
            "Zürich HB",
            Some(Coordinates {
                x: 8.540192,
                y: 47.378177,
            }),
        );
        assert_eq!(station.x_coord(), Some(8.540192));
        assert_eq!(station.y_coord(), Some(47.378177));
        assert_eq!(station.to_string(), "Zürich HB (8503000)");

        let bare = Station::new(StationId(1), "Halt", None);
        assert_eq!(bare.x_coord(), None);
    }

    #[test]
    fn station_id_deserializes_from_number() {
        let id: StationId = serde_json::from_str("8507000").unwrap();
        assert_eq!(id, StationId(8507000));
    }
}
