//! Merging hourly departure board windows into stops.
//!
//! Each board row becomes a stop at the queried station, owned by a
//! minimal service that knows only its path, name and destination. The
//! service's full stop list is fetched later only if something asks for a
//! field the row did not carry.

use tracing::{debug, trace};

use crate::domain::{ClockTime, RolloverResolver, StationId};
use crate::graph::{StopInit, StopKey, Timetable, TimetableError};
use crate::source::{BoardRow, StationLookup, TimetableSource};

use super::BoardConfig;

/// Best-effort seconds from `departure` to `arrival` via the times printed
/// on a board row.
///
/// Intermediate times only serve to detect midnight rollovers. The result
/// may differ from the value computed from the full service, which takes
/// precedence once it is known.
///
/// ```
/// use train_timetable::board::estimate_time_to_destination;
/// use train_timetable::domain::ClockTime;
///
/// let t = |s| ClockTime::parse(s).unwrap();
/// // Departs 23:10, passes 23:50 and 00:20, arrives 01:05.
/// let estimate = estimate_time_to_destination(t("23:10"), &[t("23:50"), t("00:20")], t("01:05"));
/// assert_eq!(estimate, 6900);
/// ```
pub fn estimate_time_to_destination(
    departure: ClockTime,
    intermediate: &[ClockTime],
    arrival: ClockTime,
) -> i64 {
    let mut resolver = RolloverResolver::new(departure);
    for &time in intermediate {
        resolver.advance(time);
    }
    resolver.advance(arrival)
}

impl<S: TimetableSource, L: StationLookup> Timetable<S, L> {
    /// Departures from `station` across the configured hourly windows.
    ///
    /// Windows are fetched in `config.hours` order and rows kept in fetch
    /// order. A service listed in two adjacent windows yields two stops;
    /// nothing is deduplicated.
    pub fn departure_board(
        &mut self,
        station: StationId,
        config: &BoardConfig,
    ) -> Result<Vec<StopKey>, TimetableError> {
        if let Some(&hour) = config.hours.iter().find(|&&h| h > 23) {
            return Err(TimetableError::InvalidHour(hour));
        }

        let mut stops = Vec::new();
        for &hour in &config.hours {
            debug!(%station, hour, transport = %config.transport, "fetching departure board");
            let rows = self
                .source()
                .departure_board(station, hour, config.transport)?;
            for row in &rows {
                stops.push(self.add_board_row(station, row)?);
            }
        }
        Ok(stops)
    }

    /// Build the stop, and its minimal service, for one board row.
    pub fn add_board_row(&mut self, station: StationId, row: &BoardRow) -> Result<StopKey, TimetableError> {
        let departure = ClockTime::parse(&row.departure_time)?;
        let arrival = ClockTime::parse(&row.destination.arrival_time)?;
        let intermediate = row
            .intermediate_times()
            .map(ClockTime::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let estimate = estimate_time_to_destination(departure, &intermediate, arrival);

        let service = self.add_service(row.service_path.clone(), row.service_name.clone());
        let destination = self.add_stop(
            service,
            StopInit::new(row.destination.station_id)
                .arrival_time(Some(arrival))
                .departure_time(None),
        )?;
        self.set_destination_hint(service, destination);

        trace!(
            path = %row.service_path,
            %departure,
            estimate,
            "board row"
        );
        self.add_stop(
            service,
            StopInit::new(station)
                .departure_time(Some(departure))
                .platform(row.platform().map(str::to_string))
                .estimated_time_to_destination(estimate),
        )
    }
}
