//! Content-derived service identity.
//!
//! Timetable sources do not assign services a stable identifier, so two
//! services are the same scheduled run exactly when they call at the same
//! stations at the same times in the same order. A fingerprint captures
//! that as a fast hash for in-process grouping and a SHA-256 digest that
//! stays stable across runs.

use std::fmt;
use std::hash::{Hash, Hasher};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use xxhash_rust::xxh3::xxh3_64;

use crate::domain::{ClockTime, StationId};
use crate::graph::{ServiceKey, Timetable, TimetableError};
use crate::source::{StationLookup, TimetableSource};

/// One stop as it contributes to a service's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTuple {
    pub station: StationId,
    pub departure: Option<ClockTime>,
    pub arrival: Option<ClockTime>,
}

impl StopTuple {
    /// Stable text form, `-` standing for an absent time.
    fn write_canonical(&self, out: &mut String) {
        let time = |t: Option<ClockTime>| t.map_or_else(|| "-".to_string(), |t| t.to_string());
        out.push_str(&format!(
            "{}|{}|{};",
            self.station,
            time(self.departure),
            time(self.arrival)
        ));
    }
}

/// SHA-256 of a service's canonical stop sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceDigest([u8; 32]);

impl ServiceDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ServiceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for ServiceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceDigest({self})")
    }
}

/// Identity of a scheduled run.
///
/// Hashes by the fast hash only, so fingerprints can key a `HashMap` to
/// group services; equality also compares the digest.
#[derive(Debug, Clone, Copy)]
pub struct ServiceFingerprint {
    hash: u64,
    digest: ServiceDigest,
}

impl ServiceFingerprint {
    /// Fingerprint an ordered stop sequence.
    ///
    /// ```
    /// use train_timetable::domain::{ClockTime, StationId};
    /// use train_timetable::identity::{ServiceFingerprint, StopTuple};
    ///
    /// let stop = |id, dep: Option<&str>, arr: Option<&str>| StopTuple {
    ///     station: StationId(id),
    ///     departure: dep.map(|t| ClockTime::parse(t).unwrap()),
    ///     arrival: arr.map(|t| ClockTime::parse(t).unwrap()),
    /// };
    /// let a = ServiceFingerprint::from_stops(&[stop(1, Some("08:00"), None), stop(2, None, Some("09:00"))]);
    /// let b = ServiceFingerprint::from_stops(&[stop(1, Some("08:00"), None), stop(2, None, Some("09:00"))]);
    /// assert_eq!(a, b);
    /// assert_eq!(a.digest().to_string().len(), 43);
    /// ```
    pub fn from_stops(stops: &[StopTuple]) -> Self {
        let mut canonical = String::with_capacity(stops.len() * 24);
        for stop in stops {
            stop.write_canonical(&mut canonical);
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(canonical.as_bytes()));
        Self {
            hash: xxh3_64(canonical.as_bytes()),
            digest: ServiceDigest(digest),
        }
    }

    /// Fast, collision-tolerant hash for in-process grouping.
    pub fn fast_hash(&self) -> u64 {
        self.hash
    }

    /// Persistent deduplication key.
    pub fn digest(&self) -> ServiceDigest {
        self.digest
    }
}

impl PartialEq for ServiceFingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.digest == other.digest
    }
}

impl Eq for ServiceFingerprint {}

impl Hash for ServiceFingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<S: TimetableSource, L: StationLookup> Timetable<S, L> {
    /// The service's stops as identity tuples, fetching the stop list and
    /// completing every stop as needed.
    pub fn stop_tuples(&mut self, service: ServiceKey) -> Result<Vec<StopTuple>, TimetableError> {
        let stops = self.service_stops(service)?.to_vec();
        let mut tuples = Vec::with_capacity(stops.len());
        for stop in stops {
            tuples.push(StopTuple {
                station: self.stop_station(stop)?,
                departure: self.departure_time(stop)?,
                arrival: self.arrival_time(stop)?,
            });
        }
        Ok(tuples)
    }

    /// Content-derived identity of the service.
    pub fn fingerprint(&mut self, service: ServiceKey) -> Result<ServiceFingerprint, TimetableError> {
        Ok(ServiceFingerprint::from_stops(&self.stop_tuples(service)?))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::source::ServiceRow;
    use crate::testing::{StubSource, row};

    fn rows() -> Vec<ServiceRow> {
        vec![
            row(8503000, None, Some("08:02"), Some("31")),
            row(8500010, Some("08:56"), Some("09:00"), Some("7")),
            row(8507000, Some("09:40"), None, Some("2")),
        ]
    }

    fn fingerprint_of(rows: Vec<ServiceRow>) -> ServiceFingerprint {
        let stub = StubSource::new().with_service("/s/x", None, rows);
        let mut timetable = Timetable::new(&stub, &stub);
        let service = timetable.add_service("/s/x", None);
        timetable.fingerprint(service).unwrap()
    }

    #[test]
    fn identical_stop_sequences_match() {
        let a = fingerprint_of(rows());
        let b = fingerprint_of(rows());
        assert_eq!(a, b);
        assert_eq!(a.fast_hash(), b.fast_hash());
        assert_eq!(a.digest().to_string(), b.digest().to_string());
    }

    #[test]
    fn platforms_do_not_affect_identity() {
        let mut other = rows();
        other[1].platform = Some("8".into());
        assert_eq!(fingerprint_of(rows()), fingerprint_of(other));
    }

    #[test]
    fn changed_time_changes_both() {
        let base = fingerprint_of(rows());
        let mut other = rows();
        other[1].departure_time = Some("09:01".into());
        let changed = fingerprint_of(other);

        assert_ne!(base.fast_hash(), changed.fast_hash());
        assert_ne!(base.digest(), changed.digest());
    }

    #[test]
    fn changed_station_changes_both() {
        let base = fingerprint_of(rows());
        let mut other = rows();
        other[2].station_id = StationId(8507100);
        let changed = fingerprint_of(other);

        assert_ne!(base.fast_hash(), changed.fast_hash());
        assert_ne!(base.digest(), changed.digest());
    }

    #[test]
    fn order_matters() {
        let base = fingerprint_of(rows());
        let mut reversed = rows();
        reversed.swap(0, 2);
        let changed = fingerprint_of(reversed);
        assert_ne!(base.digest(), changed.digest());
    }

    #[test]
    fn canonical_text_marks_absent_times() {
        let mut out = String::new();
        StopTuple {
            station: StationId(1),
            departure: Some(ClockTime::parse("8:05").unwrap()),
            arrival: None,
        }
        .write_canonical(&mut out);
        assert_eq!(out, "1|08:05|-;");
    }

    #[test]
    fn fingerprint_fetches_service_once() {
        let stub = StubSource::new().with_service("/s/x", None, rows());
        let mut timetable = Timetable::new(&stub, &stub);
        let service = timetable.add_service("/s/x", None);

        let first = timetable.fingerprint(service).unwrap();
        let second = timetable.fingerprint(service).unwrap();
        assert_eq!(first, second);
        assert_eq!(stub.service_fetches(), 1);
    }

    #[test]
    fn groups_by_fingerprint() {
        let mut groups: HashMap<ServiceFingerprint, usize> = HashMap::new();
        for fp in [fingerprint_of(rows()), fingerprint_of(rows())] {
            *groups.entry(fp).or_default() += 1;
        }
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.values().next(), Some(&2));
    }
}
