//! Midnight rollover inference for time-of-day sequences.
//!
//! A journey's times arrive as bare "HH:MM" values. Given that the journey
//! only ever moves forward, any sample that is earlier in the day than the
//! sample before it must have crossed midnight. The resolver counts those
//! crossings and converts every sample into seconds elapsed since the first
//! one.
//!
//! Two consecutive samples more than 24 hours apart look identical to a
//! same-day pair and are reported as such. Timetable data gives no way to
//! tell them apart.

use tracing::trace;

use super::ClockTime;

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Stateful converter from forward-moving clock times to elapsed seconds.
///
/// # Examples
///
/// ```
/// use train_timetable::domain::{ClockTime, RolloverResolver};
///
/// let t = |s| ClockTime::parse(s).unwrap();
/// let mut resolver = RolloverResolver::new(t("23:30"));
///
/// assert_eq!(resolver.advance(t("23:45")), 900);
/// assert_eq!(resolver.advance(t("00:15")), 2700);
/// assert_eq!(resolver.days_passed(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RolloverResolver {
    baseline: ClockTime,
    last_time: ClockTime,
    days_passed: u32,
}

impl RolloverResolver {
    /// Start a resolver at the journey's first sample.
    pub fn new(baseline: ClockTime) -> Self {
        Self {
            baseline,
            last_time: baseline,
            days_passed: 0,
        }
    }

    /// The sample every elapsed value is measured from.
    pub fn baseline(&self) -> ClockTime {
        self.baseline
    }

    /// Number of midnights crossed so far.
    pub fn days_passed(&self) -> u32 {
        self.days_passed
    }

    /// Feed the next sample and return its seconds since the baseline.
    ///
    /// Equal consecutive samples do not count as a rollover.
    pub fn advance(&mut self, time: ClockTime) -> i64 {
        if time < self.last_time {
            self.days_passed += 1;
            trace!(
                from = %self.last_time,
                to = %time,
                days_passed = self.days_passed,
                "midnight rollover"
            );
        }
        self.last_time = time;
        i64::from(self.days_passed) * SECONDS_PER_DAY + time.seconds_since(self.baseline)
    }
}

/// Resolve a whole sequence of optional samples in travel order.
///
/// The first present sample is the baseline and resolves to 0. `None`
/// entries stay `None` and do not affect rollover detection.
///
/// ```
/// use train_timetable::domain::{ClockTime, resolve_sequence};
///
/// let t = |s| Some(ClockTime::parse(s).unwrap());
/// let elapsed = resolve_sequence(&[None, t("22:00"), t("23:00"), None, t("01:00")]);
/// assert_eq!(elapsed, vec![None, Some(0), Some(3600), None, Some(10800)]);
/// ```
pub fn resolve_sequence(times: &[Option<ClockTime>]) -> Vec<Option<i64>> {
    let mut resolver: Option<RolloverResolver> = None;

    times
        .iter()
        .map(|time| {
            let time = (*time)?;
            let resolver = resolver.get_or_insert_with(|| RolloverResolver::new(time));
            Some(resolver.advance(time))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn times(items: &[&str]) -> Vec<Option<ClockTime>> {
        items.iter().map(|s| Some(time(s))).collect()
    }

    #[test]
    fn rollover_inferred_at_midnight_only() {
        let elapsed = resolve_sequence(&times(&["08:00", "09:30", "23:50", "00:10", "05:00"]));
        assert_eq!(
            elapsed,
            vec![Some(0), Some(5400), Some(57_000), Some(58_200), Some(75_600)]
        );
    }

    #[test]
    fn equal_consecutive_times_do_not_roll_over() {
        let mut resolver = RolloverResolver::new(time("10:00"));
        assert_eq!(resolver.advance(time("10:00")), 0);
        assert_eq!(resolver.days_passed(), 0);
        assert_eq!(resolver.advance(time("11:00")), 3600);
        assert_eq!(resolver.days_passed(), 0);
    }

    #[test]
    fn multiple_rollovers() {
        let elapsed = resolve_sequence(&times(&["20:00", "02:00", "19:00", "01:00"]));
        assert_eq!(
            elapsed,
            vec![
                Some(0),
                Some(6 * 3600),
                Some(23 * 3600),
                Some(SECONDS_PER_DAY + 5 * 3600)
            ]
        );
    }

    #[test]
    fn none_entries_preserved() {
        let seq = vec![None, Some(time("23:30")), None, Some(time("00:30"))];
        assert_eq!(resolve_sequence(&seq), vec![None, Some(0), None, Some(3600)]);
    }

    #[test]
    fn empty_and_all_none() {
        assert!(resolve_sequence(&[]).is_empty());
        assert_eq!(resolve_sequence(&[None, None]), vec![None, None]);
    }

    #[test]
    fn full_day_gap_is_indistinguishable() {
        // 10:00 then 10:00 the next day reads as no time passing.
        let elapsed = resolve_sequence(&times(&["10:00", "10:00"]));
        assert_eq!(elapsed, vec![Some(0), Some(0)]);
    }

    #[test]
    fn baseline_is_first_sample() {
        let resolver = RolloverResolver::new(time("06:15"));
        assert_eq!(resolver.baseline(), time("06:15"));
    }
}
