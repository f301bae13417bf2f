//! Time-of-day values and session lengths.
//!
//! A [`TimeValue`] counts minutes from the start of the day and is never
//! wrapped at midnight, so `hours` may exceed 23 after an addition. Totals
//! are computed in `u64` so any `u32` hour count compares correctly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A time of day as hours and minutes.
///
/// Always normalized: `minutes < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeValue")]
pub struct TimeValue {
    hours: u32,
    minutes: u32,
}

/// Unchecked wire form, validated on the way in.
#[derive(Deserialize)]
struct RawTimeValue {
    hours: u32,
    minutes: u32,
}

impl TryFrom<RawTimeValue> for TimeValue {
    type Error = String;

    fn try_from(raw: RawTimeValue) -> Result<Self, Self::Error> {
        TimeValue::new(raw.hours, raw.minutes)
            .ok_or_else(|| format!("minutes must be below 60, got {}", raw.minutes))
    }
}

impl TimeValue {
    /// Creates a time value, returning `None` if `minutes >= 60`.
    pub fn new(hours: u32, minutes: u32) -> Option<Self> {
        (minutes < 60).then_some(Self { hours, minutes })
    }

    /// A whole hour, e.g. `TimeValue::at(9)` is 9:00.
    pub fn at(hours: u32) -> Self {
        Self { hours, minutes: 0 }
    }

    /// Splits a minute count into hours and minutes.
    ///
    /// Hours saturate at `u32::MAX`.
    pub fn from_total_minutes(total: u64) -> Self {
        let (hours, minutes) = split_minutes(total);
        Self { hours, minutes }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }
}

fn split_minutes(total: u64) -> (u32, u32) {
    let hours = u32::try_from(total / 60).unwrap_or(u32::MAX);
    // Always below 60
    let minutes = (total % 60) as u32;
    (hours, minutes)
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_minutes().cmp(&other.total_minutes())
    }
}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

/// A length of time, e.g. how long a session runs.
///
/// Unlike [`TimeValue`] this is not required to be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Duration {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
}

impl Duration {
    pub const fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self { hours, minutes: 0 }
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self { hours: 0, minutes }
    }

    pub fn total_minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }

    pub fn is_zero(&self) -> bool {
        self.total_minutes() == 0
    }

    /// Sums two durations into a single normalized duration.
    pub fn combine(self, other: Duration) -> Duration {
        let (hours, minutes) = split_minutes(self.total_minutes() + other.total_minutes());
        Duration::new(hours, minutes)
    }
}

/// Adds `delta` to `base`, carrying whole hours out of the minutes.
///
/// There is no wraparound at 24 hours: 23:30 plus one hour is 24:30.
pub fn add_duration(base: TimeValue, delta: Duration) -> TimeValue {
    TimeValue::from_total_minutes(base.total_minutes() + delta.total_minutes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_duration_carries_minutes() {
        let base = TimeValue::new(9, 40).unwrap();
        let result = add_duration(base, Duration::new(0, 50));
        assert_eq!(result, TimeValue::new(10, 30).unwrap());
    }

    #[test]
    fn test_add_duration_does_not_wrap_midnight() {
        let base = TimeValue::new(23, 30).unwrap();
        let result = add_duration(base, Duration::from_hours(1));
        assert_eq!(result.hours(), 24);
        assert_eq!(result.minutes(), 30);
    }

    #[test]
    fn test_add_duration_unnormalized_delta() {
        let result = add_duration(TimeValue::at(8), Duration::new(1, 135));
        assert_eq!(result, TimeValue::new(11, 15).unwrap());
    }

    #[test]
    fn test_add_duration_is_associative() {
        let starts = [TimeValue::at(8), TimeValue::new(9, 40).unwrap(), TimeValue::new(18, 30).unwrap()];
        let deltas = [
            Duration::from_minutes(0),
            Duration::from_minutes(45),
            Duration::new(1, 30),
            Duration::new(2, 59),
        ];

        for t in starts {
            for d1 in deltas {
                for d2 in deltas {
                    let stepwise = add_duration(add_duration(t, d1), d2);
                    let combined = add_duration(t, d1.combine(d2));
                    assert_eq!(stepwise, combined, "t={t} d1={d1:?} d2={d2:?}");
                    assert!(stepwise.minutes() < 60);
                }
            }
        }
    }

    #[test]
    fn test_time_value_rejects_bad_minutes() {
        assert!(TimeValue::new(10, 60).is_none());
        assert!(TimeValue::new(10, 59).is_some());
    }

    #[test]
    fn test_time_value_ordering_by_total_minutes() {
        let a = TimeValue::new(9, 59).unwrap();
        let b = TimeValue::at(10);
        assert!(a < b);
        assert_eq!(TimeValue::from_total_minutes(600), b);
    }

    #[test]
    fn test_time_value_deserialize_validates() {
        let ok: TimeValue = serde_json::from_str(r#"{"hours":9,"minutes":30}"#).unwrap();
        assert_eq!(ok, TimeValue::new(9, 30).unwrap());

        let bad = serde_json::from_str::<TimeValue>(r#"{"hours":9,"minutes":75}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_duration_combine_normalizes() {
        let d = Duration::new(1, 45).combine(Duration::new(0, 30));
        assert_eq!(d, Duration::new(2, 15));
        assert!(Duration::default().is_zero());
    }

    #[test]
    fn test_large_hours_do_not_overflow() {
        let start = TimeValue::at(100_000_000);
        let end = TimeValue::at(100_000_001);
        assert!(end > start);
        assert_eq!(end.total_minutes() - start.total_minutes(), 60);

        let top = TimeValue::new(u32::MAX, 59).unwrap();
        assert_eq!(top.total_minutes(), u64::from(u32::MAX) * 60 + 59);
        assert!(top > end);

        let moved = add_duration(start, Duration::new(2, 30));
        assert_eq!(moved, TimeValue::new(100_000_002, 30).unwrap());

        let saturated = add_duration(top, Duration::from_hours(u32::MAX));
        assert_eq!(saturated.hours(), u32::MAX);
        assert!(saturated.minutes() < 60);
    }
}
