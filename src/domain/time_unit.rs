//! Fixed-resolution instants used as keys for every time-indexed value.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution of a [`TimeUnit`] tick.
pub const TIME_UNIT_DURATION: TimeDelta = TimeDelta::milliseconds(1);

/// Native resolution of archived samples; aggregation from this timeframe
/// derives absolute sums from price moves.
pub const MIN_TIME_FRAME: TimeDelta = TimeDelta::seconds(1);

/// Largest timeframe a series may be aggregated into.
pub const MAX_TIME_FRAME: TimeDelta = TimeDelta::days(90);

/// Integer count of [`TIME_UNIT_DURATION`] since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeUnit(pub i64);

impl TimeUnit {
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        TimeUnit(dt.timestamp_millis())
    }

    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Interpret an integer timestamp of unknown unit.
    ///
    /// The unit is guessed from magnitude against `now`: anything up to nine
    /// times the current Unix time in seconds is seconds, then milliseconds and
    /// microseconds on the same scale, then nanoseconds up to twice the current
    /// value. Non-positive or larger values are taken as already being in
    /// ticks. Very old or far-future instants are misclassified.
    pub fn infer(raw: i64, now: DateTime<Utc>) -> Self {
        let secs = now.timestamp().saturating_mul(9);
        let millis = now.timestamp_millis().saturating_mul(9);
        let micros = now.timestamp_micros().saturating_mul(9);
        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or(i64::MAX / 2)
            .saturating_mul(2);

        let tick = TIME_UNIT_DURATION.num_nanoseconds().unwrap_or(1_000_000);
        let scaled =
            |unit_nanos: i64| TimeUnit((raw as i128 * unit_nanos as i128 / tick as i128) as i64);

        if raw > 0 && raw <= secs {
            scaled(1_000_000_000)
        } else if raw > secs && raw <= millis {
            scaled(1_000_000)
        } else if raw > millis && raw <= micros {
            scaled(1_000)
        } else if raw > micros && raw <= nanos {
            scaled(1)
        } else {
            TimeUnit(raw)
        }
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or_default()
    }

    pub fn add(self, delta: TimeDelta) -> Self {
        TimeUnit(self.0 + delta.num_milliseconds())
    }

    /// Start of the `timeframe` bucket containing this instant.
    pub fn floor(self, timeframe: TimeDelta) -> Self {
        let size = timeframe.num_milliseconds().max(1);
        TimeUnit(self.0.div_euclid(size) * size)
    }

    pub fn unix_seconds(self) -> i64 {
        self.0.div_euclid(1000)
    }

    pub fn pretty(self) -> String {
        self.to_datetime().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
