//! Float and timeframe text formatting.

use crate::domain::error::ArchivistError;
use crate::domain::math::round_float;
use crate::domain::time_unit::{MAX_TIME_FRAME, MIN_TIME_FRAME};
use chrono::TimeDelta;

/// Format a float with `precision` fixed decimals, then trim trailing zeros
/// and a dangling decimal point. A negative precision uses the shortest
/// round-trip representation. Results that collapse to zero render as `"0"`.
///
/// Ties round away from zero, matching [`round_float`].
pub fn format_float(value: f64, precision: i8) -> String {
    let mut out = if precision < 0 {
        format!("{}", value)
    } else {
        let p = precision as usize;
        format!("{:.*}", p, round_float(value, p as u32))
    };
    if out.contains('.') {
        let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(trimmed);
    }
    if out.is_empty() || out == "-0" {
        return "0".to_string();
    }
    out
}

/// Short label for a timeframe: `2w`, `1d`, `4h`, `15m`, `30s`.
///
/// The timeframe must be a whole multiple of [`MIN_TIME_FRAME`] and no
/// longer than [`MAX_TIME_FRAME`].
pub fn timeframe_label(timeframe: TimeDelta) -> Result<String, ArchivistError> {
    if timeframe < MIN_TIME_FRAME {
        return Err(ArchivistError::InvalidTimeframe {
            reason: format!("{}s is below the 1s minimum", timeframe.num_seconds()),
        });
    }
    if timeframe > MAX_TIME_FRAME {
        return Err(ArchivistError::InvalidTimeframe {
            reason: format!("{}s exceeds the 90 day maximum", timeframe.num_seconds()),
        });
    }
    let millis = timeframe.num_milliseconds();
    if millis % MIN_TIME_FRAME.num_milliseconds() != 0 {
        return Err(ArchivistError::InvalidTimeframe {
            reason: format!("{}ms is not a whole number of seconds", millis),
        });
    }

    let secs = timeframe.num_seconds();
    const UNITS: [(i64, &str); 5] = [
        (7 * 24 * 3600, "w"),
        (24 * 3600, "d"),
        (3600, "h"),
        (60, "m"),
        (1, "s"),
    ];
    let (size, suffix) = UNITS
        .iter()
        .copied()
        .find(|(size, _)| secs % size == 0)
        .unwrap_or((1, "s"));
    Ok(format!("{}{}", secs / size, suffix))
}
