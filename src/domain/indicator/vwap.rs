//! Volume-weighted average price over a compacted `[price, volume]` map.

use crate::domain::error::ArchivistError;
use crate::domain::time_unit::TimeUnit;
use std::collections::BTreeMap;

/// Σ(price × volume) / Σ(volume). Empty input and zero total volume give `0`.
pub fn vwap(compacted: &BTreeMap<TimeUnit, Vec<f64>>) -> Result<f64, ArchivistError> {
    let mut numerator = 0.0;
    let mut total_volume = 0.0;

    for pair in compacted.values() {
        let [price, volume] = pair.as_slice() else {
            return Err(ArchivistError::FieldCount {
                kind: "vwap entry",
                expected: "2",
                found: pair.len(),
            });
        };
        numerator += price * volume;
        total_volume += volume;
    }

    if total_volume == 0.0 {
        return Ok(0.0);
    }
    Ok(numerator / total_volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weights_by_volume() {
        let map = BTreeMap::from([
            (TimeUnit(1_000), vec![10.0, 1.0]),
            (TimeUnit(2_000), vec![20.0, 3.0]),
        ]);
        assert_relative_eq!(vwap(&map).unwrap(), 17.5);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_eq!(vwap(&BTreeMap::new()).unwrap(), 0.0);
        let map = BTreeMap::from([(TimeUnit(1_000), vec![10.0, 0.0])]);
        assert_eq!(vwap(&map).unwrap(), 0.0);
    }

    #[test]
    fn malformed_entry_is_format_error() {
        let map = BTreeMap::from([(TimeUnit(1_000), vec![10.0])]);
        assert!(matches!(
            vwap(&map),
            Err(ArchivistError::FieldCount { found: 1, .. })
        ));
    }
}
