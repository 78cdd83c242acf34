//! Indicator integration tests.
//!
//! Covers:
//! - RSI over a literal BTC close sequence
//! - SMA warm-up boundary against trailing means
//! - HMA warm-up length for several periods
//! - State persistence: resuming from saved bytes matches an uninterrupted run
//! - VWAP over price/volume pairs

mod common;

use approx::assert_relative_eq;
use archivist::domain::asset::{AssetRegistry, AssetType};
use archivist::domain::column::Column;
use archivist::domain::data::{DataType, Sample};
use archivist::domain::error::ArchivistError;
use archivist::domain::indicator::moving_average::hma_smoothing_period;
use archivist::domain::indicator::{IndicatorDataBuilder, WARM_UP, vwap};
use archivist::domain::time_unit::TimeUnit;
use common::*;
use std::collections::BTreeMap;

mod rsi {
    use super::*;

    #[test]
    fn btc_sequence_matches_reference_value() {
        let mut b = builder(AssetType::Rsi, 14, None, -1);
        let out = run(&mut b, &BTC_CLOSES);
        assert_eq!(out.len(), 15);
        assert!(out[..14].iter().all(|v| *v == WARM_UP));
        assert_eq!(out[14], 49.62440394539153);
    }

    #[test]
    fn registry_precision_rounds_output() {
        let mut b = builder(AssetType::Rsi, 14, None, 2);
        let out = run(&mut b, &BTC_CLOSES);
        assert_eq!(out[14], 49.62);
    }

    #[test]
    fn rising_series_saturates_at_100() {
        let closes: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let mut b = builder(AssetType::Rsi, 3, None, -1);
        let out = run(&mut b, &closes);
        assert!(out[3..].iter().all(|v| *v == 100.0));
    }
}

mod moving_averages {
    use super::*;

    #[test]
    fn sma_25_boundary() {
        let closes = wave(60);
        let mut b = builder(AssetType::Sma, 25, None, -1);
        let out = run(&mut b, &closes);

        for v in &out[..24] {
            assert_eq!(*v, WARM_UP);
        }
        for i in 24..closes.len() {
            let mean = closes[i + 1 - 25..=i].iter().sum::<f64>() / 25.0;
            assert_relative_eq!(out[i], mean, epsilon = 1e-9);
        }
    }

    #[test]
    fn hma_warm_up_length() {
        for period in [2usize, 4, 9, 16, 20] {
            let mut b = builder(AssetType::Hma, period as i64, None, -1);
            let out = run(&mut b, &wave(period * 3));
            let sentinels = out.iter().take_while(|v| **v == WARM_UP).count();
            assert_eq!(
                sentinels,
                period + hma_smoothing_period(period) - 2,
                "period {}",
                period
            );
        }
    }

    #[test]
    fn hma_of_constant_series_is_constant() {
        let mut b = builder(AssetType::Hma, 9, None, -1);
        let out = run(&mut b, &[42.0; 30]);
        for v in out.iter().filter(|v| **v != WARM_UP) {
            assert_relative_eq!(*v, 42.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn ema_has_no_warm_up() {
        let mut b = builder(AssetType::Ema, 10, None, -1);
        let out = run(&mut b, &wave(5));
        assert!(out.iter().all(|v| *v != WARM_UP));
    }

    #[test]
    fn wma_reads_selected_column() {
        let registry = AssetRegistry::default();
        let mut b =
            IndicatorDataBuilder::new(&registry, AssetType::Wma, None, &["2".into()], -1)
                .unwrap()
                .with_column(Column::High);
        let a = Sample::new(DataType::Unit, 1.0, TimeUnit(1));
        let c = Sample::new(DataType::Unit, 4.0, TimeUnit(2));
        assert_eq!(b.compute_unsafe(&[a]).unwrap().value, WARM_UP);
        assert_eq!(b.compute_unsafe(&[c]).unwrap().value, 3.0);
    }
}

mod persistence {
    use super::*;

    fn resumed(asset_type: AssetType, period: i64, values: &[f64], split: usize) -> Vec<f64> {
        let mut first = builder(asset_type, period, None, -1);
        let mut out = run(&mut first, &values[..split]);

        let mut second = builder(asset_type, period, Some(first.prev_state()), -1);
        let rest: Vec<f64> = common::unit_samples(values)[split..]
            .iter()
            .map(|s| second.compute_unsafe(std::slice::from_ref(s)).unwrap().value)
            .collect();
        out.extend(rest);
        out
    }

    #[test]
    fn resuming_matches_uninterrupted_run() {
        let values = wave(80);
        let cases = [
            (AssetType::Rsi, 14),
            (AssetType::Sma, 25),
            (AssetType::Ema, 12),
            (AssetType::Wma, 10),
            (AssetType::Hma, 16),
        ];
        for (asset_type, period) in cases {
            let mut whole = builder(asset_type, period, None, -1);
            let expected = run(&mut whole, &values);
            for split in [1, 7, 30, 79] {
                assert_eq!(
                    resumed(asset_type, period, &values, split),
                    expected,
                    "{} split at {}",
                    asset_type,
                    split
                );
            }
        }
    }

    #[test]
    fn corrupt_state_is_a_decode_error() {
        let mut b = builder(AssetType::Sma, 3, Some(b"not json".to_vec()), -1);
        let err = b
            .compute_unsafe(&[unit_at(1.0, 0)])
            .unwrap_err();
        assert!(matches!(err, ArchivistError::StateDecode { .. }));
    }

    #[test]
    fn empty_state_starts_from_scratch() {
        let mut fresh = builder(AssetType::Rsi, 14, None, -1);
        let mut empty = builder(AssetType::Rsi, 14, Some(Vec::new()), -1);
        assert_eq!(run(&mut fresh, &BTC_CLOSES), run(&mut empty, &BTC_CLOSES));
    }
}

mod volume_weighted {
    use super::*;

    #[test]
    fn vwap_weights_by_volume() {
        let mut entries = BTreeMap::new();
        entries.insert(TimeUnit(1), vec![100.0, 1.0]);
        entries.insert(TimeUnit(2), vec![110.0, 3.0]);
        assert_relative_eq!(vwap(&entries).unwrap(), 107.5);
    }

    #[test]
    fn vwap_of_nothing_is_zero() {
        assert_eq!(vwap(&BTreeMap::new()).unwrap(), 0.0);
    }
}
