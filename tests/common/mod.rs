#![allow(dead_code)]

use archivist::domain::asset::{AssetRegistry, AssetType};
use archivist::domain::data::{DataType, Sample};
use archivist::domain::indicator::IndicatorDataBuilder;
use archivist::domain::time_unit::TimeUnit;
use std::io::Write;
use tempfile::NamedTempFile;

/// BTC closes with a single spike, one per minute.
pub const BTC_CLOSES: [f64; 15] = [
    65532.01, 65531.50, 65530.98, 65529.45, 65528.12, 65527.65, 65526.78, 65525.89, 65524.47,
    65523.55, 65522.33, 66433.97, 65520.75, 65519.43, 65518.21,
];

pub const BASE_TIME: i64 = 1_700_000_000_000;

pub fn unit_at(value: f64, index: usize) -> Sample {
    Sample::new(DataType::Unit, value, TimeUnit(BASE_TIME + index as i64 * 60_000))
}

pub fn unit_samples(values: &[f64]) -> Vec<Sample> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| unit_at(*v, i))
        .collect()
}

/// A gently oscillating price series of `n` closes.
pub fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
        .collect()
}

pub fn builder(
    asset_type: AssetType,
    period: i64,
    state: Option<Vec<u8>>,
    precision: i8,
) -> IndicatorDataBuilder {
    IndicatorDataBuilder::new(
        &AssetRegistry::default(),
        asset_type,
        state,
        &[period.to_string()],
        precision,
    )
    .unwrap()
}

/// Feed every value through `builder` one at a time.
pub fn run(builder: &mut IndicatorDataBuilder, values: &[f64]) -> Vec<f64> {
    unit_samples(values)
        .iter()
        .map(|s| builder.compute_unsafe(std::slice::from_ref(s)).unwrap().value)
        .collect()
}

pub fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

pub fn closes_csv(values: &[f64]) -> String {
    let mut out = String::from("time,value\n");
    for (i, v) in values.iter().enumerate() {
        out.push_str(&format!("{},{}\n", 1_700_000_000 + i as i64 * 60, v));
    }
    out
}
