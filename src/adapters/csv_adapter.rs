//! CSV sample source and series export.
//!
//! Input files hold `time,value` rows with a header; times may be seconds,
//! milliseconds, microseconds or nanoseconds. Output is either the compact
//! encoding (`time,<label>`) or one cell per selected column.

use crate::domain::column::ColumnSelection;
use crate::domain::data::{DataType, Sample};
use crate::domain::error::ArchivistError;
use crate::domain::time_unit::TimeUnit;
use crate::ports::sample_port::SamplePort;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

pub struct CsvAdapter {
    path: PathBuf,
    now: DateTime<Utc>,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            now: Utc::now(),
        }
    }

    /// Reference instant for timestamp unit inference.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

fn invalid(line: u64, field: &str, value: &str) -> ArchivistError {
    ArchivistError::Csv {
        reason: format!("line {}: invalid {} {:?}", line, field, value),
    }
}

impl SamplePort for CsvAdapter {
    fn load_samples(&self) -> Result<Vec<(TimeUnit, f64)>, ArchivistError> {
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut samples = Vec::new();

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw_time = record.get(0).unwrap_or("").trim();
            let time: i64 = raw_time
                .parse()
                .map_err(|_| invalid(line, "time", raw_time))?;

            let raw_value = record.get(1).unwrap_or("").trim();
            if raw_value.is_empty() {
                warn!(line, "skipping row without value");
                continue;
            }
            let value: f64 = raw_value
                .parse()
                .map_err(|_| invalid(line, "value", raw_value))?;

            samples.push((TimeUnit::infer(time, self.now), value));
        }

        samples.sort_by_key(|(t, _)| *t);
        Ok(samples)
    }
}

/// Write `time,<label>` rows holding the compact encoding, time in ticks.
pub fn write_encoded<W: Write>(
    writer: W,
    label: &str,
    samples: &[Sample],
    precision: i8,
) -> Result<(), ArchivistError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time", label])?;
    for sample in samples {
        wtr.write_record([sample.time().to_string(), sample.serialize(precision)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a header built from `prefix` and one row per sample, limited to
/// `selection`.
pub fn write_columns<W: Write>(
    writer: W,
    data_type: DataType,
    prefix: &str,
    samples: &[Sample],
    precision: i8,
    selection: &ColumnSelection,
) -> Result<(), ArchivistError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(data_type.header(prefix, selection))?;
    for sample in samples {
        wtr.write_record(sample.csv_row(precision, selection))?;
    }
    wtr.flush()?;
    Ok(())
}
