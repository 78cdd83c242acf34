//! Raw sample source port trait.
//!
//! Upstream ingestion hands the core plain `(time, value)` observations at
//! native resolution; how they were read is the adapter's business.

use crate::domain::error::ArchivistError;
use crate::domain::time_unit::TimeUnit;

pub trait SamplePort {
    /// Observations sorted by time, oldest first.
    fn load_samples(&self) -> Result<Vec<(TimeUnit, f64)>, ArchivistError>;
}
