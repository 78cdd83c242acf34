//! Homogeneous sequences of time-stamped values.

use crate::domain::column::Column;
use crate::domain::data::{Data, DataType, Point, Quantity, Sample, Unit};
use crate::domain::error::ArchivistError;
use crate::domain::time_unit::TimeUnit;
use chrono::TimeDelta;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Operations over an ordered list of same-typed values.
pub trait DataList {
    type Item;

    fn data_type(&self) -> DataType;

    /// Roll every entry into one value stamped `new_time`. `timeframe` is the
    /// resolution of the entries being rolled up.
    fn aggregate(&self, timeframe: TimeDelta, new_time: TimeUnit) -> Self::Item;

    fn append(&mut self, item: Self::Item);

    fn prepend(&mut self, item: Self::Item);

    /// Drop the first `n` entries; dropping more than the length empties the list.
    fn remove_first_n(&mut self, n: usize);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first(&self) -> Option<Self::Item>;

    fn last(&self) -> Option<Self::Item>;

    fn reverse(&mut self);

    /// Encoded entries keyed by time; later entries win on duplicate times.
    fn to_raw(&self, precision: i8) -> BTreeMap<TimeUnit, String>;

    /// One JSON object per entry holding only `columns`. A column the data
    /// type does not expose is an error.
    fn to_json(&self, columns: &[Column]) -> Result<Vec<Map<String, Value>>, ArchivistError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    items: Vec<T>,
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Series { items: Vec::new() }
    }
}

impl<T: Data> Series<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Group entries into `timeframe` buckets keyed by their floored start
    /// and aggregate each bucket. `source` is the resolution of the entries.
    pub fn resample(&self, source: TimeDelta, timeframe: TimeDelta) -> Series<T> {
        let mut buckets: BTreeMap<TimeUnit, Vec<T>> = BTreeMap::new();
        for item in &self.items {
            buckets
                .entry(item.time().floor(timeframe))
                .or_default()
                .push(item.clone());
        }
        buckets
            .into_iter()
            .map(|(start, items)| T::aggregate(&items, source, start))
            .collect()
    }

    fn json_row(item: &T, columns: &[Column]) -> Map<String, Value> {
        let mut row = Map::new();
        for column in columns {
            let value = match column {
                Column::Time => json!(item.time().0),
                c if c.is_count() => json!(item.value_at(*c).unwrap_or(0.0) as i64),
                c => json!(item.value_at(*c).unwrap_or(0.0)),
            };
            row.insert(column.as_str().to_string(), value);
        }
        row
    }
}

impl<T> From<Vec<T>> for Series<T> {
    fn from(items: Vec<T>) -> Self {
        Series { items }
    }
}

impl<T> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Series {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Data> DataList for Series<T> {
    type Item = T;

    fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    fn aggregate(&self, timeframe: TimeDelta, new_time: TimeUnit) -> T {
        T::aggregate(&self.items, timeframe, new_time)
    }

    fn append(&mut self, item: T) {
        self.items.push(item);
    }

    fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    fn remove_first_n(&mut self, n: usize) {
        let n = n.min(self.items.len());
        self.items.drain(..n);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn first(&self) -> Option<T> {
        self.items.first().cloned()
    }

    fn last(&self) -> Option<T> {
        self.items.last().cloned()
    }

    fn reverse(&mut self) {
        self.items.reverse();
    }

    fn to_raw(&self, precision: i8) -> BTreeMap<TimeUnit, String> {
        self.items
            .iter()
            .map(|item| (item.time(), item.serialize(precision)))
            .collect()
    }

    fn to_json(&self, columns: &[Column]) -> Result<Vec<Map<String, Value>>, ArchivistError> {
        if let Some(column) = columns.iter().find(|c| !T::DATA_TYPE.has_column(**c)) {
            return Err(ArchivistError::ColumnNotInType {
                column: *column,
                data_type: T::DATA_TYPE,
            });
        }
        Ok(self
            .items
            .iter()
            .map(|item| Self::json_row(item, columns))
            .collect())
    }
}

/// A series whose data type is chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum AnySeries {
    Unit(Series<Unit>),
    Quantity(Series<Quantity>),
    Point(Series<Point>),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            AnySeries::Unit($s) => $body,
            AnySeries::Quantity($s) => $body,
            AnySeries::Point($s) => $body,
        }
    };
}

impl AnySeries {
    pub fn new(data_type: DataType) -> Self {
        match data_type {
            DataType::Unit => AnySeries::Unit(Series::new()),
            DataType::Quantity => AnySeries::Quantity(Series::new()),
            DataType::Point => AnySeries::Point(Series::new()),
        }
    }

    /// # Panics
    ///
    /// When the series holds points.
    pub fn resample(&self, source: TimeDelta, timeframe: TimeDelta) -> AnySeries {
        match self {
            AnySeries::Unit(s) => AnySeries::Unit(s.resample(source, timeframe)),
            AnySeries::Quantity(s) => AnySeries::Quantity(s.resample(source, timeframe)),
            AnySeries::Point(s) => AnySeries::Point(s.resample(source, timeframe)),
        }
    }

    pub fn samples(&self) -> Vec<Sample> {
        match self {
            AnySeries::Unit(s) => s.iter().copied().map(Sample::Unit).collect(),
            AnySeries::Quantity(s) => s.iter().copied().map(Sample::Quantity).collect(),
            AnySeries::Point(s) => s.iter().copied().map(Sample::Point).collect(),
        }
    }
}

fn type_mismatch(expected: DataType, item: &Sample) -> ! {
    panic!(
        "cannot add a {} value to a {} series",
        item.data_type(),
        expected
    )
}

impl DataList for AnySeries {
    type Item = Sample;

    fn data_type(&self) -> DataType {
        dispatch!(self, s => s.data_type())
    }

    /// # Panics
    ///
    /// When the series holds points.
    fn aggregate(&self, timeframe: TimeDelta, new_time: TimeUnit) -> Sample {
        match self {
            AnySeries::Unit(s) => Sample::Unit(s.aggregate(timeframe, new_time)),
            AnySeries::Quantity(s) => Sample::Quantity(s.aggregate(timeframe, new_time)),
            AnySeries::Point(s) => Sample::Point(s.aggregate(timeframe, new_time)),
        }
    }

    /// # Panics
    ///
    /// When `item` is not of the series' data type.
    fn append(&mut self, item: Sample) {
        let expected = self.data_type();
        match (self, item) {
            (AnySeries::Unit(s), Sample::Unit(u)) => s.append(u),
            (AnySeries::Quantity(s), Sample::Quantity(q)) => s.append(q),
            (AnySeries::Point(s), Sample::Point(p)) => s.append(p),
            (_, item) => type_mismatch(expected, &item),
        }
    }

    /// # Panics
    ///
    /// When `item` is not of the series' data type.
    fn prepend(&mut self, item: Sample) {
        let expected = self.data_type();
        match (self, item) {
            (AnySeries::Unit(s), Sample::Unit(u)) => s.prepend(u),
            (AnySeries::Quantity(s), Sample::Quantity(q)) => s.prepend(q),
            (AnySeries::Point(s), Sample::Point(p)) => s.prepend(p),
            (_, item) => type_mismatch(expected, &item),
        }
    }

    fn remove_first_n(&mut self, n: usize) {
        dispatch!(self, s => s.remove_first_n(n))
    }

    fn len(&self) -> usize {
        dispatch!(self, s => s.len())
    }

    fn first(&self) -> Option<Sample> {
        dispatch!(self, s => s.first().map(Sample::from))
    }

    fn last(&self) -> Option<Sample> {
        dispatch!(self, s => s.last().map(Sample::from))
    }

    fn reverse(&mut self) {
        dispatch!(self, s => s.reverse())
    }

    fn to_raw(&self, precision: i8) -> BTreeMap<TimeUnit, String> {
        dispatch!(self, s => s.to_raw(precision))
    }

    fn to_json(&self, columns: &[Column]) -> Result<Vec<Map<String, Value>>, ArchivistError> {
        dispatch!(self, s => s.to_json(columns))
    }
}
