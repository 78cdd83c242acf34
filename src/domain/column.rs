//! Named columns exposed by the data types for CSV and JSON export.

use crate::domain::error::ArchivistError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Time,

    Plus,
    Minus,
    PlusAverage,
    MinusAverage,
    PlusMedian,
    MinusMedian,
    PlusCount,
    MinusCount,

    Open,
    High,
    Low,
    Close,
    Average,
    Median,
    AbsoluteSum,
    Count,

    Value,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::Time,
        Column::Plus,
        Column::Minus,
        Column::PlusAverage,
        Column::MinusAverage,
        Column::PlusMedian,
        Column::MinusMedian,
        Column::PlusCount,
        Column::MinusCount,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Average,
        Column::Median,
        Column::AbsoluteSum,
        Column::Count,
        Column::Value,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Time => "time",
            Column::Plus => "plus",
            Column::Minus => "minus",
            Column::PlusAverage => "plus_average",
            Column::MinusAverage => "minus_average",
            Column::PlusMedian => "plus_median",
            Column::MinusMedian => "minus_median",
            Column::PlusCount => "plus_count",
            Column::MinusCount => "minus_count",
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::Average => "average",
            Column::Median => "median",
            Column::AbsoluteSum => "absolute_sum",
            Column::Count => "count",
            Column::Value => "value",
        }
    }

    /// Whether the column holds a cardinality rather than a magnitude.
    pub fn is_count(self) -> bool {
        matches!(self, Column::Count | Column::PlusCount | Column::MinusCount)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = ArchivistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ArchivistError::UnknownColumn {
                column: s.to_string(),
            })
    }
}

/// Set of columns requested for an export, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection(BTreeSet<Column>);

impl ColumnSelection {
    pub fn all() -> Self {
        ColumnSelection(Column::ALL.into_iter().collect())
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ArchivistError> {
        names
            .iter()
            .map(|n| n.as_ref().trim().parse())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(ColumnSelection)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Column> for ColumnSelection {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        ColumnSelection(iter.into_iter().collect())
    }
}
