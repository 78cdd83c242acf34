//! Domain error types.
//!
//! Format and validation failures are recoverable values; violated
//! preconditions (aggregating points, unknown indicators) panic at the
//! call site instead of surfacing here.

use crate::domain::asset::ArgType;
use crate::domain::column::Column;
use crate::domain::data::DataType;

/// A grammar error with position information for address parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for archivist.
#[derive(Debug, thiserror::Error)]
pub enum ArchivistError {
    #[error("{kind} record has {found} fields, expected {expected}")]
    FieldCount {
        kind: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    AddressParse(#[from] ParseError),

    #[error("asset address must have 4 ';'-separated parts, found {found}")]
    AddressShape { found: usize },

    #[error("unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("column {column} is not exposed by {data_type} data")]
    ColumnNotInType { column: Column, data_type: DataType },

    #[error("indicator state cannot be decoded: {reason}")]
    StateDecode { reason: String },

    #[error("set id contains non-alphanumeric characters: {set_id}")]
    InvalidSetId { set_id: String },

    #[error("unknown asset type: {asset_type}")]
    UnknownAssetType { asset_type: String },

    #[error("asset {asset_type} is produced by an archive and takes no dependencies or arguments")]
    UnexpectedDependencies { asset_type: String },

    #[error("asset {asset_type} requires {expected} dependencies, found {found}")]
    DependencyCount {
        asset_type: String,
        expected: usize,
        found: usize,
    },

    #[error("dependency {index} of {asset_type} must be {expected}, found {found}")]
    DependencyType {
        asset_type: String,
        index: usize,
        expected: DataType,
        found: DataType,
    },

    #[error("asset {asset_type} requires {expected} arguments, found {found}")]
    ArgumentCount {
        asset_type: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of {asset_type} must be {expected}, found {value:?}")]
    InvalidArgument {
        asset_type: String,
        index: usize,
        value: String,
        expected: ArgType,
    },

    #[error("argument {index} of {asset_type} is empty")]
    EmptyArgument { asset_type: String, index: usize },

    #[error("argument {index} of {asset_type} must be at least {min}, found {value}")]
    ArgumentOutOfRange {
        asset_type: String,
        index: usize,
        value: i64,
        min: i64,
    },

    #[error("dependency nesting deeper than {limit} levels")]
    DependencyDepth { limit: usize },

    #[error("dependency cycle through asset {name}")]
    DependencyCycle { name: String },

    #[error("invalid timeframe: {reason}")]
    InvalidTimeframe { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ArchivistError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ArchivistError::InvalidSetId { .. }
                | ArchivistError::UnknownAssetType { .. }
                | ArchivistError::UnexpectedDependencies { .. }
                | ArchivistError::DependencyCount { .. }
                | ArchivistError::DependencyType { .. }
                | ArchivistError::ArgumentCount { .. }
                | ArchivistError::InvalidArgument { .. }
                | ArchivistError::EmptyArgument { .. }
                | ArchivistError::ArgumentOutOfRange { .. }
                | ArchivistError::DependencyDepth { .. }
                | ArchivistError::DependencyCycle { .. }
                | ArchivistError::InvalidTimeframe { .. }
                | ArchivistError::UnknownColumn { .. }
                | ArchivistError::ColumnNotInType { .. }
        )
    }
}

impl From<csv::Error> for ArchivistError {
    fn from(err: csv::Error) -> Self {
        ArchivistError::Csv {
            reason: err.to_string(),
        }
    }
}

impl From<&ArchivistError> for std::process::ExitCode {
    fn from(err: &ArchivistError) -> Self {
        let code: u8 = if err.is_validation() {
            4
        } else {
            match err {
                ArchivistError::Io(_) => 1,
                ArchivistError::ConfigParse { .. }
                | ArchivistError::ConfigMissing { .. }
                | ArchivistError::ConfigInvalid { .. } => 2,
                ArchivistError::Csv { .. } => 5,
                _ => 3,
            }
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_context_points_at_offset() {
        let err = ParseError {
            message: "unbalanced brackets".into(),
            position: 3,
        };
        let rendered = err.display_with_context("ab;]x");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ab;]x");
        assert_eq!(lines[1], "   ^");
        assert!(lines[2].contains("position 3"));
    }

    #[test]
    fn validation_errors_are_classified() {
        let err = ArchivistError::UnknownAssetType {
            asset_type: "nope".into(),
        };
        assert!(err.is_validation());
        let err = ArchivistError::AddressShape { found: 2 };
        assert!(!err.is_validation());
    }

    #[test]
    fn exit_codes_follow_error_family() {
        use std::process::ExitCode;
        let code = |err: ArchivistError| format!("{:?}", ExitCode::from(&err));
        let expect = |n: u8| format!("{:?}", ExitCode::from(n));

        assert_eq!(code(std::io::Error::other("disk").into()), expect(1));
        assert_eq!(
            code(ArchivistError::ConfigMissing {
                section: "set".into(),
                key: "id".into()
            }),
            expect(2)
        );
        assert_eq!(code(ArchivistError::AddressShape { found: 2 }), expect(3));
        assert_eq!(
            code(ArchivistError::DependencyCycle { name: "a".into() }),
            expect(4)
        );
        assert_eq!(
            code(ArchivistError::EmptyArgument {
                asset_type: "rsi".into(),
                index: 0
            }),
            expect(4)
        );
        assert_eq!(code(ArchivistError::Csv { reason: "x".into() }), expect(5));
    }

    #[test]
    fn field_count_message_names_expectation() {
        let err = ArchivistError::FieldCount {
            kind: "unit",
            expected: "1 or 8",
            found: 3,
        };
        assert_eq!(err.to_string(), "unit record has 3 fields, expected 1 or 8");
    }
}
