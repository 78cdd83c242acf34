//! Asset addresses: `setid;type;[dep=dep];arg_arg`.
//!
//! An address names a series by its set, its asset type, the addresses it is
//! derived from and its arguments. Dependencies are full addresses nested in
//! brackets, so splitting is bracket-aware at both levels.

use crate::domain::asset::splitter::{SQUARE, split_top_level};
use crate::domain::asset::{AssetRegistry, AssetSource, AssetType};
use crate::domain::data::DataType;
use crate::domain::error::{ArchivistError, ParseError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Deepest dependency nesting accepted by validation.
pub const MAX_DEPENDENCY_DEPTH: usize = 16;

const PART_DELIMITER: char = ';';
const DEPENDENCY_DELIMITER: char = '=';
const TOKEN_DELIMITER: char = '_';

/// Canonical text form of an address; doubles as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetAddress(String);

impl AssetAddress {
    pub fn new(address: impl Into<String>) -> Self {
        AssetAddress(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<ParsedAddress, ArchivistError> {
        ParsedAddress::parse(&self.0)
    }

    pub fn sha256(&self) -> [u8; 32] {
        Sha256::digest(self.0.as_bytes()).into()
    }

    /// Hex form of [`AssetAddress::sha256`], for fixed-width keys.
    pub fn key(&self) -> String {
        hex::encode(self.sha256())
    }
}

impl fmt::Display for AssetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetAddress {
    fn from(s: &str) -> Self {
        AssetAddress(s.to_string())
    }
}

/// Structured form of an [`AssetAddress`].
///
/// The asset type is kept as text so addresses naming types outside the
/// registry still parse and rebuild; [`ParsedAddress::validate`] rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub set_id: Vec<String>,
    pub asset_type: String,
    pub dependencies: Vec<AssetAddress>,
    pub arguments: Vec<String>,
}

impl ParsedAddress {
    pub fn new(
        set_id: &[&str],
        asset_type: AssetType,
        dependencies: Vec<AssetAddress>,
        arguments: Vec<String>,
    ) -> Self {
        ParsedAddress {
            set_id: set_id.iter().map(|s| s.to_string()).collect(),
            asset_type: asset_type.as_str().to_string(),
            dependencies,
            arguments,
        }
    }

    pub fn parse(input: &str) -> Result<Self, ArchivistError> {
        let parts = split_top_level(input, PART_DELIMITER, SQUARE, 0)?;
        let [set_id, asset_type, dependencies, arguments] = parts.as_slice() else {
            return Err(ArchivistError::AddressShape { found: parts.len() });
        };

        let dep_offset = set_id.len() + asset_type.len() + 2;
        let arguments = arguments.trim();

        Ok(ParsedAddress {
            set_id: set_id.split(TOKEN_DELIMITER).map(str::to_string).collect(),
            asset_type: asset_type.to_string(),
            dependencies: parse_dependencies(dependencies, dep_offset)?,
            arguments: if arguments.is_empty() {
                Vec::new()
            } else {
                arguments.split(TOKEN_DELIMITER).map(str::to_string).collect()
            },
        })
    }

    /// Canonical address; the set id is lower-cased.
    pub fn build(&self) -> AssetAddress {
        let dependencies: Vec<&str> = self.dependencies.iter().map(|d| d.as_str()).collect();
        AssetAddress(format!(
            "{};{};[{}];{}",
            self.set_id.join("_").to_lowercase(),
            self.asset_type,
            dependencies.join("="),
            self.arguments.join("_")
        ))
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    pub fn asset_type(&self) -> Result<AssetType, ArchivistError> {
        self.asset_type.parse()
    }

    pub fn data_type(&self, registry: &AssetRegistry) -> Result<DataType, ArchivistError> {
        let asset_type = self.asset_type()?;
        registry
            .get(asset_type)
            .map(|c| c.data_type)
            .ok_or_else(|| ArchivistError::UnknownAssetType {
                asset_type: self.asset_type.clone(),
            })
    }

    pub fn parsed_dependencies(&self) -> Result<Vec<ParsedAddress>, ArchivistError> {
        self.dependencies.iter().map(AssetAddress::parse).collect()
    }

    /// Check the address against the registry, recursing into dependencies.
    pub fn validate(&self, registry: &AssetRegistry) -> Result<(), ArchivistError> {
        self.validate_at(registry, 0)
    }

    fn validate_at(&self, registry: &AssetRegistry, depth: usize) -> Result<(), ArchivistError> {
        if depth > MAX_DEPENDENCY_DEPTH {
            return Err(ArchivistError::DependencyDepth {
                limit: MAX_DEPENDENCY_DEPTH,
            });
        }

        if self
            .set_id
            .iter()
            .map(|id| id.trim())
            .any(|id| id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(ArchivistError::InvalidSetId {
                set_id: self.set_id.join("_"),
            });
        }

        let asset_type = self.asset_type()?;
        let config = registry
            .get(asset_type)
            .ok_or_else(|| ArchivistError::UnknownAssetType {
                asset_type: self.asset_type.clone(),
            })?;

        if matches!(config.source, AssetSource::Archive(_))
            && (self.has_dependencies() || self.has_arguments())
        {
            return Err(ArchivistError::UnexpectedDependencies {
                asset_type: self.asset_type.clone(),
            });
        }

        if self.dependencies.len() != config.dependency_types.len() {
            return Err(ArchivistError::DependencyCount {
                asset_type: self.asset_type.clone(),
                expected: config.dependency_types.len(),
                found: self.dependencies.len(),
            });
        }
        for (index, (dependency, expected)) in self
            .dependencies
            .iter()
            .zip(&config.dependency_types)
            .enumerate()
        {
            let parsed = dependency.parse()?;
            parsed.validate_at(registry, depth + 1)?;
            let found = parsed.data_type(registry)?;
            if found != *expected {
                return Err(ArchivistError::DependencyType {
                    asset_type: self.asset_type.clone(),
                    index,
                    expected: *expected,
                    found,
                });
            }
        }

        // An empty argument cannot survive build then parse.
        if let Some(index) = self.arguments.iter().position(|a| a.trim().is_empty()) {
            return Err(ArchivistError::EmptyArgument {
                asset_type: self.asset_type.clone(),
                index,
            });
        }
        if self.arguments.len() != config.arguments.len() {
            return Err(ArchivistError::ArgumentCount {
                asset_type: self.asset_type.clone(),
                expected: config.arguments.len(),
                found: self.arguments.len(),
            });
        }
        for (index, (raw, spec)) in self.arguments.iter().zip(&config.arguments).enumerate() {
            spec.check(&self.asset_type, index, raw)?;
        }

        Ok(())
    }

    /// Column header form: `btcusdt.rsi(14)[btcusdt.spot_price]`.
    pub fn csv_column_name(&self, include_set_id: bool) -> Result<String, ArchivistError> {
        let dependencies = self
            .parsed_dependencies()?
            .iter()
            .map(|d| d.csv_column_name(include_set_id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut name = self.asset_type.clone();
        if self.has_arguments() {
            name = format!("{}({})", name, self.arguments.join("|"));
        }
        if !dependencies.is_empty() {
            name = format!("{}[{}]", name, dependencies.join("|"));
        }
        if include_set_id {
            name = format!("{}.{}", self.set_id.join("").to_lowercase(), name);
        }
        Ok(name)
    }

    /// Display form: `BTCUSDT.RSI14(BTCUSDT.SPOT_PRICE)`. Dependencies that
    /// fail to parse are left out.
    pub fn pretty_string(&self) -> String {
        let head = format!(
            "{}.{}{}",
            self.set_id.join(""),
            self.asset_type,
            self.arguments.join("-")
        )
        .to_uppercase();
        let dependencies: Vec<String> = self
            .dependencies
            .iter()
            .filter_map(|d| d.parse().ok())
            .map(|d| d.pretty_string())
            .collect();
        if dependencies.is_empty() {
            head
        } else {
            format!("{}({})", head, dependencies.join(", "))
        }
    }
}

fn parse_dependencies(raw: &str, offset: usize) -> Result<Vec<AssetAddress>, ArchivistError> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(|| ParseError {
            message: format!("dependency list must be enclosed in brackets, found {:?}", raw),
            position: offset,
        })?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(
        split_top_level(inner, DEPENDENCY_DELIMITER, SQUARE, offset + 1)?
            .into_iter()
            .map(AssetAddress::from)
            .collect(),
    )
}
