//! Asset registry, argument typing and the address grammar.
//!
//! The registry is built once with [`AssetRegistry::default`] and passed by
//! reference to whatever validates addresses or constructs indicators.

pub mod address;
pub mod asset_type;
pub mod splitter;

pub use address::{AssetAddress, MAX_DEPENDENCY_DEPTH, ParsedAddress};
pub use asset_type::{ArchiveType, AssetType};

use crate::domain::data::DataType;
use crate::domain::error::ArchivistError;
use std::collections::HashMap;
use std::fmt;

/// Declared type of a positional asset argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Int,
    Float,
    Bool,
    Str,
}

impl ArgType {
    pub fn as_str(self) -> &'static str {
        match self {
            ArgType::Int => "int64",
            ArgType::Float => "float64",
            ArgType::Bool => "bool",
            ArgType::Str => "string",
        }
    }

    /// Resolve a type name by prefix: `int*`, `float*`, `bool*`, or exactly `string`.
    pub fn from_name(name: &str) -> Option<ArgType> {
        if name.starts_with("int") {
            Some(ArgType::Int)
        } else if name.starts_with("bool") {
            Some(ArgType::Bool)
        } else if name.starts_with("float") {
            Some(ArgType::Float)
        } else if name == "string" {
            Some(ArgType::Str)
        } else {
            None
        }
    }

    /// Parse an argument string as this type, `None` when it does not fit.
    pub fn coerce(self, raw: &str) -> Option<ArgValue> {
        match self {
            ArgType::Int => raw.parse().ok().map(ArgValue::Int),
            ArgType::Float => raw.parse().ok().map(ArgValue::Float),
            ArgType::Bool => parse_bool(raw).map(ArgValue::Bool),
            ArgType::Str => Some(ArgValue::Str(raw.to_string())),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ArgValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// One positional argument of an asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub arg_type: ArgType,
    /// Smallest accepted value for integer arguments.
    pub min: Option<i64>,
}

impl ArgSpec {
    /// Coerce the `index`-th argument of `asset_type` and apply the lower bound.
    pub fn check(&self, asset_type: &str, index: usize, raw: &str) -> Result<ArgValue, ArchivistError> {
        let value = self
            .arg_type
            .coerce(raw)
            .ok_or_else(|| ArchivistError::InvalidArgument {
                asset_type: asset_type.to_string(),
                index,
                value: raw.to_string(),
                expected: self.arg_type,
            })?;
        if let (Some(min), Some(v)) = (self.min, value.as_int()) {
            if v < min {
                return Err(ArchivistError::ArgumentOutOfRange {
                    asset_type: asset_type.to_string(),
                    index,
                    value: v,
                    min,
                });
            }
        }
        Ok(value)
    }
}

/// Where the values of an asset come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    Archive(ArchiveType),
    External,
    Indicator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
    pub asset_type: AssetType,
    pub data_type: DataType,
    /// `-1` leaves the precision to each set.
    pub default_decimals: i8,
    pub dependency_types: Vec<DataType>,
    pub arguments: Vec<ArgSpec>,
    pub label: String,
    pub description: String,
    pub source: AssetSource,
}

impl AssetConfig {
    fn produced(
        asset_type: AssetType,
        data_type: DataType,
        default_decimals: i8,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let source = match ArchiveType::producing(asset_type) {
            Some(archive) => AssetSource::Archive(archive),
            None => AssetSource::External,
        };
        AssetConfig {
            asset_type,
            data_type,
            default_decimals,
            dependency_types: Vec::new(),
            arguments: Vec::new(),
            label: label.into(),
            description: description.into(),
            source,
        }
    }

    fn indicator(
        asset_type: AssetType,
        default_decimals: i8,
        min_period: i64,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AssetConfig {
            asset_type,
            data_type: DataType::Point,
            default_decimals,
            dependency_types: vec![DataType::Unit],
            arguments: vec![ArgSpec {
                name: "period",
                arg_type: ArgType::Int,
                min: Some(min_period),
            }],
            label: label.into(),
            description: description.into(),
            source: AssetSource::Indicator,
        }
    }

    pub fn argument_types(&self) -> Vec<ArgType> {
        self.arguments.iter().map(|a| a.arg_type).collect()
    }
}

/// Lookup table of every known asset type.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    configs: HashMap<AssetType, AssetConfig>,
}

impl AssetRegistry {
    pub fn get(&self, asset_type: AssetType) -> Option<&AssetConfig> {
        self.configs.get(&asset_type)
    }

    /// Look up by wire name; unknown names are `None`.
    pub fn get_by_name(&self, name: &str) -> Option<&AssetConfig> {
        name.parse().ok().and_then(|a| self.get(a))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetConfig> {
        AssetType::ALL.iter().filter_map(|a| self.configs.get(a))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        use AssetType::*;
        use DataType::{Quantity, Unit};

        let mut list = vec![
            AssetConfig::produced(
                SpotPrice,
                Unit,
                -1,
                "Spot Price",
                "The current price at which an asset is bought or sold in the spot market on Binance.",
            ),
            AssetConfig::produced(
                SpotVolume,
                Quantity,
                -1,
                "Spot Volume",
                "The total amount of an asset traded in the spot market on Binance.",
            ),
            AssetConfig::produced(
                FuturesPrice,
                Unit,
                -1,
                "Futures Price",
                "The current price at which a futures contract is trading on Binance.",
            ),
            AssetConfig::produced(
                FuturesVolume,
                Quantity,
                -1,
                "Futures Volume",
                "The total amount of futures contracts traded on Binance.",
            ),
            AssetConfig::produced(
                MetricSumOpenInterest,
                Unit,
                -1,
                "Open Interest",
                "The total number of outstanding derivative contracts that have not been settled on Binance.",
            ),
            AssetConfig::produced(
                MetricCountTopTraderLongShortRatio,
                Unit,
                4,
                "Top Trader Long/Short Ratio (accounts)",
                "The ratio of long to short accounts among top traders on Binance.",
            ),
            AssetConfig::produced(
                MetricSumTopTraderLongShortRatio,
                Unit,
                4,
                "Top Trader Long/Short Ratio (positions)",
                "The ratio of the sum of long to short positions taken by top traders on Binance.",
            ),
            AssetConfig::produced(
                MetricCountLongShortRatio,
                Unit,
                4,
                "Long/Short Ratio",
                "The overall ratio of long to short positions taken by all traders on Binance.",
            ),
            AssetConfig::produced(
                MetricSumTakerLongShortVolRatio,
                Unit,
                4,
                "Taker Long/Short Volume Ratio",
                "The ratio of taker buy to taker sell volume on Binance.",
            ),
            AssetConfig::produced(
                CirculatingSupply,
                Unit,
                -1,
                "Circulating Supply",
                "The total number of tokens that are currently available in circulation.",
            ),
            AssetConfig::indicator(
                Rsi,
                2,
                1,
                "Relative Strength Index (RSI)",
                "A momentum oscillator that measures the speed and change of price movements.",
            ),
            AssetConfig::indicator(
                Sma,
                -1,
                1,
                "Simple Moving Average (SMA)",
                "The arithmetic mean of the last N values.",
            ),
            AssetConfig::indicator(
                Ema,
                -1,
                1,
                "Exponential Moving Average (EMA)",
                "A moving average that weights recent values exponentially more.",
            ),
            AssetConfig::indicator(
                Wma,
                -1,
                1,
                "Weighted Moving Average (WMA)",
                "A moving average with linearly increasing weights towards recent values.",
            ),
            AssetConfig::indicator(
                Hma,
                -1,
                2,
                "Hull Moving Average (HMA)",
                "A low-lag moving average built from weighted moving averages.",
            ),
        ];

        for asset in AssetType::ALL {
            if let Some(percent) = asset.book_depth_percent() {
                let (label, direction) = if percent > 0 {
                    (format!("Liquidity +{}% Price", percent), "above")
                } else {
                    (format!("Liquidity {}% Price", percent), "below")
                };
                let description = format!(
                    "Available liquidity at a price level {}% {} the current market price on Binance.",
                    percent.abs(),
                    direction
                );
                list.push(AssetConfig::produced(asset, Unit, -1, label, description));
            }
        }

        AssetRegistry {
            configs: list.into_iter().map(|c| (c.asset_type, c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_asset_type() {
        let registry = AssetRegistry::default();
        assert_eq!(registry.len(), AssetType::ALL.len());
        for asset in AssetType::ALL {
            assert!(registry.get(asset).is_some(), "missing {}", asset);
        }
    }

    #[test]
    fn indicator_shape() {
        let registry = AssetRegistry::default();
        let rsi = registry.get(AssetType::Rsi).unwrap();
        assert_eq!(rsi.data_type, DataType::Point);
        assert_eq!(rsi.default_decimals, 2);
        assert_eq!(rsi.dependency_types, vec![DataType::Unit]);
        assert_eq!(rsi.argument_types(), vec![ArgType::Int]);
        assert_eq!(registry.get(AssetType::Hma).unwrap().arguments[0].min, Some(2));
    }

    #[test]
    fn sources() {
        let registry = AssetRegistry::default();
        assert_eq!(
            registry.get(AssetType::BookDepthP3).unwrap().source,
            AssetSource::Archive(ArchiveType::BinanceBookDepth)
        );
        assert_eq!(
            registry.get(AssetType::CirculatingSupply).unwrap().source,
            AssetSource::External
        );
        assert_eq!(
            registry.get_by_name("bd-m2").unwrap().label,
            "Liquidity -2% Price"
        );
        assert!(registry.get_by_name("vwap").is_none());
    }

    #[test]
    fn arg_type_prefix_match() {
        assert_eq!(ArgType::from_name("int64"), Some(ArgType::Int));
        assert_eq!(ArgType::from_name("float32"), Some(ArgType::Float));
        assert_eq!(ArgType::from_name("boolean"), Some(ArgType::Bool));
        assert_eq!(ArgType::from_name("string"), Some(ArgType::Str));
        assert_eq!(ArgType::from_name("str"), None);
    }

    #[test]
    fn coercion() {
        assert_eq!(ArgType::Int.coerce("14"), Some(ArgValue::Int(14)));
        assert_eq!(ArgType::Int.coerce("14.5"), None);
        assert_eq!(ArgType::Float.coerce("0.5"), Some(ArgValue::Float(0.5)));
        assert_eq!(ArgType::Bool.coerce("T"), Some(ArgValue::Bool(true)));
        assert_eq!(ArgType::Bool.coerce("yes"), None);
        assert_eq!(
            ArgType::Str.coerce("close"),
            Some(ArgValue::Str("close".into()))
        );
    }
}
