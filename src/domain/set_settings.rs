//! Set settings: a pair (or basket) id plus the assets archived for it.
//!
//! ```ini
//! [set]
//! id = BTC,USDT
//!
//! [asset.price]
//! type = spot_price
//! min_data_date = 2021-01-01
//!
//! [asset.rsi14]
//! type = rsi
//! dependencies = price
//! arguments = 14
//! ```
//!
//! Dependencies name sibling `asset.*` sections, so a set describes its own
//! dependency graph and every asset resolves to a full [`AssetAddress`].

use crate::domain::asset::{AssetAddress, AssetRegistry, AssetType, ParsedAddress};
use crate::domain::error::ArchivistError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::info;

const SET_SECTION: &str = "set";
const ASSET_SECTION_PREFIX: &str = "asset.";
const MAX_DECIMALS: i8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct AssetSetting {
    pub name: String,
    pub asset_type: AssetType,
    /// Names of sibling assets, in positional order.
    pub dependencies: Vec<String>,
    pub arguments: Vec<String>,
    pub min_data_date: Option<String>,
    pub decimals: Option<i8>,
}

impl AssetSetting {
    fn section(&self) -> String {
        format!("{}{}", ASSET_SECTION_PREFIX, self.name)
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> ArchivistError {
        ArchivistError::ConfigInvalid {
            section: self.section(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetSettings {
    pub id: Vec<String>,
    pub assets: Vec<AssetSetting>,
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

impl SetSettings {
    /// Read the `[set]` section and every `[asset.*]` section.
    pub fn load(config: &dyn ConfigPort) -> Result<Self, ArchivistError> {
        let id = split_list(config.get_string(SET_SECTION, "id"));
        if id.is_empty() {
            return Err(ArchivistError::ConfigMissing {
                section: SET_SECTION.to_string(),
                key: "id".to_string(),
            });
        }

        let mut assets = Vec::new();
        for section in config.sections() {
            let Some(name) = section.strip_prefix(ASSET_SECTION_PREFIX) else {
                continue;
            };
            let asset_type: AssetType = config
                .get_string(&section, "type")
                .ok_or_else(|| ArchivistError::ConfigMissing {
                    section: section.clone(),
                    key: "type".to_string(),
                })?
                .trim()
                .parse()?;
            let decimals = match config.get_string(&section, "decimals") {
                Some(raw) => Some(raw.trim().parse::<i8>().map_err(|_| {
                    ArchivistError::ConfigInvalid {
                        section: section.clone(),
                        key: "decimals".to_string(),
                        reason: format!("not an integer: {:?}", raw),
                    }
                })?),
                None => None,
            };
            assets.push(AssetSetting {
                name: name.to_string(),
                asset_type,
                dependencies: split_list(config.get_string(&section, "dependencies")),
                arguments: split_list(config.get_string(&section, "arguments")),
                min_data_date: config
                    .get_string(&section, "min_data_date")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                decimals,
            });
        }

        Ok(SetSettings { id, assets })
    }

    /// Lower-cased id tokens joined without separator, e.g. `btcusdt`.
    pub fn id_string(&self) -> String {
        self.id.join("").to_lowercase()
    }

    pub fn asset(&self, name: &str) -> Option<&AssetSetting> {
        self.assets.iter().find(|a| a.name == name)
    }

    pub fn contains_asset(&self, asset_type: AssetType) -> bool {
        self.assets.iter().any(|a| a.asset_type == asset_type)
    }

    /// Full address of the named asset, resolving sibling dependencies.
    pub fn address_of(&self, name: &str) -> Result<AssetAddress, ArchivistError> {
        let asset = self.asset(name).ok_or_else(|| ArchivistError::ConfigMissing {
            section: format!("{}{}", ASSET_SECTION_PREFIX, name),
            key: "type".to_string(),
        })?;
        self.resolve(asset, &mut Vec::new())
    }

    fn resolve(
        &self,
        asset: &AssetSetting,
        path: &mut Vec<String>,
    ) -> Result<AssetAddress, ArchivistError> {
        if path.contains(&asset.name) {
            return Err(ArchivistError::DependencyCycle {
                name: asset.name.clone(),
            });
        }
        path.push(asset.name.clone());

        let mut dependencies = Vec::with_capacity(asset.dependencies.len());
        for dep in &asset.dependencies {
            let sibling = self
                .asset(dep)
                .ok_or_else(|| asset.invalid("dependencies", format!("unknown asset {:?}", dep)))?;
            dependencies.push(self.resolve(sibling, path)?);
        }
        path.pop();

        Ok(ParsedAddress {
            set_id: self.id.clone(),
            asset_type: asset.asset_type.as_str().to_string(),
            dependencies,
            arguments: asset.arguments.clone(),
        }
        .build())
    }

    /// Every asset with its address, in section order.
    pub fn addresses(&self) -> Result<Vec<(&str, AssetAddress)>, ArchivistError> {
        self.assets
            .iter()
            .map(|a| Ok((a.name.as_str(), self.address_of(&a.name)?)))
            .collect()
    }

    /// Decimals an asset is stored with: its own setting, else the registry default.
    pub fn decimals_of(&self, registry: &AssetRegistry, name: &str) -> Option<i8> {
        let asset = self.asset(name)?;
        asset.decimals.or_else(|| {
            registry
                .get(asset.asset_type)
                .map(|c| c.default_decimals)
                .filter(|d| *d >= 0)
        })
    }

    pub fn validate(&self, registry: &AssetRegistry) -> Result<(), ArchivistError> {
        if self.id.iter().all(|t| t.trim().is_empty()) {
            return Err(ArchivistError::ConfigMissing {
                section: SET_SECTION.to_string(),
                key: "id".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            let address = self.address_of(&asset.name)?;
            address.parse()?.validate(registry)?;
            if !seen.insert(address.clone()) {
                return Err(asset.invalid("type", format!("duplicate asset {}", address)));
            }

            validate_decimals(registry, asset)?;
            validate_min_data_date(asset)?;
        }

        info!(set = %self.id_string(), assets = self.assets.len(), "set settings valid");
        Ok(())
    }
}

fn validate_decimals(registry: &AssetRegistry, asset: &AssetSetting) -> Result<(), ArchivistError> {
    let default = registry
        .get(asset.asset_type)
        .map(|c| c.default_decimals)
        .unwrap_or(-1);
    match asset.decimals {
        Some(d) if !(0..=MAX_DECIMALS).contains(&d) => Err(asset.invalid(
            "decimals",
            format!("decimals must be between 0 and {}, found {}", MAX_DECIMALS, d),
        )),
        None if default < 0 => Err(ArchivistError::ConfigMissing {
            section: asset.section(),
            key: "decimals".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_min_data_date(asset: &AssetSetting) -> Result<(), ArchivistError> {
    match (&asset.min_data_date, asset.dependencies.is_empty()) {
        (Some(raw), true) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| asset.invalid("min_data_date", "invalid date format, expected YYYY-MM-DD")),
        (None, true) => Err(ArchivistError::ConfigMissing {
            section: asset.section(),
            key: "min_data_date".to_string(),
        }),
        (Some(_), false) => Err(asset.invalid(
            "min_data_date",
            "derived assets start with their dependencies",
        )),
        (None, false) => Ok(()),
    }
}
