//! Incremental indicators with persisted state.
//!
//! An [`IndicatorDataBuilder`] carries one series forward: it decodes the
//! previous state once, feeds each input through the indicator, and exposes
//! the updated state bytes for the caller to persist before the next batch.
//! One builder serves one ordered stream; builders are never shared.

pub mod moving_average;
pub mod rsi;
pub mod vwap;

pub use moving_average::MaState;
pub use rsi::RsiState;
pub use vwap::vwap;

use crate::domain::asset::{ArgValue, AssetRegistry, AssetType};
use crate::domain::column::Column;
use crate::domain::data::{Data, Point, Sample};
use crate::domain::error::ArchivistError;
use crate::domain::math::round_float;
use serde::Serialize;
use tracing::debug;

/// Output of an indicator that has not seen enough data yet.
pub const WARM_UP: f64 = -1.0;

/// Typed carry-forward state of one indicator.
///
/// Encoded as the bare inner struct; decoding is driven by the asset type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorState {
    Rsi(RsiState),
    MovingAverage(MaState),
}

impl IndicatorState {
    /// Zero state for `asset_type`.
    ///
    /// # Panics
    ///
    /// When `asset_type` is not an indicator.
    pub fn zero(asset_type: AssetType) -> Self {
        match asset_type {
            AssetType::Rsi => IndicatorState::Rsi(RsiState::default()),
            AssetType::Sma | AssetType::Ema | AssetType::Wma | AssetType::Hma => {
                IndicatorState::MovingAverage(MaState::default())
            }
            other => panic!("{} is not an indicator", other),
        }
    }

    /// Decode persisted bytes; empty bytes are the zero state.
    ///
    /// # Panics
    ///
    /// When `asset_type` is not an indicator.
    pub fn decode(asset_type: AssetType, bytes: &[u8]) -> Result<Self, ArchivistError> {
        if bytes.is_empty() {
            return Ok(Self::zero(asset_type));
        }
        let decoded = match Self::zero(asset_type) {
            IndicatorState::Rsi(_) => serde_json::from_slice(bytes).map(IndicatorState::Rsi),
            IndicatorState::MovingAverage(_) => {
                serde_json::from_slice(bytes).map(IndicatorState::MovingAverage)
            }
        };
        decoded.map_err(|e| ArchivistError::StateDecode {
            reason: e.to_string(),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, ArchivistError> {
        serde_json::to_vec(self).map_err(|e| ArchivistError::StateDecode {
            reason: e.to_string(),
        })
    }
}

/// Computes successive indicator values for one series.
#[derive(Debug, Clone)]
pub struct IndicatorDataBuilder {
    asset_type: AssetType,
    prev_state: Vec<u8>,
    arguments: Vec<ArgValue>,
    precision: i8,
    column: Column,
    cached_state: Option<IndicatorState>,
}

impl IndicatorDataBuilder {
    /// Coerces `arguments` against the registry schema of `asset_type`.
    /// `prev_state` of `None` (or empty) starts the series from scratch;
    /// `precision < 0` leaves outputs unrounded.
    pub fn new(
        registry: &AssetRegistry,
        asset_type: AssetType,
        prev_state: Option<Vec<u8>>,
        arguments: &[String],
        precision: i8,
    ) -> Result<Self, ArchivistError> {
        let config = registry
            .get(asset_type)
            .ok_or_else(|| ArchivistError::UnknownAssetType {
                asset_type: asset_type.to_string(),
            })?;

        if arguments.len() != config.arguments.len() {
            return Err(ArchivistError::ArgumentCount {
                asset_type: asset_type.to_string(),
                expected: config.arguments.len(),
                found: arguments.len(),
            });
        }
        let arguments = config
            .arguments
            .iter()
            .zip(arguments)
            .enumerate()
            .map(|(i, (spec, raw))| spec.check(asset_type.as_str(), i, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IndicatorDataBuilder {
            asset_type,
            prev_state: prev_state.unwrap_or_default(),
            arguments,
            precision,
            column: Column::Close,
            cached_state: None,
        })
    }

    /// Read the driving value from `column` instead of `close`.
    pub fn with_column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn precision(&self) -> i8 {
        self.precision
    }

    /// Copy of the state bytes after the last computation.
    pub fn prev_state(&self) -> Vec<u8> {
        self.prev_state.clone()
    }

    fn period(&self) -> usize {
        match self.arguments.first() {
            Some(ArgValue::Int(p)) if *p > 0 => *p as usize,
            other => panic!("{} requires a positive period, got {:?}", self.asset_type, other),
        }
    }

    fn state(&mut self) -> Result<&mut IndicatorState, ArchivistError> {
        let state = match self.cached_state.take() {
            Some(state) => state,
            None => {
                let decoded = IndicatorState::decode(self.asset_type, &self.prev_state)?;
                debug!(asset_type = %self.asset_type, bytes = self.prev_state.len(), "decoded indicator state");
                decoded
            }
        };
        Ok(self.cached_state.insert(state))
    }

    /// Feed the next input and return the indicator value stamped with its time.
    ///
    /// # Panics
    ///
    /// When the asset type is not an indicator, when `inputs` is empty, when
    /// the first input does not expose the selected column, or when the
    /// cached state belongs to another indicator.
    pub fn compute_unsafe(&mut self, inputs: &[Sample]) -> Result<Point, ArchivistError> {
        let asset_type = self.asset_type;
        assert!(asset_type.is_indicator(), "{} is not an indicator", asset_type);
        let Some(input) = inputs.first() else {
            panic!("{} needs at least one input", asset_type);
        };
        let column = self.column;
        let Some(value) = input.value_at(column) else {
            panic!("{} input does not expose column {}", input.data_type(), column);
        };
        let period = self.period();

        let state = self.state()?;
        let raw = match (asset_type, &mut *state) {
            (AssetType::Rsi, IndicatorState::Rsi(s)) => s.next(value, period as i64),
            (AssetType::Sma, IndicatorState::MovingAverage(s)) => s.sma(value, period),
            (AssetType::Ema, IndicatorState::MovingAverage(s)) => s.ema(value, period),
            (AssetType::Wma, IndicatorState::MovingAverage(s)) => s.wma(value, period),
            (AssetType::Hma, IndicatorState::MovingAverage(s)) => s.hma(value, period),
            (other, _) => panic!("cached state does not belong to {}", other),
        };
        let encoded = state.encode()?;
        self.prev_state = encoded;

        let value = if self.precision >= 0 {
            round_float(raw, self.precision as u32)
        } else {
            raw
        };
        Ok(Point::new(value).with_time(input.time()))
    }
}
