//! Closed set of asset types and the archives that produce them.

use crate::domain::error::ArchivistError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AssetType {
    SpotPrice,
    SpotVolume,
    FuturesPrice,
    FuturesVolume,
    BookDepthP1,
    BookDepthP2,
    BookDepthP3,
    BookDepthP4,
    BookDepthP5,
    BookDepthM1,
    BookDepthM2,
    BookDepthM3,
    BookDepthM4,
    BookDepthM5,
    MetricSumOpenInterest,
    MetricCountTopTraderLongShortRatio,
    MetricSumTopTraderLongShortRatio,
    MetricCountLongShortRatio,
    MetricSumTakerLongShortVolRatio,
    CirculatingSupply,
    Rsi,
    Sma,
    Ema,
    Wma,
    Hma,
}

impl AssetType {
    pub const ALL: [AssetType; 25] = [
        AssetType::SpotPrice,
        AssetType::SpotVolume,
        AssetType::FuturesPrice,
        AssetType::FuturesVolume,
        AssetType::BookDepthP1,
        AssetType::BookDepthP2,
        AssetType::BookDepthP3,
        AssetType::BookDepthP4,
        AssetType::BookDepthP5,
        AssetType::BookDepthM1,
        AssetType::BookDepthM2,
        AssetType::BookDepthM3,
        AssetType::BookDepthM4,
        AssetType::BookDepthM5,
        AssetType::MetricSumOpenInterest,
        AssetType::MetricCountTopTraderLongShortRatio,
        AssetType::MetricSumTopTraderLongShortRatio,
        AssetType::MetricCountLongShortRatio,
        AssetType::MetricSumTakerLongShortVolRatio,
        AssetType::CirculatingSupply,
        AssetType::Rsi,
        AssetType::Sma,
        AssetType::Ema,
        AssetType::Wma,
        AssetType::Hma,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::SpotPrice => "spot_price",
            AssetType::SpotVolume => "spot_volume",
            AssetType::FuturesPrice => "futures_price",
            AssetType::FuturesVolume => "futures_volume",
            AssetType::BookDepthP1 => "bd-p1",
            AssetType::BookDepthP2 => "bd-p2",
            AssetType::BookDepthP3 => "bd-p3",
            AssetType::BookDepthP4 => "bd-p4",
            AssetType::BookDepthP5 => "bd-p5",
            AssetType::BookDepthM1 => "bd-m1",
            AssetType::BookDepthM2 => "bd-m2",
            AssetType::BookDepthM3 => "bd-m3",
            AssetType::BookDepthM4 => "bd-m4",
            AssetType::BookDepthM5 => "bd-m5",
            AssetType::MetricSumOpenInterest => "metrics_sum_open_interest",
            AssetType::MetricCountTopTraderLongShortRatio => {
                "metrics_count_toptrader_long_short_ratio"
            }
            AssetType::MetricSumTopTraderLongShortRatio => "metrics_sum_toptrader_long_short_ratio",
            AssetType::MetricCountLongShortRatio => "metrics_count_long_short_ratio",
            AssetType::MetricSumTakerLongShortVolRatio => "metrics_sum_taker_long_short_vol_ratio",
            AssetType::CirculatingSupply => "circulating_supply",
            AssetType::Rsi => "rsi",
            AssetType::Sma => "sma",
            AssetType::Ema => "ema",
            AssetType::Wma => "wma",
            AssetType::Hma => "hma",
        }
    }

    /// Signed percent distance of a book-depth asset: `bd-p2` is `2`, `bd-m3` is `-3`.
    pub fn book_depth_percent(self) -> Option<i8> {
        match self {
            AssetType::BookDepthP1 => Some(1),
            AssetType::BookDepthP2 => Some(2),
            AssetType::BookDepthP3 => Some(3),
            AssetType::BookDepthP4 => Some(4),
            AssetType::BookDepthP5 => Some(5),
            AssetType::BookDepthM1 => Some(-1),
            AssetType::BookDepthM2 => Some(-2),
            AssetType::BookDepthM3 => Some(-3),
            AssetType::BookDepthM4 => Some(-4),
            AssetType::BookDepthM5 => Some(-5),
            _ => None,
        }
    }

    pub fn is_indicator(self) -> bool {
        matches!(
            self,
            AssetType::Rsi | AssetType::Sma | AssetType::Ema | AssetType::Wma | AssetType::Hma
        )
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ArchivistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ArchivistError::UnknownAssetType {
                asset_type: s.to_string(),
            })
    }
}

impl TryFrom<String> for AssetType {
    type Error = ArchivistError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetType> for String {
    fn from(a: AssetType) -> Self {
        a.as_str().to_string()
    }
}

/// Exchange archives and the assets extracted from each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveType {
    BinanceSpotTrades,
    BinanceFuturesTrades,
    BinanceBookDepth,
    BinanceMetrics,
}

impl ArchiveType {
    pub const ALL: [ArchiveType; 4] = [
        ArchiveType::BinanceSpotTrades,
        ArchiveType::BinanceFuturesTrades,
        ArchiveType::BinanceBookDepth,
        ArchiveType::BinanceMetrics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveType::BinanceSpotTrades => "binance_spot_trades",
            ArchiveType::BinanceFuturesTrades => "binance_futures_trades",
            ArchiveType::BinanceBookDepth => "binance_book_depth",
            ArchiveType::BinanceMetrics => "binance_metrics",
        }
    }

    pub fn targeted_assets(self) -> &'static [AssetType] {
        match self {
            ArchiveType::BinanceSpotTrades => &[AssetType::SpotPrice, AssetType::SpotVolume],
            ArchiveType::BinanceFuturesTrades => {
                &[AssetType::FuturesPrice, AssetType::FuturesVolume]
            }
            ArchiveType::BinanceBookDepth => &[
                AssetType::BookDepthM5,
                AssetType::BookDepthM4,
                AssetType::BookDepthM3,
                AssetType::BookDepthM2,
                AssetType::BookDepthM1,
                AssetType::BookDepthP1,
                AssetType::BookDepthP2,
                AssetType::BookDepthP3,
                AssetType::BookDepthP4,
                AssetType::BookDepthP5,
            ],
            ArchiveType::BinanceMetrics => &[
                AssetType::MetricSumOpenInterest,
                AssetType::MetricCountTopTraderLongShortRatio,
                AssetType::MetricSumTopTraderLongShortRatio,
                AssetType::MetricCountLongShortRatio,
                AssetType::MetricSumTakerLongShortVolRatio,
            ],
        }
    }

    /// Archive an asset is extracted from, if any.
    pub fn producing(asset: AssetType) -> Option<ArchiveType> {
        ArchiveType::ALL
            .into_iter()
            .find(|a| a.targeted_assets().contains(&asset))
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for asset in AssetType::ALL {
            assert_eq!(asset.as_str().parse::<AssetType>().unwrap(), asset);
        }
        assert!(matches!(
            "blabla".parse::<AssetType>(),
            Err(ArchivistError::UnknownAssetType { .. })
        ));
    }

    #[test]
    fn book_depth_percentages() {
        assert_eq!(AssetType::BookDepthP2.book_depth_percent(), Some(2));
        assert_eq!(AssetType::BookDepthM3.book_depth_percent(), Some(-3));
        assert_eq!(AssetType::SpotPrice.book_depth_percent(), None);
    }

    #[test]
    fn archive_lookup() {
        assert_eq!(
            ArchiveType::producing(AssetType::SpotVolume),
            Some(ArchiveType::BinanceSpotTrades)
        );
        assert_eq!(
            ArchiveType::producing(AssetType::BookDepthM1),
            Some(ArchiveType::BinanceBookDepth)
        );
        assert_eq!(ArchiveType::producing(AssetType::CirculatingSupply), None);
        assert_eq!(ArchiveType::producing(AssetType::Rsi), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AssetType::BookDepthP1).unwrap();
        assert_eq!(json, "\"bd-p1\"");
        let back: AssetType = serde_json::from_str("\"hma\"").unwrap();
        assert_eq!(back, AssetType::Hma);
    }
}
