//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - Seed: simple mean of gains/losses over the first `period` changes
//! - Then: avg = (prev_avg * (period - 1) + current) / period
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), or 100 when avg_loss == 0.
//! The first call only records the close, so `period + 1` values are needed
//! before anything but the `-1` sentinel comes out.

use crate::domain::indicator::WARM_UP;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiState {
    pub avg_gain: f64,
    pub avg_loss: f64,
    pub last_rsi: f64,
    #[serde(rename = "prev_close")]
    pub last_close: f64,
    pub pos: i64,
}

impl RsiState {
    pub fn next(&mut self, value: f64, period: i64) -> f64 {
        let last_close = std::mem::replace(&mut self.last_close, value);
        if last_close <= 0.0 {
            return WARM_UP;
        }

        let change = value - last_close;
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        self.pos += 1;
        let n = period as f64;

        if self.pos <= period {
            self.avg_gain += gain;
            self.avg_loss += loss;
            if self.pos < period {
                return WARM_UP;
            }
            self.avg_gain /= n;
            self.avg_loss /= n;
        } else {
            self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
            self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
        }

        self.last_rsi = if self.avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + self.avg_gain / self.avg_loss)
        };
        self.last_rsi
    }
}
