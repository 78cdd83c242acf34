//! Incremental moving averages over one shared state shape.
//!
//! SMA keeps a ring buffer and a running sum. EMA seeds on the first value
//! and smooths with k = 2 / (period + 1). WMA weights the ring buffer
//! 1..=period from oldest to newest. HMA combines two WMA sub-states
//! (`period / 2` and `period`) and smooths `2 * half - full` with a third
//! of length `round(sqrt(period))`.

use crate::domain::indicator::WARM_UP;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaState {
    pub sum: f64,
    pub buffer: Vec<f64>,
    pub pos: usize,
    pub count: usize,
    pub ema: f64,
    pub wma_buffer: Vec<f64>,
    /// HMA sub-states: half-period WMA, full-period WMA, sqrt-period WMA.
    pub alt_state: Vec<MaState>,
}

fn sized(buffer: &mut Vec<f64>, period: usize) {
    if buffer.len() != period {
        buffer.resize(period, 0.0);
    }
}

impl MaState {
    pub fn sma(&mut self, value: f64, period: usize) -> f64 {
        sized(&mut self.buffer, period);
        self.count += 1;

        if self.count <= period {
            self.sum += value;
            self.buffer[self.pos] = value;
            self.pos = (self.pos + 1) % period;
            if self.count < period {
                return WARM_UP;
            }
            return self.sum / period as f64;
        }

        self.sum = self.sum - self.buffer[self.pos] + value;
        self.buffer[self.pos] = value;
        self.pos = (self.pos + 1) % period;
        self.sum / period as f64
    }

    pub fn ema(&mut self, value: f64, period: usize) -> f64 {
        if self.count == 0 {
            self.ema = value;
        } else {
            let k = 2.0 / (period as f64 + 1.0);
            self.ema = value * k + self.ema * (1.0 - k);
        }
        self.count += 1;
        self.ema
    }

    pub fn wma(&mut self, value: f64, period: usize) -> f64 {
        sized(&mut self.wma_buffer, period);
        self.wma_buffer[self.pos] = value;
        self.pos = (self.pos + 1) % period;
        self.count += 1;

        if self.count < period {
            return WARM_UP;
        }

        // pos now points at the oldest value
        let weighted: f64 = (0..period)
            .map(|i| self.wma_buffer[(self.pos + i) % period] * (i + 1) as f64)
            .sum();
        weighted / (period * (period + 1) / 2) as f64
    }

    pub fn hma(&mut self, value: f64, period: usize) -> f64 {
        let half = (period / 2).max(1);
        let sqrt = hma_smoothing_period(period);

        if self.alt_state.len() != 3 {
            self.alt_state = vec![MaState::default(); 3];
        }

        let wma_half = self.alt_state[0].wma(value, half);
        let wma_full = self.alt_state[1].wma(value, period);

        self.count += 1;
        if self.count < period {
            return WARM_UP;
        }

        self.alt_state[2].wma(2.0 * wma_half - wma_full, sqrt)
    }
}

/// Length of the final WMA in an HMA of `period`.
pub fn hma_smoothing_period(period: usize) -> usize {
    ((period as f64).sqrt().round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(values: &[f64], mut f: impl FnMut(&mut MaState, f64) -> f64) -> Vec<f64> {
        let mut state = MaState::default();
        values.iter().map(|v| f(&mut state, *v)).collect()
    }

    #[test]
    fn sma_warm_up_and_slide() {
        let out = run(&[1.0, 2.0, 3.0, 4.0, 5.0], |s, v| s.sma(v, 3));
        assert_eq!(out, vec![WARM_UP, WARM_UP, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_period_one_is_identity() {
        let out = run(&[7.0, 8.5, 9.0], |s, v| s.sma(v, 1));
        assert_eq!(out, vec![7.0, 8.5, 9.0]);
    }

    #[test]
    fn ema_seeds_with_first_value() {
        let out = run(&[10.0, 20.0, 30.0], |s, v| s.ema(v, 3));
        assert_eq!(out[0], 10.0);
        assert_relative_eq!(out[1], 15.0);
        assert_relative_eq!(out[2], 22.5);
    }

    #[test]
    fn wma_weights_newest_most() {
        let out = run(&[10.0, 20.0, 30.0, 40.0], |s, v| s.wma(v, 3));
        assert_eq!(out[0], WARM_UP);
        assert_eq!(out[1], WARM_UP);
        assert_relative_eq!(out[2], (10.0 + 40.0 + 90.0) / 6.0);
        assert_relative_eq!(out[3], (20.0 + 60.0 + 120.0) / 6.0);
    }

    #[test]
    fn hma_warm_up_covers_inner_wma() {
        let values: Vec<f64> = (1..=30).map(|i| 100.0 + i as f64).collect();
        let out = run(&values, |s, v| s.hma(v, 16));
        let sentinels = out.iter().take_while(|v| **v == WARM_UP).count();
        assert_eq!(sentinels, 16 + hma_smoothing_period(16) - 2);
        assert!(out[sentinels..].iter().all(|v| *v != WARM_UP));
    }

    #[test]
    fn hma_of_constant_is_constant() {
        let out = run(&[5.0; 12], |s, v| s.hma(v, 9));
        assert_relative_eq!(*out.last().unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn hma_tracks_linear_trend_without_lag() {
        let values: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let out = run(&values, |s, v| s.hma(v, 9));
        assert_relative_eq!(*out.last().unwrap(), 39.0, epsilon = 1e-9);
    }

    #[test]
    fn smoothing_period_rounds() {
        assert_eq!(hma_smoothing_period(2), 1);
        assert_eq!(hma_smoothing_period(9), 3);
        assert_eq!(hma_smoothing_period(14), 4);
        assert_eq!(hma_smoothing_period(20), 4);
    }
}
