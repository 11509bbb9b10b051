// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the trend
// verdict.  Functions return `Option<T>` (or an empty `Vec`) so callers are
// forced to handle insufficient-data and numerical-edge-case scenarios.

pub mod bollinger;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod volume;

use serde::Serialize;

/// Two-way directional read of a trend-following indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    /// Strict test: anything that is not `true` (ties included) is bearish.
    pub fn from_bullish(bullish: bool) -> Self {
        if bullish {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }

    pub fn is_bullish(self) -> bool {
        self == Self::Bullish
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
        }
    }
}

/// Arithmetic mean of the trailing `period` values.
///
/// Returns `None` when fewer than `period` values are available.
pub fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
