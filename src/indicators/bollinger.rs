// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the SAMPLE standard deviation
// (n - 1 denominator) of the window.
//
//   width    = (upper - lower) / middle
//   position = (close - lower) / (upper - lower), 0.5 when the bands collapse
//   squeeze  = width < 0.08
// =============================================================================

use serde::Serialize;

pub const BB_PERIOD: usize = 20;
pub const BB_NUM_STD: f64 = 2.0;
pub const SQUEEZE_WIDTH: f64 = 0.08;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub std_dev: f64,
    pub width: f64,
    pub position: f64,
}

impl BollingerResult {
    pub fn is_squeeze(&self) -> bool {
        self.width < SQUEEZE_WIDTH
    }

    pub fn zone(&self) -> BandZone {
        BandZone::from_position(self.position)
    }
}

/// Where the last close sits inside the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandZone {
    #[serde(rename = "near top")]
    NearTop,
    #[serde(rename = "middle")]
    Middle,
    #[serde(rename = "near bottom")]
    NearBottom,
}

impl BandZone {
    pub fn from_position(position: f64) -> Self {
        if position > 0.8 {
            Self::NearTop
        } else if position < 0.2 {
            Self::NearBottom
        } else {
            Self::Middle
        }
    }
}

impl std::fmt::Display for BandZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NearTop => write!(f, "near top"),
            Self::Middle => write!(f, "middle"),
            Self::NearBottom => write!(f, "near bottom"),
        }
    }
}

/// Sample standard deviation (ddof = 1) of the trailing `period` values.
pub fn rolling_std(values: &[f64], period: usize) -> Option<f64> {
    if period < 2 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let variance =
        window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
    Some(variance.sqrt())
}

/// Calculate Bollinger Bands over the trailing `period` closes.
///
/// Returns `None` when fewer than `period` data points are available.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerResult> {
    let middle = super::trailing_mean(closes, period)?;
    let std_dev = rolling_std(closes, period)?;
    let last = *closes.last()?;

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    let width = (upper - lower) / middle;
    let position = if upper != lower {
        (last - lower) / (upper - lower)
    } else {
        0.5
    };

    Some(BollingerResult {
        upper,
        middle,
        lower,
        std_dev,
        width,
        position,
    })
}
