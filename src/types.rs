// =============================================================================
// Shared types used across the trend engine
// =============================================================================

use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// A single OHLCV observation as handed over by a bar source.
///
/// `time` is already rendered at the series resolution (`YYYY-MM-DD` for daily
/// bars, `YYYY-MM-DD HH:MM` for intraday bars), which keeps lexical and
/// chronological order identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Bar resolution selected by a lookback class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Minute1,
    Minute30,
    Hour1,
    Day1,
}

impl Resolution {
    /// Interval string understood by the chart provider.
    pub fn interval(self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Day1 => "1d",
        }
    }

    /// `chrono` format used to render bar timestamps.
    pub fn timestamp_format(self) -> &'static str {
        match self {
            Self::Day1 => "%Y-%m-%d",
            Self::Minute1 | Self::Minute30 | Self::Hour1 => "%Y-%m-%d %H:%M",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Minute1 => "1-minute bars",
            Self::Minute30 => "30-minute bars",
            Self::Hour1 => "1-hour bars",
            Self::Day1 => "1-day bars",
        }
    }
}

/// Named analysis window. Selects both the fetch window and the bar resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackClass {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "200d")]
    Long,
}

impl LookbackClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Long => "200d",
        }
    }

    pub fn resolution(self) -> Resolution {
        match self {
            Self::Week => Resolution::Hour1,
            Self::Month => Resolution::Minute30,
            Self::Long => Resolution::Day1,
        }
    }

    pub fn window_days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Long => 200,
        }
    }

    /// Label reported as `analysis_period` in a verdict.
    pub fn label(self) -> String {
        format!("Last {}", self.as_str())
    }

    /// Human description of the window, e.g. "Last 30 days (30-minute bars)".
    pub fn description(self) -> String {
        format!(
            "Last {} days ({})",
            self.window_days(),
            self.resolution().describe()
        )
    }
}

impl Default for LookbackClass {
    fn default() -> Self {
        Self::Week
    }
}

impl std::fmt::Display for LookbackClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookbackClass {
    type Err = Diagnostic;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "200d" => Ok(Self::Long),
            _ => Err(Diagnostic::Config),
        }
    }
}

/// Chronologically ordered bars for one symbol and lookback class.
///
/// Invariants: non-empty, timestamps strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    symbol: String,
    lookback: LookbackClass,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from bars that are already in order.
    pub fn new(symbol: impl Into<String>, lookback: LookbackClass, bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            bail!("bar series must contain at least one bar");
        }
        if let Some(w) = bars.windows(2).find(|w| w[0].time >= w[1].time) {
            bail!(
                "bar timestamps must be strictly increasing ({} followed by {})",
                w[0].time,
                w[1].time
            );
        }
        Ok(Self {
            symbol: symbol.into(),
            lookback,
            bars,
        })
    }

    /// Sort by timestamp and drop duplicate timestamps, keeping the last one seen.
    pub fn from_unsorted(
        symbol: impl Into<String>,
        lookback: LookbackClass,
        bars: Vec<Bar>,
    ) -> Result<Self> {
        Self::new(symbol, lookback, order_bars(bars))
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn lookback(&self) -> LookbackClass {
        self.lookback
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    pub fn last_close(&self) -> f64 {
        // Non-empty by construction.
        self.bars.last().map_or(f64::NAN, |b| b.close)
    }
}

/// Sort bars by timestamp, keeping only the last bar seen for each timestamp.
pub fn order_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    // Stable sort keeps arrival order within a timestamp.
    bars.sort_by(|a, b| a.time.cmp(&b.time));
    let mut ordered: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match ordered.last_mut() {
            Some(last) if last.time == bar.time => *last = bar,
            _ => ordered.push(bar),
        }
    }
    ordered
}
