// =============================================================================
// Indicator Set — every number the verdict is derived from
// =============================================================================
//
// Computed in a fixed order from the close, high, low and volume arrays of a
// bar series (oldest -> newest).  Purely derived and recomputed on every call.
// =============================================================================

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use crate::indicators::bollinger::{calculate_bollinger, BollingerResult, BB_NUM_STD, BB_PERIOD};
use crate::indicators::ema::ema_crossover;
use crate::indicators::levels::{swing_levels, SwingLevels, LEVEL_PERIOD};
use crate::indicators::macd::{calculate_macd, MacdResult};
use crate::indicators::roc::window_change;
use crate::indicators::rsi::{calculate_rsi, RSI_PERIOD};
use crate::indicators::volume::{volume_ratio, VOLUME_PERIOD};
use crate::indicators::Direction;
use crate::types::BarSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub last_close: f64,
    pub pct_change: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub ema_trend: Direction,
    pub macd: MacdResult,
    pub rsi: f64,
    pub bollinger: BollingerResult,
    pub volume_ratio: f64,
    pub levels: SwingLevels,
}

impl IndicatorSet {
    /// Run the indicator battery over `series`.
    ///
    /// Fails when a bar carries a non-finite field, when the window is too
    /// short for a rolling indicator, when the first close is zero, or when any
    /// derived value is not finite.
    pub fn compute(series: &BarSeries) -> Result<Self> {
        ensure_finite_bars(series)?;

        let closes = series.closes();
        let volumes = series.volumes();
        let last_close = series.last_close();

        let pct_change = window_change(&closes)
            .ok_or_else(|| anyhow!("price change undefined: first close is zero"))?;

        let (ema_fast, ema_slow, ema_trend) =
            ema_crossover(&closes).ok_or_else(|| anyhow!("EMA(9/21) produced no value"))?;

        let macd = calculate_macd(&closes)
            .ok_or_else(|| anyhow!("MACD needs at least two closes"))?;

        let rsi = calculate_rsi(&closes, RSI_PERIOD)
            .ok_or_else(|| anyhow!("RSI({RSI_PERIOD}) needs at least {} closes", RSI_PERIOD + 1))?;

        let bollinger = calculate_bollinger(&closes, BB_PERIOD, BB_NUM_STD)
            .ok_or_else(|| anyhow!("Bollinger({BB_PERIOD}) needs at least {BB_PERIOD} closes"))?;

        let volume_ratio = volume_ratio(&volumes, VOLUME_PERIOD);

        let levels = swing_levels(&series.highs(), &series.lows(), LEVEL_PERIOD)
            .ok_or_else(|| anyhow!("support/resistance need at least one bar"))?;

        let set = Self {
            last_close,
            pct_change,
            ema_fast,
            ema_slow,
            ema_trend,
            macd,
            rsi,
            bollinger,
            volume_ratio,
            levels,
        };
        set.ensure_finite()?;

        debug!(
            symbol = series.symbol(),
            pct_change = format!("{:.2}", set.pct_change),
            ema_trend = %set.ema_trend,
            macd = %set.macd.direction,
            rsi = format!("{:.2}", set.rsi),
            bb_position = format!("{:.3}", set.bollinger.position),
            volume_ratio = format!("{:.2}", set.volume_ratio),
            "indicator set computed"
        );

        Ok(set)
    }

    /// Reject NaN / infinite values before they reach the scorer.
    fn ensure_finite(&self) -> Result<()> {
        let checks = [
            ("current_price", self.last_close),
            ("price_change_percent", self.pct_change),
            ("ema_9", self.ema_fast),
            ("ema_21", self.ema_slow),
            ("macd_line", self.macd.line),
            ("macd_signal", self.macd.signal),
            ("macd_histogram", self.macd.histogram),
            ("rsi_14", self.rsi),
            ("sma_20", self.bollinger.middle),
            ("std_20", self.bollinger.std_dev),
            ("bb_position", self.bollinger.position),
            ("volume_ratio", self.volume_ratio),
            ("resistance", self.levels.resistance),
            ("support", self.levels.support),
        ];
        for (name, value) in checks {
            if !value.is_finite() {
                bail!("non-finite indicator value for {name}: {value}");
            }
        }
        Ok(())
    }

    pub fn close_above_sma(&self) -> bool {
        self.last_close > self.bollinger.middle
    }
}

/// Every rolling indicator reads the whole history, so a single bad bar
/// anywhere in the window invalidates the set.
fn ensure_finite_bars(series: &BarSeries) -> Result<()> {
    for bar in series.bars() {
        let fields = [
            ("close", bar.close),
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
        ];
        if let Some((name, value)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            bail!("non-finite {name} at {}: {value}", bar.time);
        }
    }
    Ok(())
}
