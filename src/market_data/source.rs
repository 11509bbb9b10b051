// =============================================================================
// Bar Source — contract between market-data adapters and the trend engine
// =============================================================================
//
// An adapter owns all network I/O and row validation.  It must hand back bars
// in ascending time order with no missing numeric fields, or report that it
// has nothing.
// =============================================================================

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::trend::verdict::round_dp;
use crate::types::{Bar, BarSeries, LookbackClass, Resolution};

/// Number of candles in a latest-candles snapshot.
pub const LATEST_CANDLES: usize = 10;

#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch the bars for `symbol` over `lookback`.
    ///
    /// `Ok(None)` means the provider had no usable bars for the symbol;
    /// `Err` is reserved for transport or decoding failures.
    async fn fetch(&self, symbol: &str, lookback: LookbackClass) -> Result<Option<BarSeries>>;

    /// The most recent `count` candles at the finest resolution available.
    ///
    /// Sources without a dedicated intraday feed fall back to the tail of the
    /// 7d window.
    async fn latest(&self, symbol: &str, count: usize) -> Result<Option<LatestCandles>> {
        let series = self.fetch(symbol, LookbackClass::Week).await?;
        Ok(series.and_then(|s| {
            LatestCandles::from_bars(s.symbol(), s.lookback().resolution(), s.bars(), count)
        }))
    }
}

#[async_trait]
impl<T: BarSource + ?Sized> BarSource for Arc<T> {
    async fn fetch(&self, symbol: &str, lookback: LookbackClass) -> Result<Option<BarSeries>> {
        (**self).fetch(symbol, lookback).await
    }

    async fn latest(&self, symbol: &str, count: usize) -> Result<Option<LatestCandles>> {
        (**self).latest(symbol, count).await
    }
}

/// Snapshot of the last few candles for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestCandles {
    pub symbol: String,
    pub current_price: f64,
    pub interval: &'static str,
    pub bars: Vec<Bar>,
}

impl LatestCandles {
    /// Keep the last `count` of `bars` (oldest first). `None` when nothing is left.
    pub fn from_bars(
        symbol: &str,
        resolution: Resolution,
        bars: &[Bar],
        count: usize,
    ) -> Option<Self> {
        let tail = &bars[bars.len().saturating_sub(count)..];
        let last = tail.last()?;
        Some(Self {
            symbol: symbol.to_string(),
            current_price: round_dp(last.close, 4),
            interval: resolution.interval(),
            bars: tail.to_vec(),
        })
    }
}

/// Raw bar payload for one symbol and window.
#[derive(Debug, Clone, Serialize)]
pub struct BarListing {
    pub symbol: String,
    pub current_price: f64,
    pub period: String,
    pub total_bars: usize,
    pub bars: Vec<Bar>,
}

impl BarListing {
    pub fn from_series(series: &BarSeries) -> Self {
        Self {
            symbol: series.symbol().to_string(),
            current_price: round_dp(series.last_close(), 4),
            period: series.lookback().description(),
            total_bars: series.len(),
            bars: series.bars().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::fixtures::series_from_closes;

    #[test]
    fn listing_reports_window_metadata() {
        let series = series_from_closes(&[10.0, 11.0, 12.123456]);
        let listing = BarListing::from_series(&series);
        assert_eq!(listing.symbol, "TEST");
        assert_eq!(listing.total_bars, 3);
        assert_eq!(listing.current_price, 12.1235);
        assert_eq!(listing.period, "Last 200 days (1-day bars)");
        assert_eq!(listing.bars[0].time, "2024-01-01");
    }

    #[test]
    fn latest_candles_keep_the_tail() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        let series = series_from_closes(&closes);
        let latest =
            LatestCandles::from_bars("TEST", Resolution::Day1, series.bars(), LATEST_CANDLES)
                .unwrap();
        assert_eq!(latest.bars.len(), 10);
        assert_eq!(latest.bars[0].close, 6.0);
        assert_eq!(latest.current_price, 15.0);
        assert_eq!(latest.interval, "1d");
    }

    #[test]
    fn latest_candles_short_and_empty_input() {
        let series = series_from_closes(&[1.0, 2.0]);
        let latest = LatestCandles::from_bars("TEST", Resolution::Minute1, series.bars(), 10)
            .unwrap();
        assert_eq!(latest.bars.len(), 2);
        assert!(LatestCandles::from_bars("TEST", Resolution::Minute1, &[], 10).is_none());
    }

    struct WeekOnly;

    #[async_trait]
    impl BarSource for WeekOnly {
        async fn fetch(&self, _symbol: &str, lookback: LookbackClass) -> Result<Option<BarSeries>> {
            assert_eq!(lookback, LookbackClass::Week);
            let closes: Vec<f64> = (1..=12).map(|x| x as f64).collect();
            Ok(Some(series_from_closes(&closes)))
        }
    }

    #[tokio::test]
    async fn default_latest_uses_week_window_tail() {
        let source: Arc<dyn BarSource> = Arc::new(WeekOnly);
        let latest = source.latest("TEST", 3).await.unwrap().unwrap();
        assert_eq!(latest.bars.len(), 3);
        assert_eq!(latest.current_price, 12.0);
        // Fixture bars are tagged 200d, so the interval follows their class.
        assert_eq!(latest.interval, "1d");
    }
}
