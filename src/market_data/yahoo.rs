// =============================================================================
// Yahoo Finance Chart Adapter
// =============================================================================
//
// Pulls OHLCV bars from the public v8 chart endpoint:
//   GET {base}/v8/finance/chart/{SYMBOL}?interval=..&period1=..&period2=..
//
// Rows with any missing or non-finite OHLCV field are dropped, prices are
// rounded to 4 decimals and timestamps are rendered in the exchange's local
// time at the requested resolution.
//
// Latest-candles snapshots try 1-minute bars for the current day first and
// fall back to daily bars over the last 10 days.
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::source::{BarSource, LatestCandles};
use crate::runtime_config::YahooConfig;
use crate::trend::verdict::round_dp;
use crate::types::{order_bars, Bar, BarSeries, LookbackClass, Resolution};

/// (resolution, window in days) tried in order for a latest-candles snapshot.
const LATEST_FALLBACKS: [(Resolution, i64); 2] = [(Resolution::Minute1, 1), (Resolution::Day1, 10)];

/// Yahoo Finance bar source.
#[derive(Clone)]
pub struct YahooBarSource {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooBarSource {
    pub fn new(config: &YahooConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid Yahoo base url {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Yahoo base url {} cannot carry a path", config.base_url);
        }

        let mut headers = HeaderMap::new();
        if let Ok(val) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, val);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "YahooBarSource initialised");

        Ok(Self { base_url, client })
    }

    /// `{base}/v8/finance/chart/{symbol}` with the symbol as one encoded segment.
    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Yahoo base url {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    /// Fetch and decode one chart window. Bars come back unsorted.
    async fn chart(
        &self,
        symbol: &str,
        resolution: Resolution,
        window_days: i64,
    ) -> Result<Option<Vec<Bar>>> {
        let now = Utc::now();
        let start = now - chrono::Duration::days(window_days);
        let url = self.chart_url(symbol)?;

        let resp = self
            .client
            .get(url)
            .query(&[
                ("interval", resolution.interval().to_string()),
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} request failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart response for {symbol}"))?;

        // Unknown symbols come back as 404 with a regular chart.error payload.
        match parse_chart(symbol, resolution, &body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if !status.is_success() => {
                anyhow::bail!("Yahoo chart for {symbol} returned {status}: {e:#}")
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for YahooBarSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooBarSource")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl BarSource for YahooBarSource {
    #[instrument(skip(self), name = "yahoo::fetch")]
    async fn fetch(&self, symbol: &str, lookback: LookbackClass) -> Result<Option<BarSeries>> {
        let symbol = symbol.to_uppercase();
        let Some(bars) = self
            .chart(&symbol, lookback.resolution(), lookback.window_days())
            .await?
        else {
            return Ok(None);
        };
        BarSeries::from_unsorted(symbol, lookback, bars).map(Some)
    }

    #[instrument(skip(self), name = "yahoo::latest")]
    async fn latest(&self, symbol: &str, count: usize) -> Result<Option<LatestCandles>> {
        let symbol = symbol.to_uppercase();
        for (resolution, window_days) in LATEST_FALLBACKS {
            if let Some(bars) = self.chart(&symbol, resolution, window_days).await? {
                return Ok(LatestCandles::from_bars(
                    &symbol,
                    resolution,
                    &order_bars(bars),
                    count,
                ));
            }
            info!(symbol = %symbol, interval = resolution.interval(), "no candles, trying next interval");
        }
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// Response decoding
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i32,
    #[serde(default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Wall clock of the listing exchange.
///
/// The named zone follows DST across the window; the fixed offset is only
/// the offset at request time and is used when the zone is missing or unknown.
enum ExchangeClock {
    Zone(Tz),
    Fixed(FixedOffset),
}

impl ExchangeClock {
    fn from_meta(meta: &ChartMeta) -> Result<Self> {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return Ok(Self::Zone(tz));
        }
        FixedOffset::east_opt(meta.gmtoffset)
            .map(Self::Fixed)
            .context("chart meta carries an out-of-range gmtoffset")
    }

    fn render(&self, time: DateTime<Utc>, format: &str) -> String {
        match self {
            Self::Zone(tz) => time.with_timezone(tz).format(format).to_string(),
            Self::Fixed(offset) => time.with_timezone(offset).format(format).to_string(),
        }
    }
}

fn field(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten().filter(|v| v.is_finite())
}

/// Decode a chart payload into bars, in payload order.
///
/// Provider-side "no data" answers and payloads with no valid rows map to
/// `Ok(None)`; malformed JSON is an error.
fn parse_chart(symbol: &str, resolution: Resolution, body: &str) -> Result<Option<Vec<Bar>>> {
    let response: ChartResponse =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = response.chart.error {
        warn!(symbol, code = %err.code, description = %err.description, "chart reported an error");
        return Ok(None);
    }

    let Some(result) = response.chart.result.and_then(|mut r| r.pop()) else {
        warn!(symbol, "chart response has no result");
        return Ok(None);
    };

    let Some(quote) = result.indicators.quote.first() else {
        warn!(symbol, "chart result has no quote block");
        return Ok(None);
    };

    let clock = ExchangeClock::from_meta(&result.meta)?;
    let format = resolution.timestamp_format();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let row = (
            field(&quote.open, i),
            field(&quote.high, i),
            field(&quote.low, i),
            field(&quote.close, i),
            field(&quote.volume, i).filter(|v| *v >= 0.0),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
            skipped += 1;
            continue;
        };
        let Some(time) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            skipped += 1;
            continue;
        };

        bars.push(Bar {
            time: clock.render(time, format),
            open: round_dp(open, 4),
            high: round_dp(high, 4),
            low: round_dp(low, 4),
            close: round_dp(close, 4),
            volume: volume.round() as u64,
        });
    }

    if bars.is_empty() {
        warn!(symbol, skipped, "no valid OHLCV bars after filtering");
        return Ok(None);
    }

    debug!(symbol, interval = resolution.interval(), bars = bars.len(), skipped, "chart decoded");
    Ok(Some(bars))
}
