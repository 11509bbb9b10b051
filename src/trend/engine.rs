// =============================================================================
// Trend Engine — guards, bar retrieval and verdict assembly
// =============================================================================
//
// Pipeline for one call:
//   1. Validate the lookback class (no fetch on failure).
//   2. Fetch bars from the configured source; nothing found -> NoData.
//   3. Fewer than MIN_BARS bars -> LowConfidence warning, nothing computed.
//   4. Compute the indicator set, score it, assemble the verdict.
//
// The engine keeps no per-call state; one instance can serve concurrent calls
// for any number of symbols.
// =============================================================================

use tracing::{debug, info, warn};

use super::indicator_set::IndicatorSet;
use super::scoring::{ScoreInputs, TrendScorer};
use super::verdict::{AnalysisOutcome, TrendVerdict};
use crate::error::Diagnostic;
use crate::market_data::BarSource;
use crate::types::{BarSeries, LookbackClass};

/// Minimum bars before the rolling indicators are trusted.
pub const MIN_BARS: usize = 30;

pub struct TrendEngine<S> {
    source: S,
    scorer: TrendScorer,
}

impl<S: BarSource> TrendEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            scorer: TrendScorer::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Analyse `symbol` over the window named by `period` ("7d", "30d", "200d").
    pub async fn analyze(&self, symbol: &str, period: &str) -> AnalysisOutcome {
        let symbol = symbol.trim().to_uppercase();

        let lookback = match period.parse::<LookbackClass>() {
            Ok(lookback) => lookback,
            Err(diagnostic) => {
                warn!(symbol = %symbol, period, "rejected unknown lookback class");
                return AnalysisOutcome::diagnostic(symbol, diagnostic);
            }
        };

        self.analyze_lookback(&symbol, lookback).await
    }

    /// Same as [`analyze`](Self::analyze) with an already-validated window.
    pub async fn analyze_lookback(&self, symbol: &str, lookback: LookbackClass) -> AnalysisOutcome {
        let symbol = symbol.trim().to_uppercase();

        let series = match self.source.fetch(&symbol, lookback).await {
            Ok(Some(series)) => series,
            Ok(None) => {
                warn!(symbol = %symbol, period = %lookback, "bar source returned no data");
                return AnalysisOutcome::diagnostic(
                    symbol.clone(),
                    Diagnostic::no_data(symbol, "no bars returned"),
                );
            }
            Err(e) => {
                warn!(symbol = %symbol, period = %lookback, error = %e, "bar source failed");
                return AnalysisOutcome::diagnostic(
                    symbol.clone(),
                    Diagnostic::no_data(symbol, format!("{e:#}")),
                );
            }
        };

        match self.evaluate(&symbol, lookback, &series) {
            Ok(verdict) => {
                info!(
                    symbol = %symbol,
                    period = %lookback,
                    verdict = %verdict.trend_verdict,
                    score = verdict.trend_strength_score,
                    "trend analysis complete"
                );
                AnalysisOutcome::Verdict(verdict)
            }
            Err(diagnostic) => {
                warn!(symbol = %symbol, period = %lookback, diagnostic = %diagnostic, "trend analysis diagnostic");
                AnalysisOutcome::diagnostic(symbol, diagnostic)
            }
        }
    }
}

impl<S> TrendEngine<S> {
    /// Pure evaluation of an already-fetched series, labelled with `symbol`
    /// and `lookback`. Never touches the bar source.
    pub fn evaluate(
        &self,
        symbol: &str,
        lookback: LookbackClass,
        series: &BarSeries,
    ) -> Result<TrendVerdict, Diagnostic> {
        if series.len() < MIN_BARS {
            return Err(Diagnostic::LowConfidence {
                symbol: symbol.to_string(),
                bars: series.len(),
            });
        }

        let set = IndicatorSet::compute(series)
            .map_err(|e| Diagnostic::computation(symbol, format!("{e:#}")))?;

        let breakdown = self.scorer.score(&ScoreInputs::from(&set));
        debug!(
            symbol,
            raw_score = breakdown.raw_score,
            score = breakdown.score,
            contributions = ?breakdown.contributions,
            "trend score computed"
        );

        Ok(TrendVerdict::assemble(symbol, lookback, &set, &breakdown))
    }
}
