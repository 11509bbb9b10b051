// =============================================================================
// Trend Verdict — the record handed back to callers
// =============================================================================
//
// Prices and levels are rounded to 4 decimals, percentages and RSI to 2, so
// repeated runs over the same bars serialise byte-for-byte identically.
// =============================================================================

use serde::{Serialize, Serializer};

use super::indicator_set::IndicatorSet;
use super::scoring::{Confidence, ScoreBreakdown, Verdict};
use crate::error::Diagnostic;
use crate::indicators::bollinger::BandZone;
use crate::indicators::volume::is_volume_spike;
use crate::indicators::Direction;
use crate::types::LookbackClass;

/// Round to `dp` decimal places, ties to even.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round_ties_even() / factor
}

fn yes_no<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "YES" } else { "NO" })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySignals {
    pub ema_9_21: Direction,
    pub macd: Direction,
    pub rsi_14: f64,
    pub bollinger_position: BandZone,
    #[serde(serialize_with = "yes_no")]
    pub bb_squeeze: bool,
    pub volume_spike: bool,
    pub near_resistance: bool,
    pub near_support: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLevels {
    pub resistance: f64,
    pub support: f64,
    pub sma_20: f64,
}

/// Structured trend assessment for one symbol and window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendVerdict {
    pub symbol: String,
    pub analysis_period: String,
    pub current_price: f64,
    pub price_change_percent: f64,
    pub trend_verdict: Verdict,
    pub confidence: Confidence,
    pub trend_strength_score: u8,
    pub key_signals: KeySignals,
    pub levels: PriceLevels,
}

impl TrendVerdict {
    pub fn assemble(
        symbol: &str,
        lookback: LookbackClass,
        set: &IndicatorSet,
        score: &ScoreBreakdown,
    ) -> Self {
        let close = set.last_close;
        Self {
            symbol: symbol.to_string(),
            analysis_period: lookback.label(),
            current_price: round_dp(close, 4),
            price_change_percent: round_dp(set.pct_change, 2),
            trend_verdict: score.verdict,
            confidence: score.confidence,
            trend_strength_score: score.score,
            key_signals: KeySignals {
                ema_9_21: set.ema_trend,
                macd: set.macd.direction,
                rsi_14: round_dp(set.rsi, 2),
                bollinger_position: set.bollinger.zone(),
                bb_squeeze: set.bollinger.is_squeeze(),
                volume_spike: is_volume_spike(set.volume_ratio),
                near_resistance: set.levels.near_resistance(close),
                near_support: set.levels.near_support(close),
            },
            levels: PriceLevels {
                resistance: round_dp(set.levels.resistance, 4),
                support: round_dp(set.levels.support, 4),
                sma_20: round_dp(set.bollinger.middle, 4),
            },
        }
    }
}

/// Either a verdict or a diagnostic; never a raw fault.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Verdict(TrendVerdict),
    Diagnostic { symbol: String, diagnostic: Diagnostic },
}

impl AnalysisOutcome {
    pub fn diagnostic(symbol: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self::Diagnostic {
            symbol: symbol.into(),
            diagnostic,
        }
    }

    pub fn verdict(&self) -> Option<&TrendVerdict> {
        match self {
            Self::Verdict(v) => Some(v),
            Self::Diagnostic { .. } => None,
        }
    }

    pub fn as_diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Verdict(_) => None,
            Self::Diagnostic { diagnostic, .. } => Some(diagnostic),
        }
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialise outcome: {e}\"}}")
        })
    }
}

/// Wire shape of a diagnostic: `{symbol, error}` or `{symbol, warning}`.
#[derive(Serialize)]
struct DiagnosticRecord<'a> {
    symbol: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Verdict(v) => v.serialize(serializer),
            Self::Diagnostic { symbol, diagnostic } => {
                let message = diagnostic.to_string();
                let (error, warning) = if diagnostic.is_warning() {
                    (None, Some(message))
                } else {
                    (Some(message), None)
                };
                DiagnosticRecord {
                    symbol,
                    error,
                    warning,
                }
                .serialize(serializer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_dp(1.23456, 4), 1.2346);
        assert_eq!(round_dp(99.00990099, 2), 99.01);
        assert_eq!(round_dp(-1.26, 1), -1.3);
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(round_dp(0.125, 2), 0.12);
        assert_eq!(round_dp(0.375, 2), 0.38);
        assert_eq!(round_dp(2.5, 0), 2.0);
        assert_eq!(round_dp(-0.625, 2), -0.62);
    }

    #[test]
    fn warning_serialises_under_warning_key() {
        let outcome = AnalysisOutcome::diagnostic(
            "AAPL",
            Diagnostic::LowConfidence {
                symbol: "AAPL".into(),
                bars: 12,
            },
        );
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"symbol": "AAPL", "warning": "Low bar count, accuracy reduced"})
        );
    }

    #[test]
    fn error_serialises_under_error_key() {
        let outcome = AnalysisOutcome::diagnostic("AAPL", Diagnostic::Config);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"symbol": "AAPL", "error": "period must be '7d', '30d', or '200d'"})
        );
        assert!(outcome.verdict().is_none());
        assert_eq!(outcome.as_diagnostic(), Some(&Diagnostic::Config));
    }
}
