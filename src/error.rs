// =============================================================================
// Diagnostics — structured, non-fatal outcomes of a trend analysis
// =============================================================================
//
// Every failure path of `TrendEngine::analyze` ends in one of these variants.
// None of them terminate the caller; they are serialised next to the symbol
// under either `error` or `warning`.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// The requested lookback class is not one of 7d / 30d / 200d.
    #[error("period must be '7d', '30d', or '200d'")]
    Config,

    /// The bar source had nothing (or failed) for this symbol.
    #[error("No price data found for {symbol}: {reason}")]
    NoData { symbol: String, reason: String },

    /// Too few bars to trust rolling-window indicators.
    #[error("Low bar count, accuracy reduced")]
    LowConfidence { symbol: String, bars: usize },

    /// Unexpected numeric fault while computing indicators.
    #[error("{message}")]
    Computation { symbol: String, message: String },
}

impl Diagnostic {
    pub fn no_data(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoData {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    pub fn computation(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Computation {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// `LowConfidence` is reported as a warning; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::LowConfidence { .. })
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config => "config_error",
            Self::NoData { .. } => "no_data",
            Self::LowConfidence { .. } => "low_confidence",
            Self::Computation { .. } => "computation_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_text() {
        assert_eq!(
            Diagnostic::Config.to_string(),
            "period must be '7d', '30d', or '200d'"
        );
        let low = Diagnostic::LowConfidence {
            symbol: "AAPL".into(),
            bars: 12,
        };
        assert_eq!(low.to_string(), "Low bar count, accuracy reduced");
        assert!(low.is_warning());
        assert_eq!(
            Diagnostic::no_data("ZZZZ", "empty chart").to_string(),
            "No price data found for ZZZZ: empty chart"
        );
    }

    #[test]
    fn only_low_confidence_is_a_warning() {
        assert!(!Diagnostic::Config.is_warning());
        assert!(!Diagnostic::no_data("A", "x").is_warning());
        assert!(!Diagnostic::computation("A", "NaN").is_warning());
        assert_eq!(Diagnostic::computation("A", "NaN").kind(), "computation_error");
    }
}
