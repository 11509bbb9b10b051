// =============================================================================
// Trend Module
// =============================================================================
//
// Batch trend assessment over one bar series:
// - Indicator battery (EMA crossover, MACD, RSI, Bollinger, volume, levels)
// - Composite 0-100 strength score and verdict mapping
// - Verdict assembly and the typed analysis outcome

pub mod engine;
pub mod indicator_set;
pub mod scoring;
pub mod verdict;

#[cfg(test)]
pub(crate) mod fixtures;

pub use engine::TrendEngine;
pub use verdict::AnalysisOutcome;
