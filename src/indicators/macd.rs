// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
//   MACD line   = EWM(12) - EWM(26)
//   Signal line = EWM(9) of the MACD line
//   Histogram   = MACD line - Signal line
//
// All three averages are bias-adjusted (see `ema::calculate_ewm_adjusted`).
//
// The read is momentum-confirmed: bullish requires the MACD line above the
// signal line AND the histogram rising versus the previous bar.  A plain
// crossover with a shrinking histogram is bearish.
// =============================================================================

use super::ema::calculate_ewm_adjusted;
use super::Direction;

const FAST_SPAN: usize = 12;
const SLOW_SPAN: usize = 26;
const SIGNAL_SPAN: usize = 9;

/// Latest MACD readings.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_histogram: f64,
    pub direction: Direction,
}

/// Full MACD line, signal line and histogram series (index-aligned with `closes`).
pub fn calculate_macd_series(closes: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let fast = calculate_ewm_adjusted(closes, FAST_SPAN);
    let slow = calculate_ewm_adjusted(closes, SLOW_SPAN);
    let line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = calculate_ewm_adjusted(&line, SIGNAL_SPAN);
    let histogram: Vec<f64> = line.iter().zip(signal.iter()).map(|(l, s)| l - s).collect();
    (line, signal, histogram)
}

/// Compute the latest MACD state.
///
/// Returns `None` with fewer than two closes (no previous histogram bar).
pub fn calculate_macd(closes: &[f64]) -> Option<MacdResult> {
    if closes.len() < 2 {
        return None;
    }

    let (line, signal, histogram) = calculate_macd_series(closes);
    if histogram.len() < 2 {
        return None;
    }

    let line_last = *line.last()?;
    let signal_last = *signal.last()?;
    let hist_last = histogram[histogram.len() - 1];
    let hist_prev = histogram[histogram.len() - 2];

    let bullish = line_last > signal_last && hist_last > hist_prev;

    Some(MacdResult {
        line: line_last,
        signal: signal_last,
        histogram: hist_last,
        prev_histogram: hist_prev,
        direction: Direction::from_bullish(bullish),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometric(n: usize, start: f64, growth: f64) -> Vec<f64> {
        (0..n).map(|i| start * growth.powi(i as i32)).collect()
    }

    #[test]
    fn macd_insufficient_data() {
        assert!(calculate_macd(&[]).is_none());
        assert!(calculate_macd(&[1.0]).is_none());
    }

    #[test]
    fn macd_series_are_aligned() {
        let closes = geometric(40, 100.0, 1.01);
        let (line, signal, hist) = calculate_macd_series(&closes);
        assert_eq!(line.len(), 40);
        assert_eq!(signal.len(), 40);
        assert_eq!(hist.len(), 40);
        // First bar: every average equals the first close.
        assert_eq!(line[0], 0.0);
        assert_eq!(hist[0], 0.0);
    }

    #[test]
    fn macd_bullish_on_accelerating_rise() {
        let closes = geometric(120, 100.0, 1.005);
        let macd = calculate_macd(&closes).unwrap();
        assert!(macd.line > macd.signal);
        assert!(macd.histogram > macd.prev_histogram);
        assert_eq!(macd.direction, Direction::Bullish);
    }

    #[test]
    fn macd_bearish_on_steady_fall() {
        let closes: Vec<f64> = (81..=200).rev().map(|x| x as f64).collect();
        let macd = calculate_macd(&closes).unwrap();
        assert!(macd.line < macd.signal);
        assert_eq!(macd.direction, Direction::Bearish);
    }

    #[test]
    fn macd_flat_series_is_bearish() {
        let macd = calculate_macd(&[50.0; 40]).unwrap();
        assert!(macd.line.abs() < 1e-9);
        assert!(macd.signal.abs() < 1e-9);
        assert_eq!(macd.direction, Direction::Bearish);
    }

    #[test]
    fn macd_crossover_without_momentum_is_bearish() {
        // A constant-slope rise: the MACD line converges to a fixed spread,
        // stays above its signal, but the histogram is already shrinking.
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let macd = calculate_macd(&closes).unwrap();
        assert!(macd.line > macd.signal);
        assert!(macd.histogram < macd.prev_histogram);
        assert_eq!(macd.direction, Direction::Bearish);
    }
}
