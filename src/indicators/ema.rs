// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
//   alpha = 2 / (span + 1)
//
// Two flavours are provided:
//
// - `calculate_ema`: recursive form seeded with the first value,
//     EMA_0 = x_0,   EMA_t = EMA_{t-1} + alpha * (x_t - EMA_{t-1})
// - `calculate_ewm_adjusted`: bias-adjusted weighted average over the whole
//   history,
//     EWM_t = sum_i (1-alpha)^i * x_{t-i} / sum_i (1-alpha)^i
//   which removes the start-up bias of the recursive form.
//
// Both return one output per input, so series stay index-aligned. A NaN input
// poisons every later output instead of being skipped.
// =============================================================================

use super::Direction;

fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Recursive EMA seeded by the first value (no bias adjustment).
///
/// Returns an empty `Vec` for empty input or `span == 0`.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    if span == 0 {
        return Vec::new();
    }

    let a = alpha(span);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(prev);

    for &x in rest {
        prev += a * (x - prev);
        result.push(prev);
    }

    result
}

/// Bias-adjusted exponentially weighted mean.
pub fn calculate_ewm_adjusted(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let decay = 1.0 - alpha(span);
    let mut result = Vec::with_capacity(values.len());
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for &x in values {
        weighted_sum = x + decay * weighted_sum;
        weight_total = 1.0 + decay * weight_total;
        result.push(weighted_sum / weight_total);
    }

    result
}

/// Latest EMA(9) / EMA(21) pair and the crossover direction.
///
/// Bullish only when EMA9 is strictly above EMA21.
pub fn ema_crossover(closes: &[f64]) -> Option<(f64, f64, Direction)> {
    let fast = *calculate_ema(closes, 9).last()?;
    let slow = *calculate_ema(closes, 21).last()?;
    Some((fast, slow, Direction::from_bullish(fast > slow)))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    // ---- calculate_ema ---------------------------------------------------

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_span_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_seeded_by_first_value() {
        let ema = calculate_ema(&[10.0, 20.0, 30.0], 3);
        // alpha = 0.5
        assert_eq!(ema.len(), 3);
        assert!((ema[0] - 10.0).abs() < 1e-12);
        assert!((ema[1] - 15.0).abs() < 1e-12);
        assert!((ema[2] - 22.5).abs() < 1e-12);
    }

    #[test]
    fn ema_constant_series_stays_constant() {
        let ema = calculate_ema(&[42.0; 50], 21);
        assert!(ema.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn ema_carries_nan_to_the_end() {
        let ema = calculate_ema(&[1.0, 2.0, f64::NAN, 4.0, 5.0], 3);
        assert_eq!(ema.len(), 5);
        assert!(ema[1].is_finite());
        assert!(ema[2..].iter().all(|v| v.is_nan()));
    }

    // ---- calculate_ewm_adjusted ------------------------------------------

    #[test]
    fn ewm_adjusted_known_values() {
        // alpha = 0.5, decay = 0.5
        let ewm = calculate_ewm_adjusted(&[10.0, 20.0, 30.0], 3);
        assert!((ewm[0] - 10.0).abs() < 1e-12);
        // (20 + 0.5*10) / 1.5
        assert!((ewm[1] - 25.0 / 1.5).abs() < 1e-12);
        // (30 + 0.5*20 + 0.25*10) / 1.75
        assert!((ewm[2] - 42.5 / 1.75).abs() < 1e-12);
    }

    #[test]
    fn ewm_adjusted_carries_nan_to_the_end() {
        let ewm = calculate_ewm_adjusted(&[1.0, f64::NAN, 3.0, 4.0], 3);
        assert_eq!(ewm.len(), 4);
        assert!(ewm[1..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ewm_adjusted_differs_from_recursive_early() {
        let values = ascending(5);
        let adjusted = calculate_ewm_adjusted(&values, 9);
        let recursive = calculate_ema(&values, 9);
        // Adjusted form tracks a rising series more closely at start-up.
        assert!(adjusted[4] > recursive[4]);
    }

    // ---- ema_crossover ---------------------------------------------------

    #[test]
    fn crossover_bullish_on_rising_series() {
        let (fast, slow, dir) = ema_crossover(&ascending(60)).unwrap();
        assert!(fast > slow);
        assert_eq!(dir, Direction::Bullish);
    }

    #[test]
    fn crossover_bearish_on_falling_series() {
        let closes: Vec<f64> = (1..=60).rev().map(|x| x as f64).collect();
        let (_, _, dir) = ema_crossover(&closes).unwrap();
        assert_eq!(dir, Direction::Bearish);
    }

    #[test]
    fn crossover_tie_resolves_bearish() {
        let (fast, slow, dir) = ema_crossover(&[100.0; 40]).unwrap();
        assert_eq!(fast, slow);
        assert_eq!(dir, Direction::Bearish);
    }

    #[test]
    fn crossover_none_on_empty() {
        assert!(ema_crossover(&[]).is_none());
    }
}
