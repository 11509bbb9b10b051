// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// Step 1 — Per-bar deltas from consecutive closes.
// Step 2 — Split into gains (positive deltas) and losses (magnitude of
//          negative deltas).
// Step 3 — Average gain / average loss are the SIMPLE mean of the last
//          `period` gains / losses (no Wilder smoothing).
// Step 4 — RS  = avg_gain / avg_loss, with RS = 100 when avg_loss == 0
//          RSI = 100 - 100 / (1 + RS)   when RS > 0
//          RSI = 0                      when RS <= 0 and avg_gain == 0
//          RSI = 100                    otherwise (only reachable with NaN)
//
// Consequence of the avg_loss == 0 convention: an all-gain or completely
// flat window reads 100 - 100/101 (~99.01), not 100.
// =============================================================================

/// Default look-back used by the trend engine.
pub const RSI_PERIOD: usize = 14;

/// Rolling average gain and loss over the last `period` deltas.
///
/// Returns `None` when fewer than `period + 1` closes are available.
pub fn average_gain_loss(closes: &[f64], period: usize) -> Option<(f64, f64)> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len() - period..];

    let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else if d < 0.0 {
            (g, l - d)
        } else {
            (g, l)
        }
    });

    let period_f = period as f64;
    Some((sum_gain / period_f, sum_loss / period_f))
}

/// Convert average gain / loss into an RSI value.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss != 0.0 {
        avg_gain / avg_loss
    } else {
        100.0
    };

    if rs > 0.0 {
        100.0 - 100.0 / (1.0 + rs)
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0
    }
}

/// Most recent RSI over `period` bars.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    let (avg_gain, avg_loss) = average_gain_loss(closes, period)?;
    Some(rsi_from_averages(avg_gain, avg_loss))
}
