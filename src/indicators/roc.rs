// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price between two closes:
//   ROC = ((close - close_base) / close_base) * 100
//
// The trend engine uses the whole-window form: first close to last close.

/// Percentage change from `from` to `to`; `None` when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Percentage change between the first and last close of the window.
pub fn window_change(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let last = *closes.last()?;
    percent_change(first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roc_basic() {
        // From 1 to 15: ROC = (15-1)/1 * 100 = 1400%
        assert!((percent_change(1.0, 15.0).unwrap() - 1400.0).abs() < 1e-10);
    }

    #[test]
    fn window_change_first_to_last() {
        let change = window_change(&[200.0, 150.0, 220.0]).unwrap();
        assert!((change - 10.0).abs() < 1e-12);
        let down = window_change(&[200.0, 190.0]).unwrap();
        assert!((down + 5.0).abs() < 1e-12);
    }

    #[test]
    fn window_change_zero_base() {
        assert!(window_change(&[0.0, 5.0]).is_none());
        assert!(window_change(&[]).is_none());
    }
}
