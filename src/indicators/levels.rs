// =============================================================================
// Support / Resistance
// =============================================================================
//
// Swing extremes over the trailing window:
//   resistance = max(high[-period..])
//   support    = min(low[-period..])
//
// "Near" a level means the last close is within 1% of it.

pub const LEVEL_PERIOD: usize = 20;
pub const NEAR_LEVEL_PCT: f64 = 0.01;

/// Support and resistance extracted from the trailing highs and lows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingLevels {
    pub support: f64,
    pub resistance: f64,
}

impl SwingLevels {
    pub fn near_resistance(&self, close: f64) -> bool {
        is_near(close, self.resistance)
    }

    pub fn near_support(&self, close: f64) -> bool {
        is_near(close, self.support)
    }
}

/// Uses up to `period` trailing bars; shorter histories use what is there.
pub fn swing_levels(highs: &[f64], lows: &[f64], period: usize) -> Option<SwingLevels> {
    if period == 0 || highs.is_empty() || lows.is_empty() {
        return None;
    }
    let recent_highs = &highs[highs.len().saturating_sub(period)..];
    let recent_lows = &lows[lows.len().saturating_sub(period)..];

    let resistance = recent_highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let support = recent_lows.iter().copied().fold(f64::INFINITY, f64::min);

    Some(SwingLevels {
        support,
        resistance,
    })
}

fn is_near(close: f64, level: f64) -> bool {
    (close - level).abs() / close < NEAR_LEVEL_PCT
}
