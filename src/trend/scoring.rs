// =============================================================================
// Trend Strength Scorer — additive 0-100 composite score
// =============================================================================
//
// Starts at 50; every condition below contributes independently, the sum is
// clamped to [0, 100]:
//
//   price change     > +3%  +15   < -3%  -15   else 0
//   EMA 9/21         bullish +15 / bearish -15
//   MACD (confirmed) bullish +15 / bearish -15
//   RSI(14)          > 55 +10   < 45 -10   else 0
//   close vs SMA20   above +10 / not above -10
//   volume ratio     > 1.3 +8 / else -8
//
// The clamped score maps to a verdict, high -> low, first match wins.
// =============================================================================

use serde::Serialize;

use super::indicator_set::IndicatorSet;
use crate::indicators::Direction;

/// The numeric facts the score is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInputs {
    pub pct_change: f64,
    pub ema_trend: Direction,
    pub macd: Direction,
    pub rsi: f64,
    pub close_above_sma: bool,
    pub volume_ratio: f64,
}

impl From<&IndicatorSet> for ScoreInputs {
    fn from(set: &IndicatorSet) -> Self {
        Self {
            pct_change: set.pct_change,
            ema_trend: set.ema_trend,
            macd: set.macd.direction,
            rsi: set.rsi,
            close_above_sma: set.close_above_sma(),
            volume_ratio: set.volume_ratio,
        }
    }
}

/// Point values and thresholds of the score table.
#[derive(Debug, Clone)]
struct ScoreWeights {
    base: i32,
    price_change: i32,
    price_change_pct: f64,
    ema: i32,
    macd: i32,
    rsi: i32,
    rsi_bullish_above: f64,
    rsi_bearish_below: f64,
    sma: i32,
    volume: i32,
    volume_ratio_above: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: 50,
            price_change: 15,
            price_change_pct: 3.0,
            ema: 15,
            macd: 15,
            rsi: 10,
            rsi_bullish_above: 55.0,
            rsi_bearish_below: 45.0,
            sma: 10,
            volume: 8,
            volume_ratio_above: 1.3,
        }
    }
}

/// The contribution of a single condition to the final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreContribution {
    pub name: &'static str,
    pub delta: i32,
}

/// Result of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub raw_score: i32,
    pub score: u8,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub contributions: Vec<ScoreContribution>,
}

/// Final directional label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "VERY BULLISH")]
    VeryBullish,
    #[serde(rename = "BULLISH")]
    Bullish,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "BEARISH")]
    Bearish,
    #[serde(rename = "VERY BEARISH")]
    VeryBearish,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryBullish => write!(f, "VERY BULLISH"),
            Self::Bullish => write!(f, "BULLISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::VeryBearish => write!(f, "VERY BEARISH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    #[serde(rename = "Moderate-High")]
    ModerateHigh,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::ModerateHigh => write!(f, "Moderate-High"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Map a clamped score to its verdict and confidence.
pub fn classify(score: u8) -> (Verdict, Confidence) {
    match score {
        75..=u8::MAX => (Verdict::VeryBullish, Confidence::High),
        60..=74 => (Verdict::Bullish, Confidence::ModerateHigh),
        40..=59 => (Verdict::Neutral, Confidence::Low),
        25..=39 => (Verdict::Bearish, Confidence::ModerateHigh),
        _ => (Verdict::VeryBearish, Confidence::High),
    }
}

/// The main scoring engine.
#[derive(Debug, Clone, Default)]
pub struct TrendScorer {
    weights: ScoreWeights,
}

impl TrendScorer {
    pub fn score(&self, inputs: &ScoreInputs) -> ScoreBreakdown {
        let w = &self.weights;

        let price_delta = if inputs.pct_change > w.price_change_pct {
            w.price_change
        } else if inputs.pct_change < -w.price_change_pct {
            -w.price_change
        } else {
            0
        };
        let rsi_delta = if inputs.rsi > w.rsi_bullish_above {
            w.rsi
        } else if inputs.rsi < w.rsi_bearish_below {
            -w.rsi
        } else {
            0
        };

        let contributions = vec![
            ScoreContribution {
                name: "price_change",
                delta: price_delta,
            },
            ScoreContribution {
                name: "ema_9_21",
                delta: signed(inputs.ema_trend.is_bullish(), w.ema),
            },
            ScoreContribution {
                name: "macd",
                delta: signed(inputs.macd.is_bullish(), w.macd),
            },
            ScoreContribution {
                name: "rsi_14",
                delta: rsi_delta,
            },
            ScoreContribution {
                name: "close_vs_sma_20",
                delta: signed(inputs.close_above_sma, w.sma),
            },
            ScoreContribution {
                name: "volume_ratio",
                delta: signed(inputs.volume_ratio > w.volume_ratio_above, w.volume),
            },
        ];

        let raw_score = w.base + contributions.iter().map(|c| c.delta).sum::<i32>();
        // Clamped to 0..=100, so the narrowing cannot truncate.
        let score = raw_score.clamp(0, 100) as u8;
        let (verdict, confidence) = classify(score);

        ScoreBreakdown {
            raw_score,
            score,
            verdict,
            confidence,
            contributions,
        }
    }
}

fn signed(positive: bool, points: i32) -> i32 {
    if positive {
        points
    } else {
        -points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        pct_change: f64,
        ema: Direction,
        macd: Direction,
        rsi: f64,
        above_sma: bool,
        volume_ratio: f64,
    ) -> ScoreInputs {
        ScoreInputs {
            pct_change,
            ema_trend: ema,
            macd,
            rsi,
            close_above_sma: above_sma,
            volume_ratio,
        }
    }

    #[test]
    fn all_bullish_clamps_to_100() {
        // 50 + 15 + 15 + 15 + 10 + 10 + 8 = 123
        let result = TrendScorer::default().score(&inputs(
            10.0,
            Direction::Bullish,
            Direction::Bullish,
            60.0,
            true,
            1.4,
        ));
        assert_eq!(result.raw_score, 123);
        assert_eq!(result.score, 100);
        assert_eq!(result.verdict, Verdict::VeryBullish);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn all_bearish_clamps_to_zero() {
        let result = TrendScorer::default().score(&inputs(
            -10.0,
            Direction::Bearish,
            Direction::Bearish,
            30.0,
            false,
            0.5,
        ));
        assert_eq!(result.raw_score, -23);
        assert_eq!(result.score, 0);
        assert_eq!(result.verdict, Verdict::VeryBearish);
    }

    #[test]
    fn neutral_bands_contribute_zero() {
        let result = TrendScorer::default().score(&inputs(
            3.0,
            Direction::Bullish,
            Direction::Bearish,
            50.0,
            true,
            1.3,
        ));
        // 50 + 0 + 15 - 15 + 0 + 10 - 8
        assert_eq!(result.raw_score, 52);
        assert_eq!(result.verdict, Verdict::Neutral);
        assert_eq!(result.confidence, Confidence::Low);
        let deltas: Vec<i32> = result.contributions.iter().map(|c| c.delta).collect();
        assert_eq!(deltas, vec![0, 15, -15, 0, 10, -8]);
    }

    #[test]
    fn boundaries_are_strict() {
        let scorer = TrendScorer::default();
        let at_edge = scorer.score(&inputs(
            -3.0,
            Direction::Bearish,
            Direction::Bearish,
            45.0,
            false,
            1.3,
        ));
        assert_eq!(at_edge.contributions[0].delta, 0);
        assert_eq!(at_edge.contributions[3].delta, 0);
        let past_edge = scorer.score(&inputs(
            -3.01,
            Direction::Bearish,
            Direction::Bearish,
            44.99,
            false,
            1.31,
        ));
        assert_eq!(past_edge.contributions[0].delta, -15);
        assert_eq!(past_edge.contributions[3].delta, -10);
        assert_eq!(past_edge.contributions[5].delta, 8);
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(100), (Verdict::VeryBullish, Confidence::High));
        assert_eq!(classify(75), (Verdict::VeryBullish, Confidence::High));
        assert_eq!(classify(74), (Verdict::Bullish, Confidence::ModerateHigh));
        assert_eq!(classify(60), (Verdict::Bullish, Confidence::ModerateHigh));
        assert_eq!(classify(59), (Verdict::Neutral, Confidence::Low));
        assert_eq!(classify(40), (Verdict::Neutral, Confidence::Low));
        assert_eq!(classify(39), (Verdict::Bearish, Confidence::ModerateHigh));
        assert_eq!(classify(25), (Verdict::Bearish, Confidence::ModerateHigh));
        assert_eq!(classify(24), (Verdict::VeryBearish, Confidence::High));
        assert_eq!(classify(0), (Verdict::VeryBearish, Confidence::High));
    }

    #[test]
    fn every_score_maps_to_exactly_one_verdict() {
        let bands: [(u8, u8, Verdict); 5] = [
            (75, 100, Verdict::VeryBullish),
            (60, 74, Verdict::Bullish),
            (40, 59, Verdict::Neutral),
            (25, 39, Verdict::Bearish),
            (0, 24, Verdict::VeryBearish),
        ];
        for score in 0..=100u8 {
            let (verdict, _) = classify(score);
            let matching: Vec<_> = bands
                .iter()
                .filter(|(lo, hi, _)| (*lo..=*hi).contains(&score))
                .collect();
            assert_eq!(matching.len(), 1, "score {score}");
            assert_eq!(matching[0].2, verdict, "score {score}");
        }
    }

    #[test]
    fn labels_render_as_wire_text() {
        assert_eq!(
            serde_json::to_string(&Verdict::VeryBearish).unwrap(),
            "\"VERY BEARISH\""
        );
        assert_eq!(
            serde_json::to_string(&Confidence::ModerateHigh).unwrap(),
            "\"Moderate-High\""
        );
        assert_eq!(Verdict::Bullish.to_string(), "BULLISH");
        assert_eq!(Confidence::Low.to_string(), "Low");
    }
}
