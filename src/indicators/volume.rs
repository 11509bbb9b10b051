// =============================================================================
// Volume Trend
// =============================================================================
//
// Compares the latest bar's volume with the rolling mean of the last `period`
// bars (the latest bar included):
//
//   ratio = volume_last / mean(volume[-period..])
//
// A zero or undefined mean yields a neutral ratio of 1.0.

pub const VOLUME_PERIOD: usize = 20;
pub const SPIKE_RATIO: f64 = 1.5;

/// Latest-volume-to-average ratio.
pub fn volume_ratio(volumes: &[f64], period: usize) -> f64 {
    let last = match volumes.last() {
        Some(&v) => v,
        None => return 1.0,
    };
    match super::trailing_mean(volumes, period) {
        Some(mean) if mean > 0.0 => last / mean,
        _ => 1.0,
    }
}

/// True when the latest volume is more than 1.5x its rolling average.
pub fn is_volume_spike(ratio: f64) -> bool {
    ratio > SPIKE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_against_rolling_mean() {
        let mut volumes = vec![100.0; 19];
        volumes.push(290.0);
        // mean = (19*100 + 290) / 20 = 109.5
        let ratio = volume_ratio(&volumes, 20);
        assert!((ratio - 290.0 / 109.5).abs() < 1e-12);
        assert!(is_volume_spike(ratio));
    }

    #[test]
    fn zero_mean_is_neutral() {
        assert_eq!(volume_ratio(&[0.0; 25], 20), 1.0);
    }

    #[test]
    fn short_history_is_neutral() {
        assert_eq!(volume_ratio(&[5.0, 10.0], 20), 1.0);
        assert_eq!(volume_ratio(&[], 20), 1.0);
    }

    #[test]
    fn spike_is_strict() {
        assert!(!is_volume_spike(1.5));
        assert!(is_volume_spike(1.51));
    }
}
