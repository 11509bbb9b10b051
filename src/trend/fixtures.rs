// Synthetic bar series shared by the trend and api tests.

use chrono::{Duration, NaiveDate};

use crate::types::{Bar, BarSeries, LookbackClass};

pub const FIXTURE_VOLUME: u64 = 1_000;

/// Daily bars with `open == close`, a 0.5% high/low envelope and flat volume.
pub fn series_from_closes(closes: &[f64]) -> BarSeries {
    let volumes = vec![FIXTURE_VOLUME; closes.len()];
    series_with_volumes(closes, &volumes)
}

pub fn series_with_volumes(closes: &[f64], volumes: &[u64]) -> BarSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let bars = closes
        .iter()
        .zip(volumes.iter())
        .enumerate()
        .map(|(i, (&close, &volume))| Bar {
            time: (start + Duration::days(i as i64))
                .format("%Y-%m-%d")
                .to_string(),
            open: close,
            high: close * 1.005,
            low: close * 0.995,
            close,
            volume,
        })
        .collect();
    BarSeries::new("TEST", LookbackClass::Long, bars).expect("fixture bars are ordered")
}

pub fn geometric_series(n: usize, start: f64, growth: f64) -> BarSeries {
    let closes: Vec<f64> = (0..n).map(|i| start * growth.powi(i as i32)).collect();
    series_from_closes(&closes)
}

pub fn constant_series(n: usize, price: f64) -> BarSeries {
    series_from_closes(&vec![price; n])
}
