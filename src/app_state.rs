// =============================================================================
// Application State — shared by the HTTP handlers
// =============================================================================
//
// Holds the trend engine (and through it the bar source) plus the loaded
// configuration.  Nothing here is mutated after startup, so handlers share it
// through a plain `Arc` without locks.
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::market_data::BarSource;
use crate::runtime_config::RuntimeConfig;
use crate::trend::TrendEngine;

pub type SharedSource = Arc<dyn BarSource>;

pub struct AppState {
    pub engine: TrendEngine<SharedSource>,
    pub config: RuntimeConfig,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(source: SharedSource, config: RuntimeConfig) -> Self {
        Self {
            engine: TrendEngine::new(source),
            config,
            started_at: Utc::now(),
        }
    }
}
