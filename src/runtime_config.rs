// =============================================================================
// Runtime Configuration — JSON settings with serde defaults and env overrides
// =============================================================================
//
// Every field carries `#[serde(default)]` so that a partial (or empty) config
// file still loads.  Environment variables take precedence over the file.
//
// The trend engine itself holds no configuration; only the bar source and the
// service shell read these settings.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::LookbackClass;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec!["AAPL".to_string(), "MSFT".to_string(), "TSLA".to_string()]
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        .to_string()
}

// =============================================================================
// YahooConfig
// =============================================================================

/// Connection settings for the Yahoo Finance chart adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YahooConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Symbols analysed at startup.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Lookback class used when none is given.
    #[serde(default)]
    pub default_period: LookbackClass,

    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub yahoo: YahooConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            default_period: LookbackClass::default(),
            bind_addr: default_bind_addr(),
            yahoo: YahooConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            default_period = %config.default_period,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `TRENDLENS_SYMBOLS` / `TRENDLENS_BIND_ADDR` overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("TRENDLENS_SYMBOLS").ok().as_deref(),
            std::env::var("TRENDLENS_BIND_ADDR").ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, symbols: Option<&str>, bind_addr: Option<&str>) {
        if let Some(raw) = symbols {
            let parsed = parse_symbol_list(raw);
            if !parsed.is_empty() {
                self.symbols = parsed;
            }
        }
        if let Some(addr) = bind_addr.map(str::trim).filter(|a| !a.is_empty()) {
            self.bind_addr = addr.to_string();
        }
    }
}

/// Split a comma-separated symbol list, upper-casing and dropping blanks.
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
