// =============================================================================
// Trendlens — Main Entry Point
// =============================================================================
//
//   trendlens <SYMBOL> [PERIOD]   print one analysis as JSON and exit
//   trendlens                     analyse the configured symbols, then serve
//                                 the HTTP API until Ctrl+C
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod error;
mod indicators;
mod market_data;
mod runtime_config;
mod trend;
mod types;

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::YahooBarSource;
use crate::runtime_config::RuntimeConfig;
use crate::trend::AnalysisOutcome;

const DEFAULT_CONFIG_PATH: &str = "trendlens.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("TRENDLENS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env();

    // ── 2. Bar source & shared state ─────────────────────────────────────
    let source = Arc::new(YahooBarSource::new(&config.yahoo)?);
    let state = Arc::new(AppState::new(source, config));

    // ── 3. One-shot mode ─────────────────────────────────────────────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(symbol) = args.first() {
        let period = args
            .get(1)
            .cloned()
            .unwrap_or_else(|| state.config.default_period.as_str().to_string());
        let outcome = state.engine.analyze(symbol, &period).await;
        println!("{}", outcome.to_json_pretty());
        return Ok(());
    }

    // ── 4. Startup sweep over configured symbols ─────────────────────────
    let period = state.config.default_period;
    info!(symbols = ?state.config.symbols, period = %period, "Running startup trend sweep");

    let outcomes = join_all(
        state
            .config
            .symbols
            .iter()
            .map(|symbol| state.engine.analyze_lookback(symbol, period)),
    )
    .await;

    for outcome in &outcomes {
        match outcome {
            AnalysisOutcome::Verdict(v) => info!(
                symbol = %v.symbol,
                verdict = %v.trend_verdict,
                confidence = %v.confidence,
                score = v.trend_strength_score,
                change_pct = v.price_change_percent,
                "trend"
            ),
            AnalysisOutcome::Diagnostic { symbol, diagnostic } => warn!(
                symbol = %symbol,
                kind = diagnostic.kind(),
                message = %diagnostic,
                "trend unavailable"
            ),
        }
    }
    let analysed = outcomes.iter().filter_map(AnalysisOutcome::verdict).count();
    info!(analysed, total = outcomes.len(), "Startup trend sweep complete");

    // ── 5. API server ────────────────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        warn!("Shutdown signal received, stopping gracefully");
    });

    if let Err(e) = server.await {
        error!(error = %e, "API server failed");
        return Err(e.into());
    }

    info!("Trendlens shut down complete.");
    Ok(())
}
