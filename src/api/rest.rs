// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`:
//   GET /api/v1/health
//   GET /api/v1/trend/:symbol?period=7d|30d|200d
//   GET /api/v1/bars/:symbol?period=7d|30d|200d
//   GET /api/v1/candles/:symbol              last 10 candles, 1m else 1d
//
// `period` defaults to the configured lookback class.  Diagnostics are
// returned as `{symbol, error}` / `{symbol, warning}` bodies, never as bare
// status codes.
//
// CORS is configured permissively; tighten `allow_origin` for public
// deployments.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::error::Diagnostic;
use crate::market_data::{BarListing, BarSource, LATEST_CANDLES};
use crate::trend::AnalysisOutcome;
use crate::types::LookbackClass;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/trend/:symbol", get(trend))
        .route("/api/v1/bars/:symbol", get(bars))
        .route("/api/v1/candles/:symbol", get(candles))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PeriodQuery {
    #[serde(default)]
    period: Option<String>,
}

impl PeriodQuery {
    fn period_or(&self, default: LookbackClass) -> String {
        self.period
            .clone()
            .unwrap_or_else(|| default.as_str().to_string())
    }
}

fn status_for(diagnostic: &Diagnostic) -> StatusCode {
    match diagnostic {
        Diagnostic::Config => StatusCode::BAD_REQUEST,
        Diagnostic::NoData { .. } => StatusCode::NOT_FOUND,
        Diagnostic::LowConfidence { .. } => StatusCode::OK,
        Diagnostic::Computation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    started_at: String,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        started_at: state.started_at.to_rfc3339(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Trend analysis
// =============================================================================

async fn trend(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Response {
    let period = query.period_or(state.config.default_period);
    let outcome = state.engine.analyze(&symbol, &period).await;

    let status = outcome
        .as_diagnostic()
        .map_or(StatusCode::OK, status_for);
    (status, Json(outcome)).into_response()
}

// =============================================================================
// Raw bars
// =============================================================================

async fn bars(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Response {
    let symbol = symbol.trim().to_uppercase();
    let period = query.period_or(state.config.default_period);

    let lookback = match period.parse::<LookbackClass>() {
        Ok(lookback) => lookback,
        Err(diagnostic) => return diagnostic_response(symbol, diagnostic),
    };

    match state.engine.source().fetch(&symbol, lookback).await {
        Ok(Some(series)) => Json(BarListing::from_series(&series)).into_response(),
        Ok(None) => diagnostic_response(
            symbol.clone(),
            Diagnostic::no_data(symbol, "no bars returned"),
        ),
        Err(e) => {
            warn!(symbol = %symbol, period = %lookback, error = %e, "bar listing failed");
            diagnostic_response(symbol.clone(), Diagnostic::no_data(symbol, format!("{e:#}")))
        }
    }
}

// =============================================================================
// Latest candles
// =============================================================================

async fn candles(State(state): State<Arc<AppState>>, Path(symbol): Path<String>) -> Response {
    let symbol = symbol.trim().to_uppercase();

    match state.engine.source().latest(&symbol, LATEST_CANDLES).await {
        Ok(Some(latest)) => Json(latest).into_response(),
        Ok(None) => diagnostic_response(
            symbol.clone(),
            Diagnostic::no_data(symbol, "no OHLCV candles returned"),
        ),
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "latest candles failed");
            diagnostic_response(symbol.clone(), Diagnostic::no_data(symbol, format!("{e:#}")))
        }
    }
}

fn diagnostic_response(symbol: String, diagnostic: Diagnostic) -> Response {
    let status = status_for(&diagnostic);
    (status, Json(AnalysisOutcome::diagnostic(symbol, diagnostic))).into_response()
}
