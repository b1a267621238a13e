use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use samodelkin_shared::stats::StatsSummary;

use crate::AppState;

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// GET /api/stats/summary - combined counters for the praise/share/stats
/// widgets on the site
pub async fn stats_summary(State(state): State<AppState>) -> Json<StatsSummary> {
    Json(state.stats.public_summary().await)
}
