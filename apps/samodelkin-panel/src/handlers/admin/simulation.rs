use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::simulation_service::{HistoryRecord, SimulationSnapshot};
use crate::AppState;

/// Actor label for the audit history. Supplied by the frontend per admin
/// session; falls back to a generic label.
fn admin_label(headers: &HeaderMap) -> String {
    headers
        .get("x-admin-name")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "admin".to_string())
}

/// GET {admin}/api/simulation - full simulation state
pub async fn get_simulation(State(state): State<AppState>) -> Json<SimulationSnapshot> {
    Json(state.simulation.snapshot())
}

/// GET {admin}/api/simulation/history - audit trail, newest first
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryRecord>> {
    Json(state.simulation.snapshot().history)
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub active: bool,
}

/// POST {admin}/api/simulation/online/toggle
pub async fn toggle_online(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ToggleResponse> {
    let active = state.simulation.toggle_online_simulation(&admin_label(&headers));
    Json(ToggleResponse {
        success: true,
        active,
    })
}

/// POST {admin}/api/simulation/total/toggle
pub async fn toggle_total(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ToggleResponse> {
    let active = state.simulation.toggle_total_simulation(&admin_label(&headers));
    Json(ToggleResponse {
        success: true,
        active,
    })
}

#[derive(Serialize)]
pub struct TotalFakeResponse {
    pub success: bool,
    pub total_fake: i64,
}

/// POST {admin}/api/simulation/total/increment
pub async fn increment_total(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<TotalFakeResponse> {
    state.simulation.increment_total_fake(&admin_label(&headers));
    Json(TotalFakeResponse {
        success: true,
        total_fake: state.simulation.snapshot().total_fake,
    })
}

/// POST {admin}/api/simulation/total/decrement
pub async fn decrement_total(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<TotalFakeResponse> {
    state.simulation.decrement_total_fake(&admin_label(&headers));
    Json(TotalFakeResponse {
        success: true,
        total_fake: state.simulation.snapshot().total_fake,
    })
}

#[derive(Deserialize)]
pub struct SetTotalRequest {
    pub value: i64,
}

/// POST {admin}/api/simulation/total/set - out-of-range values are clamped
pub async fn set_total(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SetTotalRequest>,
) -> Json<TotalFakeResponse> {
    state
        .simulation
        .set_total_fake(&admin_label(&headers), req.value);
    Json(TotalFakeResponse {
        success: true,
        total_fake: state.simulation.snapshot().total_fake,
    })
}

/// POST {admin}/api/simulation/reset
pub async fn reset_simulation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SimulationSnapshot> {
    state.simulation.reset(&admin_label(&headers));
    Json(state.simulation.snapshot())
}
