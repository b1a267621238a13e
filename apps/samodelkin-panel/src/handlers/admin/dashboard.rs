use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::services::stats_service::DashboardStats;
use crate::AppState;

/// GET {admin}/api/dashboard - main dashboard payload
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.stats.dashboard().await)
}

#[derive(Serialize)]
pub struct Statusbar {
    pub backend_status: String,
    pub cpu_usage: String,
    pub ram_usage: String,
    pub version: String,
}

/// GET {admin}/api/statusbar - system status partial
pub async fn get_statusbar(State(state): State<AppState>) -> Json<Statusbar> {
    let backend_status = match state.backend.health().await {
        Ok(()) => "Online".to_string(),
        Err(_) => "Offline".to_string(),
    };

    // System Stats
    let (cpu_usage, ram_usage) = {
        let mut sys = state.system_stats.lock().await;
        sys.refresh_all();

        let cpu = sys.global_cpu_usage();
        let total_ram = sys.total_memory();
        let used_ram = sys.used_memory();

        // Format RAM (e.g., "4.5/16 GB")
        let total_gb = total_ram as f64 / 1024.0 / 1024.0 / 1024.0;
        let used_gb = used_ram as f64 / 1024.0 / 1024.0 / 1024.0;

        (
            format!("{:.1}%", cpu),
            format!("{:.1}/{:.1} GB", used_gb, total_gb),
        )
    };

    Json(Statusbar {
        backend_status,
        cpu_usage,
        ram_usage,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
