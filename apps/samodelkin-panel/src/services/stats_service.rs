use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use samodelkin_shared::stats::{ContentStats, SiteCounters, StatsSummary};

use crate::api::backend::BackendClient;
use crate::services::simulation_service::SimulationService;
use crate::utils::format_count_str;

/// Aggregates real backend statistics with the admin-controlled simulation
/// state into display-ready payloads.
pub struct StatsService {
    backend: BackendClient,
    simulation: Arc<SimulationService>,
}

#[derive(Serialize)]
pub struct DashboardStats {
    pub online_shown: i64,
    pub total_shown: i64,
    pub online_real: i64,
    pub total_real: i64,
    pub online_fake: i64,
    pub total_fake: i64,
    pub online_active: bool,
    pub total_active: bool,
    pub registered_today: i64,
    pub content: ContentStats,
    pub backend_online: bool,
}

impl StatsService {
    pub fn new(backend: BackendClient, simulation: Arc<SimulationService>) -> Self {
        Self {
            backend,
            simulation,
        }
    }

    async fn site_counters(&self) -> (SiteCounters, bool) {
        match self.backend.get_site_counters().await {
            Ok(counters) => (counters, true),
            Err(e) => {
                warn!("Backend counters unavailable: {}", e);
                (SiteCounters::default(), false)
            }
        }
    }

    /// Everything the admin dashboard needs in one payload. The real/fake
    /// breakdown is shown to admins only; public consumers get the combined
    /// numbers via `public_summary`.
    pub async fn dashboard(&self) -> DashboardStats {
        let (counters, backend_online) = self.site_counters().await;
        let combined = self.simulation.combined_stats(&counters);

        let content = match self.backend.get_content_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Backend content stats unavailable: {}", e);
                ContentStats::default()
            }
        };

        DashboardStats {
            online_shown: combined.online_shown,
            total_shown: combined.total_shown,
            online_real: counters.online_real,
            total_real: counters.total_real,
            online_fake: combined.online_fake,
            total_fake: combined.total_fake,
            online_active: combined.online_active,
            total_active: combined.total_active,
            registered_today: counters.registered_today,
            content,
            backend_online,
        }
    }

    /// Combined counters for the site widgets. Never exposes the real/fake
    /// split.
    pub async fn public_summary(&self) -> StatsSummary {
        let (counters, _) = self.site_counters().await;
        let combined = self.simulation.combined_stats(&counters);

        StatsSummary {
            online: combined.online_shown,
            online_str: format_count_str(combined.online_shown),
            total: combined.total_shown,
            total_str: format_count_str(combined.total_shown),
        }
    }

    pub async fn content(&self) -> Result<ContentStats> {
        self.backend.get_content_stats().await
    }
}
