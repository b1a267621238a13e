use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::AppState;

/// Background watcher for the community backend. Logs transitions only, so a
/// long outage does not flood the log.
pub struct MonitoringService {
    state: AppState,
}

impl MonitoringService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn start(&self) {
        info!("Starting background backend health watcher...");
        let mut interval = interval(Duration::from_secs(60));
        let mut backend_was_up = true;

        loop {
            interval.tick().await;
            match self.state.backend.health().await {
                Ok(()) => {
                    if !backend_was_up {
                        info!("Community backend is reachable again");
                    }
                    backend_was_up = true;
                }
                Err(e) => {
                    if backend_was_up {
                        warn!("Community backend unreachable: {}", e);
                    }
                    backend_was_up = false;
                }
            }
        }
    }
}
