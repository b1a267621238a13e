use anyhow::Result;
use reqwest::Client;

use samodelkin_shared::notifications::NotificationItem;
use samodelkin_shared::stats::{ContentStats, SiteCounters};

/// HTTP client for the community backend. The backend is an opaque
/// collaborator; every consumer of this client degrades to defaults when a
/// request fails.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl BackendClient {
    pub fn new(base_url: String, auth_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth_token,
        }
    }

    /// Real user counters (online now, registered total).
    pub async fn get_site_counters(&self) -> Result<SiteCounters> {
        let url = format!("{}/api/internal/stats/counters", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Aggregate content statistics (posts, comments, praises, shares).
    pub async fn get_content_stats(&self) -> Result<ContentStats> {
        let url = format!("{}/api/internal/stats/content", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    pub async fn get_notifications(&self, unread_only: bool) -> Result<Vec<NotificationItem>> {
        let url = format!(
            "{}/api/internal/notifications?unread={}",
            self.base_url, unread_only
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
        let url = format!("{}/api/internal/notifications/{}/read", self.base_url, id);

        self.client
            .post(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        self.client.get(&url).send().await?.error_for_status()?;

        Ok(())
    }
}
