use anyhow::Result;

use samodelkin_shared::notifications::NotificationItem;

use crate::api::backend::BackendClient;

/// Thin wrapper over the backend's moderator notification feed.
pub struct NotificationService {
    backend: BackendClient,
}

impl NotificationService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list(&self, unread_only: bool) -> Result<Vec<NotificationItem>> {
        self.backend.get_notifications(unread_only).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<()> {
        self.backend.mark_notification_read(id).await
    }
}
