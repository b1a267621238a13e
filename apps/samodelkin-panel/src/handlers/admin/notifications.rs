use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::AppState;

#[derive(Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread: bool,
}

/// GET {admin}/api/notifications - moderator notification feed
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<Value>> {
    let items = state.notifications.list(query.unread).await?;
    let unread = items.iter().filter(|n| !n.read).count();

    Ok(Json(json!({ "unread": unread, "items": items })))
}

/// POST {admin}/api/notifications/{id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.notifications.mark_read(id).await?;
    Ok(Json(json!({ "success": true })))
}
