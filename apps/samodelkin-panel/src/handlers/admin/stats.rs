use axum::extract::State;
use axum::Json;

use samodelkin_shared::stats::ContentStats;

use crate::error::Result;
use crate::AppState;

/// GET {admin}/api/stats/content - content statistics browser
pub async fn get_content_stats(State(state): State<AppState>) -> Result<Json<ContentStats>> {
    Ok(Json(state.stats.content().await?))
}
