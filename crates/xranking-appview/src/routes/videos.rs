use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::constants::VIDEO_LIST_LIMIT;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/videos
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let videos = xranking_db::tweets::list_videos(&state.pool, VIDEO_LIST_LIMIT).await?;
    Ok(Json(json!({ "success": true, "videos": videos })))
}
