use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, RecordProgressRequest, WatchingStatusDto};
use crate::api::validation::{validate_episode_id, validate_user_id};

/// `POST /api/episode-progress`
///
/// Records a completion fact and returns the recomputed watching status of
/// the episode's series.
pub async fn record_progress(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordProgressRequest>,
) -> Result<Json<WatchingStatusDto>, ApiError> {
    let user_id = validate_user_id(request.user_id)?;
    let episode_id = validate_episode_id(request.episode_id)?;

    let status = state
        .shared
        .progress
        .record_progress(user_id, episode_id, request.is_completed)
        .await?;

    Ok(Json(status.into()))
}
