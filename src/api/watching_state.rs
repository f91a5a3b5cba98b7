//! Watching-state endpoints.
//!
//! Thin adapters over [`WatchingStateService`](crate::services::WatchingStateService).

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{
    ApiError, AppState, ReviewEligibilityDto, WatchingStateQuery, WatchingStatusDto,
};
use crate::api::validation::{validate_series_id, validate_user_id};
use crate::models::watching_state::BackfillReport;

/// `GET /api/watching-state/status?userId&seriesId`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WatchingStateQuery>,
) -> Result<Json<WatchingStatusDto>, ApiError> {
    let user_id = validate_user_id(query.user_id)?;
    let series_id = validate_series_id(query.series_id)?;

    let status = state
        .watching_state()
        .get_status(user_id, series_id)
        .await?;

    Ok(Json(status.into()))
}

/// `POST /api/watching-state/update?userId&seriesId`
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WatchingStateQuery>,
) -> Result<Json<WatchingStatusDto>, ApiError> {
    let user_id = validate_user_id(query.user_id)?;
    let series_id = validate_series_id(query.series_id)?;

    let status = state
        .watching_state()
        .update_status(user_id, series_id)
        .await?;

    Ok(Json(status.into()))
}

/// `POST /api/watching-state/validate-review?userId&seriesId`
///
/// A denied review answers 400 with `canCreateReview: false` and the current
/// state (see [`ApiError::ReviewNotAllowed`]).
pub async fn validate_review(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WatchingStateQuery>,
) -> Result<Json<ReviewEligibilityDto>, ApiError> {
    let user_id = validate_user_id(query.user_id)?;
    let series_id = validate_series_id(query.series_id)?;

    state
        .watching_state()
        .validate_review_creation(user_id, series_id)
        .await?;

    Ok(Json(ReviewEligibilityDto::allowed()))
}

/// `POST /api/watching-state/backfill`
pub async fn backfill(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BackfillReport>, ApiError> {
    let report = state.watching_state().backfill().await?;
    Ok(Json(report))
}
