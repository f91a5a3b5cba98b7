use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreateReviewRequest, ReviewDto, SeriesReviewsQuery};
use crate::api::validation::{validate_series_id, validate_user_id};
use crate::models::review::ReviewInput;

/// `POST /api/reviews`
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let user_id = validate_user_id(request.user_id)?;
    let series_id = validate_series_id(request.series_id)?;

    let review = state
        .shared
        .reviews
        .create_review(
            user_id,
            series_id,
            ReviewInput {
                rating: request.rating,
                comment: request.comment,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(review.into())))
}

/// `GET /api/reviews?seriesId`
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesReviewsQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let series_id = validate_series_id(query.series_id)?;

    let reviews = state.shared.reviews.list_reviews(series_id).await?;

    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}
