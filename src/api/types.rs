use serde::{Deserialize, Serialize};

use crate::domain::{EpisodeId, SeriesId, UserId, WatchingStatus};
use crate::models::review::Review;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchingStateQuery {
    pub user_id: UserId,
    pub series_id: SeriesId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchingStatusDto {
    pub status: WatchingStatus,
    pub status_value: i32,
}

impl From<WatchingStatus> for WatchingStatusDto {
    fn from(status: WatchingStatus) -> Self {
        Self {
            status,
            status_value: status.value(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEligibilityDto {
    pub can_create_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<WatchingStatus>,
}

impl ReviewEligibilityDto {
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            can_create_review: true,
            message: None,
            current_state: None,
        }
    }

    pub fn denied(message: impl Into<String>, current_state: WatchingStatus) -> Self {
        Self {
            can_create_review: false,
            message: Some(message.into()),
            current_state: Some(current_state),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProgressRequest {
    pub user_id: UserId,
    pub episode_id: EpisodeId,
    pub is_completed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: UserId,
    pub series_id: SeriesId,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesReviewsQuery {
    pub series_id: SeriesId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: i32,
    pub user_id: i32,
    pub series_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            series_id: r.series_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}
