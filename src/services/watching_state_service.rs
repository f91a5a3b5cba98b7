//! Domain service for the series watching-state machine.
//!
//! This module provides the [`WatchingStateService`] trait: reading and
//! recomputing a user's status on a series, and the review-creation gate
//! derived from it.

use crate::domain::watching::ReviewNotAllowed;
use crate::domain::{SeriesId, UserId, WatchingStatus};
use crate::models::watching_state::BackfillReport;
use thiserror::Error;

/// Domain errors for watching-state operations.
#[derive(Debug, Error)]
pub enum WatchingStateError {
    /// Unknown series/episode/user or a malformed id. Client error.
    #[error("{0}")]
    InvalidArgument(String),

    /// Business rule: reviews need a finished series.
    #[error(transparent)]
    ReviewNotAllowed(#[from] ReviewNotAllowed),

    #[error("Database error: {0}")]
    Database(String),
}

impl WatchingStateError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<sea_orm::DbErr> for WatchingStateError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WatchingStateError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait WatchingStateService: Send + Sync {
    /// Returns the stored status, computing and persisting it when the pair
    /// has no record yet.
    ///
    /// # Errors
    ///
    /// - Returns [`WatchingStateError::InvalidArgument`] for malformed ids or an unknown series
    /// - Returns [`WatchingStateError::Database`] on persistence failures
    async fn get_status(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<WatchingStatus, WatchingStateError>;

    /// Recomputes the status from current completion counts and persists it.
    ///
    /// Creating the record when absent and recomputing it happen in one
    /// transaction, so concurrent calls for the same pair cannot collide.
    ///
    /// # Errors
    ///
    /// - Returns [`WatchingStateError::InvalidArgument`] for malformed ids or an unknown series
    /// - Returns [`WatchingStateError::Database`] on persistence failures
    async fn update_status(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<WatchingStatus, WatchingStateError>;

    /// Succeeds only when the user has finished the series. Never touches reviews.
    ///
    /// # Errors
    ///
    /// - Returns [`WatchingStateError::ReviewNotAllowed`] carrying the current state otherwise
    /// - Returns [`WatchingStateError::InvalidArgument`] for malformed ids or an unknown series
    async fn validate_review_creation(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<(), WatchingStateError>;

    /// Recomputes every (user, series) pair with progress history.
    ///
    /// # Errors
    ///
    /// Per-pair failures are logged and counted; only failing to list the
    /// pairs returns [`WatchingStateError::Database`].
    async fn backfill(&self) -> Result<BackfillReport, WatchingStateError>;
}
