use crate::constants::reviews::{MAX_COMMENT_LENGTH, MAX_RATING, MIN_RATING};
use crate::db::Store;
use crate::domain::{SeriesId, UserId};
use crate::models::review::{Review, ReviewInput};
use crate::services::{WatchingStateError, WatchingStateService};
use std::sync::Arc;
use tracing::info;

/// Review write path. Every review passes the watching-state gate first.
#[derive(Clone)]
pub struct ReviewService {
    store: Store,
    watching: Arc<dyn WatchingStateService>,
}

impl ReviewService {
    pub fn new(store: Store, watching: Arc<dyn WatchingStateService>) -> Self {
        Self { store, watching }
    }

    fn validate_input(input: &ReviewInput) -> Result<(), WatchingStateError> {
        if !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
            return Err(WatchingStateError::invalid(format!(
                "Invalid rating: {}. Rating must be between {MIN_RATING} and {MAX_RATING}",
                input.rating
            )));
        }

        if input
            .comment
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_COMMENT_LENGTH)
        {
            return Err(WatchingStateError::invalid(format!(
                "Comment must be {MAX_COMMENT_LENGTH} characters or less"
            )));
        }

        Ok(())
    }

    pub async fn create_review(
        &self,
        user_id: UserId,
        series_id: SeriesId,
        input: ReviewInput,
    ) -> Result<Review, WatchingStateError> {
        Self::validate_input(&input)?;

        if !self.store.user_exists(user_id.value()).await? {
            return Err(WatchingStateError::invalid(format!(
                "User with ID {user_id} does not exist"
            )));
        }

        self.watching
            .validate_review_creation(user_id, series_id)
            .await?;

        let review = self
            .store
            .create_review(user_id.value(), series_id.value(), &input)
            .await?;

        info!(
            review_id = review.id,
            user_id = %user_id,
            series_id = %series_id,
            rating = review.rating,
            "Review created"
        );

        Ok(review)
    }

    pub async fn list_reviews(&self, series_id: SeriesId) -> Result<Vec<Review>, WatchingStateError> {
        if !self.store.series_exists(series_id.value()).await? {
            return Err(WatchingStateError::invalid(format!(
                "Series with ID {series_id} does not exist"
            )));
        }
        Ok(self.store.list_reviews(series_id.value()).await?)
    }
}
