use crate::db::Store;
use crate::domain::{EpisodeId, SeriesId, UserId, WatchingStatus};
use crate::services::{WatchingStateError, WatchingStateService};
use std::sync::Arc;
use tracing::debug;

/// Records episode completion facts and keeps the owning series' watching
/// state in step with them.
#[derive(Clone)]
pub struct ProgressService {
    store: Store,
    watching: Arc<dyn WatchingStateService>,
}

impl ProgressService {
    pub fn new(store: Store, watching: Arc<dyn WatchingStateService>) -> Self {
        Self { store, watching }
    }

    pub async fn record_progress(
        &self,
        user_id: UserId,
        episode_id: EpisodeId,
        completed: bool,
    ) -> Result<WatchingStatus, WatchingStateError> {
        if !user_id.is_valid() || !episode_id.is_valid() {
            return Err(WatchingStateError::invalid(format!(
                "Invalid arguments: user {user_id}, episode {episode_id}"
            )));
        }

        if !self.store.user_exists(user_id.value()).await? {
            return Err(WatchingStateError::invalid(format!(
                "User with ID {user_id} does not exist"
            )));
        }

        let series_id = self
            .store
            .series_for_episode(episode_id.value())
            .await?
            .map(SeriesId::new)
            .ok_or_else(|| {
                WatchingStateError::invalid(format!("Episode with ID {episode_id} does not exist"))
            })?;

        self.store
            .record_progress(user_id.value(), episode_id.value(), completed)
            .await?;

        debug!(
            user_id = %user_id,
            episode_id = %episode_id,
            series_id = %series_id,
            completed,
            "Recorded episode progress"
        );

        self.watching.update_status(user_id, series_id).await
    }
}
