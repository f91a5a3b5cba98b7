//! `SeaORM` implementation of the `WatchingStateService` trait.

use crate::constants::metrics as metric_names;
use crate::db::Store;
use crate::domain::{SeriesId, UserId, WatchingStatus, handler_for};
use crate::models::watching_state::BackfillReport;
use crate::services::watching_state_service::{WatchingStateError, WatchingStateService};
use tracing::{debug, info, warn};

pub struct SeaOrmWatchingStateService {
    store: Store,
}

impl SeaOrmWatchingStateService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_ids(user_id: UserId, series_id: SeriesId) -> Result<(), WatchingStateError> {
        if !user_id.is_valid() {
            return Err(WatchingStateError::invalid(format!(
                "Invalid user ID: {user_id}. ID must be a positive integer"
            )));
        }
        if !series_id.is_valid() {
            return Err(WatchingStateError::invalid(format!(
                "Invalid series ID: {series_id}. ID must be a positive integer"
            )));
        }
        Ok(())
    }

    async fn calculate_and_persist(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<WatchingStatus, WatchingStateError> {
        if !self.store.user_exists(user_id.value()).await? {
            return Err(WatchingStateError::invalid(format!(
                "User with ID {user_id} does not exist"
            )));
        }

        let recomputed = self
            .store
            .recompute_watching_state(
                user_id.value(),
                series_id.value(),
                move |current, total, watched| {
                    handler_for(current.unwrap_or(WatchingStatus::ToWatch))
                        .update_state(user_id, series_id, total, watched)
                },
            )
            .await?
            .ok_or_else(|| {
                WatchingStateError::invalid(format!("Series with ID {series_id} does not exist"))
            })?;

        let row = recomputed.row;

        if recomputed.previous == Some(row.status) {
            debug!(
                user_id = %user_id,
                series_id = %series_id,
                status = %row.status,
                watched = row.watched_episodes,
                total = row.total_episodes,
                "Watching state unchanged"
            );
        } else {
            let from = recomputed
                .previous
                .map_or("None", WatchingStatus::as_str);

            metrics::counter!(
                metric_names::STATE_TRANSITIONS,
                "from" => from,
                "to" => row.status.as_str()
            )
            .increment(1);

            info!(
                user_id = %user_id,
                series_id = %series_id,
                from,
                to = %row.status,
                watched = row.watched_episodes,
                total = row.total_episodes,
                "Watching state changed"
            );
        }

        Ok(row.status)
    }
}

#[async_trait::async_trait]
impl WatchingStateService for SeaOrmWatchingStateService {
    async fn get_status(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<WatchingStatus, WatchingStateError> {
        Self::validate_ids(user_id, series_id)?;

        if let Some(existing) = self
            .store
            .get_watching_state(user_id.value(), series_id.value())
            .await?
        {
            return Ok(existing.status);
        }

        self.calculate_and_persist(user_id, series_id).await
    }

    async fn update_status(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<WatchingStatus, WatchingStateError> {
        Self::validate_ids(user_id, series_id)?;
        self.calculate_and_persist(user_id, series_id).await
    }

    async fn validate_review_creation(
        &self,
        user_id: UserId,
        series_id: SeriesId,
    ) -> Result<(), WatchingStateError> {
        let status = self.get_status(user_id, series_id).await?;
        handler_for(status).validate_review_creation()?;
        Ok(())
    }

    async fn backfill(&self) -> Result<BackfillReport, WatchingStateError> {
        let pairs = self.store.pairs_with_progress().await?;
        info!(pairs = pairs.len(), "Starting watching state backfill");

        let mut report = BackfillReport {
            total: pairs.len(),
            ..BackfillReport::default()
        };

        for (user_id, series_id) in pairs {
            match self
                .update_status(UserId::new(user_id), SeriesId::new(series_id))
                .await
            {
                Ok(_) => report.updated += 1,
                Err(e) => {
                    report.failed += 1;
                    metrics::counter!(metric_names::BACKFILL_FAILURES).increment(1);
                    warn!(user_id, series_id, error = %e, "Backfill failed for pair");
                }
            }
        }

        info!(
            total = report.total,
            updated = report.updated,
            failed = report.failed,
            "Watching state backfill finished"
        );

        Ok(report)
    }
}
