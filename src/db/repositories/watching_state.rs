use crate::domain::WatchingStatus;
use crate::entities::{prelude::*, watching_states};
use crate::models::watching_state::WatchingStateRow;
use anyhow::Result;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use sea_orm::sea_query::OnConflict;

pub struct WatchingStateRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> WatchingStateRepository<'a, C> {
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn find(&self, user_id: i32, series_id: i32) -> Result<Option<watching_states::Model>> {
        Ok(WatchingStates::find()
            .filter(watching_states::Column::UserId.eq(user_id))
            .filter(watching_states::Column::SeriesId.eq(series_id))
            .one(self.conn)
            .await?)
    }

    pub async fn get(&self, user_id: i32, series_id: i32) -> Result<Option<WatchingStateRow>> {
        self.find(user_id, series_id)
            .await?
            .map(WatchingStateRow::try_from)
            .transpose()
    }

    /// Inserts a `ToWatch` 0/0 row unless the pair already has one.
    ///
    /// Returns whether a row was created.
    pub async fn ensure(&self, user_id: i32, series_id: i32) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = watching_states::ActiveModel {
            user_id: Set(user_id),
            series_id: Set(series_id),
            status: Set(WatchingStatus::ToWatch.value()),
            watched_episodes_count: Set(0),
            total_episodes_count: Set(0),
            created_at: Set(now.clone()),
            last_updated: Set(now),
            ..Default::default()
        };

        let inserted = WatchingStates::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    watching_states::Column::UserId,
                    watching_states::Column::SeriesId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        Ok(inserted > 0)
    }

    /// Inserts or updates the row keyed on `(user_id, series_id)`.
    ///
    /// `created_at` is only written on insert.
    pub async fn upsert(
        &self,
        user_id: i32,
        series_id: i32,
        status: WatchingStatus,
        watched_episodes: u64,
        total_episodes: u64,
    ) -> Result<WatchingStateRow> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = watching_states::ActiveModel {
            user_id: Set(user_id),
            series_id: Set(series_id),
            status: Set(status.value()),
            watched_episodes_count: Set(i64::try_from(watched_episodes)?),
            total_episodes_count: Set(i64::try_from(total_episodes)?),
            created_at: Set(now.clone()),
            last_updated: Set(now),
            ..Default::default()
        };

        WatchingStates::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    watching_states::Column::UserId,
                    watching_states::Column::SeriesId,
                ])
                .update_columns([
                    watching_states::Column::Status,
                    watching_states::Column::WatchedEpisodesCount,
                    watching_states::Column::TotalEpisodesCount,
                    watching_states::Column::LastUpdated,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        self.get(user_id, series_id)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Watching state for user {user_id} series {series_id} missing after upsert"
                )
            })
    }
}
