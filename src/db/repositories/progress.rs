use crate::entities::{episode_progress, episodes, prelude::*, seasons};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

/// Episode completion facts.
pub struct ProgressRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ProgressRepository<'a, C> {
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Distinct completed episodes for `user_id` among `episode_ids`.
    pub async fn completed_count(&self, user_id: i32, episode_ids: &[i32]) -> Result<u64> {
        if episode_ids.is_empty() {
            return Ok(0);
        }

        let completed = EpisodeProgress::find()
            .select_only()
            .column(episode_progress::Column::EpisodeId)
            .distinct()
            .filter(episode_progress::Column::UserId.eq(user_id))
            .filter(episode_progress::Column::IsCompleted.eq(true))
            .filter(episode_progress::Column::EpisodeId.is_in(episode_ids.iter().copied()))
            .into_tuple::<i32>()
            .all(self.conn)
            .await?;

        Ok(completed.len() as u64)
    }

    /// Sets the completion flag on every fact for the pair, inserting one if
    /// none exists. Older duplicates must not keep an un-marked episode watched.
    pub async fn record(&self, user_id: i32, episode_id: i32, completed: bool) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let updated = EpisodeProgress::update_many()
            .col_expr(episode_progress::Column::IsCompleted, Expr::value(completed))
            .col_expr(episode_progress::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(episode_progress::Column::UserId.eq(user_id))
            .filter(episode_progress::Column::EpisodeId.eq(episode_id))
            .exec(self.conn)
            .await?;

        if updated.rows_affected == 0 {
            let active_model = episode_progress::ActiveModel {
                user_id: Set(user_id),
                episode_id: Set(episode_id),
                is_completed: Set(completed),
                updated_at: Set(now),
                ..Default::default()
            };
            EpisodeProgress::insert(active_model).exec(self.conn).await?;
        }

        Ok(())
    }

    /// Appends a raw fact without touching older ones.
    pub async fn append(&self, user_id: i32, episode_id: i32, completed: bool) -> Result<()> {
        let active_model = episode_progress::ActiveModel {
            user_id: Set(user_id),
            episode_id: Set(episode_id),
            is_completed: Set(completed),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        EpisodeProgress::insert(active_model).exec(self.conn).await?;
        Ok(())
    }

    /// Every (user, series) pair with at least one progress fact.
    pub async fn pairs_with_progress(&self) -> Result<Vec<(i32, i32)>> {
        let pairs = EpisodeProgress::find()
            .select_only()
            .column(episode_progress::Column::UserId)
            .column(seasons::Column::SeriesId)
            .distinct()
            .join(JoinType::InnerJoin, episode_progress::Relation::Episodes.def())
            .join(JoinType::InnerJoin, episodes::Relation::Seasons.def())
            .order_by_asc(episode_progress::Column::UserId)
            .order_by_asc(seasons::Column::SeriesId)
            .into_tuple::<(i32, i32)>()
            .all(self.conn)
            .await?;

        Ok(pairs)
    }
}
