use crate::entities::{episodes, prelude::*, seasons, series};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

/// Read access to the series → seasons → episodes hierarchy.
///
/// Borrowing the connection lets the same queries run inside a transaction.
pub struct CatalogRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogRepository<'a, C> {
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_series(&self, series_id: i32) -> Result<Option<series::Model>> {
        Ok(Series::find_by_id(series_id).one(self.conn).await?)
    }

    pub async fn series_exists(&self, series_id: i32) -> Result<bool> {
        let count = Series::find_by_id(series_id).count(self.conn).await?;
        Ok(count > 0)
    }

    /// Number of episodes across every season of the series.
    pub async fn total_episodes(&self, series_id: i32) -> Result<u64> {
        let count = Episodes::find()
            .join(JoinType::InnerJoin, episodes::Relation::Seasons.def())
            .filter(seasons::Column::SeriesId.eq(series_id))
            .count(self.conn)
            .await?;

        Ok(count)
    }

    pub async fn episode_ids(&self, series_id: i32) -> Result<Vec<i32>> {
        let ids = Episodes::find()
            .select_only()
            .column(episodes::Column::Id)
            .join(JoinType::InnerJoin, episodes::Relation::Seasons.def())
            .filter(seasons::Column::SeriesId.eq(series_id))
            .order_by_asc(episodes::Column::Id)
            .into_tuple::<i32>()
            .all(self.conn)
            .await?;

        Ok(ids)
    }

    /// Resolves the series an episode belongs to.
    pub async fn series_for_episode(&self, episode_id: i32) -> Result<Option<i32>> {
        let row = Episodes::find_by_id(episode_id)
            .find_also_related(Seasons)
            .one(self.conn)
            .await?;

        Ok(row.and_then(|(_, season)| season.map(|s| s.series_id)))
    }

    pub async fn add_series(
        &self,
        title: &str,
        description: Option<&str>,
        release_year: Option<i32>,
    ) -> Result<i32> {
        let active_model = series::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.map(str::to_string)),
            release_year: Set(release_year),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = Series::insert(active_model).exec(self.conn).await?;
        Ok(result.last_insert_id)
    }

    pub async fn add_season(
        &self,
        series_id: i32,
        season_number: i32,
        title: Option<&str>,
    ) -> Result<i32> {
        let active_model = seasons::ActiveModel {
            series_id: Set(series_id),
            season_number: Set(season_number),
            title: Set(title.map(str::to_string)),
            ..Default::default()
        };

        let result = Seasons::insert(active_model).exec(self.conn).await?;
        Ok(result.last_insert_id)
    }

    pub async fn add_episode(
        &self,
        season_id: i32,
        episode_number: i32,
        title: Option<&str>,
    ) -> Result<i32> {
        let active_model = episodes::ActiveModel {
            season_id: Set(season_id),
            episode_number: Set(episode_number),
            title: Set(title.map(str::to_string)),
            ..Default::default()
        };

        let result = Episodes::insert(active_model).exec(self.conn).await?;
        Ok(result.last_insert_id)
    }

    pub async fn remove_episode(&self, episode_id: i32) -> Result<bool> {
        let result = Episodes::delete_by_id(episode_id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
