use crate::entities::{prelude::*, reviews};
use crate::models::review::{Review, ReviewInput};
use anyhow::Result;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

pub struct ReviewRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ReviewRepository<'a, C> {
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user_id: i32, series_id: i32, input: &ReviewInput) -> Result<Review> {
        let active_model = reviews::ActiveModel {
            user_id: Set(user_id),
            series_id: Set(series_id),
            rating: Set(input.rating),
            comment: Set(input.comment.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = Reviews::insert(active_model)
            .exec_with_returning(self.conn)
            .await?;

        Ok(Review::from(model))
    }

    pub async fn list_for_series(&self, series_id: i32) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .filter(reviews::Column::SeriesId.eq(series_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn count_for_series(&self, series_id: i32) -> Result<u64> {
        Ok(Reviews::find()
            .filter(reviews::Column::SeriesId.eq(series_id))
            .count(self.conn)
            .await?)
    }
}
