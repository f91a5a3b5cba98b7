use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Set};

use crate::entities::users;

pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn add(&self, username: &str) -> Result<i32> {
        let active_model = users::ActiveModel {
            username: Set(username.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = users::Entity::insert(active_model)
            .exec(self.conn)
            .await
            .with_context(|| format!("Failed to create user '{username}'"))?;

        Ok(result.last_insert_id)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = users::Entity::find_by_id(id)
            .count(self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(count > 0)
    }
}
