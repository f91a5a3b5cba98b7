use crate::domain::WatchingStatus;
use crate::models::review::{Review, ReviewInput};
use crate::models::watching_state::{Recomputed, WatchingStateRow};
use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

use repositories::catalog::CatalogRepository;
use repositories::progress::ProgressRepository;
use repositories::review::ReviewRepository;
use repositories::user::UserRepository;
use repositories::watching_state::WatchingStateRepository;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every SQLite in-memory connection is its own database.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        if !in_memory {
            // Readers stay unblocked while a recompute holds the write lock.
            conn.execute_unprepared("PRAGMA journal_mode = WAL").await?;
        }

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn catalog_repo(&self) -> CatalogRepository<'_, DatabaseConnection> {
        CatalogRepository::new(&self.conn)
    }

    fn progress_repo(&self) -> ProgressRepository<'_, DatabaseConnection> {
        ProgressRepository::new(&self.conn)
    }

    fn watching_state_repo(&self) -> WatchingStateRepository<'_, DatabaseConnection> {
        WatchingStateRepository::new(&self.conn)
    }

    fn review_repo(&self) -> ReviewRepository<'_, DatabaseConnection> {
        ReviewRepository::new(&self.conn)
    }

    fn user_repo(&self) -> UserRepository<'_, DatabaseConnection> {
        UserRepository::new(&self.conn)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn series_exists(&self, series_id: i32) -> Result<bool> {
        self.catalog_repo().series_exists(series_id).await
    }

    pub async fn get_series_title(&self, series_id: i32) -> Result<Option<String>> {
        Ok(self
            .catalog_repo()
            .get_series(series_id)
            .await?
            .map(|s| s.title))
    }

    pub async fn total_episodes(&self, series_id: i32) -> Result<u64> {
        self.catalog_repo().total_episodes(series_id).await
    }

    pub async fn series_for_episode(&self, episode_id: i32) -> Result<Option<i32>> {
        self.catalog_repo().series_for_episode(episode_id).await
    }

    pub async fn add_series(
        &self,
        title: &str,
        description: Option<&str>,
        release_year: Option<i32>,
    ) -> Result<i32> {
        self.catalog_repo()
            .add_series(title, description, release_year)
            .await
    }

    pub async fn add_season(
        &self,
        series_id: i32,
        season_number: i32,
        title: Option<&str>,
    ) -> Result<i32> {
        self.catalog_repo()
            .add_season(series_id, season_number, title)
            .await
    }

    pub async fn add_episode(
        &self,
        season_id: i32,
        episode_number: i32,
        title: Option<&str>,
    ) -> Result<i32> {
        self.catalog_repo()
            .add_episode(season_id, episode_number, title)
            .await
    }

    pub async fn remove_episode(&self, episode_id: i32) -> Result<bool> {
        self.catalog_repo().remove_episode(episode_id).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn add_user(&self, username: &str) -> Result<i32> {
        self.user_repo().add(username).await
    }

    pub async fn user_exists(&self, user_id: i32) -> Result<bool> {
        self.user_repo().exists(user_id).await
    }

    // ========================================================================
    // Episode progress
    // ========================================================================

    pub async fn record_progress(
        &self,
        user_id: i32,
        episode_id: i32,
        completed: bool,
    ) -> Result<()> {
        self.progress_repo()
            .record(user_id, episode_id, completed)
            .await
    }

    pub async fn append_progress_fact(
        &self,
        user_id: i32,
        episode_id: i32,
        completed: bool,
    ) -> Result<()> {
        self.progress_repo()
            .append(user_id, episode_id, completed)
            .await
    }

    pub async fn pairs_with_progress(&self) -> Result<Vec<(i32, i32)>> {
        self.progress_repo().pairs_with_progress().await
    }

    // ========================================================================
    // Watching states
    // ========================================================================

    pub async fn get_watching_state(
        &self,
        user_id: i32,
        series_id: i32,
    ) -> Result<Option<WatchingStateRow>> {
        self.watching_state_repo().get(user_id, series_id).await
    }

    /// Reloads the counts for the pair and upserts the state `decide` picks,
    /// all inside one transaction.
    ///
    /// Returns `None` (and writes nothing) when the series does not exist.
    pub async fn recompute_watching_state<F>(
        &self,
        user_id: i32,
        series_id: i32,
        decide: F,
    ) -> Result<Option<Recomputed>>
    where
        F: FnOnce(Option<WatchingStatus>, u64, u64) -> WatchingStatus + Send,
    {
        if !self.catalog_repo().series_exists(series_id).await? {
            return Ok(None);
        }

        let txn = self.conn.begin().await?;

        // First statement writes: SQLite takes the write lock here, waiting on
        // busy_timeout, before this transaction has read anything.
        let states = WatchingStateRepository::new(&txn);
        let created = states.ensure(user_id, series_id).await?;
        let current = if created {
            None
        } else {
            states.get(user_id, series_id).await?.map(|s| s.status)
        };

        let catalog = CatalogRepository::new(&txn);
        let total = catalog.total_episodes(series_id).await?;
        let watched = if total == 0 {
            0
        } else {
            let episode_ids = catalog.episode_ids(series_id).await?;
            ProgressRepository::new(&txn)
                .completed_count(user_id, &episode_ids)
                .await?
        };

        let status = decide(current, total, watched);
        let row = states
            .upsert(user_id, series_id, status, watched, total)
            .await?;

        txn.commit().await?;
        Ok(Some(Recomputed {
            previous: current,
            row,
        }))
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    pub async fn create_review(
        &self,
        user_id: i32,
        series_id: i32,
        input: &ReviewInput,
    ) -> Result<Review> {
        self.review_repo().create(user_id, series_id, input).await
    }

    pub async fn list_reviews(&self, series_id: i32) -> Result<Vec<Review>> {
        self.review_repo().list_for_series(series_id).await
    }

    pub async fn count_reviews(&self, series_id: i32) -> Result<u64> {
        self.review_repo().count_for_series(series_id).await
    }
}
