use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ProgressService, ReviewService, SeaOrmWatchingStateService, WatchingStateService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub watching_state: Arc<dyn WatchingStateService>,

    pub progress: ProgressService,

    pub reviews: ReviewService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already-connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let watching_state = Arc::new(SeaOrmWatchingStateService::new(store.clone()))
            as Arc<dyn WatchingStateService>;

        let progress = ProgressService::new(store.clone(), watching_state.clone());
        let reviews = ReviewService::new(store.clone(), watching_state.clone());

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            watching_state,
            progress,
            reviews,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
