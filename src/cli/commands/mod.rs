mod backfill;
mod init;
mod status;

pub use backfill::cmd_backfill;
pub use init::cmd_init;
pub use status::{cmd_status, cmd_update};

use crate::config::Config;
use crate::db::Store;
use crate::services::SeaOrmWatchingStateService;

async fn build_watching_state_service(
    config: &Config,
) -> anyhow::Result<(Store, SeaOrmWatchingStateService)> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmWatchingStateService::new(store.clone());
    Ok((store, service))
}
