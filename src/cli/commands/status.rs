use crate::config::Config;
use crate::db::Store;
use crate::domain::{SeriesId, UserId};
use crate::services::WatchingStateService;

async fn series_label(store: &Store, series_id: i32) -> anyhow::Result<String> {
    Ok(store
        .get_series_title(series_id)
        .await?
        .map_or_else(|| format!("series {series_id}"), |title| format!("{title} (#{series_id})")))
}

pub async fn cmd_status(config: &Config, user_id: i32, series_id: i32) -> anyhow::Result<()> {
    let (store, service) = super::build_watching_state_service(config).await?;

    let status = service
        .get_status(UserId::new(user_id), SeriesId::new(series_id))
        .await?;

    let label = series_label(&store, series_id).await?;
    println!("User {user_id} on {label}: {status} ({})", status.value());

    if let Some(row) = store.get_watching_state(user_id, series_id).await? {
        println!(
            "  {}/{} episodes watched, last updated {}",
            row.watched_episodes, row.total_episodes, row.last_updated
        );
    }

    Ok(())
}

pub async fn cmd_update(config: &Config, user_id: i32, series_id: i32) -> anyhow::Result<()> {
    let (store, service) = super::build_watching_state_service(config).await?;

    let status = service
        .update_status(UserId::new(user_id), SeriesId::new(series_id))
        .await?;

    let label = series_label(&store, series_id).await?;
    println!("✓ User {user_id} on {label} is now {status} ({})", status.value());
    Ok(())
}
