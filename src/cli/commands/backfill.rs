use crate::config::Config;
use crate::services::WatchingStateService;

pub async fn cmd_backfill(config: &Config) -> anyhow::Result<()> {
    let (_, service) = super::build_watching_state_service(config).await?;

    println!("Recomputing watching states from episode progress...");
    let report = service.backfill().await?;

    println!("{:-<40}", "");
    println!("Pairs found: {}", report.total);
    println!("Updated:     {}", report.updated);
    if report.failed > 0 {
        println!("⚠ Failed:    {} (see log for details)", report.failed);
    }

    Ok(())
}
