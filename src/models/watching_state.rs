use crate::domain::{SeriesId, UserId, WatchingStatus};
use crate::entities::watching_states;

/// A persisted watching state for one (user, series) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchingStateRow {
    pub user_id: UserId,
    pub series_id: SeriesId,
    pub status: WatchingStatus,
    pub watched_episodes: u64,
    pub total_episodes: u64,
    pub created_at: String,
    pub last_updated: String,
}

impl TryFrom<watching_states::Model> for WatchingStateRow {
    type Error = anyhow::Error;

    fn try_from(m: watching_states::Model) -> Result<Self, Self::Error> {
        let status = WatchingStatus::from_value(m.status).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown watching status {} stored for user {} series {}",
                m.status,
                m.user_id,
                m.series_id
            )
        })?;

        Ok(Self {
            user_id: UserId::new(m.user_id),
            series_id: SeriesId::new(m.series_id),
            status,
            watched_episodes: u64::try_from(m.watched_episodes_count).unwrap_or_default(),
            total_episodes: u64::try_from(m.total_episodes_count).unwrap_or_default(),
            created_at: m.created_at,
            last_updated: m.last_updated,
        })
    }
}

/// A freshly persisted state together with the status it replaced.
#[derive(Debug, Clone)]
pub struct Recomputed {
    pub previous: Option<WatchingStatus>,
    pub row: WatchingStateRow,
}

/// Outcome of a batch recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BackfillReport {
    pub total: usize,
    pub updated: usize,
    pub failed: usize,
}
