//! The series watching-state machine.
//!
//! A user's relationship to a series is recomputed from completion counts on
//! every update; the stored state never restricts which state comes next, so a
//! `Finished` series drops back to `InProgress` when an episode is un-marked.
//! The only behaviour that varies per state is whether a review may be written,
//! kept in a static handler table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{SeriesId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchingStatus {
    ToWatch,
    InProgress,
    Finished,
}

impl WatchingStatus {
    pub const ALL: [Self; 3] = [Self::ToWatch, Self::InProgress, Self::Finished];

    /// Numeric value persisted in `watching_states.status` and reported as
    /// `statusValue` over HTTP.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::ToWatch => 1,
            Self::InProgress => 2,
            Self::Finished => 3,
        }
    }

    #[must_use]
    pub const fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::ToWatch),
            2 => Some(Self::InProgress),
            3 => Some(Self::Finished),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToWatch => "ToWatch",
            Self::InProgress => "InProgress",
            Self::Finished => "Finished",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::ToWatch => 0,
            Self::InProgress => 1,
            Self::Finished => 2,
        }
    }
}

impl fmt::Display for WatchingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies progress from raw counts.
///
/// A series without episodes can never be started. Otherwise the ratio
/// `watched / total` decides: nothing watched is `ToWatch`, everything watched
/// (or more, if the catalog shrank) is `Finished`, anything between is
/// `InProgress`.
#[must_use]
pub const fn next_status(total_episodes: u64, watched_episodes: u64) -> WatchingStatus {
    if total_episodes == 0 || watched_episodes == 0 {
        WatchingStatus::ToWatch
    } else if watched_episodes >= total_episodes {
        WatchingStatus::Finished
    } else {
        WatchingStatus::InProgress
    }
}

/// Raised when a review is attempted before the series is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("You must finish all episodes before reviewing (current state: {current})")]
pub struct ReviewNotAllowed {
    pub current: WatchingStatus,
}

/// Per-state capabilities.
#[derive(Debug)]
pub struct StateHandler {
    status: WatchingStatus,
    review_allowed: bool,
}

static HANDLERS: [StateHandler; 3] = [
    StateHandler {
        status: WatchingStatus::ToWatch,
        review_allowed: false,
    },
    StateHandler {
        status: WatchingStatus::InProgress,
        review_allowed: false,
    },
    StateHandler {
        status: WatchingStatus::Finished,
        review_allowed: true,
    },
];

/// Returns the handler for a status from the static table.
#[must_use]
pub fn handler_for(status: WatchingStatus) -> &'static StateHandler {
    &HANDLERS[status.index()]
}

impl StateHandler {
    #[must_use]
    pub const fn status(&self) -> WatchingStatus {
        self.status
    }

    /// Transition step. Identical for every state.
    #[must_use]
    pub fn update_state(
        &self,
        user_id: UserId,
        series_id: SeriesId,
        total_episodes: u64,
        watched_episodes: u64,
    ) -> WatchingStatus {
        let next = next_status(total_episodes, watched_episodes);
        tracing::trace!(
            user_id = %user_id,
            series_id = %series_id,
            from = %self.status,
            to = %next,
            total_episodes,
            watched_episodes,
            "Computed watching state"
        );
        next
    }

    pub const fn validate_review_creation(&self) -> Result<(), ReviewNotAllowed> {
        if self.review_allowed {
            Ok(())
        } else {
            Err(ReviewNotAllowed {
                current: self.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_is_always_to_watch() {
        for watched in [0, 1, 5, 100] {
            assert_eq!(next_status(0, watched), WatchingStatus::ToWatch);
        }
    }

    #[test]
    fn nothing_watched_is_to_watch() {
        for total in [1, 2, 10, 500] {
            assert_eq!(next_status(total, 0), WatchingStatus::ToWatch);
        }
    }

    #[test]
    fn partial_progress_is_in_progress() {
        for total in 2..=30u64 {
            for watched in 1..total {
                assert_eq!(next_status(total, watched), WatchingStatus::InProgress);
            }
        }
    }

    #[test]
    fn complete_or_overfull_is_finished() {
        assert_eq!(next_status(1, 1), WatchingStatus::Finished);
        assert_eq!(next_status(10, 10), WatchingStatus::Finished);
        assert_eq!(next_status(10, 12), WatchingStatus::Finished);
    }

    #[test]
    fn transition_ignores_current_state() {
        for status in WatchingStatus::ALL {
            let handler = handler_for(status);
            let (user, series) = (UserId::new(1), SeriesId::new(1));
            assert_eq!(handler.update_state(user, series, 10, 0), WatchingStatus::ToWatch);
            assert_eq!(handler.update_state(user, series, 10, 4), WatchingStatus::InProgress);
            assert_eq!(handler.update_state(user, series, 10, 10), WatchingStatus::Finished);
        }
    }

    #[test]
    fn only_finished_allows_reviews() {
        assert!(handler_for(WatchingStatus::Finished)
            .validate_review_creation()
            .is_ok());

        for status in [WatchingStatus::ToWatch, WatchingStatus::InProgress] {
            let err = handler_for(status).validate_review_creation().unwrap_err();
            assert_eq!(err.current, status);
        }
    }

    #[test]
    fn handler_table_matches_status() {
        for status in WatchingStatus::ALL {
            assert_eq!(handler_for(status).status(), status);
        }
    }

    #[test]
    fn status_values_round_trip() {
        for status in WatchingStatus::ALL {
            assert_eq!(WatchingStatus::from_value(status.value()), Some(status));
        }
        assert_eq!(WatchingStatus::from_value(0), None);
        assert_eq!(WatchingStatus::from_value(4), None);
    }
}
