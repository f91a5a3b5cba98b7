use sea_orm::{EntityTrait, PaginatorTrait, Set};
use serilovers::config::Config;
use serilovers::db::Store;
use serilovers::domain::{EpisodeId, SeriesId, UserId, WatchingStatus};
use serilovers::entities::watching_states;
use serilovers::models::review::ReviewInput;
use serilovers::services::WatchingStateError;
use serilovers::state::SharedState;
use std::path::PathBuf;

struct Fixture {
    state: SharedState,
    user: UserId,
    series: SeriesId,
    episodes: Vec<EpisodeId>,
}

impl Fixture {
    fn store(&self) -> &Store {
        &self.state.store
    }

    async fn complete(&self, count: usize) {
        for episode in &self.episodes[..count] {
            self.state
                .progress
                .record_progress(self.user, *episode, true)
                .await
                .unwrap();
        }
    }
}

/// One user and a series whose episodes are split over two seasons.
async fn fixture(episode_count: i32) -> Fixture {
    let store = Store::new("sqlite::memory:").await.unwrap();
    seeded(store, episode_count).await
}

async fn seeded(store: Store, episode_count: i32) -> Fixture {

    let user = store.add_user("alice").await.unwrap();
    let series = store
        .add_series("Dark", Some("A missing child sets four families on a hunt"), Some(2017))
        .await
        .unwrap();

    let first = store.add_season(series, 1, None).await.unwrap();
    let second = store.add_season(series, 2, None).await.unwrap();

    let mut episodes = Vec::new();
    for n in 1..=episode_count {
        let season = if n <= episode_count / 2 { first } else { second };
        let id = store.add_episode(season, n, None).await.unwrap();
        episodes.push(EpisodeId::new(id));
    }

    Fixture {
        state: SharedState::with_store(Config::default(), store),
        user: UserId::new(user),
        series: SeriesId::new(series),
        episodes,
    }
}

async fn state_rows(store: &Store) -> u64 {
    watching_states::Entity::find()
        .count(&store.conn)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_new_pair_starts_to_watch() {
    let fx = fixture(10).await;

    let status = fx
        .state
        .watching_state
        .get_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::ToWatch);

    let row = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .expect("get_status should persist the computed state");
    assert_eq!(row.watched_episodes, 0);
    assert_eq!(row.total_episodes, 10);
}

#[tokio::test]
async fn test_partial_progress_blocks_reviews() {
    let fx = fixture(10).await;
    fx.complete(4).await;

    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::InProgress);

    let err = fx
        .state
        .watching_state
        .validate_review_creation(fx.user, fx.series)
        .await
        .unwrap_err();
    match err {
        WatchingStateError::ReviewNotAllowed(denied) => {
            assert_eq!(denied.current, WatchingStatus::InProgress);
        }
        other => panic!("expected ReviewNotAllowed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_finishing_every_episode_allows_reviews() {
    let fx = fixture(10).await;
    fx.complete(10).await;

    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::Finished);

    fx.state
        .watching_state
        .validate_review_creation(fx.user, fx.series)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_series_without_episodes_stays_to_watch() {
    let fx = fixture(0).await;

    for _ in 0..2 {
        let status = fx
            .state
            .watching_state
            .update_status(fx.user, fx.series)
            .await
            .unwrap();
        assert_eq!(status, WatchingStatus::ToWatch);
    }

    let row = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!((row.watched_episodes, row.total_episodes), (0, 0));
}

#[tokio::test]
async fn test_unmarking_an_episode_moves_back_to_in_progress() {
    let fx = fixture(3).await;
    fx.complete(3).await;
    assert_eq!(
        fx.state
            .watching_state
            .get_status(fx.user, fx.series)
            .await
            .unwrap(),
        WatchingStatus::Finished
    );

    let status = fx
        .state
        .progress
        .record_progress(fx.user, fx.episodes[1], false)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::InProgress);

    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::InProgress);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let fx = fixture(6).await;
    fx.complete(2).await;

    let first = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();

    for _ in 0..3 {
        let status = fx
            .state
            .watching_state
            .update_status(fx.user, fx.series)
            .await
            .unwrap();
        assert_eq!(status, first.status);
    }

    let last = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last.created_at, first.created_at);
    assert_eq!(last.watched_episodes, 2);
    assert_eq!(state_rows(fx.store()).await, 1);
}

#[tokio::test]
async fn test_duplicate_completion_facts_count_once() {
    let fx = fixture(2).await;

    for _ in 0..3 {
        fx.store()
            .append_progress_fact(fx.user.value(), fx.episodes[0].value(), true)
            .await
            .unwrap();
    }

    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::InProgress);

    let row = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.watched_episodes, 1);
}

#[tokio::test]
async fn test_catalog_changes_are_picked_up() {
    let fx = fixture(3).await;
    fx.complete(2).await;

    assert!(fx.store().remove_episode(fx.episodes[2].value()).await.unwrap());
    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::Finished);

    let season = fx.store().add_season(fx.series.value(), 3, None).await.unwrap();
    fx.store().add_episode(season, 1, Some("Extra")).await.unwrap();
    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::InProgress);
}

#[tokio::test]
async fn test_invalid_arguments_write_nothing() {
    let fx = fixture(2).await;
    let service = &fx.state.watching_state;

    for (user, series) in [
        (UserId::new(0), fx.series),
        (fx.user, SeriesId::new(-1)),
        (fx.user, SeriesId::new(999)),
        (UserId::new(77), fx.series),
    ] {
        assert!(matches!(
            service.get_status(user, series).await,
            Err(WatchingStateError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.update_status(user, series).await,
            Err(WatchingStateError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.validate_review_creation(user, series).await,
            Err(WatchingStateError::InvalidArgument(_))
        ));
    }

    assert_eq!(state_rows(fx.store()).await, 0);
}

#[tokio::test]
async fn test_progress_rejects_unknown_user_and_episode() {
    let fx = fixture(2).await;

    assert!(matches!(
        fx.state
            .progress
            .record_progress(UserId::new(42), fx.episodes[0], true)
            .await,
        Err(WatchingStateError::InvalidArgument(_))
    ));
    assert!(matches!(
        fx.state
            .progress
            .record_progress(fx.user, EpisodeId::new(4242), true)
            .await,
        Err(WatchingStateError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_concurrent_updates_leave_one_row() {
    let fx = fixture(4).await;
    fx.store()
        .record_progress(fx.user.value(), fx.episodes[0].value(), true)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = fx.state.watching_state.clone();
        let (user, series) = (fx.user, fx.series);
        handles.push(tokio::spawn(async move {
            service.update_status(user, series).await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), WatchingStatus::InProgress);
    }

    assert_eq!(state_rows(fx.store()).await, 1);
}

/// Temp-file database; removed with its WAL side files on drop.
struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("serilovers-{}.db", uuid::Uuid::new_v4())))
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.0.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_on_pooled_file_database() {
    let db = TempDb::new();
    let store = Store::with_pool_options(&db.url(), 5, 1).await.unwrap();
    let fx = seeded(store, 4).await;
    fx.store()
        .record_progress(fx.user.value(), fx.episodes[0].value(), true)
        .await
        .unwrap();

    for _ in 0..5 {
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = fx.state.watching_state.clone();
            let (user, series) = (fx.user, fx.series);
            handles.push(tokio::spawn(async move {
                service.update_status(user, series).await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), WatchingStatus::InProgress);
        }
    }

    assert_eq!(state_rows(fx.store()).await, 1);
}

#[tokio::test]
async fn test_unmarking_clears_duplicate_completion_facts() {
    let fx = fixture(2).await;

    for _ in 0..2 {
        fx.store()
            .append_progress_fact(fx.user.value(), fx.episodes[0].value(), true)
            .await
            .unwrap();
    }

    let status = fx
        .state
        .progress
        .record_progress(fx.user, fx.episodes[1], true)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::Finished);

    let status = fx
        .state
        .progress
        .record_progress(fx.user, fx.episodes[0], false)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::InProgress);

    let row = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.watched_episodes, 1);
}

#[tokio::test]
async fn test_get_status_returns_stored_state_without_recomputing() {
    let fx = fixture(4).await;

    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::ToWatch);

    for episode in &fx.episodes {
        fx.store()
            .append_progress_fact(fx.user.value(), episode.value(), true)
            .await
            .unwrap();
    }

    let status = fx
        .state
        .watching_state
        .get_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::ToWatch);

    let stored = fx
        .store()
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.watched_episodes, 0);

    let status = fx
        .state
        .watching_state
        .update_status(fx.user, fx.series)
        .await
        .unwrap();
    assert_eq!(status, WatchingStatus::Finished);
}

#[tokio::test]
async fn test_backfill_counts_failures_and_continues() {
    let fx = fixture(2).await;
    let store = fx.store();

    let bob = store.add_user("bob").await.unwrap();
    let carol = store.add_user("carol").await.unwrap();

    store
        .record_progress(fx.user.value(), fx.episodes[0].value(), true)
        .await
        .unwrap();
    store
        .record_progress(bob, fx.episodes[0].value(), true)
        .await
        .unwrap();
    store
        .record_progress(bob, fx.episodes[1].value(), true)
        .await
        .unwrap();
    store
        .record_progress(carol, fx.episodes[1].value(), true)
        .await
        .unwrap();

    // An unreadable status makes carol's pair fail.
    watching_states::Entity::insert(watching_states::ActiveModel {
        user_id: Set(carol),
        series_id: Set(fx.series.value()),
        status: Set(9),
        watched_episodes_count: Set(0),
        total_episodes_count: Set(2),
        created_at: Set("2024-01-01T00:00:00+00:00".to_string()),
        last_updated: Set("2024-01-01T00:00:00+00:00".to_string()),
        ..Default::default()
    })
    .exec(&store.conn)
    .await
    .unwrap();

    let report = fx.state.watching_state.backfill().await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failed, 1);

    let alice = store
        .get_watching_state(fx.user.value(), fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice.status, WatchingStatus::InProgress);

    let bob = store
        .get_watching_state(bob, fx.series.value())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob.status, WatchingStatus::Finished);
}

#[tokio::test]
async fn test_reviews_require_a_finished_series() {
    let fx = fixture(2).await;
    fx.complete(1).await;

    let input = ReviewInput {
        rating: 5,
        comment: Some("Loved it".to_string()),
    };

    let err = fx
        .state
        .reviews
        .create_review(fx.user, fx.series, input.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, WatchingStateError::ReviewNotAllowed(_)));
    assert_eq!(fx.store().count_reviews(fx.series.value()).await.unwrap(), 0);

    fx.complete(2).await;
    let review = fx
        .state
        .reviews
        .create_review(fx.user, fx.series, input)
        .await
        .unwrap();
    assert_eq!(review.rating, 5);
    assert_eq!(review.user_id, fx.user.value());

    let listed = fx.state.reviews.list_reviews(fx.series).await.unwrap();
    assert_eq!(listed, vec![review]);
}

#[tokio::test]
async fn test_review_input_is_validated_before_the_gate() {
    let fx = fixture(1).await;

    for rating in [0, 6] {
        let err = fx
            .state
            .reviews
            .create_review(
                fx.user,
                fx.series,
                ReviewInput {
                    rating,
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WatchingStateError::InvalidArgument(_)));
    }

    let err = fx
        .state
        .reviews
        .create_review(
            fx.user,
            fx.series,
            ReviewInput {
                rating: 3,
                comment: Some("x".repeat(2001)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WatchingStateError::InvalidArgument(_)));
}
