pub mod watching_state_service;
pub mod watching_state_service_impl;
pub use watching_state_service::{WatchingStateError, WatchingStateService};
pub use watching_state_service_impl::SeaOrmWatchingStateService;

pub mod progress;
pub use progress::ProgressService;

pub mod reviews;
pub use reviews::ReviewService;
