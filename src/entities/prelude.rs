pub use super::episode_progress::Entity as EpisodeProgress;
pub use super::episodes::Entity as Episodes;
pub use super::reviews::Entity as Reviews;
pub use super::seasons::Entity as Seasons;
pub use super::series::Entity as Series;
pub use super::users::Entity as Users;
pub use super::watching_states::Entity as WatchingStates;
