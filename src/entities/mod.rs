pub mod prelude;

pub mod episode_progress;
pub mod episodes;
pub mod reviews;
pub mod seasons;
pub mod series;
pub mod users;
pub mod watching_states;
