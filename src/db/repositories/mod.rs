pub mod catalog;
pub mod progress;
pub mod review;
pub mod user;
pub mod watching_state;
