pub mod review;
pub mod watching_state;
