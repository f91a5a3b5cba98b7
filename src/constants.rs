pub mod reviews {

    pub const MIN_RATING: i32 = 1;

    pub const MAX_RATING: i32 = 5;

    pub const MAX_COMMENT_LENGTH: usize = 2000;
}

pub mod metrics {

    pub const HTTP_REQUESTS: &str = "http_requests_total";

    pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";

    pub const STATE_TRANSITIONS: &str = "watching_state_transitions_total";

    pub const BACKFILL_FAILURES: &str = "watching_state_backfill_failures_total";
}
