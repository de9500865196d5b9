use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    /// Outbound calls by provider ("tmdb", "embed") and outcome
    pub static ref UPSTREAM_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "vidstream_upstream_requests_total",
        "Requests sent to third-party providers",
        &["provider", "outcome"]
    )
    .unwrap();

    /// Search completions dropped because a newer search was started
    pub static ref STALE_SEARCH_RESPONSES: IntCounter = register_int_counter!(
        "vidstream_search_stale_responses_total",
        "Search responses discarded as superseded"
    )
    .unwrap();
}

pub fn record_upstream(provider: &str, outcome: &str) {
    UPSTREAM_REQUESTS.with_label_values(&[provider, outcome]).inc();
}
