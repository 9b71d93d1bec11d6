use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static BACKEND_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "studio_backend_requests_total",
        "Requests sent to the REST backend",
        &["op"]
    )
    .expect("register backend_requests_total")
});

pub static BACKEND_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "studio_backend_errors_total",
        "Backend requests that failed (network, status or parse)",
        &["op"]
    )
    .expect("register backend_errors_total")
});

pub static CACHE_HITS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "studio_query_cache_hits_total",
        "Query cache lookups served from cache"
    )
    .expect("register cache_hits_total")
});

pub static CACHE_MISSES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "studio_query_cache_misses_total",
        "Query cache lookups that went to the backend"
    )
    .expect("register cache_misses_total")
});

pub static CACHE_INVALIDATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "studio_query_cache_invalidations_total",
        "Explicit query cache invalidations"
    )
    .expect("register cache_invalidations_total")
});

/// Default registry in the Prometheus text format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
