//! Observability infrastructure - Tracing and Prometheus metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_access_decision, record_cache_clear,
    record_geo_lookup, record_http_request, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
