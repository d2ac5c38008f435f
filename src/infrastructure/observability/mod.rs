//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_gate_rejection, record_http_request,
    record_login_failure, record_token_issued, PrometheusMetrics,
};
