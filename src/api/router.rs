use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::auth;
use super::health;
use super::middleware::{
    auth_gate_middleware, logging_middleware, metrics_middleware, security_headers_middleware,
};
use super::orders::{self, TOTAL_HEADER, TOTAL_PAGES_HEADER};
use super::state::AppState;
use super::types::ApiError;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Create the full router with application state
///
/// Layers run outermost first: request id, tracing, metrics, logging,
/// security headers, then the auth gate, which sees every request before routing.
pub fn create_router_with_state(state: AppState, metrics: Option<(PrometheusMetrics, String)>) -> Router {
    let base_path = state.settings.base_path();

    let api = Router::new()
        .merge(auth::create_auth_router())
        .merge(orders::create_orders_router());

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest(&base_path, api)
        .fallback(|| async { ApiError::no_route() })
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate_middleware))
        .with_state(state);

    if let Some((metrics, path)) = metrics {
        router = router.merge(create_metrics_router(metrics, &path));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(REQUEST_ID))
            .layer(middleware::from_fn(metrics_middleware))
            .layer(middleware::from_fn(logging_middleware))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(cors_layer()),
    )
}

/// Browser clients may send bearer tokens and read the paging headers
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([TOTAL_HEADER, TOTAL_PAGES_HEADER, header::LINK])
}
