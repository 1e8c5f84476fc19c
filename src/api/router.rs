use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::forward_auth;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Decision endpoint, reverse proxies may forward any method
        .route("/", any(forward_auth::check_access))
        .route("/clear_cache", any(forward_auth::clear_cache))
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}
