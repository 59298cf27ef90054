use axum::{Router, routing::get};
use config::ServerConfig;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{AppState, error::panic_response, routes};

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        .route(
            "/health",
            get(routes::health::health_check).fallback(routes::method_not_allowed),
        )
        .merge(routes::teams::router())
        .merge(routes::users::router())
        .merge(routes::pull_requests::router())
        .fallback(routes::not_found);

    with_middleware(app, config).with_state(state)
}

fn with_middleware(app: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let mut app = app
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    // Requests past the deadline are answered with 408 by the layer itself.
    if let Some(timeout) = config.request_timeout {
        app = app.layer(TimeoutLayer::new(timeout));
    }

    app
}
