//! Router assembly, factored out of `main` so integration tests can drive
//! the real `Router` with `tower::ServiceExt::oneshot`.

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::rest;
use crate::state::SharedState;

pub fn build(state: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/scrape", post(rest::jobs::trigger))
        .route("/api/jobs", get(rest::jobs::list))
        .route("/api/jobs/{id}", get(rest::jobs::get).delete(rest::jobs::cancel))
        .route("/api/jobs/{id}/logs", get(rest::jobs::logs))
        .route("/api/content", get(rest::content::list))
        .route("/api/content/{id}", get(rest::content::get))
        .route("/api/sources", get(rest::sources::list).post(rest::sources::create))
        .route(
            "/api/sources/{id}",
            get(rest::sources::get)
                .put(rest::sources::update)
                .patch(rest::sources::update)
                .delete(rest::sources::delete),
        )
        .route("/api/sources/{id}/test", patch(rest::sources::test))
        .route("/api/metrics", get(rest::metrics::get))
        .route("/health", get(rest::health))
        .with_state(state)
        .layer(if cfg!(debug_assertions) {
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
        } else {
            let origins: Vec<HeaderValue> = cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
            tower_http::cors::CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
        })
        .layer(SetResponseHeaderLayer::overriding(
            header::HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}
