//! Middleware stack for the API server
//!
//! Request IDs, tracing, timeouts, CORS, and per-client rate limiting.

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use blood_common::{AppConfig, AppError, CorsConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
    GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Apply the full middleware stack to the API routes
///
/// Order, outermost first: rate limit, request id, trace, timeout, CORS.
/// The rate limiter keys on the peer IP, so the server must be started with
/// connect info. With `trust_proxy_headers` it prefers forwarded headers.
pub fn apply_middleware(
    router: Router<AppState>,
    config: &AppConfig,
) -> Result<Router<AppState>, AppError> {
    let router = apply_common_layers(
        router.layer(create_cors_layer(&config.cors, config.app.env.is_production())),
        config.api.request_timeout_secs,
    );

    let limits = &config.rate_limit;

    // The two extractors are distinct types, so each branch builds its own layer
    let router = if limits.trust_proxy_headers {
        let governor_conf = GovernorConfigBuilder::default()
            .per_second(limits.requests_per_second.into())
            .burst_size(limits.burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(invalid_rate_limit)?;
        router.layer(GovernorLayer {
            config: Arc::new(governor_conf),
        })
    } else {
        let governor_conf = GovernorConfigBuilder::default()
            .per_second(limits.requests_per_second.into())
            .burst_size(limits.burst)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .ok_or_else(invalid_rate_limit)?;
        router.layer(GovernorLayer {
            config: Arc::new(governor_conf),
        })
    };

    Ok(router)
}

fn invalid_rate_limit() -> AppError {
    AppError::Config("Rate limit needs a non-zero rate and burst".to_string())
}

/// Tracing, timeout, and request id without rate limiting (health probes)
pub fn apply_common_layers(router: Router<AppState>, timeout_secs: u64) -> Router<AppState> {
    router
        // Timeout (returns 503 Service Unavailable on timeout)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            Duration::from_secs(timeout_secs),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            header::HeaderName::from_static("x-ratelimit-limit"),
            header::HeaderName::from_static("x-ratelimit-remaining"),
            header::HeaderName::from_static("x-ratelimit-reset"),
        ]);

    // Development with no origins configured allows any origin
    if is_production || !config.allowed_origins.is_empty() {
        if config.allowed_origins.is_empty() {
            tracing::warn!(
                "CORS: No allowed origins configured in production mode. \
                 Requests from browsers will be blocked."
            );
            base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
        } else {
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter_map(|origin| {
                    origin.parse::<HeaderValue>().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin: {}", origin);
                        None
                    })
                })
                .collect();

            tracing::info!("CORS: Allowing {} configured origins", origins.len());
            base_layer.allow_origin(AllowOrigin::list(origins))
        }
    } else {
        tracing::warn!(
            "CORS: Allowing any origin (development mode). \
             Configure CORS_ALLOWED_ORIGINS for production."
        );
        base_layer.allow_origin(Any)
    }
}
