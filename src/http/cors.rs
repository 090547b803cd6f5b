//! Cross-origin middleware.
//!
//! Mirrors the legacy server: the request `Origin` is echoed back with
//! credentials allowed, and an `OPTIONS` preflight is answered immediately
//! with an empty 200 before any endpoint lookup.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;

/// State required for CORS handling.
#[derive(Clone, Debug)]
pub struct CorsState {
    pub allow_methods: HeaderValue,
    pub max_age: HeaderValue,
}

impl CorsState {
    /// Build from config; an invalid methods value falls back to the legacy list.
    pub fn from_config(config: &CorsConfig) -> Self {
        let allow_methods = HeaderValue::from_str(&config.allow_methods)
            .unwrap_or_else(|_| HeaderValue::from_static("GET, POST, OPTIONS"));
        Self {
            allow_methods,
            max_age: HeaderValue::from(config.max_age_secs),
        }
    }
}

impl Default for CorsState {
    fn default() -> Self {
        Self::from_config(&CorsConfig::default())
    }
}

pub async fn cors_middleware(
    State(state): State<CorsState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req.headers().get(header::ORIGIN).cloned();

    // 1. Preflight short-circuits before dispatch
    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        if let Some(origin) = origin {
            allow_origin(headers, origin, &state);
        }
        if req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, state.allow_methods.clone());
        }
        if let Some(requested) = req.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        tracing::debug!(path = %req.uri().path(), "Answered CORS preflight");
        return response;
    }

    // 2. Everything else gets the origin echoed on the way out
    let mut response = next.run(req).await;
    if let Some(origin) = origin {
        allow_origin(response.headers_mut(), origin, &state);
    }
    response
}

fn allow_origin(headers: &mut HeaderMap, origin: HeaderValue, state: &CorsState) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, state.max_age.clone());
}
