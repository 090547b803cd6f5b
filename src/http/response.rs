//! Response rendering.
//!
//! # Responsibilities
//! - Write protocol responses with the endpoint's content type
//! - Map gateway errors to plain HTTP failures
//!
//! # Design Decisions
//! - NotFound and unexpected failures are plain text, never legacy XML
//! - Internal details are logged, not sent to the client

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;
use crate::routing::GatewayResponse;

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

impl GatewayError {
    /// HTTP status used when this error reaches the transport.
    ///
    /// Input and domain failures never get here: the dispatcher answers
    /// them with an error envelope.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            GatewayError::NotFound(method) => format!("Method Not Found: {method}"),
            _ => "Internal Server Error".to_string(),
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_not_found_is_plain_text() {
        let response = GatewayError::NotFound("/cf-nothing.asp".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "Method Not Found: /cf-nothing.asp");
    }

    #[tokio::test]
    async fn test_unexpected_hides_details() {
        let response = GatewayError::Unexpected("secret table missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "Internal Server Error");
    }
}
