//! Request dispatch.
//!
//! # Responsibilities
//! - Select the endpoint for a request path
//! - Decode the body, run the handler, encode the result
//! - Turn domain and input failures into legacy error envelopes
//!
//! # Design Decisions
//! - Synchronous and stateless; the only shared state is the frozen
//!   registry and the storage handle
//! - Unexpected failures are returned to the transport untouched so they
//!   never masquerade as protocol errors

use std::sync::Arc;

use axum::body::Bytes;

use crate::cipher::Ninja2Cipher;
use crate::error::GatewayError;
use crate::format::{ErrorEnvelope, Payload};
use crate::routing::registry::{Registry, RequestContext};
use crate::storage::Storage;

/// How a dispatched request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    DomainError,
    InvalidInput,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::DomainError => "domain_error",
            Outcome::InvalidInput => "invalid_input",
        }
    }
}

/// Encoded response ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// Path pattern of the endpoint that handled the request.
    pub endpoint: String,
    pub content_type: &'static str,
    pub body: Bytes,
    pub outcome: Outcome,
}

/// Dispatches requests through the registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    storage: Arc<dyn Storage>,
    cipher: Ninja2Cipher,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, storage: Arc<dyn Storage>, cipher: Ninja2Cipher) -> Self {
        Self {
            registry,
            storage,
            cipher,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Handle one request made to `method` with `body`.
    pub fn dispatch(&self, method: &str, body: &[u8]) -> Result<GatewayResponse, GatewayError> {
        let endpoint = self
            .registry
            .select(method)
            .ok_or_else(|| GatewayError::NotFound(method.to_string()))?;

        let ctx = RequestContext {
            method,
            storage: self.storage.as_ref(),
            cipher: &self.cipher,
        };

        let result = endpoint
            .input
            .decode(body, &self.cipher)
            .map_err(GatewayError::from)
            .and_then(|payload| (endpoint.handler)(payload, &ctx).map_err(GatewayError::from));

        let (payload, outcome): (Payload, Outcome) = match result {
            Ok(payload) => (payload, Outcome::Success),
            Err(GatewayError::Domain(e)) => {
                tracing::info!(
                    method = %method,
                    code = %e.code,
                    reason = %e.reason,
                    "Domain error"
                );
                (ErrorEnvelope::from(e).into_payload(endpoint.output), Outcome::DomainError)
            }
            Err(GatewayError::InvalidInputFormat { format, reason, body }) => {
                tracing::warn!(
                    method = %method,
                    format = %format,
                    reason = %reason,
                    body = %body,
                    "Invalid input"
                );
                (
                    ErrorEnvelope::invalid_input().into_payload(endpoint.output),
                    Outcome::InvalidInput,
                )
            }
            Err(other) => return Err(other),
        };

        let envelope = endpoint.output.encode(payload, &self.cipher)?;
        Ok(GatewayResponse {
            endpoint: endpoint.path.to_string(),
            content_type: envelope.content_type(),
            body: envelope.into_body(),
            outcome,
        })
    }
}
