//! Endpoint registry.
//!
//! # Responsibilities
//! - Collect endpoint declarations at startup
//! - Reject invalid paths and duplicate defaults before serving
//! - Select the endpoint for a request path
//!
//! # Design Decisions
//! - Immutable after `build()` (shared via Arc without locks)
//! - O(n) scan in declaration order; an exact match always wins over the
//!   default, wherever the default was declared
//! - Every configuration error is reported, not just the first

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::cipher::Ninja2Cipher;
use crate::error::{GatewayError, HandlerError};
use crate::format::{Format, Payload};
use crate::routing::matcher::PathPattern;
use crate::storage::Storage;

/// Per-request state available to handlers.
pub struct RequestContext<'a> {
    /// Path the request was made to.
    pub method: &'a str,
    pub storage: &'a dyn Storage,
    pub cipher: &'a Ninja2Cipher,
}

/// Endpoint handler.
pub type Handler =
    Arc<dyn Fn(Payload, &RequestContext<'_>) -> Result<Payload, HandlerError> + Send + Sync>;

/// How one endpoint is matched and transcoded.
#[derive(Clone)]
pub struct EndpointDescriptor {
    pub path: PathPattern,
    pub input: Format,
    pub output: Format,
    pub is_default: bool,
    pub handler: Handler,
}

impl fmt::Debug for EndpointDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointDescriptor")
            .field("path", &self.path)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}

/// Unvalidated declaration held by the builder.
struct Declaration {
    path: String,
    input: Format,
    output: Format,
    is_default: bool,
    handler: Handler,
}

/// Collects endpoint declarations.
#[derive(Default)]
pub struct RegistryBuilder {
    declarations: Vec<Declaration>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an endpoint.
    pub fn endpoint<F>(
        self,
        path: impl Into<String>,
        input: Format,
        output: Format,
        handler: F,
    ) -> Self
    where
        F: Fn(Payload, &RequestContext<'_>) -> Result<Payload, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.declare(path.into(), input, output, false, Arc::new(handler))
    }

    /// Declare the endpoint used when no path matches exactly.
    pub fn default_endpoint<F>(
        self,
        path: impl Into<String>,
        input: Format,
        output: Format,
        handler: F,
    ) -> Self
    where
        F: Fn(Payload, &RequestContext<'_>) -> Result<Payload, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.declare(path.into(), input, output, true, Arc::new(handler))
    }

    fn declare(
        mut self,
        path: String,
        input: Format,
        output: Format,
        is_default: bool,
        handler: Handler,
    ) -> Self {
        self.declarations.push(Declaration {
            path,
            input,
            output,
            is_default,
            handler,
        });
        self
    }

    /// Validate every declaration and freeze the registry.
    pub fn build(self) -> Result<Registry, GatewayError> {
        let mut errors = Vec::new();
        let mut endpoints = Vec::with_capacity(self.declarations.len());
        let mut default_path: Option<String> = None;
        let mut seen = HashSet::new();

        for decl in self.declarations {
            if decl.is_default {
                if let Some(first) = &default_path {
                    errors.push(format!(
                        "Multiple default endpoints found: {} and {}",
                        first, decl.path
                    ));
                } else {
                    default_path = Some(decl.path.clone());
                }
            }

            let path = match PathPattern::parse(decl.path) {
                Ok(path) => path,
                Err(e) => {
                    errors.push(e.to_string());
                    continue;
                }
            };

            if !seen.insert(path.clone()) {
                tracing::warn!(path = %path, "Duplicate endpoint path; first declaration wins");
            }

            endpoints.push(EndpointDescriptor {
                path,
                input: decl.input,
                output: decl.output,
                is_default: decl.is_default,
                handler: decl.handler,
            });
        }

        if !errors.is_empty() {
            return Err(GatewayError::Configuration(errors.join(", ")));
        }

        tracing::debug!(
            endpoints = endpoints.len(),
            default = default_path.as_deref().unwrap_or("none"),
            "Endpoint registry built"
        );
        Ok(Registry { endpoints })
    }
}

/// Frozen, ordered endpoint list.
#[derive(Debug)]
pub struct Registry {
    endpoints: Vec<EndpointDescriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Endpoint for `method`: an exact path match, else the default.
    pub fn select(&self, method: &str) -> Option<&EndpointDescriptor> {
        let mut fallback = None;
        for endpoint in &self.endpoints {
            if endpoint.path.matches(method) {
                return Some(endpoint);
            }
            if endpoint.is_default {
                fallback = Some(endpoint);
            }
        }
        fallback
    }

    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
