//! Catch-all default endpoint.
//!
//! Registered at `/` as the default, it answers any path without an exact
//! match with the `538.07` invalid-input error as XML instead of a 404.

use crate::error::{DomainError, HandlerError};
use crate::format::{Format, Payload};
use crate::routing::{RegistryBuilder, RequestContext};

pub const FALLBACK_PATH: &str = "/";

pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder.default_endpoint(FALLBACK_PATH, Format::Raw, Format::Xml, reject)
}

fn reject(_payload: Payload, ctx: &RequestContext<'_>) -> Result<Payload, HandlerError> {
    tracing::debug!(method = %ctx.method, "Unknown method answered by fallback");
    Err(DomainError::invalid_input().into())
}
