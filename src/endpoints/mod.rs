//! Built-in endpoints.
//!
//! Game handlers live outside this crate and are registered by the
//! embedding binary. The endpoints here ship with the gateway itself and
//! are switched on in the `[endpoints]` config section.

pub mod dev;
pub mod fallback;

use crate::config::EndpointsConfig;
use crate::routing::RegistryBuilder;

/// Add the built-in endpoints enabled in `config` to `builder`.
pub fn register(mut builder: RegistryBuilder, config: &EndpointsConfig) -> RegistryBuilder {
    if config.dev_tools {
        builder = dev::register(builder);
    }
    if config.fallback {
        builder = fallback::register(builder);
    }
    builder
}
