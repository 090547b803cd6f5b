//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, body)
//!     → registry.rs (endpoint lookup: exact path, else default)
//!     → dispatcher.rs (decode → handler → encode)
//!     → GatewayResponse, or NotFound / Configuration / Unexpected
//!
//! Registry compilation (at startup):
//!     endpoint declarations
//!     → matcher.rs (validate path patterns)
//!     → reject duplicate defaults
//!     → freeze as immutable Registry
//! ```
//!
//! # Design Decisions
//! - Endpoints are declared by direct registration calls, no reflection
//! - Registry is immutable at runtime
//! - Deterministic: same path always selects the same endpoint

pub mod dispatcher;
pub mod matcher;
pub mod registry;

pub use dispatcher::{Dispatcher, GatewayResponse, Outcome};
pub use matcher::PathPattern;
pub use registry::{EndpointDescriptor, Handler, Registry, RegistryBuilder, RequestContext};
