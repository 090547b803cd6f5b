//! Ninja2 protocol gateway library.

// Protocol core
pub mod cipher;
pub mod format;
pub mod routing;
pub mod error;

// Collaborators and built-ins
pub mod endpoints;
pub mod storage;

// Transport and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use cipher::Ninja2Cipher;
pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Dispatcher, Registry};
