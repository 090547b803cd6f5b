//! HTTP transport.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign request ID)
//!     → cors.rs (answer preflight, echo Origin)
//!     → server.rs (catch-all handler)
//!     → [routing::Dispatcher selects endpoint and transcodes]
//!     → response.rs (content type, plain-text failures)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod server;

pub use cors::CorsState;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
