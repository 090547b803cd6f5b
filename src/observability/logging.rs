//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the log level from the environment, else from config
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Initializing twice is not an error (tests share one process)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.log_level));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("ninja2_gateway={level},tower_http={level}"))
        .unwrap_or_else(|_| EnvFilter::new("ninja2_gateway=info,tower_http=info"))
}
