//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the cipher from config
//! - Open the storage collaborator
//! - Register endpoints and freeze the registry
//!
//! # Design Decisions
//! - Storage is opened before the registry is validated, and closed again
//!   if validation fails

use std::sync::Arc;

use crate::cipher::Ninja2Cipher;
use crate::config::GatewayConfig;
use crate::endpoints;
use crate::error::GatewayError;
use crate::routing::{Dispatcher, Registry, RegistryBuilder};
use crate::storage::{MemoryStorage, Storage};

/// Build a dispatcher serving only the built-in endpoints.
pub fn bootstrap(config: &GatewayConfig) -> Result<Dispatcher, GatewayError> {
    bootstrap_with(config, Arc::new(MemoryStorage::new()), Registry::builder())
}

/// Build a dispatcher over `storage`, adding the built-in endpoints to the
/// caller's `builder`.
pub fn bootstrap_with(
    config: &GatewayConfig,
    storage: Arc<dyn Storage>,
    builder: RegistryBuilder,
) -> Result<Dispatcher, GatewayError> {
    let cipher = Ninja2Cipher::new(config.cipher.key.clone())?;

    storage
        .open()
        .map_err(|e| GatewayError::Configuration(format!("storage: {e}")))?;

    let registry = match endpoints::register(builder, &config.endpoints).build() {
        Ok(registry) => registry,
        Err(e) => {
            if let Err(close_err) = storage.close() {
                tracing::warn!(error = %close_err, "Failed to close storage");
            }
            return Err(e);
        }
    };

    tracing::info!(
        endpoints = registry.len(),
        dev_tools = config.endpoints.dev_tools,
        fallback = config.endpoints.fallback,
        "Gateway bootstrapped"
    );

    Ok(Dispatcher::new(Arc::new(registry), storage, cipher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::storage::{Record, StorageError};

    #[test]
    fn test_bootstrap_opens_storage() {
        let mut config = GatewayConfig::default();
        config.endpoints.dev_tools = true;
        let dispatcher = bootstrap(&config).unwrap();

        assert_eq!(dispatcher.registry().len(), 3);
        assert!(dispatcher.storage().select("any", &Record::new(), None).is_ok());
    }

    #[test]
    fn test_bad_key_is_configuration_error() {
        let mut config = GatewayConfig::default();
        config.cipher.key = String::new();
        assert!(matches!(bootstrap(&config), Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_registry_failure_closes_storage() {
        let mut config = GatewayConfig::default();
        config.endpoints.fallback = true;
        let storage = Arc::new(MemoryStorage::new());
        let builder =
            Registry::builder().default_endpoint("/other", Format::Raw, Format::Raw, |p, _| Ok(p));

        let Err(err) = bootstrap_with(&config, storage.clone(), builder) else {
            panic!("expected registry failure");
        };
        assert!(matches!(
            err,
            GatewayError::Configuration(ref m) if m.contains("Multiple default")
        ));
        assert_eq!(
            storage.select("any", &Record::new(), None),
            Err(StorageError::Closed)
        );
    }
}
