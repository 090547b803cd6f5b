//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use ninja2_gateway::config::GatewayConfig;
use ninja2_gateway::http::HttpServer;
use ninja2_gateway::lifecycle::{bootstrap_with, Shutdown};
use ninja2_gateway::routing::RegistryBuilder;
use ninja2_gateway::storage::MemoryStorage;

/// A gateway serving on a local ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gateway with `builder`'s endpoints plus the built-ins `config` enables.
pub async fn start_gateway(config: GatewayConfig, builder: RegistryBuilder) -> TestGateway {
    let dispatcher =
        bootstrap_with(&config, std::sync::Arc::new(MemoryStorage::new()), builder).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, dispatcher);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestGateway { addr, shutdown }
}
