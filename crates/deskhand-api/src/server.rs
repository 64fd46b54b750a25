//! Interface server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::error::InterfaceError;
use crate::http::routes::create_router;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct InterfaceConfig {
    pub host: String,
    pub port: u16,
}

impl InterfaceConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
        }
    }
}

pub struct InterfaceServer {
    config: InterfaceConfig,
    state: Arc<AppState>,
}

impl InterfaceServer {
    pub fn new(config: InterfaceConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), InterfaceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.state.clone());

        let addr_str = self.addr();
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|source| InterfaceError::InvalidAddress {
                addr: addr_str.clone(),
                source,
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| InterfaceError::Bind {
                addr: addr_str,
                source,
            })?;

        info!("Interface server listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Interface server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskhand_core::{CapabilityRegistry, Router};

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(Router::new(Arc::new(
            CapabilityRegistry::new(),
        )))))
    }

    #[test]
    fn test_interface_config_default() {
        let config = InterfaceConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8765);
    }

    #[test]
    fn test_interface_server_addr_format() {
        let server = InterfaceServer::new(InterfaceConfig::new("192.168.1.1", 443), state());
        assert_eq!(server.addr(), "192.168.1.1:443");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let server = InterfaceServer::new(InterfaceConfig::new("not a host", 1), state());
        let err = server.run(async {}).await.unwrap_err();
        assert!(matches!(err, InterfaceError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let server = InterfaceServer::new(InterfaceConfig::new("127.0.0.1", 0), state());
        server.run(async {}).await.unwrap();
    }
}
