//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over TCP. Binds to localhost unless told otherwise.

use crate::handler::RpcHandler;
use crate::types::{
    CreateProductRequest, LookupRequest, PurgeRequest, QueueRequest, ResolveRequest, StatsRequest,
};
use claimq_core::application::ClaimService;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9531;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<ClaimService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (useful with port 0) and the handle that
    /// stops the server.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        // Producer
        let handler = self.handler.clone();
        module
            .register_async_method("product.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateProductRequest = params.parse()?;
                    handler.create_product(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Resolver
        let handler = self.handler.clone();
        module
            .register_async_method("claim.resolve.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ResolveRequest = params.parse()?;
                    handler.resolve(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("claim.lookup.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: LookupRequest = params.parse()?;
                    handler.lookup(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Queue inspection
        let handler = self.handler.clone();
        module
            .register_async_method("queue.pending.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueRequest = params.parse()?;
                    handler.pending(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.clear.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueRequest = params.parse()?;
                    handler.clear(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin
        let handler = self.handler.clone();
        module
            .register_async_method("admin.purge.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Parameterless calls may omit params entirely
                    let req: PurgeRequest = match params.as_str() {
                        Some(_) => params.parse()?,
                        None => PurgeRequest::default(),
                    };
                    handler.purge(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Parameterless calls may omit params entirely
                    let req: StatsRequest = match params.as_str() {
                        Some(_) => params.parse()?,
                        None => StatsRequest::default(),
                    };
                    handler.stats(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}
