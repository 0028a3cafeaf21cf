//! Node query capability for the Tron SDK
//!
//! The SDK never owns network transport: everything that talks to a node
//! goes through the [`NodeClient`] trait, supplied by the caller. A thin
//! HTTP/JSON-RPC implementation is provided for convenience; swapping in
//! a different transport (or a mock in tests) is a one-trait job.

use async_trait::async_trait;
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
    rpc_params,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Node client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// RPC error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Outcome of a transaction's on-chain execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionResult {
    /// Transaction executed successfully
    Success,
    /// Transaction execution failed
    Failed {
        /// Node-reported failure message
        message: String,
    },
}

/// Receipt for a submitted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction id (hex)
    pub id: String,
    /// Execution outcome; `None` while the transaction is unconfirmed
    pub execution: Option<ExecutionResult>,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Energy consumed by execution
    pub energy_used: Option<u64>,
}

/// Basic node status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Current block height
    pub block_height: u64,
    /// Number of connected peers
    pub peer_count: usize,
    /// Node is still syncing
    pub syncing: bool,
}

/// Boundary to a Tron node for read-only queries
///
/// Implemented by [`HttpNodeClient`] for plain HTTP nodes and by mocks in
/// tests. Wallet-mediated operations (signing, broadcasting) live on
/// [`crate::wallet::WalletSource`] instead.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Fetch the receipt for a transaction, if the node knows it
    async fn get_transaction_receipt(&self, transaction_id: &str) -> Result<TransactionReceipt>;

    /// Fetch node status
    async fn get_node_info(&self) -> Result<NodeInfo>;

    /// Cheap liveness probe
    async fn ping(&self) -> Result<()>;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Node URL
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum request size in bytes
    pub max_request_size: u32,
    /// Maximum response size in bytes
    pub max_response_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: crate::config::TronMainnet::FULL_HOST.to_string(),
            timeout: Duration::from_secs(30),
            max_request_size: 10 * 1024 * 1024,  // 10 MB
            max_response_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// HTTP/JSON-RPC implementation of [`NodeClient`]
///
/// Deliberately retry-free: callers wanting retries wrap calls with
/// [`crate::network::retry`].
pub struct HttpNodeClient {
    client: HttpClient,
    config: ClientConfig,
}

impl HttpNodeClient {
    /// Create a client for the given node URL
    pub fn new(url: &str) -> Result<Self> {
        let config = ClientConfig {
            url: url.to_string(),
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = HttpClientBuilder::default()
            .request_timeout(config.timeout)
            .max_request_size(config.max_request_size)
            .max_response_size(config.max_response_size)
            .build(&config.url)
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn get_transaction_receipt(&self, transaction_id: &str) -> Result<TransactionReceipt> {
        let response: Option<TransactionReceipt> = self
            .client
            .request("tron_getTransactionReceipt", rpc_params![transaction_id])
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        response.ok_or_else(|| {
            ClientError::NotFound(format!("Transaction {} not found", transaction_id))
        })
    }

    async fn get_node_info(&self) -> Result<NodeInfo> {
        let response: NodeInfo = self
            .client
            .request("tron_getNodeInfo", rpc_params![])
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        Ok(response)
    }

    async fn ping(&self) -> Result<()> {
        let _info = self.get_node_info().await?;
        debug!(url = %self.config.url, "node ping ok");
        Ok(())
    }
}
