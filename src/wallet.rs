//! Wallet connection management for the Tron SDK
//!
//! Wallets are reached through an explicit [`WalletSource`] capability
//! with a defined unavailable state — never an ambient global. The SDK
//! holds connection state ([`WalletSession`]) and delegates everything
//! else (key custody, signing, broadcasting) to the source.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet is not installed or not reachable
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    /// The wallet is installed but locked
    #[error("Wallet locked")]
    Locked,

    /// The wallet is unlocked but exposes no account
    #[error("No account exposed by wallet")]
    NoAccount,

    /// No session is active
    #[error("Wallet not connected")]
    NotConnected,

    /// Connecting to the wallet failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Failure reported by the wallet source
    #[error("Wallet source error: {0}")]
    Source(String),
}

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Supported wallet kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletKind {
    /// TronLink browser extension wallet
    TronLink,
    /// Math Wallet
    MathWallet,
    /// Trust Wallet mobile wallet
    TrustWallet,
}

impl WalletKind {
    /// Get string representation of the wallet kind
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::TronLink => "tronlink",
            WalletKind::MathWallet => "mathwallet",
            WalletKind::TrustWallet => "trust",
        }
    }
}

/// Reachability of a wallet source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAvailability {
    /// Wallet is installed and unlocked
    Available,
    /// Wallet is installed but locked by the user
    Locked,
    /// Wallet is not installed or not reachable
    Unavailable,
}

/// Boundary to a concrete wallet
///
/// Supplied by the caller. Implementations wrap whatever the wallet
/// actually is — a browser extension bridge, a remote signer, a test
/// double — and own all cryptography.
#[async_trait]
pub trait WalletSource: Send + Sync {
    /// Which wallet this source fronts
    fn kind(&self) -> WalletKind;

    /// Probe whether the wallet can currently be used
    async fn availability(&self) -> WalletAvailability;

    /// The account the wallet currently exposes, if any
    async fn default_address(&self) -> Result<Option<String>>;

    /// Transfer `amount_sun` sun to `to`, returning the transaction id
    async fn send_trx(&self, to: &str, amount_sun: u64) -> Result<String>;
}

/// An established wallet connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSession {
    /// Kind of wallet connected
    pub kind: WalletKind,
    /// Connected account address (base58)
    pub address: String,
    /// Session id for the connection
    pub session_id: String,
    /// Timestamp when the wallet was connected (Unix seconds)
    pub connected_at: u64,
}

/// Connection state around an injected [`WalletSource`]
///
/// Mirrors the mount-time wallet setup of a UI binding layer: connect on
/// mount, hold the session, delegate sends, disconnect on unmount.
pub struct WalletConnection {
    source: Arc<dyn WalletSource>,
    session: Option<WalletSession>,
}

impl WalletConnection {
    /// Create an unconnected wrapper around a wallet source
    pub fn new(source: Arc<dyn WalletSource>) -> Self {
        Self {
            source,
            session: None,
        }
    }

    /// Establish a session with the wallet
    ///
    /// Fails with [`WalletError::Unavailable`] / [`WalletError::Locked`]
    /// when the wallet cannot be used, and [`WalletError::NoAccount`]
    /// when it exposes no account.
    pub async fn connect(&mut self) -> Result<&WalletSession> {
        match self.source.availability().await {
            WalletAvailability::Available => {}
            WalletAvailability::Locked => return Err(WalletError::Locked),
            WalletAvailability::Unavailable => {
                return Err(WalletError::Unavailable(
                    self.source.kind().as_str().to_string(),
                ))
            }
        }

        let address = self
            .source
            .default_address()
            .await?
            .ok_or(WalletError::NoAccount)?;

        let connected_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| WalletError::ConnectionFailed(e.to_string()))?;

        let session = WalletSession {
            kind: self.source.kind(),
            address,
            session_id: uuid::Uuid::new_v4().to_string(),
            connected_at,
        };

        info!(
            wallet = session.kind.as_str(),
            address = %session.address,
            "wallet connected"
        );

        Ok(&*self.session.insert(session))
    }

    /// Drop the active session, if any
    pub fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(wallet = session.kind.as_str(), "wallet disconnected");
        }
    }

    /// Whether a session is active
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    /// Send TRX through the connected wallet
    ///
    /// `amount_sun` is denominated in sun; use [`crate::units::to_sun`]
    /// to convert from TRX.
    pub async fn send_trx(&self, to: &str, amount_sun: u64) -> Result<String> {
        if self.session.is_none() {
            return Err(WalletError::NotConnected);
        }
        if !crate::units::is_address_like(to) {
            return Err(WalletError::InvalidAddress(to.to_string()));
        }
        self.source.send_trx(to, amount_sun).await
    }
}

/// Probe an ordered list of wallet sources and return the first that is
/// available
///
/// Replaces global-object sniffing: callers inject the sources they can
/// construct and detection walks them in preference order.
pub async fn detect_wallet(sources: &[Arc<dyn WalletSource>]) -> Option<WalletKind> {
    for source in sources {
        if source.availability().await == WalletAvailability::Available {
            return Some(source.kind());
        }
    }
    None
}
