//! # Tron SDK
//!
//! Rust bindings for building applications against the Tron blockchain.
//!
//! This crate provides:
//! - Contract event subscription registry with per-pair deduplication
//! - Wallet connection management over injected wallet capabilities
//! - Contract handles with metadata-validated method/event dispatch
//! - Transaction status tracking
//! - Retry and latency utilities, TRX/sun conversion, network presets
//!
//! Cryptography, transaction signing, ABI encoding and network transport
//! are delegated to caller-supplied capabilities ([`events::EventSource`],
//! [`wallet::WalletSource`], [`contract::ContractCaller`],
//! [`client::NodeClient`]); the SDK owns state and lifecycle glue only.

#![warn(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod contract;
pub mod events;
pub mod network;
pub mod transaction;
pub mod units;
pub mod wallet;

pub use client::{
    ClientConfig, ClientError, ExecutionResult, HttpNodeClient, NodeClient, NodeInfo,
    Result as ClientResult, TransactionReceipt,
};
pub use config::{NetworkEnvironment, TronMainnet, TronNile, TronShasta};
pub use contract::{
    Contract, ContractAbi, ContractCaller, ContractError, Result as ContractResult,
};
pub use events::{
    ContractEvent, EventCallback, EventError, EventSource, Result as EventResult, SourceError,
    SubscriptionHandle, SubscriptionRegistry, WILDCARD_EVENT,
};
pub use network::{is_rate_limited, measure_latency, retry, RetryPolicy, RATE_LIMIT_STATUS};
pub use transaction::{track_transaction, TransactionStatus};
pub use units::{from_sun, is_address_like, to_sun, SUN_PER_TRX};
pub use wallet::{
    detect_wallet, Result as WalletResult, WalletAvailability, WalletConnection, WalletError,
    WalletKind, WalletSession, WalletSource,
};
