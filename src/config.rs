//! Tron network configuration
//!
//! Well-known endpoints and chain constants for the networks the SDK
//! targets:
//! - Mainnet: https://api.trongrid.io
//! - Shasta testnet: https://api.shasta.trongrid.io
//! - Nile testnet: https://nile.trongrid.io

/// Tron mainnet configuration
pub struct TronMainnet;

impl TronMainnet {
    /// Full node endpoint URL
    pub const FULL_HOST: &'static str = "https://api.trongrid.io";

    /// Explorer URL
    pub const EXPLORER_URL: &'static str = "https://tronscan.org";

    /// Network name
    pub const NETWORK_NAME: &'static str = "Tron Mainnet";

    /// Network symbol
    pub const NETWORK_SYMBOL: &'static str = "TRX";

    /// Decimals (1 TRX = 10^6 sun)
    pub const DECIMALS: u8 = 6;

    /// Block time in seconds
    pub const BLOCK_TIME: u64 = 3;

    /// Get full node endpoint with optional custom URL
    pub fn full_host(custom: Option<&str>) -> String {
        custom.unwrap_or(Self::FULL_HOST).to_string()
    }

    /// Get full explorer transaction URL
    pub fn explorer_tx_url(tx_id: &str) -> String {
        format!("{}/#/transaction/{}", Self::EXPLORER_URL, tx_id)
    }

    /// Get full explorer address URL
    pub fn explorer_address_url(address: &str) -> String {
        format!("{}/#/address/{}", Self::EXPLORER_URL, address)
    }

    /// Get full explorer block URL
    pub fn explorer_block_url(block_number: u64) -> String {
        format!("{}/#/block/{}", Self::EXPLORER_URL, block_number)
    }
}

/// Shasta testnet configuration
pub struct TronShasta;

impl TronShasta {
    /// Full node endpoint URL
    pub const FULL_HOST: &'static str = "https://api.shasta.trongrid.io";

    /// Explorer URL
    pub const EXPLORER_URL: &'static str = "https://shasta.tronscan.org";

    /// Network name
    pub const NETWORK_NAME: &'static str = "Tron Shasta Testnet";

    /// Network symbol
    pub const NETWORK_SYMBOL: &'static str = "TRX";

    /// Decimals (1 TRX = 10^6 sun)
    pub const DECIMALS: u8 = 6;

    /// Block time in seconds
    pub const BLOCK_TIME: u64 = 3;
}

/// Nile testnet configuration
pub struct TronNile;

impl TronNile {
    /// Full node endpoint URL
    pub const FULL_HOST: &'static str = "https://nile.trongrid.io";

    /// Explorer URL
    pub const EXPLORER_URL: &'static str = "https://nile.tronscan.org";

    /// Network name
    pub const NETWORK_NAME: &'static str = "Tron Nile Testnet";

    /// Network symbol
    pub const NETWORK_SYMBOL: &'static str = "TRX";

    /// Decimals (1 TRX = 10^6 sun)
    pub const DECIMALS: u8 = 6;

    /// Block time in seconds
    pub const BLOCK_TIME: u64 = 3;
}

/// Network environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEnvironment {
    /// Tron mainnet
    Mainnet,
    /// Shasta testnet
    Shasta,
    /// Nile testnet
    Nile,
}

impl NetworkEnvironment {
    /// Get full node endpoint for this environment
    pub fn full_host(&self) -> &'static str {
        match self {
            NetworkEnvironment::Mainnet => TronMainnet::FULL_HOST,
            NetworkEnvironment::Shasta => TronShasta::FULL_HOST,
            NetworkEnvironment::Nile => TronNile::FULL_HOST,
        }
    }

    /// Get explorer URL for this environment
    pub fn explorer_url(&self) -> &'static str {
        match self {
            NetworkEnvironment::Mainnet => TronMainnet::EXPLORER_URL,
            NetworkEnvironment::Shasta => TronShasta::EXPLORER_URL,
            NetworkEnvironment::Nile => TronNile::EXPLORER_URL,
        }
    }

    /// Get network name for this environment
    pub fn network_name(&self) -> &'static str {
        match self {
            NetworkEnvironment::Mainnet => TronMainnet::NETWORK_NAME,
            NetworkEnvironment::Shasta => TronShasta::NETWORK_NAME,
            NetworkEnvironment::Nile => TronNile::NETWORK_NAME,
        }
    }

    /// Get network symbol for this environment
    pub fn network_symbol(&self) -> &'static str {
        match self {
            NetworkEnvironment::Mainnet => TronMainnet::NETWORK_SYMBOL,
            NetworkEnvironment::Shasta => TronShasta::NETWORK_SYMBOL,
            NetworkEnvironment::Nile => TronNile::NETWORK_SYMBOL,
        }
    }

    /// Get decimals for this environment
    pub fn decimals(&self) -> u8 {
        match self {
            NetworkEnvironment::Mainnet => TronMainnet::DECIMALS,
            NetworkEnvironment::Shasta => TronShasta::DECIMALS,
            NetworkEnvironment::Nile => TronNile::DECIMALS,
        }
    }

    /// Get block time in seconds for this environment
    pub fn block_time(&self) -> u64 {
        match self {
            NetworkEnvironment::Mainnet => TronMainnet::BLOCK_TIME,
            NetworkEnvironment::Shasta => TronShasta::BLOCK_TIME,
            NetworkEnvironment::Nile => TronNile::BLOCK_TIME,
        }
    }
}
