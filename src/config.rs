//! Configuration for the Gavel client SDK
//!
//! All environment-dependent values (program ids, RPC endpoint, backend base
//! URL, wallet path) are carried in [`GavelConfig`] and passed explicitly to
//! the components that need them. There are no module-level mutable globals;
//! two clients with different configs can coexist in one process.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::error::{GavelError, Result};

/// Deployed marketplace program (creates shops and auctions).
pub const MARKETPLACE_PROGRAM_ID: &str = "2vb4dzKqEzf5GxA8wLAaNat798B9hMJC34zf41hT3VEx";

/// Deployed auction-house program (escrow, trade states, sale execution).
pub const AUCTION_HOUSE_PROGRAM_ID: &str = "75xYLC6GEfCdnXRFAGDeGZrndjNv6cpgi9mPDcrXsTAq";

/// Minimum lamport balance the auction-house fee account must hold before
/// any settlement or purchase is attempted (0.05 SOL).
pub const FEE_ACCOUNT_MIN_BALANCE: u64 = 50_000_000;

/// Main SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GavelConfig {
    /// On-chain program addresses
    #[serde(default)]
    pub programs: ProgramConfig,

    /// RPC endpoint configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Backend REST configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Marketplace program id (base58)
    #[serde(default = "default_marketplace_program")]
    pub marketplace: String,

    /// Auction-house program id (base58)
    #[serde(default = "default_auction_house_program")]
    pub auction_house: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_endpoint")]
    pub endpoint: String,

    /// Commitment level: processed, confirmed, or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend base URL, no trailing slash
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Page size for internally paginated queries
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file (raw 64-byte or JSON byte array)
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

// Default value functions
fn default_marketplace_program() -> String {
    MARKETPLACE_PROGRAM_ID.to_string()
}
fn default_auction_house_program() -> String {
    AUCTION_HOUSE_PROGRAM_ID.to_string()
}
fn default_rpc_endpoint() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}
fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_backend_url() -> String {
    "https://api.gavel.market".to_string()
}
fn default_page_limit() -> u32 {
    10
}
fn default_keypair_path() -> String {
    "~/.config/solana/id.json".to_string()
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            marketplace: default_marketplace_program(),
            auction_house: default_auction_house_program(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rpc_endpoint(),
            commitment: default_commitment(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout(),
            page_limit: default_page_limit(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
        }
    }
}

impl Default for GavelConfig {
    fn default() -> Self {
        Self {
            programs: ProgramConfig::default(),
            rpc: RpcConfig::default(),
            backend: BackendConfig::default(),
            wallet: WalletConfig::default(),
        }
    }
}

impl GavelConfig {
    /// Load configuration from a TOML file. Missing fields fall back to
    /// mainnet defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GavelError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            GavelError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Mainnet configuration.
    pub fn mainnet() -> Self {
        Self::default()
    }

    /// Devnet configuration: same program ids, devnet RPC and backend.
    pub fn devnet() -> Self {
        Self {
            rpc: RpcConfig {
                endpoint: "https://api.devnet.solana.com".to_string(),
                ..RpcConfig::default()
            },
            backend: BackendConfig {
                base_url: "https://api.devnet.gavel.market".to_string(),
                ..BackendConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parsed marketplace program id.
    pub fn marketplace_program(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.programs.marketplace).map_err(|e| {
            GavelError::InvalidConfig(format!(
                "bad marketplace program id {}: {e}",
                self.programs.marketplace
            ))
        })
    }

    /// Parsed auction-house program id.
    pub fn auction_house_program(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.programs.auction_house).map_err(|e| {
            GavelError::InvalidConfig(format!(
                "bad auction house program id {}: {e}",
                self.programs.auction_house
            ))
        })
    }

    /// Commitment level for RPC reads and confirmations.
    pub fn commitment(&self) -> Result<CommitmentConfig> {
        match self.rpc.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(GavelError::InvalidConfig(format!(
                "unknown commitment level: {other}"
            ))),
        }
    }
}
