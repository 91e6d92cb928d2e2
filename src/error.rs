//! Error taxonomy for the Gavel client SDK
//!
//! Every fallible path in the crate reports through [`GavelError`], so callers
//! can distinguish "you were outbid" from "network failure" from "insufficient
//! balance" without string matching. The taxonomy follows the settlement
//! lifecycle:
//! - precondition checks (validation, solvency)
//! - ledger reads (missing accounts, layout mismatches)
//! - transaction submission (network/ledger rejection)
//! - backend REST queries (HTTP status passthrough)

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GavelError>;

/// Broad error classification for logging and caller-side branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A business-rule precondition failed; never retried automatically.
    Validation,
    /// A solvency check failed before any transaction was built.
    InsufficientFunds,
    /// An expected ledger account is absent.
    NotFound,
    /// Account bytes do not match the expected layout; fatal, not retried.
    Deserialization,
    /// The network or ledger rejected a submission; caller-controlled retry.
    Submission,
    /// Malformed configuration or an unreachable derivation; fatal.
    Config,
    /// Backend REST failure.
    Api,
}

/// Error type for all SDK operations.
#[derive(Error, Debug)]
pub enum GavelError {
    /// The auction is not past its end condition, has no recorded highest
    /// bid, or was already settled.
    #[error("auction {auction} cannot be settled: {reason}")]
    AuctionNotSettleable { auction: Pubkey, reason: String },

    /// The current time falls outside the window the requested operation
    /// allows.
    #[error("bid period violation for auction {auction}: {reason}")]
    BidPeriodViolation { auction: Pubkey, reason: String },

    /// No buy-now price is configured, or an equal-or-higher bid exists.
    #[error("buy-now unavailable for auction {auction}: {reason}")]
    BuyNowUnavailable { auction: Pubkey, reason: String },

    /// The auction's stored status does not allow the requested phase, e.g.
    /// distributing proceeds before settlement.
    #[error("auction {auction} is {actual}, {expected} required")]
    InvalidAuctionState {
        auction: Pubkey,
        expected: &'static str,
        actual: &'static str,
    },

    /// The auction-house fee account cannot cover transaction/rent costs.
    ///
    /// Surfaced before any transaction is built to avoid wasted fees.
    #[error("fee account {account} holds {balance} lamports, {required} required")]
    InsufficientFeeBalance {
        account: Pubkey,
        balance: u64,
        required: u64,
    },

    /// The referenced account does not exist on the ledger. It may never have
    /// existed or may already have been consumed.
    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Account bytes did not match the expected layout or version.
    #[error("failed to deserialize account {address}: {reason}")]
    Deserialization { address: Pubkey, reason: String },

    /// The ledger or network rejected a transaction (insufficient funds,
    /// stale blockhash, simulation failure), or an RPC call failed in
    /// transport. The SDK performs no automatic retry; callers may retry a
    /// submission only after confirming the prior transaction is absent from
    /// the ledger.
    #[error("transaction submission failed: {reason}")]
    Submission { reason: String },

    /// No valid bump exists in the canonical search range for a seed tuple.
    ///
    /// Should not occur with well-formed seeds; treated as a fatal
    /// configuration error.
    #[error("no valid bump for {context} seeds")]
    BumpNotFound { context: &'static str },

    /// Malformed configuration value (unparseable program id, missing field).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Keypair file missing, malformed, or rejected.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend request failed with status {status}: {url}")]
    ApiStatus { status: u16, url: String },

    /// Transport-level backend failure (connect, timeout, body decode).
    #[error("backend transport error: {0}")]
    ApiTransport(#[from] reqwest::Error),

    /// The backend envelope reported failure or carried no result.
    #[error("backend response rejected: {0}")]
    ApiResponse(String),
}

impl GavelError {
    /// Classify this error for metrics and caller-side branching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuctionNotSettleable { .. }
            | Self::BidPeriodViolation { .. }
            | Self::BuyNowUnavailable { .. }
            | Self::InvalidAuctionState { .. } => ErrorKind::Validation,
            Self::InsufficientFeeBalance { .. } => ErrorKind::InsufficientFunds,
            Self::AccountNotFound(_) => ErrorKind::NotFound,
            Self::Deserialization { .. } => ErrorKind::Deserialization,
            Self::Submission { .. } => ErrorKind::Submission,
            Self::BumpNotFound { .. } | Self::InvalidConfig(_) | Self::Wallet(_) => {
                ErrorKind::Config
            }
            Self::ApiStatus { .. } | Self::ApiTransport(_) | Self::ApiResponse(_) => ErrorKind::Api,
        }
    }

    /// Whether retrying the operation might succeed.
    ///
    /// Validation and deserialization failures are deterministic and never
    /// retryable. Submission and transport failures may succeed on retry, but
    /// the caller must first confirm no duplicate side effect occurred.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Submission { .. } | Self::ApiTransport(_))
    }
}

// Convenience constructors for the checks and flows.
impl GavelError {
    pub fn not_settleable(auction: Pubkey, reason: impl Into<String>) -> Self {
        Self::AuctionNotSettleable {
            auction,
            reason: reason.into(),
        }
    }

    pub fn bid_period(auction: Pubkey, reason: impl Into<String>) -> Self {
        Self::BidPeriodViolation {
            auction,
            reason: reason.into(),
        }
    }

    pub fn buy_now_unavailable(auction: Pubkey, reason: impl Into<String>) -> Self {
        Self::BuyNowUnavailable {
            auction,
            reason: reason.into(),
        }
    }

    pub fn submission(reason: impl Into<String>) -> Self {
        Self::Submission {
            reason: reason.into(),
        }
    }

    pub fn deserialization(address: Pubkey, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            address,
            reason: reason.into(),
        }
    }
}

impl From<solana_client::client_error::ClientError> for GavelError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::Submission {
            reason: err.to_string(),
        }
    }
}
