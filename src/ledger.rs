//! Ledger reads and typed account resolution
//!
//! [`LedgerReader`] is the narrow seam to the ledger: raw bytes per address
//! plus lamport balances. [`AccountResolver`] sits on top and maps bytes to
//! the typed records in [`crate::state`]. Absence and layout mismatches are
//! distinct errors because callers branch differently on them. No retries at
//! this layer.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::debug;

use crate::config::GavelConfig;
use crate::error::{GavelError, Result};
use crate::state::{AccountData, AuctionAccount, BidAccount};

/// Read access to ledger account state.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Raw data bytes of the account, or `None` if the account is absent.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Lamport balance of the account; 0 when absent.
    async fn balance(&self, address: &Pubkey) -> Result<u64>;
}

/// [`LedgerReader`] over a JSON-RPC node.
pub struct RpcLedgerReader {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedgerReader {
    pub fn new(endpoint: String, commitment: CommitmentConfig, timeout: Duration) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(endpoint, timeout, commitment),
            commitment,
        }
    }

    pub fn from_config(config: &GavelConfig) -> Result<Self> {
        Ok(Self::new(
            config.rpc.endpoint.clone(),
            config.commitment()?,
            Duration::from_secs(config.rpc.timeout_secs),
        ))
    }
}

#[async_trait]
impl LedgerReader for RpcLedgerReader {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(GavelError::from)?;
        Ok(response.value.map(|account| account.data))
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        let response = self
            .client
            .get_balance_with_commitment(address, self.commitment)
            .await
            .map_err(GavelError::from)?;
        Ok(response.value)
    }
}

/// Typed account reads over any [`LedgerReader`].
pub struct AccountResolver<L> {
    reader: L,
}

impl<L: LedgerReader> AccountResolver<L> {
    pub fn new(reader: L) -> Self {
        Self { reader }
    }

    async fn resolve<T: AccountData>(&self, address: &Pubkey) -> Result<T> {
        let data = self
            .reader
            .account_data(address)
            .await?
            .ok_or(GavelError::AccountNotFound(*address))?;
        debug!(%address, kind = T::NAME, len = data.len(), "resolved account");
        T::decode(address, &data)
    }

    /// Auction record at `address`.
    pub async fn auction(&self, address: &Pubkey) -> Result<AuctionAccount> {
        self.resolve(address).await
    }

    /// Bid record at `address`.
    pub async fn bid(&self, address: &Pubkey) -> Result<BidAccount> {
        self.resolve(address).await
    }

    /// Lamport balance of `address`.
    pub async fn balance(&self, address: &Pubkey) -> Result<u64> {
        self.reader.balance(address).await
    }
}
