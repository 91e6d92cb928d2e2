//! Assembled SDK client
//!
//! [`GavelClient`] binds the configuration, the ledger seams, the settlement
//! engine, and the backend REST client into one handle. It is generic over
//! the [`LedgerReader`] and [`TransactionSender`] seams so tests can run the
//! full flows against in-memory substitutes.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::api::BackendClient;
use crate::config::GavelConfig;
use crate::error::Result;
use crate::ledger::{AccountResolver, LedgerReader, RpcLedgerReader};
use crate::pda::AddressDeriver;
use crate::sequencer::{RpcTransactionSender, TransactionSender, TransactionSequencer, TwoPhaseReceipt};
use crate::settlement::{BuyNowParams, SettleAuctionParams, SettlementEngine};
use crate::state::{AuctionAccount, BidAccount};
use crate::treasury::TreasuryClassifier;

/// Client handle for one marketplace deployment.
pub struct GavelClient<L, S> {
    engine: SettlementEngine<L, S>,
    backend: BackendClient,
}

impl GavelClient<RpcLedgerReader, RpcTransactionSender> {
    /// RPC-backed client. Construction parses the config and builds the
    /// HTTP clients; nothing touches the network until a call is made.
    pub fn new(config: GavelConfig) -> Result<Self> {
        let reader = RpcLedgerReader::from_config(&config)?;
        let sender = RpcTransactionSender::from_config(&config)?;
        Self::with_components(config, reader, sender)
    }
}

impl<L: LedgerReader, S: TransactionSender> GavelClient<L, S> {
    /// Client over caller-supplied ledger seams.
    pub fn with_components(config: GavelConfig, reader: L, sender: S) -> Result<Self> {
        let deriver = AddressDeriver::from_config(&config)?;
        let backend = BackendClient::from_config(&config)?;
        let engine = SettlementEngine::new(
            AccountResolver::new(reader),
            deriver,
            TreasuryClassifier::new(),
            TransactionSequencer::new(sender),
        );
        Ok(Self { engine, backend })
    }

    /// Backend REST queries.
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Settle a finished auction and distribute the proceeds: two strictly
    /// sequenced transactions.
    pub async fn settle_and_distribute(
        &self,
        params: SettleAuctionParams<'_>,
    ) -> Result<TwoPhaseReceipt> {
        self.engine.settle_and_distribute(params).await
    }

    /// Resume an interrupted settlement by submitting the distribution
    /// transaction alone.
    pub async fn distribute_proceeds(&self, params: SettleAuctionParams<'_>) -> Result<Signature> {
        self.engine.distribute_proceeds(params).await
    }

    /// Instant purchase at the configured buy-now price.
    pub async fn buy_now(&self, params: BuyNowParams<'_>) -> Result<Signature> {
        self.engine.buy_now(params).await
    }

    /// Auction record for `(shop, nft_mint)`, resolved through the auction
    /// PDA.
    pub async fn fetch_auction(&self, shop: &Pubkey, nft_mint: &Pubkey) -> Result<AuctionAccount> {
        let auction = self.engine.deriver().auction(nft_mint, shop)?;
        self.engine.resolver().auction(&auction.address).await
    }

    /// Bid record a wallet holds on an auction.
    pub async fn fetch_bid(&self, auction: &Pubkey, wallet: &Pubkey) -> Result<BidAccount> {
        let bid = self.engine.deriver().bid(auction, wallet)?;
        self.engine.resolver().bid(&bid.address).await
    }
}
