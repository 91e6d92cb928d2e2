//! Shared fixtures: in-memory ledger, recording transaction sender, and
//! auction account builders used across the flow tests.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use async_trait::async_trait;
use borsh::BorshSerialize;
use chrono::Utc;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gavel_sdk::config::{GavelConfig, FEE_ACCOUNT_MIN_BALANCE};
use gavel_sdk::error::{GavelError, Result};
use gavel_sdk::ledger::LedgerReader;
use gavel_sdk::pda::AddressDeriver;
use gavel_sdk::sequencer::TransactionSender;
use gavel_sdk::state::{AccountData, AuctionAccount, AuctionStatus, BidAccount, HighestBid};

/// Log capture for failing tests; safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Ledger backed by two maps: account bytes and lamport balances.
pub struct MockLedger {
    pub accounts: HashMap<Pubkey, Vec<u8>>,
    pub balances: HashMap<Pubkey, u64>,
}

#[async_trait]
impl LedgerReader for MockLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.accounts.get(address).cloned())
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.balances.get(address).copied().unwrap_or(0))
    }
}

/// Sender that records every submitted batch and optionally fails one call.
/// The handles stay valid after the sender moves into a client.
pub struct RecordingSender {
    fail_on_call: Option<usize>,
    calls: Arc<Mutex<Vec<Vec<Instruction>>>>,
    attempts: Arc<AtomicUsize>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self {
            fail_on_call: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_call(index: usize) -> Self {
        Self {
            fail_on_call: Some(index),
            ..Self::new()
        }
    }

    /// Batches that were accepted, in submission order.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<Vec<Instruction>>>> {
        self.calls.clone()
    }

    /// Total submit attempts, including failed ones.
    pub fn attempts_handle(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

#[async_trait]
impl TransactionSender for RecordingSender {
    async fn submit(&self, instructions: &[Instruction], _signer: &Keypair) -> Result<Signature> {
        let call = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            return Err(GavelError::submission("simulated rejection"));
        }
        self.calls.lock().unwrap().push(instructions.to_vec());
        Ok(Signature::from([call as u8 + 1; 64]))
    }
}

/// Account bytes with the type discriminator prefix.
pub fn encode_account<T: AccountData + BorshSerialize>(value: &T) -> Vec<u8> {
    let mut bytes = T::discriminator().to_vec();
    bytes.extend(borsh::to_vec(value).unwrap());
    bytes
}

/// A full marketplace scene: one auction with one recorded bid, the fee
/// account funded, everything derivable from the default config.
pub struct Scene {
    pub config: GavelConfig,
    pub deriver: AddressDeriver,
    pub shop: Pubkey,
    pub treasury_mint: Pubkey,
    pub nft_mint: Pubkey,
    pub metadata: Pubkey,
    pub seller: Pubkey,
    pub buyer: Pubkey,
    pub auction_address: Pubkey,
    pub auction_house: Pubkey,
    pub fee_account: Pubkey,
    pub auction: AuctionAccount,
    pub bid_address: Pubkey,
    pub bid: BidAccount,
}

impl Scene {
    /// Auction that ended an hour ago with a winning bid of `bid_price`.
    pub fn ended_auction(treasury_mint: Pubkey, bid_price: u64) -> Self {
        Self::build(treasury_mint, Some(bid_price), None, -7_200)
    }

    /// Live auction (started 10 minutes ago, an hour to go), optionally
    /// with a standing bid and a buy-now price.
    pub fn live_auction(
        treasury_mint: Pubkey,
        bid_price: Option<u64>,
        buy_now_price: Option<u64>,
    ) -> Self {
        Self::build(treasury_mint, bid_price, buy_now_price, -600)
    }

    fn build(
        treasury_mint: Pubkey,
        bid_price: Option<u64>,
        buy_now_price: Option<u64>,
        start_offset: i64,
    ) -> Self {
        let config = GavelConfig::default();
        let deriver = AddressDeriver::from_config(&config).unwrap();

        let shop = Pubkey::new_unique();
        let nft_mint = Pubkey::new_unique();
        let seller = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();

        let auction_address = deriver.auction(&nft_mint, &shop).unwrap().address;
        let auction_house = deriver.auction_house(&shop, &treasury_mint).unwrap().address;
        let fee_account = deriver
            .auction_house_fee_account(&auction_house)
            .unwrap()
            .address;
        let bid_address = deriver.bid(&auction_address, &buyer).unwrap().address;

        let now = Utc::now().timestamp();
        let auction = AuctionAccount {
            seller,
            shop,
            nft_mint,
            treasury_mint,
            start_time: now + start_offset,
            bidding_period: 3_600,
            tick_size: 10_000,
            starting_bid: 100_000,
            buy_now_price,
            highest_bid: bid_price.map(|price| HighestBid {
                bid: bid_address,
                price,
            }),
            status: AuctionStatus::Open,
        };
        let bid = BidAccount {
            auction: auction_address,
            buyer,
            price: bid_price.unwrap_or(0),
            timestamp: now + start_offset,
        };

        Self {
            config,
            deriver,
            shop,
            treasury_mint,
            nft_mint,
            metadata: Pubkey::new_unique(),
            seller,
            buyer,
            auction_address,
            auction_house,
            fee_account,
            auction,
            bid_address,
            bid,
        }
    }

    /// Ledger holding the scene's accounts with a funded fee account.
    pub fn ledger(&self) -> MockLedger {
        MockLedger {
            accounts: HashMap::from([
                (self.auction_address, encode_account(&self.auction)),
                (self.bid_address, encode_account(&self.bid)),
            ]),
            balances: HashMap::from([(self.fee_account, FEE_ACCOUNT_MIN_BALANCE)]),
        }
    }
}
