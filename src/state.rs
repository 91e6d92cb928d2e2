//! Typed views of on-chain marketplace accounts
//!
//! Accounts are stored with an 8-byte name-hash discriminator followed by a
//! borsh-encoded body. Decoding checks the discriminator before touching the
//! body so a wrong-type account surfaces as a layout error, not garbage
//! fields. Trailing bytes after the body are tolerated (accounts are
//! allocated at fixed size and zero-padded).

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

use crate::error::{GavelError, Result};

/// 8-byte account discriminator: `sha256("account:<Name>")[..8]`.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("account:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// A borsh account body with a known on-chain type name.
pub trait AccountData: BorshDeserialize {
    /// Account type name as declared by the on-chain program.
    const NAME: &'static str;

    fn discriminator() -> [u8; 8] {
        account_discriminator(Self::NAME)
    }

    /// Decode raw account bytes fetched from the ledger.
    fn decode(address: &Pubkey, data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(GavelError::deserialization(
                *address,
                format!("{} bytes, discriminator needs 8", data.len()),
            ));
        }
        if data[..8] != Self::discriminator() {
            return Err(GavelError::deserialization(
                *address,
                format!("discriminator mismatch, expected {}", Self::NAME),
            ));
        }
        let mut body = &data[8..];
        Self::deserialize(&mut body)
            .map_err(|e| GavelError::deserialization(*address, e.to_string()))
    }
}

/// Lifecycle of an auction as stored on chain.
///
/// The open/bid-period/buy-now phases are derived from the timing window,
/// not stored; only the settlement progress is persisted.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    /// Live or awaiting settlement.
    Open,
    /// Sale executed; proceeds still held in escrow.
    Settled,
    /// Proceeds paid out to the seller.
    Distributed,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Settled => "settled",
            Self::Distributed => "distributed",
        }
    }
}

/// The winning bid reference stored on the auction.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighestBid {
    /// Address of the winning [`BidAccount`].
    pub bid: Pubkey,
    /// Winning price in the smallest treasury-currency unit.
    pub price: u64,
}

/// On-chain auction record.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuctionAccount {
    pub seller: Pubkey,
    pub shop: Pubkey,
    pub nft_mint: Pubkey,
    pub treasury_mint: Pubkey,
    /// Unix timestamp at which bidding opens.
    pub start_time: i64,
    /// Length of the bidding window in seconds.
    pub bidding_period: i64,
    /// Minimum increment between successive bids.
    pub tick_size: u64,
    /// Lowest acceptable opening bid.
    pub starting_bid: u64,
    /// Instant-purchase price, if the seller configured one.
    pub buy_now_price: Option<u64>,
    /// Current winning bid; absent until the first bid lands.
    pub highest_bid: Option<HighestBid>,
    pub status: AuctionStatus,
}

impl AccountData for AuctionAccount {
    const NAME: &'static str = "Auction";
}

impl AuctionAccount {
    /// Unix timestamp at which the bidding window closes (inclusive).
    pub fn end_time(&self) -> i64 {
        self.start_time.saturating_add(self.bidding_period)
    }

    /// Whether `now` falls inside the live bidding window.
    pub fn bid_period_open(&self, now: i64) -> bool {
        now >= self.start_time && now <= self.end_time()
    }

    /// Whether the bidding window has closed. Settlement becomes possible
    /// only after this.
    pub fn has_ended(&self, now: i64) -> bool {
        now > self.end_time()
    }
}

/// On-chain bid record. Read-only to this SDK; bids are placed elsewhere.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct BidAccount {
    /// Back-reference to the auction, for lookup only.
    pub auction: Pubkey,
    pub buyer: Pubkey,
    /// Bid price in the smallest treasury-currency unit.
    pub price: u64,
    /// Unix timestamp at which the bid was placed.
    pub timestamp: i64,
}

impl AccountData for BidAccount {
    const NAME: &'static str = "Bid";
}
