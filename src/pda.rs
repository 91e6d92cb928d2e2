//! Deterministic address derivation
//!
//! Every program-owned account the marketplace touches lives at an address
//! derived from a fixed seed tuple. [`AddressDeriver`] recomputes those
//! addresses on demand; the same inputs always yield the same
//! `(address, bump)` pair, so nothing here is cached or persisted.
//!
//! Derivation is pure and never touches the network. A seed tuple with no
//! valid bump in the canonical search range is reported as
//! [`GavelError::BumpNotFound`]; with well-formed seeds this does not happen.

use solana_sdk::pubkey::Pubkey;

use crate::config::GavelConfig;
use crate::error::{GavelError, Result};

/// Seed literals for every PDA family the SDK derives.
pub mod seeds {
    /// Shared prefix for all auction-house program PDAs.
    pub const AUCTION_HOUSE: &[u8] = b"auction_house";
    /// Suffix for the program-as-signer PDA.
    pub const SIGNER: &[u8] = b"signer";
    /// Suffix for the auction-house fee account.
    pub const FEE_PAYER: &[u8] = b"fee_payer";
    /// Suffix for the auction-house treasury.
    pub const TREASURY: &[u8] = b"treasury";
    /// Marketplace shop PDA.
    pub const SHOP: &[u8] = b"shop";
    /// Marketplace auction PDA.
    pub const AUCTION: &[u8] = b"auction";
    /// Marketplace bid record PDA.
    pub const BID: &[u8] = b"bid";
    /// Marketplace bid escrow wallet PDA.
    pub const BID_WALLET: &[u8] = b"bid_wallet";
}

/// NFT sales always move exactly one token.
pub const TRADE_SIZE: u64 = 1;

/// A derived program address with its bump seed.
///
/// The bump is part of several instruction argument tuples, so it travels
/// with the address instead of being re-derived at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Derives every PDA family for one (marketplace, auction-house) deployment.
#[derive(Debug, Clone, Copy)]
pub struct AddressDeriver {
    marketplace_program: Pubkey,
    auction_house_program: Pubkey,
}

impl AddressDeriver {
    pub fn new(marketplace_program: Pubkey, auction_house_program: Pubkey) -> Self {
        Self {
            marketplace_program,
            auction_house_program,
        }
    }

    pub fn from_config(config: &GavelConfig) -> Result<Self> {
        Ok(Self::new(
            config.marketplace_program()?,
            config.auction_house_program()?,
        ))
    }

    pub fn marketplace_program(&self) -> Pubkey {
        self.marketplace_program
    }

    pub fn auction_house_program(&self) -> Pubkey {
        self.auction_house_program
    }

    fn derive(
        &self,
        program: &Pubkey,
        seed_parts: &[&[u8]],
        context: &'static str,
    ) -> Result<DerivedAddress> {
        Pubkey::try_find_program_address(seed_parts, program)
            .map(|(address, bump)| DerivedAddress { address, bump })
            .ok_or(GavelError::BumpNotFound { context })
    }

    /// Shop PDA: `["shop", creator, treasury_mint]` under the marketplace
    /// program.
    pub fn shop(&self, creator: &Pubkey, treasury_mint: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.marketplace_program,
            &[seeds::SHOP, creator.as_ref(), treasury_mint.as_ref()],
            "shop",
        )
    }

    /// Auction PDA: `["auction", nft_mint, shop]` under the marketplace
    /// program.
    pub fn auction(&self, nft_mint: &Pubkey, shop: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.marketplace_program,
            &[seeds::AUCTION, nft_mint.as_ref(), shop.as_ref()],
            "auction",
        )
    }

    /// Bid record PDA: `["bid", auction, wallet]`.
    pub fn bid(&self, auction: &Pubkey, wallet: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.marketplace_program,
            &[seeds::BID, auction.as_ref(), wallet.as_ref()],
            "bid",
        )
    }

    /// Bid escrow wallet PDA: `["bid_wallet", auction, wallet]`. Holds the
    /// bidder's locked funds until settlement or cancellation.
    pub fn bid_wallet(&self, auction: &Pubkey, wallet: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.marketplace_program,
            &[seeds::BID_WALLET, auction.as_ref(), wallet.as_ref()],
            "bid_wallet",
        )
    }

    /// Auction-house instance PDA: `["auction_house", authority,
    /// treasury_mint]`.
    pub fn auction_house(
        &self,
        authority: &Pubkey,
        treasury_mint: &Pubkey,
    ) -> Result<DerivedAddress> {
        self.derive(
            &self.auction_house_program,
            &[
                seeds::AUCTION_HOUSE,
                authority.as_ref(),
                treasury_mint.as_ref(),
            ],
            "auction_house",
        )
    }

    /// Fee account PDA: `["auction_house", auction_house, "fee_payer"]`.
    pub fn auction_house_fee_account(&self, auction_house: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.auction_house_program,
            &[
                seeds::AUCTION_HOUSE,
                auction_house.as_ref(),
                seeds::FEE_PAYER,
            ],
            "auction_house_fee_account",
        )
    }

    /// Treasury PDA: `["auction_house", auction_house, "treasury"]`.
    pub fn auction_house_treasury(&self, auction_house: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.auction_house_program,
            &[
                seeds::AUCTION_HOUSE,
                auction_house.as_ref(),
                seeds::TREASURY,
            ],
            "auction_house_treasury",
        )
    }

    /// Escrow payment PDA: `["auction_house", auction_house, wallet]`. Holds
    /// a buyer's payment while a sale executes.
    pub fn escrow_payment(&self, auction_house: &Pubkey, wallet: &Pubkey) -> Result<DerivedAddress> {
        self.derive(
            &self.auction_house_program,
            &[seeds::AUCTION_HOUSE, auction_house.as_ref(), wallet.as_ref()],
            "escrow_payment",
        )
    }

    /// Program-as-signer PDA: `["auction_house", "signer"]`. Fixed per
    /// deployment; signs token transfers on the program's behalf.
    pub fn program_as_signer(&self) -> Result<DerivedAddress> {
        self.derive(
            &self.auction_house_program,
            &[seeds::AUCTION_HOUSE, seeds::SIGNER],
            "program_as_signer",
        )
    }

    /// Trade state PDA for one side of a sale at one exact price.
    ///
    /// Seeds: `["auction_house", wallet, auction_house, token_account,
    /// treasury_mint, token_mint, price_le, size_le]`. A different price
    /// yields a different address, which is what lets the program match
    /// offers byte-exactly.
    #[allow(clippy::too_many_arguments)]
    pub fn trade_state(
        &self,
        wallet: &Pubkey,
        auction_house: &Pubkey,
        token_account: &Pubkey,
        treasury_mint: &Pubkey,
        token_mint: &Pubkey,
        price: u64,
        size: u64,
    ) -> Result<DerivedAddress> {
        self.derive(
            &self.auction_house_program,
            &[
                seeds::AUCTION_HOUSE,
                wallet.as_ref(),
                auction_house.as_ref(),
                token_account.as_ref(),
                treasury_mint.as_ref(),
                token_mint.as_ref(),
                &price.to_le_bytes(),
                &size.to_le_bytes(),
            ],
            "trade_state",
        )
    }

    /// Free trade state: the seller-side trade state at price 0, used when
    /// the program itself completes the sale.
    pub fn free_trade_state(
        &self,
        wallet: &Pubkey,
        auction_house: &Pubkey,
        token_account: &Pubkey,
        treasury_mint: &Pubkey,
        token_mint: &Pubkey,
    ) -> Result<DerivedAddress> {
        self.trade_state(
            wallet,
            auction_house,
            token_account,
            treasury_mint,
            token_mint,
            0,
            TRADE_SIZE,
        )
    }

    /// Associated token account for `(wallet, mint)`. Not bump-carrying; the
    /// ATA program owns the derivation.
    pub fn associated_token(&self, wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(wallet, mint)
    }
}
