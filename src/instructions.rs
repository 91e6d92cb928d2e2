//! Instruction assembly
//!
//! Builds the marketplace program's instructions with the exact account
//! lists and argument tuples the deployed program declares. Account order is
//! positional: the program binds accounts by index, so a swapped entry means
//! on-chain rejection, not a soft error. The orders below are part of the
//! external contract and are pinned by fixture tests.
//!
//! Instruction data is the 8-byte method discriminator followed by the
//! borsh-encoded argument tuple.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::sysvar;

use crate::error::{GavelError, Result};
use crate::pda::{AddressDeriver, DerivedAddress};
use crate::treasury::TreasuryClassifier;

/// 8-byte instruction discriminator: `sha256("global:<method>")[..8]`.
pub fn instruction_discriminator(method: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{method}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

fn encode_args<T: BorshSerialize>(method: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(method).to_vec();
    let body = borsh::to_vec(args)
        .map_err(|e| GavelError::InvalidConfig(format!("{method} argument encoding: {e}")))?;
    data.extend(body);
    Ok(data)
}

#[derive(BorshSerialize)]
struct SettleAuctionArgs {
    auction_bump: u8,
    bid_wallet_bump: u8,
    auction_trade_state_bump: u8,
    free_auction_trade_state_bump: u8,
    escrow_payment_bump: u8,
    program_as_signer_bump: u8,
}

#[derive(BorshSerialize)]
struct DistributeProceedsArgs {
    auction_bump: u8,
    bid_wallet_bump: u8,
}

#[derive(BorshSerialize)]
struct BuyNowArgs {
    auction_bump: u8,
    auction_trade_state_bump: u8,
    buyer_trade_state_bump: u8,
    escrow_payment_bump: u8,
    free_auction_trade_state_bump: u8,
    program_as_signer_bump: u8,
}

/// Resolved and derived addresses for `settle_auction`.
///
/// Bump-carrying entries travel as [`DerivedAddress`] because their bumps
/// are part of the argument tuple.
#[derive(Debug, Clone)]
pub struct SettleAccounts {
    pub auction: DerivedAddress,
    /// NFT escrow: ATA of the nft mint owned by the auction PDA.
    pub auction_escrow: Pubkey,
    /// Auction-side payment receipt; wallet-collapsed when native.
    pub auction_payment_receipt: Pubkey,
    /// ATA of the nft mint owned by the bid wallet.
    pub bid_receipt_token_account: Pubkey,
    /// The settling wallet; pays fees and signs both transactions.
    pub wallet: Pubkey,
    /// Winning bid record.
    pub bid: Pubkey,
    pub bid_wallet: DerivedAddress,
    /// Winning bidder's wallet.
    pub buyer: Pubkey,
    pub escrow_payment: DerivedAddress,
    pub auction_house: Pubkey,
    pub fee_account: Pubkey,
    pub treasury_account: Pubkey,
    pub nft_mint: Pubkey,
    pub treasury_mint: Pubkey,
    pub metadata: Pubkey,
    pub shop: Pubkey,
    /// Auction-house authority (the shop PDA).
    pub authority: Pubkey,
    /// Bid-side trade state at the winning price.
    pub bid_trade_state: Pubkey,
    pub auction_trade_state: DerivedAddress,
    pub free_auction_trade_state: DerivedAddress,
    pub program_as_signer: DerivedAddress,
}

/// Resolved addresses for `distribute_auction_proceeds`.
#[derive(Debug, Clone)]
pub struct DistributeAccounts {
    pub auction: DerivedAddress,
    pub auction_payment_receipt: Pubkey,
    pub bid_receipt_token_account: Pubkey,
    /// Seller-side payment receipt; wallet-collapsed when native.
    pub seller_payment_receipt: Pubkey,
    /// ATA of the nft mint owned by the winning bidder.
    pub buyer_receipt_token_account: Pubkey,
    pub wallet: Pubkey,
    pub bid: Pubkey,
    pub bid_wallet: DerivedAddress,
    pub buyer: Pubkey,
    pub seller: Pubkey,
    pub nft_mint: Pubkey,
    pub treasury_mint: Pubkey,
    pub shop: Pubkey,
}

/// Resolved and derived addresses for `buy_now`.
#[derive(Debug, Clone)]
pub struct BuyNowAccounts {
    /// The buyer's wallet; signs and pays.
    pub wallet: Pubkey,
    pub seller: Pubkey,
    pub seller_payment_receipt: Pubkey,
    pub auction: DerivedAddress,
    pub shop: Pubkey,
    /// Buyer-side payment source; wallet-collapsed when native.
    pub payment_account: Pubkey,
    pub nft_mint: Pubkey,
    pub treasury_mint: Pubkey,
    pub auction_escrow: Pubkey,
    pub metadata: Pubkey,
    pub escrow_payment: DerivedAddress,
    pub auction_payment_receipt: Pubkey,
    pub buyer_receipt_token_account: Pubkey,
    pub authority: Pubkey,
    pub auction_house: Pubkey,
    pub fee_account: Pubkey,
    pub treasury_account: Pubkey,
    /// Trade states derived at the buy-now price, never a prior bid price.
    pub buyer_trade_state: DerivedAddress,
    pub auction_trade_state: DerivedAddress,
    pub free_auction_trade_state: DerivedAddress,
    pub program_as_signer: DerivedAddress,
}

/// Assembles marketplace instructions for one deployment.
#[derive(Debug, Clone, Copy)]
pub struct InstructionBuilder {
    deriver: AddressDeriver,
    classifier: TreasuryClassifier,
}

impl InstructionBuilder {
    pub fn new(deriver: AddressDeriver, classifier: TreasuryClassifier) -> Self {
        Self {
            deriver,
            classifier,
        }
    }

    /// Royalty remaining-accounts expansion.
    ///
    /// One writable entry per creator; with a token treasury each creator is
    /// followed by their treasury-mint ATA, where the royalty share is
    /// deposited. Creator order is preserved.
    pub fn royalty_remaining_accounts(
        &self,
        treasury_mint: &Pubkey,
        creators: &[Pubkey],
    ) -> Vec<AccountMeta> {
        let is_native = self.classifier.is_native(treasury_mint);
        let mut metas = Vec::with_capacity(creators.len() * if is_native { 1 } else { 2 });
        for creator in creators {
            metas.push(AccountMeta::new(*creator, false));
            if !is_native {
                metas.push(AccountMeta::new(
                    self.deriver.associated_token(creator, treasury_mint),
                    false,
                ));
            }
        }
        metas
    }

    /// First settlement instruction: executes the sale between the auction
    /// escrow and the winning bid's escrow wallet.
    pub fn settle_auction(
        &self,
        accounts: &SettleAccounts,
        royalty_creators: &[Pubkey],
    ) -> Result<Instruction> {
        let args = SettleAuctionArgs {
            auction_bump: accounts.auction.bump,
            bid_wallet_bump: accounts.bid_wallet.bump,
            auction_trade_state_bump: accounts.auction_trade_state.bump,
            free_auction_trade_state_bump: accounts.free_auction_trade_state.bump,
            escrow_payment_bump: accounts.escrow_payment.bump,
            program_as_signer_bump: accounts.program_as_signer.bump,
        };

        let mut metas = vec![
            AccountMeta::new(accounts.auction.address, false),
            AccountMeta::new(accounts.auction_escrow, false),
            AccountMeta::new(accounts.auction_payment_receipt, false),
            AccountMeta::new(accounts.bid_receipt_token_account, false),
            AccountMeta::new(accounts.wallet, true),
            AccountMeta::new(accounts.bid, false),
            AccountMeta::new(accounts.bid_wallet.address, false),
            AccountMeta::new(accounts.buyer, false),
            AccountMeta::new(accounts.escrow_payment.address, false),
            AccountMeta::new_readonly(accounts.auction_house, false),
            AccountMeta::new(accounts.fee_account, false),
            AccountMeta::new(accounts.treasury_account, false),
            AccountMeta::new_readonly(accounts.nft_mint, false),
            AccountMeta::new_readonly(accounts.treasury_mint, false),
            AccountMeta::new_readonly(accounts.metadata, false),
            AccountMeta::new_readonly(accounts.shop, false),
            AccountMeta::new_readonly(accounts.authority, false),
            AccountMeta::new(accounts.bid_trade_state, false),
            AccountMeta::new(accounts.auction_trade_state.address, false),
            AccountMeta::new(accounts.free_auction_trade_state.address, false),
            AccountMeta::new_readonly(self.deriver.auction_house_program(), false),
            AccountMeta::new_readonly(accounts.program_as_signer.address, false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
        ];
        metas.extend(self.royalty_remaining_accounts(&accounts.treasury_mint, royalty_creators));

        Ok(Instruction {
            program_id: self.deriver.marketplace_program(),
            accounts: metas,
            data: encode_args("settle_auction", &args)?,
        })
    }

    /// Second settlement instruction: pays the seller out of the funded
    /// escrow and releases the NFT to the buyer. Built only after
    /// `settle_auction` has landed; its accounts assume the escrow is
    /// funded.
    pub fn distribute_auction_proceeds(&self, accounts: &DistributeAccounts) -> Result<Instruction> {
        let args = DistributeProceedsArgs {
            auction_bump: accounts.auction.bump,
            bid_wallet_bump: accounts.bid_wallet.bump,
        };

        let metas = vec![
            AccountMeta::new(accounts.auction.address, false),
            AccountMeta::new(accounts.auction_payment_receipt, false),
            AccountMeta::new(accounts.bid_receipt_token_account, false),
            AccountMeta::new(accounts.seller_payment_receipt, false),
            AccountMeta::new(accounts.buyer_receipt_token_account, false),
            AccountMeta::new(accounts.wallet, true),
            AccountMeta::new(accounts.bid, false),
            AccountMeta::new(accounts.bid_wallet.address, false),
            AccountMeta::new(accounts.buyer, false),
            AccountMeta::new(accounts.seller, false),
            AccountMeta::new_readonly(accounts.nft_mint, false),
            AccountMeta::new_readonly(accounts.treasury_mint, false),
            AccountMeta::new_readonly(accounts.shop, false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
        ];

        Ok(Instruction {
            program_id: self.deriver.marketplace_program(),
            accounts: metas,
            data: encode_args("distribute_auction_proceeds", &args)?,
        })
    }

    /// Instant purchase at the configured buy-now price, one transaction.
    ///
    /// The buyer doubles as transfer authority, so the wallet appears twice
    /// in the list. No ATA program account; the program creates no token
    /// accounts on this path.
    pub fn buy_now(
        &self,
        accounts: &BuyNowAccounts,
        royalty_creators: &[Pubkey],
    ) -> Result<Instruction> {
        let args = BuyNowArgs {
            auction_bump: accounts.auction.bump,
            auction_trade_state_bump: accounts.auction_trade_state.bump,
            buyer_trade_state_bump: accounts.buyer_trade_state.bump,
            escrow_payment_bump: accounts.escrow_payment.bump,
            free_auction_trade_state_bump: accounts.free_auction_trade_state.bump,
            program_as_signer_bump: accounts.program_as_signer.bump,
        };

        let mut metas = vec![
            AccountMeta::new(accounts.wallet, true),
            AccountMeta::new(accounts.seller, false),
            AccountMeta::new(accounts.seller_payment_receipt, false),
            AccountMeta::new(accounts.auction.address, false),
            AccountMeta::new_readonly(accounts.shop, false),
            AccountMeta::new(accounts.payment_account, false),
            AccountMeta::new_readonly(accounts.wallet, true),
            AccountMeta::new_readonly(accounts.nft_mint, false),
            AccountMeta::new_readonly(accounts.treasury_mint, false),
            AccountMeta::new(accounts.auction_escrow, false),
            AccountMeta::new_readonly(accounts.metadata, false),
            AccountMeta::new(accounts.escrow_payment.address, false),
            AccountMeta::new(accounts.auction_payment_receipt, false),
            AccountMeta::new(accounts.buyer_receipt_token_account, false),
            AccountMeta::new_readonly(accounts.authority, false),
            AccountMeta::new_readonly(accounts.auction_house, false),
            AccountMeta::new(accounts.fee_account, false),
            AccountMeta::new(accounts.treasury_account, false),
            AccountMeta::new(accounts.buyer_trade_state.address, false),
            AccountMeta::new(accounts.auction_trade_state.address, false),
            AccountMeta::new(accounts.free_auction_trade_state.address, false),
            AccountMeta::new_readonly(self.deriver.auction_house_program(), false),
            AccountMeta::new_readonly(accounts.program_as_signer.address, false),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
        ];
        metas.extend(self.royalty_remaining_accounts(&accounts.treasury_mint, royalty_creators));

        Ok(Instruction {
            program_id: self.deriver.marketplace_program(),
            accounts: metas,
            data: encode_args("buy_now", &args)?,
        })
    }
}
