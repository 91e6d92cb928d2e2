//! Settlement and purchase orchestration
//!
//! Drives the full flows: precondition checks, account resolution,
//! derivation fan-in, instruction assembly, sequenced submission. Each flow
//! follows the same shape. Checks run first so an ineligible operation costs
//! one round of reads; derivations are pure and gathered into one addresses
//! struct; only then are instructions built.
//!
//! Settle-and-distribute is two strictly ordered transactions. Transaction 2
//! moves proceeds out of the escrow transaction 1 funds, so its instructions
//! are constructed inside the sequencer's phase-2 closure, after phase 1 has
//! confirmed. If the caller aborts between the phases the auction is left
//! settled but undistributed on the ledger; [`SettlementEngine::distribute_proceeds`]
//! resumes from that state after re-checking the stored status.

use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use tracing::info;

use crate::checks;
use crate::error::{GavelError, Result};
use crate::instructions::{BuyNowAccounts, DistributeAccounts, InstructionBuilder, SettleAccounts};
use crate::ledger::{AccountResolver, LedgerReader};
use crate::pda::{AddressDeriver, DerivedAddress};
use crate::sequencer::{TransactionSender, TransactionSequencer, TwoPhaseReceipt};
use crate::state::{AuctionAccount, AuctionStatus};
use crate::treasury::TreasuryClassifier;

/// Inputs for settling a finished auction.
///
/// The metadata address and royalty creator list arrive resolved; decoding
/// NFT metadata is outside this SDK.
pub struct SettleAuctionParams<'a> {
    /// Shop the auction belongs to. Doubles as the auction-house authority.
    pub shop: Pubkey,
    /// The shop's treasury mint.
    pub treasury_mint: Pubkey,
    pub nft_mint: Pubkey,
    pub metadata: Pubkey,
    pub royalty_creators: &'a [Pubkey],
    /// Fee payer and signer for both transactions. Anyone may settle.
    pub settler: &'a Keypair,
}

/// Inputs for an instant purchase.
pub struct BuyNowParams<'a> {
    pub shop: Pubkey,
    pub treasury_mint: Pubkey,
    pub nft_mint: Pubkey,
    pub metadata: Pubkey,
    pub royalty_creators: &'a [Pubkey],
    pub buyer: &'a Keypair,
}

/// Core auction addresses shared by every flow.
struct AuctionContext {
    auction: DerivedAddress,
    auction_house: DerivedAddress,
    fee_account: DerivedAddress,
    treasury_account: DerivedAddress,
    account: AuctionAccount,
}

/// Orchestrates marketplace flows over the ledger seams.
pub struct SettlementEngine<L, S> {
    resolver: AccountResolver<L>,
    deriver: AddressDeriver,
    classifier: TreasuryClassifier,
    builder: InstructionBuilder,
    sequencer: TransactionSequencer<S>,
}

impl<L: LedgerReader, S: TransactionSender> SettlementEngine<L, S> {
    pub fn new(
        resolver: AccountResolver<L>,
        deriver: AddressDeriver,
        classifier: TreasuryClassifier,
        sequencer: TransactionSequencer<S>,
    ) -> Self {
        Self {
            resolver,
            deriver,
            classifier,
            builder: InstructionBuilder::new(deriver, classifier),
            sequencer,
        }
    }

    pub fn resolver(&self) -> &AccountResolver<L> {
        &self.resolver
    }

    pub fn deriver(&self) -> &AddressDeriver {
        &self.deriver
    }

    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    /// Derive the core PDAs and resolve the auction record. The fee-account
    /// balance read runs in parallel with the auction read; the balance
    /// check fails the flow before anything else happens.
    async fn load_checked_context(
        &self,
        shop: &Pubkey,
        treasury_mint: &Pubkey,
        nft_mint: &Pubkey,
    ) -> Result<AuctionContext> {
        let auction = self.deriver.auction(nft_mint, shop)?;
        let auction_house = self.deriver.auction_house(shop, treasury_mint)?;
        let fee_account = self.deriver.auction_house_fee_account(&auction_house.address)?;
        let treasury_account = self.deriver.auction_house_treasury(&auction_house.address)?;

        let (fee_balance, account) = tokio::try_join!(
            self.resolver.balance(&fee_account.address),
            self.resolver.auction(&auction.address),
        )?;
        checks::check_fee_account_balance(&fee_account.address, fee_balance)?;

        if account.treasury_mint != *treasury_mint {
            return Err(GavelError::InvalidConfig(format!(
                "auction treasury mint {} does not match shop treasury mint {treasury_mint}",
                account.treasury_mint
            )));
        }

        Ok(AuctionContext {
            auction,
            auction_house,
            fee_account,
            treasury_account,
            account,
        })
    }

    /// Derived address set for both settlement instructions at the winning
    /// price. Pure; the fan-in point before instruction assembly.
    fn settlement_accounts(
        &self,
        ctx: &AuctionContext,
        bid: Pubkey,
        buyer: Pubkey,
        price: u64,
        wallet: Pubkey,
        metadata: Pubkey,
    ) -> Result<(SettleAccounts, DistributeAccounts)> {
        let auction_address = ctx.auction.address;
        let house = ctx.auction_house.address;
        let nft_mint = ctx.account.nft_mint;
        let treasury_mint = ctx.account.treasury_mint;
        let seller = ctx.account.seller;

        let auction_escrow = self.deriver.associated_token(&auction_address, &nft_mint);
        let bid_wallet = self.deriver.bid_wallet(&auction_address, &buyer)?;
        let program_as_signer = self.deriver.program_as_signer()?;
        let escrow_payment = self.deriver.escrow_payment(&house, &bid_wallet.address)?;

        let auction_trade_state = self.deriver.trade_state(
            &auction_address,
            &house,
            &auction_escrow,
            &treasury_mint,
            &nft_mint,
            price,
            crate::pda::TRADE_SIZE,
        )?;
        let free_auction_trade_state = self.deriver.free_trade_state(
            &auction_address,
            &house,
            &auction_escrow,
            &treasury_mint,
            &nft_mint,
        )?;
        let bid_trade_state = self.deriver.trade_state(
            &bid_wallet.address,
            &house,
            &auction_escrow,
            &treasury_mint,
            &nft_mint,
            price,
            crate::pda::TRADE_SIZE,
        )?;

        let auction_payment_receipt =
            self.classifier
                .payment_account(&self.deriver, &auction_address, &treasury_mint);
        let seller_payment_receipt =
            self.classifier
                .payment_account(&self.deriver, &seller, &treasury_mint);

        let settle = SettleAccounts {
            auction: ctx.auction,
            auction_escrow,
            auction_payment_receipt,
            bid_receipt_token_account: self
                .deriver
                .associated_token(&bid_wallet.address, &nft_mint),
            wallet,
            bid,
            bid_wallet,
            buyer,
            escrow_payment,
            auction_house: house,
            fee_account: ctx.fee_account.address,
            treasury_account: ctx.treasury_account.address,
            nft_mint,
            treasury_mint,
            metadata,
            shop: ctx.account.shop,
            authority: ctx.account.shop,
            bid_trade_state: bid_trade_state.address,
            auction_trade_state,
            free_auction_trade_state,
            program_as_signer,
        };

        let distribute = DistributeAccounts {
            auction: ctx.auction,
            auction_payment_receipt,
            bid_receipt_token_account: settle.bid_receipt_token_account,
            seller_payment_receipt,
            buyer_receipt_token_account: self.deriver.associated_token(&buyer, &nft_mint),
            wallet,
            bid,
            bid_wallet,
            buyer,
            seller,
            nft_mint,
            treasury_mint,
            shop: ctx.account.shop,
        };

        Ok((settle, distribute))
    }

    /// Settle a finished auction and pay out the proceeds: two strictly
    /// sequential transactions. Returns both signatures.
    pub async fn settle_and_distribute(
        &self,
        params: SettleAuctionParams<'_>,
    ) -> Result<TwoPhaseReceipt> {
        let ctx = self
            .load_checked_context(&params.shop, &params.treasury_mint, &params.nft_mint)
            .await?;
        let highest = checks::check_settle_eligible(&ctx.auction.address, &ctx.account, self.now())?;
        let bid_record = self.resolver.bid(&highest.bid).await?;

        let (settle, distribute) = self.settlement_accounts(
            &ctx,
            highest.bid,
            bid_record.buyer,
            highest.price,
            params.settler.pubkey(),
            params.metadata,
        )?;

        info!(
            auction = %ctx.auction.address,
            buyer = %bid_record.buyer,
            price = highest.price,
            "settling auction"
        );

        let first = self.builder.settle_auction(&settle, params.royalty_creators)?;
        let builder = self.builder;
        let receipt = self
            .sequencer
            .run_two_phase(
                vec![first],
                move || Ok(vec![builder.distribute_auction_proceeds(&distribute)?]),
                params.settler,
            )
            .await?;

        info!(
            auction = %ctx.auction.address,
            settle_tx = %receipt.first,
            distribute_tx = %receipt.second,
            "auction settled and proceeds distributed"
        );
        Ok(receipt)
    }

    /// Resume a settlement that was interrupted between phases: submit the
    /// distribution transaction alone.
    ///
    /// The stored auction status must be settled-but-undistributed; the
    /// check recomputes it from the ledger rather than trusting the caller's
    /// view of history.
    pub async fn distribute_proceeds(
        &self,
        params: SettleAuctionParams<'_>,
    ) -> Result<Signature> {
        let ctx = self
            .load_checked_context(&params.shop, &params.treasury_mint, &params.nft_mint)
            .await?;

        if ctx.account.status != AuctionStatus::Settled {
            return Err(GavelError::InvalidAuctionState {
                auction: ctx.auction.address,
                expected: AuctionStatus::Settled.as_str(),
                actual: ctx.account.status.as_str(),
            });
        }
        let highest = ctx.account.highest_bid.ok_or(GavelError::InvalidAuctionState {
            auction: ctx.auction.address,
            expected: "settled with a recorded winning bid",
            actual: AuctionStatus::Settled.as_str(),
        })?;
        let bid_record = self.resolver.bid(&highest.bid).await?;

        let (_, distribute) = self.settlement_accounts(
            &ctx,
            highest.bid,
            bid_record.buyer,
            highest.price,
            params.settler.pubkey(),
            params.metadata,
        )?;

        let instruction = self.builder.distribute_auction_proceeds(&distribute)?;
        let signature = self.sequencer.run_single(vec![instruction], params.settler).await?;
        info!(auction = %ctx.auction.address, %signature, "proceeds distributed");
        Ok(signature)
    }

    /// Instant purchase at the configured buy-now price; one transaction.
    ///
    /// Trade states are derived from the buy-now price returned by the
    /// availability check, never from the current highest bid.
    pub async fn buy_now(&self, params: BuyNowParams<'_>) -> Result<Signature> {
        let ctx = self
            .load_checked_context(&params.shop, &params.treasury_mint, &params.nft_mint)
            .await?;
        checks::check_buy_now_window(&ctx.auction.address, &ctx.account, self.now())?;
        let price = checks::check_buy_now_available(&ctx.auction.address, &ctx.account)?;

        let buyer = params.buyer.pubkey();
        let auction_address = ctx.auction.address;
        let house = ctx.auction_house.address;
        let nft_mint = ctx.account.nft_mint;
        let treasury_mint = ctx.account.treasury_mint;
        let seller = ctx.account.seller;

        let auction_escrow = self.deriver.associated_token(&auction_address, &nft_mint);
        let accounts = BuyNowAccounts {
            wallet: buyer,
            seller,
            seller_payment_receipt: self
                .classifier
                .payment_account(&self.deriver, &seller, &treasury_mint),
            auction: ctx.auction,
            shop: ctx.account.shop,
            payment_account: self
                .classifier
                .payment_account(&self.deriver, &buyer, &treasury_mint),
            nft_mint,
            treasury_mint,
            auction_escrow,
            metadata: params.metadata,
            escrow_payment: self.deriver.escrow_payment(&house, &buyer)?,
            auction_payment_receipt: self.classifier.payment_account(
                &self.deriver,
                &auction_address,
                &treasury_mint,
            ),
            buyer_receipt_token_account: self.deriver.associated_token(&buyer, &nft_mint),
            authority: ctx.account.shop,
            auction_house: house,
            fee_account: ctx.fee_account.address,
            treasury_account: ctx.treasury_account.address,
            buyer_trade_state: self.deriver.trade_state(
                &buyer,
                &house,
                &auction_escrow,
                &treasury_mint,
                &nft_mint,
                price,
                crate::pda::TRADE_SIZE,
            )?,
            auction_trade_state: self.deriver.trade_state(
                &auction_address,
                &house,
                &auction_escrow,
                &treasury_mint,
                &nft_mint,
                price,
                crate::pda::TRADE_SIZE,
            )?,
            free_auction_trade_state: self.deriver.free_trade_state(
                &auction_address,
                &house,
                &auction_escrow,
                &treasury_mint,
                &nft_mint,
            )?,
            program_as_signer: self.deriver.program_as_signer()?,
        };

        info!(auction = %auction_address, %buyer, price, "executing buy-now");
        let instruction = self.builder.buy_now(&accounts, params.royalty_creators)?;
        let signature = self.sequencer.run_single(vec![instruction], params.buyer).await?;
        info!(auction = %auction_address, %signature, "buy-now confirmed");
        Ok(signature)
    }
}
