//! Precondition checks
//!
//! The fail-fast validation layer: every flow runs its checks before a single
//! address is derived, so an ineligible operation costs one account read and
//! no signatures. Checks are pure over resolved state; the caller supplies
//! the clock reading, which keeps every rule unit-testable at exact
//! boundaries.

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::config::FEE_ACCOUNT_MIN_BALANCE;
use crate::error::{GavelError, Result};
use crate::state::{AuctionAccount, AuctionStatus, HighestBid};

/// Fails with [`GavelError::InsufficientFeeBalance`] when the auction-house
/// fee account cannot cover transaction and rent costs.
pub fn check_fee_account_balance(account: &Pubkey, balance: u64) -> Result<()> {
    if balance < FEE_ACCOUNT_MIN_BALANCE {
        return Err(GavelError::InsufficientFeeBalance {
            account: *account,
            balance,
            required: FEE_ACCOUNT_MIN_BALANCE,
        });
    }
    Ok(())
}

/// Settlement eligibility: the bidding window must have closed, a highest
/// bid must be recorded, and the auction must not already be settled.
///
/// Returns the recorded highest bid, which settlement derives trade states
/// from. Re-invoking settle on a settled auction fails here, before any
/// transaction is constructed.
pub fn check_settle_eligible(
    address: &Pubkey,
    auction: &AuctionAccount,
    now: i64,
) -> Result<HighestBid> {
    if auction.status != AuctionStatus::Open {
        return Err(GavelError::not_settleable(*address, "already settled"));
    }
    if !auction.has_ended(now) {
        return Err(GavelError::not_settleable(
            *address,
            format!("bidding open until {}", auction.end_time()),
        ));
    }
    let highest = auction
        .highest_bid
        .ok_or_else(|| GavelError::not_settleable(*address, "no recorded highest bid"))?;
    debug!(auction = %address, winning_bid = %highest.bid, price = highest.price, "settle eligible");
    Ok(highest)
}

/// Fails with [`GavelError::BidPeriodViolation`] unless `now` falls inside
/// the live bidding window.
pub fn check_bid_period_open(address: &Pubkey, auction: &AuctionAccount, now: i64) -> Result<()> {
    if now < auction.start_time {
        return Err(GavelError::bid_period(
            *address,
            format!("bidding starts at {}", auction.start_time),
        ));
    }
    if !auction.bid_period_open(now) {
        return Err(GavelError::bid_period(
            *address,
            format!("bidding ended at {}", auction.end_time()),
        ));
    }
    Ok(())
}

/// Buy-now timing: an instant purchase is only possible while the auction is
/// live. Once the window closes, settlement takes over. Same window
/// predicate as [`check_bid_period_open`], separate entry point so the two
/// operations report their own violations.
pub fn check_buy_now_window(address: &Pubkey, auction: &AuctionAccount, now: i64) -> Result<()> {
    check_bid_period_open(address, auction, now)
}

/// Buy-now availability. Returns the configured buy-now price; trade states
/// must be derived from it, never from a historical bid price.
///
/// Fails with [`GavelError::BuyNowUnavailable`] when the seller configured
/// no price, a bid at or above the price already exists, or the auction is
/// already settled.
pub fn check_buy_now_available(address: &Pubkey, auction: &AuctionAccount) -> Result<u64> {
    if auction.status != AuctionStatus::Open {
        return Err(GavelError::buy_now_unavailable(*address, "already settled"));
    }
    let price = auction
        .buy_now_price
        .ok_or_else(|| GavelError::buy_now_unavailable(*address, "no buy-now price configured"))?;
    if let Some(highest) = &auction.highest_bid {
        if highest.price >= price {
            return Err(GavelError::buy_now_unavailable(
                *address,
                format!("existing bid {} at or above buy-now price {price}", highest.price),
            ));
        }
    }
    Ok(price)
}
