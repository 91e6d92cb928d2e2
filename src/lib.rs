//! Gavel marketplace client SDK
//!
//! Client-side orchestration for an on-chain auction marketplace: derives
//! the program addresses the deployed contracts expect, validates auction
//! state against business rules, assembles instructions with byte-exact
//! account orders, and sequences their submission. A separate REST client
//! queries the backend that indexes listings.
//!
//! The two economic flows are [`client::GavelClient::settle_and_distribute`]
//! (two strictly ordered transactions) and [`client::GavelClient::buy_now`]
//! (one transaction). Both run their precondition checks before deriving a
//! single address, so ineligible operations fail fast with typed errors.

pub mod api;
pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod sequencer;
pub mod settlement;
pub mod state;
pub mod treasury;
pub mod wallet;

pub use client::GavelClient;
pub use config::GavelConfig;
pub use error::{ErrorKind, GavelError, Result};
pub use sequencer::TwoPhaseReceipt;
pub use settlement::{BuyNowParams, SettleAuctionParams};
