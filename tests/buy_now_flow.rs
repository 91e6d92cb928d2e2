//! Buy-now flow tests
//!
//! Validates the single-transaction instant purchase:
//! - one transaction at the listed buy-now price, outbidding the current bid
//! - trade states derived at the buy-now price, not the highest bid
//! - native-treasury wallet collapse in the payment positions
//! - the availability and bid-window rejections, all before submission

mod common;

use common::{RecordingSender, Scene};
use gavel_sdk::error::GavelError;
use gavel_sdk::instructions::instruction_discriminator;
use gavel_sdk::pda::TRADE_SIZE;
use gavel_sdk::settlement::BuyNowParams;
use gavel_sdk::GavelClient;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::sync::atomic::Ordering;

fn buy_params<'a>(scene: &Scene, buyer: &'a Keypair) -> BuyNowParams<'a> {
    BuyNowParams {
        shop: scene.shop,
        treasury_mint: scene.treasury_mint,
        nft_mint: scene.nft_mint,
        metadata: scene.metadata,
        royalty_creators: &[],
        buyer,
    }
}

#[tokio::test]
async fn test_buy_now_submits_one_transaction_at_the_listed_price() {
    let scene = Scene::live_auction(Pubkey::new_unique(), Some(500_000), Some(1_000_000));
    let sender = RecordingSender::new();
    let calls = sender.calls_handle();
    let client = GavelClient::with_components(scene.config.clone(), scene.ledger(), sender).unwrap();
    let buyer = Keypair::new();

    client.buy_now(buy_params(&scene, &buyer)).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    let ix = &calls[0][0];
    assert_eq!(&ix.data[..8], &instruction_discriminator("buy_now"));
    assert_eq!(ix.accounts.len(), 24);

    // trade states sit at 18..=20 and are derived at 1_000_000, not the
    // 500_000 highest bid
    let auction_escrow = scene
        .deriver
        .associated_token(&scene.auction_address, &scene.nft_mint);
    let buyer_ts = scene
        .deriver
        .trade_state(
            &buyer.pubkey(),
            &scene.auction_house,
            &auction_escrow,
            &scene.treasury_mint,
            &scene.nft_mint,
            1_000_000,
            TRADE_SIZE,
        )
        .unwrap();
    let auction_ts = scene
        .deriver
        .trade_state(
            &scene.auction_address,
            &scene.auction_house,
            &auction_escrow,
            &scene.treasury_mint,
            &scene.nft_mint,
            1_000_000,
            TRADE_SIZE,
        )
        .unwrap();
    let free_ts = scene
        .deriver
        .free_trade_state(
            &scene.auction_address,
            &scene.auction_house,
            &auction_escrow,
            &scene.treasury_mint,
            &scene.nft_mint,
        )
        .unwrap();
    assert_eq!(ix.accounts[18].pubkey, buyer_ts.address);
    assert_eq!(ix.accounts[19].pubkey, auction_ts.address);
    assert_eq!(ix.accounts[20].pubkey, free_ts.address);
}

#[tokio::test]
async fn test_buy_now_collapses_native_payments_to_wallets() {
    let scene = Scene::live_auction(spl_token::native_mint::id(), None, Some(1_000_000));
    let sender = RecordingSender::new();
    let calls = sender.calls_handle();
    let client = GavelClient::with_components(scene.config.clone(), scene.ledger(), sender).unwrap();
    let buyer = Keypair::new();

    client.buy_now(buy_params(&scene, &buyer)).await.unwrap();

    let calls = calls.lock().unwrap();
    let ix = &calls[0][0];
    // seller receipt, buyer payment source, auction receipt
    assert_eq!(ix.accounts[2].pubkey, scene.seller);
    assert_eq!(ix.accounts[5].pubkey, buyer.pubkey());
    assert_eq!(ix.accounts[12].pubkey, scene.auction_address);
}

#[tokio::test]
async fn test_buy_now_rejected_when_a_bid_meets_the_price() {
    let scene = Scene::live_auction(Pubkey::new_unique(), Some(1_000_000), Some(1_000_000));
    let sender = RecordingSender::new();
    let attempts = sender.attempts_handle();
    let client = GavelClient::with_components(scene.config.clone(), scene.ledger(), sender).unwrap();
    let buyer = Keypair::new();

    let err = client.buy_now(buy_params(&scene, &buyer)).await.unwrap_err();
    assert!(matches!(err, GavelError::BuyNowUnavailable { .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_buy_now_rejected_after_the_bid_window_closes() {
    let mut scene = Scene::ended_auction(Pubkey::new_unique(), 500_000);
    scene.auction.buy_now_price = Some(1_000_000);
    let sender = RecordingSender::new();
    let attempts = sender.attempts_handle();
    let client = GavelClient::with_components(scene.config.clone(), scene.ledger(), sender).unwrap();
    let buyer = Keypair::new();

    let err = client.buy_now(buy_params(&scene, &buyer)).await.unwrap_err();
    assert!(matches!(err, GavelError::BidPeriodViolation { .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_buy_now_requires_a_configured_price() {
    let scene = Scene::live_auction(Pubkey::new_unique(), Some(500_000), None);
    let sender = RecordingSender::new();
    let attempts = sender.attempts_handle();
    let client = GavelClient::with_components(scene.config.clone(), scene.ledger(), sender).unwrap();
    let buyer = Keypair::new();

    let err = client.buy_now(buy_params(&scene, &buyer)).await.unwrap_err();
    assert!(matches!(err, GavelError::BuyNowUnavailable { .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}
