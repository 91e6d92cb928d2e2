//! Backend REST client tests
//!
//! Runs the order and NFT queries against a local mock server:
//! - query-string shape: sort, paging, and filter predicates as the
//!   backend expects them
//! - internal pagination stopping at the first short page
//! - status and envelope failures surfaced as typed errors

use gavel_sdk::api::{AttributeFilter, BackendClient, OrdersQuery, SortBy};
use gavel_sdk::error::{ErrorKind, GavelError};
use mockito::{Matcher, Server};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

fn client(base_url: String, page_limit: u32) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(5), page_limit).unwrap()
}

fn order_json(mint: &str, price: u64) -> serde_json::Value {
    json!({
        "tokenMint": mint,
        "tokenAccount": format!("acct-{mint}"),
        "price": price.to_string(),
        "sellerAddress": "seller111",
        "shopAddress": "shop111",
        "side": 1,
        "status": 0
    })
}

fn page_body(count: usize, offset: u32, limit: u32, total: u64) -> String {
    let orders: Vec<_> = (0..count)
        .map(|i| order_json(&format!("mint-{}", offset as usize + i), 1_000_000))
        .collect();
    json!({
        "success": true,
        "result": orders,
        "offset": offset,
        "limit": limit,
        "totalCount": total
    })
    .to_string()
}

#[tokio::test]
async fn test_wallet_orders_paginate_until_a_short_page() {
    let mut server = Server::new_async().await;
    let shop = Pubkey::new_unique();
    let wallet = Pubkey::new_unique();
    let predicate = format!(r#"{{"side":1,"status":0,"walletAddress":"{wallet}"}}"#);

    let path = format!("/order/{shop}");
    let mut mocks = Vec::new();
    for (offset, count) in [(0u32, 10usize), (10, 10), (20, 3)] {
        let mock = server
            .mock("GET", path.as_str())
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("offset".into(), offset.to_string()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("filterArr[]".into(), predicate.clone()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(page_body(count, offset, 10, 23))
            .create_async()
            .await;
        mocks.push(mock);
    }

    let orders = client(server.url(), 10)
        .orders_by_shop_and_wallet(&shop, &wallet)
        .await
        .unwrap();

    assert_eq!(orders.len(), 23);
    assert_eq!(orders[0].token_mint, "mint-0");
    assert_eq!(orders[22].token_mint, "mint-22");
    // the short third page ends the loop; no fourth request
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_full_pages_keep_paginating() {
    let mut server = Server::new_async().await;
    let shop = Pubkey::new_unique();
    let wallet = Pubkey::new_unique();

    // a full page followed by an empty one
    let full = server
        .mock("GET", format!("/order/{shop}").as_str())
        .match_query(Matcher::UrlEncoded("offset".into(), "0".into()))
        .with_body(page_body(3, 0, 3, 3))
        .create_async()
        .await;
    let empty = server
        .mock("GET", format!("/order/{shop}").as_str())
        .match_query(Matcher::UrlEncoded("offset".into(), "3".into()))
        .with_body(page_body(0, 3, 3, 3))
        .create_async()
        .await;

    let orders = client(server.url(), 3)
        .orders_by_shop_and_wallet(&shop, &wallet)
        .await
        .unwrap();

    assert_eq!(orders.len(), 3);
    full.assert_async().await;
    empty.assert_async().await;
}

#[tokio::test]
async fn test_shop_orders_send_sort_paging_and_filter() {
    let mut server = Server::new_async().await;
    let shop = Pubkey::new_unique();

    let mock = server
        .mock("GET", format!("/order/{shop}").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "orderByArr".into(),
                r#"{"column":"price","order":"desc"}"#.into(),
            ),
            Matcher::UrlEncoded("offset".into(), "20".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded(
                "filterArr[]".into(),
                r#"{"side":1,"status":0,"attribute":[{"trait_type":"Background","value":"Gold"}]}"#
                    .into(),
            ),
        ]))
        .with_body(page_body(2, 20, 10, 42))
        .create_async()
        .await;

    let query = OrdersQuery {
        offset: Some(20),
        limit: Some(10),
        sort_by: vec![SortBy::desc("price")],
        attributes: vec![AttributeFilter {
            trait_type: "Background".to_string(),
            value: "Gold".to_string(),
        }],
        ..OrdersQuery::default()
    };
    let page = client(server.url(), 10)
        .orders_by_shop(&shop, &query)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.orders.len(), 2);
    assert_eq!(page.offset, Some(20));
    assert_eq!(page.limit, Some(10));
    assert_eq!(page.total_count, Some(42));
}

#[tokio::test]
async fn test_order_by_mint_uses_the_single_order_route() {
    let mut server = Server::new_async().await;
    let mint = Pubkey::new_unique();
    let shop = Pubkey::new_unique();

    let mock = server
        .mock("GET", format!("/order/mint/{mint}/shop/{shop}").as_str())
        .with_body(
            json!({
                "success": true,
                "result": order_json(&mint.to_string(), 2_500_000)
            })
            .to_string(),
        )
        .create_async()
        .await;

    let order = client(server.url(), 10)
        .order_by_mint_and_shop(&mint, &shop)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(order.token_mint, mint.to_string());
    assert_eq!(order.price, "2500000");
}

#[tokio::test]
async fn test_order_by_mint_without_result_is_an_error() {
    let mut server = Server::new_async().await;
    let mint = Pubkey::new_unique();
    let shop = Pubkey::new_unique();

    server
        .mock("GET", format!("/order/mint/{mint}/shop/{shop}").as_str())
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let err = client(server.url(), 10)
        .order_by_mint_and_shop(&mint, &shop)
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::ApiResponse(_)));
}

#[tokio::test]
async fn test_nft_by_mint_returns_the_record() {
    let mut server = Server::new_async().await;
    let mint = Pubkey::new_unique();

    let mock = server
        .mock("GET", format!("/nft/{mint}").as_str())
        .with_body(
            json!({
                "success": true,
                "result": {
                    "mint": mint.to_string(),
                    "owner": "owner111",
                    "name": "Gavel #1"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let nft = client(server.url(), 10).nft_by_mint(&mint).await.unwrap();

    mock.assert_async().await;
    assert_eq!(nft.mint, mint.to_string());
    assert_eq!(nft.owner.as_deref(), Some("owner111"));
    assert_eq!(nft.symbol, None);
}

#[tokio::test]
async fn test_http_error_surfaces_the_status() {
    let mut server = Server::new_async().await;
    let shop = Pubkey::new_unique();

    server
        .mock("GET", format!("/order/{shop}").as_str())
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = client(server.url(), 10)
        .orders_by_shop(&shop, &OrdersQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GavelError::ApiStatus { status: 500, .. }));
    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_envelope_failure_carries_the_backend_message() {
    let mut server = Server::new_async().await;
    let shop = Pubkey::new_unique();

    server
        .mock("GET", format!("/order/{shop}").as_str())
        .match_query(Matcher::Any)
        .with_body(r#"{"success": false, "msg": "shop not found"}"#)
        .create_async()
        .await;

    let err = client(server.url(), 10)
        .orders_by_shop(&shop, &OrdersQuery::default())
        .await
        .unwrap_err();
    match err {
        GavelError::ApiResponse(msg) => assert!(msg.contains("shop not found")),
        other => panic!("unexpected error: {other}"),
    }
}
