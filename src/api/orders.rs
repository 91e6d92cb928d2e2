//! Order queries
//!
//! Listings are filtered server-side through `filterArr[]` entries, each a
//! JSON predicate. Identifier-filtered queries emit one predicate per
//! collection identifier; all predicates pin `side` to sell and `status` to
//! open, which is the only slice the front-end lists.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::{GavelError, Result};

use super::types::{AttributeFilter, ListEnvelope, Order, OrderPage, OrderStatus, OrdersQuery, Side, SingleEnvelope};
use super::{check_envelope, BackendClient};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderFilter<'a> {
    side: u8,
    status: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wallet_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shop_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a [AttributeFilter]>,
}

impl<'a> OrderFilter<'a> {
    fn open_sell() -> Self {
        Self {
            side: Side::Sell.as_u8(),
            status: OrderStatus::Open.as_u8(),
            identifier: None,
            wallet_address: None,
            shop_address: None,
            attribute: None,
        }
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| GavelError::InvalidConfig(format!("query encoding: {e}")))
}

/// Query-string pairs for a shop listing request, in the backend's expected
/// order: sort clauses, paging, then filter predicates.
fn build_order_query(query: &OrdersQuery) -> Result<Vec<(&'static str, String)>> {
    let mut pairs = Vec::new();

    for sort in &query.sort_by {
        pairs.push(("orderByArr", encode_json(sort)?));
    }
    if let Some(offset) = query.offset {
        pairs.push(("offset", offset.to_string()));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }

    let attribute = (!query.attributes.is_empty()).then_some(query.attributes.as_slice());
    let base = OrderFilter {
        wallet_address: query.seller_address.as_deref(),
        shop_address: query.shop_address.as_deref(),
        attribute,
        ..OrderFilter::open_sell()
    };

    if query.identifiers.is_empty() {
        pairs.push(("filterArr[]", encode_json(&base)?));
    } else {
        for identifier in &query.identifiers {
            let filter = OrderFilter {
                identifier: Some(*identifier),
                ..base
            };
            pairs.push(("filterArr[]", encode_json(&filter)?));
        }
    }
    Ok(pairs)
}

impl BackendClient {
    /// One page of open sell orders for a shop, with optional sort, paging,
    /// and filter options.
    pub async fn orders_by_shop(&self, shop: &Pubkey, query: &OrdersQuery) -> Result<OrderPage> {
        let pairs = build_order_query(query)?;
        debug!(%shop, filters = pairs.len(), "fetching shop orders");
        let envelope: ListEnvelope<Order> =
            self.get_json(&format!("/order/{shop}"), &pairs).await?;
        check_envelope(envelope.success, envelope.msg, "order list")?;
        Ok(OrderPage {
            orders: envelope.result,
            offset: envelope.offset,
            limit: envelope.limit,
            total_count: envelope.total_count,
        })
    }

    /// The open order for one token mint within one shop.
    pub async fn order_by_mint_and_shop(&self, mint: &Pubkey, shop: &Pubkey) -> Result<Order> {
        debug!(%mint, %shop, "fetching order by mint");
        let envelope: SingleEnvelope<Order> = self
            .get_json(&format!("/order/mint/{mint}/shop/{shop}"), &[])
            .await?;
        check_envelope(envelope.success, envelope.msg, "order by mint")?;
        envelope
            .result
            .ok_or_else(|| GavelError::ApiResponse(format!("no open order for mint {mint}")))
    }

    /// All open sell orders a wallet has listed in a shop.
    ///
    /// Paginates internally: pages of `page_limit` at offsets 0, limit,
    /// 2*limit and so on, stopping at the first page shorter than the
    /// limit. The concatenation of pages is the result.
    pub async fn orders_by_shop_and_wallet(
        &self,
        shop: &Pubkey,
        wallet: &Pubkey,
    ) -> Result<Vec<Order>> {
        let limit = self.page_limit();
        let wallet = wallet.to_string();
        let mut offset = 0u32;
        let mut orders = Vec::new();

        loop {
            let filter = OrderFilter {
                wallet_address: Some(&wallet),
                ..OrderFilter::open_sell()
            };
            let pairs = [
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
                ("filterArr[]", encode_json(&filter)?),
            ];
            let envelope: ListEnvelope<Order> =
                self.get_json(&format!("/order/{shop}"), &pairs).await?;
            check_envelope(envelope.success, envelope.msg, "wallet orders")?;

            let count = envelope.result.len();
            debug!(%shop, offset, count, "wallet order page");
            orders.extend(envelope.result);
            if count != limit as usize {
                break;
            }
            offset += limit;
        }
        Ok(orders)
    }
}
