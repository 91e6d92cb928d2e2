//! Backend wire types
//!
//! DTOs for the marketplace backend's JSON API. Field names follow the
//! backend's camelCase convention; the one exception is royalty attribute
//! filters, whose `trait_type` key is snake_case on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order book side, as the backend encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Listing lifecycle, as the backend encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open = 0,
    Sold = 1,
    Canceled = 2,
}

impl OrderStatus {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Paged response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Single-record response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
}

/// A marketplace listing as the backend reports it.
///
/// Prices and amounts arrive as decimal strings; the backend avoids JSON
/// number precision loss for u64 lamport values.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub token_mint: String,
    pub token_account: String,
    pub price: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub nft_uri: Option<String>,
    pub seller_address: String,
    pub shop_address: String,
    pub side: u8,
    pub status: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An NFT record as the backend reports it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub mint: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub token_account_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub nft_uri: Option<String>,
}

/// One page of orders with the backend's paging metadata.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub total_count: Option<u64>,
}

/// Attribute predicate; serialized with the backend's snake_case
/// `trait_type` key.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttributeFilter {
    pub trait_type: String,
    pub value: String,
}

/// One sort clause for `orderByArr`.
#[derive(Debug, Clone, Serialize)]
pub struct SortBy {
    pub column: String,
    /// `"asc"` or `"desc"`.
    pub order: String,
}

impl SortBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: "asc".to_string(),
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: "desc".to_string(),
        }
    }
}

/// Query options for shop order listings.
#[derive(Debug, Clone, Default)]
pub struct OrdersQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Vec<SortBy>,
    /// Collection identifiers; one filter predicate is emitted per entry.
    pub identifiers: Vec<u64>,
    pub seller_address: Option<String>,
    pub shop_address: Option<String>,
    pub attributes: Vec<AttributeFilter>,
}
