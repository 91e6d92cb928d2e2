//! Marketplace backend REST client
//!
//! Read-only queries against the backend that indexes on-chain marketplace
//! state: order listings by shop, seller, or mint, and NFT records by mint.
//! Errors are HTTP status passthroughs plus an envelope check; there is no
//! retry or caching here.

mod nft;
mod orders;
mod types;

pub use types::{
    AttributeFilter, ListEnvelope, Nft, Order, OrderPage, OrderStatus, OrdersQuery, SingleEnvelope,
    Side, SortBy,
};

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::GavelConfig;
use crate::error::{GavelError, Result};

/// HTTP client for the marketplace backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    page_limit: u32,
}

impl BackendClient {
    /// `base_url` without a trailing slash. `page_limit` is the page size
    /// for internally paginated queries.
    pub fn new(base_url: String, timeout: Duration, page_limit: u32) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            page_limit,
        })
    }

    pub fn from_config(config: &GavelConfig) -> Result<Self> {
        Self::new(
            config.backend.base_url.clone(),
            Duration::from_secs(config.backend.timeout_secs),
            config.backend.page_limit,
        )
    }

    pub(crate) fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// GET `path` with repeated query pairs, expecting a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GavelError::ApiStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Fails on `success: false` envelopes, carrying the backend's message.
pub(crate) fn check_envelope(success: bool, msg: Option<String>, context: &str) -> Result<()> {
    if !success {
        return Err(GavelError::ApiResponse(format!(
            "{context}: {}",
            msg.unwrap_or_else(|| "no message".to_string())
        )));
    }
    Ok(())
}
