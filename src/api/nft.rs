//! NFT record queries

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::{GavelError, Result};

use super::types::{Nft, SingleEnvelope};
use super::{check_envelope, BackendClient};

impl BackendClient {
    /// The backend's record for one NFT mint.
    pub async fn nft_by_mint(&self, mint: &Pubkey) -> Result<Nft> {
        debug!(%mint, "fetching nft record");
        let envelope: SingleEnvelope<Nft> = self.get_json(&format!("/nft/{mint}"), &[]).await?;
        check_envelope(envelope.success, envelope.msg, "nft record")?;
        envelope
            .result
            .ok_or_else(|| GavelError::ApiResponse(format!("no nft record for mint {mint}")))
    }
}
