//! Wallet management

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::sync::Arc;

use crate::config::GavelConfig;
use crate::error::{GavelError, Result};

/// Holds the signing keypair for settlement and purchase flows.
///
/// Accepts the two common keypair file formats: raw 64 bytes, or the CLI's
/// JSON byte array. An all-zero key is rejected in both.
#[derive(Debug)]
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    pub fn from_file(path: &str) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| GavelError::Wallet(format!("cannot read keypair file {path}: {e}")))?;

        let raw: Vec<u8> = if bytes.len() == 64 {
            bytes
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| GavelError::Wallet(format!("keypair JSON in {path}: {e}")))?
        };

        if raw.len() != 64 {
            return Err(GavelError::Wallet(format!(
                "keypair must be 64 bytes, got {}",
                raw.len()
            )));
        }
        if raw.iter().all(|&b| b == 0) {
            return Err(GavelError::Wallet("all-zero key rejected".to_string()));
        }

        let keypair = Keypair::try_from(raw.as_slice())
            .map_err(|e| GavelError::Wallet(format!("invalid keypair bytes: {e}")))?;
        Ok(Self::from_keypair(keypair))
    }

    pub fn from_config(config: &GavelConfig) -> Result<Self> {
        Self::from_file(&config.wallet.keypair_path)
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn keypair_arc(&self) -> Arc<Keypair> {
        Arc::clone(&self.keypair)
    }
}

impl Clone for WalletManager {
    fn clone(&self) -> Self {
        Self {
            keypair: Arc::clone(&self.keypair),
        }
    }
}
