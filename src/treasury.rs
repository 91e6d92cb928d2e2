//! Treasury currency classification
//!
//! A shop's treasury mint is either the ledger's native currency or an SPL
//! token, and the distinction changes which addresses receive payments. The
//! collapse rule is fixed: exactly the payment and receipt roles (buyer
//! payment account, seller payment receipt, auction payment receipt) collapse
//! to the wallet address when the treasury is native. The auction-house fee
//! account and treasury never collapse; they are PDAs in both cases.
//!
//! Classification happens before any ATA derivation so a native treasury
//! never derives a meaningless wrapped-token account.

use solana_sdk::pubkey::Pubkey;

use crate::pda::AddressDeriver;

/// Decides native-vs-token treasury handling for one ledger environment.
#[derive(Debug, Clone, Copy)]
pub struct TreasuryClassifier {
    native_mint: Pubkey,
}

impl Default for TreasuryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TreasuryClassifier {
    /// Classifier against the well-known native-mint sentinel.
    pub fn new() -> Self {
        Self {
            native_mint: spl_token::native_mint::id(),
        }
    }

    /// Classifier with a substitute sentinel, for alternate ledger
    /// environments in tests.
    pub fn with_sentinel(native_mint: Pubkey) -> Self {
        Self { native_mint }
    }

    /// Whether `mint` is the native-currency sentinel.
    pub fn is_native(&self, mint: &Pubkey) -> bool {
        *mint == self.native_mint
    }

    /// Payment or receipt address for `wallet` in the treasury currency:
    /// the wallet itself when native, its ATA for the treasury mint
    /// otherwise.
    pub fn payment_account(
        &self,
        deriver: &AddressDeriver,
        wallet: &Pubkey,
        treasury_mint: &Pubkey,
    ) -> Pubkey {
        if self.is_native(treasury_mint) {
            *wallet
        } else {
            deriver.associated_token(wallet, treasury_mint)
        }
    }
}
