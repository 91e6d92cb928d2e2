//! Transaction sequencing and submission
//!
//! [`TransactionSender`] is the seam to the ledger's write path: one signed
//! transaction in, one confirmed signature out, no automatic retry. The
//! [`TransactionSequencer`] layers ordering on top. For two-phase operations
//! the second phase's instructions are not even constructed until the first
//! submission has returned success; the dependency is enforced by control
//! flow, not call-order discipline.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::GavelConfig;
use crate::error::{GavelError, Result};

/// Write access to the ledger.
///
/// Implementations sign, submit, and wait for broadcast success. They do not
/// retry; a failed submission surfaces as [`GavelError::Submission`] and the
/// caller decides, after confirming the transaction is absent from the
/// ledger, whether to resubmit.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    async fn submit(&self, instructions: &[Instruction], signer: &Keypair) -> Result<Signature>;
}

/// [`TransactionSender`] over a JSON-RPC node: fetch a recent blockhash,
/// sign with the fee payer, send and confirm.
pub struct RpcTransactionSender {
    client: RpcClient,
}

impl RpcTransactionSender {
    pub fn new(endpoint: String, commitment: CommitmentConfig, timeout: Duration) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(endpoint, timeout, commitment),
        }
    }

    pub fn from_config(config: &GavelConfig) -> Result<Self> {
        Ok(Self::new(
            config.rpc.endpoint.clone(),
            config.commitment()?,
            Duration::from_secs(config.rpc.timeout_secs),
        ))
    }
}

/// Rejects transactions that cannot fit a wire packet before they reach the
/// network. A long royalty list can push an instruction past the limit.
fn check_transaction_size(transaction: &Transaction) -> Result<()> {
    let size = bincode::serialized_size(transaction)
        .map_err(|e| GavelError::submission(format!("transaction serialization: {e}")))?
        as usize;
    if size > PACKET_DATA_SIZE {
        return Err(GavelError::submission(format!(
            "transaction is {size} bytes, wire limit is {PACKET_DATA_SIZE}"
        )));
    }
    Ok(())
}

#[async_trait]
impl TransactionSender for RpcTransactionSender {
    async fn submit(&self, instructions: &[Instruction], signer: &Keypair) -> Result<Signature> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(GavelError::from)?;
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        );
        check_transaction_size(&transaction)?;
        let signature = self
            .client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(GavelError::from)?;
        debug!(%signature, instructions = instructions.len(), "transaction confirmed");
        Ok(signature)
    }
}

/// Signatures of a completed two-phase operation, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPhaseReceipt {
    pub first: Signature,
    pub second: Signature,
}

/// Orders transaction submission for single- and two-phase operations.
pub struct TransactionSequencer<S> {
    sender: S,
}

impl<S: TransactionSender> TransactionSequencer<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Submit one transaction.
    pub async fn run_single(
        &self,
        instructions: Vec<Instruction>,
        signer: &Keypair,
    ) -> Result<Signature> {
        if instructions.is_empty() {
            return Err(GavelError::submission("empty instruction set"));
        }
        self.sender.submit(&instructions, signer).await
    }

    /// Submit two strictly ordered transactions.
    ///
    /// `second` runs only after the first submission returns success, so a
    /// phase-1 failure leaves phase 2 unconstructed and unsubmitted. An
    /// abort between the phases leaves the operation resumable; nothing is
    /// retried here.
    pub async fn run_two_phase<F>(
        &self,
        first: Vec<Instruction>,
        second: F,
        signer: &Keypair,
    ) -> Result<TwoPhaseReceipt>
    where
        F: FnOnce() -> Result<Vec<Instruction>> + Send,
    {
        let first_signature = self.run_single(first, signer).await?;
        info!(signature = %first_signature, "phase 1 confirmed");

        let second_signature = self.run_single(second()?, signer).await?;
        info!(signature = %second_signature, "phase 2 confirmed");

        Ok(TwoPhaseReceipt {
            first: first_signature,
            second: second_signature,
        })
    }
}
