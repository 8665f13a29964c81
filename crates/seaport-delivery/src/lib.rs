//! Transaction issuer collaborator.
//!
//! Encoded calls are wrapped in a [`TransactionMethods`] handle so the caller
//! decides whether to dry-run, estimate, or submit. Nothing in the SDK submits
//! a transaction on its own except the action pipeline.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use seaport_types::{Transaction, TransactionHash, TransactionReceipt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

#[derive(Debug, Error)]
pub enum DeliveryError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Transaction reverted: {0}")]
	Reverted(String),
	#[error("Timeout: {0}")]
	Timeout(String),
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Address that submitted transactions are sent from.
	fn sender(&self) -> Address;

	fn chain_id(&self) -> u64;

	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError>;

	/// Executes the call against the latest block without submitting it.
	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError>;

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	async fn get_receipt(&self, hash: &TransactionHash)
		-> Result<TransactionReceipt, DeliveryError>;
}

/// A prepared contract call.
///
/// Each method is independent: estimating gas does not submit, and calling
/// statically does not change chain state.
#[derive(Clone)]
pub struct TransactionMethods {
	delivery: Arc<dyn DeliveryInterface>,
	transaction: Transaction,
}

impl std::fmt::Debug for TransactionMethods {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransactionMethods")
			.field("transaction", &self.transaction)
			.finish()
	}
}

impl TransactionMethods {
	/// Prepares a call to `to` sent from the issuer's account.
	pub fn new(delivery: Arc<dyn DeliveryInterface>, to: Address, data: Vec<u8>) -> Self {
		let transaction = Transaction::call(delivery.chain_id(), delivery.sender(), to, data);
		Self {
			delivery,
			transaction,
		}
	}

	pub fn with_value(mut self, value: U256) -> Self {
		self.transaction.value = value;
		self
	}

	/// The unsigned transaction this handle would submit.
	pub fn build_transaction(&self) -> Transaction {
		self.transaction.clone()
	}

	pub async fn call_static(&self) -> Result<Bytes, DeliveryError> {
		self.delivery.call(&self.transaction).await
	}

	pub async fn estimate_gas(&self) -> Result<u64, DeliveryError> {
		self.delivery.estimate_gas(&self.transaction).await
	}

	/// Submits the transaction and returns its hash without waiting.
	pub async fn transact(&self) -> Result<TransactionHash, DeliveryError> {
		let hash = self.delivery.submit(self.transaction.clone()).await?;
		info!(tx_hash = %hash.truncated(), "Submitted transaction");
		Ok(hash)
	}

	/// Submits, waits for `confirmations`, and requires a successful receipt.
	pub async fn transact_and_confirm(
		&self,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let hash = self.transact().await?;
		let receipt = self
			.delivery
			.wait_for_confirmation(&hash, confirmations)
			.await?;

		if !receipt.success {
			warn!(tx_hash = %hash.truncated(), "Transaction reverted");
			return Err(DeliveryError::Reverted(hash.to_string()));
		}
		Ok(receipt)
	}
}
