//! Alloy-backed transaction issuer for EVM chains.
//!
//! Transactions are signed by a local key held in the provider's wallet
//! filler; nonce, gas and fee fields are filled by the provider.

use crate::{DeliveryError, DeliveryInterface};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::{local::PrivateKeySigner, Signer};
use async_trait::async_trait;
use seaport_types::{Transaction, TransactionHash, TransactionReceipt};

/// Alloy-based EVM delivery implementation.
pub struct AlloyDelivery {
	provider: DynProvider,
	sender: Address,
	chain_id: u64,
}

impl AlloyDelivery {
	/// Connects to `rpc_url` with a wallet holding `signer`.
	pub fn new(rpc_url: &str, chain_id: u64, signer: PrivateKeySigner) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::InvalidConfig(format!("Invalid RPC URL: {}", e)))?;

		let signer = signer.with_chain_id(Some(chain_id));
		let sender = signer.address();
		let wallet = EthereumWallet::from(signer);

		let provider = ProviderBuilder::new()
			.wallet(wallet)
			.connect_http(url)
			.erased();

		Ok(Self {
			provider,
			sender,
			chain_id,
		})
	}

	fn request(tx: &Transaction) -> TransactionRequest {
		tx.clone().into()
	}
}

fn receipt_hash(hash: &TransactionHash) -> Result<B256, DeliveryError> {
	if hash.0.len() != 32 {
		return Err(DeliveryError::Network(format!(
			"Malformed transaction hash {}",
			hash
		)));
	}
	Ok(B256::from_slice(&hash.0))
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	fn sender(&self) -> Address {
		self.sender
	}

	fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, DeliveryError> {
		self.provider
			.estimate_gas(Self::request(tx))
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to estimate gas: {}", e)))
	}

	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		self.provider
			.call(Self::request(tx))
			.await
			.map_err(|e| DeliveryError::Reverted(format!("Static call failed: {}", e)))
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		let request: TransactionRequest = tx.into();

		let pending_tx =
			self.provider.send_transaction(request).await.map_err(|e| {
				DeliveryError::Network(format!("Failed to send transaction: {}", e))
			})?;

		let tx_hash = *pending_tx.tx_hash();
		Ok(TransactionHash(tx_hash.0.to_vec()))
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = receipt_hash(hash)?;

		let poll_interval = tokio::time::Duration::from_secs(2);
		// Roughly one block time per confirmation, plus a floor for inclusion.
		let seconds_per_confirmation = 20;
		let max_timeout = 3600;
		let timeout_seconds = (confirmations * seconds_per_confirmation)
			.max(seconds_per_confirmation * 3)
			.min(max_timeout);
		let max_wait_time = tokio::time::Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		tracing::info!(
			tx_hash = %hash.truncated(),
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			timeout_seconds
		);

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(DeliveryError::Timeout(format!(
					"{} confirmations not reached after {} seconds",
					confirmations,
					max_wait_time.as_secs()
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					tokio::time::sleep(poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(DeliveryError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				}
			};

			let current_block = self.provider.get_block_number().await.map_err(|e| {
				DeliveryError::Network(format!("Failed to get block number: {}", e))
			})?;

			let tx_block = receipt.block_number.unwrap_or(0);
			// The inclusion block counts as the first confirmation.
			let current_confirmations = current_block.saturating_sub(tx_block) + 1;

			if current_confirmations >= confirmations {
				return Ok(TransactionReceipt {
					hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
					block_number: tx_block,
					success: receipt.status(),
				});
			}

			tracing::debug!(
				"Waiting for {} more confirmations...",
				confirmations.saturating_sub(current_confirmations)
			);

			tokio::time::sleep(poll_interval).await;
		}
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = receipt_hash(hash)?;

		let receipt = self
			.provider
			.get_transaction_receipt(tx_hash)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?
			.ok_or_else(|| DeliveryError::Network("Transaction not found".to_string()))?;

		Ok(TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
		})
	}
}

/// Creates an HTTP delivery from the network settings and the account table.
///
/// The account table must carry `private_key`; the same key signs orders.
pub fn create_http_delivery(
	rpc_url: &str,
	chain_id: u64,
	account_config: &toml::Value,
) -> Result<AlloyDelivery, DeliveryError> {
	let private_key = account_config
		.get("private_key")
		.and_then(|v| v.as_str())
		.ok_or_else(|| DeliveryError::InvalidConfig("private_key is required".to_string()))?;

	let signer: PrivateKeySigner = private_key
		.parse()
		.map_err(|e| DeliveryError::InvalidConfig(format!("Invalid private key: {}", e)))?;

	AlloyDelivery::new(rpc_url, chain_id, signer)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_receipt_hash_requires_32_bytes() {
		assert!(receipt_hash(&TransactionHash(vec![1, 2, 3])).is_err());
		assert_eq!(
			receipt_hash(&TransactionHash(vec![7; 32])).unwrap(),
			B256::repeat_byte(7)
		);
	}

	#[test]
	fn test_create_http_delivery_validates_inputs() {
		let mut table = toml::map::Map::new();
		assert!(matches!(
			create_http_delivery("http://localhost:8545", 1, &toml::Value::Table(table.clone())),
			Err(DeliveryError::InvalidConfig(_))
		));

		table.insert(
			"private_key".to_string(),
			toml::Value::String(
				"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
			),
		);
		let delivery =
			create_http_delivery("http://localhost:8545", 31337, &toml::Value::Table(table))
				.unwrap();
		assert_eq!(delivery.chain_id(), 31337);
		assert_eq!(
			delivery.sender(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
				.parse::<Address>()
				.unwrap()
		);
	}
}
