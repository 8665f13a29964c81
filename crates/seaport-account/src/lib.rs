//! Signing account collaborator.
//!
//! Order creation needs two things from an account: its address (the offerer)
//! and a signature over the EIP-712 message of the order. Everything else an
//! account might do is left to the transaction issuer.

use alloy::primitives::{keccak256, Address, B256};
use async_trait::async_trait;
use seaport_types::{ConfigSchema, Signature};
use thiserror::Error;

pub mod implementations {
	pub mod local;
}

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	#[error("Unknown account provider: {0}")]
	UnknownProvider(String),
}

#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Schema of the provider-specific configuration table.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a 32-byte digest as is, without any message prefix.
	async fn sign_digest(&self, digest: B256) -> Result<Signature, AccountError>;

	/// Signs structured-data message bytes (`0x1901 ‖ domain ‖ struct hash`).
	///
	/// The signature is over `keccak256(message)`.
	async fn sign_typed_message(&self, message: &[u8]) -> Result<Signature, AccountError> {
		self.sign_digest(keccak256(message)).await
	}
}

/// Returns the configuration schema for the named provider.
pub fn config_schema(provider: &str) -> Option<Box<dyn ConfigSchema>> {
	match provider {
		"local" => Some(Box::new(implementations::local::LocalWalletSchema)),
		_ => None,
	}
}

/// Builds the named account provider from its configuration table.
pub fn create_account(
	provider: &str,
	config: &toml::Value,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	match provider {
		"local" => implementations::local::create_account(config),
		other => Err(AccountError::UnknownProvider(other.to_string())),
	}
}
