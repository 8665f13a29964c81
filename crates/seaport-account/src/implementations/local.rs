//! Local private-key account.
//!
//! Suitable for development and scripted use where the key can live in the
//! environment. Signing never leaves the process.

use crate::{AccountError, AccountInterface};
use alloy::primitives::{Address, B256};
use alloy::signers::{local::PrivateKeySigner, Signer};
use async_trait::async_trait;
use seaport_types::{ConfigSchema, Field, FieldType, Schema, Signature, ValidationError};

/// Local wallet implementation using Alloy's signer.
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a wallet from a hex-encoded private key, with or without 0x.
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}
}

/// Configuration schema for LocalWallet.
pub struct LocalWalletSchema;

impl ConfigSchema for LocalWalletSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("private_key", FieldType::String).with_validator(|value| {
					let key = value.as_str().unwrap_or_default();
					let key_without_prefix = key.strip_prefix("0x").unwrap_or(key);

					if key_without_prefix.len() != 64 {
						return Err("Private key must be 64 hex characters (32 bytes)".to_string());
					}

					if hex::decode(key_without_prefix).is_err() {
						return Err("Private key must be valid hexadecimal".to_string());
					}

					Ok(())
				}),
			],
			vec![],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalWalletSchema)
	}

	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_digest(&self, digest: B256) -> Result<Signature, AccountError> {
		let signature = self
			.signer
			.sign_hash(&digest)
			.await
			.map_err(|e| AccountError::SigningFailed(format!("Failed to sign digest: {}", e)))?;

		Ok(signature.into())
	}
}

/// Creates a local wallet from its configuration table.
pub fn create_account(config: &toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> {
	LocalWalletSchema
		.validate(config)
		.map_err(|e| AccountError::InvalidKey(e.to_string()))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.ok_or_else(|| AccountError::InvalidKey("private_key is required".to_string()))?;

	Ok(Box::new(LocalWallet::new(private_key)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{address, keccak256};

	// First well-known development key.
	const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn config(key: &str) -> toml::Value {
		let mut table = toml::map::Map::new();
		table.insert("private_key".to_string(), toml::Value::String(key.to_string()));
		toml::Value::Table(table)
	}

	#[tokio::test]
	async fn test_address_from_key() {
		let wallet = LocalWallet::new(KEY).unwrap();
		assert_eq!(
			wallet.address().await.unwrap(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[tokio::test]
	async fn test_typed_message_signature_recovers_signer() {
		let wallet = LocalWallet::new(KEY).unwrap();
		let message = [0x19u8, 0x01, 0xaa, 0xbb];

		let signature = wallet.sign_typed_message(&message).await.unwrap();
		assert_eq!(signature.0.len(), 65);

		let parsed = alloy::primitives::Signature::try_from(signature.0.as_slice()).unwrap();
		let recovered = parsed
			.recover_address_from_prehash(&keccak256(message))
			.unwrap();
		assert_eq!(recovered, wallet.address().await.unwrap());
	}

	#[test]
	fn test_schema() {
		assert!(LocalWalletSchema.validate(&config(KEY)).is_ok());
		assert!(LocalWalletSchema.validate(&config("0x1234")).is_err());
		assert!(LocalWalletSchema
			.validate(&toml::Value::Table(toml::map::Map::new()))
			.is_err());
	}

	#[test]
	fn test_create_account() {
		assert!(create_account(&config(KEY)).is_ok());
		assert!(matches!(
			create_account(&config("not-a-key")),
			Err(AccountError::InvalidKey(_))
		));
	}
}
