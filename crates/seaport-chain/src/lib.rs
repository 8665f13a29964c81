//! Chain-state reader collaborator.
//!
//! Read-only views of the token and settlement contracts. Planning and
//! validity checks go through this trait and never mutate chain state.

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use seaport_types::OrderStatus;
use thiserror::Error;

pub mod implementations {
	pub mod alloy;
}

#[derive(Debug, Error)]
pub enum ChainError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Call reverted: {0}")]
	Reverted(String),
	#[error("Failed to decode response: {0}")]
	Decode(String),
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

#[async_trait]
pub trait ChainStateInterface: Send + Sync {
	/// ERC-20 allowance granted by `owner` to `operator`.
	async fn allowance(
		&self,
		token: Address,
		owner: Address,
		operator: Address,
	) -> Result<U256, ChainError>;

	/// ERC-721/ERC-1155 operator approval of `operator` by `owner`.
	async fn is_approved_for_all(
		&self,
		token: Address,
		owner: Address,
		operator: Address,
	) -> Result<bool, ChainError>;

	/// Status of an order as recorded by the settlement contract.
	async fn order_status(&self, order_hash: B256) -> Result<OrderStatus, ChainError>;

	/// Current nonce of `offerer` on the settlement contract.
	async fn nonce(&self, offerer: Address) -> Result<U256, ChainError>;
}
