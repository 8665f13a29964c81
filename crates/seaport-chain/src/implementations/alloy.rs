//! Chain-state reads over JSON-RPC using alloy.

use crate::{ChainError, ChainStateInterface};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use seaport_types::abi::{IERC20, IERC721, ISeaport};
use seaport_types::OrderStatus;
use tracing::debug;

pub struct AlloyChainState {
	provider: DynProvider,
	seaport: Address,
}

impl AlloyChainState {
	/// Connects to `rpc_url`, reading order state from the `seaport` contract.
	pub fn new(rpc_url: &str, seaport: Address) -> Result<Self, ChainError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ChainError::InvalidConfig(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self { provider, seaport })
	}

	async fn read(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, ChainError> {
		let request = TransactionRequest::default()
			.to(to)
			.input(TransactionInput::new(calldata.into()));

		self.provider
			.call(request)
			.await
			.map_err(|e| ChainError::Reverted(format!("eth_call to {} failed: {}", to, e)))
	}
}

fn decode_error(e: alloy::sol_types::Error) -> ChainError {
	ChainError::Decode(e.to_string())
}

#[async_trait]
impl ChainStateInterface for AlloyChainState {
	async fn allowance(
		&self,
		token: Address,
		owner: Address,
		operator: Address,
	) -> Result<U256, ChainError> {
		let call = IERC20::allowanceCall {
			owner,
			spender: operator,
		};
		let data = self.read(token, call.abi_encode()).await?;
		let allowance = U256::abi_decode(&data).map_err(decode_error)?;
		debug!(%token, %owner, %operator, %allowance, "Read allowance");
		Ok(allowance)
	}

	async fn is_approved_for_all(
		&self,
		token: Address,
		owner: Address,
		operator: Address,
	) -> Result<bool, ChainError> {
		let call = IERC721::isApprovedForAllCall { owner, operator };
		let data = self.read(token, call.abi_encode()).await?;
		let approved = bool::abi_decode(&data).map_err(decode_error)?;
		debug!(%token, %owner, %operator, approved, "Read operator approval");
		Ok(approved)
	}

	async fn order_status(&self, order_hash: B256) -> Result<OrderStatus, ChainError> {
		let call = ISeaport::getOrderStatusCall {
			orderHash: order_hash,
		};
		let data = self.read(self.seaport, call.abi_encode()).await?;
		let (is_validated, is_cancelled, total_filled, total_size) =
			<(bool, bool, U256, U256)>::abi_decode_params(&data).map_err(decode_error)?;

		Ok(OrderStatus {
			is_validated,
			is_cancelled,
			total_filled,
			total_size,
		})
	}

	async fn nonce(&self, offerer: Address) -> Result<U256, ChainError> {
		let call = ISeaport::getNonceCall { offerer };
		let data = self.read(self.seaport, call.abi_encode()).await?;
		U256::abi_decode(&data).map_err(decode_error)
	}
}
