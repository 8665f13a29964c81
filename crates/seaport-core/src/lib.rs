//! Order protocol client.
//!
//! [`Seaport`] ties the order, approval and fulfillment building blocks to the
//! signer, transaction issuer and chain-state collaborators. Creating or
//! filling orders yields an [`OrderUseCase`]: the approvals still missing plus
//! one terminal action, executed in order by
//! [`OrderUseCase::execute_all_actions`]. Other contract calls return a
//! [`TransactionMethods`] handle and are never submitted on their own.

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;
use seaport_account::AccountInterface;
use seaport_chain::ChainStateInterface;
use seaport_config::SeaportConfig;
use seaport_delivery::{DeliveryInterface, TransactionMethods};
use seaport_fulfillment::Exclusions;
use seaport_order::{order_hash, OrderDomain};
use seaport_types::abi::{self, ISeaport};
use seaport_types::{
	CreateInputItem, CreateOrderInput, CriteriaResolution, Order, OrderComponents, OrderStatus,
	OrderWithNonce,
};
use std::sync::Arc;
use tracing::info;

pub mod actions;
pub mod error;
pub mod pipeline;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{Action, ApprovalAction, CreateOrderAction, ExchangeAction, TerminalAction};
pub use error::{PipelineError, SeaportError};
pub use pipeline::OrderUseCase;

/// Client for one settlement contract deployment.
pub struct Seaport {
	config: SeaportConfig,
	domain: OrderDomain,
	account: Arc<dyn AccountInterface>,
	delivery: Arc<dyn DeliveryInterface>,
	chain: Arc<dyn ChainStateInterface>,
}

impl Seaport {
	/// The account signs orders; the issuer should send from the same address.
	pub fn new(
		config: SeaportConfig,
		account: Arc<dyn AccountInterface>,
		delivery: Arc<dyn DeliveryInterface>,
		chain: Arc<dyn ChainStateInterface>,
	) -> Result<Self, SeaportError> {
		if config
			.seaport
			.conduit_address(config.seaport.default_conduit_key)
			.is_none()
		{
			return Err(SeaportError::Config(format!(
				"Default conduit key {} has no conduit address",
				config.seaport.default_conduit_key
			)));
		}

		let domain = OrderDomain::from_config(&config.seaport, config.network.chain_id);
		Ok(Self {
			config,
			domain,
			account,
			delivery,
			chain,
		})
	}

	pub fn config(&self) -> &SeaportConfig {
		&self.config
	}

	pub fn domain(&self) -> &OrderDomain {
		&self.domain
	}

	/// Plans the creation of an order starting now.
	pub async fn create_order(
		&self,
		input: &CreateOrderInput,
	) -> Result<OrderUseCase<CreateOrderAction>, SeaportError> {
		self.build_create_order_use_case(input, unix_now()).await
	}

	/// Plans filling a batch of orders against each other.
	pub async fn fulfill_orders(
		&self,
		orders: &[OrderWithNonce],
		resolutions: &[CriteriaResolution],
		exclusions: &Exclusions,
	) -> Result<OrderUseCase<ExchangeAction>, SeaportError> {
		self.build_fulfill_use_case(orders, resolutions, exclusions, unix_now())
			.await
	}

	/// Plans filling a single order with a counter-order from this account,
	/// which also pays any `tips`.
	pub async fn fulfill_order(
		&self,
		order: &OrderWithNonce,
		resolutions: &[CriteriaResolution],
		tips: &[CreateInputItem],
	) -> Result<OrderUseCase<ExchangeAction>, SeaportError> {
		self.build_fulfill_order_use_case(order, resolutions, tips, unix_now())
			.await
	}

	/// `cancel(orders)`. Only the offerer or the order's zone may cancel.
	pub fn cancel_orders(&self, orders: &[OrderComponents]) -> TransactionMethods {
		let call = ISeaport::cancelCall {
			orders: orders.iter().map(abi::OrderComponents::from).collect(),
		};
		info!(orders = orders.len(), "Prepared cancel");
		self.seaport_call(call.abi_encode())
	}

	/// `incrementNonce()`, cancelling every order signed under the current
	/// nonce.
	pub fn bulk_cancel_orders(&self) -> TransactionMethods {
		self.seaport_call(ISeaport::incrementNonceCall {}.abi_encode())
	}

	/// `validate(orders)`, recording signatures on chain so the orders can be
	/// filled without them later.
	pub fn validate(&self, orders: &[Order]) -> TransactionMethods {
		let call = ISeaport::validateCall {
			orders: orders.iter().map(abi::Order::from).collect(),
		};
		self.seaport_call(call.abi_encode())
	}

	pub async fn get_order_status(&self, order_hash: B256) -> Result<OrderStatus, SeaportError> {
		Ok(self.chain.order_status(order_hash).await?)
	}

	pub async fn get_nonce(&self, offerer: Address) -> Result<U256, SeaportError> {
		Ok(self.chain.nonce(offerer).await?)
	}

	pub fn get_order_hash(&self, components: &OrderComponents) -> B256 {
		order_hash(components)
	}

	fn seaport_call(&self, calldata: Vec<u8>) -> TransactionMethods {
		TransactionMethods::new(
			self.delivery.clone(),
			self.config.seaport.contract_address,
			calldata,
		)
	}
}

/// Current unix time in seconds.
pub(crate) fn unix_now() -> u64 {
	chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::Harness;
	use seaport_types::abi::ISeaport;

	#[test]
	fn test_rejects_unknown_default_conduit() {
		let mut config = SeaportConfig::default();
		config.seaport.default_conduit_key = B256::repeat_byte(5);
		let harness = Harness::new();
		assert!(matches!(
			Seaport::new(
				config,
				harness.account.clone(),
				harness.delivery.clone(),
				harness.chain.clone()
			),
			Err(SeaportError::Config(_))
		));
	}

	#[test]
	fn test_contract_calls_target_settlement_contract() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());

		let bulk = seaport.bulk_cancel_orders().build_transaction();
		assert_eq!(bulk.to, Some(seaport.config().seaport.contract_address));
		assert_eq!(bulk.data, ISeaport::incrementNonceCall::SELECTOR.to_vec());

		let cancel = seaport.cancel_orders(&[]).build_transaction();
		assert_eq!(&cancel.data[..4], &ISeaport::cancelCall::SELECTOR);
		assert_eq!(cancel.from, Some(harness.delivery.sender()));

		let validate = seaport.validate(&[]).build_transaction();
		assert_eq!(&validate.data[..4], &ISeaport::validateCall::SELECTOR);
	}

	#[tokio::test]
	async fn test_chain_reads() {
		let harness = Harness::new();
		harness.chain.set_nonce(U256::from(4)).await;
		let seaport = harness.seaport(SeaportConfig::default());

		assert_eq!(
			seaport.get_nonce(Address::repeat_byte(1)).await.unwrap(),
			U256::from(4)
		);
		assert_eq!(
			seaport.get_order_status(B256::ZERO).await.unwrap(),
			OrderStatus::default()
		);
	}
}
