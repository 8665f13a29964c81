//! Actions of an order use case.
//!
//! A use case is a run of [`ApprovalAction`]s followed by one terminal
//! action: [`CreateOrderAction`] when creating an order, [`ExchangeAction`]
//! when filling a batch.

use crate::error::PipelineError;
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use seaport_account::AccountInterface;
use seaport_approval::Approval;
use seaport_delivery::{DeliveryError, DeliveryInterface, TransactionMethods};
use seaport_fulfillment::MatchPlan;
use seaport_order::{order_hash, OrderDomain};
use seaport_types::{
	truncate_hash, ItemType, OrderComponents, OrderWithNonce, Signature, TransactionHash,
	TransactionReceipt,
};
use std::sync::Arc;
use tracing::info;

/// Grants `operator` the right to move the account's `token`.
#[derive(Debug, Clone)]
pub struct ApprovalAction {
	approval: Approval,
	transaction: TransactionMethods,
}

impl ApprovalAction {
	pub fn new(approval: Approval, delivery: Arc<dyn DeliveryInterface>) -> Self {
		let transaction = TransactionMethods::new(delivery, approval.token, approval.calldata());
		Self {
			approval,
			transaction,
		}
	}

	pub fn item_type(&self) -> ItemType {
		self.approval.item_type
	}

	pub fn token(&self) -> Address {
		self.approval.token
	}

	pub fn identifier_or_criteria(&self) -> U256 {
		self.approval.identifier_or_criteria
	}

	pub fn operator(&self) -> Address {
		self.approval.operator
	}

	/// The prepared approval transaction, for callers driving it themselves.
	pub fn transaction_methods(&self) -> &TransactionMethods {
		&self.transaction
	}

	/// Submits the approval and waits until it is confirmed and successful.
	pub async fn execute(&self, confirmations: u64) -> Result<TransactionReceipt, DeliveryError> {
		self.transaction.transact_and_confirm(confirmations).await
	}
}

/// The final step of a use case.
#[async_trait]
pub trait TerminalAction: Send + Sync {
	type Output: Send;

	/// Short name for logs.
	fn name(&self) -> &'static str;

	async fn execute(self) -> Result<Self::Output, PipelineError>;
}

/// Signs order components and assembles the signed order.
///
/// Signing is split in two steps so a caller holding its own signer can get
/// the exact bytes with [`CreateOrderAction::message_to_sign`] and hand the
/// signature back to [`CreateOrderAction::create_order`].
pub struct CreateOrderAction {
	domain: OrderDomain,
	components: OrderComponents,
	account: Arc<dyn AccountInterface>,
}

impl CreateOrderAction {
	pub fn new(
		domain: OrderDomain,
		components: OrderComponents,
		account: Arc<dyn AccountInterface>,
	) -> Self {
		Self {
			domain,
			components,
			account,
		}
	}

	pub fn components(&self) -> &OrderComponents {
		&self.components
	}

	pub fn order_hash(&self) -> B256 {
		order_hash(&self.components)
	}

	/// `0x1901 ‖ domainSeparator ‖ orderHash`. Signers sign its keccak256.
	pub fn message_to_sign(&self) -> Vec<u8> {
		self.domain.message_to_sign(&self.components)
	}

	/// Attaches a signature produced over [`Self::message_to_sign`].
	pub fn create_order(&self, signature: Signature) -> OrderWithNonce {
		OrderWithNonce {
			parameters: self.components.clone(),
			signature: signature.into(),
		}
	}
}

impl std::fmt::Debug for CreateOrderAction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CreateOrderAction")
			.field("components", &self.components)
			.finish()
	}
}

#[async_trait]
impl TerminalAction for CreateOrderAction {
	type Output = OrderWithNonce;

	fn name(&self) -> &'static str {
		"create_order"
	}

	async fn execute(self) -> Result<OrderWithNonce, PipelineError> {
		let signature = self
			.account
			.sign_typed_message(&self.message_to_sign())
			.await
			.map_err(|e| PipelineError::TerminalFailed(e.to_string()))?;

		let order = self.create_order(signature);
		info!(
			order_hash = %truncate_hash(&self.order_hash().to_string()),
			"Signed order"
		);
		Ok(order)
	}
}

/// Submits a batch to the settlement contract's match entry point.
#[derive(Debug, Clone)]
pub struct ExchangeAction {
	plan: MatchPlan,
	transaction: TransactionMethods,
}

impl ExchangeAction {
	pub fn new(plan: MatchPlan, delivery: Arc<dyn DeliveryInterface>, seaport: Address) -> Self {
		let transaction =
			TransactionMethods::new(delivery, seaport, plan.calldata()).with_value(plan.value);
		Self { plan, transaction }
	}

	pub fn plan(&self) -> &MatchPlan {
		&self.plan
	}

	pub fn calldata(&self) -> Bytes {
		self.transaction.build_transaction().data.into()
	}

	pub fn transaction_methods(&self) -> &TransactionMethods {
		&self.transaction
	}
}

#[async_trait]
impl TerminalAction for ExchangeAction {
	type Output = TransactionHash;

	fn name(&self) -> &'static str {
		"exchange"
	}

	async fn execute(self) -> Result<TransactionHash, PipelineError> {
		self.transaction
			.transact()
			.await
			.map_err(|e| PipelineError::TerminalFailed(e.to_string()))
	}
}

/// Read-only view of one step of a use case.
#[derive(Debug)]
pub enum Action<'a, T> {
	Approval(&'a ApprovalAction),
	Terminal(&'a T),
}
