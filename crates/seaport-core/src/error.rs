use alloy::primitives::Address;
use seaport_account::AccountError;
use seaport_approval::ApprovalError;
use seaport_chain::ChainError;
use seaport_delivery::DeliveryError;
use seaport_fulfillment::FulfillmentError;
use seaport_order::OrderError;
use thiserror::Error;

/// Failures while executing an action pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// An approval did not confirm. Later actions never ran.
	#[error("Approval {index} of {token} for operator {operator} failed: {cause}")]
	AuthorizationFailed {
		index: usize,
		token: Address,
		operator: Address,
		#[source]
		cause: DeliveryError,
	},
	/// Every approval confirmed but the final action failed.
	#[error("Terminal action failed: {0}")]
	TerminalFailed(String),
}

#[derive(Debug, Error)]
pub enum SeaportError {
	#[error(transparent)]
	Order(#[from] OrderError),
	#[error(transparent)]
	Approval(#[from] ApprovalError),
	#[error(transparent)]
	Fulfillment(#[from] FulfillmentError),
	#[error(transparent)]
	Pipeline(#[from] PipelineError),
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	#[error("Delivery error: {0}")]
	Delivery(#[from] DeliveryError),
	#[error("Chain error: {0}")]
	Chain(#[from] ChainError),
	#[error("Configuration error: {0}")]
	Config(String),
}
