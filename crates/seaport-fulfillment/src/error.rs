use alloy::primitives::{Address, U256};
use seaport_types::{ItemType, Side};
use thiserror::Error;

/// Errors raised while resolving criteria or aggregating a batch.
///
/// All of these are detected before any chain interaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FulfillmentError {
	#[error(
		"Unmatched items for {item_type} token {token} identifier {identifier}: offered {offered}, required {required}"
	)]
	UnmatchedItems {
		item_type: ItemType,
		token: Address,
		identifier: U256,
		offered: U256,
		required: U256,
	},
	#[error(
		"Amounts of {item_type} token {token} identifier {identifier} move over different windows"
	)]
	InconsistentAmountSchedule {
		item_type: ItemType,
		token: Address,
		identifier: U256,
	},
	#[error("Criteria item {side} {item_index} of order {order_index} has no resolution")]
	UnresolvedCriteria {
		order_index: usize,
		side: Side,
		item_index: usize,
	},
	#[error("Invalid criteria for {side} {item_index} of order {order_index}: {reason}")]
	InvalidCriteria {
		order_index: usize,
		side: Side,
		item_index: usize,
		reason: String,
	},
	#[error("No {side} item {item_index} in order {order_index}")]
	ItemNotFound {
		order_index: usize,
		side: Side,
		item_index: usize,
	},
	#[error("{side} item {item_index} of order {order_index} is not a criteria item")]
	NotCriteriaItem {
		order_index: usize,
		side: Side,
		item_index: usize,
	},
	#[error("{side} item {item_index} of order {order_index} is resolved more than once")]
	DuplicateResolution {
		order_index: usize,
		side: Side,
		item_index: usize,
	},
}
