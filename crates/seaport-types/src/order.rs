//! Order records for the order protocol.
//!
//! `OrderWithNonce` (components plus signature) is the record meant to be
//! persisted or sent over the wire; everything needed to fulfill an order
//! later can be rebuilt from it.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{ConsiderationItem, OfferItem, Side, UnknownDiscriminant};

/// Fill and zone behaviour of an order.
///
/// The discriminants match the settlement contract's `OrderType` enum and
/// are what gets serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum OrderType {
	/// No partial fills, anyone can execute.
	FullOpen = 0,
	/// Partial fills supported, anyone can execute.
	PartialOpen = 1,
	/// No partial fills, only offerer or zone can execute.
	FullRestricted = 2,
	/// Partial fills supported, only offerer or zone can execute.
	PartialRestricted = 3,
}

impl OrderType {
	pub fn new(allow_partial_fills: bool, restricted_by_zone: bool) -> Self {
		match (allow_partial_fills, restricted_by_zone) {
			(false, false) => OrderType::FullOpen,
			(true, false) => OrderType::PartialOpen,
			(false, true) => OrderType::FullRestricted,
			(true, true) => OrderType::PartialRestricted,
		}
	}

	pub fn allows_partial_fills(self) -> bool {
		matches!(self, OrderType::PartialOpen | OrderType::PartialRestricted)
	}

	pub fn is_restricted(self) -> bool {
		matches!(
			self,
			OrderType::FullRestricted | OrderType::PartialRestricted
		)
	}

	pub fn as_u8(self) -> u8 {
		self as u8
	}
}

impl From<OrderType> for u8 {
	fn from(order_type: OrderType) -> u8 {
		order_type.as_u8()
	}
}

impl TryFrom<u8> for OrderType {
	type Error = UnknownDiscriminant;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => OrderType::FullOpen,
			1 => OrderType::PartialOpen,
			2 => OrderType::FullRestricted,
			3 => OrderType::PartialRestricted,
			_ => {
				return Err(UnknownDiscriminant {
					kind: "order type",
					value,
				})
			}
		})
	}
}

/// The canonical parameters of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParameters {
	pub offerer: Address,
	pub zone: Address,
	pub order_type: OrderType,
	pub start_time: u64,
	pub end_time: u64,
	pub zone_hash: B256,
	pub salt: U256,
	pub offer: Vec<OfferItem>,
	pub consideration: Vec<ConsiderationItem>,
	/// Number of consideration items the offerer specified before fees were
	/// appended. Items past this index are bounded additions.
	pub total_original_consideration_items: usize,
	pub conduit_key: B256,
}

impl OrderParameters {
	/// Returns true when any item amount moves over the active window.
	pub fn has_variable_amounts(&self) -> bool {
		use crate::Item;
		self.offer.iter().any(|item| item.is_variable())
			|| self.consideration.iter().any(|item| item.is_variable())
	}

	/// Number of items on the given side.
	pub fn item_count(&self, side: Side) -> usize {
		match side {
			Side::Offer => self.offer.len(),
			Side::Consideration => self.consideration.len(),
		}
	}
}

/// Order parameters plus the offerer's nonce at signing time.
///
/// Incrementing the offerer's on-chain nonce invalidates every order signed
/// under the previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderComponents {
	#[serde(flatten)]
	pub parameters: OrderParameters,
	pub nonce: U256,
}

/// Order parameters plus the offerer's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	pub parameters: OrderParameters,
	pub signature: Bytes,
}

/// A signed order that still carries the nonce it was signed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithNonce {
	pub parameters: OrderComponents,
	pub signature: Bytes,
}

impl From<OrderWithNonce> for Order {
	fn from(order: OrderWithNonce) -> Self {
		Order {
			parameters: order.parameters.parameters,
			signature: order.signature,
		}
	}
}

impl OrderWithNonce {
	/// Borrows the order parameters.
	pub fn order_parameters(&self) -> &OrderParameters {
		&self.parameters.parameters
	}
}

/// On-chain status of an order, owned by the settlement contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
	pub is_validated: bool,
	pub is_cancelled: bool,
	pub total_filled: U256,
	pub total_size: U256,
}

impl OrderStatus {
	/// Returns true once every unit of the order has been filled.
	pub fn is_fully_filled(&self) -> bool {
		!self.total_size.is_zero() && self.total_filled >= self.total_size
	}
}

/// A concrete identifier picked out of an admissible identifier set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCriteria {
	pub identifier: U256,
	/// Every identifier the criteria root commits to. Empty means the item
	/// accepts any identifier of its collection.
	pub valid_identifiers: Vec<U256>,
}

/// Resolution of one criteria item in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaResolution {
	pub order_index: usize,
	pub side: Side,
	pub item_index: usize,
	pub criteria: InputCriteria,
}
