//! Loosely typed creation input.
//!
//! These shapes are what callers hand in (usually deserialized from JSON).
//! They are validated and turned into canonical order parameters by the
//! normalizer; nothing here is trusted to be well formed.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::ItemType;

/// Item shorthand accepted when creating an order.
///
/// With no `item_type` the item is currency: native when `token` is absent,
/// ERC-20 otherwise. NFT items take either a single `identifier` or a set of
/// admissible `identifiers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInputItem {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub item_type: Option<ItemType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<Address>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identifier: Option<U256>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identifiers: Option<Vec<U256>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amount: Option<U256>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_amount: Option<U256>,
	/// Only meaningful on consideration items; defaults to the offerer.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recipient: Option<Address>,
}

impl CreateInputItem {
	/// Native currency of the given amount.
	pub fn native(amount: U256) -> Self {
		Self {
			amount: Some(amount),
			..Default::default()
		}
	}

	/// ERC-20 currency of the given amount.
	pub fn erc20(token: Address, amount: U256) -> Self {
		Self {
			token: Some(token),
			amount: Some(amount),
			..Default::default()
		}
	}

	/// A single ERC-721 token.
	pub fn erc721(token: Address, identifier: U256) -> Self {
		Self {
			item_type: Some(ItemType::Erc721),
			token: Some(token),
			identifier: Some(identifier),
			..Default::default()
		}
	}

	/// An amount of one ERC-1155 id.
	pub fn erc1155(token: Address, identifier: U256, amount: U256) -> Self {
		Self {
			item_type: Some(ItemType::Erc1155),
			token: Some(token),
			identifier: Some(identifier),
			amount: Some(amount),
			..Default::default()
		}
	}

	/// Sets the end amount, making the amount move over the window.
	pub fn with_end_amount(mut self, end_amount: U256) -> Self {
		self.end_amount = Some(end_amount);
		self
	}

	/// Sets an explicit recipient.
	pub fn with_recipient(mut self, recipient: Address) -> Self {
		self.recipient = Some(recipient);
		self
	}
}

/// A fee paid out of the order's currency legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
	pub recipient: Address,
	/// Parts per ten thousand. Signed so that malformed input is reported
	/// instead of failing to deserialize.
	pub basis_points: i64,
}

/// Everything a caller may specify when creating an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
	#[serde(default)]
	pub conduit_key: Option<B256>,
	#[serde(default)]
	pub zone: Option<Address>,
	#[serde(default)]
	pub start_time: Option<u64>,
	#[serde(default)]
	pub end_time: Option<u64>,
	pub offer: Vec<CreateInputItem>,
	pub consideration: Vec<CreateInputItem>,
	#[serde(default)]
	pub nonce: Option<U256>,
	#[serde(default)]
	pub fees: Vec<Fee>,
	#[serde(default)]
	pub allow_partial_fills: bool,
	#[serde(default)]
	pub restricted_by_zone: bool,
	#[serde(default)]
	pub salt: Option<U256>,
}
