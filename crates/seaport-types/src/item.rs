//! Item types for the order protocol.
//!
//! Items are the transferable legs of an order: offer items leave the offerer,
//! consideration items must be received by their recipient for the order to be
//! fulfilled. Both carry a start and an end amount so that the amount can move
//! linearly across the order's active window.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A protocol enum value that names no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown {kind} {value}")]
pub struct UnknownDiscriminant {
	pub kind: &'static str,
	pub value: u8,
}

/// The kind of asset an item transfers.
///
/// The discriminants match the settlement contract's `ItemType` enum and are
/// what gets serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ItemType {
	/// The chain's native currency. Token is always the zero address.
	Native = 0,
	/// A fungible ERC-20 token.
	Erc20 = 1,
	/// A single ERC-721 token identified by id.
	Erc721 = 2,
	/// A semi-fungible ERC-1155 token identified by id.
	Erc1155 = 3,
	/// Any ERC-721 token whose id is committed to by a criteria root.
	Erc721WithCriteria = 4,
	/// Any ERC-1155 token whose id is committed to by a criteria root.
	Erc1155WithCriteria = 5,
}

impl ItemType {
	/// Returns true for native currency and ERC-20 items.
	pub fn is_currency(self) -> bool {
		matches!(self, ItemType::Native | ItemType::Erc20)
	}

	/// Returns true when the identifier field holds a criteria root.
	pub fn is_criteria(self) -> bool {
		matches!(
			self,
			ItemType::Erc721WithCriteria | ItemType::Erc1155WithCriteria
		)
	}

	/// Returns true for every ERC-721 and ERC-1155 kind.
	pub fn is_nft(self) -> bool {
		!self.is_currency()
	}

	/// The concrete kind a criteria item becomes once its identifier is resolved.
	pub fn resolved(self) -> ItemType {
		match self {
			ItemType::Erc721WithCriteria => ItemType::Erc721,
			ItemType::Erc1155WithCriteria => ItemType::Erc1155,
			other => other,
		}
	}

	/// The criteria kind matching a concrete NFT kind.
	pub fn with_criteria(self) -> ItemType {
		match self {
			ItemType::Erc721 => ItemType::Erc721WithCriteria,
			ItemType::Erc1155 => ItemType::Erc1155WithCriteria,
			other => other,
		}
	}

	pub fn as_u8(self) -> u8 {
		self as u8
	}
}

impl From<ItemType> for u8 {
	fn from(item_type: ItemType) -> u8 {
		item_type.as_u8()
	}
}

impl TryFrom<u8> for ItemType {
	type Error = UnknownDiscriminant;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => ItemType::Native,
			1 => ItemType::Erc20,
			2 => ItemType::Erc721,
			3 => ItemType::Erc1155,
			4 => ItemType::Erc721WithCriteria,
			5 => ItemType::Erc1155WithCriteria,
			_ => {
				return Err(UnknownDiscriminant {
					kind: "item type",
					value,
				})
			}
		})
	}
}

impl fmt::Display for ItemType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ItemType::Native => "native",
			ItemType::Erc20 => "erc20",
			ItemType::Erc721 => "erc721",
			ItemType::Erc1155 => "erc1155",
			ItemType::Erc721WithCriteria => "erc721_with_criteria",
			ItemType::Erc1155WithCriteria => "erc1155_with_criteria",
		};
		f.write_str(name)
	}
}

/// Which array of an order an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Side {
	Offer = 0,
	Consideration = 1,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Offer => f.write_str("offer"),
			Side::Consideration => f.write_str("consideration"),
		}
	}
}

/// An item supplied by the offerer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub start_amount: U256,
	pub end_amount: U256,
}

/// An item that must be received by `recipient` for the order to be fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsiderationItem {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub start_amount: U256,
	pub end_amount: U256,
	pub recipient: Address,
}

/// Common read access to offer and consideration items.
pub trait Item {
	fn item_type(&self) -> ItemType;
	fn token(&self) -> Address;
	fn identifier_or_criteria(&self) -> U256;
	fn start_amount(&self) -> U256;
	fn end_amount(&self) -> U256;

	/// The larger of the two amounts, i.e. the most the item can ever move.
	fn max_amount(&self) -> U256 {
		self.start_amount().max(self.end_amount())
	}

	/// Returns true when the amount changes over the active window.
	fn is_variable(&self) -> bool {
		self.start_amount() != self.end_amount()
	}
}

impl Item for OfferItem {
	fn item_type(&self) -> ItemType {
		self.item_type
	}
	fn token(&self) -> Address {
		self.token
	}
	fn identifier_or_criteria(&self) -> U256 {
		self.identifier_or_criteria
	}
	fn start_amount(&self) -> U256 {
		self.start_amount
	}
	fn end_amount(&self) -> U256 {
		self.end_amount
	}
}

impl Item for ConsiderationItem {
	fn item_type(&self) -> ItemType {
		self.item_type
	}
	fn token(&self) -> Address {
		self.token
	}
	fn identifier_or_criteria(&self) -> U256 {
		self.identifier_or_criteria
	}
	fn start_amount(&self) -> U256 {
		self.start_amount
	}
	fn end_amount(&self) -> U256 {
		self.end_amount
	}
}

impl ConsiderationItem {
	/// Drops the recipient, turning the item into an offer leg.
	pub fn to_offer_item(&self) -> OfferItem {
		OfferItem {
			item_type: self.item_type,
			token: self.token,
			identifier_or_criteria: self.identifier_or_criteria,
			start_amount: self.start_amount,
			end_amount: self.end_amount,
		}
	}
}

impl OfferItem {
	/// Attaches a recipient, turning the item into a consideration leg.
	pub fn to_consideration_item(&self, recipient: Address) -> ConsiderationItem {
		ConsiderationItem {
			item_type: self.item_type,
			token: self.token,
			identifier_or_criteria: self.identifier_or_criteria,
			start_amount: self.start_amount,
			end_amount: self.end_amount,
			recipient,
		}
	}
}

/// Computes the amount of an item at time `at` within `[start_time, end_time)`.
///
/// Mirrors the settlement engine's linear interpolation: offer amounts are
/// rounded down and consideration amounts are rounded up. Times outside the
/// window clamp to the nearest endpoint.
pub fn derive_amount(
	start_amount: U256,
	end_amount: U256,
	start_time: u64,
	end_time: u64,
	at: u64,
	round_up: bool,
) -> U256 {
	if start_amount == end_amount || end_time <= start_time {
		return end_amount;
	}
	if at <= start_time {
		return start_amount;
	}
	if at >= end_time {
		return end_amount;
	}

	let duration = U256::from(end_time - start_time);
	let elapsed = U256::from(at - start_time);
	let remaining = duration - elapsed;

	let total = start_amount
		.saturating_mul(remaining)
		.saturating_add(end_amount.saturating_mul(elapsed));

	if round_up {
		total.saturating_add(duration - U256::from(1)) / duration
	} else {
		total / duration
	}
}
