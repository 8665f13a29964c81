//! Authorization requirements derived from the items an account must send.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{Item, ItemType};

/// A (token, operator) pair that must be authorized before the account's
/// items can be moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequirement {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub operator: Address,
	/// Total ERC-20 amount needed across all items of this token. Unused for
	/// NFT kinds, whose approval is all-or-nothing.
	pub amount: U256,
}

/// Collects the distinct requirements for moving `items` through `operator`.
///
/// Native items need no authorization and are skipped. The result keeps the
/// order in which each token first appears.
pub fn collect_requirements<'a, I, T>(items: I, operator: Address) -> Vec<ApprovalRequirement>
where
	I: IntoIterator<Item = &'a T>,
	T: Item + 'a,
{
	let mut requirements: Vec<ApprovalRequirement> = Vec::new();

	for item in items {
		if item.item_type() == ItemType::Native {
			continue;
		}

		match requirements
			.iter_mut()
			.find(|r| r.token == item.token() && r.operator == operator)
		{
			Some(existing) => {
				if item.item_type() == ItemType::Erc20 {
					existing.amount = existing.amount.saturating_add(item.max_amount());
				}
			}
			None => requirements.push(ApprovalRequirement {
				item_type: item.item_type(),
				token: item.token(),
				identifier_or_criteria: item.identifier_or_criteria(),
				operator,
				amount: if item.item_type() == ItemType::Erc20 {
					item.max_amount()
				} else {
					U256::ZERO
				},
			}),
		}
	}

	requirements
}
