//! Resolution of criteria items into concrete identifiers.

use crate::error::FulfillmentError;
use alloy::primitives::{B256, U256};
use seaport_order::CriteriaTree;
use seaport_types::abi::CriteriaResolver;
use seaport_types::{CriteriaResolution, Item, ItemType, Order, OrderParameters, Side};
use std::collections::HashSet;
use tracing::debug;

/// A batch with every criteria item pinned to one identifier.
#[derive(Debug, Clone)]
pub struct ResolvedBatch {
	/// The orders as signed. These are what the settlement contract receives.
	pub orders: Vec<Order>,
	/// Copies of the order parameters with criteria items replaced by their
	/// concrete kind and identifier. Aggregation runs on these.
	pub resolved: Vec<OrderParameters>,
	/// One resolver per resolution, in input order.
	pub criteria_resolvers: Vec<CriteriaResolver>,
}

/// Applies `resolutions` to `orders`.
///
/// Every criteria item in the batch must be resolved exactly once. A
/// resolution's identifier set must hash to the item's root, and its chosen
/// identifier must be a member of the set. An empty set is accepted only for
/// items committing to the zero root (any identifier of the collection).
pub fn resolve_criteria(
	orders: &[Order],
	resolutions: &[CriteriaResolution],
) -> Result<ResolvedBatch, FulfillmentError> {
	let mut resolved: Vec<OrderParameters> =
		orders.iter().map(|order| order.parameters.clone()).collect();
	let mut criteria_resolvers = Vec::with_capacity(resolutions.len());
	let mut seen = HashSet::new();

	for resolution in resolutions {
		let order_index = resolution.order_index;
		let side = resolution.side;
		let item_index = resolution.item_index;

		if !seen.insert((order_index, side, item_index)) {
			return Err(FulfillmentError::DuplicateResolution {
				order_index,
				side,
				item_index,
			});
		}

		let parameters =
			resolved
				.get_mut(order_index)
				.ok_or(FulfillmentError::ItemNotFound {
					order_index,
					side,
					item_index,
				})?;

		let (item_type, root) = match side {
			Side::Offer => parameters
				.offer
				.get(item_index)
				.map(|item| (item.item_type(), item.identifier_or_criteria())),
			Side::Consideration => parameters
				.consideration
				.get(item_index)
				.map(|item| (item.item_type(), item.identifier_or_criteria())),
		}
		.ok_or(FulfillmentError::ItemNotFound {
			order_index,
			side,
			item_index,
		})?;

		if !item_type.is_criteria() {
			return Err(FulfillmentError::NotCriteriaItem {
				order_index,
				side,
				item_index,
			});
		}

		let invalid = |reason: &str| FulfillmentError::InvalidCriteria {
			order_index,
			side,
			item_index,
			reason: reason.to_string(),
		};

		let identifier = resolution.criteria.identifier;
		let proof: Vec<B256> = if resolution.criteria.valid_identifiers.is_empty() {
			if !root.is_zero() {
				return Err(invalid("identifier set is required for a non-zero root"));
			}
			Vec::new()
		} else {
			let tree = CriteriaTree::new(&resolution.criteria.valid_identifiers);
			if tree.root_identifier() != root {
				return Err(invalid("identifier set does not match the item's root"));
			}
			tree.proof(identifier)
				.ok_or_else(|| invalid("identifier is not in the set"))?
		};

		set_identifier(parameters, side, item_index, item_type.resolved(), identifier);
		debug!(
			order_index,
			%side,
			item_index,
			%identifier,
			proof_len = proof.len(),
			"Resolved criteria item"
		);

		criteria_resolvers.push(CriteriaResolver::new(
			order_index,
			side,
			item_index,
			identifier,
			proof,
		));
	}

	for (order_index, parameters) in resolved.iter().enumerate() {
		if let Some(item_index) = parameters.offer.iter().position(|i| i.item_type.is_criteria()) {
			return Err(FulfillmentError::UnresolvedCriteria {
				order_index,
				side: Side::Offer,
				item_index,
			});
		}
		if let Some(item_index) = parameters
			.consideration
			.iter()
			.position(|i| i.item_type.is_criteria())
		{
			return Err(FulfillmentError::UnresolvedCriteria {
				order_index,
				side: Side::Consideration,
				item_index,
			});
		}
	}

	Ok(ResolvedBatch {
		orders: orders.to_vec(),
		resolved,
		criteria_resolvers,
	})
}

fn set_identifier(
	parameters: &mut OrderParameters,
	side: Side,
	item_index: usize,
	item_type: ItemType,
	identifier: U256,
) {
	match side {
		Side::Offer => {
			if let Some(item) = parameters.offer.get_mut(item_index) {
				item.item_type = item_type;
				item.identifier_or_criteria = identifier;
			}
		}
		Side::Consideration => {
			if let Some(item) = parameters.consideration.get_mut(item_index) {
				item.item_type = item_type;
				item.identifier_or_criteria = identifier;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{Address, Bytes};
	use seaport_order::verify_proof;
	use seaport_types::{ConsiderationItem, InputCriteria, OfferItem, OrderType};

	fn ids(values: &[u64]) -> Vec<U256> {
		values.iter().map(|v| U256::from(*v)).collect()
	}

	fn criteria_bid(root: U256) -> Order {
		Order {
			parameters: OrderParameters {
				offerer: Address::repeat_byte(0xaa),
				zone: Address::ZERO,
				order_type: OrderType::FullOpen,
				start_time: 0,
				end_time: 100,
				zone_hash: B256::ZERO,
				salt: U256::ZERO,
				offer: vec![OfferItem {
					item_type: ItemType::Erc20,
					token: Address::repeat_byte(0x20),
					identifier_or_criteria: U256::ZERO,
					start_amount: U256::from(100),
					end_amount: U256::from(100),
				}],
				consideration: vec![ConsiderationItem {
					item_type: ItemType::Erc721WithCriteria,
					token: Address::repeat_byte(0x72),
					identifier_or_criteria: root,
					start_amount: U256::from(1),
					end_amount: U256::from(1),
					recipient: Address::repeat_byte(0xaa),
				}],
				total_original_consideration_items: 1,
				conduit_key: B256::ZERO,
			},
			signature: Bytes::new(),
		}
	}

	fn resolution(identifier: u64, valid: &[u64]) -> CriteriaResolution {
		CriteriaResolution {
			order_index: 0,
			side: Side::Consideration,
			item_index: 0,
			criteria: InputCriteria {
				identifier: U256::from(identifier),
				valid_identifiers: ids(valid),
			},
		}
	}

	#[test]
	fn test_resolves_member_identifier() {
		let set = [3, 5, 8, 13];
		let tree = CriteriaTree::new(&ids(&set));
		let order = criteria_bid(tree.root_identifier());

		let batch = resolve_criteria(&[order.clone()], &[resolution(8, &set)]).unwrap();

		let item = &batch.resolved[0].consideration[0];
		assert_eq!(item.item_type, ItemType::Erc721);
		assert_eq!(item.identifier_or_criteria, U256::from(8));
		assert_eq!(batch.orders[0], order);

		let resolver = &batch.criteria_resolvers[0];
		assert_eq!(resolver.side, Side::Consideration as u8);
		assert!(verify_proof(
			tree.root(),
			U256::from(8),
			&resolver.criteriaProof
		));
	}

	#[test]
	fn test_rejects_outsider_and_wrong_set() {
		let set = [3, 5, 8];
		let order = criteria_bid(CriteriaTree::new(&ids(&set)).root_identifier());

		assert!(matches!(
			resolve_criteria(&[order.clone()], &[resolution(4, &set)]),
			Err(FulfillmentError::InvalidCriteria { .. })
		));
		assert!(matches!(
			resolve_criteria(&[order], &[resolution(4, &[3, 4])]),
			Err(FulfillmentError::InvalidCriteria { .. })
		));
	}

	#[test]
	fn test_collection_wide_criteria() {
		let order = criteria_bid(U256::ZERO);
		let batch = resolve_criteria(&[order], &[resolution(77, &[])]).unwrap();
		assert_eq!(
			batch.resolved[0].consideration[0].identifier_or_criteria,
			U256::from(77)
		);
		assert!(batch.criteria_resolvers[0].criteriaProof.is_empty());
	}

	#[test]
	fn test_every_criteria_item_needs_exactly_one_resolution() {
		let order = criteria_bid(U256::ZERO);

		assert_eq!(
			resolve_criteria(&[order.clone()], &[]).unwrap_err(),
			FulfillmentError::UnresolvedCriteria {
				order_index: 0,
				side: Side::Consideration,
				item_index: 0,
			}
		);
		assert!(matches!(
			resolve_criteria(&[order.clone()], &[resolution(1, &[]), resolution(2, &[])]),
			Err(FulfillmentError::DuplicateResolution { .. })
		));

		let mut on_currency = resolution(1, &[]);
		on_currency.side = Side::Offer;
		assert!(matches!(
			resolve_criteria(&[order.clone()], &[on_currency]),
			Err(FulfillmentError::NotCriteriaItem { .. })
		));

		let mut missing = resolution(1, &[]);
		missing.order_index = 4;
		assert!(matches!(
			resolve_criteria(&[order], &[missing]),
			Err(FulfillmentError::ItemNotFound { .. })
		));
	}
}
