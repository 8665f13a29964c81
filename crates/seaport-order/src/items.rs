//! Parsing of loose item shorthand into protocol items.

use crate::criteria::CriteriaTree;
use crate::error::OrderError;
use alloy::primitives::{Address, U256};
use seaport_types::{ConsiderationItem, CreateInputItem, Item, ItemType, OfferItem, Side};

/// Parses an offer-side item. Offer items never carry a recipient.
pub fn parse_offer_item(item: &CreateInputItem, index: usize) -> Result<OfferItem, OrderError> {
	if item.recipient.is_some() {
		return Err(OrderError::item(
			Side::Offer,
			index,
			"offer items cannot have a recipient",
		));
	}
	parse_item(item, Side::Offer, index)
}

/// Parses a consideration item, defaulting its recipient to `offerer`.
pub fn parse_consideration_item(
	item: &CreateInputItem,
	index: usize,
	offerer: Address,
) -> Result<ConsiderationItem, OrderError> {
	let parsed = parse_item(item, Side::Consideration, index)?;
	Ok(parsed.to_consideration_item(item.recipient.unwrap_or(offerer)))
}

/// Parses tips a filler adds to an order's consideration, starting at
/// `first_index`. Tips name their recipient and never use criteria.
pub fn parse_tips(
	tips: &[CreateInputItem],
	first_index: usize,
) -> Result<Vec<ConsiderationItem>, OrderError> {
	tips.iter()
		.enumerate()
		.map(|(i, tip)| {
			let index = first_index + i;
			let recipient = tip.recipient.ok_or_else(|| {
				OrderError::item(Side::Consideration, index, "tips require a recipient")
			})?;
			let item = parse_consideration_item(tip, index, recipient)?;
			if item.item_type.is_criteria() {
				return Err(OrderError::item(
					Side::Consideration,
					index,
					"tips cannot use criteria",
				));
			}
			Ok(item)
		})
		.collect()
}

fn parse_item(item: &CreateInputItem, side: Side, index: usize) -> Result<OfferItem, OrderError> {
	let err = |reason: &str| OrderError::item(side, index, reason);

	let item_type = match (item.item_type, item.token) {
		(Some(kind), _) => kind,
		(None, Some(_)) => ItemType::Erc20,
		(None, None) => ItemType::Native,
	};

	let (token, identifier_or_criteria, default_amount) = match item_type {
		ItemType::Native => {
			if item.token.is_some_and(|token| token != Address::ZERO) {
				return Err(err("native items cannot name a token"));
			}
			if item.identifier.is_some() || item.identifiers.is_some() {
				return Err(err("currency items cannot have an identifier"));
			}
			(Address::ZERO, U256::ZERO, None)
		}
		ItemType::Erc20 => {
			let token = required_token(item).ok_or_else(|| err("erc20 items require a token"))?;
			if item.identifier.is_some() || item.identifiers.is_some() {
				return Err(err("currency items cannot have an identifier"));
			}
			(token, U256::ZERO, None)
		}
		ItemType::Erc721 | ItemType::Erc1155 => {
			let token = required_token(item).ok_or_else(|| err("nft items require a token"))?;
			let default_amount = (item_type == ItemType::Erc721).then_some(U256::from(1));
			match (item.identifier, &item.identifiers) {
				(Some(_), Some(_)) => {
					return Err(err("specify either identifier or identifiers, not both"))
				}
				(Some(identifier), None) => (token, identifier, default_amount),
				(None, Some(identifiers)) => {
					let root = CriteriaTree::new(identifiers).root_identifier();
					(token, root, default_amount)
				}
				(None, None) => return Err(err("nft items require identifier or identifiers")),
			}
		}
		ItemType::Erc721WithCriteria | ItemType::Erc1155WithCriteria => {
			let token = required_token(item).ok_or_else(|| err("nft items require a token"))?;
			let default_amount =
				(item_type == ItemType::Erc721WithCriteria).then_some(U256::from(1));
			// An explicit identifier on a criteria kind is taken as the root.
			match (item.identifier, &item.identifiers) {
				(Some(_), Some(_)) => {
					return Err(err("specify either identifier or identifiers, not both"))
				}
				(Some(root), None) => (token, root, default_amount),
				(None, Some(identifiers)) => {
					(token, CriteriaTree::new(identifiers).root_identifier(), default_amount)
				}
				(None, None) => (token, U256::ZERO, default_amount),
			}
		}
	};

	// A set of identifiers turns a concrete kind into its criteria kind.
	let item_type = if item.identifiers.is_some() {
		item_type.with_criteria()
	} else {
		item_type
	};

	let start_amount = item
		.amount
		.or(default_amount)
		.ok_or_else(|| err("amount is required"))?;
	let end_amount = item.end_amount.unwrap_or(start_amount);

	if start_amount.is_zero() || end_amount.is_zero() {
		return Err(err("amounts must be greater than zero"));
	}

	Ok(OfferItem {
		item_type,
		token,
		identifier_or_criteria,
		start_amount,
		end_amount,
	})
}

fn required_token(item: &CreateInputItem) -> Option<Address> {
	item.token.filter(|token| *token != Address::ZERO)
}

/// Checks the shape of an already canonical item.
pub fn check_item<T: Item>(item: &T, side: Side, index: usize) -> Result<(), OrderError> {
	let err = |reason: &str| Err(OrderError::item(side, index, reason));

	if item.start_amount().is_zero() && item.end_amount().is_zero() {
		return err("item moves nothing");
	}

	match item.item_type() {
		ItemType::Native => {
			if item.token() != Address::ZERO {
				return err("native items cannot name a token");
			}
			if !item.identifier_or_criteria().is_zero() {
				return err("currency items cannot have an identifier");
			}
		}
		ItemType::Erc20 => {
			if item.token() == Address::ZERO {
				return err("erc20 items require a token");
			}
			if !item.identifier_or_criteria().is_zero() {
				return err("currency items cannot have an identifier");
			}
		}
		_ => {
			if item.token() == Address::ZERO {
				return err("nft items require a token");
			}
		}
	}

	Ok(())
}
