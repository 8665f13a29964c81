//! Fee injection.
//!
//! Fees are taken from the order's currency legs. When the offerer gives
//! currency (a bid), fees are computed on the offered amounts and added on
//! top. When the offerer receives currency (a listing), fees are computed on
//! what the offerer receives and deducted from it, so the buyer's total is
//! unchanged.
//!
//! Each fee is floored on its own, at both ends of the window. On a listing
//! the offerer's leg loses exactly the sum of the floored fees, so whatever
//! the rounding leaves stays with the offerer and the buyer still pays the
//! asked amount to the wei.

use crate::error::OrderError;
use alloy::primitives::{Address, U256};
use seaport_types::constants::MAX_BASIS_POINTS;
use seaport_types::{ConsiderationItem, Fee, Item, OfferItem};

/// Floor of `amount * basis_points / 10_000`.
pub fn fee_amount(amount: U256, basis_points: i64) -> U256 {
	let bps = U256::from(basis_points.max(0) as u64);
	amount.saturating_mul(bps) / U256::from(MAX_BASIS_POINTS as u64)
}

/// Rejects negative basis points and totals above 100%.
pub fn validate_fees(fees: &[Fee]) -> Result<(), OrderError> {
	let mut total: i64 = 0;
	for fee in fees {
		if fee.basis_points < 0 {
			return Err(OrderError::InvalidFee(format!(
				"negative basis points {} for {}",
				fee.basis_points, fee.recipient
			)));
		}
		total = total.saturating_add(fee.basis_points);
	}
	if total > MAX_BASIS_POINTS {
		return Err(OrderError::InvalidFee(format!(
			"fees total {} basis points, above the {} cap",
			total, MAX_BASIS_POINTS
		)));
	}
	Ok(())
}

/// Appends one consideration item per fee and currency leg, after the
/// caller's items. Returns the number of caller items, which becomes
/// `totalOriginalConsiderationItems`.
pub fn apply_fees(
	offer: &[OfferItem],
	consideration: &mut Vec<ConsiderationItem>,
	offerer: Address,
	fees: &[Fee],
) -> Result<usize, OrderError> {
	validate_fees(fees)?;
	let original = consideration.len();
	if fees.is_empty() {
		return Ok(original);
	}

	let offered: Vec<OfferItem> = offer
		.iter()
		.filter(|item| item.item_type.is_currency())
		.cloned()
		.collect();

	let (base, deduct_from): (Vec<OfferItem>, Vec<usize>) = if offered.is_empty() {
		let indices: Vec<usize> = consideration
			.iter()
			.enumerate()
			.filter(|(_, item)| item.item_type.is_currency() && item.recipient == offerer)
			.map(|(i, _)| i)
			.collect();
		let legs = indices
			.iter()
			.map(|i| consideration[*i].to_offer_item())
			.collect();
		(legs, indices)
	} else {
		(offered, Vec::new())
	};

	let mut injected = Vec::new();
	for fee in fees {
		for leg in &base {
			let start_amount = fee_amount(leg.start_amount(), fee.basis_points);
			let end_amount = fee_amount(leg.end_amount(), fee.basis_points);
			if start_amount.is_zero() && end_amount.is_zero() {
				continue;
			}
			injected.push(ConsiderationItem {
				item_type: leg.item_type,
				token: leg.token,
				identifier_or_criteria: U256::ZERO,
				start_amount,
				end_amount,
				recipient: fee.recipient,
			});
		}
	}

	for index in deduct_from {
		let item = &mut consideration[index];
		let (start, end) = (item.start_amount, item.end_amount);
		for fee in fees {
			item.start_amount = item
				.start_amount
				.saturating_sub(fee_amount(start, fee.basis_points));
			item.end_amount = item.end_amount.saturating_sub(fee_amount(end, fee.basis_points));
		}
	}

	consideration.extend(injected);
	Ok(original)
}

#[cfg(test)]
mod tests {
	use super::*;
	use seaport_types::ItemType;

	fn offerer() -> Address {
		Address::repeat_byte(0xaa)
	}

	fn fee(bps: i64) -> Fee {
		Fee {
			recipient: Address::repeat_byte(0xfe),
			basis_points: bps,
		}
	}

	fn currency(amount: u64) -> OfferItem {
		OfferItem {
			item_type: ItemType::Erc20,
			token: Address::repeat_byte(0x20),
			identifier_or_criteria: U256::ZERO,
			start_amount: U256::from(amount),
			end_amount: U256::from(amount),
		}
	}

	fn nft() -> OfferItem {
		OfferItem {
			item_type: ItemType::Erc721,
			token: Address::repeat_byte(0x72),
			identifier_or_criteria: U256::from(1),
			start_amount: U256::from(1),
			end_amount: U256::from(1),
		}
	}

	#[test]
	fn test_fee_of_250_bps_on_1000_is_25() {
		let offer = vec![currency(1000)];
		let mut consideration = vec![nft().to_consideration_item(offerer())];

		let original = apply_fees(&offer, &mut consideration, offerer(), &[fee(250)]).unwrap();

		assert_eq!(original, 1);
		assert_eq!(consideration.len(), 2);
		assert_eq!(consideration[1].start_amount, U256::from(25));
		assert_eq!(consideration[1].end_amount, U256::from(25));
		assert_eq!(consideration[1].recipient, Address::repeat_byte(0xfe));
		assert_eq!(consideration[1].token, Address::repeat_byte(0x20));
	}

	#[test]
	fn test_listing_fee_deducted_from_proceeds() {
		let offer = vec![nft()];
		let mut consideration = vec![currency(10_000).to_consideration_item(offerer())];

		let original = apply_fees(&offer, &mut consideration, offerer(), &[fee(250), fee(100)]).unwrap();

		assert_eq!(original, 1);
		assert_eq!(consideration.len(), 3);
		assert_eq!(consideration[0].start_amount, U256::from(9_650));
		assert_eq!(consideration[1].start_amount, U256::from(250));
		assert_eq!(consideration[2].start_amount, U256::from(100));

		let total: U256 = consideration.iter().map(|c| c.start_amount).sum();
		assert_eq!(total, U256::from(10_000));
	}

	#[test]
	fn test_zero_fee_items_are_skipped() {
		let offer = vec![currency(10)];
		let mut consideration = vec![];
		apply_fees(&offer, &mut consideration, offerer(), &[fee(1)]).unwrap();
		assert!(consideration.is_empty());
	}

	#[test]
	fn test_invalid_fees() {
		assert!(matches!(validate_fees(&[fee(-1)]), Err(OrderError::InvalidFee(_))));
		assert!(matches!(
			validate_fees(&[fee(6000), fee(4001)]),
			Err(OrderError::InvalidFee(_))
		));
		assert!(validate_fees(&[fee(6000), fee(4000)]).is_ok());
	}

	#[test]
	fn test_rounding_remainder_stays_with_the_seller() {
		let offer = vec![nft()];
		let mut asked = currency(999);
		asked.end_amount = U256::from(1_999);
		let mut consideration = vec![asked.to_consideration_item(offerer())];

		apply_fees(&offer, &mut consideration, offerer(), &[fee(250), fee(100)]).unwrap();

		// 24.975 and 9.99 at the start, 49.975 and 19.99 at the end.
		assert_eq!(consideration[1].start_amount, U256::from(24));
		assert_eq!(consideration[2].start_amount, U256::from(9));
		assert_eq!(consideration[1].end_amount, U256::from(49));
		assert_eq!(consideration[2].end_amount, U256::from(19));
		assert_eq!(consideration[0].start_amount, U256::from(966));
		assert_eq!(consideration[0].end_amount, U256::from(1_931));

		let start: U256 = consideration.iter().map(|c| c.start_amount).sum();
		let end: U256 = consideration.iter().map(|c| c.end_amount).sum();
		assert_eq!((start, end), (U256::from(999), U256::from(1_999)));
	}
}
