//! Counter-orders for filling a single order through the match entry point.

use alloy::primitives::{Address, B256, U256};
use seaport_types::{OrderParameters, OrderType};

/// Builds the filler's side of a match against `order`.
///
/// The mirror offers every consideration item of `order` and asks for every
/// offer item, delivered to `filler`, over the same window. Criteria items
/// must already be resolved on `order` so the mirror only names concrete
/// identifiers. The mirror is submitted unsigned: the settlement contract
/// accepts orders whose offerer is the caller.
pub fn mirror_order_parameters(
	order: &OrderParameters,
	filler: Address,
	conduit_key: B256,
) -> OrderParameters {
	let consideration: Vec<_> = order
		.offer
		.iter()
		.map(|item| item.to_consideration_item(filler))
		.collect();

	OrderParameters {
		offerer: filler,
		zone: Address::ZERO,
		order_type: OrderType::FullOpen,
		start_time: order.start_time,
		end_time: order.end_time,
		zone_hash: B256::ZERO,
		salt: U256::from_be_bytes(B256::random().0),
		offer: order
			.consideration
			.iter()
			.map(|item| item.to_offer_item())
			.collect(),
		total_original_consideration_items: consideration.len(),
		consideration,
		conduit_key,
	}
}
