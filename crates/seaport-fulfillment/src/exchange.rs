//! Encoding of a batch for the settlement contract's match entry point.

use crate::aggregate::{aggregate, AggregatedFulfillments, Exclusions};
use crate::criteria::{resolve_criteria, ResolvedBatch};
use crate::error::FulfillmentError;
use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use seaport_types::abi::{self, ISeaport};
use seaport_types::{derive_amount, CriteriaResolution, ItemType, Order, OrderParameters};
use tracing::debug;

/// Everything needed to submit one `matchAdvancedOrders` call.
#[derive(Debug, Clone)]
pub struct MatchPlan {
	pub batch: ResolvedBatch,
	pub fulfillments: AggregatedFulfillments,
	/// Native currency the caller must attach.
	pub value: U256,
}

impl MatchPlan {
	/// Calldata for `matchAdvancedOrders`, every order at full fraction.
	pub fn calldata(&self) -> Vec<u8> {
		ISeaport::matchAdvancedOrdersCall {
			orders: self
				.batch
				.orders
				.iter()
				.map(abi::AdvancedOrder::full_fill)
				.collect(),
			criteriaResolvers: self.batch.criteria_resolvers.clone(),
			fulfillments: self
				.fulfillments
				.fulfillments
				.iter()
				.map(Into::into)
				.collect(),
		}
		.abi_encode()
	}
}

/// Resolves criteria, aggregates, and prices a batch filled by `caller` at
/// time `now`. See [`native_value`] for how `buffer` is applied.
pub fn plan_match(
	orders: &[Order],
	resolutions: &[CriteriaResolution],
	exclusions: &Exclusions,
	caller: Address,
	now: u64,
	buffer: u64,
) -> Result<MatchPlan, FulfillmentError> {
	let batch = resolve_criteria(orders, resolutions)?;
	let fulfillments = aggregate(&batch.resolved, exclusions)?;
	let value = native_value(&batch.resolved, caller, now, buffer);

	debug!(
		orders = batch.orders.len(),
		criteria_resolvers = batch.criteria_resolvers.len(),
		fulfillments = fulfillments.fulfillments.len(),
		%value,
		"Planned match"
	);

	Ok(MatchPlan {
		batch,
		fulfillments,
		value,
	})
}

/// Native currency offered by `caller`'s own orders when filled at `now`.
///
/// Ascending amounts are priced `buffer` seconds later, so the value still
/// covers them if the transaction is mined late. Descending and fixed amounts
/// are priced at `now`, their highest point from here on. Offer amounts are
/// rounded up here, unlike on-chain; the settlement contract refunds any
/// excess.
pub fn native_value(orders: &[OrderParameters], caller: Address, now: u64, buffer: u64) -> U256 {
	orders
		.iter()
		.filter(|order| order.offerer == caller)
		.flat_map(|order| {
			order
				.offer
				.iter()
				.filter(|item| item.item_type == ItemType::Native)
				.map(move |item| {
					let at = if item.end_amount > item.start_amount {
						now.saturating_add(buffer)
					} else {
						now
					};
					derive_amount(
						item.start_amount,
						item.end_amount,
						order.start_time,
						order.end_time,
						at.min(order.end_time),
						true,
					)
				})
		})
		.fold(U256::ZERO, |total, amount| total.saturating_add(amount))
}
