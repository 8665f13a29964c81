//! Canonical item normalizer.
//!
//! Turns a [`CreateOrderInput`] into order components ready to be hashed and
//! signed, plus the approvals the offerer needs before the order can be
//! filled.

use crate::error::OrderError;
use crate::fees::apply_fees;
use crate::items::{check_item, parse_consideration_item, parse_offer_item};
use alloy::primitives::{Address, B256, U256};
use seaport_config::ProtocolConfig;
use seaport_types::{
	collect_requirements, ApprovalRequirement, CreateOrderInput, OrderComponents, OrderParameters,
	OrderType, Side,
};
use tracing::debug;

/// Output of normalizing a creation input.
#[derive(Debug, Clone)]
pub struct NormalizedOrder {
	pub components: OrderComponents,
	/// Address that moves the offerer's tokens: the conduit, or the
	/// settlement contract when no conduit is used.
	pub operator: Address,
	/// Distinct (token, operator) pairs the offer items need authorized.
	pub approvals: Vec<ApprovalRequirement>,
}

pub struct Normalizer<'a> {
	config: &'a ProtocolConfig,
}

impl<'a> Normalizer<'a> {
	pub fn new(config: &'a ProtocolConfig) -> Self {
		Self { config }
	}

	/// Resolves the operator for a conduit key.
	pub fn operator_for(&self, conduit_key: B256) -> Result<Address, OrderError> {
		self.config
			.conduit_address(conduit_key)
			.ok_or(OrderError::UnknownConduit(conduit_key))
	}

	/// Normalizes `input` for `offerer` at time `now`, signing under `nonce`.
	pub fn normalize(
		&self,
		input: &CreateOrderInput,
		offerer: Address,
		nonce: U256,
		now: u64,
	) -> Result<NormalizedOrder, OrderError> {
		let conduit_key = input.conduit_key.unwrap_or(self.config.default_conduit_key);
		let operator = self.operator_for(conduit_key)?;

		let offer = input
			.offer
			.iter()
			.enumerate()
			.map(|(i, item)| parse_offer_item(item, i))
			.collect::<Result<Vec<_>, _>>()?;

		let mut consideration = input
			.consideration
			.iter()
			.enumerate()
			.map(|(i, item)| parse_consideration_item(item, i, offerer))
			.collect::<Result<Vec<_>, _>>()?;

		let total_original_consideration_items =
			apply_fees(&offer, &mut consideration, offerer, &input.fees)?;

		let start_time = input.start_time.unwrap_or(now);
		let end_time = input
			.end_time
			.unwrap_or_else(|| start_time.saturating_add(self.config.default_order_duration_secs));
		if end_time <= start_time {
			return Err(OrderError::InvalidTimeWindow {
				start_time,
				end_time,
			});
		}

		let salt = input
			.salt
			.unwrap_or_else(|| U256::from_be_bytes(B256::random().0));

		let parameters = OrderParameters {
			offerer,
			zone: input.zone.unwrap_or(Address::ZERO),
			order_type: OrderType::new(input.allow_partial_fills, input.restricted_by_zone),
			start_time,
			end_time,
			zone_hash: B256::ZERO,
			salt,
			offer,
			consideration,
			total_original_consideration_items,
			conduit_key,
		};

		let approvals = collect_requirements(&parameters.offer, operator);

		debug!(
			offerer = %offerer,
			offer_items = parameters.offer.len(),
			consideration_items = parameters.consideration.len(),
			fee_items = parameters.consideration.len() - total_original_consideration_items,
			approvals = approvals.len(),
			"Normalized order input"
		);

		Ok(NormalizedOrder {
			components: OrderComponents { parameters, nonce },
			operator,
			approvals,
		})
	}
}

/// Re-validates canonical parameters and returns them unchanged.
///
/// Normalizing the output of this function again yields the same record.
pub fn normalize_parameters(parameters: &OrderParameters) -> Result<OrderParameters, OrderError> {
	for (i, item) in parameters.offer.iter().enumerate() {
		check_item(item, Side::Offer, i)?;
	}
	for (i, item) in parameters.consideration.iter().enumerate() {
		check_item(item, Side::Consideration, i)?;
	}

	if parameters.total_original_consideration_items > parameters.consideration.len() {
		return Err(OrderError::item(
			Side::Consideration,
			parameters.total_original_consideration_items,
			format!(
				"total original consideration items {} exceeds {} items",
				parameters.total_original_consideration_items,
				parameters.consideration.len()
			),
		));
	}

	if parameters.end_time <= parameters.start_time {
		return Err(OrderError::InvalidTimeWindow {
			start_time: parameters.start_time,
			end_time: parameters.end_time,
		});
	}

	Ok(parameters.clone())
}
