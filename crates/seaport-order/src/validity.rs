//! Fulfillment-time validity checks.

use crate::error::OrderError;
use alloy::primitives::B256;
use seaport_types::{OrderParameters, OrderStatus};

/// Rejects orders that are not active yet or that expire within `buffer`
/// seconds of `now`.
pub fn check_time_window(
	parameters: &OrderParameters,
	now: u64,
	buffer: u64,
) -> Result<(), OrderError> {
	if now < parameters.start_time {
		return Err(OrderError::NotYetActive {
			start_time: parameters.start_time,
			now,
		});
	}
	if now.saturating_add(buffer) >= parameters.end_time {
		return Err(OrderError::StaleOrder {
			end_time: parameters.end_time,
			now,
			buffer,
		});
	}
	Ok(())
}

/// Rejects orders the settlement contract will no longer fill.
pub fn check_status(order_hash: B256, status: &OrderStatus) -> Result<(), OrderError> {
	if status.is_cancelled {
		return Err(OrderError::Cancelled(order_hash));
	}
	if status.is_fully_filled() {
		return Err(OrderError::FullyFilled(order_hash));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{Address, U256};
	use seaport_types::OrderType;

	fn window(start_time: u64, end_time: u64) -> OrderParameters {
		OrderParameters {
			offerer: Address::repeat_byte(1),
			zone: Address::ZERO,
			order_type: OrderType::FullOpen,
			start_time,
			end_time,
			zone_hash: B256::ZERO,
			salt: U256::ZERO,
			offer: vec![],
			consideration: vec![],
			total_original_consideration_items: 0,
			conduit_key: B256::ZERO,
		}
	}

	#[test]
	fn test_buffer_rejects_within_300_seconds_of_end() {
		let end = 1_000_000;
		let parameters = window(0, end);

		assert!(matches!(
			check_time_window(&parameters, end - 100, 300),
			Err(OrderError::StaleOrder { .. })
		));
		assert!(check_time_window(&parameters, end - 600, 300).is_ok());
	}

	#[test]
	fn test_not_yet_active() {
		let parameters = window(500, 1_000);
		assert!(matches!(
			check_time_window(&parameters, 499, 0),
			Err(OrderError::NotYetActive {
				start_time: 500,
				now: 499
			})
		));
	}

	#[test]
	fn test_status_checks() {
		let hash = B256::repeat_byte(9);
		assert!(check_status(hash, &OrderStatus::default()).is_ok());

		let cancelled = OrderStatus {
			is_cancelled: true,
			..Default::default()
		};
		assert_eq!(
			check_status(hash, &cancelled),
			Err(OrderError::Cancelled(hash))
		);

		let filled = OrderStatus {
			total_filled: U256::from(1),
			total_size: U256::from(1),
			..Default::default()
		};
		assert_eq!(check_status(hash, &filled), Err(OrderError::FullyFilled(hash)));
	}
}
