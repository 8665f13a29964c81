use alloy::primitives::B256;
use seaport_types::Side;
use thiserror::Error;

/// Errors raised while building or checking a single order.
///
/// All of these are detected before any chain interaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
	#[error("Invalid {side} item {index}: {reason}")]
	InvalidItem {
		side: Side,
		index: usize,
		reason: String,
	},
	#[error("Invalid fee: {0}")]
	InvalidFee(String),
	#[error("Invalid time window: end {end_time} is not after start {start_time}")]
	InvalidTimeWindow { start_time: u64, end_time: u64 },
	#[error("Order expires at {end_time}, within {buffer}s of now ({now})")]
	StaleOrder { end_time: u64, now: u64, buffer: u64 },
	#[error("Order starts at {start_time}, now is {now}")]
	NotYetActive { start_time: u64, now: u64 },
	#[error("Order {0} has been cancelled")]
	Cancelled(B256),
	#[error("Order {0} is fully filled")]
	FullyFilled(B256),
	#[error("No conduit configured for key {0}")]
	UnknownConduit(B256),
}

impl OrderError {
	pub(crate) fn item(side: Side, index: usize, reason: impl Into<String>) -> Self {
		OrderError::InvalidItem {
			side,
			index,
			reason: reason.into(),
		}
	}
}
