//! Fulfillment pointers.
//!
//! Components index into the batch of orders they were computed for and are
//! meaningless outside of it. Never cache them across batches.

use serde::{Deserialize, Serialize};

/// Points at one item of one order within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentComponent {
	pub order_index: usize,
	pub item_index: usize,
}

impl FulfillmentComponent {
	pub fn new(order_index: usize, item_index: usize) -> Self {
		Self {
			order_index,
			item_index,
		}
	}
}

/// One aggregated transfer: offer items on the left are spent to satisfy
/// the consideration items on the right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
	pub offer_components: Vec<FulfillmentComponent>,
	pub consideration_components: Vec<FulfillmentComponent>,
}

impl Fulfillment {
	pub fn is_empty(&self) -> bool {
		self.offer_components.is_empty() && self.consideration_components.is_empty()
	}
}
