//! Fulfillment aggregation for batches of orders.
//!
//! Takes finalized orders, pins criteria items to concrete identifiers, and
//! computes the fulfillments that let the settlement contract move every
//! matching leg of the batch with as few transfers as possible.

pub mod aggregate;
pub mod criteria;
pub mod error;
pub mod exchange;

pub use aggregate::{aggregate, AggregatedFulfillments, Exclusions};
pub use criteria::{resolve_criteria, ResolvedBatch};
pub use error::FulfillmentError;
pub use exchange::{native_value, plan_match, MatchPlan};
