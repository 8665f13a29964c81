//! Order building blocks.
//!
//! Everything needed to turn a loose creation input into a signable order and
//! to check an existing order before fulfilling it. Nothing here talks to the
//! chain: callers pass in nonces, statuses and the current time.

pub mod criteria;
pub mod error;
pub mod fees;
pub mod items;
pub mod mirror;
pub mod normalizer;
pub mod signing;
pub mod validity;

pub use criteria::{verify_proof, CriteriaTree};
pub use error::OrderError;
pub use fees::{apply_fees, fee_amount, validate_fees};
pub use items::parse_tips;
pub use mirror::mirror_order_parameters;
pub use normalizer::{normalize_parameters, NormalizedOrder, Normalizer};
pub use signing::{order_hash, OrderDomain};
pub use validity::{check_status, check_time_window};
