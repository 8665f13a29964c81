//! Shared data model for the order protocol SDK.
//!
//! Every other crate in the workspace speaks in these types: protocol items and
//! orders, the loose creation input, batch-relative fulfillment pointers, and
//! the transaction values exchanged with the signer and issuer collaborators.

pub mod abi;
pub mod account;
pub mod approval;
pub mod constants;
pub mod delivery;
pub mod fulfillment;
pub mod input;
pub mod item;
pub mod order;
pub mod utils;
pub mod validation;

pub use account::*;
pub use approval::*;
pub use delivery::*;
pub use fulfillment::*;
pub use input::*;
pub use item::*;
pub use order::*;
pub use utils::truncate_hash;
pub use validation::*;
