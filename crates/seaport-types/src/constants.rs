//! Protocol constants.

use alloy::primitives::{address, b256, Address, B256, U256};

/// Basis points in one whole.
pub const MAX_BASIS_POINTS: i64 = 10_000;

/// Conduit key meaning "transfer through the settlement contract itself".
pub const NO_CONDUIT: B256 = B256::ZERO;

/// Canonical deployment of the settlement contract.
pub const DEFAULT_SEAPORT_ADDRESS: Address = address!("00000000006c3852cbEf3e08E8dF289169EdE581");

/// The OpenSea conduit key and the conduit it resolves to.
pub const OPENSEA_CONDUIT_KEY: B256 =
	b256!("0000007b02230091a7ed01230072f7006a004d60a8d4e71d599b8104250f0000");
pub const OPENSEA_CONDUIT_ADDRESS: Address = address!("1E0049783F008A0085193E00003D00cd54003c71");

/// EIP-712 domain defaults.
pub const DEFAULT_DOMAIN_NAME: &str = "Seaport";
pub const DEFAULT_DOMAIN_VERSION: &str = "1";

/// Seconds added to "now" when estimating ascending amounts, so the
/// transaction still pays enough if it lands a few blocks later.
pub const DEFAULT_ASCENDING_AMOUNT_BUFFER_SECS: u64 = 300;

/// Thirty days.
pub const DEFAULT_ORDER_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// Allowance granted by ERC-20 approvals.
pub const MAX_APPROVAL: U256 = U256::MAX;
