//! EIP-712 hashing of orders.
//!
//! The order hash is the struct hash of the order components. It is the
//! identifier the settlement contract uses for status lookups and
//! cancellation. The offerer signs `keccak256(0x1901 ‖ domainSeparator ‖ orderHash)`.

use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::sol_types::{Eip712Domain, SolStruct};
use seaport_config::ProtocolConfig;
use seaport_types::{abi, OrderComponents};
use std::borrow::Cow;

/// The signing domain of one settlement contract deployment.
#[derive(Debug, Clone)]
pub struct OrderDomain {
	domain: Eip712Domain,
}

impl OrderDomain {
	pub fn new(
		name: impl Into<String>,
		version: impl Into<String>,
		chain_id: u64,
		verifying_contract: Address,
	) -> Self {
		Self {
			domain: Eip712Domain::new(
				Some(Cow::Owned(name.into())),
				Some(Cow::Owned(version.into())),
				Some(U256::from(chain_id)),
				Some(verifying_contract),
				None,
			),
		}
	}

	pub fn from_config(config: &ProtocolConfig, chain_id: u64) -> Self {
		Self::new(
			config.domain_name.clone(),
			config.domain_version.clone(),
			chain_id,
			config.contract_address,
		)
	}

	pub fn separator(&self) -> B256 {
		self.domain.separator()
	}

	/// The bytes the offerer must sign, before hashing.
	pub fn message_to_sign(&self, components: &OrderComponents) -> Vec<u8> {
		let mut message = Vec::with_capacity(66);
		message.extend_from_slice(&[0x19, 0x01]);
		message.extend_from_slice(self.separator().as_slice());
		message.extend_from_slice(order_hash(components).as_slice());
		message
	}

	/// `keccak256` of [`Self::message_to_sign`].
	pub fn signing_digest(&self, components: &OrderComponents) -> B256 {
		keccak256(self.message_to_sign(components))
	}
}

/// The canonical identifier of an order.
pub fn order_hash(components: &OrderComponents) -> B256 {
	abi::OrderComponents::from(components).eip712_hash_struct()
}
