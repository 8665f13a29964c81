//! Configuration types for the SDK.

use crate::serde_helpers::{deserialize_conduit_map, serialize_conduit_map};
use alloy::primitives::{Address, B256};
use seaport_types::constants::{
	DEFAULT_ASCENDING_AMOUNT_BUFFER_SECS, DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION,
	DEFAULT_ORDER_DURATION_SECS, DEFAULT_SEAPORT_ADDRESS, NO_CONDUIT, OPENSEA_CONDUIT_ADDRESS,
	OPENSEA_CONDUIT_KEY,
};
use seaport_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete SDK configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeaportConfig {
	/// Settlement contract and order defaults
	#[serde(default)]
	pub seaport: ProtocolConfig,
	/// Node connection
	#[serde(default)]
	pub network: NetworkConfig,
	/// Signing account
	#[serde(default)]
	pub account: AccountConfig,
}

/// Settlement contract and order construction defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProtocolConfig {
	/// Address of the settlement contract
	pub contract_address: Address,
	/// Seconds added to "now" before checking expiry and pricing ascending
	/// amounts, to cover confirmation latency
	pub ascending_amount_fulfillment_buffer_secs: u64,
	/// When false, approvals are assumed to exist and none are planned
	pub approval_pre_checks: bool,
	/// Conduit used when an order does not name one
	pub default_conduit_key: B256,
	/// Lifetime of orders created without an explicit end time
	pub default_order_duration_secs: u64,
	/// EIP-712 domain name
	pub domain_name: String,
	/// EIP-712 domain version
	pub domain_version: String,
	/// Conduit key to conduit address
	#[serde(
		deserialize_with = "deserialize_conduit_map",
		serialize_with = "serialize_conduit_map"
	)]
	pub conduits: HashMap<B256, Address>,
}

impl Default for ProtocolConfig {
	fn default() -> Self {
		Self {
			contract_address: DEFAULT_SEAPORT_ADDRESS,
			ascending_amount_fulfillment_buffer_secs: DEFAULT_ASCENDING_AMOUNT_BUFFER_SECS,
			approval_pre_checks: true,
			default_conduit_key: NO_CONDUIT,
			default_order_duration_secs: DEFAULT_ORDER_DURATION_SECS,
			domain_name: DEFAULT_DOMAIN_NAME.to_string(),
			domain_version: DEFAULT_DOMAIN_VERSION.to_string(),
			conduits: HashMap::from([(OPENSEA_CONDUIT_KEY, OPENSEA_CONDUIT_ADDRESS)]),
		}
	}
}

impl ProtocolConfig {
	/// Resolves the operator that moves tokens for the given conduit key.
	///
	/// The zero key means no conduit, in which case the settlement contract
	/// itself is the operator.
	pub fn conduit_address(&self, conduit_key: B256) -> Option<Address> {
		if conduit_key == NO_CONDUIT {
			return Some(self.contract_address);
		}
		self.conduits.get(&conduit_key).copied()
	}
}

/// Shape of the `[seaport]` table. Every field is optional.
pub struct ProtocolConfigSchema;

impl ConfigSchema for ProtocolConfigSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let seconds = |min| FieldType::Integer {
			min: Some(min),
			max: None,
		};
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("contract_address", FieldType::Address),
				Field::new("ascending_amount_fulfillment_buffer_secs", seconds(0)),
				Field::new("approval_pre_checks", FieldType::Boolean),
				Field::new("default_conduit_key", FieldType::Bytes32),
				Field::new("default_order_duration_secs", seconds(1)),
				Field::new("domain_name", FieldType::String),
				Field::new("domain_version", FieldType::String),
				Field::new("conduits", FieldType::Map(Box::new(FieldType::Address))).with_validator(
					|value| {
						let keys = value.as_table().map(|table| table.keys()).into_iter().flatten();
						for key in keys {
							if key.parse::<B256>().is_err() {
								return Err(format!("Conduit key '{}' is not 32 bytes of hex", key));
							}
						}
						Ok(())
					},
				),
			],
		);

		schema.validate(config)
	}
}

/// Node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
	pub chain_id: u64,
	/// HTTP(S) JSON-RPC endpoint
	pub rpc_url: String,
	/// Blocks to wait for before an approval counts as confirmed
	pub confirmations: u64,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			chain_id: 1,
			rpc_url: "http://localhost:8545".to_string(),
			confirmations: 1,
		}
	}
}

/// Account provider selection and its provider-specific table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Provider name, e.g. "local"
	pub provider: String,
	/// Provider-specific configuration, validated by the provider's schema
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

impl Default for AccountConfig {
	fn default() -> Self {
		Self {
			provider: "local".to_string(),
			config: empty_table(),
		}
	}
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::map::Map::new())
}
