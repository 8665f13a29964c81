//! Serde helpers for configuration deserialization

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Deserializes a conduit map whose keys are 32-byte hex strings.
pub fn deserialize_conduit_map<'de, D>(deserializer: D) -> Result<HashMap<B256, Address>, D::Error>
where
	D: Deserializer<'de>,
{
	let map = HashMap::<String, Address>::deserialize(deserializer)?;

	map.into_iter()
		.map(|(k, v)| {
			k.parse::<B256>()
				.map(|key| (key, v))
				.map_err(|_| serde::de::Error::custom(format!("Invalid conduit key: {}", k)))
		})
		.collect()
}

/// Serializes a conduit map with its keys rendered as 0x-prefixed hex.
pub fn serialize_conduit_map<S>(
	map: &HashMap<B256, Address>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let string_map: HashMap<String, &Address> = map.iter().map(|(k, v)| (k.to_string(), v)).collect();

	string_map.serialize(serializer)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{address, b256};

	#[derive(Debug, Deserialize, Serialize)]
	struct TestStruct {
		#[serde(
			deserialize_with = "deserialize_conduit_map",
			serialize_with = "serialize_conduit_map"
		)]
		conduits: HashMap<B256, Address>,
	}

	#[test]
	fn test_deserialize_conduit_map() {
		let toml = r#"
			[conduits]
			"0x0000007b02230091a7ed01230072f7006a004d60a8d4e71d599b8104250f0000" = "0x1E0049783F008A0085193E00003D00cd54003c71"
		"#;

		let result: TestStruct = toml::from_str(toml).unwrap();
		let key = b256!("0000007b02230091a7ed01230072f7006a004d60a8d4e71d599b8104250f0000");
		assert_eq!(
			result.conduits.get(&key),
			Some(&address!("1E0049783F008A0085193E00003D00cd54003c71"))
		);
	}

	#[test]
	fn test_rejects_malformed_key() {
		let toml = r#"
			[conduits]
			"opensea" = "0x1E0049783F008A0085193E00003D00cd54003c71"
		"#;

		let err = toml::from_str::<TestStruct>(toml).unwrap_err();
		assert!(err.to_string().contains("Invalid conduit key"));
	}

	#[test]
	fn test_serialize_round_trip() {
		let mut conduits = HashMap::new();
		conduits.insert(B256::repeat_byte(0x11), Address::repeat_byte(0x22));
		let test_struct = TestStruct { conduits };

		let json = serde_json::to_string(&test_struct).unwrap();
		assert!(json.contains(&format!("{}", B256::repeat_byte(0x11))));

		let parsed: TestStruct = serde_json::from_str(&json).unwrap();
		assert_eq!(
			parsed.conduits.get(&B256::repeat_byte(0x11)),
			Some(&Address::repeat_byte(0x22))
		);
	}
}
