//! Schema checks for TOML configuration sections.
//!
//! Component configuration (account providers, the protocol section) is kept
//! as raw `toml::Value` until a component accepts it, so each component
//! describes its section with a [`Schema`] and checks it before use.

use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
	#[error("Failed to deserialize config: {0}")]
	DeserializationError(String),
}

impl ValidationError {
	/// Prefixes the field name with `parent`.
	pub fn nested(self, parent: &str) -> Self {
		match self {
			ValidationError::MissingField(f) => {
				ValidationError::MissingField(format!("{}.{}", parent, f))
			}
			ValidationError::InvalidValue { field, message } => ValidationError::InvalidValue {
				field: format!("{}.{}", parent, field),
				message,
			},
			ValidationError::TypeMismatch {
				field,
				expected,
				actual,
			} => ValidationError::TypeMismatch {
				field: format!("{}.{}", parent, field),
				expected,
				actual,
			},
			other => other,
		}
	}
}

/// Type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	String,
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
	/// A 20-byte hex string.
	Address,
	/// A 32-byte hex string.
	Bytes32,
	Array(Box<FieldType>),
	/// A table whose keys are free-form and whose values share one type.
	Map(Box<FieldType>),
	Table(Schema),
}

pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field with its expected type and an optional extra check.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator, run after the type check passes.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		validate_field_type(&self.name, value, &self.field_type)?;
		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}
		Ok(())
	}
}

/// Required and optional fields of one configuration table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML table against this schema. Unknown keys are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

fn mismatch(field_name: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(mismatch(field_name, "string", value));
			}
		}
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| mismatch(field_name, "integer", value))?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is less than minimum {}", int_val, min_val),
					});
				}
			}
			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is greater than maximum {}", int_val, max_val),
					});
				}
			}
		}
		FieldType::Boolean => {
			if !value.is_bool() {
				return Err(mismatch(field_name, "boolean", value));
			}
		}
		FieldType::Address => {
			let s = value
				.as_str()
				.ok_or_else(|| mismatch(field_name, "address", value))?;
			s.parse::<Address>()
				.map_err(|e| ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Invalid address '{}': {}", s, e),
				})?;
		}
		FieldType::Bytes32 => {
			let s = value
				.as_str()
				.ok_or_else(|| mismatch(field_name, "bytes32", value))?;
			s.parse::<B256>()
				.map_err(|e| ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Invalid bytes32 '{}': {}", s, e),
				})?;
		}
		FieldType::Array(inner_type) => {
			let array = value
				.as_array()
				.ok_or_else(|| mismatch(field_name, "array", value))?;

			for (i, item) in array.iter().enumerate() {
				validate_field_type(&format!("{}[{}]", field_name, i), item, inner_type)?;
			}
		}
		FieldType::Map(inner_type) => {
			let table = value
				.as_table()
				.ok_or_else(|| mismatch(field_name, "table", value))?;

			for (key, item) in table {
				validate_field_type(&format!("{}.{}", field_name, key), item, inner_type)?;
			}
		}
		FieldType::Table(schema) => {
			schema.validate(value).map_err(|e| e.nested(field_name))?;
		}
	}

	Ok(())
}

/// A component's description of the configuration section it accepts.
pub trait ConfigSchema: Send + Sync {
	/// Checks presence, types and constraints of every field.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(s: &str) -> toml::Value {
		toml::Value::Table(toml::from_str::<toml::Table>(s).unwrap())
	}

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("contract_address", FieldType::Address)],
			vec![
				Field::new(
					"confirmations",
					FieldType::Integer {
						min: Some(1),
						max: Some(64),
					},
				),
				Field::new("conduits", FieldType::Map(Box::new(FieldType::Address))),
				Field::new("default_conduit_key", FieldType::Bytes32),
			],
		)
	}

	#[test]
	fn test_valid_table_passes() {
		let value = parse(
			r#"
			contract_address = "0x00000000006c3852cbEf3e08E8dF289169EdE581"
			confirmations = 2
			default_conduit_key = "0x0000000000000000000000000000000000000000000000000000000000000000"
			[conduits]
			"0x0000007b02230091a7ed01230072f7006a004d60a8d4e71d599b8104250f0000" = "0x1E0049783F008A0085193E00003D00cd54003c71"
			"#,
		);

		assert!(schema().validate(&value).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let value = parse("confirmations = 2");
		match schema().validate(&value) {
			Err(ValidationError::MissingField(field)) => assert_eq!(field, "contract_address"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_bad_address_and_range() {
		let value = parse(r#"contract_address = "0x1234""#);
		assert!(matches!(
			schema().validate(&value),
			Err(ValidationError::InvalidValue { .. })
		));

		let value = parse(
			r#"
			contract_address = "0x00000000006c3852cbEf3e08E8dF289169EdE581"
			confirmations = 0
			"#,
		);
		assert!(matches!(
			schema().validate(&value),
			Err(ValidationError::InvalidValue { field, .. }) if field == "confirmations"
		));
	}

	#[test]
	fn test_map_entries_are_checked() {
		let value = parse(
			r#"
			contract_address = "0x00000000006c3852cbEf3e08E8dF289169EdE581"
			[conduits]
			"0xabc" = 5
			"#,
		);
		assert!(matches!(
			schema().validate(&value),
			Err(ValidationError::TypeMismatch { field, .. }) if field == "conduits.0xabc"
		));
	}
}
