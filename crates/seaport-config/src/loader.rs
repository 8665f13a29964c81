//! Configuration loading from files and environment.

use crate::{types::*, ConfigError};
use alloy::primitives::Address;
use seaport_types::ConfigSchema;
use std::path::Path;
use tracing::{debug, info};

/// Environment variables that override file values after parsing.
pub const ENV_RPC_URL: &str = "SEAPORT_RPC_URL";
pub const ENV_CHAIN_ID: &str = "SEAPORT_CHAIN_ID";
pub const ENV_CONTRACT_ADDRESS: &str = "SEAPORT_CONTRACT_ADDRESS";
pub const ENV_CONFIRMATIONS: &str = "SEAPORT_CONFIRMATIONS";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Loads, overrides and validates configuration from a file.
	///
	/// The format is picked from the extension: `.toml`, `.json`, `.yaml`/`.yml`.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SeaportConfig, ConfigError> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		if !path.exists() {
			return Err(ConfigError::FileNotFound(path.display().to_string()));
		}
		let contents = std::fs::read_to_string(path)?;
		let contents = Self::substitute_env_vars(&contents)?;

		let mut config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => {
				Self::check_toml_sections(&contents)?;
				Self::from_toml(&contents)?
			}
			Some("json") => Self::from_json(&contents)?,
			Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
			_ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
		};

		Self::apply_env_overrides(&mut config)?;
		Self::validate_config(&config)?;
		Ok(config)
	}

	/// Parses a TOML string without overrides or validation.
	pub fn from_toml(contents: &str) -> Result<SeaportConfig, ConfigError> {
		toml::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e)))
	}

	/// Checks the `[seaport]` table of a TOML document field by field, so a
	/// malformed value is reported by name.
	pub fn check_toml_sections(contents: &str) -> Result<(), ConfigError> {
		let document: toml::Table = toml::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e)))?;
		if let Some(section) = document.get("seaport") {
			ProtocolConfigSchema
				.validate(section)
				.map_err(|e| e.nested("seaport"))?;
		}
		Ok(())
	}

	/// Parses a JSON string without overrides or validation.
	pub fn from_json(contents: &str) -> Result<SeaportConfig, ConfigError> {
		serde_json::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {}", e)))
	}

	/// Parses a YAML string without overrides or validation.
	pub fn from_yaml(contents: &str) -> Result<SeaportConfig, ConfigError> {
		serde_yaml::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e)))
	}

	/// Replaces every `${VAR}` with the value of the environment variable.
	pub fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
		let re = regex::Regex::new(r"\$\{([^}]+)\}")
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		let mut result = content.to_string();
		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = std::env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	/// Applies the `SEAPORT_*` overrides from the process environment.
	pub fn apply_env_overrides(config: &mut SeaportConfig) -> Result<(), ConfigError> {
		Self::apply_overrides(config, |name| std::env::var(name).ok())
	}

	/// Applies overrides read through `lookup`.
	pub fn apply_overrides<F>(config: &mut SeaportConfig, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(url) = lookup(ENV_RPC_URL) {
			debug!("Overriding RPC URL from environment");
			config.network.rpc_url = url;
		}

		if let Some(chain_id) = lookup(ENV_CHAIN_ID) {
			debug!("Overriding chain id from environment");
			config.network.chain_id = chain_id
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid chain id: {}", e)))?;
		}

		if let Some(address) = lookup(ENV_CONTRACT_ADDRESS) {
			debug!("Overriding contract address from environment");
			config.seaport.contract_address = address.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid contract address: {}", e))
			})?;
		}

		if let Some(confirmations) = lookup(ENV_CONFIRMATIONS) {
			debug!("Overriding confirmations from environment");
			config.network.confirmations = confirmations.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid confirmations: {}", e))
			})?;
		}

		Ok(())
	}

	/// Checks cross-field constraints and the account provider's table.
	pub fn validate_config(config: &SeaportConfig) -> Result<(), ConfigError> {
		if config.network.chain_id == 0 {
			return Err(ConfigError::ValidationError(
				"chain_id must be non-zero".to_string(),
			));
		}

		if config.seaport.contract_address == Address::ZERO {
			return Err(ConfigError::ValidationError(
				"contract_address must be non-zero".to_string(),
			));
		}

		if config.network.confirmations == 0 {
			return Err(ConfigError::ValidationError(
				"confirmations must be at least 1".to_string(),
			));
		}

		if config
			.seaport
			.conduit_address(config.seaport.default_conduit_key)
			.is_none()
		{
			return Err(ConfigError::ValidationError(format!(
				"default_conduit_key {} has no conduit mapping",
				config.seaport.default_conduit_key
			)));
		}

		let url = &config.network.rpc_url;
		if !url.starts_with("http://") && !url.starts_with("https://") {
			return Err(ConfigError::ValidationError(format!(
				"rpc_url must be an http(s) URL, got '{}'",
				url
			)));
		}

		let schema = seaport_account::config_schema(&config.account.provider).ok_or_else(|| {
			ConfigError::ValidationError(format!(
				"Unknown account provider '{}'",
				config.account.provider
			))
		})?;
		schema.validate(&config.account.config)?;

		Ok(())
	}
}
