//! Configuration for the order protocol SDK.
//!
//! Configuration is read from a TOML, JSON or YAML file, with `${VAR}`
//! references substituted from the environment before parsing and a small set
//! of `SEAPORT_*` variables overriding values afterwards.

use seaport_types::ValidationError;
use thiserror::Error;

pub mod loader;
pub mod serde_helpers;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Unsupported config format: {0}")]
	UnsupportedFormat(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Invalid configuration: {0}")]
	Schema(#[from] ValidationError),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}
