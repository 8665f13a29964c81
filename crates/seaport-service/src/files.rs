//! JSON files exchanged with the command line.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let contents = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read {}", path.display()))?;
	serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Reads every file in `paths`, keeping their order.
pub fn read_all<T: DeserializeOwned>(paths: &[PathBuf]) -> Result<Vec<T>> {
	paths.iter().map(|path| read_json(path)).collect()
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
	let contents = serde_json::to_string_pretty(value)?;
	std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
