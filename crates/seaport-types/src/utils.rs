//! Display helpers.

/// Shortens a 0x-prefixed hash to its first and last few characters for logs.
pub fn truncate_hash(hash: &str) -> String {
	if hash.len() <= 12 {
		hash.to_string()
	} else {
		format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
	}
}
