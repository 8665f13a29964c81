//! Merkle commitments over admissible identifier sets.
//!
//! Leaves are `keccak256(uint256 identifier)`, sorted and de-duplicated.
//! Parents hash the sorted pair of their children, and a node without a
//! sibling is promoted unchanged. This is the scheme the settlement contract
//! verifies criteria proofs against.

use alloy::primitives::{keccak256, B256, U256};

/// Hash of a single identifier leaf.
pub fn leaf_hash(identifier: U256) -> B256 {
	keccak256(identifier.to_be_bytes::<32>())
}

fn hash_pair(a: B256, b: B256) -> B256 {
	let (low, high) = if a <= b { (a, b) } else { (b, a) };
	let mut buf = [0u8; 64];
	buf[..32].copy_from_slice(low.as_slice());
	buf[32..].copy_from_slice(high.as_slice());
	keccak256(buf)
}

/// A Merkle tree over a set of identifiers.
#[derive(Debug, Clone)]
pub struct CriteriaTree {
	layers: Vec<Vec<B256>>,
}

impl CriteriaTree {
	pub fn new(identifiers: &[U256]) -> Self {
		let mut leaves: Vec<B256> = identifiers.iter().copied().map(leaf_hash).collect();
		leaves.sort();
		leaves.dedup();

		let mut layers = vec![leaves];
		while let Some(last) = layers.last() {
			if last.len() <= 1 {
				break;
			}
			// A trailing odd node reduces to itself and is promoted.
			let next = last
				.chunks(2)
				.filter_map(|pair| pair.iter().copied().reduce(hash_pair))
				.collect();
			layers.push(next);
		}

		Self { layers }
	}

	/// The root commitment. An empty set commits to zero, which the
	/// settlement contract reads as "any identifier".
	pub fn root(&self) -> B256 {
		self.layers
			.last()
			.and_then(|layer| layer.first())
			.copied()
			.unwrap_or(B256::ZERO)
	}

	/// The root as it is stored in an item's identifier field.
	pub fn root_identifier(&self) -> U256 {
		U256::from_be_bytes(self.root().0)
	}

	/// Sibling path for `identifier`, or `None` when it is not in the set.
	pub fn proof(&self, identifier: U256) -> Option<Vec<B256>> {
		let leaf = leaf_hash(identifier);
		let mut index = self.layers.first()?.binary_search(&leaf).ok()?;

		let mut proof = Vec::new();
		for layer in &self.layers[..self.layers.len() - 1] {
			let sibling = index ^ 1;
			if sibling < layer.len() {
				proof.push(layer[sibling]);
			}
			index /= 2;
		}
		Some(proof)
	}
}

/// Checks `proof` for `identifier` against `root`.
pub fn verify_proof(root: B256, identifier: U256, proof: &[B256]) -> bool {
	let computed = proof
		.iter()
		.fold(leaf_hash(identifier), |node, sibling| hash_pair(node, *sibling));
	computed == root
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(values: &[u64]) -> Vec<U256> {
		values.iter().map(|v| U256::from(*v)).collect()
	}

	#[test]
	fn test_empty_set_has_zero_root() {
		let tree = CriteriaTree::new(&[]);
		assert_eq!(tree.root(), B256::ZERO);
		assert_eq!(tree.root_identifier(), U256::ZERO);
		assert!(tree.proof(U256::from(1)).is_none());
	}

	#[test]
	fn test_single_leaf_is_root() {
		let tree = CriteriaTree::new(&ids(&[7]));
		assert_eq!(tree.root(), leaf_hash(U256::from(7)));
		assert_eq!(tree.proof(U256::from(7)), Some(vec![]));
	}

	#[test]
	fn test_every_member_proves() {
		for size in 1..=9u64 {
			let set: Vec<u64> = (0..size).map(|i| i * 13 + 1).collect();
			let tree = CriteriaTree::new(&ids(&set));
			for id in &set {
				let proof = tree.proof(U256::from(*id)).unwrap();
				assert!(
					verify_proof(tree.root(), U256::from(*id), &proof),
					"size {} id {}",
					size,
					id
				);
			}
			assert!(tree.proof(U256::from(1000)).is_none());
		}
	}

	#[test]
	fn test_root_ignores_order_and_duplicates() {
		let a = CriteriaTree::new(&ids(&[3, 1, 2]));
		let b = CriteriaTree::new(&ids(&[1, 2, 3, 3, 1]));
		assert_eq!(a.root(), b.root());
	}

	#[test]
	fn test_wrong_proof_fails() {
		let tree = CriteriaTree::new(&ids(&[1, 2, 3, 4]));
		let proof = tree.proof(U256::from(1)).unwrap();
		assert!(!verify_proof(tree.root(), U256::from(2), &proof));
	}
}
