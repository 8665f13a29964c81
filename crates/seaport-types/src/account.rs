//! Signature and transaction types.
//!
//! These are the values exchanged with the signer and transaction issuer
//! collaborators.

use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};

/// Cryptographic signature representation.
///
/// Stores signatures as raw bytes in the standard Ethereum format (r, s, v).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(pub Vec<u8>);

impl From<alloy::primitives::Signature> for Signature {
	fn from(sig: alloy::primitives::Signature) -> Self {
		// r || s || v with v = 27 + y_parity
		Signature(sig.as_bytes().to_vec())
	}
}

impl From<Signature> for Bytes {
	fn from(sig: Signature) -> Self {
		Bytes::from(sig.0)
	}
}

/// Blockchain transaction representation.
///
/// Contains all fields necessary for constructing and submitting transactions.
/// Unset gas and nonce fields are filled in by the transaction issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Sender address, if known.
	pub from: Option<Address>,
	/// Recipient address (None for contract creation).
	pub to: Option<Address>,
	/// Transaction data/calldata.
	pub data: Vec<u8>,
	/// Value to transfer in native currency.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	/// Transaction nonce (optional, can be filled by provider).
	pub nonce: Option<u64>,
	/// Gas limit for transaction execution.
	pub gas_limit: Option<u64>,
	/// Maximum fee per gas (EIP-1559).
	pub max_fee_per_gas: Option<u128>,
	/// Maximum priority fee per gas (EIP-1559).
	pub max_priority_fee_per_gas: Option<u128>,
}

impl Transaction {
	/// A call to `to` carrying `data`, with everything else left to the issuer.
	pub fn call(chain_id: u64, from: Address, to: Address, data: Vec<u8>) -> Self {
		Self {
			from: Some(from),
			to: Some(to),
			data,
			chain_id,
			..Default::default()
		}
	}

	pub fn with_value(mut self, value: U256) -> Self {
		self.value = value;
		self
	}
}

/// Conversion from Alloy's TransactionRequest to our Transaction type.
impl From<TransactionRequest> for Transaction {
	fn from(req: TransactionRequest) -> Self {
		Transaction {
			from: req.from,
			to: req.to.and_then(|kind| match kind {
				TxKind::Call(address) => Some(address),
				TxKind::Create => None,
			}),
			data: req.input.input().cloned().unwrap_or_default().to_vec(),
			value: req.value.unwrap_or(U256::ZERO),
			chain_id: req.chain_id.unwrap_or(1),
			nonce: req.nonce,
			gas_limit: req.gas,
			max_fee_per_gas: req.max_fee_per_gas,
			max_priority_fee_per_gas: req.max_priority_fee_per_gas,
		}
	}
}

/// Conversion from our Transaction type to Alloy's TransactionRequest.
impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		TransactionRequest {
			from: tx.from,
			to: Some(match tx.to {
				Some(address) => TxKind::Call(address),
				None => TxKind::Create,
			}),
			chain_id: Some(tx.chain_id),
			value: Some(tx.value),
			nonce: tx.nonce,
			gas: tx.gas_limit,
			max_fee_per_gas: tx.max_fee_per_gas,
			max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
			input: TransactionInput {
				input: Some(Bytes::from(tx.data)),
				data: None,
			},
			..Default::default()
		}
	}
}
