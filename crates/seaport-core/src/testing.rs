//! In-memory collaborators for use case tests.

use crate::Seaport;
use alloy::primitives::{address, keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use seaport_account::implementations::local::LocalWallet;
use seaport_account::{AccountError, AccountInterface};
use seaport_chain::{ChainError, ChainStateInterface};
use seaport_config::SeaportConfig;
use seaport_delivery::{DeliveryError, DeliveryInterface};
use seaport_types::abi::{IERC20, IERC721};
use seaport_types::{
	ConfigSchema, OrderStatus, Signature, Transaction, TransactionHash, TransactionReceipt,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) const TEST_KEY: &str =
	"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub(crate) const TEST_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

#[derive(Default)]
struct ChainState {
	allowances: HashMap<(Address, Address), U256>,
	operators: HashSet<(Address, Address)>,
	statuses: HashMap<B256, OrderStatus>,
	nonce: U256,
}

/// Chain state for a single owner, updated by [`MockDelivery`].
#[derive(Default)]
pub(crate) struct MockChain {
	state: Mutex<ChainState>,
}

impl MockChain {
	pub async fn set_nonce(&self, nonce: U256) {
		self.state.lock().await.nonce = nonce;
	}

	pub async fn set_status(&self, order_hash: B256, status: OrderStatus) {
		self.state.lock().await.statuses.insert(order_hash, status);
	}

	pub async fn allowance_of(&self, token: Address) -> U256 {
		let state = self.state.lock().await;
		state
			.allowances
			.iter()
			.find(|((t, _), _)| *t == token)
			.map(|(_, amount)| *amount)
			.unwrap_or_default()
	}

	pub async fn is_operator(&self, token: Address) -> bool {
		let state = self.state.lock().await;
		state.operators.iter().any(|(t, _)| *t == token)
	}

	async fn apply(&self, tx: &Transaction) {
		let Some(token) = tx.to else { return };
		let mut state = self.state.lock().await;
		if let Ok(call) = IERC20::approveCall::abi_decode(&tx.data) {
			state.allowances.insert((token, call.spender), call.amount);
		} else if let Ok(call) = IERC721::setApprovalForAllCall::abi_decode(&tx.data) {
			if call.approved {
				state.operators.insert((token, call.operator));
			}
		}
	}
}

#[async_trait]
impl ChainStateInterface for MockChain {
	async fn allowance(
		&self,
		token: Address,
		_owner: Address,
		operator: Address,
	) -> Result<U256, ChainError> {
		let state = self.state.lock().await;
		Ok(state
			.allowances
			.get(&(token, operator))
			.copied()
			.unwrap_or_default())
	}

	async fn is_approved_for_all(
		&self,
		token: Address,
		_owner: Address,
		operator: Address,
	) -> Result<bool, ChainError> {
		Ok(self
			.state
			.lock()
			.await
			.operators
			.contains(&(token, operator)))
	}

	async fn order_status(&self, order_hash: B256) -> Result<OrderStatus, ChainError> {
		let state = self.state.lock().await;
		Ok(state.statuses.get(&order_hash).cloned().unwrap_or_default())
	}

	async fn nonce(&self, _offerer: Address) -> Result<U256, ChainError> {
		Ok(self.state.lock().await.nonce)
	}
}

/// Records submissions and mines them at once. Transactions sent to
/// `fail_token` revert.
pub(crate) struct MockDelivery {
	chain: Arc<MockChain>,
	fail_token: Option<Address>,
	submitted: Mutex<Vec<Transaction>>,
	receipts: Mutex<HashMap<TransactionHash, TransactionReceipt>>,
}

impl MockDelivery {
	pub async fn submitted(&self) -> Vec<Transaction> {
		self.submitted.lock().await.clone()
	}
}

#[async_trait]
impl DeliveryInterface for MockDelivery {
	fn sender(&self) -> Address {
		TEST_ADDRESS
	}

	fn chain_id(&self) -> u64 {
		1
	}

	async fn estimate_gas(&self, _tx: &Transaction) -> Result<u64, DeliveryError> {
		Ok(100_000)
	}

	async fn call(&self, _tx: &Transaction) -> Result<Bytes, DeliveryError> {
		Ok(Bytes::new())
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		let mut submitted = self.submitted.lock().await;
		let block_number = submitted.len() as u64 + 1;
		let hash = TransactionHash(keccak256(block_number.to_be_bytes()).to_vec());

		let success = self.fail_token.map_or(true, |token| tx.to != Some(token));
		if success {
			self.chain.apply(&tx).await;
		}
		submitted.push(tx);

		self.receipts.lock().await.insert(
			hash.clone(),
			TransactionReceipt {
				hash: hash.clone(),
				block_number,
				success,
			},
		);
		Ok(hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		_confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.get_receipt(hash).await
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.receipts
			.lock()
			.await
			.get(hash)
			.cloned()
			.ok_or_else(|| DeliveryError::Network(format!("Unknown transaction {}", hash)))
	}
}

/// Local wallet that counts how often it signed.
pub(crate) struct CountingAccount {
	wallet: LocalWallet,
	pub signatures: AtomicUsize,
}

#[async_trait]
impl AccountInterface for CountingAccount {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		self.wallet.config_schema()
	}

	async fn address(&self) -> Result<Address, AccountError> {
		self.wallet.address().await
	}

	async fn sign_digest(&self, digest: B256) -> Result<Signature, AccountError> {
		self.signatures.fetch_add(1, Ordering::SeqCst);
		self.wallet.sign_digest(digest).await
	}
}

pub(crate) struct Harness {
	pub account: Arc<CountingAccount>,
	pub delivery: Arc<MockDelivery>,
	pub chain: Arc<MockChain>,
}

impl Harness {
	pub fn new() -> Self {
		Self::with_failure(None)
	}

	pub fn failing_on(token: Address) -> Self {
		Self::with_failure(Some(token))
	}

	fn with_failure(fail_token: Option<Address>) -> Self {
		let chain = Arc::new(MockChain::default());
		let delivery = Arc::new(MockDelivery {
			chain: chain.clone(),
			fail_token,
			submitted: Mutex::new(Vec::new()),
			receipts: Mutex::new(HashMap::new()),
		});
		let account = Arc::new(CountingAccount {
			wallet: LocalWallet::new(TEST_KEY).unwrap(),
			signatures: AtomicUsize::new(0),
		});
		Self {
			account,
			delivery,
			chain,
		}
	}

	pub fn seaport(&self, config: SeaportConfig) -> Seaport {
		Seaport::new(
			config,
			self.account.clone(),
			self.delivery.clone(),
			self.chain.clone(),
		)
		.unwrap()
	}
}
