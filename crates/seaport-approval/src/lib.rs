//! Authorization planning.
//!
//! Given the items an account must send and the operator that will move them,
//! works out which token approvals are still missing. Planning only reads
//! chain state; the returned [`Approval`]s are executed later by the action
//! pipeline.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use seaport_chain::{ChainError, ChainStateInterface};
use seaport_types::abi::{IERC20, IERC721};
use seaport_types::constants::MAX_APPROVAL;
use seaport_types::{truncate_hash, ApprovalRequirement, ItemType};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// The approval call an item kind needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApprovalKind {
	/// `approve(operator, amount)` on an ERC-20.
	Allowance,
	/// `setApprovalForAll(operator, true)` on an ERC-721 or ERC-1155.
	Operator,
}

impl ApprovalKind {
	fn of(item_type: ItemType) -> Option<Self> {
		match item_type {
			ItemType::Native => None,
			ItemType::Erc20 => Some(ApprovalKind::Allowance),
			ItemType::Erc721
			| ItemType::Erc1155
			| ItemType::Erc721WithCriteria
			| ItemType::Erc1155WithCriteria => Some(ApprovalKind::Operator),
		}
	}
}

#[derive(Debug, Error)]
pub enum ApprovalError {
	#[error("Failed to read approval state for {token}: {source}")]
	Chain {
		token: Address,
		#[source]
		source: ChainError,
	},
}

/// One missing authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub operator: Address,
}

impl Approval {
	pub fn from_requirement(requirement: &ApprovalRequirement) -> Self {
		Self {
			item_type: requirement.item_type,
			token: requirement.token,
			identifier_or_criteria: requirement.identifier_or_criteria,
			operator: requirement.operator,
		}
	}

	/// Calldata for the approval, sent to [`Approval::token`].
	///
	/// ERC-20 tokens get an unlimited allowance; NFT collections get operator
	/// approval for every identifier.
	pub fn calldata(&self) -> Vec<u8> {
		match ApprovalKind::of(self.item_type) {
			Some(ApprovalKind::Allowance) => IERC20::approveCall {
				spender: self.operator,
				amount: MAX_APPROVAL,
			}
			.abi_encode(),
			_ => IERC721::setApprovalForAllCall {
				operator: self.operator,
				approved: true,
			}
			.abi_encode(),
		}
	}
}

/// Plans approvals against a chain-state reader.
pub struct ApprovalPlanner {
	chain: Arc<dyn ChainStateInterface>,
	/// When false, chain state is not consulted and every requirement is
	/// assumed to be satisfied already.
	pre_checks: bool,
}

impl ApprovalPlanner {
	pub fn new(chain: Arc<dyn ChainStateInterface>, pre_checks: bool) -> Self {
		Self { chain, pre_checks }
	}

	/// Returns the approvals `owner` still lacks, in the order of
	/// `requirements`.
	///
	/// Requirements are expected to be distinct per (token, operator), as
	/// produced by [`seaport_types::collect_requirements`]; duplicates are
	/// dropped regardless.
	pub async fn plan(
		&self,
		owner: Address,
		requirements: &[ApprovalRequirement],
	) -> Result<Vec<Approval>, ApprovalError> {
		if !self.pre_checks {
			debug!(
				skipped = requirements.len(),
				"Approval pre-checks disabled, assuming all tokens approved"
			);
			return Ok(Vec::new());
		}

		let mut approvals: Vec<Approval> = Vec::new();
		for requirement in requirements {
			if approvals
				.iter()
				.any(|a| a.token == requirement.token && a.operator == requirement.operator)
			{
				continue;
			}
			if self.is_missing(owner, requirement).await? {
				approvals.push(Approval::from_requirement(requirement));
			} else {
				debug!(
					token = %requirement.token,
					operator = %requirement.operator,
					"Approval already in place"
				);
			}
		}

		debug!(
			owner = %truncate_hash(&owner.to_string()),
			required = requirements.len(),
			missing = approvals.len(),
			"Planned approvals"
		);
		Ok(approvals)
	}

	async fn is_missing(
		&self,
		owner: Address,
		requirement: &ApprovalRequirement,
	) -> Result<bool, ApprovalError> {
		let token = requirement.token;
		let operator = requirement.operator;
		let chain_error = |source| ApprovalError::Chain { token, source };

		match ApprovalKind::of(requirement.item_type) {
			None => Ok(false),
			Some(ApprovalKind::Allowance) => {
				let allowance = self
					.chain
					.allowance(token, owner, operator)
					.await
					.map_err(chain_error)?;
				Ok(allowance < requirement.amount)
			}
			Some(ApprovalKind::Operator) => {
				let approved = self
					.chain
					.is_approved_for_all(token, owner, operator)
					.await
					.map_err(chain_error)?;
				Ok(!approved)
			}
		}
	}
}
