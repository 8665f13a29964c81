//! Ordered execution of a use case.

use crate::actions::{Action, ApprovalAction, TerminalAction};
use crate::error::PipelineError;
use tracing::{info, warn};

/// Zero or more approvals followed by exactly one terminal action.
#[derive(Debug)]
pub struct OrderUseCase<T: TerminalAction> {
	approvals: Vec<ApprovalAction>,
	terminal: T,
	confirmations: u64,
}

impl<T: TerminalAction> OrderUseCase<T> {
	/// Each approval is waited on for `confirmations` blocks before the next
	/// action starts.
	pub fn new(approvals: Vec<ApprovalAction>, terminal: T, confirmations: u64) -> Self {
		Self {
			approvals,
			terminal,
			confirmations,
		}
	}

	/// Every action in execution order, the terminal action last.
	pub fn actions(&self) -> Vec<Action<'_, T>> {
		self.approvals
			.iter()
			.map(Action::Approval)
			.chain(std::iter::once(Action::Terminal(&self.terminal)))
			.collect()
	}

	pub fn approvals(&self) -> &[ApprovalAction] {
		&self.approvals
	}

	pub fn terminal(&self) -> &T {
		&self.terminal
	}

	/// Runs every approval in order, each confirmed before the next, then the
	/// terminal action.
	///
	/// Stops at the first failed approval. Approvals that already confirmed
	/// stay in effect.
	pub async fn execute_all_actions(self) -> Result<T::Output, PipelineError> {
		let total = self.approvals.len();
		for (index, action) in self.approvals.iter().enumerate() {
			info!(
				index,
				total,
				token = %action.token(),
				operator = %action.operator(),
				item_type = %action.item_type(),
				"Executing approval"
			);

			let receipt = action
				.execute(self.confirmations)
				.await
				.map_err(|cause| {
					warn!(
						index,
						token = %action.token(),
						operator = %action.operator(),
						error = %cause,
						"Approval failed, aborting"
					);
					PipelineError::AuthorizationFailed {
						index,
						token: action.token(),
						operator: action.operator(),
						cause,
					}
				})?;

			info!(
				index,
				tx_hash = %receipt.hash.truncated(),
				block = receipt.block_number,
				"Approval confirmed"
			);
		}

		let name = self.terminal.name();
		info!(action = name, "Executing terminal action");
		self.terminal.execute().await.map_err(|e| {
			warn!(action = name, error = %e, "Terminal action failed");
			e
		})
	}
}
