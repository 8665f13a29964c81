//! Builders for the creation and fulfillment use cases.

use crate::actions::{ApprovalAction, CreateOrderAction, ExchangeAction};
use crate::error::SeaportError;
use crate::pipeline::OrderUseCase;
use crate::Seaport;
use alloy::primitives::{Address, Bytes};
use seaport_approval::ApprovalPlanner;
use seaport_fulfillment::{plan_match, resolve_criteria, Exclusions};
use seaport_order::{
	check_status, check_time_window, mirror_order_parameters, order_hash, parse_tips, Normalizer,
};
use seaport_types::{
	collect_requirements, truncate_hash, ApprovalRequirement, CreateInputItem, CreateOrderInput,
	CriteriaResolution, ItemType, Order, OrderParameters, OrderWithNonce,
};
use tracing::{debug, info};

impl Seaport {
	/// Normalizes `input` for this account and plans the approvals its offer
	/// items need. `now` anchors the default active window.
	pub async fn build_create_order_use_case(
		&self,
		input: &CreateOrderInput,
		now: u64,
	) -> Result<OrderUseCase<CreateOrderAction>, SeaportError> {
		let offerer = self.account.address().await?;
		let nonce = match input.nonce {
			Some(nonce) => nonce,
			None => self.chain.nonce(offerer).await?,
		};

		let normalized =
			Normalizer::new(&self.config.seaport).normalize(input, offerer, nonce, now)?;
		let approvals = self.plan_approvals(offerer, &normalized.approvals).await?;

		let action = CreateOrderAction::new(
			self.domain.clone(),
			normalized.components,
			self.account.clone(),
		);
		info!(
			order_hash = %truncate_hash(&action.order_hash().to_string()),
			approvals = approvals.len(),
			"Built create order use case"
		);

		Ok(OrderUseCase::new(
			approvals,
			action,
			self.config.network.confirmations,
		))
	}

	/// Checks every order is fillable at `now`, then resolves criteria,
	/// aggregates the batch, and plans the approvals this account needs for
	/// the orders it offers in.
	pub async fn build_fulfill_use_case(
		&self,
		orders: &[OrderWithNonce],
		resolutions: &[CriteriaResolution],
		exclusions: &Exclusions,
		now: u64,
	) -> Result<OrderUseCase<ExchangeAction>, SeaportError> {
		self.check_fillable(orders, now).await?;
		let batch: Vec<Order> = orders.iter().cloned().map(Order::from).collect();
		self.build_exchange(batch, resolutions, exclusions, now)
			.await
	}

	/// Like [`Self::build_fulfill_use_case`] for one order, adding an unsigned
	/// counter-order from this account that takes the other side of every
	/// item. `tips` are appended to the order's consideration and paid by
	/// this account.
	pub async fn build_fulfill_order_use_case(
		&self,
		order: &OrderWithNonce,
		resolutions: &[CriteriaResolution],
		tips: &[CreateInputItem],
		now: u64,
	) -> Result<OrderUseCase<ExchangeAction>, SeaportError> {
		self.check_fillable(std::slice::from_ref(order), now).await?;
		let filler = self.account.address().await?;

		let mut tipped = Order::from(order.clone());
		let consideration = &mut tipped.parameters.consideration;
		consideration.extend(parse_tips(tips, consideration.len())?);
		if !tips.is_empty() {
			debug!(tips = tips.len(), "Added tips to order");
		}

		let mut batch = vec![tipped];
		let resolved = resolve_criteria(&batch, resolutions)?;
		let mirrors: Vec<Order> = resolved
			.resolved
			.iter()
			.map(|parameters| Order {
				parameters: mirror_order_parameters(
					parameters,
					filler,
					self.config.seaport.default_conduit_key,
				),
				signature: Bytes::new(),
			})
			.collect();
		batch.extend(mirrors);

		self.build_exchange(batch, resolutions, &Exclusions::new(), now)
			.await
	}

	async fn build_exchange(
		&self,
		orders: Vec<Order>,
		resolutions: &[CriteriaResolution],
		exclusions: &Exclusions,
		now: u64,
	) -> Result<OrderUseCase<ExchangeAction>, SeaportError> {
		let caller = self.account.address().await?;
		let buffer = self.config.seaport.ascending_amount_fulfillment_buffer_secs;

		let plan = plan_match(
			&orders,
			resolutions,
			exclusions,
			caller,
			now,
			buffer,
		)?;
		let requirements = self.caller_requirements(&plan.batch.resolved, caller)?;
		let approvals = self.plan_approvals(caller, &requirements).await?;

		info!(
			orders = orders.len(),
			fulfillments = plan.fulfillments.fulfillments.len(),
			approvals = approvals.len(),
			value = %plan.value,
			"Built fulfill use case"
		);

		let action = ExchangeAction::new(
			plan,
			self.delivery.clone(),
			self.config.seaport.contract_address,
		);
		Ok(OrderUseCase::new(
			approvals,
			action,
			self.config.network.confirmations,
		))
	}

	/// Time windows are checked for the whole batch before any status is read.
	async fn check_fillable(&self, orders: &[OrderWithNonce], now: u64) -> Result<(), SeaportError> {
		let buffer = self.config.seaport.ascending_amount_fulfillment_buffer_secs;
		for order in orders {
			check_time_window(order.order_parameters(), now, buffer)?;
		}

		for order in orders {
			let hash = order_hash(&order.parameters);
			let status = self.chain.order_status(hash).await?;
			check_status(hash, &status)?;
			debug!(order_hash = %truncate_hash(&hash.to_string()), "Order is fillable");
		}
		Ok(())
	}

	/// Items `caller` sends in the batch, merged per (token, operator).
	fn caller_requirements(
		&self,
		orders: &[OrderParameters],
		caller: Address,
	) -> Result<Vec<ApprovalRequirement>, SeaportError> {
		let normalizer = Normalizer::new(&self.config.seaport);
		let mut merged: Vec<ApprovalRequirement> = Vec::new();

		for order in orders.iter().filter(|order| order.offerer == caller) {
			let operator = normalizer.operator_for(order.conduit_key)?;
			for requirement in collect_requirements(&order.offer, operator) {
				match merged
					.iter_mut()
					.find(|r| r.token == requirement.token && r.operator == requirement.operator)
				{
					Some(existing) if existing.item_type == ItemType::Erc20 => {
						existing.amount = existing.amount.saturating_add(requirement.amount)
					}
					Some(_) => {}
					None => merged.push(requirement),
				}
			}
		}
		Ok(merged)
	}

	async fn plan_approvals(
		&self,
		owner: Address,
		requirements: &[ApprovalRequirement],
	) -> Result<Vec<ApprovalAction>, SeaportError> {
		let planner = ApprovalPlanner::new(
			self.chain.clone(),
			self.config.seaport.approval_pre_checks,
		);
		let approvals = planner.plan(owner, requirements).await?;
		Ok(approvals
			.into_iter()
			.map(|approval| ApprovalAction::new(approval, self.delivery.clone()))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use crate::error::{PipelineError, SeaportError};
	use crate::testing::{Harness, TEST_ADDRESS};
	use alloy::primitives::{Address, Bytes, Signature as EcdsaSignature, U256};
	use alloy::sol_types::SolCall;
	use seaport_config::SeaportConfig;
	use seaport_delivery::DeliveryInterface;
	use seaport_order::{Normalizer, OrderError};
	use seaport_types::abi::{IERC20, IERC721, ISeaport};
	use seaport_types::{
		CreateInputItem, CreateOrderInput, Fee, ItemType, OrderStatus, OrderWithNonce,
	};
	use std::sync::atomic::Ordering;

	const NOW: u64 = 1_700_000_000;

	fn seller() -> Address {
		Address::repeat_byte(0x5e)
	}

	fn nft_token() -> Address {
		Address::repeat_byte(0x72)
	}

	fn weth() -> Address {
		Address::repeat_byte(0x20)
	}

	/// An order signed by someone else, valid from `start` to `end`.
	fn foreign_order(input: CreateOrderInput, start: u64, end: u64) -> OrderWithNonce {
		let config = SeaportConfig::default();
		let input = CreateOrderInput {
			start_time: Some(start),
			end_time: Some(end),
			..input
		};
		let normalized = Normalizer::new(&config.seaport)
			.normalize(&input, seller(), U256::ZERO, start)
			.unwrap();
		OrderWithNonce {
			parameters: normalized.components,
			signature: Bytes::from(vec![0x11; 65]),
		}
	}

	fn listing() -> CreateOrderInput {
		CreateOrderInput {
			offer: vec![CreateInputItem::erc721(nft_token(), U256::from(9))],
			consideration: vec![CreateInputItem::native(U256::from(1000))],
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_create_order_signs_order_hash() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());

		let use_case = seaport
			.build_create_order_use_case(&listing(), NOW)
			.await
			.unwrap();
		assert_eq!(use_case.approvals().len(), 1);
		assert_eq!(use_case.actions().len(), 2);
		assert_eq!(use_case.approvals()[0].item_type(), ItemType::Erc721);
		assert_eq!(
			use_case.approvals()[0].operator(),
			seaport.config().seaport.contract_address
		);

		let digest = seaport
			.domain()
			.signing_digest(use_case.terminal().components());
		let order = use_case.execute_all_actions().await.unwrap();

		assert_eq!(order.order_parameters().offerer, TEST_ADDRESS);
		let signature = EcdsaSignature::try_from(&order.signature[..]).unwrap();
		assert_eq!(
			signature.recover_address_from_prehash(&digest).unwrap(),
			TEST_ADDRESS
		);

		let submitted = harness.delivery.submitted().await;
		assert_eq!(submitted.len(), 1);
		assert_eq!(submitted[0].to, Some(nft_token()));
		assert!(harness.chain.is_operator(nft_token()).await);
	}

	#[tokio::test]
	async fn test_bid_fee_is_appended() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let input = CreateOrderInput {
			offer: vec![CreateInputItem::erc20(weth(), U256::from(1000))],
			consideration: vec![CreateInputItem::erc721(nft_token(), U256::from(1))],
			fees: vec![Fee {
				recipient: Address::repeat_byte(0xfe),
				basis_points: 250,
			}],
			..Default::default()
		};

		let use_case = seaport
			.build_create_order_use_case(&input, NOW)
			.await
			.unwrap();
		let parameters = &use_case.terminal().components().parameters;

		assert_eq!(parameters.consideration.len(), 2);
		assert_eq!(parameters.consideration[1].start_amount, U256::from(25));
		assert_eq!(parameters.total_original_consideration_items, 1);
		assert_eq!(use_case.approvals()[0].item_type(), ItemType::Erc20);
	}

	#[tokio::test]
	async fn test_second_of_three_approvals_failing_stops_the_pipeline() {
		let harness = Harness::failing_on(Address::repeat_byte(0xb2));
		let seaport = harness.seaport(SeaportConfig::default());
		let input = CreateOrderInput {
			offer: vec![
				CreateInputItem::erc20(Address::repeat_byte(0xa1), U256::from(10)),
				CreateInputItem::erc721(Address::repeat_byte(0xb2), U256::from(1)),
				CreateInputItem::erc1155(Address::repeat_byte(0xc3), U256::from(1), U256::from(5)),
			],
			consideration: vec![CreateInputItem::native(U256::from(1))],
			..Default::default()
		};

		let use_case = seaport
			.build_create_order_use_case(&input, NOW)
			.await
			.unwrap();
		assert_eq!(use_case.approvals().len(), 3);

		let err = use_case.execute_all_actions().await.unwrap_err();
		assert!(matches!(
			err,
			PipelineError::AuthorizationFailed { index: 1, token, .. } if token == Address::repeat_byte(0xb2)
		));

		let submitted = harness.delivery.submitted().await;
		assert_eq!(submitted.len(), 2);
		assert_eq!(harness.account.signatures.load(Ordering::SeqCst), 0);
		assert_eq!(
			harness.chain.allowance_of(Address::repeat_byte(0xa1)).await,
			U256::MAX
		);
		assert!(!harness.chain.is_operator(Address::repeat_byte(0xc3)).await);
	}

	#[tokio::test]
	async fn test_planning_twice_gives_identical_actions() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let input = CreateOrderInput {
			offer: vec![
				CreateInputItem::erc1155(Address::repeat_byte(3), U256::from(1), U256::from(2)),
				CreateInputItem::erc20(Address::repeat_byte(1), U256::from(10)),
				CreateInputItem::erc721(Address::repeat_byte(2), U256::from(7)),
			],
			consideration: vec![CreateInputItem::native(U256::from(1))],
			salt: Some(U256::from(42)),
			..Default::default()
		};

		let first = seaport
			.build_create_order_use_case(&input, NOW)
			.await
			.unwrap();
		let second = seaport
			.build_create_order_use_case(&input, NOW)
			.await
			.unwrap();

		let describe = |use_case: &crate::OrderUseCase<crate::CreateOrderAction>| {
			use_case
				.approvals()
				.iter()
				.map(|a| (a.token(), a.operator(), a.transaction_methods().build_transaction()))
				.collect::<Vec<_>>()
		};
		assert_eq!(describe(&first), describe(&second));
		assert_eq!(
			first.terminal().message_to_sign(),
			second.terminal().message_to_sign()
		);
		let tokens: Vec<_> = first.approvals().iter().map(|a| a.token()).collect();
		assert_eq!(
			tokens,
			vec![
				Address::repeat_byte(3),
				Address::repeat_byte(1),
				Address::repeat_byte(2)
			]
		);
	}

	#[tokio::test]
	async fn test_pre_checks_disabled_plans_no_approvals() {
		let harness = Harness::new();
		let mut config = SeaportConfig::default();
		config.seaport.approval_pre_checks = false;
		let seaport = harness.seaport(config);

		let use_case = seaport
			.build_create_order_use_case(&listing(), NOW)
			.await
			.unwrap();
		assert!(use_case.approvals().is_empty());
	}

	#[tokio::test]
	async fn test_confirmation_buffer_rejects_orders_close_to_expiry() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let end = NOW + 10_000;
		let order = foreign_order(listing(), NOW - 10_000, end);

		let err = seaport
			.build_fulfill_order_use_case(&order, &[], &[], end - 100)
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			SeaportError::Order(OrderError::StaleOrder { .. })
		));

		let use_case = seaport
			.build_fulfill_order_use_case(&order, &[], &[], end - 600)
			.await
			.unwrap();
		assert!(use_case.approvals().is_empty());
		assert_eq!(use_case.terminal().plan().value, U256::from(1000));
	}

	#[tokio::test]
	async fn test_cancelled_orders_are_rejected() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let order = foreign_order(listing(), NOW - 10, NOW + 10_000);
		harness
			.chain
			.set_status(
				seaport.get_order_hash(&order.parameters),
				OrderStatus {
					is_cancelled: true,
					..Default::default()
				},
			)
			.await;

		assert!(matches!(
			seaport.build_fulfill_order_use_case(&order, &[], &[], NOW).await,
			Err(SeaportError::Order(OrderError::Cancelled(_)))
		));
	}

	#[tokio::test]
	async fn test_accepting_a_bid_runs_approvals_then_match() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let bid = foreign_order(
			CreateOrderInput {
				offer: vec![CreateInputItem::erc20(weth(), U256::from(1000))],
				consideration: vec![CreateInputItem::erc721(nft_token(), U256::from(9))],
				fees: vec![Fee {
					recipient: Address::repeat_byte(0xfe),
					basis_points: 250,
				}],
				..Default::default()
			},
			NOW - 10,
			NOW + 10_000,
		);

		let use_case = seaport
			.build_fulfill_order_use_case(&bid, &[], &[], NOW)
			.await
			.unwrap();

		let approvals: Vec<_> = use_case
			.approvals()
			.iter()
			.map(|a| (a.item_type(), a.token()))
			.collect();
		assert_eq!(
			approvals,
			vec![(ItemType::Erc721, nft_token()), (ItemType::Erc20, weth())]
		);
		assert_eq!(use_case.terminal().plan().value, U256::ZERO);
		assert_eq!(use_case.terminal().plan().batch.orders.len(), 2);

		let hash = use_case.execute_all_actions().await.unwrap();

		let submitted = harness.delivery.submitted().await;
		assert_eq!(submitted.len(), 3);
		assert_eq!(
			&submitted[0].data[..4],
			&IERC721::setApprovalForAllCall::SELECTOR
		);
		assert_eq!(&submitted[1].data[..4], &IERC20::approveCall::SELECTOR);
		assert_eq!(
			&submitted[2].data[..4],
			&ISeaport::matchAdvancedOrdersCall::SELECTOR
		);
		assert_eq!(submitted[2].to, Some(seaport.config().seaport.contract_address));
		assert!(harness.delivery.get_receipt(&hash).await.unwrap().success);
	}

	#[tokio::test]
	async fn test_tips_follow_the_original_consideration() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let order = foreign_order(listing(), NOW - 10, NOW + 10_000);
		let tipper = Address::repeat_byte(0x71);
		let tips = vec![CreateInputItem::erc20(weth(), U256::from(10)).with_recipient(tipper)];

		let use_case = seaport
			.build_fulfill_order_use_case(&order, &[], &tips, NOW)
			.await
			.unwrap();

		let plan = use_case.terminal().plan();
		let tipped = &plan.batch.orders[0].parameters;
		assert_eq!(tipped.total_original_consideration_items, 1);
		assert_eq!(tipped.consideration.len(), 2);
		assert_eq!(tipped.consideration[1].token, weth());
		assert_eq!(tipped.consideration[1].recipient, tipper);

		let approvals: Vec<_> = use_case
			.approvals()
			.iter()
			.map(|a| (a.item_type(), a.token()))
			.collect();
		assert_eq!(approvals, vec![(ItemType::Erc20, weth())]);
		assert_eq!(plan.value, U256::from(1000));
	}

	#[tokio::test]
	async fn test_descending_price_is_funded_at_the_current_price() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let auction = CreateOrderInput {
			offer: vec![CreateInputItem::erc721(nft_token(), U256::from(9))],
			consideration: vec![
				CreateInputItem::native(U256::from(1000)).with_end_amount(U256::from(100))
			],
			..Default::default()
		};
		let order = foreign_order(auction, NOW - 100, NOW + 900);

		let use_case = seaport
			.build_fulfill_order_use_case(&order, &[], &[], NOW)
			.await
			.unwrap();

		// 1000 - 900 * 100 / 1000, rather than the lower price 300s later.
		assert_eq!(use_case.terminal().plan().value, U256::from(910));
	}

	#[tokio::test]
	async fn test_unmatched_batch_fails_before_any_submission() {
		let harness = Harness::new();
		let seaport = harness.seaport(SeaportConfig::default());
		let orders = vec![
			foreign_order(
				CreateOrderInput {
					offer: vec![CreateInputItem::erc20(weth(), U256::from(5))],
					consideration: vec![CreateInputItem::native(U256::from(1))],
					..Default::default()
				},
				NOW - 10,
				NOW + 10_000,
			),
			foreign_order(
				CreateOrderInput {
					offer: vec![CreateInputItem::native(U256::from(1))],
					consideration: vec![CreateInputItem::erc20(weth(), U256::from(7))],
					..Default::default()
				},
				NOW - 10,
				NOW + 10_000,
			),
		];

		let err = seaport
			.build_fulfill_use_case(&orders, &[], &seaport_fulfillment::Exclusions::new(), NOW)
			.await
			.unwrap_err();
		assert!(err.to_string().contains(&weth().to_string()));
		assert!(harness.delivery.submitted().await.is_empty());
	}
}
