//! Solidity bindings for the settlement contract and the token standards it
//! moves.
//!
//! The struct layouts double as the EIP-712 type definitions: the struct and
//! field names below must stay identical to the contract's, otherwise the
//! computed type hashes diverge.

use alloy::primitives::{aliases::U120, B256, U256};
use alloy::sol;

use crate::{fulfillment, item, order};

sol! {
	#[derive(Debug, PartialEq, Eq)]
	struct OfferItem {
		uint8 itemType;
		address token;
		uint256 identifierOrCriteria;
		uint256 startAmount;
		uint256 endAmount;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct ConsiderationItem {
		uint8 itemType;
		address token;
		uint256 identifierOrCriteria;
		uint256 startAmount;
		uint256 endAmount;
		address recipient;
	}

	/// Signed by the offerer. `nonce` is the offerer's nonce at signing time.
	#[derive(Debug, PartialEq, Eq)]
	struct OrderComponents {
		address offerer;
		address zone;
		OfferItem[] offer;
		ConsiderationItem[] consideration;
		uint8 orderType;
		uint256 startTime;
		uint256 endTime;
		bytes32 zoneHash;
		uint256 salt;
		bytes32 conduitKey;
		uint256 nonce;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct OrderParameters {
		address offerer;
		address zone;
		OfferItem[] offer;
		ConsiderationItem[] consideration;
		uint8 orderType;
		uint256 startTime;
		uint256 endTime;
		bytes32 zoneHash;
		uint256 salt;
		bytes32 conduitKey;
		uint256 totalOriginalConsiderationItems;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct Order {
		OrderParameters parameters;
		bytes signature;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct AdvancedOrder {
		OrderParameters parameters;
		uint120 numerator;
		uint120 denominator;
		bytes signature;
		bytes extraData;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct CriteriaResolver {
		uint256 orderIndex;
		uint8 side;
		uint256 index;
		uint256 identifier;
		bytes32[] criteriaProof;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct FulfillmentComponent {
		uint256 orderIndex;
		uint256 itemIndex;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct Fulfillment {
		FulfillmentComponent[] offerComponents;
		FulfillmentComponent[] considerationComponents;
	}

	struct ReceivedItem {
		uint8 itemType;
		address token;
		uint256 identifier;
		uint256 amount;
		address recipient;
	}

	struct Execution {
		ReceivedItem item;
		address offerer;
		bytes32 conduitKey;
	}

	interface ISeaport {
		function matchAdvancedOrders(
			AdvancedOrder[] orders,
			CriteriaResolver[] criteriaResolvers,
			Fulfillment[] fulfillments
		) external payable returns (Execution[] executions);

		function validate(Order[] orders) external returns (bool validated);

		function cancel(OrderComponents[] orders) external returns (bool cancelled);

		function incrementNonce() external returns (uint256 newNonce);

		function getNonce(address offerer) external view returns (uint256 nonce);

		function getOrderStatus(bytes32 orderHash)
			external
			view
			returns (bool isValidated, bool isCancelled, uint256 totalFilled, uint256 totalSize);
	}

	interface IERC20 {
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 amount) external returns (bool);
	}

	/// Operator approval shared by ERC-721 and ERC-1155.
	interface IERC721 {
		function isApprovedForAll(address owner, address operator) external view returns (bool);
		function setApprovalForAll(address operator, bool approved) external;
	}
}

impl From<&item::OfferItem> for OfferItem {
	fn from(item: &item::OfferItem) -> Self {
		OfferItem {
			itemType: item.item_type.as_u8(),
			token: item.token,
			identifierOrCriteria: item.identifier_or_criteria,
			startAmount: item.start_amount,
			endAmount: item.end_amount,
		}
	}
}

impl From<&item::ConsiderationItem> for ConsiderationItem {
	fn from(item: &item::ConsiderationItem) -> Self {
		ConsiderationItem {
			itemType: item.item_type.as_u8(),
			token: item.token,
			identifierOrCriteria: item.identifier_or_criteria,
			startAmount: item.start_amount,
			endAmount: item.end_amount,
			recipient: item.recipient,
		}
	}
}

impl From<&order::OrderComponents> for OrderComponents {
	fn from(components: &order::OrderComponents) -> Self {
		let parameters = &components.parameters;
		OrderComponents {
			offerer: parameters.offerer,
			zone: parameters.zone,
			offer: parameters.offer.iter().map(Into::into).collect(),
			consideration: parameters.consideration.iter().map(Into::into).collect(),
			orderType: parameters.order_type.as_u8(),
			startTime: U256::from(parameters.start_time),
			endTime: U256::from(parameters.end_time),
			zoneHash: parameters.zone_hash,
			salt: parameters.salt,
			conduitKey: parameters.conduit_key,
			nonce: components.nonce,
		}
	}
}

impl From<&order::OrderParameters> for OrderParameters {
	fn from(parameters: &order::OrderParameters) -> Self {
		OrderParameters {
			offerer: parameters.offerer,
			zone: parameters.zone,
			offer: parameters.offer.iter().map(Into::into).collect(),
			consideration: parameters.consideration.iter().map(Into::into).collect(),
			orderType: parameters.order_type.as_u8(),
			startTime: U256::from(parameters.start_time),
			endTime: U256::from(parameters.end_time),
			zoneHash: parameters.zone_hash,
			salt: parameters.salt,
			conduitKey: parameters.conduit_key,
			totalOriginalConsiderationItems: U256::from(
				parameters.total_original_consideration_items,
			),
		}
	}
}

impl From<&order::Order> for Order {
	fn from(order: &order::Order) -> Self {
		Order {
			parameters: (&order.parameters).into(),
			signature: order.signature.clone(),
		}
	}
}

impl AdvancedOrder {
	/// Wraps an order for a full (1/1) fill with no extra data.
	pub fn full_fill(order: &order::Order) -> Self {
		AdvancedOrder {
			parameters: (&order.parameters).into(),
			numerator: U120::from(1u8),
			denominator: U120::from(1u8),
			signature: order.signature.clone(),
			extraData: Default::default(),
		}
	}
}

impl From<&fulfillment::FulfillmentComponent> for FulfillmentComponent {
	fn from(component: &fulfillment::FulfillmentComponent) -> Self {
		FulfillmentComponent {
			orderIndex: U256::from(component.order_index),
			itemIndex: U256::from(component.item_index),
		}
	}
}

impl From<&fulfillment::Fulfillment> for Fulfillment {
	fn from(fulfillment: &fulfillment::Fulfillment) -> Self {
		Fulfillment {
			offerComponents: fulfillment.offer_components.iter().map(Into::into).collect(),
			considerationComponents: fulfillment
				.consideration_components
				.iter()
				.map(Into::into)
				.collect(),
		}
	}
}

impl CriteriaResolver {
	pub fn new(
		order_index: usize,
		side: item::Side,
		index: usize,
		identifier: U256,
		criteria_proof: Vec<B256>,
	) -> Self {
		CriteriaResolver {
			orderIndex: U256::from(order_index),
			side: side as u8,
			index: U256::from(index),
			identifier,
			criteriaProof: criteria_proof,
		}
	}
}
