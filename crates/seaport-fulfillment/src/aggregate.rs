//! Fulfillment aggregation.
//!
//! Items of a batch are grouped by (kind, token, identifier). Within a group,
//! legs whose amounts move are walked one active window at a time, drawing
//! fixed-amount legs from a shared pool when a window needs them; the fixed
//! legs left over are walked last. Each walk pairs offer legs with
//! consideration legs in batch order:
//!
//! - the next leg comes from whichever side has the smaller running start
//!   total, the offer side on ties;
//! - a fulfillment closes as soon as both running start totals and both
//!   running end totals are equal;
//! - zero-amount legs left over join an earlier fulfillment of their group
//!   with the same offerer or recipient.
//!
//! The match entry point requires every offer component of a fulfillment to
//! share offerer and conduit, and every consideration component to share a
//! recipient. A closed fulfillment that mixes them is split: legs with equal
//! amounts are paired first, the rest are paired one to one along a
//! staircase, so an item may then be referenced by more than one
//! fulfillment and is spent progressively.

use crate::error::FulfillmentError;
use alloy::primitives::{Address, B256, U256};
use seaport_types::{
	ConsiderationItem, Fulfillment, FulfillmentComponent, Item, ItemType, OfferItem,
	OrderParameters, Side,
};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Orders and single items to leave out of aggregation.
///
/// Excluded items stay in the batch (pointers are batch-relative) but are
/// referenced by no fulfillment.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
	orders: HashSet<usize>,
	items: HashSet<(usize, Side, usize)>,
}

impl Exclusions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn exclude_order(mut self, order_index: usize) -> Self {
		self.orders.insert(order_index);
		self
	}

	pub fn exclude_item(mut self, order_index: usize, side: Side, item_index: usize) -> Self {
		self.items.insert((order_index, side, item_index));
		self
	}

	pub fn contains(&self, order_index: usize, side: Side, item_index: usize) -> bool {
		self.orders.contains(&order_index) || self.items.contains(&(order_index, side, item_index))
	}
}

/// Result of aggregating a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedFulfillments {
	/// Balanced offer/consideration pairs, grouped in first-appearance order.
	pub fulfillments: Vec<Fulfillment>,
	/// Offer side of each fulfillment, parallel to `fulfillments`.
	pub offer_fulfillments: Vec<Vec<FulfillmentComponent>>,
	/// Consideration side of each fulfillment, parallel to `fulfillments`.
	pub consideration_fulfillments: Vec<Vec<FulfillmentComponent>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GroupKey {
	item_type: ItemType,
	token: Address,
	identifier: U256,
}

/// Offerer and conduit key of an offer leg, recipient of a consideration leg.
type Party = (Address, B256);

type Window = (u64, u64);

#[derive(Debug, Clone, Copy)]
struct Leg {
	component: FulfillmentComponent,
	start_amount: U256,
	end_amount: U256,
	/// Active window, set only when the amount moves over it.
	schedule: Option<Window>,
	party: Party,
}

impl Leg {
	fn new<T: Item>(
		order_index: usize,
		item_index: usize,
		item: &T,
		order: &OrderParameters,
		party: Party,
	) -> Self {
		Self {
			component: FulfillmentComponent::new(order_index, item_index),
			start_amount: item.start_amount(),
			end_amount: item.end_amount(),
			schedule: item
				.is_variable()
				.then_some((order.start_time, order.end_time)),
			party,
		}
	}

	fn offer(order_index: usize, item_index: usize, item: &OfferItem, order: &OrderParameters) -> Self {
		Self::new(order_index, item_index, item, order, (order.offerer, order.conduit_key))
	}

	fn consideration(
		order_index: usize,
		item_index: usize,
		item: &ConsiderationItem,
		order: &OrderParameters,
	) -> Self {
		Self::new(order_index, item_index, item, order, (item.recipient, B256::ZERO))
	}
}

#[derive(Debug, Default)]
struct Group {
	offer: Vec<Leg>,
	consideration: Vec<Leg>,
}

impl Group {
	fn push(&mut self, side: Side, leg: Leg) {
		match side {
			Side::Offer => self.offer.push(leg),
			Side::Consideration => self.consideration.push(leg),
		}
	}

	fn is_empty(&self) -> bool {
		self.offer.is_empty() && self.consideration.is_empty()
	}

	fn is_two_sided(&self) -> bool {
		!self.offer.is_empty() && !self.consideration.is_empty()
	}
}

/// Fixed-amount legs not yet placed, in batch order.
#[derive(Debug, Default)]
struct Pool {
	offer: VecDeque<Leg>,
	consideration: VecDeque<Leg>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
	start: U256,
	end: U256,
}

impl Totals {
	fn add(&mut self, leg: &Leg) {
		self.start = self.start.saturating_add(leg.start_amount);
		self.end = self.end.saturating_add(leg.end_amount);
	}
}

#[derive(Debug)]
struct Matched {
	fulfillment: Fulfillment,
	offerer: Party,
	recipient: Party,
}

impl Matched {
	fn new(offer: &[Leg], consideration: &[Leg]) -> Self {
		Self {
			fulfillment: Fulfillment {
				offer_components: offer.iter().map(|leg| leg.component).collect(),
				consideration_components: consideration.iter().map(|leg| leg.component).collect(),
			},
			offerer: offer.first().map(|leg| leg.party).unwrap_or_default(),
			recipient: consideration.first().map(|leg| leg.party).unwrap_or_default(),
		}
	}
}

/// Aggregates the items of `orders` into balanced fulfillments.
///
/// Criteria items must already be resolved. Every item not excluded is
/// referenced by at least one fulfillment, and by exactly one unless its
/// fulfillment had to be split between parties.
pub fn aggregate(
	orders: &[OrderParameters],
	exclusions: &Exclusions,
) -> Result<AggregatedFulfillments, FulfillmentError> {
	let mut index: HashMap<GroupKey, usize> = HashMap::new();
	let mut groups: Vec<(GroupKey, Group)> = Vec::new();

	for (order_index, order) in orders.iter().enumerate() {
		for (item_index, item) in order.offer.iter().enumerate() {
			if exclusions.contains(order_index, Side::Offer, item_index) {
				continue;
			}
			let key = group_key(item, order_index, Side::Offer, item_index)?;
			let slot = group_slot(&mut index, &mut groups, key);
			groups[slot]
				.1
				.offer
				.push(Leg::offer(order_index, item_index, item, order));
		}
		for (item_index, item) in order.consideration.iter().enumerate() {
			if exclusions.contains(order_index, Side::Consideration, item_index) {
				continue;
			}
			let key = group_key(item, order_index, Side::Consideration, item_index)?;
			let slot = group_slot(&mut index, &mut groups, key);
			groups[slot]
				.1
				.consideration
				.push(Leg::consideration(order_index, item_index, item, order));
		}
	}

	let mut fulfillments = Vec::new();
	for (key, group) in &groups {
		let before = fulfillments.len();
		match_group(key, group, &mut fulfillments)?;
		debug!(
			item_type = %key.item_type,
			token = %key.token,
			identifier = %key.identifier,
			offer_legs = group.offer.len(),
			consideration_legs = group.consideration.len(),
			fulfillments = fulfillments.len() - before,
			"Aggregated item group"
		);
	}

	Ok(AggregatedFulfillments {
		offer_fulfillments: fulfillments
			.iter()
			.map(|f| f.offer_components.clone())
			.collect(),
		consideration_fulfillments: fulfillments
			.iter()
			.map(|f| f.consideration_components.clone())
			.collect(),
		fulfillments,
	})
}

fn group_key<T: Item>(
	item: &T,
	order_index: usize,
	side: Side,
	item_index: usize,
) -> Result<GroupKey, FulfillmentError> {
	if item.item_type().is_criteria() {
		return Err(FulfillmentError::UnresolvedCriteria {
			order_index,
			side,
			item_index,
		});
	}
	Ok(GroupKey {
		item_type: item.item_type(),
		token: item.token(),
		identifier: item.identifier_or_criteria(),
	})
}

fn group_slot(
	index: &mut HashMap<GroupKey, usize>,
	groups: &mut Vec<(GroupKey, Group)>,
	key: GroupKey,
) -> usize {
	*index.entry(key).or_insert_with(|| {
		groups.push((key, Group::default()));
		groups.len() - 1
	})
}

fn match_group(
	key: &GroupKey,
	group: &Group,
	out: &mut Vec<Fulfillment>,
) -> Result<(), FulfillmentError> {
	let mut offered = Totals::default();
	let mut required = Totals::default();
	for leg in &group.offer {
		offered.add(leg);
	}
	for leg in &group.consideration {
		required.add(leg);
	}
	if offered != required {
		let (offered, required) = if offered.start != required.start {
			(offered.start, required.start)
		} else {
			(offered.end, required.end)
		};
		return Err(FulfillmentError::UnmatchedItems {
			item_type: key.item_type,
			token: key.token,
			identifier: key.identifier,
			offered,
			required,
		});
	}

	let mut windows: Vec<(Window, Group)> = Vec::new();
	let mut pool = Pool::default();
	let sides = group
		.offer
		.iter()
		.map(|leg| (Side::Offer, leg))
		.chain(group.consideration.iter().map(|leg| (Side::Consideration, leg)));
	for (side, leg) in sides {
		match leg.schedule {
			Some(window) => match windows.iter_mut().find(|(w, _)| *w == window) {
				Some((_, bucket)) => bucket.push(side, *leg),
				None => {
					let mut bucket = Group::default();
					bucket.push(side, *leg);
					windows.push((window, bucket));
				}
			},
			None => match side {
				Side::Offer => pool.offer.push_back(*leg),
				Side::Consideration => pool.consideration.push_back(*leg),
			},
		}
	}

	let mut matched = Vec::new();
	let mut leftovers = Group::default();
	for (window, bucket) in &windows {
		walk(key, Some(*window), bucket, &mut pool, &mut matched, &mut leftovers)?;
	}
	let fixed = Group {
		offer: pool.offer.drain(..).collect(),
		consideration: pool.consideration.drain(..).collect(),
	};
	walk(key, None, &fixed, &mut pool, &mut matched, &mut leftovers)?;

	for (side, leg) in leftovers
		.offer
		.iter()
		.map(|leg| (Side::Offer, leg))
		.chain(leftovers.consideration.iter().map(|leg| (Side::Consideration, leg)))
	{
		let home = matched.iter_mut().rev().find(|m| match side {
			Side::Offer => m.offerer == leg.party,
			Side::Consideration => m.recipient == leg.party,
		});
		let Some(home) = home else {
			// Nothing to attach a leftover zero-amount leg to.
			return Err(FulfillmentError::UnmatchedItems {
				item_type: key.item_type,
				token: key.token,
				identifier: key.identifier,
				offered: offered.start,
				required: required.start,
			});
		};
		match side {
			Side::Offer => home.fulfillment.offer_components.push(leg.component),
			Side::Consideration => home.fulfillment.consideration_components.push(leg.component),
		}
	}

	out.extend(matched.into_iter().map(|m| m.fulfillment));
	Ok(())
}

fn next_leg(own: &[Leg], cursor: &mut usize, pool: &mut VecDeque<Leg>) -> Option<Leg> {
	match own.get(*cursor) {
		Some(leg) => {
			*cursor += 1;
			Some(*leg)
		}
		None => pool.pop_front(),
	}
}

/// Walks the legs of one window (`None` for fixed legs), taking fixed legs
/// from `pool` once a side of `own` runs out.
fn walk(
	key: &GroupKey,
	window: Option<Window>,
	own: &Group,
	pool: &mut Pool,
	matched: &mut Vec<Matched>,
	leftovers: &mut Group,
) -> Result<(), FulfillmentError> {
	let mut offered = Totals::default();
	let mut required = Totals::default();
	let mut pending = Group::default();
	let (mut i, mut j) = (0, 0);

	loop {
		if pending.is_empty() && i == own.offer.len() && j == own.consideration.len() {
			break;
		}
		let has_offer = i < own.offer.len() || !pool.offer.is_empty();
		let has_consideration = j < own.consideration.len() || !pool.consideration.is_empty();
		if !has_offer && !has_consideration {
			break;
		}

		let take_offer = !has_consideration || (has_offer && offered.start <= required.start);
		if take_offer {
			if let Some(leg) = next_leg(&own.offer, &mut i, &mut pool.offer) {
				offered.add(&leg);
				pending.offer.push(leg);
			}
		} else if let Some(leg) = next_leg(&own.consideration, &mut j, &mut pool.consideration) {
			required.add(&leg);
			pending.consideration.push(leg);
		}

		if offered == required && pending.is_two_sided() {
			close(key, std::mem::take(&mut pending), matched, leftovers)?;
		}
	}

	if pending.is_empty() {
		return Ok(());
	}
	if offered == required {
		leftovers.offer.append(&mut pending.offer);
		leftovers.consideration.append(&mut pending.consideration);
		return Ok(());
	}
	Err(match window {
		Some(_) => FulfillmentError::InconsistentAmountSchedule {
			item_type: key.item_type,
			token: key.token,
			identifier: key.identifier,
		},
		None => FulfillmentError::UnmatchedItems {
			item_type: key.item_type,
			token: key.token,
			identifier: key.identifier,
			offered: offered.start,
			required: required.start,
		},
	})
}

/// Records a balanced set of legs, splitting it when either side spans
/// more than one party.
fn close(
	key: &GroupKey,
	pending: Group,
	matched: &mut Vec<Matched>,
	leftovers: &mut Group,
) -> Result<(), FulfillmentError> {
	let single = |legs: &[Leg]| legs.iter().all(|leg| leg.party == legs[0].party);
	if single(&pending.offer) && single(&pending.consideration) {
		matched.push(Matched::new(&pending.offer, &pending.consideration));
		return Ok(());
	}

	let mut offer = Vec::new();
	let mut consideration = pending.consideration;
	for leg in pending.offer {
		let twin = consideration
			.iter()
			.position(|c| c.start_amount == leg.start_amount && c.end_amount == leg.end_amount);
		match twin {
			Some(position) => {
				let twin = consideration.remove(position);
				matched.push(Matched::new(&[leg], &[twin]));
			}
			None => offer.push(leg),
		}
	}

	// The pairing must not depend on when the match is mined.
	let at_start = staircase(&offer, &consideration, |leg| leg.start_amount);
	if staircase(&offer, &consideration, |leg| leg.end_amount) != at_start {
		return Err(FulfillmentError::InconsistentAmountSchedule {
			item_type: key.item_type,
			token: key.token,
			identifier: key.identifier,
		});
	}

	let (pairs, next_offer, next_consideration) = at_start;
	for (i, j) in pairs {
		matched.push(Matched::new(&[offer[i]], &[consideration[j]]));
	}
	leftovers.offer.extend_from_slice(&offer[next_offer..]);
	leftovers
		.consideration
		.extend_from_slice(&consideration[next_consideration..]);
	Ok(())
}

/// One-to-one pairs that spend `offer` into `consideration` in order, plus
/// the first unpaired index on each side.
fn staircase(
	offer: &[Leg],
	consideration: &[Leg],
	amount: impl Fn(&Leg) -> U256,
) -> (Vec<(usize, usize)>, usize, usize) {
	let mut pairs = Vec::new();
	let (mut i, mut j) = (0, 0);
	let (mut offered, mut required) = (U256::ZERO, U256::ZERO);

	while i < offer.len() && j < consideration.len() {
		pairs.push((i, j));
		let next_offered = offered.saturating_add(amount(&offer[i]));
		let next_required = required.saturating_add(amount(&consideration[j]));
		match next_offered.cmp(&next_required) {
			std::cmp::Ordering::Less => {
				offered = next_offered;
				i += 1;
			}
			std::cmp::Ordering::Greater => {
				required = next_required;
				j += 1;
			}
			std::cmp::Ordering::Equal => {
				offered = next_offered;
				required = next_required;
				i += 1;
				j += 1;
			}
		}
	}
	(pairs, i, j)
}
