use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prato_catalog::{Address, Restaurant};
use prato_core::{
    AggregateRoot, CustomerId, DomainError, DomainResult, OrderCode, OrderId, PaymentMethodId,
    RestaurantId,
};
use prato_events::Event;

use crate::item::OrderItem;

/// Order status lifecycle.
///
/// `Delivered` and `Cancelled` are terminal; no transition leaves them.
/// Cancelling a confirmed order is deliberately not supported (the source
/// system only permits cancellation from `Created`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn name(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    fn can_transition_to(self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Created, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Delivered)
                | (OrderStatus::Created, OrderStatus::Cancelled)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Event: OrderConfirmed. Immutable snapshot of the order at emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmed {
    pub order_id: OrderId,
    pub code: Option<OrderCode>,
    pub restaurant_id: RestaurantId,
    pub customer_id: CustomerId,
    pub total: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderCancelled. Immutable snapshot of the order at emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub code: Option<OrderCode>,
    pub restaurant_id: RestaurantId,
    pub customer_id: CustomerId,
    pub total: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderEvent {
    Confirmed(OrderConfirmed),
    Cancelled(OrderCancelled),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Confirmed(_) => "orders.order.confirmed",
            OrderEvent::Cancelled(_) => "orders.order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::Confirmed(e) => e.occurred_at,
            OrderEvent::Cancelled(e) => e.occurred_at,
        }
    }
}

/// Aggregate root: Order.
///
/// Owns its line items and its status; both change only through the
/// behavior methods here. Lifecycle transitions queue domain events into a
/// pending list (an explicit outbox) which the orchestrator drains and
/// publishes only after the storage write has committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    code: Option<OrderCode>,
    subtotal: Decimal,
    delivery_fee: Decimal,
    total: Decimal,
    delivery_address: Address,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    payment_method_id: PaymentMethodId,
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    pending_events: Vec<OrderEvent>,
    version: u64,
}

impl Order {
    /// Create a transient order in `Created` status.
    ///
    /// The creation timestamp is stamped here and never changes; the public
    /// code is assigned separately, immediately before first persistence.
    pub fn new(
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        payment_method_id: PaymentMethodId,
        delivery_address: Address,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            code: None,
            subtotal: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total: Decimal::ZERO,
            delivery_address,
            status: OrderStatus::Created,
            created_at: Utc::now(),
            confirmed_at: None,
            cancelled_at: None,
            delivered_at: None,
            payment_method_id,
            restaurant_id,
            customer_id,
            items,
            pending_events: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn code(&self) -> Option<&OrderCode> {
        self.code.as_ref()
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn delivery_address(&self) -> &Address {
        &self.delivery_address
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub fn payment_method_id(&self) -> PaymentMethodId {
        self.payment_method_id
    }

    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn pending_events(&self) -> &[OrderEvent] {
        &self.pending_events
    }

    /// Recompute every item's line total, sum them into the subtotal, then
    /// derive `total = subtotal + delivery_fee`.
    ///
    /// Must run after any change to items or to the delivery fee, and
    /// before persistence.
    pub fn compute_totals(&mut self) {
        for item in &mut self.items {
            item.compute_line_total();
        }
        self.subtotal = self.items.iter().map(OrderItem::line_total).sum();
        self.total = self.subtotal + self.delivery_fee;
    }

    /// Copy the restaurant's current delivery fee into this order.
    ///
    /// A snapshot, not a live reference: later fee changes at the
    /// restaurant never affect this order.
    pub fn snapshot_delivery_fee(&mut self, restaurant: &Restaurant) {
        self.delivery_fee = restaurant.delivery_fee();
    }

    /// Point every item's owning-order reference at this aggregate, so the
    /// cascading save can resolve foreign keys.
    pub fn link_items_to_self(&mut self) {
        let id = self.id;
        for item in &mut self.items {
            item.attach_to(id);
        }
    }

    /// Assign the public order code. Guarded one-time action: a second call
    /// on an already-coded aggregate fails the whole creation.
    pub fn assign_code(&mut self) -> DomainResult<()> {
        if self.code.is_some() {
            return Err(DomainError::validation(format!(
                "order {} already has a code assigned",
                self.id
            )));
        }
        self.code = Some(OrderCode::generate());
        Ok(())
    }

    /// `Created → Confirmed`: stamp the confirmation time and queue an
    /// `OrderConfirmed` event.
    pub fn confirm(&mut self) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Confirmed)?;
        self.status = OrderStatus::Confirmed;
        let now = Utc::now();
        self.confirmed_at = Some(now);
        self.pending_events
            .push(OrderEvent::Confirmed(self.snapshot_confirmed(now)));
        Ok(())
    }

    /// `Confirmed → Delivered`: stamp the delivery time. No event.
    pub fn deliver(&mut self) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Delivered)?;
        self.status = OrderStatus::Delivered;
        self.delivered_at = Some(Utc::now());
        Ok(())
    }

    /// `Created → Cancelled`: stamp the cancellation time and queue an
    /// `OrderCancelled` event. Cancelling a confirmed order is not
    /// permitted.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Cancelled)?;
        self.status = OrderStatus::Cancelled;
        let now = Utc::now();
        self.cancelled_at = Some(now);
        self.pending_events
            .push(OrderEvent::Cancelled(self.snapshot_cancelled(now)));
        Ok(())
    }

    /// Drain the pending-event outbox, in emission order.
    ///
    /// Called by the orchestrator; events must reach subscribers only after
    /// the aggregate's write has committed. If the write fails, the drained
    /// (or still-queued) events are discarded with the aggregate.
    pub fn take_pending_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Version bump applied by storage after a committed write.
    pub fn mark_persisted(&mut self) {
        self.version += 1;
    }

    fn ensure_transition(&self, target: OrderStatus) -> DomainResult<()> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(DomainError::invalid_state_transition(
            self.code_or_id(),
            self.status.name(),
            target.name(),
        ))
    }

    /// Errors should name the public code; fall back to the internal id for
    /// aggregates that were never issued.
    fn code_or_id(&self) -> String {
        match &self.code {
            Some(code) => code.to_string(),
            None => self.id.to_string(),
        }
    }

    fn snapshot_confirmed(&self, occurred_at: DateTime<Utc>) -> OrderConfirmed {
        OrderConfirmed {
            order_id: self.id,
            code: self.code.clone(),
            restaurant_id: self.restaurant_id,
            customer_id: self.customer_id,
            total: self.total,
            occurred_at,
        }
    }

    fn snapshot_cancelled(&self, occurred_at: DateTime<Utc>) -> OrderCancelled {
        OrderCancelled {
            order_id: self.id,
            code: self.code.clone(),
            restaurant_id: self.restaurant_id,
            customer_id: self.customer_id,
            total: self.total,
            occurred_at,
        }
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prato_core::ProductId;
    use rust_decimal_macros::dec;

    fn test_address() -> Address {
        Address::new("Rua das Flores", "100", "Centro", "Uberlândia", "MG", "38400-000")
    }

    fn priced_item(price: Decimal, quantity: u32) -> OrderItem {
        let mut item = OrderItem::new(ProductId::new(), quantity, None);
        item.set_unit_price(price);
        item
    }

    fn test_order(items: Vec<OrderItem>) -> Order {
        Order::new(
            CustomerId::new(),
            RestaurantId::new(),
            PaymentMethodId::new(),
            test_address(),
            items,
        )
    }

    fn test_restaurant(fee: Decimal) -> Restaurant {
        let mut restaurant = Restaurant::new("Thai Gourmet", fee, test_address()).unwrap();
        restaurant.open_for_orders();
        restaurant
    }

    #[test]
    fn totals_follow_items_and_delivery_fee() {
        let mut order = test_order(vec![
            priced_item(dec!(10.00), 2),
            priced_item(dec!(5.00), 1),
        ]);
        order.snapshot_delivery_fee(&test_restaurant(dec!(3.00)));
        order.compute_totals();

        assert_eq!(order.subtotal(), dec!(25.00));
        assert_eq!(order.total(), dec!(28.00));
        assert_eq!(order.status(), OrderStatus::Created);
    }

    #[test]
    fn delivery_fee_is_a_snapshot_not_a_live_reference() {
        let mut restaurant = test_restaurant(dec!(3.00));
        let mut order = test_order(vec![priced_item(dec!(10.00), 1)]);
        order.snapshot_delivery_fee(&restaurant);
        order.compute_totals();

        // Changing the restaurant later must not touch the issued order.
        restaurant = test_restaurant(dec!(99.00));
        let _ = restaurant;

        assert_eq!(order.delivery_fee(), dec!(3.00));
        assert_eq!(order.total(), dec!(13.00));
    }

    #[test]
    fn link_items_points_every_item_at_the_order() {
        let mut order = test_order(vec![
            priced_item(dec!(1.00), 1),
            priced_item(dec!(2.00), 2),
        ]);
        order.link_items_to_self();

        let id = order.id_typed();
        assert!(order.items().iter().all(|item| item.order_id() == Some(id)));
    }

    #[test]
    fn assign_code_is_one_shot() {
        let mut order = test_order(vec![]);
        order.assign_code().unwrap();
        let code = order.code().cloned().unwrap();

        let err = order.assign_code().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // The original code survives the failed second attempt.
        assert_eq!(order.code(), Some(&code));
    }

    #[test]
    fn confirm_stamps_time_and_queues_event() {
        let mut order = test_order(vec![priced_item(dec!(10.00), 1)]);
        order.assign_code().unwrap();
        order.confirm().unwrap();

        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert!(order.confirmed_at().is_some());
        assert_eq!(order.pending_events().len(), 1);
        match &order.pending_events()[0] {
            OrderEvent::Confirmed(e) => {
                assert_eq!(e.order_id, order.id_typed());
                assert_eq!(e.code.as_ref(), order.code());
            }
            other => panic!("expected OrderConfirmed, got {other:?}"),
        }
    }

    #[test]
    fn cancel_from_created_succeeds_exactly_once() {
        let mut order = test_order(vec![]);
        order.assign_code().unwrap();

        order.cancel().unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert!(order.cancelled_at().is_some());
        assert_eq!(order.pending_events().len(), 1);

        let err = order.cancel().unwrap_err();
        match err {
            DomainError::InvalidStateTransition { from, to, .. } => {
                assert_eq!(from, "cancelled");
                assert_eq!(to, "cancelled");
            }
            other => panic!("expected InvalidStateTransition, got {other:?}"),
        }
        // Failed transition queues nothing.
        assert_eq!(order.pending_events().len(), 1);
    }

    #[test]
    fn cancel_after_confirm_is_rejected() {
        let mut order = test_order(vec![]);
        order.assign_code().unwrap();
        order.confirm().unwrap();

        let err = order.cancel().unwrap_err();
        match err {
            DomainError::InvalidStateTransition { code, from, to } => {
                assert_eq!(code, order.code().unwrap().to_string());
                assert_eq!(from, "confirmed");
                assert_eq!(to, "cancelled");
            }
            other => panic!("expected InvalidStateTransition, got {other:?}"),
        }
        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert!(order.cancelled_at().is_none());
    }

    #[test]
    fn deliver_requires_confirmation_first() {
        let mut order = test_order(vec![]);
        order.assign_code().unwrap();

        assert!(matches!(
            order.deliver().unwrap_err(),
            DomainError::InvalidStateTransition { .. }
        ));

        order.confirm().unwrap();
        order.deliver().unwrap();
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.delivered_at().is_some());

        // Delivered is terminal.
        assert!(matches!(
            order.confirm().unwrap_err(),
            DomainError::InvalidStateTransition { .. }
        ));
    }

    #[test]
    fn deliver_queues_no_event() {
        let mut order = test_order(vec![]);
        order.assign_code().unwrap();
        order.confirm().unwrap();
        let queued_after_confirm = order.pending_events().len();

        order.deliver().unwrap();
        assert_eq!(order.pending_events().len(), queued_after_confirm);
    }

    #[test]
    fn take_pending_events_drains_in_emission_order() {
        let mut order = test_order(vec![]);
        order.assign_code().unwrap();
        order.confirm().unwrap();

        let events = order.take_pending_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], OrderEvent::Confirmed(_)));
        assert!(order.pending_events().is_empty());
        assert!(order.take_pending_events().is_empty());
    }

    #[test]
    fn confirmed_event_payload_serializes_with_stable_fields() {
        let mut order = test_order(vec![priced_item(dec!(10.00), 2)]);
        order.compute_totals();
        order.assign_code().unwrap();
        order.confirm().unwrap();

        let json = serde_json::to_value(&order.pending_events()[0]).unwrap();
        let payload = &json["Confirmed"];
        assert_eq!(payload["code"], order.code().unwrap().to_string());
        assert_eq!(payload["total"], "20.00");
        assert!(payload["occurred_at"].is_string());
    }

    #[test]
    fn failed_transition_leaves_aggregate_unmodified() {
        let mut order = test_order(vec![priced_item(dec!(10.00), 1)]);
        order.assign_code().unwrap();
        order.confirm().unwrap();
        let before = order.clone();

        let _ = order.cancel().unwrap_err();
        assert_eq!(order, before);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn money() -> impl Strategy<Value = Decimal> {
            // Exact two-decimal amounts; no rounding drift expected.
            (0i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        proptest! {
            /// Property: subtotal is exactly the sum of item line totals and
            /// total = subtotal + delivery fee, with exact decimal inputs.
            #[test]
            fn totals_are_exact(
                lines in proptest::collection::vec((money(), 0u32..50), 0..12),
                fee in money(),
            ) {
                let items: Vec<OrderItem> = lines
                    .iter()
                    .map(|(price, qty)| priced_item(*price, *qty))
                    .collect();
                let mut restaurant =
                    Restaurant::new("Thai Gourmet", fee, test_address()).unwrap();
                restaurant.open_for_orders();

                let mut order = test_order(items);
                order.snapshot_delivery_fee(&restaurant);
                order.compute_totals();

                let expected_subtotal: Decimal = lines
                    .iter()
                    .map(|(price, qty)| *price * Decimal::from(*qty))
                    .sum();
                prop_assert_eq!(order.subtotal(), expected_subtotal);
                prop_assert_eq!(order.total(), expected_subtotal + fee);
            }

            /// Property: recomputation is idempotent.
            #[test]
            fn recompute_is_idempotent(
                lines in proptest::collection::vec((money(), 0u32..50), 0..12),
                fee in money(),
            ) {
                let items: Vec<OrderItem> = lines
                    .iter()
                    .map(|(price, qty)| priced_item(*price, *qty))
                    .collect();
                let mut restaurant =
                    Restaurant::new("Thai Gourmet", fee, test_address()).unwrap();
                restaurant.open_for_orders();

                let mut order = test_order(items);
                order.snapshot_delivery_fee(&restaurant);
                order.compute_totals();
                let first = (order.subtotal(), order.total());
                order.compute_totals();
                prop_assert_eq!((order.subtotal(), order.total()), first);
            }
        }
    }
}
