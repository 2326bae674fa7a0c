//! Order issuance orchestration.
//!
//! Composes the aggregate, the catalog lookups, the repository, and the
//! event channel. The ordering inside every mutating operation is fixed:
//! item-total recomputation happens-before totals recomputation,
//! happens-before persistence, happens-before event publication.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use prato_catalog::{
    Address, CustomerLookup, PaymentMethodLookup, Product, ProductLookup, Restaurant,
    RestaurantLookup,
};
use prato_core::{
    CustomerId, DomainError, DomainResult, OrderCode, PaymentMethodId, ProductId, RestaurantId,
};
use prato_events::EventChannel;

use crate::filter::{OrderFilter, translate};
use crate::item::OrderItem;
use crate::order::{Order, OrderEvent};
use crate::repository::{OrderRepository, Page, PageRequest};

/// Raw order submission: references plus quantities, nothing trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInput {
    pub restaurant_id: RestaurantId,
    pub payment_method_id: PaymentMethodId,
    pub delivery_address: Address,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
    pub note: Option<String>,
}

/// Orchestrator for order issuance and lifecycle transitions.
pub struct OrderIssuanceService {
    orders: Arc<dyn OrderRepository>,
    restaurants: Arc<dyn RestaurantLookup>,
    products: Arc<dyn ProductLookup>,
    payment_methods: Arc<dyn PaymentMethodLookup>,
    customers: Arc<dyn CustomerLookup>,
    channel: Arc<EventChannel<OrderEvent>>,
}

impl OrderIssuanceService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        restaurants: Arc<dyn RestaurantLookup>,
        products: Arc<dyn ProductLookup>,
        payment_methods: Arc<dyn PaymentMethodLookup>,
        customers: Arc<dyn CustomerLookup>,
        channel: Arc<EventChannel<OrderEvent>>,
    ) -> Self {
        Self {
            orders,
            restaurants,
            products,
            payment_methods,
            customers,
            channel,
        }
    }

    /// Issue a new order on behalf of `customer_id`.
    ///
    /// Resolves and validates every referenced entity, builds the
    /// aggregate, persists it atomically, and only then publishes whatever
    /// events the lifecycle queued. A missing reference surfaces as
    /// `ReferenceNotFound` — a business-rule violation, not a raw
    /// not-found fault.
    pub fn issue(&self, input: OrderInput, customer_id: CustomerId) -> DomainResult<Order> {
        self.customers
            .find_customer(customer_id)?
            .ok_or_else(|| DomainError::reference_not_found("customer", customer_id))?;

        let restaurant = self.resolve_restaurant(&input)?;
        self.ensure_payment_method_accepted(&input, &restaurant)?;
        let items = self.resolve_items(&input, &restaurant)?;

        let mut order = Order::new(
            customer_id,
            restaurant.id_typed(),
            input.payment_method_id,
            input.delivery_address,
            items,
        );
        order.snapshot_delivery_fee(&restaurant);
        order.link_items_to_self();
        order.compute_totals();
        order.assign_code()?;

        let persisted = self.save_and_publish(order)?;
        tracing::info!(
            code = %persisted.code().map(ToString::to_string).unwrap_or_default(),
            total = %persisted.total(),
            "order issued"
        );
        Ok(persisted)
    }

    /// Confirm the order with the given code, persist, publish.
    pub fn confirm(&self, code: &OrderCode) -> DomainResult<Order> {
        let mut order = self.find_by_code_or_fail(code)?;
        order.confirm()?;
        let persisted = self.save_and_publish(order)?;
        tracing::info!(code = %code, "order confirmed");
        Ok(persisted)
    }

    /// Mark the order with the given code as delivered.
    pub fn deliver(&self, code: &OrderCode) -> DomainResult<Order> {
        let mut order = self.find_by_code_or_fail(code)?;
        order.deliver()?;
        let persisted = self.save_and_publish(order)?;
        tracing::info!(code = %code, "order delivered");
        Ok(persisted)
    }

    /// Cancel the order with the given code, persist, publish.
    pub fn cancel(&self, code: &OrderCode) -> DomainResult<Order> {
        let mut order = self.find_by_code_or_fail(code)?;
        order.cancel()?;
        let persisted = self.save_and_publish(order)?;
        tracing::info!(code = %code, "order cancelled");
        Ok(persisted)
    }

    /// Look an order up by code; absence is `OrderNotFound`.
    pub fn find_by_code_or_fail(&self, code: &OrderCode) -> DomainResult<Order> {
        self.orders
            .find_by_code(code)?
            .ok_or_else(|| DomainError::order_not_found(code))
    }

    /// Translate a client filter + page request and run the paged query.
    pub fn search(&self, filter: &OrderFilter, page: &PageRequest) -> DomainResult<Page<Order>> {
        let (predicate, ordering) = translate(filter, page);
        self.orders.query(&predicate, &ordering, page)
    }

    fn resolve_restaurant(&self, input: &OrderInput) -> DomainResult<Restaurant> {
        let restaurant = self
            .restaurants
            .find_restaurant(input.restaurant_id)?
            .ok_or_else(|| DomainError::reference_not_found("restaurant", input.restaurant_id))?;
        if !restaurant.can_take_orders() {
            return Err(DomainError::validation(format!(
                "restaurant {} is not accepting orders",
                restaurant.name()
            )));
        }
        Ok(restaurant)
    }

    fn ensure_payment_method_accepted(
        &self,
        input: &OrderInput,
        restaurant: &Restaurant,
    ) -> DomainResult<()> {
        let payment_method = self
            .payment_methods
            .find_payment_method(input.payment_method_id)?
            .ok_or_else(|| {
                DomainError::reference_not_found("payment method", input.payment_method_id)
            })?;
        if !restaurant.accepts_payment_method(payment_method.id_typed()) {
            return Err(DomainError::validation(format!(
                "payment method '{}' is not accepted by restaurant {}",
                payment_method.description(),
                restaurant.name()
            )));
        }
        Ok(())
    }

    /// Resolve each input line against the catalog. Unit prices come from
    /// the resolved products, never from the client.
    fn resolve_items(
        &self,
        input: &OrderInput,
        restaurant: &Restaurant,
    ) -> DomainResult<Vec<OrderItem>> {
        if input.items.is_empty() {
            return Err(DomainError::validation(
                "an order must have at least one item",
            ));
        }

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let product = self.resolve_product(line.product_id, restaurant)?;
            let mut item = OrderItem::new(product.id_typed(), line.quantity, line.note.clone());
            item.set_unit_price(product.price());
            items.push(item);
        }
        Ok(items)
    }

    fn resolve_product(
        &self,
        product_id: ProductId,
        restaurant: &Restaurant,
    ) -> DomainResult<Product> {
        let product = self
            .products
            .find_product(product_id)?
            .ok_or_else(|| DomainError::reference_not_found("product", product_id))?;
        if product.restaurant_id() != restaurant.id_typed() {
            return Err(DomainError::validation(format!(
                "product {} does not belong to restaurant {}",
                product.name(),
                restaurant.name()
            )));
        }
        if !product.is_active() {
            return Err(DomainError::validation(format!(
                "product {} is not available",
                product.name()
            )));
        }
        Ok(product)
    }

    /// Drain the outbox, commit the write, and only then publish.
    ///
    /// If the write fails, the drained events go down with the aggregate —
    /// they are never delivered. Subscriber outcomes are not reported back:
    /// a failing subscriber cannot roll back a committed order.
    fn save_and_publish(&self, mut order: Order) -> DomainResult<Order> {
        let events = order.take_pending_events();
        let persisted = self.orders.save(order)?;
        for event in &events {
            self.channel.publish(event);
        }
        Ok(persisted)
    }
}
