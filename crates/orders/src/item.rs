use rust_decimal::Decimal;

use prato_core::{Entity, OrderId, OrderItemId, ProductId};

/// A line entry of an order: product, quantity, unit price, note.
///
/// The line total is a derived field: it is always recomputed from quantity
/// and unit price on demand and never edited independently. The owning-order
/// reference is assigned by the aggregate before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    id: OrderItemId,
    order_id: Option<OrderId>,
    product_id: ProductId,
    quantity: Option<u32>,
    unit_price: Option<Decimal>,
    line_total: Decimal,
    note: Option<String>,
}

impl OrderItem {
    /// Create an item without a unit price yet; issuance snapshots the
    /// price from the resolved product.
    pub fn new(product_id: ProductId, quantity: u32, note: Option<String>) -> Self {
        Self {
            id: OrderItemId::new(),
            order_id: None,
            product_id,
            quantity: Some(quantity),
            unit_price: None,
            line_total: Decimal::ZERO,
            note,
        }
    }

    pub fn id_typed(&self) -> OrderItemId {
        self.id
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }

    pub fn unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    pub fn line_total(&self) -> Decimal {
        self.line_total
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn set_unit_price(&mut self, price: Decimal) {
        self.unit_price = Some(price);
    }

    /// Recompute `line_total = unit_price * quantity`.
    ///
    /// A missing unit price or quantity counts as zero; this never fails on
    /// absent values. Pure and idempotent.
    pub fn compute_line_total(&mut self) {
        let unit_price = self.unit_price.unwrap_or(Decimal::ZERO);
        let quantity = self.quantity.map(Decimal::from).unwrap_or(Decimal::ZERO);
        self.line_total = unit_price * quantity;
    }

    pub(crate) fn attach_to(&mut self, order_id: OrderId) {
        self.order_id = Some(order_id);
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
