use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prato_core::{DomainError, DomainResult, Entity, ProductId, RestaurantId};

/// Entity: a product on a restaurant's menu.
///
/// The price here is the trusted unit price: issuance snapshots it onto the
/// order item, never a client-supplied amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    restaurant_id: RestaurantId,
    name: String,
    description: Option<String>,
    price: Decimal,
    active: bool,
}

impl Product {
    pub fn new(
        restaurant_id: RestaurantId,
        name: impl Into<String>,
        price: Decimal,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::validation("product price cannot be negative"));
        }

        Ok(Self {
            id: ProductId::new(),
            restaurant_id,
            name,
            description: None,
            price,
            active: true,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_product_is_active() {
        let product = Product::new(RestaurantId::new(), "Pad Thai", dec!(32.90)).unwrap();
        assert!(product.is_active());
        assert_eq!(product.price(), dec!(32.90));
    }

    #[test]
    fn rejects_blank_name() {
        let err = Product::new(RestaurantId::new(), " ", dec!(10)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_negative_price() {
        let err = Product::new(RestaurantId::new(), "Pad Thai", dec!(-1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
