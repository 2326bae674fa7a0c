use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prato_core::{DomainError, DomainResult, Entity, PaymentMethodId, RestaurantId};

use crate::address::Address;

/// Entity: Restaurant.
///
/// The delivery fee configured here is what orders snapshot at issuance
/// time; later fee changes never touch already-issued orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    id: RestaurantId,
    name: String,
    delivery_fee: Decimal,
    address: Address,
    active: bool,
    open: bool,
    payment_methods: HashSet<PaymentMethodId>,
}

impl Restaurant {
    /// Create an active (but not yet open) restaurant.
    pub fn new(
        name: impl Into<String>,
        delivery_fee: Decimal,
        address: Address,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("restaurant name cannot be empty"));
        }
        if delivery_fee < Decimal::ZERO {
            return Err(DomainError::validation(
                "restaurant delivery fee cannot be negative",
            ));
        }

        Ok(Self {
            id: RestaurantId::new(),
            name,
            delivery_fee,
            address,
            active: true,
            open: false,
            payment_methods: HashSet::new(),
        })
    }

    pub fn id_typed(&self) -> RestaurantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn open_for_orders(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether new orders may be issued against this restaurant.
    pub fn can_take_orders(&self) -> bool {
        self.active && self.open
    }

    pub fn add_payment_method(&mut self, id: PaymentMethodId) -> bool {
        self.payment_methods.insert(id)
    }

    pub fn remove_payment_method(&mut self, id: PaymentMethodId) -> bool {
        self.payment_methods.remove(&id)
    }

    pub fn accepts_payment_method(&self, id: PaymentMethodId) -> bool {
        self.payment_methods.contains(&id)
    }
}

impl Entity for Restaurant {
    type Id = RestaurantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
