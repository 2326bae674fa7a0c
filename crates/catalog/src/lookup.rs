//! Lookup contracts the order core consumes.
//!
//! Returning `Ok(None)` means "no such entity"; callers decide whether that
//! is a plain miss or a business-rule violation. `Err` is reserved for
//! storage faults surfaced through the domain error model.

use prato_core::{CustomerId, DomainResult, PaymentMethodId, ProductId, RestaurantId};

use crate::{Customer, PaymentMethod, Product, Restaurant};

pub trait RestaurantLookup: Send + Sync {
    fn find_restaurant(&self, id: RestaurantId) -> DomainResult<Option<Restaurant>>;
}

pub trait ProductLookup: Send + Sync {
    fn find_product(&self, id: ProductId) -> DomainResult<Option<Product>>;
}

pub trait PaymentMethodLookup: Send + Sync {
    fn find_payment_method(&self, id: PaymentMethodId) -> DomainResult<Option<PaymentMethod>>;
}

pub trait CustomerLookup: Send + Sync {
    fn find_customer(&self, id: CustomerId) -> DomainResult<Option<Customer>>;
}
