use std::collections::HashMap;
use std::sync::RwLock;

use prato_catalog::{
    Customer, CustomerLookup, PaymentMethod, PaymentMethodLookup, Product, ProductLookup,
    Restaurant, RestaurantLookup,
};
use prato_core::{
    CustomerId, DomainError, DomainResult, PaymentMethodId, ProductId, RestaurantId,
};

/// In-memory catalog store implementing all four lookup contracts.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    restaurants: RwLock<HashMap<RestaurantId, Restaurant>>,
    products: RwLock<HashMap<ProductId, Product>>,
    payment_methods: RwLock<HashMap<PaymentMethodId, PaymentMethod>>,
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

fn poisoned() -> DomainError {
    DomainError::validation("catalog store is unavailable")
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_restaurant(&self, restaurant: Restaurant) -> DomainResult<RestaurantId> {
        let id = restaurant.id_typed();
        self.restaurants
            .write()
            .map_err(|_| poisoned())?
            .insert(id, restaurant);
        Ok(id)
    }

    pub fn insert_product(&self, product: Product) -> DomainResult<ProductId> {
        let id = product.id_typed();
        self.products
            .write()
            .map_err(|_| poisoned())?
            .insert(id, product);
        Ok(id)
    }

    pub fn insert_payment_method(&self, method: PaymentMethod) -> DomainResult<PaymentMethodId> {
        let id = method.id_typed();
        self.payment_methods
            .write()
            .map_err(|_| poisoned())?
            .insert(id, method);
        Ok(id)
    }

    pub fn insert_customer(&self, customer: Customer) -> DomainResult<CustomerId> {
        let id = customer.id_typed();
        self.customers
            .write()
            .map_err(|_| poisoned())?
            .insert(id, customer);
        Ok(id)
    }

    /// Joined display name for query execution; unknown ids resolve to "".
    pub(crate) fn customer_name(&self, id: CustomerId) -> String {
        self.customers
            .read()
            .ok()
            .and_then(|map| map.get(&id).map(|c| c.name().to_string()))
            .unwrap_or_default()
    }

    pub(crate) fn restaurant_name(&self, id: RestaurantId) -> String {
        self.restaurants
            .read()
            .ok()
            .and_then(|map| map.get(&id).map(|r| r.name().to_string()))
            .unwrap_or_default()
    }
}

impl RestaurantLookup for InMemoryCatalog {
    fn find_restaurant(&self, id: RestaurantId) -> DomainResult<Option<Restaurant>> {
        Ok(self
            .restaurants
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned())
    }
}

impl ProductLookup for InMemoryCatalog {
    fn find_product(&self, id: ProductId) -> DomainResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned())
    }
}

impl PaymentMethodLookup for InMemoryCatalog {
    fn find_payment_method(&self, id: PaymentMethodId) -> DomainResult<Option<PaymentMethod>> {
        Ok(self
            .payment_methods
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned())
    }
}

impl CustomerLookup for InMemoryCatalog {
    fn find_customer(&self, id: CustomerId) -> DomainResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned())
    }
}
