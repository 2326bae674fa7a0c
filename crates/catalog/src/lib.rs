//! `prato-catalog` — entities referenced by orders, and their lookup contracts.
//!
//! Everything here is record-level: restaurants, menu products, payment
//! methods, customers. The order core consumes these through the lookup
//! traits in [`lookup`]; it never reaches into a catalog store directly.

pub mod address;
pub mod customer;
pub mod lookup;
pub mod payment;
pub mod product;
pub mod restaurant;

pub use address::Address;
pub use customer::Customer;
pub use lookup::{CustomerLookup, PaymentMethodLookup, ProductLookup, RestaurantLookup};
pub use payment::PaymentMethod;
pub use product::Product;
pub use restaurant::Restaurant;
