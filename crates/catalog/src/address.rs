//! Structured street address (value object).

use prato_core::ValueObject;
use serde::{Deserialize, Serialize};

/// A delivery/location address. Compared by value; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub complement: Option<String>,
}

impl ValueObject for Address {}

impl Address {
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        district: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            district: district.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            complement: None,
        }
    }

    pub fn with_complement(mut self, complement: impl Into<String>) -> Self {
        self.complement = Some(complement.into());
        self
    }
}
