use serde::{Deserialize, Serialize};

use prato_core::{DomainError, DomainResult, Entity, PaymentMethodId};

/// Entity: a payment method (e.g. card on delivery, wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    id: PaymentMethodId,
    description: String,
}

impl PaymentMethod {
    pub fn new(description: impl Into<String>) -> DomainResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::validation(
                "payment method description cannot be empty",
            ));
        }

        Ok(Self {
            id: PaymentMethodId::new(),
            description,
        })
    }

    pub fn id_typed(&self) -> PaymentMethodId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for PaymentMethod {
    type Id = PaymentMethodId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
