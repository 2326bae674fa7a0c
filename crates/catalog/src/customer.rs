use serde::{Deserialize, Serialize};

use prato_core::{CustomerId, DomainError, DomainResult, Entity};

/// Entity: a customer account.
///
/// Credential/permission management is out of scope; orders only need the
/// identity and the display name (which the order search filters on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("customer email is malformed"));
        }

        Ok(Self {
            id: CustomerId::new(),
            name,
            email,
        })
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
