//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable from the caller's point of view; none of them
/// carries storage-layer detail. Infrastructure failures are mapped into one
/// of these at the repository boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced sub-entity (restaurant, product, payment method, customer)
    /// does not exist. Surfaced to callers as a business-rule violation, since
    /// from their perspective the request itself is malformed.
    #[error("there is no {kind} with id {id}")]
    ReferenceNotFound { kind: &'static str, id: String },

    /// No order exists with the given public code.
    #[error("there is no order with code {code}")]
    OrderNotFound { code: String },

    /// A status transition was attempted from a state that does not permit it.
    #[error("order {code} status cannot change from {from} to {to}")]
    InvalidStateTransition {
        code: String,
        from: &'static str,
        to: &'static str,
    },

    /// A conflicting concurrent write was detected by the storage layer.
    #[error("order {code} was modified concurrently")]
    ConcurrentModification { code: String },

    /// A value failed a business validation rule.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn reference_not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::ReferenceNotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn order_not_found(code: impl ToString) -> Self {
        Self::OrderNotFound {
            code: code.to_string(),
        }
    }

    pub fn invalid_state_transition(
        code: impl ToString,
        from: &'static str,
        to: &'static str,
    ) -> Self {
        Self::InvalidStateTransition {
            code: code.to_string(),
            from,
            to,
        }
    }

    pub fn concurrent_modification(code: impl ToString) -> Self {
        Self::ConcurrentModification {
            code: code.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_not_found_names_kind_and_id() {
        let err = DomainError::reference_not_found("restaurant", 42);
        assert_eq!(err.to_string(), "there is no restaurant with id 42");
    }

    #[test]
    fn invalid_state_transition_names_code_and_both_states() {
        let err = DomainError::invalid_state_transition("abc-123", "confirmed", "cancelled");
        assert_eq!(
            err.to_string(),
            "order abc-123 status cannot change from confirmed to cancelled"
        );
    }
}
