//! Unified error types for the domain layer
//!
//! Every game rule that can refuse an action reports it through `DomainError`.
//! A returned error always means the game state was left untouched.

use thiserror::Error;

use crate::value_objects::FlavorTag;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// The chosen flavor has no stock left
    #[error("{flavor} is out of stock")]
    OutOfStock { flavor: FlavorTag },

    /// The selection would push the player past the spending limit
    #[error("Insufficient funds: ${needed:.2} needed, limit is ${limit:.2}")]
    InsufficientFunds { needed: f64, limit: f64 },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if names.is_empty() {
    ///     return Err(DomainError::validation("At least one player is required"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn out_of_stock(flavor: FlavorTag) -> Self {
        Self::OutOfStock { flavor }
    }

    pub fn insufficient_funds(needed: f64, limit: f64) -> Self {
        Self::InsufficientFunds { needed, limit }
    }

    /// Whether the player caused this error (stock, funds, bad input) rather
    /// than the caller sequencing operations wrongly.
    pub fn is_player_facing(&self) -> bool {
        matches!(
            self,
            Self::OutOfStock { .. } | Self::InsufficientFunds { .. } | Self::Validation(_)
        )
    }
}
