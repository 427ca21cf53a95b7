//! Unified error types for the domain layer
//!
//! Every failure in the accounting core is local and recoverable: a rejected
//! operation leaves the ledgers exactly as they were, and the caller surfaces
//! the message to the user as a notice.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
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

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// No slot left at the requested spell level
    #[error("No level {level} spell slots available")]
    NoSlotsAvailable { level: u8 },

    /// No extra use left for the named spell
    #[error("No extra uses remaining for {0}")]
    NoExtraUses(String),

    /// Prepared-spell ceiling reached
    #[error("Prepared limit reached: {current}/{max} spells")]
    PreparedLimitReached { current: u32, max: u32 },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Spell name cannot be empty"));
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

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a prepared-limit error
    pub fn prepared_limit(current: u32, max: u32) -> Self {
        Self::PreparedLimitReached { current, max }
    }

    /// True for the "capacity exceeded" family (no slot, no extra use, ceiling reached).
    ///
    /// These are informational: the user asked for something the character
    /// cannot currently afford.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(
            self,
            Self::NoSlotsAvailable { .. }
                | Self::NoExtraUses(_)
                | Self::PreparedLimitReached { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Spell", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Spell"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_prepared_limit_error() {
        let err = DomainError::prepared_limit(8, 8);
        assert_eq!(err.to_string(), "Prepared limit reached: 8/8 spells");
        assert!(err.is_capacity_exceeded());
    }

    #[test]
    fn test_capacity_family() {
        assert!(DomainError::NoSlotsAvailable { level: 3 }.is_capacity_exceeded());
        assert!(DomainError::NoExtraUses("Fireball".into()).is_capacity_exceeded());
        assert!(!DomainError::constraint("duplicate").is_capacity_exceeded());
    }
}
