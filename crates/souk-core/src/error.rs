//! # Error Types
//!
//! Domain errors for souk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  souk-core (this file)   CoreError        cart / checkout rules         │
//! │                          ValidationError  bad field input               │
//! │                                                                         │
//! │  souk-store              StoreError       snapshot read/write           │
//! │  souk-app                AppError         session + commit workflow     │
//! │                                                                         │
//! │  Flow: ValidationError ──► CoreError ──► AppError ──► caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything derives `thiserror::Error`; messages carry the context a
//! register operator needs (product name, amounts), and no error is ever a
//! bare `String`.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by cart and checkout logic.
///
/// Callers translate these into whatever message surface they have; the
/// `Display` text is written to be usable as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No catalog entry under the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product has no stock left, so it cannot enter the cart.
    ///
    /// Only the add path checks this. Oversell of items already in the
    /// cart is not an error: committed sales clamp stock at zero instead
    /// of rejecting the sale.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// The referenced line item is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// Checkout was attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout was attempted with a non-positive total, e.g. when a
    /// discount swallows the whole subtotal.
    #[error("Sale total must be positive")]
    NonPositiveTotal,

    /// The tendered amount does not cover the sale total.
    #[error("Amount paid {paid} does not cover total {required}")]
    InsufficientPayment { required: Money, paid: Money },

    /// Line-item cap reached (`MAX_CART_ITEMS`).
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Per-line quantity cap reached (`MAX_ITEM_QUANTITY`).
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A field failed validation on the way in.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input failures, raised before any business logic runs.
///
/// Each variant names the offending field so a form can highlight it.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Missing or empty where a value is mandatory.
    #[error("{field} is required")]
    Required { field: String },

    /// Below the minimum length.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Above the maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value outside its permitted window.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative where only positive values make sense.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Structurally wrong, e.g. letters in a barcode.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Collides with an existing record, e.g. a taken username.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Shorthand for results carrying a `CoreError`.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_messages() {
        let err = CoreError::OutOfStock {
            name: "Mint Tea 500g".to_string(),
        };
        assert_eq!(err.to_string(), "Mint Tea 500g is out of stock");

        let err = CoreError::InsufficientPayment {
            required: Money::from_cents(1250),
            paid: Money::from_cents(1000),
        };
        assert_eq!(
            err.to_string(),
            "Amount paid 10.00 does not cover total 12.50"
        );
    }

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "username".to_string(),
            value: "admin".to_string(),
        };
        assert_eq!(err.to_string(), "username 'admin' already exists");
    }

    #[test]
    fn test_validation_lifts_into_core_error() {
        let field_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let lifted: CoreError = field_err.into();
        assert!(matches!(lifted, CoreError::Validation(_)));
        assert_eq!(lifted.to_string(), "Validation error: name is required");
    }
}
