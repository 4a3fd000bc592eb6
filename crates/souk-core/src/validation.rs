//! # Validation Module
//!
//! Input validation for catalog, customer, and account records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Forms (UI)                                                    │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (application seam)                                │
//! │  ├── Business rule validation before any write                          │
//! │  └── Shared by every caller that mutates a collection                   │
//! │                                                                         │
//! │  Layer 3: Store                                                         │
//! │  └── JSON snapshots enforce nothing: whatever passes Layer 2            │
//! │      is what gets persisted, so Layer 2 is the last gate                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use souk_core::validation::{validate_barcode, validate_quantity};
//!
//! validate_barcode("6111245591063").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, Product, Supplier, TaxRate, User};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, customer, supplier, or user).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use souk_core::validation::validate_name;
///
/// assert!(validate_name("Mint Tea 500g").is_ok());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores (EAN/UPC digits
///   plus internal codes)
///
/// ## Example
/// ```rust
/// use souk_core::validation::validate_barcode;
///
/// assert!(validate_barcode("6111245591063").is_ok());
/// assert!(validate_barcode("BULK-OLIVES_1").is_ok());
/// assert!(validate_barcode("").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 50,
        });
    }

    if !barcode
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Digits, spaces, and `+ - ( )` only
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Empty is allowed (walk-in customers rarely give one)
/// - If present, must look like `local@domain`
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Ok(());
    }

    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a supplier's product type label.
pub fn validate_product_type(product_type: &str) -> ValidationResult<()> {
    let product_type = product_type.trim();

    if product_type.is_empty() {
        return Err(ValidationError::Required {
            field: "product type".to_string(),
        });
    }

    if product_type.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "product type".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a login username.
///
/// ## Rules
/// - Must be between 3 and 50 characters
/// - Only alphanumeric characters and underscores
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates an account password.
///
/// ## Rules
/// - Must be between 4 and 100 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() < 4 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 4,
        });
    }

    if password.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or cost.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free items, unknown cost)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level or reorder threshold.
///
/// ## Rules
/// - Must be non-negative
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a checkout discount.
///
/// ## Rules
/// - Must be non-negative (whether it swallows the whole total is
///   checked at finalize time, against the actual cart)
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate.
///
/// ## Rules
/// - Must be between 0 and 10000 bps (0% to 100%)
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of unique lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a full product record before it is written.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_name(&product.name)?;
    validate_barcode(&product.barcode)?;
    validate_price(product.price)?;
    validate_price(product.cost)?;
    validate_stock(product.stock)?;
    validate_stock(product.min_stock)?;
    Ok(())
}

/// Validates a full customer record before it is written.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_name(&customer.name)?;
    validate_phone(&customer.phone)?;
    validate_email(&customer.email)?;
    Ok(())
}

/// Validates a full supplier record before it is written.
pub fn validate_supplier(supplier: &Supplier) -> ValidationResult<()> {
    validate_name(&supplier.name)?;
    validate_phone(&supplier.phone)?;
    validate_product_type(&supplier.product_type)?;
    Ok(())
}

/// Validates a full user record before it is written.
pub fn validate_user(user: &User) -> ValidationResult<()> {
    validate_username(&user.username)?;
    validate_password(&user.password)?;
    validate_name(&user.name)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
