//! # Domain Types
//!
//! Core domain types used throughout Souk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  barcode        │   │  items (frozen) │   │  points         │       │
//! │  │  price / cost   │   │  totals         │   │  total_spent    │       │
//! │  │  stock levels   │   │  points_info    │   │  visit_stats    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ PaymentMethod   │   │    UserRole     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Cash           │   │  Admin          │       │
//! │  │  2000 = 20%     │   │  Card           │   │  Seller         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartItem` freezes the full product record at the moment it enters the
//! cart, and a `Sale` keeps those frozen items forever. Catalog edits after
//! the fact never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

/// Generates a fresh entity id (UUID v4, string form).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points: 1 bp = 0.01%, so 2000 bps is the 20%
/// Moroccan standard VAT.
///
/// Integer bps keep tax math exact; fractions of a percent never touch
/// floating point on the calculation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Wraps a basis-point count.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Converts a human percentage like `20.0` into a rate.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// The raw basis-point count.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The rate as a percentage, display only.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The 0% rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// True for the 0% rate.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Language
// =============================================================================

/// Interface and receipt languages supported by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Arabic.
    Ar,
    /// English.
    En,
    /// French.
    Fr,
}

impl Default for Language {
    fn default() -> Self {
        Language::Ar
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Access level of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including destructive operations.
    Admin,
    /// Day-to-day checkout access.
    Seller,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Seller
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
}

// =============================================================================
// Rolling Statistics
// =============================================================================

/// Rolling activity counters over three windows.
///
/// Used both for product sales volume and customer visit frequency.
/// Recomputed from the sales log by `reports::refresh_sales_stats` and
/// `reports::refresh_visit_stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RollingStats {
    /// Activity over the last 30 days.
    pub monthly: i64,
    /// Activity over the last 182 days.
    pub semi_annual: i64,
    /// Activity over the last 365 days.
    pub annual: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry the register can sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// UUID v4 in string form.
    pub id: String,

    /// Name as it appears on screen and on the receipt.
    pub name: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: String,

    /// Selling price.
    pub price: Money,

    /// Purchase cost (for margin reporting).
    pub cost: Money,

    /// Current stock level. Never negative: committed sales clamp at zero.
    pub stock: i64,

    /// Reorder threshold; stock at or below this flags the product.
    pub min_stock: i64,

    /// Category label for catalog grouping.
    pub category: String,

    /// Supplier this product is sourced from.
    pub supplier_id: String,

    /// Optional image reference for the catalog.
    pub image: Option<String>,

    /// Units sold over rolling windows.
    #[serde(default)]
    pub sales_stats: RollingStats,
}

impl Product {
    /// Checks whether the product is at or below its reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Checks whether the product can enter a cart at all.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the in-progress sale.
///
/// Uses the snapshot pattern: the full product record is frozen at the time
/// it enters the cart, so later catalog edits don't change an open checkout
/// or recorded history. Serializes with the product fields flattened next
/// to `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product data at the time of adding (frozen).
    #[serde(flatten)]
    pub product: Product,

    /// Quantity in the cart.
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart item by snapshotting a product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product: product.clone(),
            quantity,
        }
    }

    /// Line total (frozen unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Loyalty Points Breakdown
// =============================================================================

/// Loyalty point movement recorded on a sale.
///
/// Carried on the `Sale` so the commit workflow can apply `new_total`
/// verbatim; the workflow never recomputes loyalty math. `loyalty::accrue`
/// is the producer that guarantees `new_total = previous + earned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PointsInfo {
    /// Balance before this sale.
    pub previous: i64,
    /// Whole points earned by this sale.
    pub earned: i64,
    /// Balance after this sale.
    pub new_total: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
///
/// Immutable once created: appended to the sales log and never rewritten.
/// `total = subtotal + tax - discount` is enforced at construction by
/// `Cart::finalize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    /// Line items, frozen at checkout.
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub change_due: Money,
    /// Customer this sale is attached to, if any.
    pub customer_id: Option<String>,
    /// Customer display name at time of sale (frozen).
    pub customer_name: Option<String>,
    /// Loyalty movement, present when a customer earned points.
    pub points_info: Option<PointsInfo>,
    pub payment_method: PaymentMethod,
    /// User who rang the sale up.
    pub seller_id: String,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer with a loyalty balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,

    /// Whole loyalty points. Set by committed sales to the precomputed
    /// `points_info.new_total`, decremented by voucher redemption.
    pub points: i64,

    /// Fractional accrual carried between sales, in hundredths of a point.
    /// Always 0-99; see `loyalty::accrue`.
    pub points_remainder: i64,

    /// Lifetime spend; grows by `sale.total` on every committed sale.
    pub total_spent: Money,

    /// Vouchers redeemed so far.
    pub vouchers_used: i64,

    pub notes: Option<String>,

    /// Timestamp of the most recent sale referencing this customer.
    #[ts(as = "Option<String>")]
    pub last_visit: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Visits over rolling windows.
    #[serde(default)]
    pub visit_stats: RollingStats,
}

// =============================================================================
// Supplier
// =============================================================================

/// A product supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// What this supplier provides (e.g., "dairy", "beverages").
    pub product_type: String,
}

// =============================================================================
// User
// =============================================================================

/// A user account that can sign in to the till.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Stored verbatim and compared on login.
    pub password: String,
    pub role: UserRole,
    pub name: String,
    /// Preferred interface language, applied to settings at login.
    pub language: Option<Language>,
}

impl User {
    /// Checks whether this account has administrative access.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// The accounts seeded into a fresh installation.
    ///
    /// ## Rules
    /// Seeded only when the `users` snapshot is absent or unreadable.
    /// A deliberately emptied user list is left empty.
    pub fn default_accounts() -> Vec<User> {
        vec![
            User {
                id: "admin_1".to_string(),
                username: "admin".to_string(),
                password: "admin".to_string(),
                role: UserRole::Admin,
                name: "Administrator".to_string(),
                language: Some(Language::Ar),
            },
            User {
                id: "seller_1".to_string(),
                username: "seller".to_string(),
                password: "seller".to_string(),
                role: UserRole::Seller,
                name: "Seller".to_string(),
                language: Some(Language::Ar),
            },
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Mint Tea 500g".to_string(),
            barcode: "6111000000017".to_string(),
            price: Money::from_cents(1250),
            cost: Money::from_cents(800),
            stock: 5,
            min_stock: 2,
            category: "beverages".to_string(),
            supplier_id: "s-1".to_string(),
            image: None,
            sales_stats: RollingStats::default(),
        }
    }

    #[test]
    fn test_tax_rate_conversions() {
        let vat = TaxRate::from_bps(2000);
        assert_eq!(vat.bps(), 2000);
        assert!((vat.percentage() - 20.0).abs() < 0.001);

        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_low_stock_threshold() {
        let mut product = sample_product();
        assert!(!product.is_low_stock()); // 5 > 2

        product.stock = 2;
        assert!(product.is_low_stock()); // at the threshold counts

        product.stock = 0;
        assert!(product.is_low_stock());
        assert!(!product.is_in_stock());
    }

    #[test]
    fn test_cart_item_snapshot_is_frozen() {
        let mut product = sample_product();
        let item = CartItem::from_product(&product, 2);

        // Catalog edit after the fact must not leak into the snapshot
        product.price = Money::from_cents(9999);

        assert_eq!(item.product.price.cents(), 1250);
        assert_eq!(item.line_total().cents(), 2500);
    }

    #[test]
    fn test_cart_item_flattened_json() {
        let item = CartItem::from_product(&sample_product(), 3);
        let json = serde_json::to_value(&item).unwrap();

        // Product fields sit next to quantity, not nested
        assert_eq!(json["id"], "p-1");
        assert_eq!(json["minStock"], 2);
        assert_eq!(json["quantity"], 3);
        assert!(json.get("product").is_none());

        let back: CartItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(serde_json::to_string(&Language::Ar).unwrap(), "\"ar\"");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).unwrap(),
            "\"card\""
        );
    }

    #[test]
    fn test_default_accounts() {
        let users = User::default_accounts();
        assert_eq!(users.len(), 2);
        assert!(users[0].is_admin());
        assert_eq!(users[0].username, "admin");
        assert_eq!(users[1].role, UserRole::Seller);
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
