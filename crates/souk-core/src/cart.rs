//! # Cart
//!
//! The in-progress sale: a list of frozen product snapshots with
//! quantities, plus the checkout math that turns it into a `Sale`.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Operations                                  │
//! │                                                                         │
//! │  Cashier Action           Operation               State Change          │
//! │  ──────────────           ─────────               ────────────          │
//! │                                                                         │
//! │  Scan / tap product ────► add_product() ────────► items.push(snapshot)  │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ────► items[i].quantity = n │
//! │                                                                         │
//! │  Remove line ───────────► remove_item() ────────► items.remove(i)       │
//! │                                                                         │
//! │  Void sale ─────────────► clear() ──────────────► items.clear()         │
//! │                                                                         │
//! │  Take payment ──────────► finalize() ───────────► Sale (cart untouched) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Policy
//! A product with zero stock cannot enter the cart, but a quantity above
//! the current stock can: walk-in reality is that the shelf count drifts,
//! so the commit step clamps stock at zero instead of the cart rejecting
//! the sale.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{new_id, CartItem, Customer, PaymentMethod, PointsInfo, Product, Sale, TaxRate};

// =============================================================================
// Checkout Totals
// =============================================================================

/// Totals for the current cart under a given tax rate and discount.
///
/// `total = subtotal + tax - discount`, computed here and carried onto
/// the `Sale` record unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

// =============================================================================
// Tender
// =============================================================================

/// Payment details presented at checkout.
#[derive(Debug, Clone)]
pub struct Tender {
    pub tax_rate: TaxRate,
    pub discount: Money,
    pub amount_paid: Money,
    pub payment_method: PaymentMethod,
    /// User ringing the sale up.
    pub seller_id: String,
}

// =============================================================================
// Cart
// =============================================================================

/// The active cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product again
///   increases quantity)
/// - Every line has quantity ≥ 1 (dropping to zero removes the line)
/// - At most `MAX_CART_ITEMS` lines, `MAX_ITEM_QUANTITY` per line
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Rules
    /// - Product with zero stock: rejected with `OutOfStock`
    /// - Already in cart: quantity incremented (snapshot kept)
    /// - Quantity above current stock: allowed, commit clamps later
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if !product.is_in_stock() {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > crate::MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: crate::MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= crate::MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: crate::MAX_CART_ITEMS,
            });
        }
        if quantity > crate::MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: crate::MAX_ITEM_QUANTITY,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// A quantity of zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        if quantity > crate::MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: crate::MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product.id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_id.to_string())),
        }
    }

    /// Removes a line by product id.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals, before tax and discount.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    /// Computes checkout totals under the store's tax rate and an
    /// optional discount.
    pub fn totals(&self, tax_rate: TaxRate, discount: Money) -> CheckoutTotals {
        let subtotal = self.subtotal();
        let tax = subtotal.calculate_tax(tax_rate);
        CheckoutTotals {
            subtotal,
            tax,
            discount,
            total: subtotal + tax - discount,
        }
    }

    /// Turns the cart into an immutable `Sale` record.
    ///
    /// The cart itself is not consumed or cleared; that happens when the
    /// commit workflow finishes. Validation here is the last gate before
    /// a sale exists:
    ///
    /// ## Rules
    /// - Cart must not be empty
    /// - `total` must be positive (a discount can push it to zero or below)
    /// - `amount_paid` must cover `total`
    pub fn finalize(
        &self,
        tender: &Tender,
        customer: Option<&Customer>,
        points_info: Option<PointsInfo>,
    ) -> CoreResult<Sale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let totals = self.totals(tender.tax_rate, tender.discount);
        if !totals.total.is_positive() {
            return Err(CoreError::NonPositiveTotal);
        }
        if tender.amount_paid < totals.total {
            return Err(CoreError::InsufficientPayment {
                required: totals.total,
                paid: tender.amount_paid,
            });
        }

        Ok(Sale {
            id: new_id(),
            timestamp: Utc::now(),
            items: self.items.clone(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            amount_paid: tender.amount_paid,
            change_due: tender.amount_paid - totals.total,
            customer_id: customer.map(|c| c.id.clone()),
            customer_name: customer.map(|c| c.name.clone()),
            points_info,
            payment_method: tender.payment_method,
            seller_id: tender.seller_id.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
