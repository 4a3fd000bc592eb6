//! # Derived Views
//!
//! Pure aggregation over the collections: no state machine, no storage,
//! just functions from `(&[Sale], &[Product], &[Customer])` to display
//! data. Recomputed on demand; nothing here is persisted.
//!
//! ## Ordering Guarantees
//! Rankings use a stable sort on the aggregation key only. Ties keep
//! their prior order: insertion order of the collection for customers,
//! first appearance in the sales log for products. Callers can rely on
//! that order being deterministic across recomputations.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, Product, RollingStats, Sale};

/// Maximum entries in a "top" ranking.
pub const TOP_LIST_LIMIT: usize = 10;

/// Rolling window sizes, in days.
pub const WINDOW_MONTH_DAYS: i64 = 30;
pub const WINDOW_HALF_YEAR_DAYS: i64 = 182;
pub const WINDOW_YEAR_DAYS: i64 = 365;

// =============================================================================
// Top Customers
// =============================================================================

/// Customers ranked by lifetime spend, highest first, capped at
/// `TOP_LIST_LIMIT`.
pub fn top_customers(customers: &[Customer]) -> Vec<Customer> {
    let mut ranked = customers.to_vec();
    ranked.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    ranked.truncate(TOP_LIST_LIMIT);
    ranked
}

// =============================================================================
// Product Performance
// =============================================================================

/// Aggregated sales figures for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    pub product_id: String,
    /// Name from the current catalog, not the sale snapshots.
    pub name: String,
    pub quantity_sold: i64,
    /// Revenue at the prices actually charged (frozen line totals).
    pub revenue: Money,
}

/// Products ranked by units sold across the whole sales log, capped at
/// `TOP_LIST_LIMIT`.
///
/// ## Rules
/// Line items whose product no longer exists in the catalog are skipped:
/// a deleted product cannot be displayed, so it does not rank.
pub fn top_products(sales: &[Sale], products: &[Product]) -> Vec<ProductPerformance> {
    let mut ranked = aggregate_performance(sales.iter(), products);
    ranked.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
    ranked.truncate(TOP_LIST_LIMIT);
    ranked
}

/// What one customer has bought, ranked by units, uncapped.
pub fn customer_purchase_history(
    sales: &[Sale],
    products: &[Product],
    customer_id: &str,
) -> Vec<ProductPerformance> {
    let theirs = sales
        .iter()
        .filter(|s| s.customer_id.as_deref() == Some(customer_id));
    let mut ranked = aggregate_performance(theirs, products);
    ranked.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
    ranked
}

/// Walks sale line items, summing quantity and revenue per product.
///
/// Output order is first appearance in the scanned sales, which is what
/// makes the callers' stable sorts deterministic.
fn aggregate_performance<'a>(
    sales: impl Iterator<Item = &'a Sale>,
    products: &[Product],
) -> Vec<ProductPerformance> {
    let catalog: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut entries: Vec<ProductPerformance> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sale in sales {
        for item in &sale.items {
            let Some(product) = catalog.get(item.product.id.as_str()) else {
                continue;
            };

            let slot = *index.entry(item.product.id.clone()).or_insert_with(|| {
                entries.push(ProductPerformance {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    quantity_sold: 0,
                    revenue: Money::zero(),
                });
                entries.len() - 1
            });

            entries[slot].quantity_sold += item.quantity;
            entries[slot].revenue += item.line_total();
        }
    }

    entries
}

// =============================================================================
// Low Stock
// =============================================================================

/// Products at or below their reorder threshold.
pub fn low_stock(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.is_low_stock())
        .cloned()
        .collect()
}

// =============================================================================
// Rolling Statistics
// =============================================================================

/// Recomputes every product's rolling units-sold counters from the
/// sales log.
pub fn refresh_sales_stats(products: &mut [Product], sales: &[Sale], now: DateTime<Utc>) {
    let mut sold: HashMap<&str, RollingStats> = HashMap::new();

    for sale in sales {
        for item in &sale.items {
            let stats = sold.entry(item.product.id.as_str()).or_default();
            bump_windows(stats, sale.timestamp, now, item.quantity);
        }
    }

    for product in products {
        product.sales_stats = sold.get(product.id.as_str()).copied().unwrap_or_default();
    }
}

/// Recomputes every customer's rolling visit counters and last visit
/// from the sales log.
pub fn refresh_visit_stats(customers: &mut [Customer], sales: &[Sale], now: DateTime<Utc>) {
    let mut visits: HashMap<&str, (RollingStats, DateTime<Utc>)> = HashMap::new();

    for sale in sales {
        let Some(customer_id) = sale.customer_id.as_deref() else {
            continue;
        };
        let entry = visits
            .entry(customer_id)
            .or_insert((RollingStats::default(), sale.timestamp));
        bump_windows(&mut entry.0, sale.timestamp, now, 1);
        entry.1 = entry.1.max(sale.timestamp);
    }

    for customer in customers {
        match visits.get(customer.id.as_str()) {
            Some((stats, last)) => {
                customer.visit_stats = *stats;
                customer.last_visit = Some(*last);
            }
            None => {
                customer.visit_stats = RollingStats::default();
                customer.last_visit = None;
            }
        }
    }
}

fn bump_windows(stats: &mut RollingStats, at: DateTime<Utc>, now: DateTime<Utc>, amount: i64) {
    let age = now - at;
    if age > Duration::days(WINDOW_YEAR_DAYS) || age < Duration::zero() {
        return;
    }
    stats.annual += amount;
    if age <= Duration::days(WINDOW_HALF_YEAR_DAYS) {
        stats.semi_annual += amount;
    }
    if age <= Duration::days(WINDOW_MONTH_DAYS) {
        stats.monthly += amount;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
