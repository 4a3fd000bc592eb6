//! Shared fixtures and doubles for the unit tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use souk_core::{
    Customer, Money, PaymentMethod, Product, RollingStats, Supplier, TaxRate, Tender,
};
use souk_store::{SnapshotStore, SqliteStore, StoreConfig, StoreError, StoreKey, StoreResult};

use crate::session::AppContext;

pub async fn memory_store() -> SqliteStore {
    SqliteStore::new(StoreConfig::in_memory()).await.unwrap()
}

/// A context over a fresh in-memory store, with the commit verification
/// delay zeroed so tests run instantly.
pub async fn memory_context() -> AppContext<SqliteStore> {
    let store = memory_store().await;
    let mut ctx = AppContext::start(store).await;
    ctx.checkout.verify_delay = Duration::ZERO;
    ctx
}

pub fn sample_product(id: &str, price_cents: i64, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        barcode: format!("BAR-{}", id),
        price: Money::from_cents(price_cents),
        cost: Money::from_cents(price_cents / 2),
        stock,
        min_stock: 2,
        category: "grocery".to_string(),
        supplier_id: "s-1".to_string(),
        image: None,
        sales_stats: RollingStats::default(),
    }
}

pub fn sample_customer(id: &str, name: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        phone: "0600000000".to_string(),
        email: String::new(),
        address: None,
        points: 0,
        points_remainder: 0,
        total_spent: Money::zero(),
        vouchers_used: 0,
        notes: None,
        last_visit: None,
        created_at: Utc::now(),
        visit_stats: RollingStats::default(),
    }
}

pub fn sample_supplier(id: &str, name: &str) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: name.to_string(),
        phone: "0522000000".to_string(),
        product_type: "grocery".to_string(),
    }
}

/// Cash tender with no tax and no discount.
pub fn cash_tender(amount_cents: i64) -> Tender {
    Tender {
        tax_rate: TaxRate::zero(),
        discount: Money::zero(),
        amount_paid: Money::from_cents(amount_cents),
        payment_method: PaymentMethod::Cash,
        seller_id: "seller_1".to_string(),
    }
}

// =============================================================================
// Fault Injection
// =============================================================================

/// A store whose first `succeed_puts` writes go through and every write
/// after that fails. Reads always delegate, which is what lets the
/// commit workflow's resync observe partially-written batches.
pub struct FlakyStore<S> {
    inner: S,
    puts_left: AtomicU32,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S, succeed_puts: u32) -> Self {
        FlakyStore {
            inner,
            puts_left: AtomicU32::new(succeed_puts),
        }
    }
}

#[async_trait]
impl<S: SnapshotStore> SnapshotStore for FlakyStore<S> {
    async fn put_raw(&self, key: StoreKey, json: &str) -> StoreResult<()> {
        let left = self.puts_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(StoreError::Internal("injected write failure".to_string()));
        }
        self.puts_left.store(left - 1, Ordering::SeqCst);
        self.inner.put_raw(key, json).await
    }

    async fn get_raw(&self, key: StoreKey) -> StoreResult<Option<String>> {
        self.inner.get_raw(key).await
    }

    async fn remove(&self, key: StoreKey) -> StoreResult<()> {
        self.inner.remove(key).await
    }

    async fn erase_all(&self) -> StoreResult<()> {
        self.inner.erase_all().await
    }
}
