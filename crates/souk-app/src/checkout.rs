//! # Checkout
//!
//! The active cart and the sale commit workflow.
//!
//! ## Commit Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     complete_sale(sale)                                 │
//! │                                                                         │
//! │  guard     status == Saving? ──► reject (SaleInProgress)                │
//! │    │                                                                    │
//! │  step 1    decrement stock per line, clamped at zero                    │
//! │  step 2    customer: total_spent += total, points = points_info total   │
//! │    │       (computed on clones; memory still untouched)                 │
//! │    ▼                                                                    │
//! │  step 3    persist products ──► sales ──► customers                     │
//! │    │          └─ failure: resync memory from store, DataSaveFailed      │
//! │    ▼                                                                    │
//! │  step 4    install the clones into memory                               │
//! │    ▼                                                                    │
//! │  step 5    wait verify_delay, persist the same batch again              │
//! │               └─ failure: resync, DataVerificationFailed                │
//! │                                                                         │
//! │  The cart survives until start_new_sale(); the receipt screen reads     │
//! │  it while the status is Complete.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! Step 3 writes the three collections one after another. A failure
//! midway leaves the earlier writes durable; the resync makes memory
//! mirror exactly that partial state rather than pretending the sale
//! never started. The verification pass exists to catch stores that
//! acknowledge writes and then lose them.

use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};
use ts_rs::TS;

use souk_core::{loyalty, Cart, CoreError, Customer, Product, Sale, Tender};
use souk_store::{SnapshotStore, StoreResult};

use crate::error::{AppError, AppResult};
use crate::session::AppContext;

/// Pause between the first save and the verification pass.
pub const VERIFY_DELAY: Duration = Duration::from_millis(500);

// =============================================================================
// Commit Status
// =============================================================================

/// Where the current sale stands. Drives the POS screen: `Saving`
/// disables the pay button, `Complete` shows the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CommitStatus {
    Idle,
    Saving,
    #[serde(rename_all = "camelCase")]
    Complete { sale_id: String },
    Failed { message: String },
}

// =============================================================================
// Checkout Session
// =============================================================================

/// The cart plus commit state for the sale being rung up.
#[derive(Debug)]
pub struct CheckoutSession {
    pub cart: Cart,
    /// Pause before the verification pass. Tests set this to zero.
    pub verify_delay: Duration,
    pub(crate) status: CommitStatus,
}

impl CheckoutSession {
    pub fn new() -> Self {
        CheckoutSession {
            cart: Cart::new(),
            verify_delay: VERIFY_DELAY,
            status: CommitStatus::Idle,
        }
    }

    pub fn status(&self) -> &CommitStatus {
        &self.status
    }

    pub fn is_saving(&self) -> bool {
        self.status == CommitStatus::Saving
    }

    /// Drops the cart and any commit result, e.g. on logout.
    pub fn abandon(&mut self) {
        self.cart.clear();
        self.status = CommitStatus::Idle;
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Checkout Operations
// =============================================================================

impl<S: SnapshotStore> AppContext<S> {
    /// Adds a catalog product to the cart by id.
    pub fn add_to_cart(&mut self, product_id: &str, quantity: i64) -> AppResult<()> {
        let product = self
            .state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        self.checkout.cart.add_product(product, quantity)?;
        Ok(())
    }

    pub fn update_cart_quantity(&mut self, product_id: &str, quantity: i64) -> AppResult<()> {
        self.checkout.cart.update_quantity(product_id, quantity)?;
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> AppResult<()> {
        self.checkout.cart.remove_item(product_id)?;
        Ok(())
    }

    /// Turns the cart into a `Sale`, accruing loyalty points when a
    /// customer is attached and the points system is on.
    ///
    /// The returned sale is not yet committed; pass it to
    /// [`complete_sale`](Self::complete_sale).
    pub fn build_sale(&self, tender: &Tender, customer_id: Option<&str>) -> AppResult<Sale> {
        let customer = customer_id.and_then(|id| self.state.find_customer(id));

        let points_info = match customer {
            Some(c) if self.state.settings.points_system_enabled => {
                let totals = self.checkout.cart.totals(tender.tax_rate, tender.discount);
                Some(loyalty::accrue(c, totals.total, self.state.settings.loyalty_rate).info)
            }
            _ => None,
        };

        let sale = self.checkout.cart.finalize(tender, customer, points_info)?;
        Ok(sale)
    }

    /// Commits a finalized sale: stock, loyalty, the sales log, storage.
    ///
    /// On success the status becomes `Complete` and the sale is returned
    /// for the receipt. On failure memory has been resynced from the
    /// store, so whatever the error, memory and disk agree.
    pub async fn complete_sale(&mut self, sale: Sale) -> AppResult<Sale> {
        if self.checkout.is_saving() {
            return Err(AppError::SaleInProgress);
        }
        self.checkout.status = CommitStatus::Saving;

        match self.commit_sale(&sale).await {
            Ok(()) => {
                self.checkout.status = CommitStatus::Complete {
                    sale_id: sale.id.clone(),
                };
                Ok(sale)
            }
            Err(err) => {
                self.checkout.status = CommitStatus::Failed {
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Clears the cart and the commit result, ready for the next
    /// customer.
    pub fn start_new_sale(&mut self) {
        self.checkout.abandon();
    }

    async fn commit_sale(&mut self, sale: &Sale) -> AppResult<()> {
        // Step 1: stock decrements on a clone of the catalog
        let mut products = self.state.products.clone();
        for item in &sale.items {
            if let Some(product) = products.iter_mut().find(|p| p.id == item.product.id) {
                product.stock = (product.stock - item.quantity).max(0);
            }
        }

        // Step 2: customer loyalty, gated exactly like the points accrual
        let mut customers = self.state.customers.clone();
        if let (Some(customer_id), Some(points_info)) = (&sale.customer_id, &sale.points_info) {
            if self.state.settings.points_system_enabled {
                if let Some(customer) = customers.iter_mut().find(|c| &c.id == customer_id) {
                    customer.total_spent += sale.total;
                    customer.points = points_info.new_total;
                }
            }
        }

        let mut sales = self.state.sales.clone();
        sales.push(sale.clone());

        // Step 3: persist before memory sees anything
        if let Err(err) = self.persist_sale_batch(&products, &sales, &customers).await {
            error!(sale_id = %sale.id, error = %err, "Sale save failed, resyncing from store");
            self.resync_from_store().await;
            return Err(AppError::DataSaveFailed { source: err });
        }

        // Step 4: install the committed batch
        self.state.products = products;
        self.state.sales = sales;
        self.state.customers = customers;

        // Step 5: verification pass
        tokio::time::sleep(self.checkout.verify_delay).await;
        if let Err(err) = self
            .persist_sale_batch(
                &self.state.products,
                &self.state.sales,
                &self.state.customers,
            )
            .await
        {
            error!(sale_id = %sale.id, error = %err, "Sale verification failed, resyncing from store");
            self.resync_from_store().await;
            return Err(AppError::DataVerificationFailed { source: err });
        }

        info!(sale_id = %sale.id, total = %sale.total, items = sale.items.len(), "Sale committed");
        Ok(())
    }

    async fn persist_sale_batch(
        &self,
        products: &[Product],
        sales: &[Sale],
        customers: &[Customer],
    ) -> StoreResult<()> {
        self.store.save_products(products).await?;
        self.store.save_sales(sales).await?;
        self.store.save_customers(customers).await?;
        Ok(())
    }

    /// Reloads the three sale collections so memory mirrors whatever the
    /// store actually holds.
    async fn resync_from_store(&mut self) {
        self.state.products = self.store.load_products().await;
        self.state.sales = self.store.load_sales().await;
        self.state.customers = self.store.load_customers().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        cash_tender, memory_context, memory_store, sample_customer, sample_product, FlakyStore,
    };
    use souk_core::Money;

    #[tokio::test]
    async fn test_build_sale_without_customer() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.add_to_cart("p-1", 2).unwrap();

        let sale = ctx.build_sale(&cash_tender(2000), None).unwrap();
        assert_eq!(sale.total.cents(), 2000);
        assert!(sale.customer_id.is_none());
        assert!(sale.points_info.is_none());
        assert_eq!(sale.seller_id, "seller_1");
    }

    #[tokio::test]
    async fn test_build_sale_accrues_points() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1250, 5))
            .await
            .unwrap();

        let mut customer = sample_customer("c-1", "Yassine");
        customer.points = 40;
        ctx.upsert_customer(customer).await.unwrap();

        ctx.add_to_cart("p-1", 1).unwrap();
        let sale = ctx.build_sale(&cash_tender(1250), Some("c-1")).unwrap();

        let info = sale.points_info.unwrap();
        assert_eq!(info.previous, 40);
        assert_eq!(info.earned, 12); // 12.50 at one point per unit
        assert_eq!(info.new_total, 52);
        assert_eq!(sale.customer_name.as_deref(), Some("Yassine"));
    }

    #[tokio::test]
    async fn test_build_sale_points_system_off() {
        let mut ctx = memory_context().await;
        ctx.state.settings.points_system_enabled = false;
        ctx.upsert_product(sample_product("p-1", 1250, 5))
            .await
            .unwrap();
        ctx.upsert_customer(sample_customer("c-1", "Yassine"))
            .await
            .unwrap();

        ctx.add_to_cart("p-1", 1).unwrap();
        let sale = ctx.build_sale(&cash_tender(1250), Some("c-1")).unwrap();

        assert!(sale.points_info.is_none());
        // the customer is still attached to the sale
        assert_eq!(sale.customer_id.as_deref(), Some("c-1"));
    }

    #[tokio::test]
    async fn test_build_sale_unknown_customer() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1250, 5))
            .await
            .unwrap();

        ctx.add_to_cart("p-1", 1).unwrap();
        let sale = ctx.build_sale(&cash_tender(1250), Some("ghost")).unwrap();

        assert!(sale.customer_id.is_none());
        assert!(sale.points_info.is_none());
    }

    #[tokio::test]
    async fn test_commit_updates_stock_and_persists() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.add_to_cart("p-1", 2).unwrap();

        let sale = ctx.build_sale(&cash_tender(2000), None).unwrap();
        let committed = ctx.complete_sale(sale).await.unwrap();

        assert_eq!(ctx.state.products[0].stock, 3);
        assert_eq!(ctx.state.sales.len(), 1);
        assert_eq!(
            ctx.checkout.status(),
            &CommitStatus::Complete {
                sale_id: committed.id.clone()
            }
        );

        // durable too
        assert_eq!(ctx.store().load_products().await[0].stock, 3);
        assert_eq!(ctx.store().load_sales().await.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_clamps_stock_at_zero() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        // cart allows overselling; the commit clamps
        ctx.add_to_cart("p-1", 10).unwrap();

        let sale = ctx.build_sale(&cash_tender(10_000), None).unwrap();
        ctx.complete_sale(sale).await.unwrap();

        assert_eq!(ctx.state.products[0].stock, 0);
    }

    #[tokio::test]
    async fn test_commit_updates_customer_loyalty() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1250, 5))
            .await
            .unwrap();
        let mut customer = sample_customer("c-1", "Yassine");
        customer.points = 40;
        customer.total_spent = Money::from_cents(500);
        ctx.upsert_customer(customer).await.unwrap();

        ctx.add_to_cart("p-1", 1).unwrap();
        let sale = ctx.build_sale(&cash_tender(1250), Some("c-1")).unwrap();
        ctx.complete_sale(sale).await.unwrap();

        let updated = &ctx.state.customers[0];
        assert_eq!(updated.total_spent.cents(), 1750);
        // the committed total is exactly what the receipt promised
        assert_eq!(updated.points, 52);

        let stored = ctx.store().load_customers().await;
        assert_eq!(stored[0].points, 52);
    }

    #[tokio::test]
    async fn test_commit_without_customer_leaves_customers_alone() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.upsert_customer(sample_customer("c-1", "Yassine"))
            .await
            .unwrap();

        ctx.add_to_cart("p-1", 1).unwrap();
        let sale = ctx.build_sale(&cash_tender(1000), None).unwrap();
        ctx.complete_sale(sale).await.unwrap();

        assert_eq!(ctx.state.customers[0].total_spent.cents(), 0);
        assert_eq!(ctx.state.customers[0].points, 0);
    }

    #[tokio::test]
    async fn test_second_commit_while_saving_rejected() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.add_to_cart("p-1", 1).unwrap();
        let sale = ctx.build_sale(&cash_tender(1000), None).unwrap();

        ctx.checkout.status = CommitStatus::Saving;
        let err = ctx.complete_sale(sale).await.unwrap_err();
        assert!(matches!(err, AppError::SaleInProgress));

        // nothing moved
        assert_eq!(ctx.state.products[0].stock, 5);
        assert!(ctx.state.sales.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_rolls_memory_back() {
        let store = memory_store().await;
        store
            .save_products(&[sample_product("p-1", 1000, 5)])
            .await
            .unwrap();

        // every write fails
        let mut ctx = AppContext::start(FlakyStore::new(store.clone(), 0)).await;
        ctx.checkout.verify_delay = Duration::ZERO;
        ctx.add_to_cart("p-1", 2).unwrap();
        let sale = ctx.build_sale(&cash_tender(2000), None).unwrap();

        let err = ctx.complete_sale(sale).await.unwrap_err();
        assert!(matches!(err, AppError::DataSaveFailed { .. }));

        // memory resynced to the untouched durable state
        assert_eq!(ctx.state.products[0].stock, 5);
        assert!(ctx.state.sales.is_empty());
        assert_eq!(store.load_products().await[0].stock, 5);
        assert!(matches!(ctx.checkout.status(), CommitStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_partial_save_failure_resyncs_to_durable_state() {
        let store = memory_store().await;
        store
            .save_products(&[sample_product("p-1", 1000, 5)])
            .await
            .unwrap();

        // products write lands, the sales write fails
        let mut ctx = AppContext::start(FlakyStore::new(store.clone(), 1)).await;
        ctx.checkout.verify_delay = Duration::ZERO;
        ctx.add_to_cart("p-1", 2).unwrap();
        let sale = ctx.build_sale(&cash_tender(2000), None).unwrap();

        let err = ctx.complete_sale(sale).await.unwrap_err();
        assert!(matches!(err, AppError::DataSaveFailed { .. }));

        // the stock decrement is durable, the sale is not; memory says so
        assert_eq!(store.load_products().await[0].stock, 3);
        assert!(store.load_sales().await.is_empty());
        assert_eq!(ctx.state.products[0].stock, 3);
        assert!(ctx.state.sales.is_empty());
    }

    #[tokio::test]
    async fn test_verify_failure_leaves_sale_durable() {
        let store = memory_store().await;
        store
            .save_products(&[sample_product("p-1", 1000, 5)])
            .await
            .unwrap();

        // the first batch lands, the verification batch fails
        let mut ctx = AppContext::start(FlakyStore::new(store.clone(), 3)).await;
        ctx.checkout.verify_delay = Duration::ZERO;
        ctx.add_to_cart("p-1", 2).unwrap();
        let sale = ctx.build_sale(&cash_tender(2000), None).unwrap();

        let err = ctx.complete_sale(sale).await.unwrap_err();
        assert!(matches!(err, AppError::DataVerificationFailed { .. }));

        // the sale survived; memory agrees with disk
        assert_eq!(store.load_sales().await.len(), 1);
        assert_eq!(ctx.state.sales.len(), 1);
        assert_eq!(ctx.state.products[0].stock, 3);
        assert!(matches!(ctx.checkout.status(), CommitStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_start_new_sale_resets_checkout() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.add_to_cart("p-1", 1).unwrap();

        let sale = ctx.build_sale(&cash_tender(1000), None).unwrap();
        ctx.complete_sale(sale).await.unwrap();

        // the receipt screen still sees the cart and the result
        assert!(!ctx.checkout.cart.is_empty());
        assert!(matches!(
            ctx.checkout.status(),
            CommitStatus::Complete { .. }
        ));

        ctx.start_new_sale();
        assert!(ctx.checkout.cart.is_empty());
        assert_eq!(ctx.checkout.status(), &CommitStatus::Idle);
    }

    #[tokio::test]
    async fn test_cart_operations_through_context() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();

        let err = ctx.add_to_cart("ghost", 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::ProductNotFound(_))
        ));

        ctx.add_to_cart("p-1", 1).unwrap();
        ctx.update_cart_quantity("p-1", 4).unwrap();
        assert_eq!(ctx.checkout.cart.total_quantity(), 4);

        ctx.remove_from_cart("p-1").unwrap();
        assert!(ctx.checkout.cart.is_empty());
    }
}
