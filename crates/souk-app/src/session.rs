//! # Session
//!
//! `AppContext` is the one object a UI shell drives: it owns the store,
//! the in-memory state, and the active checkout.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AppContext Lifecycle                             │
//! │                                                                         │
//! │   start(store) ──► load collections ──► restore signed-in user         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   login(username, password, language)                                   │
//! │        │   • stamps the chosen language on the session user             │
//! │        │   • switches app + interface language (receipt stays)          │
//! │        ▼                                                                │
//! │   ring up sales / edit catalog / run reports                            │
//! │        │   every edit: validate ──► mutate memory ──► persist           │
//! │        ▼                                                                │
//! │   logout() ──► clear session user + cart, keep all data                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Policy
//! Catalog edits persist the whole collection immediately; there is no
//! dirty tracking and no batching. The datasets are till-sized and the
//! simplest policy is the one that cannot lose an edit.

use chrono::Utc;
use tracing::{info, warn};

use souk_core::reports::{self, ProductPerformance};
use souk_core::validation;
use souk_core::{AppSettings, CoreError, Customer, Language, Product, Supplier, User};
use souk_store::SnapshotStore;

use crate::checkout::CheckoutSession;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A running till session: store, state, and the active checkout.
pub struct AppContext<S: SnapshotStore> {
    pub(crate) store: S,
    pub state: AppState,
    pub checkout: CheckoutSession,
}

impl<S: SnapshotStore> AppContext<S> {
    /// Opens a session over the given store, loading all collections and
    /// restoring the previously signed-in user if any.
    pub async fn start(store: S) -> Self {
        let state = AppState::load(&store).await;
        AppContext {
            store,
            state,
            checkout: CheckoutSession::new(),
        }
    }

    /// The underlying store, for direct inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Signs a user in with the language they picked on the login screen.
    ///
    /// The chosen language is stamped onto the session copy of the user
    /// (their stored account is untouched) and becomes the app and
    /// interface language. The receipt language is a separate setting and
    /// does not move.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        language: Language,
    ) -> AppResult<User> {
        let found = self
            .state
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned();

        let Some(mut user) = found else {
            warn!(username, "Login rejected");
            return Err(AppError::AuthenticationFailed);
        };

        user.language = Some(language);
        self.store.save_current_user(&user).await?;

        self.state.settings.apply_language(language);
        self.store.save_settings(&self.state.settings).await?;

        info!(username = %user.username, role = ?user.role, "User signed in");
        self.state.current_user = Some(user.clone());
        Ok(user)
    }

    /// Signs the current user out and abandons the cart. All data stays.
    pub async fn logout(&mut self) -> AppResult<()> {
        if let Some(user) = self.state.current_user.take() {
            info!(username = %user.username, "User signed out");
        }
        self.checkout.abandon();
        self.store.clear_current_user().await?;
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.current_user.as_ref()
    }

    /// The signed-in user, or `NotSignedIn`.
    pub fn require_user(&self) -> AppResult<&User> {
        self.state.current_user.as_ref().ok_or(AppError::NotSignedIn)
    }

    /// The signed-in user if they are an admin, or `Unauthorized`.
    pub fn require_admin(&self, operation: &str) -> AppResult<&User> {
        match &self.state.current_user {
            Some(user) if user.is_admin() => Ok(user),
            _ => Err(AppError::Unauthorized {
                operation: operation.to_string(),
            }),
        }
    }

    // =========================================================================
    // Catalog and People
    // =========================================================================

    /// Adds or updates a product, persisting the collection.
    pub async fn upsert_product(&mut self, product: Product) -> AppResult<()> {
        validation::validate_product(&product).map_err(CoreError::from)?;
        self.state.upsert_product(product);
        self.store.save_products(&self.state.products).await?;
        Ok(())
    }

    pub async fn remove_product(&mut self, id: &str) -> AppResult<()> {
        if self.state.remove_product(id) {
            self.store.save_products(&self.state.products).await?;
        }
        Ok(())
    }

    pub async fn upsert_customer(&mut self, customer: Customer) -> AppResult<()> {
        validation::validate_customer(&customer).map_err(CoreError::from)?;
        self.state.upsert_customer(customer);
        self.store.save_customers(&self.state.customers).await?;
        Ok(())
    }

    pub async fn remove_customer(&mut self, id: &str) -> AppResult<()> {
        if self.state.remove_customer(id) {
            self.store.save_customers(&self.state.customers).await?;
        }
        Ok(())
    }

    pub async fn upsert_supplier(&mut self, supplier: Supplier) -> AppResult<()> {
        validation::validate_supplier(&supplier).map_err(CoreError::from)?;
        self.state.upsert_supplier(supplier);
        self.store.save_suppliers(&self.state.suppliers).await?;
        Ok(())
    }

    pub async fn remove_supplier(&mut self, id: &str) -> AppResult<()> {
        if self.state.remove_supplier(id) {
            self.store.save_suppliers(&self.state.suppliers).await?;
        }
        Ok(())
    }

    /// Adds or updates a user account. Admin only.
    pub async fn upsert_user(&mut self, user: User) -> AppResult<()> {
        self.require_admin("manage user accounts")?;
        validation::validate_user(&user).map_err(CoreError::from)?;
        self.state.upsert_user(user);
        self.store.save_users(&self.state.users).await?;
        Ok(())
    }

    /// Removes a user account. Admin only.
    pub async fn remove_user(&mut self, id: &str) -> AppResult<()> {
        self.require_admin("manage user accounts")?;
        if self.state.remove_user(id) {
            self.store.save_users(&self.state.users).await?;
        }
        Ok(())
    }

    /// Replaces the settings and persists them.
    pub async fn update_settings(&mut self, settings: AppSettings) -> AppResult<()> {
        validation::validate_tax_rate(settings.tax_rate).map_err(CoreError::from)?;
        self.state.settings = settings;
        self.store.save_settings(&self.state.settings).await?;
        Ok(())
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    pub fn top_customers(&self) -> Vec<Customer> {
        reports::top_customers(&self.state.customers)
    }

    pub fn top_products(&self) -> Vec<ProductPerformance> {
        reports::top_products(&self.state.sales, &self.state.products)
    }

    pub fn customer_purchase_history(&self, customer_id: &str) -> Vec<ProductPerformance> {
        reports::customer_purchase_history(&self.state.sales, &self.state.products, customer_id)
    }

    pub fn low_stock_products(&self) -> Vec<Product> {
        reports::low_stock(&self.state.products)
    }

    /// Recomputes the rolling sales and visit counters from the sales
    /// log. Cheap enough to run whenever the dashboard opens.
    pub fn refresh_statistics(&mut self) {
        let now = Utc::now();
        reports::refresh_sales_stats(&mut self.state.products, &self.state.sales, now);
        reports::refresh_visit_stats(&mut self.state.customers, &self.state.sales, now);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
