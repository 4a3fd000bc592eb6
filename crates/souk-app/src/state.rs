//! # Application State
//!
//! The in-memory working copy of every collection. Loaded once at
//! startup, mutated by the session workflows, and persisted back through
//! the snapshot store whenever something changes.
//!
//! ## Memory / Store Relationship
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │   startup            AppState::load()        snapshot store         │
//! │   ────────────────────────────────────────────────────────────      │
//! │   products  ◄─────────── load_products ───────── "products"         │
//! │   sales     ◄─────────── load_sales ──────────── "sales"            │
//! │   customers ◄─────────── load_customers ──────── "customers"        │
//! │   suppliers ◄─────────── load_suppliers ──────── "suppliers"        │
//! │   users     ◄─────────── load_users (seeds) ──── "users"            │
//! │   settings  ◄─────────── load_settings (merge) ─ "settings"         │
//! │   user      ◄─────────── load_current_user ───── "currentUser"      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutation helpers here are pure in-memory edits; persistence is the
//! caller's job so each workflow controls its own write ordering.

use tracing::info;

use souk_core::{AppSettings, Customer, Product, Sale, Supplier, User};
use souk_store::SnapshotStore;

/// Everything the till works with, as plain owned collections.
#[derive(Debug, Clone)]
pub struct AppState {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub users: Vec<User>,
    pub settings: AppSettings,
    /// Signed-in user, restored across restarts until an explicit logout.
    pub current_user: Option<User>,
}

impl AppState {
    /// Loads every collection from the store, applying each key's
    /// default/seed policy.
    pub async fn load<S: SnapshotStore>(store: &S) -> Self {
        let products = store.load_products().await;
        let sales = store.load_sales().await;
        let customers = store.load_customers().await;
        let suppliers = store.load_suppliers().await;
        let users = store.load_users().await;
        let settings = store.load_settings().await;
        let current_user = store.load_current_user().await;

        info!(
            products = products.len(),
            sales = sales.len(),
            customers = customers.len(),
            suppliers = suppliers.len(),
            users = users.len(),
            signed_in = current_user.is_some(),
            "State loaded"
        );

        AppState {
            products,
            sales,
            customers,
            suppliers,
            users,
            settings,
            current_user,
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// First admin account in the list; the reset workflow checks its
    /// password.
    pub fn first_admin(&self) -> Option<&User> {
        self.users.iter().find(|u| u.is_admin())
    }

    // =========================================================================
    // In-memory edits (persistence is the caller's job)
    // =========================================================================

    /// Replaces the product with the same id, or appends it.
    pub fn upsert_product(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => self.products.push(product),
        }
    }

    /// Removes a product by id. Returns whether anything was removed.
    pub fn remove_product(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }

    pub fn upsert_customer(&mut self, customer: Customer) {
        match self.customers.iter_mut().find(|c| c.id == customer.id) {
            Some(slot) => *slot = customer,
            None => self.customers.push(customer),
        }
    }

    pub fn remove_customer(&mut self, id: &str) -> bool {
        let before = self.customers.len();
        self.customers.retain(|c| c.id != id);
        self.customers.len() != before
    }

    pub fn upsert_supplier(&mut self, supplier: Supplier) {
        match self.suppliers.iter_mut().find(|s| s.id == supplier.id) {
            Some(slot) => *slot = supplier,
            None => self.suppliers.push(supplier),
        }
    }

    pub fn remove_supplier(&mut self, id: &str) -> bool {
        let before = self.suppliers.len();
        self.suppliers.retain(|s| s.id != id);
        self.suppliers.len() != before
    }

    pub fn upsert_user(&mut self, user: User) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => *slot = user,
            None => self.users.push(user),
        }
    }

    pub fn remove_user(&mut self, id: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.users.len() != before
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_product;
    use souk_store::{SqliteStore, StoreConfig};

    #[tokio::test]
    async fn test_load_fresh_store() {
        let store = SqliteStore::new(StoreConfig::in_memory()).await.unwrap();
        let state = AppState::load(&store).await;

        assert!(state.products.is_empty());
        assert!(state.sales.is_empty());
        assert_eq!(state.users.len(), 2); // seeded accounts
        assert!(state.current_user.is_none());
        assert_eq!(state.settings, AppSettings::default());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut state = AppState {
            products: vec![sample_product("p-1", 1000, 5)],
            sales: Vec::new(),
            customers: Vec::new(),
            suppliers: Vec::new(),
            users: Vec::new(),
            settings: AppSettings::default(),
            current_user: None,
        };

        let mut updated = sample_product("p-1", 1000, 5);
        updated.stock = 42;
        state.upsert_product(updated);
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products[0].stock, 42);

        state.upsert_product(sample_product("p-2", 500, 1));
        assert_eq!(state.products.len(), 2);
    }

    #[test]
    fn test_remove_reports_whether_found() {
        let mut state = AppState {
            products: vec![sample_product("p-1", 1000, 5)],
            sales: Vec::new(),
            customers: Vec::new(),
            suppliers: Vec::new(),
            users: User::default_accounts(),
            settings: AppSettings::default(),
            current_user: None,
        };

        assert!(state.remove_product("p-1"));
        assert!(!state.remove_product("p-1"));
        assert!(state.products.is_empty());
    }

    #[test]
    fn test_first_admin() {
        let state = AppState {
            products: Vec::new(),
            sales: Vec::new(),
            customers: Vec::new(),
            suppliers: Vec::new(),
            users: User::default_accounts(),
            settings: AppSettings::default(),
            current_user: None,
        };

        assert_eq!(state.first_admin().unwrap().username, "admin");
    }
}
