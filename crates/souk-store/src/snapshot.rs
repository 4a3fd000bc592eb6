//! # Snapshot Store Contract
//!
//! The storage seam between the session layer and durable storage.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SnapshotStore                                     │
//! │                                                                         │
//! │  Required (what a backend implements)                                   │
//! │  ────────────────────────────────────                                   │
//! │  put_raw(key, json)     write one snapshot, atomically per key          │
//! │  get_raw(key)           read one snapshot, None if absent               │
//! │  remove(key)            delete one snapshot                             │
//! │  erase_all()            delete every snapshot (system reset)            │
//! │                                                                         │
//! │  Provided (shared policy, same for every backend)                       │
//! │  ────────────────────────────────────────────────                       │
//! │  save / load_or         JSON encoding + default-on-failure              │
//! │  load_products, ...     per-collection defaults                         │
//! │  load_users             seeds the two builtin accounts on first run     │
//! │  load_settings          merge-on-load upgrade path                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Writes are atomic per key and nothing more. A logical update spanning
//! several collections (a committed sale touches three) is sequenced by
//! the caller; this layer makes no cross-key promises.
//!
//! ## Why Defaults Instead of Errors on Load
//! A till must come up even with a missing or damaged data file. Every
//! load degrades to a well-defined default and logs what happened; the
//! only hard failures are writes, which callers must react to.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use souk_core::{AppSettings, Customer, Product, Sale, Supplier, User};

use crate::error::StoreResult;
use crate::keys::StoreKey;

/// Durable key/value snapshot storage.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Writes one snapshot. The write replaces the previous document for
    /// this key or fails leaving it untouched.
    async fn put_raw(&self, key: StoreKey, json: &str) -> StoreResult<()>;

    /// Reads one snapshot. `None` if the key has never been written or
    /// was removed.
    async fn get_raw(&self, key: StoreKey) -> StoreResult<Option<String>>;

    /// Deletes one snapshot.
    async fn remove(&self, key: StoreKey) -> StoreResult<()>;

    /// Deletes every snapshot. Only the system reset calls this.
    async fn erase_all(&self) -> StoreResult<()>;

    // =========================================================================
    // Provided: encoding and defaults
    // =========================================================================

    /// Serializes a value and writes it under `key`.
    async fn save<T>(&self, key: StoreKey, value: &T) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let json = serde_json::to_string(value)?;
        self.put_raw(key, &json).await
    }

    /// Loads and deserializes a snapshot, falling back to `default` when
    /// the key is absent, the payload is corrupt, or the read itself
    /// fails.
    async fn load_or<T, F>(&self, key: StoreKey, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T + Send,
    {
        match self.get_raw(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key = %key, error = %err, "Corrupt snapshot, using defaults");
                    default()
                }
            },
            Ok(None) => {
                debug!(key = %key, "No snapshot yet, using defaults");
                default()
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Snapshot read failed, using defaults");
                default()
            }
        }
    }

    // =========================================================================
    // Provided: per-collection policies
    // =========================================================================

    async fn save_products(&self, products: &[Product]) -> StoreResult<()> {
        self.save(StoreKey::Products, &products).await
    }

    async fn load_products(&self) -> Vec<Product> {
        self.load_or(StoreKey::Products, Vec::new).await
    }

    async fn save_sales(&self, sales: &[Sale]) -> StoreResult<()> {
        self.save(StoreKey::Sales, &sales).await
    }

    async fn load_sales(&self) -> Vec<Sale> {
        self.load_or(StoreKey::Sales, Vec::new).await
    }

    async fn save_customers(&self, customers: &[Customer]) -> StoreResult<()> {
        self.save(StoreKey::Customers, &customers).await
    }

    async fn load_customers(&self) -> Vec<Customer> {
        self.load_or(StoreKey::Customers, Vec::new).await
    }

    async fn save_suppliers(&self, suppliers: &[Supplier]) -> StoreResult<()> {
        self.save(StoreKey::Suppliers, &suppliers).await
    }

    async fn load_suppliers(&self) -> Vec<Supplier> {
        self.load_or(StoreKey::Suppliers, Vec::new).await
    }

    async fn save_users(&self, users: &[User]) -> StoreResult<()> {
        self.save(StoreKey::Users, &users).await
    }

    /// Loads the user accounts.
    ///
    /// ## Rules
    /// A fresh or unreadable `users` snapshot seeds the two builtin
    /// accounts (admin/admin, seller/seller) so the till is never locked
    /// out. A present, valid snapshot is honored as-is: an admin who
    /// deliberately emptied the list keeps it empty.
    async fn load_users(&self) -> Vec<User> {
        self.load_or(StoreKey::Users, User::default_accounts).await
    }

    async fn save_settings(&self, settings: &AppSettings) -> StoreResult<()> {
        self.save(StoreKey::Settings, settings).await
    }

    /// Loads the settings through the merge-on-load upgrade path: fields
    /// missing from an older stored shape take defaults, everything the
    /// user customized survives.
    async fn load_settings(&self) -> AppSettings {
        self.load_or(StoreKey::Settings, AppSettings::default).await
    }

    async fn save_current_user(&self, user: &User) -> StoreResult<()> {
        self.save(StoreKey::CurrentUser, user).await
    }

    async fn load_current_user(&self) -> Option<User> {
        self.load_or(StoreKey::CurrentUser, || None).await
    }

    /// Logout: forget the signed-in user without touching their account.
    async fn clear_current_user(&self) -> StoreResult<()> {
        self.remove(StoreKey::CurrentUser).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::{SqliteStore, StoreConfig};
    use souk_core::{Language, Money, RollingStats, Theme, UserRole};

    async fn memory_store() -> SqliteStore {
        SqliteStore::new(StoreConfig::in_memory()).await.unwrap()
    }

    fn sample_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            barcode: format!("BAR-{}", id),
            price: Money::from_cents(1250),
            cost: Money::from_cents(800),
            stock: 5,
            min_stock: 2,
            category: "grocery".to_string(),
            supplier_id: "s-1".to_string(),
            image: None,
            sales_stats: RollingStats::default(),
        }
    }

    #[tokio::test]
    async fn test_products_roundtrip() {
        let store = memory_store().await;

        assert!(store.load_products().await.is_empty());

        let products = vec![sample_product("p-1"), sample_product("p-2")];
        store.save_products(&products).await.unwrap();

        assert_eq!(store.load_products().await, products);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_falls_back_to_default() {
        let store = memory_store().await;
        store
            .put_raw(StoreKey::Products, "{not valid json")
            .await
            .unwrap();

        assert!(store.load_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_users_seeded_on_first_run() {
        let store = memory_store().await;

        let users = store.load_users().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "admin");
        assert_eq!(users[0].role, UserRole::Admin);
        assert_eq!(users[1].username, "seller");
    }

    #[tokio::test]
    async fn test_users_kept_empty_when_deliberately_emptied() {
        let store = memory_store().await;

        store.save_users(&[]).await.unwrap();
        assert!(store.load_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_users_reseeded_on_corrupt_snapshot() {
        let store = memory_store().await;

        store.put_raw(StoreKey::Users, "[{broken").await.unwrap();
        let users = store.load_users().await;
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_settings_merge_through_store() {
        let store = memory_store().await;

        // An older shape with only a few fields persisted
        store
            .put_raw(
                StoreKey::Settings,
                r#"{"theme": "light", "language": "en", "currency": "MAD"}"#,
            )
            .await
            .unwrap();

        let settings = store.load_settings().await;
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.language, Language::En);
        // backfilled from the stored language
        assert_eq!(settings.interface_language, Language::En);
        // untouched fields take defaults
        assert!(settings.points_system_enabled);
        assert_eq!(settings.security.max_backup_files, 5);
    }

    #[tokio::test]
    async fn test_current_user_lifecycle() {
        let store = memory_store().await;

        assert!(store.load_current_user().await.is_none());

        let users = store.load_users().await;
        store.save_current_user(&users[0]).await.unwrap();
        let current = store.load_current_user().await.unwrap();
        assert_eq!(current.username, "admin");

        store.clear_current_user().await.unwrap();
        assert!(store.load_current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_erase_all_clears_every_key() {
        let store = memory_store().await;

        store.save_products(&[sample_product("p-1")]).await.unwrap();
        store
            .save_settings(&AppSettings::default())
            .await
            .unwrap();

        store.erase_all().await.unwrap();

        assert!(store.get_raw(StoreKey::Products).await.unwrap().is_none());
        assert!(store.get_raw(StoreKey::Settings).await.unwrap().is_none());
        // load after erase behaves like a fresh install
        assert_eq!(store.load_users().await.len(), 2);
    }
}
