//! # Backup and Import
//!
//! Whole-system export to a single JSON document, and the matching
//! import path.
//!
//! ## Document Shape
//! ```text
//! souk-backup-2026-08-22.json
//! {
//!   "timestamp":  "2026-08-22T10:15:00Z",
//!   "products":   [ ... ],      ┐
//!   "sales":      [ ... ],      │ every collection, verbatim
//!   "customers":  [ ... ],      │
//!   "suppliers":  [ ... ],      │
//!   "users":      [ ... ],      ┘
//!   "settings":   { ... },
//!   "createdBy":  "admin"
//! }
//! ```
//!
//! Import accepts the same shape with any subset of the collection keys
//! present; only the keys present are applied. Documents are trusted:
//! they come from this system's own exports, not arbitrary input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use souk_core::{AppSettings, Customer, Product, Sale, Supplier, User};
use souk_store::SnapshotStore;

use crate::error::AppResult;
use crate::session::AppContext;

// =============================================================================
// Backup Document
// =============================================================================

/// A complete export of the system at one moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub timestamp: DateTime<Utc>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub users: Vec<User>,
    pub settings: AppSettings,
    /// Username of whoever ran the export.
    pub created_by: String,
}

impl BackupDocument {
    /// Suggested file name, dated from the document's own timestamp.
    pub fn file_name(&self) -> String {
        format!("souk-backup-{}.json", self.timestamp.format("%Y-%m-%d"))
    }

    /// The document as indented JSON, ready to write to a file.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Import Document
// =============================================================================

/// An incoming data file. Every collection is optional so a document can
/// carry a full backup or just the parts being restored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportDocument {
    pub products: Option<Vec<Product>>,
    pub sales: Option<Vec<Sale>>,
    pub customers: Option<Vec<Customer>>,
    pub suppliers: Option<Vec<Supplier>>,
    pub users: Option<Vec<User>>,
    pub settings: Option<AppSettings>,
}

impl ImportDocument {
    /// Parses a document from JSON text, e.g. a backup file's contents.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// Backup / Import Operations
// =============================================================================

impl<S: SnapshotStore> AppContext<S> {
    /// Exports everything as a backup document. Requires a signed-in
    /// user to stamp `created_by`.
    pub fn export_backup(&self) -> AppResult<BackupDocument> {
        let user = self.require_user()?;
        Ok(BackupDocument {
            timestamp: Utc::now(),
            products: self.state.products.clone(),
            sales: self.state.sales.clone(),
            customers: self.state.customers.clone(),
            suppliers: self.state.suppliers.clone(),
            users: self.state.users.clone(),
            settings: self.state.settings.clone(),
            created_by: user.username.clone(),
        })
    }

    /// Applies whichever collections the document carries, replacing the
    /// in-memory collection and persisting it immediately.
    pub async fn import_data(&mut self, doc: ImportDocument) -> AppResult<()> {
        let mut applied: Vec<&str> = Vec::new();

        if let Some(products) = doc.products {
            self.state.products = products;
            self.store.save_products(&self.state.products).await?;
            applied.push("products");
        }
        if let Some(customers) = doc.customers {
            self.state.customers = customers;
            self.store.save_customers(&self.state.customers).await?;
            applied.push("customers");
        }
        if let Some(suppliers) = doc.suppliers {
            self.state.suppliers = suppliers;
            self.store.save_suppliers(&self.state.suppliers).await?;
            applied.push("suppliers");
        }
        if let Some(settings) = doc.settings {
            self.state.settings = settings;
            self.store.save_settings(&self.state.settings).await?;
            applied.push("settings");
        }
        if let Some(sales) = doc.sales {
            self.state.sales = sales;
            self.store.save_sales(&self.state.sales).await?;
            applied.push("sales");
        }
        if let Some(users) = doc.users {
            self.state.users = users;
            self.store.save_users(&self.state.users).await?;
            applied.push("users");
        }

        info!(applied = ?applied, "Data import finished");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::test_support::{memory_context, sample_customer, sample_product, sample_supplier};
    use chrono::TimeZone;
    use souk_core::Language;

    #[tokio::test]
    async fn test_export_requires_signed_in_user() {
        let ctx = memory_context().await;
        let err = ctx.export_backup().unwrap_err();
        assert!(matches!(err, AppError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_export_captures_everything() {
        let mut ctx = memory_context().await;
        ctx.login("admin", "admin", Language::Ar).await.unwrap();
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.upsert_supplier(sample_supplier("s-1", "Atlas Distribution"))
            .await
            .unwrap();

        let backup = ctx.export_backup().unwrap();
        assert_eq!(backup.products.len(), 1);
        assert_eq!(backup.suppliers.len(), 1);
        assert_eq!(backup.users.len(), 2);
        assert_eq!(backup.created_by, "admin");

        let json = backup.to_pretty_json().unwrap();
        assert!(json.contains("\"createdBy\": \"admin\""));
        assert!(json.contains("\"products\""));
    }

    #[test]
    fn test_file_name_uses_document_date() {
        let backup = BackupDocument {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 22, 10, 15, 0).unwrap(),
            products: Vec::new(),
            sales: Vec::new(),
            customers: Vec::new(),
            suppliers: Vec::new(),
            users: Vec::new(),
            settings: AppSettings::default(),
            created_by: "admin".to_string(),
        };
        assert_eq!(backup.file_name(), "souk-backup-2026-08-22.json");
    }

    #[tokio::test]
    async fn test_import_applies_only_present_collections() {
        let mut ctx = memory_context().await;
        ctx.upsert_product(sample_product("p-old", 500, 2))
            .await
            .unwrap();
        ctx.upsert_customer(sample_customer("c-1", "Yassine"))
            .await
            .unwrap();

        let doc = ImportDocument {
            products: Some(vec![
                sample_product("p-new-1", 1000, 5),
                sample_product("p-new-2", 2000, 3),
            ]),
            ..Default::default()
        };
        ctx.import_data(doc).await.unwrap();

        // products replaced wholesale
        assert_eq!(ctx.state.products.len(), 2);
        assert!(ctx.state.find_product("p-old").is_none());
        assert_eq!(ctx.store().load_products().await.len(), 2);

        // absent collections untouched, in memory and on disk
        assert_eq!(ctx.state.customers.len(), 1);
        assert_eq!(ctx.store().load_customers().await.len(), 1);
    }

    #[tokio::test]
    async fn test_import_settings() {
        let mut ctx = memory_context().await;

        let mut settings = AppSettings::default();
        settings.store_name = "Hanout Ali".to_string();
        let doc = ImportDocument {
            settings: Some(settings),
            ..Default::default()
        };
        ctx.import_data(doc).await.unwrap();

        assert_eq!(ctx.state.settings.store_name, "Hanout Ali");
        assert_eq!(ctx.store().load_settings().await.store_name, "Hanout Ali");
    }

    #[tokio::test]
    async fn test_backup_roundtrips_through_import() {
        let mut ctx = memory_context().await;
        ctx.login("admin", "admin", Language::Ar).await.unwrap();
        ctx.upsert_product(sample_product("p-1", 1000, 5))
            .await
            .unwrap();
        ctx.upsert_customer(sample_customer("c-1", "Yassine"))
            .await
            .unwrap();

        let json = ctx.export_backup().unwrap().to_pretty_json().unwrap();

        // restore onto a fresh system
        let mut fresh = memory_context().await;
        let doc = ImportDocument::from_json(&json).unwrap();
        fresh.import_data(doc).await.unwrap();

        assert_eq!(fresh.state.products.len(), 1);
        assert_eq!(fresh.state.customers.len(), 1);
        assert_eq!(fresh.state.users.len(), 2);
        assert_eq!(fresh.store().load_products().await.len(), 1);
    }
}
