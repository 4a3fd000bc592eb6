//! # Application Settings
//!
//! Store-wide configuration: identity, taxes, languages, printing, loyalty
//! program parameters, and security toggles.
//!
//! ## Merge-on-Load
//! Settings are persisted as one JSON snapshot. Older installations may have
//! saved a shape that predates fields added since, so deserialization runs
//! through an upgrade path instead of failing:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ stored JSON  │ ──▶ │  StoredSettings  │ ──▶ │   AppSettings    │
//! │ (any vintage)│     │  (every field    │     │  (complete, all  │
//! └──────────────┘     │   optional)      │     │   fields filled) │
//!                      └──────────────────┘     └──────────────────┘
//! ```
//!
//! Fields missing from the stored shape take their hardcoded defaults.
//! Two fields have backfill rules instead of plain defaults:
//! - `interfaceLanguage` absent → falls back to the stored `language`
//! - `autoDetectLanguage` absent → `false`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::loyalty::LoyaltyRate;
use crate::types::{Language, TaxRate};

// =============================================================================
// Theme
// =============================================================================

/// Interface color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

// =============================================================================
// Receipt Size
// =============================================================================

/// Paper format receipts are laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReceiptSize {
    /// 80mm thermal roll.
    #[serde(rename = "thermal")]
    Thermal,
    #[serde(rename = "A5")]
    A5,
    #[serde(rename = "A4")]
    A4,
}

impl Default for ReceiptSize {
    fn default() -> Self {
        ReceiptSize::Thermal
    }
}

// =============================================================================
// Printer Configuration
// =============================================================================

/// Print darkness level for thermal printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PrinterDensity {
    Light,
    Medium,
    Heavy,
}

impl Default for PrinterDensity {
    fn default() -> Self {
        PrinterDensity::Medium
    }
}

/// Receipt printer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinterConfig {
    /// Body font size in points.
    pub font_size: u32,
    pub density: PrinterDensity,
    /// Cut the paper automatically after each receipt.
    pub auto_cut: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            font_size: 12,
            density: PrinterDensity::Medium,
            auto_cut: true,
        }
    }
}

// =============================================================================
// Security Settings
// =============================================================================

/// Confirmation and safety toggles for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub confirm_delete_inventory: bool,
    pub confirm_delete_customers: bool,
    pub confirm_delete_suppliers: bool,
    pub confirm_delete_users: bool,
    /// Require the admin password before a full system reset.
    pub admin_password_required_for_reset: bool,
    /// Export a backup automatically before erasing everything.
    pub auto_backup_before_reset: bool,
    /// How many rotated backup files to keep around.
    pub max_backup_files: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        SecuritySettings {
            confirm_delete_inventory: true,
            confirm_delete_customers: true,
            confirm_delete_suppliers: true,
            confirm_delete_users: true,
            admin_password_required_for_reset: true,
            auto_backup_before_reset: true,
            max_backup_files: 5,
        }
    }
}

// =============================================================================
// Application Settings
// =============================================================================

/// The full application configuration.
///
/// Deserialization accepts any older stored shape and upgrades it field by
/// field (see the module docs), so `settings` snapshots written by previous
/// versions keep loading after fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Store name shown in the header and on receipts.
    pub store_name: String,
    /// Tagline shown under the store name.
    pub store_subtitle: String,

    /// Tax applied at checkout.
    pub tax_rate: TaxRate,
    /// ISO 4217 currency code (display only; amounts are integer cents).
    pub currency: String,

    pub language: Language,
    pub receipt_language: Language,
    pub theme: Theme,

    pub receipt_size: ReceiptSize,
    pub printer_config: PrinterConfig,

    pub enable_camera: bool,
    #[serde(rename = "enableHIDScanner")]
    #[ts(rename = "enableHIDScanner")]
    pub enable_hid_scanner: bool,

    /// Master switch for the loyalty program.
    pub points_system_enabled: bool,
    /// Points earned per currency unit spent.
    pub loyalty_rate: LoyaltyRate,
    /// Balance needed before a voucher can be redeemed.
    pub min_points_for_voucher: i64,

    pub security: SecuritySettings,

    pub auto_detect_language: bool,
    /// Language the interface renders in. Kept separate from `language`
    /// so receipt and screen languages can diverge.
    pub interface_language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            store_name: "SOUK | السوق".to_string(),
            store_subtitle: "نظام إدارة المبيعات الذكي".to_string(),
            tax_rate: TaxRate::zero(),
            currency: "MAD".to_string(),
            language: Language::Ar,
            receipt_language: Language::Ar,
            theme: Theme::Dark,
            receipt_size: ReceiptSize::Thermal,
            printer_config: PrinterConfig::default(),
            enable_camera: true,
            enable_hid_scanner: true,
            points_system_enabled: true,
            loyalty_rate: LoyaltyRate::default(),
            min_points_for_voucher: 100,
            security: SecuritySettings::default(),
            auto_detect_language: false,
            interface_language: Language::Ar,
        }
    }
}

impl AppSettings {
    /// Applies a user's chosen language to both screen and base language.
    ///
    /// Called at login so the till comes up in the cashier's language.
    /// Receipt language is left alone: it belongs to the store, not the
    /// cashier.
    pub fn apply_language(&mut self, language: Language) {
        self.language = language;
        self.interface_language = language;
    }
}

impl<'de> Deserialize<'de> for AppSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        StoredSettings::deserialize(deserializer).map(AppSettings::from)
    }
}

// =============================================================================
// Stored Shape Upgrade
// =============================================================================

/// The on-disk settings shape, with every field optional.
///
/// Missing fields fall back to this struct's `Default`, which mirrors
/// `AppSettings::default()`. The two `Option` fields carry the backfill
/// rules described in the module docs.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredSettings {
    store_name: String,
    store_subtitle: String,
    tax_rate: TaxRate,
    currency: String,
    language: Language,
    receipt_language: Language,
    theme: Theme,
    receipt_size: ReceiptSize,
    printer_config: PrinterConfig,
    enable_camera: bool,
    #[serde(rename = "enableHIDScanner")]
    enable_hid_scanner: bool,
    points_system_enabled: bool,
    loyalty_rate: LoyaltyRate,
    min_points_for_voucher: i64,
    security: SecuritySettings,
    auto_detect_language: Option<bool>,
    interface_language: Option<Language>,
}

impl Default for StoredSettings {
    fn default() -> Self {
        let base = AppSettings::default();
        StoredSettings {
            store_name: base.store_name,
            store_subtitle: base.store_subtitle,
            tax_rate: base.tax_rate,
            currency: base.currency,
            language: base.language,
            receipt_language: base.receipt_language,
            theme: base.theme,
            receipt_size: base.receipt_size,
            printer_config: base.printer_config,
            enable_camera: base.enable_camera,
            enable_hid_scanner: base.enable_hid_scanner,
            points_system_enabled: base.points_system_enabled,
            loyalty_rate: base.loyalty_rate,
            min_points_for_voucher: base.min_points_for_voucher,
            security: base.security,
            auto_detect_language: None,
            interface_language: None,
        }
    }
}

impl From<StoredSettings> for AppSettings {
    fn from(s: StoredSettings) -> Self {
        AppSettings {
            store_name: s.store_name,
            store_subtitle: s.store_subtitle,
            tax_rate: s.tax_rate,
            currency: s.currency,
            language: s.language,
            receipt_language: s.receipt_language,
            theme: s.theme,
            receipt_size: s.receipt_size,
            printer_config: s.printer_config,
            enable_camera: s.enable_camera,
            enable_hid_scanner: s.enable_hid_scanner,
            points_system_enabled: s.points_system_enabled,
            loyalty_rate: s.loyalty_rate,
            min_points_for_voucher: s.min_points_for_voucher,
            security: s.security,
            auto_detect_language: s.auto_detect_language.unwrap_or(false),
            interface_language: s.interface_language.unwrap_or(s.language),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
