//! # Snapshot Keys
//!
//! The fixed set of keys the store persists. Each key maps to exactly one
//! JSON snapshot in the `snapshots` table, and the wire spelling below is
//! the row key, so it must never change once data exists.

use std::fmt;

/// A persisted snapshot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Products,
    Sales,
    Customers,
    Suppliers,
    Users,
    CurrentUser,
    Settings,
}

impl StoreKey {
    /// Every key, in the order the application loads them at startup.
    pub const ALL: [StoreKey; 7] = [
        StoreKey::Products,
        StoreKey::Sales,
        StoreKey::Customers,
        StoreKey::Suppliers,
        StoreKey::Users,
        StoreKey::CurrentUser,
        StoreKey::Settings,
    ];

    /// The row key in the `snapshots` table.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Products => "products",
            StoreKey::Sales => "sales",
            StoreKey::Customers => "customers",
            StoreKey::Suppliers => "suppliers",
            StoreKey::Users => "users",
            StoreKey::CurrentUser => "currentUser",
            StoreKey::Settings => "settings",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spellings() {
        assert_eq!(StoreKey::Products.as_str(), "products");
        assert_eq!(StoreKey::CurrentUser.as_str(), "currentUser");
        assert_eq!(StoreKey::Settings.as_str(), "settings");
    }

    #[test]
    fn test_all_keys_distinct() {
        for (i, a) in StoreKey::ALL.iter().enumerate() {
            for b in &StoreKey::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
