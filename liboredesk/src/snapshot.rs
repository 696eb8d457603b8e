//! The immutable state snapshot
//!
//! A `Snapshot` holds every entity collection at one point in time. Each
//! collection sits behind an `Arc`, so applying an action clones only the
//! slices it touches; everything else stays pointer-identical to the input
//! snapshot. Consumers detect "this slice changed" with [`Arc::ptr_eq`].
//!
//! Holders of an old snapshot must treat it as a frozen value; mutation only
//! ever happens by producing a new snapshot through
//! [`crate::transition::apply`].

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::{Result, SnapshotError};
use crate::types::{
    ActiveTestingOrder, AppActivity, Dispute, Enquiry, Facility, LogisticsDetails, Mineral, Order,
    PartnerThirdPartyEntry, PaymentMethod, Payout, RegistryUser, Transaction, VerificationLogEntry,
};

/// The complete, immutable state of all entity collections
///
/// The suspended/restricted id-sets are deliberately kept as side-tables
/// rather than flags on the user records, so membership toggles never
/// rewrite a user. The raw sets stay private; use
/// [`Snapshot::is_suspended`] and [`Snapshot::is_restricted`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Snapshot {
    /// Single order table; buy/sell views are filtered projections
    pub orders: Arc<Vec<Order>>,
    pub transactions: Arc<Vec<Transaction>>,
    /// At most one logistics record per order id
    pub logistics: Arc<HashMap<String, LogisticsDetails>>,
    pub third_party_entries: Arc<Vec<PartnerThirdPartyEntry>>,
    pub users: Arc<Vec<RegistryUser>>,
    pub(crate) suspended_users: Arc<HashSet<String>>,
    pub(crate) restricted_users: Arc<HashSet<String>>,
    /// Newest first, capped at 200
    pub activities: Arc<Vec<AppActivity>>,
    /// Newest first, capped at 500
    pub verification_log: Arc<Vec<VerificationLogEntry>>,
    pub enquiries: Arc<Vec<Enquiry>>,
    pub disputes: Arc<Vec<Dispute>>,
    pub payouts: Arc<Vec<Payout>>,
    pub facilities: Arc<Vec<Facility>>,
    pub payment_methods: Arc<Vec<PaymentMethod>>,
    pub active_testing_orders: Arc<Vec<ActiveTestingOrder>>,
    pub minerals: Arc<Vec<Mineral>>,
    pub custom_categories: Arc<Vec<String>>,
}

impl Snapshot {
    /// An empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action, returning the successor snapshot
    ///
    /// Convenience for [`crate::transition::apply`].
    pub fn apply(&self, action: Action) -> Snapshot {
        crate::transition::apply(self, action)
    }

    /// Whether the user id is in the suspended side-table
    pub fn is_suspended(&self, user_id: &str) -> bool {
        self.suspended_users.contains(user_id)
    }

    /// Whether the user id is in the restricted side-table
    pub fn is_restricted(&self, user_id: &str) -> bool {
        self.restricted_users.contains(user_id)
    }

    /// Look up an order by id
    pub fn order_by_id(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Look up a registry user by id
    pub fn user_by_id(&self, user_id: &str) -> Option<&RegistryUser> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot = serde_json::from_str(json).map_err(SnapshotError::Parse)?;
        Ok(snapshot)
    }

    /// Load a snapshot from a JSON seed file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(SnapshotError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self).map_err(SnapshotError::Parse)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderType;
    use std::io::Write;

    #[test]
    fn test_new_snapshot_is_empty() {
        let snapshot = Snapshot::new();

        assert!(snapshot.orders.is_empty());
        assert!(snapshot.transactions.is_empty());
        assert!(snapshot.logistics.is_empty());
        assert!(snapshot.users.is_empty());
        assert!(snapshot.custom_categories.is_empty());
    }

    #[test]
    fn test_side_table_accessors_on_empty_snapshot() {
        let snapshot = Snapshot::new();
        assert!(!snapshot.is_suspended("U-1"));
        assert!(!snapshot.is_restricted("U-1"));
    }

    #[test]
    fn test_order_lookup() {
        let order = Order::new(OrderType::Buy, "Copper", 10.0, "t", "USD", "25,000");
        let order_id = order.id.clone();
        let snapshot = Snapshot {
            orders: Arc::new(vec![order]),
            ..Snapshot::new()
        };

        assert!(snapshot.order_by_id(&order_id).is_some());
        assert!(snapshot.order_by_id("missing").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = Snapshot {
            orders: Arc::new(vec![Order::new(
                OrderType::Sell,
                "Cobalt",
                3.0,
                "t",
                "EUR",
                "60,000",
            )]),
            custom_categories: Arc::new(vec!["Battery Metals".to_string()]),
            ..Snapshot::new()
        };

        let json = snapshot.to_json_string().unwrap();
        let parsed = Snapshot::from_json_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_from_json_str_tolerates_missing_collections() {
        let parsed = Snapshot::from_json_str("{}").unwrap();
        assert_eq!(parsed, Snapshot::new());
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(Snapshot::from_json_str("not json").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let snapshot = Snapshot::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", snapshot.to_json_string().unwrap()).unwrap();

        let loaded = Snapshot::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let result = Snapshot::from_json_file(Path::new("/nonexistent/snapshot.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_clone_shares_collections() {
        let snapshot = Snapshot {
            orders: Arc::new(vec![Order::new(
                OrderType::Buy,
                "Copper",
                1.0,
                "t",
                "USD",
                "100",
            )]),
            ..Snapshot::new()
        };

        let clone = snapshot.clone();
        assert!(Arc::ptr_eq(&snapshot.orders, &clone.orders));
        assert!(Arc::ptr_eq(&snapshot.users, &clone.users));
    }
}
