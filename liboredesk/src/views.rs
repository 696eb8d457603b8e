//! Derived read-only views over a snapshot
//!
//! Pure projections: same snapshot in, same value out, input never mutated.
//! Dangling soft references degrade to sentinel values rather than failing.

use serde::Serialize;

use crate::flow;
use crate::snapshot::Snapshot;
use crate::types::{
    LogisticsDetails, Order, PartnerThirdPartyEntry, RegistryUser, Transaction, TransactionStatus,
};

/// Sentinel shown when a user cannot be resolved
pub const UNKNOWN_USER: &str = "—";

/// Resolve a user id to a display name
///
/// Returns [`UNKNOWN_USER`] when the id is absent, empty, or unknown.
pub fn resolve_user_name<'a>(users: &'a [RegistryUser], user_id: Option<&str>) -> &'a str {
    match user_id {
        Some(id) if !id.is_empty() => users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.as_str())
            .unwrap_or(UNKNOWN_USER),
        _ => UNKNOWN_USER,
    }
}

/// Whether an order crosses a border
///
/// Buyer country: explicit `buyer_country`, else the linked user's country.
/// Seller country: explicit `seller_country`, else the facility's, else the
/// delivery location's. True iff both sides are known and differ after
/// trimming (case-sensitive); unknown on either side is not international.
pub fn is_order_international(order: &Order, users: &[RegistryUser]) -> bool {
    let buyer = known_country(order.buyer_country.as_deref()).or_else(|| {
        order
            .user_id
            .as_deref()
            .and_then(|id| users.iter().find(|u| u.id == id))
            .and_then(|u| known_country(u.country.as_deref()))
    });

    let seller = known_country(order.seller_country.as_deref())
        .or_else(|| {
            order
                .facility
                .as_ref()
                .and_then(|f| known_country(f.country.as_deref()))
        })
        .or_else(|| {
            order
                .delivery_location
                .as_ref()
                .and_then(|d| known_country(d.country.as_deref()))
        });

    match (buyer, seller) {
        (Some(b), Some(s)) => b != s,
        _ => false,
    }
}

/// Whether a settlement crosses a border
///
/// An explicit `is_international` flag wins; else the referenced order's
/// classification; else payer/beneficiary countries compared directly.
pub fn is_transaction_international(
    tx: &Transaction,
    orders: &[Order],
    users: &[RegistryUser],
) -> bool {
    if let Some(flag) = tx.is_international {
        return flag;
    }

    if let Some(order) = orders.iter().find(|o| o.id == tx.order_id) {
        return is_order_international(order, users);
    }

    match (
        known_country(tx.payer_country.as_deref()),
        known_country(tx.beneficiary_country.as_deref()),
    ) {
        (Some(payer), Some(beneficiary)) => payer != beneficiary,
        _ => false,
    }
}

fn known_country(raw: Option<&str>) -> Option<&str> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// The logistics record for an order, if one exists
pub fn logistics_for_order<'a>(
    snapshot: &'a Snapshot,
    order_id: &str,
) -> Option<&'a LogisticsDetails> {
    snapshot.logistics.get(order_id)
}

/// The third-party entry for an order
///
/// Duplicates per order id are legal at write time; this resolves them
/// first-submitted-wins (first match in array order).
pub fn third_party_for_order<'a>(
    snapshot: &'a Snapshot,
    order_id: &str,
) -> Option<&'a PartnerThirdPartyEntry> {
    snapshot
        .third_party_entries
        .iter()
        .find(|e| e.order_id == order_id)
}

/// Buy orders as a filtered projection over the single order table
pub fn buy_orders(snapshot: &Snapshot) -> Vec<&Order> {
    snapshot
        .orders
        .iter()
        .filter(|o| o.order_type == crate::types::OrderType::Buy)
        .collect()
}

/// Sell orders as a filtered projection over the single order table
pub fn sell_orders(snapshot: &Snapshot) -> Vec<&Order> {
    snapshot
        .orders
        .iter()
        .filter(|o| o.order_type == crate::types::OrderType::Sell)
        .collect()
}

/// Aggregate dashboard figures, fully re-derivable from the snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStatistics {
    /// Orders not in a terminal status
    pub open_orders: usize,
    /// Sum of amounts across completed transactions
    pub completed_transaction_volume: f64,
    /// Sum of amounts across pending transactions
    pub pending_transaction_volume: f64,
    pub users_under_review: usize,
    /// Enquiries not yet resolved
    pub open_enquiries: usize,
    /// Open enquiries of the callback type
    pub open_callback_enquiries: usize,
    /// Whether any transaction has ever failed
    pub any_transaction_failed: bool,
}

/// Compute the aggregate dashboard read
pub fn dashboard_statistics(snapshot: &Snapshot) -> DashboardStatistics {
    let open_orders = snapshot
        .orders
        .iter()
        .filter(|o| !flow::is_terminal_status(&o.status))
        .count();

    let mut completed_transaction_volume = 0.0;
    let mut pending_transaction_volume = 0.0;
    let mut any_transaction_failed = false;
    for tx in snapshot.transactions.iter() {
        match tx.status {
            TransactionStatus::Completed => {
                completed_transaction_volume += parse_amount(&tx.amount)
            }
            TransactionStatus::Pending => pending_transaction_volume += parse_amount(&tx.amount),
            TransactionStatus::Failed => any_transaction_failed = true,
        }
    }

    let users_under_review = snapshot
        .users
        .iter()
        .filter(|u| u.status == "Under Review")
        .count();

    let open_enquiries = snapshot
        .enquiries
        .iter()
        .filter(|e| e.status != "Resolved")
        .count();

    let open_callback_enquiries = snapshot
        .enquiries
        .iter()
        .filter(|e| e.status != "Resolved" && e.enquiry_type == "Callback")
        .count();

    DashboardStatistics {
        open_orders,
        completed_transaction_volume,
        pending_transaction_volume,
        users_under_review,
        open_enquiries,
        open_callback_enquiries,
        any_transaction_failed,
    }
}

/// Parse a free-form display amount
///
/// Strips everything but digits and the decimal point; unparsable values
/// count as zero.
fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    cleaned.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::types::{Enquiry, Facility, OrderType, TransactionMethod};

    fn user(id: &str, name: &str, country: Option<&str>) -> RegistryUser {
        let mut user = RegistryUser::new(name);
        user.id = id.to_string();
        user.country = country.map(|c| c.to_string());
        user
    }

    fn order_with_countries(buyer: Option<&str>, seller: Option<&str>) -> Order {
        let mut order = Order::new(OrderType::Buy, "Copper", 5.0, "t", "USD", "12,000");
        order.buyer_country = buyer.map(|c| c.to_string());
        order.seller_country = seller.map(|c| c.to_string());
        order
    }

    #[test]
    fn test_resolve_user_name() {
        let users = vec![user("U-1", "Amina Diallo", None)];

        assert_eq!(resolve_user_name(&users, Some("U-1")), "Amina Diallo");
        assert_eq!(resolve_user_name(&users, Some("U-9")), UNKNOWN_USER);
        assert_eq!(resolve_user_name(&users, Some("")), UNKNOWN_USER);
        assert_eq!(resolve_user_name(&users, None), UNKNOWN_USER);
    }

    #[test]
    fn test_order_international_both_known_and_different() {
        let order = order_with_countries(Some("Ghana"), Some("Belgium"));
        assert!(is_order_international(&order, &[]));
    }

    #[test]
    fn test_order_not_international_when_same_country() {
        let order = order_with_countries(Some("Ghana"), Some("Ghana"));
        assert!(!is_order_international(&order, &[]));
    }

    #[test]
    fn test_order_not_international_when_either_side_unknown() {
        assert!(!is_order_international(
            &order_with_countries(Some("Ghana"), None),
            &[]
        ));
        assert!(!is_order_international(
            &order_with_countries(None, Some("Belgium")),
            &[]
        ));
        assert!(!is_order_international(&order_with_countries(None, None), &[]));
        // Whitespace-only is unknown
        assert!(!is_order_international(
            &order_with_countries(Some("  "), Some("Belgium")),
            &[]
        ));
    }

    #[test]
    fn test_order_international_trims_before_comparing() {
        let order = order_with_countries(Some("  Ghana "), Some("Ghana"));
        assert!(!is_order_international(&order, &[]));

        // Case-sensitive after trimming
        let order = order_with_countries(Some("ghana"), Some("Ghana"));
        assert!(is_order_international(&order, &[]));
    }

    #[test]
    fn test_order_international_falls_back_to_linked_user() {
        let users = vec![user("U-1", "Amina", Some("Senegal"))];
        let mut order = order_with_countries(None, Some("Belgium"));
        order.user_id = Some("U-1".to_string());

        assert!(is_order_international(&order, &users));
    }

    #[test]
    fn test_order_international_seller_falls_back_to_facility_then_delivery() {
        let mut order = order_with_countries(Some("Ghana"), None);
        order.facility = Some(Facility {
            id: "F-1".to_string(),
            name: "Tema Refinery".to_string(),
            city: None,
            country: Some("Ghana".to_string()),
        });
        assert!(!is_order_international(&order, &[]));

        order.facility = None;
        order.delivery_location = Some(crate::types::DeliveryLocation {
            address: None,
            city: None,
            country: Some("Togo".to_string()),
        });
        assert!(is_order_international(&order, &[]));
    }

    #[test]
    fn test_transaction_international_explicit_flag_wins() {
        let mut tx = Transaction::new("O-1", "100", TransactionMethod::Wise);
        tx.is_international = Some(true);
        tx.payer_country = Some("Ghana".to_string());
        tx.beneficiary_country = Some("Ghana".to_string());

        assert!(is_transaction_international(&tx, &[], &[]));
    }

    #[test]
    fn test_transaction_international_delegates_to_order() {
        let mut order = order_with_countries(Some("Ghana"), Some("Belgium"));
        order.id = "O-1".to_string();
        let tx = Transaction::new("O-1", "100", TransactionMethod::Wise);

        assert!(is_transaction_international(&tx, &[order], &[]));
    }

    #[test]
    fn test_transaction_international_falls_back_to_own_countries() {
        let mut tx = Transaction::new("O-missing", "100", TransactionMethod::Wise);
        tx.payer_country = Some("Ghana".to_string());
        tx.beneficiary_country = Some("Kenya".to_string());

        assert!(is_transaction_international(&tx, &[], &[]));

        tx.beneficiary_country = None;
        assert!(!is_transaction_international(&tx, &[], &[]));
    }

    #[test]
    fn test_third_party_for_order_is_first_match() {
        let mut first = PartnerThirdPartyEntry::new("O-1");
        first.id = "P-1".to_string();
        let mut second = PartnerThirdPartyEntry::new("O-1");
        second.id = "P-2".to_string();

        let snapshot = Snapshot::new()
            .apply(Action::AddPartnerThirdParty { entry: first })
            .apply(Action::AddPartnerThirdParty { entry: second });

        let found = third_party_for_order(&snapshot, "O-1").unwrap();
        assert_eq!(found.id, "P-1");
        assert!(third_party_for_order(&snapshot, "O-9").is_none());
    }

    #[test]
    fn test_buy_and_sell_projections_partition_the_table() {
        let snapshot = Snapshot::new()
            .apply(Action::CreateOrder {
                order: Order::new(OrderType::Buy, "Copper", 1.0, "t", "USD", "100"),
            })
            .apply(Action::CreateOrder {
                order: Order::new(OrderType::Sell, "Cobalt", 1.0, "t", "USD", "200"),
            })
            .apply(Action::CreateOrder {
                order: Order::new(OrderType::Buy, "Lithium", 1.0, "t", "USD", "300"),
            });

        assert_eq!(buy_orders(&snapshot).len(), 2);
        assert_eq!(sell_orders(&snapshot).len(), 1);
        assert_eq!(
            buy_orders(&snapshot).len() + sell_orders(&snapshot).len(),
            snapshot.orders.len()
        );
    }

    #[test]
    fn test_parse_amount_strips_display_noise() {
        assert_eq!(parse_amount("12,500"), 12500.0);
        assert_eq!(parse_amount("USD 4,250.75"), 4250.75);
        assert_eq!(parse_amount("$1 000"), 1000.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        // Two decimal points cannot parse; counts as zero
        assert_eq!(parse_amount("1.2.3"), 0.0);
    }

    #[test]
    fn test_dashboard_statistics() {
        let mut completed = Transaction::new("O-1", "USD 1,000", TransactionMethod::Wise);
        completed.status = TransactionStatus::Completed;
        let mut pending = Transaction::new("O-2", "250.50", TransactionMethod::BankTransfer);
        pending.status = TransactionStatus::Pending;
        let mut failed = Transaction::new("O-3", "75", TransactionMethod::Wise);
        failed.status = TransactionStatus::Failed;

        let mut reviewed = user("U-1", "Amina", None);
        reviewed.status = "Under Review".to_string();

        let mut done_order = Order::new(OrderType::Buy, "Copper", 1.0, "t", "USD", "100");
        done_order.status = "Completed".to_string();

        let snapshot = Snapshot::new()
            .apply(Action::CreateOrder {
                order: Order::new(OrderType::Buy, "Copper", 1.0, "t", "USD", "100"),
            })
            .apply(Action::CreateOrder { order: done_order })
            .apply(Action::AddTransaction {
                transaction: completed,
            })
            .apply(Action::AddTransaction {
                transaction: pending,
            })
            .apply(Action::AddTransaction { transaction: failed })
            .apply(Action::AddRegistryUser { user: reviewed })
            .apply(Action::AddRegistryUser {
                user: user("U-2", "Kwame", None),
            })
            .apply(Action::AddEnquiry {
                enquiry: Enquiry {
                    id: "E-1".to_string(),
                    user_id: None,
                    enquiry_type: "Callback".to_string(),
                    subject: None,
                    status: "Open".to_string(),
                    created_at: 0,
                },
            })
            .apply(Action::AddEnquiry {
                enquiry: Enquiry {
                    id: "E-2".to_string(),
                    user_id: None,
                    enquiry_type: "General".to_string(),
                    subject: None,
                    status: "Resolved".to_string(),
                    created_at: 0,
                },
            });

        let stats = dashboard_statistics(&snapshot);

        assert_eq!(stats.open_orders, 1);
        assert_eq!(stats.completed_transaction_volume, 1000.0);
        assert_eq!(stats.pending_transaction_volume, 250.5);
        assert_eq!(stats.users_under_review, 1);
        assert_eq!(stats.open_enquiries, 1);
        assert_eq!(stats.open_callback_enquiries, 1);
        assert!(stats.any_transaction_failed);
    }

    #[test]
    fn test_dashboard_statistics_on_empty_snapshot() {
        let stats = dashboard_statistics(&Snapshot::new());

        assert_eq!(stats.open_orders, 0);
        assert_eq!(stats.completed_transaction_volume, 0.0);
        assert_eq!(stats.pending_transaction_volume, 0.0);
        assert!(!stats.any_transaction_failed);
    }

    #[test]
    fn test_logistics_for_order() {
        let snapshot = Snapshot::new().apply(Action::SetLogisticsDetails {
            details: LogisticsDetails {
                order_id: "O-1".to_string(),
                carrier_name: Some("DHL".to_string()),
                ..LogisticsDetails::default()
            },
        });

        assert_eq!(
            logistics_for_order(&snapshot, "O-1")
                .and_then(|l| l.carrier_name.as_deref()),
            Some("DHL")
        );
        assert!(logistics_for_order(&snapshot, "O-2").is_none());
    }
}
