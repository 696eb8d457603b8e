//! Optional write-boundary validation
//!
//! The transition function tolerates dangling references and preserves
//! whatever status strings callers hand it; this module is the stricter
//! pass that can be layered on top. It is never invoked by the store
//! itself — seed files and imported payloads are the expected audience.
//!
//! Broken step geometry is an error (it cannot arise through `dispatch`,
//! so its presence means the snapshot was built by hand). A dangling soft
//! reference is only a warning, since the model tolerates those
//! everywhere and the views degrade to sentinels.

use std::collections::HashSet;

use serde::Serialize;

use crate::flow;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One audit finding, anchored to an entity
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditFinding {
    pub severity: Severity,
    /// Collection the finding belongs to, e.g. `"order"`
    pub entity: String,
    /// Id of the offending record
    pub id: String,
    pub message: String,
}

/// Result of auditing a snapshot
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapshotAudit {
    pub findings: Vec<AuditFinding>,
}

impl SnapshotAudit {
    /// No findings at all
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// At least one error-severity finding
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }
}

/// Audit a snapshot for step-geometry and referential problems
pub fn audit_snapshot(snapshot: &Snapshot) -> SnapshotAudit {
    let mut findings = Vec::new();

    let order_ids: HashSet<&str> = snapshot.orders.iter().map(|o| o.id.as_str()).collect();
    let user_ids: HashSet<&str> = snapshot.users.iter().map(|u| u.id.as_str()).collect();

    for order in snapshot.orders.iter() {
        let expected = flow::steps_for(order.order_type, &order.status);
        if order.flow_steps != expected {
            findings.push(AuditFinding {
                severity: Severity::Error,
                entity: "order".to_string(),
                id: order.id.clone(),
                message: format!(
                    "flow steps do not match status '{}' for a {} order",
                    order.status, order.order_type
                ),
            });
        }

        if order.status != flow::STATUS_CANCELLED
            && flow::step_index(order.order_type, &order.status).is_none()
        {
            findings.push(AuditFinding {
                severity: Severity::Warning,
                entity: "order".to_string(),
                id: order.id.clone(),
                message: format!(
                    "status '{}' is outside the {} vocabulary",
                    order.status, order.order_type
                ),
            });
        }

        if let Some(user_id) = &order.user_id {
            if !user_ids.contains(user_id.as_str()) {
                findings.push(AuditFinding {
                    severity: Severity::Warning,
                    entity: "order".to_string(),
                    id: order.id.clone(),
                    message: format!("user_id '{user_id}' does not match any registry user"),
                });
            }
        }
    }

    for tx in snapshot.transactions.iter() {
        if !order_ids.contains(tx.order_id.as_str()) {
            findings.push(AuditFinding {
                severity: Severity::Warning,
                entity: "transaction".to_string(),
                id: tx.id.clone(),
                message: format!("order_id '{}' does not match any order", tx.order_id),
            });
        }
    }

    for method in snapshot.payment_methods.iter() {
        if !user_ids.contains(method.user_id.as_str()) {
            findings.push(AuditFinding {
                severity: Severity::Warning,
                entity: "payment_method".to_string(),
                id: method.id.clone(),
                message: format!("user_id '{}' does not match any registry user", method.user_id),
            });
        }
    }

    let mut seen_third_party_orders: HashSet<&str> = HashSet::new();
    for entry in snapshot.third_party_entries.iter() {
        if !order_ids.contains(entry.order_id.as_str()) {
            findings.push(AuditFinding {
                severity: Severity::Warning,
                entity: "third_party_entry".to_string(),
                id: entry.id.clone(),
                message: format!("order_id '{}' does not match any order", entry.order_id),
            });
        }
        if !seen_third_party_orders.insert(entry.order_id.as_str()) {
            findings.push(AuditFinding {
                severity: Severity::Warning,
                entity: "third_party_entry".to_string(),
                id: entry.id.clone(),
                message: format!(
                    "duplicate entry for order '{}'; lookups resolve first-submitted-wins",
                    entry.order_id
                ),
            });
        }
    }

    for (key, details) in snapshot.logistics.iter() {
        if details.order_id != *key {
            findings.push(AuditFinding {
                severity: Severity::Error,
                entity: "logistics".to_string(),
                id: key.clone(),
                message: format!(
                    "record is keyed under '{}' but names order '{}'",
                    key, details.order_id
                ),
            });
        } else if !order_ids.contains(key.as_str()) {
            findings.push(AuditFinding {
                severity: Severity::Warning,
                entity: "logistics".to_string(),
                id: key.clone(),
                message: format!("order_id '{key}' does not match any order"),
            });
        }
    }

    SnapshotAudit { findings }
}
