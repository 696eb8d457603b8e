//! Order fulfillment pipeline vocabulary and step derivation
//!
//! Each order type has a fixed, ordered list of status labels. An order's
//! `flow_steps` array is a pure function of `(order_type, status)`: every
//! step before the status index is completed, the status index is active,
//! and later steps are neither. The store derives the array on every order
//! write, so status and step geometry cannot drift apart.

use crate::types::{FlowStep, OrderType};

/// Step vocabulary for buy orders, in pipeline order
pub const BUY_STEPS: [&str; 5] = [
    "Order Submitted",
    "Facility Confirmed",
    "Documents Verified",
    "Payment Initiated",
    "Order Completed",
];

/// Step vocabulary for sell orders; adds a sample-test step absent from buys
pub const SELL_STEPS: [&str; 6] = [
    "Order Submitted",
    "Sample Test Required",
    "Facility Confirmed",
    "Documents Verified",
    "Payment Initiated",
    "Order Completed",
];

/// Terminal status outside both vocabularies
pub const STATUS_CANCELLED: &str = "Cancelled";

/// Sentinel status mapping to the last vocabulary label
pub const STATUS_COMPLETED: &str = "Completed";

/// The ordered step labels for an order type
pub fn step_labels(order_type: OrderType) -> &'static [&'static str] {
    match order_type {
        OrderType::Buy => &BUY_STEPS,
        OrderType::Sell => &SELL_STEPS,
    }
}

/// First vocabulary label; the status every order is created with
pub fn initial_status(order_type: OrderType) -> &'static str {
    step_labels(order_type)[0]
}

/// Resolve a status string to its step index
///
/// The `"Completed"` sentinel maps to the last label. `"Cancelled"` and
/// anything outside the vocabulary resolve to `None`.
pub fn step_index(order_type: OrderType, status: &str) -> Option<usize> {
    let labels = step_labels(order_type);
    if status == STATUS_COMPLETED {
        return Some(labels.len() - 1);
    }
    labels.iter().position(|label| *label == status)
}

/// Derive the full step array for `(order_type, status)`
///
/// Steps before the status index are completed, the status index is active,
/// later steps are neither. The submission step is the exception: an order
/// that exists at all was submitted, so step 0 stays completed even while
/// active. `"Cancelled"` and out-of-vocabulary statuses render every step
/// inactive and not completed.
pub fn steps_for(order_type: OrderType, status: &str) -> Vec<FlowStep> {
    let labels = step_labels(order_type);
    match step_index(order_type, status) {
        Some(index) => labels
            .iter()
            .enumerate()
            .map(|(i, label)| FlowStep::new(*label, i < index || i == 0, i == index))
            .collect(),
        None => labels
            .iter()
            .map(|label| FlowStep::new(*label, false, false))
            .collect(),
    }
}

/// Step array for a freshly submitted order
pub fn initial_steps(order_type: OrderType) -> Vec<FlowStep> {
    steps_for(order_type, initial_status(order_type))
}

/// Whether a status ends the pipeline (no further staff action expected)
pub fn is_terminal_status(status: &str) -> bool {
    status == STATUS_CANCELLED
        || status == STATUS_COMPLETED
        || status == BUY_STEPS[BUY_STEPS.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(step_labels(OrderType::Buy).len(), 5);
        assert_eq!(step_labels(OrderType::Sell).len(), 6);
    }

    #[test]
    fn test_sell_vocabulary_inserts_sample_test() {
        let buy = step_labels(OrderType::Buy);
        let sell = step_labels(OrderType::Sell);

        assert!(!buy.contains(&"Sample Test Required"));
        assert_eq!(sell[1], "Sample Test Required");

        // Removing the extra step gives exactly the buy vocabulary
        let stripped: Vec<&str> = sell
            .iter()
            .copied()
            .filter(|l| *l != "Sample Test Required")
            .collect();
        assert_eq!(stripped, buy.to_vec());
    }

    #[test]
    fn test_step_index_for_vocabulary_labels() {
        assert_eq!(step_index(OrderType::Buy, "Order Submitted"), Some(0));
        assert_eq!(step_index(OrderType::Buy, "Payment Initiated"), Some(3));
        assert_eq!(step_index(OrderType::Sell, "Payment Initiated"), Some(4));
        assert_eq!(step_index(OrderType::Sell, "Sample Test Required"), Some(1));
    }

    #[test]
    fn test_completed_sentinel_maps_to_last_label() {
        assert_eq!(step_index(OrderType::Buy, STATUS_COMPLETED), Some(4));
        assert_eq!(step_index(OrderType::Sell, STATUS_COMPLETED), Some(5));
    }

    #[test]
    fn test_step_index_unknown_status() {
        assert_eq!(step_index(OrderType::Buy, "Cancelled"), None);
        assert_eq!(step_index(OrderType::Buy, "On Hold"), None);
        assert_eq!(step_index(OrderType::Buy, ""), None);
    }

    #[test]
    fn test_steps_for_mid_pipeline() {
        let steps = steps_for(OrderType::Buy, "Payment Initiated");

        assert_eq!(steps.len(), 5);
        assert!(steps[..3].iter().all(|s| s.completed && !s.active));
        assert!(steps[3].active);
        assert!(!steps[3].completed);
        assert!(!steps[4].completed && !steps[4].active);
    }

    #[test]
    fn test_steps_for_cancelled_clears_everything() {
        for order_type in [OrderType::Buy, OrderType::Sell] {
            let steps = steps_for(order_type, STATUS_CANCELLED);
            assert!(steps.iter().all(|s| !s.completed && !s.active));
            assert_eq!(steps.len(), step_labels(order_type).len());
        }
    }

    #[test]
    fn test_steps_for_unknown_status_renders_inactive() {
        let steps = steps_for(OrderType::Sell, "Totally Made Up");
        assert!(steps.iter().all(|s| !s.completed && !s.active));
    }

    #[test]
    fn test_steps_for_preserves_label_order() {
        let steps = steps_for(OrderType::Sell, "Documents Verified");
        let labels: Vec<&str> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, SELL_STEPS.to_vec());
    }

    #[test]
    fn test_initial_steps_marks_first_step_completed_and_active() {
        let steps = initial_steps(OrderType::Buy);
        assert!(steps[0].completed);
        assert!(steps[0].active);
        assert!(steps[1..].iter().all(|s| !s.completed && !s.active));
    }

    #[test]
    fn test_exactly_one_active_step_for_every_vocabulary_status() {
        for order_type in [OrderType::Buy, OrderType::Sell] {
            for status in step_labels(order_type) {
                let steps = steps_for(order_type, status);
                let active = steps.iter().filter(|s| s.active).count();
                assert_eq!(active, 1, "status {status} should have one active step");
            }
        }
    }

    #[test]
    fn test_is_terminal_status() {
        assert!(is_terminal_status("Cancelled"));
        assert!(is_terminal_status("Completed"));
        assert!(is_terminal_status("Order Completed"));
        assert!(!is_terminal_status("Order Submitted"));
        assert!(!is_terminal_status("Payment Initiated"));
    }
}
