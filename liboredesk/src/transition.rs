//! The pure state-transition function
//!
//! [`apply`] maps `(snapshot, action)` to a successor snapshot. It is total,
//! synchronous, and never fails: unknown actions and updates naming a
//! missing id leave the relevant collections untouched. Only the
//! collections an action concerns are rebuilt; every other collection is
//! shared pointer-identical with the input snapshot, so consumers can
//! detect changed slices with `Arc::ptr_eq`.
//!
//! Foreign keys are soft references throughout; nothing here checks that a
//! referenced order or user exists. The optional [`crate::validation`] pass
//! covers that at the write boundary instead.

use std::sync::Arc;

use crate::actions::Action;
use crate::flow;
use crate::snapshot::Snapshot;
use crate::types::{LogisticsDetails, PartnerThirdPartyEntry};

/// Most recent activity entries retained
pub const ACTIVITY_LOG_CAP: usize = 200;

/// Most recent verification entries retained
pub const VERIFICATION_LOG_CAP: usize = 500;

/// Apply one action to a snapshot, returning the successor
pub fn apply(snapshot: &Snapshot, action: Action) -> Snapshot {
    let mut next = snapshot.clone();

    match action {
        Action::CreateOrder { mut order } => {
            order.flow_steps = flow::steps_for(order.order_type, &order.status);
            next.orders = Arc::new(with_appended(&next.orders, order));
        }

        Action::UpdateOrder { mut order } => {
            order.flow_steps = flow::steps_for(order.order_type, &order.status);
            let id = order.id.clone();
            if let Some(orders) = replaced(&next.orders, |o| o.id == id, order) {
                next.orders = Arc::new(orders);
            }
        }

        Action::CancelOrder { order_id } => {
            let edited = updated(
                &next.orders,
                |o| o.id == order_id,
                |o| {
                    o.status = flow::STATUS_CANCELLED.to_string();
                    o.flow_steps = flow::steps_for(o.order_type, flow::STATUS_CANCELLED);
                },
            );
            if let Some(orders) = edited {
                next.orders = Arc::new(orders);
            }
        }

        Action::SetLogisticsDetails { details } => {
            let mut logistics = (*next.logistics).clone();
            logistics.insert(details.order_id.clone(), details);
            next.logistics = Arc::new(logistics);
        }

        Action::AddPartnerThirdParty { entry } => {
            let mut logistics = (*next.logistics).clone();
            let derived = derived_logistics(&entry, logistics.get(&entry.order_id));
            logistics.insert(entry.order_id.clone(), derived);
            next.logistics = Arc::new(logistics);
            next.third_party_entries = Arc::new(with_appended(&next.third_party_entries, entry));
        }

        Action::UpdatePartnerThirdParty { entry } => {
            let previous_order_id = next
                .third_party_entries
                .iter()
                .find(|e| e.id == entry.id)
                .map(|e| e.order_id.clone());

            // An update naming an unknown entry id leaves everything alone
            if let Some(previous_order_id) = previous_order_id {
                let mut logistics = (*next.logistics).clone();
                if previous_order_id != entry.order_id {
                    // The entry moved orders; it must not be reflected in
                    // two logistics records at once
                    logistics.remove(&previous_order_id);
                }
                let derived = derived_logistics(&entry, logistics.get(&entry.order_id));
                logistics.insert(entry.order_id.clone(), derived);
                next.logistics = Arc::new(logistics);

                let id = entry.id.clone();
                if let Some(entries) = replaced(&next.third_party_entries, |e| e.id == id, entry) {
                    next.third_party_entries = Arc::new(entries);
                }
            }
        }

        Action::AddRegistryUser { user } => {
            next.users = Arc::new(with_appended(&next.users, user));
        }

        Action::UpdateRegistryUser { user } => {
            let id = user.id.clone();
            if let Some(users) = replaced(&next.users, |u| u.id == id, user) {
                next.users = Arc::new(users);
            }
        }

        Action::UpdateUserStatus {
            user_id,
            suspended,
            restricted,
        } => {
            if let Some(flag) = suspended {
                let mut set = (*next.suspended_users).clone();
                if flag {
                    set.insert(user_id.clone());
                } else {
                    set.remove(&user_id);
                }
                next.suspended_users = Arc::new(set);
            }
            if let Some(flag) = restricted {
                let mut set = (*next.restricted_users).clone();
                if flag {
                    set.insert(user_id.clone());
                } else {
                    set.remove(&user_id);
                }
                next.restricted_users = Arc::new(set);
            }
        }

        Action::AddAppActivity { activity } => {
            next.activities = Arc::new(prepended_capped(
                &next.activities,
                activity,
                ACTIVITY_LOG_CAP,
            ));
        }

        Action::RecordVerification { entry } => {
            next.verification_log = Arc::new(prepended_capped(
                &next.verification_log,
                entry,
                VERIFICATION_LOG_CAP,
            ));
        }

        Action::AddTransaction { transaction } => {
            next.transactions = Arc::new(with_appended(&next.transactions, transaction));
        }

        Action::UpdateTransaction { transaction } => {
            let id = transaction.id.clone();
            if let Some(transactions) = replaced(&next.transactions, |t| t.id == id, transaction) {
                next.transactions = Arc::new(transactions);
            }
        }

        Action::AddDispute { dispute } => {
            next.disputes = Arc::new(with_appended(&next.disputes, dispute));
        }

        Action::UpdateDispute { dispute } => {
            let id = dispute.id.clone();
            if let Some(disputes) = replaced(&next.disputes, |d| d.id == id, dispute) {
                next.disputes = Arc::new(disputes);
            }
        }

        Action::AddEnquiry { enquiry } => {
            next.enquiries = Arc::new(with_appended(&next.enquiries, enquiry));
        }

        Action::UpdateEnquiry { enquiry } => {
            let id = enquiry.id.clone();
            if let Some(enquiries) = replaced(&next.enquiries, |e| e.id == id, enquiry) {
                next.enquiries = Arc::new(enquiries);
            }
        }

        Action::AddPayout { payout } => {
            next.payouts = Arc::new(with_appended(&next.payouts, payout));
        }

        Action::UpdatePayout { payout } => {
            let id = payout.id.clone();
            if let Some(payouts) = replaced(&next.payouts, |p| p.id == id, payout) {
                next.payouts = Arc::new(payouts);
            }
        }

        Action::AddFacility { facility } => {
            next.facilities = Arc::new(with_appended(&next.facilities, facility));
        }

        Action::UpdateFacility { facility } => {
            let id = facility.id.clone();
            if let Some(facilities) = replaced(&next.facilities, |f| f.id == id, facility) {
                next.facilities = Arc::new(facilities);
            }
        }

        Action::AddPaymentMethod { payment_method } => {
            next.payment_methods = Arc::new(with_appended(&next.payment_methods, payment_method));
        }

        Action::UpdatePaymentMethod { payment_method } => {
            let id = payment_method.id.clone();
            if let Some(payment_methods) =
                replaced(&next.payment_methods, |m| m.id == id, payment_method)
            {
                next.payment_methods = Arc::new(payment_methods);
            }
        }

        Action::AddActiveTestingOrder { order } => {
            next.active_testing_orders =
                Arc::new(with_appended(&next.active_testing_orders, order));
        }

        Action::UpdateActiveTestingOrder { order } => {
            let id = order.id.clone();
            if let Some(orders) = replaced(&next.active_testing_orders, |o| o.id == id, order) {
                next.active_testing_orders = Arc::new(orders);
            }
        }

        Action::AddMineral { mineral } => {
            next.minerals = Arc::new(with_appended(&next.minerals, mineral));
        }

        Action::UpdateMineral { mineral } => {
            let id = mineral.id.clone();
            if let Some(minerals) = replaced(&next.minerals, |m| m.id == id, mineral) {
                next.minerals = Arc::new(minerals);
            }
        }

        Action::RemoveMineral { mineral_id } => {
            // The only physical delete in the model
            if next.minerals.iter().any(|m| m.id == mineral_id) {
                let minerals = next
                    .minerals
                    .iter()
                    .filter(|m| m.id != mineral_id)
                    .cloned()
                    .collect();
                next.minerals = Arc::new(minerals);
            }
        }

        Action::AddCustomCategory { name } => {
            if !next.custom_categories.iter().any(|c| c == &name) {
                next.custom_categories = Arc::new(with_appended(&next.custom_categories, name));
            }
        }

        Action::AppendCommLog { order_id, entry } => {
            let edited = updated(&next.orders, |o| o.id == order_id, |o| o.comm_log.push(entry));
            if let Some(orders) = edited {
                next.orders = Arc::new(orders);
            }
        }

        Action::RecordSentToUser { order_id, entry } => {
            let edited = updated(
                &next.orders,
                |o| o.id == order_id,
                |o| o.sent_to_user.push(entry),
            );
            if let Some(orders) = edited {
                next.orders = Arc::new(orders);
            }
        }

        Action::ScheduleVideoCall { user_id, call } => {
            let edited = updated(
                &next.users,
                |u| u.id == user_id,
                |u| u.video_calls.push(call),
            );
            if let Some(users) = edited {
                next.users = Arc::new(users);
            }
        }

        Action::AddDocumentRequest { user_id, request } => {
            let edited = updated(
                &next.users,
                |u| u.id == user_id,
                |u| u.document_requests.push(request),
            );
            if let Some(users) = edited {
                next.users = Arc::new(users);
            }
        }

        Action::Unknown => {}
    }

    next
}

/// The logistics projection of a third-party entry
///
/// Shipping amount, currency, and contact carry over from the existing
/// record when the entry leaves them unset; every other field comes from
/// the entry alone.
fn derived_logistics(
    entry: &PartnerThirdPartyEntry,
    existing: Option<&LogisticsDetails>,
) -> LogisticsDetails {
    LogisticsDetails {
        order_id: entry.order_id.clone(),
        carrier_name: entry.carrier_name.clone(),
        tracking_number: entry.tracking_number.clone(),
        qr_payload: None,
        eta: None,
        shipping_amount: entry
            .shipping_amount
            .clone()
            .or_else(|| existing.and_then(|l| l.shipping_amount.clone())),
        shipping_currency: entry
            .shipping_currency
            .clone()
            .or_else(|| existing.and_then(|l| l.shipping_currency.clone())),
        contact: entry
            .contact
            .clone()
            .or_else(|| existing.and_then(|l| l.contact.clone())),
    }
}

fn with_appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut out = items.to_vec();
    out.push(item);
    out
}

/// Replace the first element matching the predicate; `None` when no match
fn replaced<T: Clone>(
    items: &[T],
    matches: impl Fn(&T) -> bool,
    replacement: T,
) -> Option<Vec<T>> {
    let index = items.iter().position(matches)?;
    let mut out = items.to_vec();
    out[index] = replacement;
    Some(out)
}

/// Edit the first element matching the predicate in place; `None` when no match
fn updated<T: Clone>(
    items: &[T],
    matches: impl Fn(&T) -> bool,
    edit: impl FnOnce(&mut T),
) -> Option<Vec<T>> {
    let index = items.iter().position(matches)?;
    let mut out = items.to_vec();
    edit(&mut out[index]);
    Some(out)
}

fn prepended_capped<T: Clone>(items: &[T], entry: T, cap: usize) -> Vec<T> {
    let mut out = Vec::with_capacity((items.len() + 1).min(cap));
    out.push(entry);
    out.extend(items.iter().take(cap.saturating_sub(1)).cloned());
    out
}
