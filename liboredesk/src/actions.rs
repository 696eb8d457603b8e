//! The closed action vocabulary
//!
//! Actions are the only sanctioned way to mutate the store. Each variant is
//! a tagged payload describing one intended change; the transition function
//! in [`crate::transition`] maps `(snapshot, action)` to a new snapshot.
//!
//! The enum is serde-tagged so collaborator payloads can cross a JSON
//! boundary; an unrecognized tag deserializes to [`Action::Unknown`], which
//! the transition function treats as a no-op by contract.

use serde::{Deserialize, Serialize};

use crate::types::{
    ActiveTestingOrder, AppActivity, CommLogEntry, Dispute, DocumentRequest, Enquiry, Facility,
    LogisticsDetails, Mineral, Order, PartnerThirdPartyEntry, PaymentMethod, Payout, RegistryUser,
    SentToUserEntry, Transaction, VerificationLogEntry, VideoCall,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Append a new order; no duplicate-id check (caller responsibility)
    CreateOrder { order: Order },

    /// Replace the order with the matching id; flow steps are re-derived
    UpdateOrder { order: Order },

    /// Set the order's status to `Cancelled` and clear its step progress
    CancelOrder { order_id: String },

    /// Whole-record logistics upsert by order id (last write wins, no merge)
    SetLogisticsDetails { details: LogisticsDetails },

    /// Append a third-party entry and derive its logistics projection
    AddPartnerThirdParty { entry: PartnerThirdPartyEntry },

    /// Replace a third-party entry; moves its logistics projection when the
    /// entry's order id changed
    UpdatePartnerThirdParty { entry: PartnerThirdPartyEntry },

    AddRegistryUser { user: RegistryUser },

    UpdateRegistryUser { user: RegistryUser },

    /// Toggle membership in the suspended/restricted side-tables; absent
    /// fields leave that set untouched
    UpdateUserStatus {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suspended: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        restricted: Option<bool>,
    },

    /// Prepend to the activity feed, capped at the most recent 200 entries
    AddAppActivity { activity: AppActivity },

    /// Prepend to the verification trail, capped at the most recent 500
    RecordVerification { entry: VerificationLogEntry },

    AddTransaction { transaction: Transaction },

    UpdateTransaction { transaction: Transaction },

    AddDispute { dispute: Dispute },

    UpdateDispute { dispute: Dispute },

    AddEnquiry { enquiry: Enquiry },

    UpdateEnquiry { enquiry: Enquiry },

    AddPayout { payout: Payout },

    UpdatePayout { payout: Payout },

    AddFacility { facility: Facility },

    UpdateFacility { facility: Facility },

    AddPaymentMethod { payment_method: PaymentMethod },

    UpdatePaymentMethod { payment_method: PaymentMethod },

    AddActiveTestingOrder { order: ActiveTestingOrder },

    UpdateActiveTestingOrder { order: ActiveTestingOrder },

    AddMineral { mineral: Mineral },

    UpdateMineral { mineral: Mineral },

    /// Delete a mineral listing; the only physical removal in the model
    RemoveMineral { mineral_id: String },

    /// Append a category name if not already present
    AddCustomCategory { name: String },

    /// Append a staff note to an order's communication log
    AppendCommLog { order_id: String, entry: CommLogEntry },

    /// Append to an order's sent-to-user history
    RecordSentToUser { order_id: String, entry: SentToUserEntry },

    /// Append a scheduled call to a registry user's record
    ScheduleVideoCall { user_id: String, call: VideoCall },

    /// Append a document request to a registry user's record
    AddDocumentRequest { user_id: String, request: DocumentRequest },

    /// Catch-all for unrecognized tags; applied as a no-op
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The serde tag for this action, for logging and store events
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateOrder { .. } => "create_order",
            Action::UpdateOrder { .. } => "update_order",
            Action::CancelOrder { .. } => "cancel_order",
            Action::SetLogisticsDetails { .. } => "set_logistics_details",
            Action::AddPartnerThirdParty { .. } => "add_partner_third_party",
            Action::UpdatePartnerThirdParty { .. } => "update_partner_third_party",
            Action::AddRegistryUser { .. } => "add_registry_user",
            Action::UpdateRegistryUser { .. } => "update_registry_user",
            Action::UpdateUserStatus { .. } => "update_user_status",
            Action::AddAppActivity { .. } => "add_app_activity",
            Action::RecordVerification { .. } => "record_verification",
            Action::AddTransaction { .. } => "add_transaction",
            Action::UpdateTransaction { .. } => "update_transaction",
            Action::AddDispute { .. } => "add_dispute",
            Action::UpdateDispute { .. } => "update_dispute",
            Action::AddEnquiry { .. } => "add_enquiry",
            Action::UpdateEnquiry { .. } => "update_enquiry",
            Action::AddPayout { .. } => "add_payout",
            Action::UpdatePayout { .. } => "update_payout",
            Action::AddFacility { .. } => "add_facility",
            Action::UpdateFacility { .. } => "update_facility",
            Action::AddPaymentMethod { .. } => "add_payment_method",
            Action::UpdatePaymentMethod { .. } => "update_payment_method",
            Action::AddActiveTestingOrder { .. } => "add_active_testing_order",
            Action::UpdateActiveTestingOrder { .. } => "update_active_testing_order",
            Action::AddMineral { .. } => "add_mineral",
            Action::UpdateMineral { .. } => "update_mineral",
            Action::RemoveMineral { .. } => "remove_mineral",
            Action::AddCustomCategory { .. } => "add_custom_category",
            Action::AppendCommLog { .. } => "append_comm_log",
            Action::RecordSentToUser { .. } => "record_sent_to_user",
            Action::ScheduleVideoCall { .. } => "schedule_video_call",
            Action::AddDocumentRequest { .. } => "add_document_request",
            Action::Unknown => "unknown",
        }
    }
}
