//! Core entity types for Oredesk

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Orders
// ============================================================================

/// Side of the marketplace an order belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of an order's fulfillment pipeline
///
/// The array of steps always mirrors the fixed vocabulary for the order's
/// type; the store re-derives it from `(order_type, status)` on every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowStep {
    pub label: String,
    pub completed: bool,
    pub active: bool,
}

impl FlowStep {
    pub fn new(label: impl Into<String>, completed: bool, active: bool) -> Self {
        Self {
            label: label.into(),
            completed,
            active,
        }
    }
}

/// Payload captured when specific pipeline steps complete
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowStepData {
    /// Final confirmed amount, captured at facility confirmation
    pub confirmed_amount: Option<String>,
    /// Payment details, captured when the payment step starts
    pub payment_initiated: Option<PaymentInitiation>,
    /// Settlement method chosen by the buyer
    pub payment_method: Option<String>,
    /// Third-party sample test result (sell orders)
    pub sample_test: Option<SampleTestResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInitiation {
    pub method: String,
    pub initiated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleTestResult {
    pub laboratory: String,
    pub grade: Option<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeliveryLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Negotiation {
    pub proposed_price: Option<String>,
    pub notes: Option<String>,
    pub agreed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestingArrangement {
    pub laboratory: Option<String>,
    pub scheduled_for: Option<String>,
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LetterOfCredit {
    pub reference: Option<String>,
    pub issuing_bank: Option<String>,
    pub expires_at: Option<String>,
}

/// Staff communication note attached to an order (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommLogEntry {
    pub at: i64,
    pub author: Option<String>,
    pub message: String,
}

impl CommLogEntry {
    pub fn new(author: Option<String>, message: impl Into<String>) -> Self {
        Self {
            at: chrono::Utc::now().timestamp(),
            author,
            message: message.into(),
        }
    }
}

/// Record of something shown or sent to the owning user (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentToUserEntry {
    pub at: i64,
    pub kind: String,
    pub reference: Option<String>,
}

/// The central entity: a buy or sell order moving through the pipeline
///
/// `status` is a string drawn from the type-specific closed vocabulary (see
/// [`crate::flow`]), plus the sentinels `"Completed"` and `"Cancelled"`.
/// `flow_steps` is derived from `(order_type, status)` by the store and is
/// never trusted from caller payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub order_type: OrderType,
    pub mineral: String,
    pub quantity: f64,
    pub unit: String,
    pub facility: Option<Facility>,
    pub currency: String,
    pub estimated_amount: String,
    pub status: String,
    pub flow_steps: Vec<FlowStep>,
    pub flow_step_data: Option<FlowStepData>,
    /// Owning registry user; soft reference, not checked for existence
    pub user_id: Option<String>,
    pub buyer_country: Option<String>,
    pub seller_country: Option<String>,
    // Buy-side fields
    pub delivery_location: Option<DeliveryLocation>,
    pub contact: Option<Contact>,
    pub summary: Option<String>,
    // Sell-side fields
    pub negotiation: Option<Negotiation>,
    pub testing: Option<TestingArrangement>,
    pub letter_of_credit: Option<LetterOfCredit>,
    pub comm_log: Vec<CommLogEntry>,
    pub sent_to_user: Vec<SentToUserEntry>,
    pub created_at: i64,
}

impl Order {
    /// Create a new order at the first pipeline step
    ///
    /// Status is the first vocabulary label for the type, with step 0
    /// marked completed and active per the submission convention.
    pub fn new(
        order_type: OrderType,
        mineral: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        currency: impl Into<String>,
        estimated_amount: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order_type,
            mineral: mineral.into(),
            quantity,
            unit: unit.into(),
            facility: None,
            currency: currency.into(),
            estimated_amount: estimated_amount.into(),
            status: crate::flow::initial_status(order_type).to_string(),
            flow_steps: crate::flow::initial_steps(order_type),
            flow_step_data: None,
            user_id: None,
            buyer_country: None,
            seller_country: None,
            delivery_location: None,
            contact: None,
            summary: None,
            negotiation: None,
            testing: None,
            letter_of_credit: None,
            comm_log: Vec::new(),
            sent_to_user: Vec::new(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

// ============================================================================
// Settlements
// ============================================================================

/// Settlement channel for a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionMethod {
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Wise,
    #[serde(rename = "Blockchain Settlement")]
    BlockchainSettlement,
}

impl TransactionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "Bank Transfer",
            Self::Wise => "Wise",
            Self::BlockchainSettlement => "Blockchain Settlement",
        }
    }
}

impl std::fmt::Display for TransactionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A settlement record referencing an order
///
/// `order_id` is a soft reference; amounts are free-form display strings
/// and are never derived from the order itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub order_id: String,
    pub amount: String,
    pub currency: Option<String>,
    pub method: TransactionMethod,
    pub status: TransactionStatus,
    pub payer_country: Option<String>,
    pub beneficiary_country: Option<String>,
    /// Explicit override; when absent the order's classification is used
    pub is_international: Option<bool>,
    pub reference: Option<String>,
    pub created_at: i64,
}

impl Transaction {
    pub fn new(
        order_id: impl Into<String>,
        amount: impl Into<String>,
        method: TransactionMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            amount: amount.into(),
            currency: None,
            method,
            status: TransactionStatus::Pending,
            payer_country: None,
            beneficiary_country: None,
            is_international: None,
            reference: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

// ============================================================================
// Logistics and third-party testing
// ============================================================================

/// Carrier and tracking details shown externally, at most one per order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogisticsDetails {
    pub order_id: String,
    pub carrier_name: Option<String>,
    pub tracking_number: Option<String>,
    pub qr_payload: Option<String>,
    pub eta: Option<String>,
    pub shipping_amount: Option<String>,
    pub shipping_currency: Option<String>,
    pub contact: Option<Contact>,
}

/// A partner-submitted third-party testing/shipment record
///
/// Carries its own id; `order_id` names the order it currently describes.
/// The store keeps a derived 1:1 logistics projection for that order id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerThirdPartyEntry {
    pub id: String,
    pub order_id: String,
    pub agency: Option<String>,
    pub test_status: Option<String>,
    pub shipment_status: Option<String>,
    pub carrier_name: Option<String>,
    pub tracking_number: Option<String>,
    pub shipping_amount: Option<String>,
    pub shipping_currency: Option<String>,
    pub contact: Option<Contact>,
    pub submitted_at: i64,
}

impl PartnerThirdPartyEntry {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            agency: None,
            test_status: None,
            shipment_status: None,
            carrier_name: None,
            tracking_number: None,
            shipping_amount: None,
            shipping_currency: None,
            contact: None,
            submitted_at: chrono::Utc::now().timestamp(),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// A person or company in the user registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryUser {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    /// Free-form review status; `"Under Review"` feeds the dashboard count
    pub status: String,
    pub video_calls: Vec<VideoCall>,
    pub document_requests: Vec<DocumentRequest>,
    pub created_at: i64,
}

impl RegistryUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            company: None,
            email: None,
            country: None,
            status: "Active".to_string(),
            video_calls: Vec::new(),
            document_requests: Vec::new(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoCall {
    pub id: String,
    pub scheduled_for: String,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRequest {
    pub id: String,
    pub document: String,
    pub requested_at: i64,
    pub fulfilled: bool,
}

// ============================================================================
// Operational logs and side records
// ============================================================================

/// One line of the app-wide activity feed (newest first, capped)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppActivity {
    pub id: String,
    pub at: i64,
    pub actor: Option<String>,
    pub kind: String,
    pub detail: Option<String>,
}

impl AppActivity {
    pub fn new(kind: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            at: chrono::Utc::now().timestamp(),
            actor: None,
            kind: kind.into(),
            detail,
        }
    }
}

/// One line of the verification audit trail (newest first, capped)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationLogEntry {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub outcome: Option<String>,
    pub at: i64,
}

impl VerificationLogEntry {
    pub fn new(user_id: Option<String>, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            action: action.into(),
            outcome: None,
            at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enquiry {
    pub id: String,
    pub user_id: Option<String>,
    /// Free-form; `"Callback"` enquiries feed a dedicated dashboard count
    pub enquiry_type: String,
    pub subject: Option<String>,
    /// `"Resolved"` is the terminal status
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dispute {
    pub id: String,
    pub order_id: Option<String>,
    pub raised_by: Option<String>,
    pub reason: String,
    pub status: String,
    pub opened_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payout {
    pub id: String,
    pub user_id: Option<String>,
    pub amount: String,
    pub currency: Option<String>,
    pub status: String,
    pub requested_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A saved settlement channel for a registry user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    pub id: String,
    /// Soft reference to the owning user
    pub user_id: String,
    pub label: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveTestingOrder {
    pub id: String,
    pub order_id: Option<String>,
    pub laboratory: Option<String>,
    pub stage: String,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mineral {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub grade: Option<String>,
    pub unit: Option<String>,
    pub price_estimate: Option<String>,
    pub listed_by: Option<String>,
}

impl Mineral {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: None,
            grade: None,
            unit: None,
            price_estimate: None,
            listed_by: None,
        }
    }
}
