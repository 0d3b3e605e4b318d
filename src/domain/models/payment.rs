use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const PAYMENT_PENDING: &str = "PENDING";
pub const PAYMENT_APPROVED: &str = "APPROVED";
pub const PAYMENT_REJECTED: &str = "REJECTED";

/// A provisional order created before the external processor confirms the
/// payment. `slots` holds the requested "HH:mm" start times as a JSON array,
/// in request order. PENDING is the only non-terminal state.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
    pub id: String,
    pub user_id: String,
    pub court_id: String,
    pub sport: String,
    pub date: NaiveDate,
    pub slots: String,
    pub total_amount: i64,
    pub status: String,
    pub preference_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewPendingPaymentParams {
    pub user_id: String,
    pub court_id: String,
    pub sport: String,
    pub date: NaiveDate,
    pub slots: Vec<String>,
    pub total_amount: i64,
}

impl PendingPayment {
    pub fn new(params: NewPendingPaymentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            court_id: params.court_id,
            sport: params.sport,
            date: params.date,
            slots: serde_json::to_string(&params.slots).unwrap_or_else(|_| "[]".to_string()),
            total_amount: params.total_amount,
            status: PAYMENT_PENDING.to_string(),
            preference_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn slot_list(&self) -> Vec<String> {
        serde_json::from_str(&self.slots).unwrap_or_default()
    }
}

/// Request shape handed to the payment processor when opening a checkout.
pub struct CheckoutRequest {
    pub external_reference: String,
    pub title: String,
    pub description: String,
    pub amount: i64,
    pub payer_email: String,
    pub success_url: String,
    pub failure_url: String,
    pub pending_url: String,
    pub notification_url: String,
}

pub struct CheckoutCreated {
    pub preference_id: String,
    pub init_point: String,
}

/// Processor-side view of a payment, as returned by the status query.
pub struct GatewayPayment {
    pub status: String,
    pub external_reference: Option<String>,
}
