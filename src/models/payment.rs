use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::PaymentMethod;

/// Settlement record created exactly once per completed booking.
///
/// `commission_rate` is the system-wide rate at the moment of settlement,
/// snapshotted here; later settings changes never touch existing rows.
/// `commission_amount + worker_earnings == amount` holds after rounding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub customer_id: String,
    pub worker_id: String,
    pub amount: f64,
    pub commission_rate: f64,
    pub commission_amount: f64,
    pub worker_earnings: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub refund_amount: Option<f64>,
    pub refund_reason: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => PaymentStatus::Completed,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }
}
