use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub user_id: String,
    pub service_category: String,
    pub experience_years: i32,
    pub service_charges: f64,
    pub skills: Vec<String>,
    pub verification_status: VerificationStatus,
    pub verification_date: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    /// Arithmetic mean of live review scores, 0 when unreviewed.
    pub rating: f64,
    pub total_ratings: i64,
    pub completed_jobs: i64,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Worker {
    pub fn can_take_bookings(&self) -> bool {
        self.is_available && self.verification_status == VerificationStatus::Verified
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "verified" => VerificationStatus::Verified,
            "rejected" => VerificationStatus::Rejected,
            _ => VerificationStatus::Pending,
        }
    }
}
