use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Check-in/check-out record proving a worker was on-site for a booking.
/// At most one exists per booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub booking_id: String,
    pub worker_id: String,
    pub customer_id: String,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub duration_minutes: i64,
    pub status: AttendanceStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Absent,
    #[serde(rename = "checked-in")]
    CheckedIn,
    #[serde(rename = "checked-out")]
    CheckedOut,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::CheckedIn => "checked-in",
            AttendanceStatus::CheckedOut => "checked-out",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "checked-in" => AttendanceStatus::CheckedIn,
            "checked-out" => AttendanceStatus::CheckedOut,
            _ => AttendanceStatus::Absent,
        }
    }
}
