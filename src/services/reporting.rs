use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, Payment, PaymentStatus};
use crate::services::settlement::round_currency;

// Pure folds over booking/payment lists. Deterministic ordering (BTreeMap)
// keeps repeated runs over the same data byte-identical.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub total: f64,
}

pub fn count_by_status(bookings: &[Booking]) -> BTreeMap<&'static str, i64> {
    let mut counts = BTreeMap::new();
    for booking in bookings {
        *counts.entry(booking.status.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Sum one payment field per settlement day. Unsettled payments (no paid_at)
/// are skipped.
pub fn bucket_by_day<F>(payments: &[Payment], value: F) -> Vec<DayBucket>
where
    F: Fn(&Payment) -> f64,
{
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for payment in payments {
        if let Some(paid_at) = payment.paid_at {
            *buckets.entry(paid_at.date()).or_insert(0.0) += value(payment);
        }
    }
    buckets
        .into_iter()
        .map(|(date, total)| DayBucket {
            date,
            total: round_currency(total),
        })
        .collect()
}

// ── Summaries ──

#[derive(Debug, Serialize)]
pub struct EarningsSummary {
    pub total_earnings: f64,
    pub completed_earnings: f64,
    pub pending_earnings: f64,
    pub total_commission: f64,
    pub earnings_by_day: Vec<DayBucket>,
}

pub fn earnings_summary(conn: &Connection, worker_id: &str) -> Result<EarningsSummary, AppError> {
    let payments = queries::payments_for_worker(conn, worker_id)?;

    let sum = |pred: &dyn Fn(&Payment) -> bool, field: &dyn Fn(&Payment) -> f64| {
        round_currency(payments.iter().filter(|p| pred(p)).map(field).sum())
    };

    let week_ago = Utc::now().date_naive() - Duration::days(6);
    let recent: Vec<Payment> = payments
        .iter()
        .filter(|p| p.paid_at.map(|t| t.date() >= week_ago).unwrap_or(false))
        .cloned()
        .collect();

    Ok(EarningsSummary {
        total_earnings: sum(&|_| true, &|p| p.worker_earnings),
        completed_earnings: sum(
            &|p| p.payment_status == PaymentStatus::Completed,
            &|p| p.worker_earnings,
        ),
        pending_earnings: sum(
            &|p| p.payment_status == PaymentStatus::Pending,
            &|p| p.worker_earnings,
        ),
        total_commission: sum(&|_| true, &|p| p.commission_amount),
        earnings_by_day: bucket_by_day(&recent, |p| p.worker_earnings),
    })
}

#[derive(Debug, Serialize)]
pub struct RevenueSummary {
    /// Platform revenue: the commission taken on completed payments.
    pub total_revenue: f64,
    pub settled_bookings: i64,
    pub revenue_by_day: Vec<DayBucket>,
}

pub fn revenue_summary(
    conn: &Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<RevenueSummary, AppError> {
    let payments = queries::completed_payments_in_range(conn, from, to)?;

    Ok(RevenueSummary {
        total_revenue: round_currency(payments.iter().map(|p| p.commission_amount).sum()),
        settled_bookings: payments.len() as i64,
        revenue_by_day: bucket_by_day(&payments, |p| p.commission_amount),
    })
}
