use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::settings::{MAX_COMMISSION_RATE, MIN_COMMISSION_RATE};
use crate::models::{Booking, Payment, PaymentStatus};

/// Round to the currency's minor unit (2 decimal places), half-up.
/// Amounts are non-negative, so `f64::round` (half away from zero) is half-up.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Split a gross amount into (commission, worker earnings) at the given rate.
/// The commission is rounded; earnings are the exact remainder, so the two
/// always reconcile to the gross amount.
pub fn compute_split(amount: f64, commission_rate: f64) -> Result<(f64, f64), AppError> {
    if !(MIN_COMMISSION_RATE..=MAX_COMMISSION_RATE).contains(&commission_rate) {
        return Err(AppError::Settlement(format!(
            "commission rate {commission_rate} outside {MIN_COMMISSION_RATE}-{MAX_COMMISSION_RATE}"
        )));
    }
    if amount < 0.0 || !amount.is_finite() {
        return Err(AppError::Settlement(format!("invalid gross amount {amount}")));
    }

    let commission = round_currency(amount * commission_rate / 100.0);
    let earnings = amount - commission;
    Ok((commission, earnings))
}

/// Build the payment record for a booking settling now, snapshotting the
/// commission rate. Invoked only from check-out; the one-payment-per-booking
/// guarantee comes from the UNIQUE key on payments.booking_id.
pub fn settle(booking: &Booking, commission_rate: f64, now: NaiveDateTime) -> Result<Payment, AppError> {
    let (commission_amount, worker_earnings) = compute_split(booking.total_price, commission_rate)?;

    Ok(Payment {
        id: Uuid::new_v4().to_string(),
        booking_id: booking.id.clone(),
        customer_id: booking.customer_id.clone(),
        worker_id: booking.worker_id.clone(),
        amount: booking.total_price,
        commission_rate,
        commission_amount,
        worker_earnings,
        payment_method: booking.payment_method,
        payment_status: PaymentStatus::Completed,
        transaction_id: None,
        refund_amount: None,
        refund_reason: None,
        paid_at: Some(now),
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        let (commission, earnings) = compute_split(700.0, 10.0).unwrap();
        assert_eq!(commission, 70.0);
        assert_eq!(earnings, 630.0);
    }

    #[test]
    fn test_split_rounds_half_up() {
        // 99.99 * 10% = 9.999 -> 10.00
        let (commission, earnings) = compute_split(99.99, 10.0).unwrap();
        assert_eq!(commission, 10.0);
        assert_eq!(earnings, 99.99 - 10.0);
    }

    #[test]
    fn test_split_reconciles() {
        for amount in [0.0, 1.0, 49.99, 123.45, 700.0, 999.99, 12345.67] {
            for rate in [0.0, 5.0, 10.0, 12.5, 50.0] {
                let (commission, earnings) = compute_split(amount, rate).unwrap();
                assert!(
                    (commission + earnings - amount).abs() < 1e-9,
                    "split of {amount} at {rate}% does not reconcile"
                );
                assert!(commission >= 0.0);
                assert!(earnings >= 0.0);
            }
        }
    }

    #[test]
    fn test_zero_rate_gives_worker_everything() {
        let (commission, earnings) = compute_split(250.0, 0.0).unwrap();
        assert_eq!(commission, 0.0);
        assert_eq!(earnings, 250.0);
    }

    #[test]
    fn test_rate_out_of_bounds() {
        assert!(compute_split(100.0, -1.0).is_err());
        assert!(compute_split(100.0, 50.1).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(compute_split(-5.0, 10.0).is_err());
    }
}
