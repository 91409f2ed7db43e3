use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::{BookingStatus, Review};

#[derive(Debug, Deserialize)]
pub struct AddReviewInput {
    pub booking_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Customer reviews a completed booking. One review per booking; the worker's
/// rolling rating is recomputed on every add.
pub fn add_review(
    conn: &Connection,
    customer_id: &str,
    input: AddReviewInput,
) -> Result<Review, AppError> {
    if !(1..=5).contains(&input.rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let booking = queries::get_booking(conn, &input.booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", input.booking_id)))?;
    if booking.customer_id != customer_id {
        return Err(AppError::NotFound(format!(
            "booking {} not found",
            input.booking_id
        )));
    }
    if booking.status != BookingStatus::Completed {
        return Err(AppError::Validation(
            "only completed bookings can be reviewed".to_string(),
        ));
    }

    let review = Review {
        id: Uuid::new_v4().to_string(),
        booking_id: booking.id.clone(),
        customer_id: customer_id.to_string(),
        worker_id: booking.worker_id.clone(),
        rating: input.rating,
        comment: input.comment,
        created_at: Utc::now().naive_utc(),
    };

    match queries::insert_review(conn, &review) {
        Ok(()) => {}
        Err(e) if db::is_unique_violation(&e) => {
            return Err(AppError::Conflict(format!(
                "booking {} has already been reviewed",
                booking.id
            )))
        }
        Err(e) => return Err(e.into()),
    }

    recompute_worker_rating(conn, &review.worker_id)?;
    Ok(review)
}

/// Admin removes a review; the worker's rating is recomputed over what
/// remains (0 when none are left).
pub fn delete_review(conn: &Connection, review_id: &str) -> Result<(), AppError> {
    let review = queries::get_review(conn, review_id)?
        .ok_or_else(|| AppError::NotFound(format!("review {review_id} not found")))?;

    queries::delete_review(conn, review_id)?;
    recompute_worker_rating(conn, &review.worker_id)?;
    Ok(())
}

pub fn recompute_worker_rating(conn: &Connection, worker_id: &str) -> Result<(), AppError> {
    let ratings = queries::review_ratings_for_worker(conn, worker_id)?;
    let (rating, total) = if ratings.is_empty() {
        (0.0, 0)
    } else {
        let sum: i64 = ratings.iter().sum();
        (sum as f64 / ratings.len() as f64, ratings.len() as i64)
    };
    queries::set_worker_rating(conn, worker_id, rating, total)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{
        Address, Booking, BookingDuration, PaymentMethod, VerificationStatus, Worker,
    };

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn seed_worker(conn: &Connection, id: &str) {
        let now = Utc::now().naive_utc();
        let worker = Worker {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            service_category: "plumbing".to_string(),
            experience_years: 3,
            service_charges: 500.0,
            skills: vec!["pipes".to_string()],
            verification_status: VerificationStatus::Verified,
            verification_date: Some(now),
            rejection_reason: None,
            rating: 0.0,
            total_ratings: 0,
            completed_jobs: 0,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        queries::create_worker(conn, &worker).unwrap();
    }

    fn seed_booking(conn: &Connection, id: &str, customer_id: &str, worker_id: &str, status: BookingStatus) {
        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: id.to_string(),
            code: format!("BK-{id}"),
            customer_id: customer_id.to_string(),
            worker_id: worker_id.to_string(),
            service_category: "plumbing".to_string(),
            duration: BookingDuration::OneTime,
            scheduled_date: now.date(),
            scheduled_time: "10:00 AM".to_string(),
            address: Address {
                street: "12 Main St".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                postal_code: "411001".to_string(),
            },
            notes: None,
            payment_method: PaymentMethod::Cash,
            total_price: 700.0,
            status,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        queries::create_booking(conn, &booking).unwrap();
    }

    #[test]
    fn test_review_updates_worker_rating() {
        let conn = setup_db();
        seed_worker(&conn, "w1");
        seed_booking(&conn, "b1", "cust-1", "w1", BookingStatus::Completed);
        seed_booking(&conn, "b2", "cust-2", "w1", BookingStatus::Completed);

        add_review(
            &conn,
            "cust-1",
            AddReviewInput {
                booking_id: "b1".to_string(),
                rating: 5,
                comment: Some("great work".to_string()),
            },
        )
        .unwrap();
        add_review(
            &conn,
            "cust-2",
            AddReviewInput {
                booking_id: "b2".to_string(),
                rating: 4,
                comment: None,
            },
        )
        .unwrap();

        let worker = queries::get_worker(&conn, "w1").unwrap().unwrap();
        assert_eq!(worker.rating, 4.5);
        assert_eq!(worker.total_ratings, 2);
    }

    #[test]
    fn test_delete_review_recomputes_rating() {
        let conn = setup_db();
        seed_worker(&conn, "w1");
        seed_booking(&conn, "b1", "cust-1", "w1", BookingStatus::Completed);

        let review = add_review(
            &conn,
            "cust-1",
            AddReviewInput {
                booking_id: "b1".to_string(),
                rating: 2,
                comment: None,
            },
        )
        .unwrap();

        delete_review(&conn, &review.id).unwrap();

        let worker = queries::get_worker(&conn, "w1").unwrap().unwrap();
        assert_eq!(worker.rating, 0.0);
        assert_eq!(worker.total_ratings, 0);
    }

    #[test]
    fn test_only_completed_bookings_can_be_reviewed() {
        let conn = setup_db();
        seed_worker(&conn, "w1");
        seed_booking(&conn, "b1", "cust-1", "w1", BookingStatus::Confirmed);

        let result = add_review(
            &conn,
            "cust-1",
            AddReviewInput {
                booking_id: "b1".to_string(),
                rating: 5,
                comment: None,
            },
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_one_review_per_booking() {
        let conn = setup_db();
        seed_worker(&conn, "w1");
        seed_booking(&conn, "b1", "cust-1", "w1", BookingStatus::Completed);

        let input = || AddReviewInput {
            booking_id: "b1".to_string(),
            rating: 3,
            comment: None,
        };
        add_review(&conn, "cust-1", input()).unwrap();
        let second = add_review(&conn, "cust-1", input());
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_rating_bounds() {
        let conn = setup_db();
        seed_worker(&conn, "w1");
        seed_booking(&conn, "b1", "cust-1", "w1", BookingStatus::Completed);

        for rating in [0, 6, -1] {
            let result = add_review(
                &conn,
                "cust-1",
                AddReviewInput {
                    booking_id: "b1".to_string(),
                    rating,
                    comment: None,
                },
            );
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_other_customers_cannot_review() {
        let conn = setup_db();
        seed_worker(&conn, "w1");
        seed_booking(&conn, "b1", "cust-1", "w1", BookingStatus::Completed);

        let result = add_review(
            &conn,
            "cust-2",
            AddReviewInput {
                booking_id: "b1".to_string(),
                rating: 5,
                comment: None,
            },
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
