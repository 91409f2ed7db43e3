use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{
    Address, Attendance, AttendanceStatus, Booking, BookingDuration, BookingStatus, Notification,
    NotificationEvent, NotificationKind, Payment, PaymentMethod, PaymentStatus, Review, Role,
    SystemSettings, VerificationStatus, Worker,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FMT).unwrap_or_else(|_| Utc::now().date_naive())
}

// ── Workers ──

const WORKER_COLS: &str = "id, user_id, service_category, experience_years, service_charges, \
     skills, verification_status, verification_date, rejection_reason, rating, total_ratings, \
     completed_jobs, is_available, created_at, updated_at";

fn worker_from_row(row: &Row) -> rusqlite::Result<Worker> {
    let skills_json: String = row.get(5)?;
    let verification_date: Option<String> = row.get(7)?;

    Ok(Worker {
        id: row.get(0)?,
        user_id: row.get(1)?,
        service_category: row.get(2)?,
        experience_years: row.get(3)?,
        service_charges: row.get(4)?,
        skills: serde_json::from_str(&skills_json).unwrap_or_default(),
        verification_status: VerificationStatus::parse(&row.get::<_, String>(6)?),
        verification_date: verification_date.map(|s| parse_dt(&s)),
        rejection_reason: row.get(8)?,
        rating: row.get(9)?,
        total_ratings: row.get(10)?,
        completed_jobs: row.get(11)?,
        is_available: row.get::<_, i32>(12)? != 0,
        created_at: parse_dt(&row.get::<_, String>(13)?),
        updated_at: parse_dt(&row.get::<_, String>(14)?),
    })
}

pub fn create_worker(conn: &Connection, worker: &Worker) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO workers (id, user_id, service_category, experience_years, service_charges, \
         skills, verification_status, rating, total_ratings, completed_jobs, is_available, \
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            worker.id,
            worker.user_id,
            worker.service_category,
            worker.experience_years,
            worker.service_charges,
            serde_json::to_string(&worker.skills).unwrap_or_else(|_| "[]".to_string()),
            worker.verification_status.as_str(),
            worker.rating,
            worker.total_ratings,
            worker.completed_jobs,
            worker.is_available as i32,
            fmt_dt(&worker.created_at),
            fmt_dt(&worker.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_worker(conn: &Connection, id: &str) -> rusqlite::Result<Option<Worker>> {
    let result = conn.query_row(
        &format!("SELECT {WORKER_COLS} FROM workers WHERE id = ?1"),
        params![id],
        worker_from_row,
    );

    match result {
        Ok(worker) => Ok(Some(worker)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_worker_by_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<Worker>> {
    let result = conn.query_row(
        &format!("SELECT {WORKER_COLS} FROM workers WHERE user_id = ?1"),
        params![user_id],
        worker_from_row,
    );

    match result {
        Ok(worker) => Ok(Some(worker)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn list_workers(conn: &Connection) -> rusqlite::Result<Vec<Worker>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {WORKER_COLS} FROM workers ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map([], worker_from_row)?;
    rows.collect()
}

pub fn update_worker_profile(
    conn: &Connection,
    id: &str,
    service_charges: Option<f64>,
    skills: Option<&[String]>,
    is_available: Option<bool>,
) -> rusqlite::Result<bool> {
    let skills_json = skills.map(|s| serde_json::to_string(s).unwrap_or_else(|_| "[]".to_string()));
    let count = conn.execute(
        "UPDATE workers SET
           service_charges = COALESCE(?1, service_charges),
           skills = COALESCE(?2, skills),
           is_available = COALESCE(?3, is_available),
           updated_at = ?4
         WHERE id = ?5",
        params![
            service_charges,
            skills_json,
            is_available.map(|b| b as i32),
            fmt_dt(&Utc::now().naive_utc()),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn set_worker_verification(
    conn: &Connection,
    id: &str,
    status: VerificationStatus,
    rejection_reason: Option<&str>,
) -> rusqlite::Result<bool> {
    let now = fmt_dt(&Utc::now().naive_utc());
    let verification_date = match status {
        VerificationStatus::Verified => Some(now.clone()),
        _ => None,
    };
    let count = conn.execute(
        "UPDATE workers SET verification_status = ?1, verification_date = ?2, \
         rejection_reason = ?3, updated_at = ?4 WHERE id = ?5",
        params![status.as_str(), verification_date, rejection_reason, now, id],
    )?;
    Ok(count > 0)
}

pub fn set_worker_rating(
    conn: &Connection,
    id: &str,
    rating: f64,
    total_ratings: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE workers SET rating = ?1, total_ratings = ?2, updated_at = ?3 WHERE id = ?4",
        params![rating, total_ratings, fmt_dt(&Utc::now().naive_utc()), id],
    )?;
    Ok(())
}

pub fn increment_completed_jobs(conn: &Connection, id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE workers SET completed_jobs = completed_jobs + 1, updated_at = ?1 WHERE id = ?2",
        params![fmt_dt(&Utc::now().naive_utc()), id],
    )?;
    Ok(())
}

// ── Bookings ──

const BOOKING_COLS: &str = "id, code, customer_id, worker_id, service_category, duration, \
     scheduled_date, scheduled_time, street, city, state, postal_code, notes, payment_method, \
     total_price, status, cancellation_reason, created_at, updated_at";

fn booking_from_row(row: &Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        code: row.get(1)?,
        customer_id: row.get(2)?,
        worker_id: row.get(3)?,
        service_category: row.get(4)?,
        duration: BookingDuration::parse(&row.get::<_, String>(5)?)
            .unwrap_or(BookingDuration::OneTime),
        scheduled_date: parse_date(&row.get::<_, String>(6)?),
        scheduled_time: row.get(7)?,
        address: Address {
            street: row.get(8)?,
            city: row.get(9)?,
            state: row.get(10)?,
            postal_code: row.get(11)?,
        },
        notes: row.get(12)?,
        payment_method: PaymentMethod::parse(&row.get::<_, String>(13)?)
            .unwrap_or(PaymentMethod::Cash),
        total_price: row.get(14)?,
        status: BookingStatus::parse(&row.get::<_, String>(15)?),
        cancellation_reason: row.get(16)?,
        created_at: parse_dt(&row.get::<_, String>(17)?),
        updated_at: parse_dt(&row.get::<_, String>(18)?),
    })
}

pub fn create_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, code, customer_id, worker_id, service_category, duration, \
         scheduled_date, scheduled_time, street, city, state, postal_code, notes, \
         payment_method, total_price, status, cancellation_reason, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            booking.id,
            booking.code,
            booking.customer_id,
            booking.worker_id,
            booking.service_category,
            booking.duration.as_str(),
            booking.scheduled_date.format(DATE_FMT).to_string(),
            booking.scheduled_time,
            booking.address.street,
            booking.address.city,
            booking.address.state,
            booking.address.postal_code,
            booking.notes,
            booking.payment_method.as_str(),
            booking.total_price,
            booking.status.as_str(),
            booking.cancellation_reason,
            fmt_dt(&booking.created_at),
            fmt_dt(&booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        booking_from_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn bookings_for_customer(conn: &Connection, customer_id: &str) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE customer_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![customer_id], booking_from_row)?;
    rows.collect()
}

pub fn bookings_for_worker(conn: &Connection, worker_id: &str) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE worker_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![worker_id], booking_from_row)?;
    rows.collect()
}

pub fn list_bookings(
    conn: &Connection,
    status: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings
         WHERE (?1 IS NULL OR status = ?1)
           AND (?2 IS NULL OR scheduled_date >= ?2)
           AND (?3 IS NULL OR scheduled_date <= ?3)
         ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(
        params![
            status,
            from.map(|d| d.format(DATE_FMT).to_string()),
            to.map(|d| d.format(DATE_FMT).to_string()),
        ],
        booking_from_row,
    )?;
    rows.collect()
}

/// Compare-and-swap on the status column. Returns false when the booking is
/// no longer in `from` (the caller lost the race or the transition is stale).
pub fn cas_booking_status(
    conn: &Connection,
    id: &str,
    from: BookingStatus,
    to: BookingStatus,
    reason: Option<&str>,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, \
         cancellation_reason = COALESCE(?2, cancellation_reason), updated_at = ?3
         WHERE id = ?4 AND status = ?5",
        params![
            to.as_str(),
            reason,
            fmt_dt(&Utc::now().naive_utc()),
            id,
            from.as_str(),
        ],
    )?;
    Ok(count > 0)
}

/// Replace the assigned worker; only legal while the booking is confirmed.
pub fn cas_booking_worker(
    conn: &Connection,
    id: &str,
    new_worker_id: &str,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET worker_id = ?1, updated_at = ?2
         WHERE id = ?3 AND status = 'confirmed'",
        params![new_worker_id, fmt_dt(&Utc::now().naive_utc()), id],
    )?;
    Ok(count > 0)
}

// ── Attendance ──

const ATTENDANCE_COLS: &str = "id, booking_id, worker_id, customer_id, check_in_time, \
     check_out_time, duration_minutes, status, created_at, updated_at";

fn attendance_from_row(row: &Row) -> rusqlite::Result<Attendance> {
    let check_in: Option<String> = row.get(4)?;
    let check_out: Option<String> = row.get(5)?;

    Ok(Attendance {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        worker_id: row.get(2)?,
        customer_id: row.get(3)?,
        check_in_time: check_in.map(|s| parse_dt(&s)),
        check_out_time: check_out.map(|s| parse_dt(&s)),
        duration_minutes: row.get(6)?,
        status: AttendanceStatus::parse(&row.get::<_, String>(7)?),
        created_at: parse_dt(&row.get::<_, String>(8)?),
        updated_at: parse_dt(&row.get::<_, String>(9)?),
    })
}

/// Create the attendance row on first check-in; a re-check-in overwrites the
/// check-in time on the existing row (UNIQUE booking_id).
pub fn upsert_check_in(conn: &Connection, attendance: &Attendance) -> rusqlite::Result<()> {
    let check_in = attendance.check_in_time.as_ref().map(fmt_dt);
    conn.execute(
        "INSERT INTO attendance (id, booking_id, worker_id, customer_id, check_in_time, \
         duration_minutes, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(booking_id) DO UPDATE SET
           check_in_time = excluded.check_in_time,
           status = excluded.status,
           updated_at = excluded.updated_at",
        params![
            attendance.id,
            attendance.booking_id,
            attendance.worker_id,
            attendance.customer_id,
            check_in,
            attendance.duration_minutes,
            attendance.status.as_str(),
            fmt_dt(&attendance.created_at),
            fmt_dt(&attendance.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_attendance_by_booking(
    conn: &Connection,
    booking_id: &str,
) -> rusqlite::Result<Option<Attendance>> {
    let result = conn.query_row(
        &format!("SELECT {ATTENDANCE_COLS} FROM attendance WHERE booking_id = ?1"),
        params![booking_id],
        attendance_from_row,
    );

    match result {
        Ok(attendance) => Ok(Some(attendance)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Finalize the record; guarded on checked-in status so a second check-out
/// updates nothing and the caller sees the race.
pub fn finalize_check_out(
    conn: &Connection,
    booking_id: &str,
    check_out_time: &NaiveDateTime,
    duration_minutes: i64,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE attendance SET check_out_time = ?1, duration_minutes = ?2, \
         status = 'checked-out', updated_at = ?3
         WHERE booking_id = ?4 AND status = 'checked-in'",
        params![
            fmt_dt(check_out_time),
            duration_minutes,
            fmt_dt(&Utc::now().naive_utc()),
            booking_id,
        ],
    )?;
    Ok(count > 0)
}

pub fn attendance_for_customer(
    conn: &Connection,
    customer_id: &str,
) -> rusqlite::Result<Vec<Attendance>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ATTENDANCE_COLS} FROM attendance WHERE customer_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![customer_id], attendance_from_row)?;
    rows.collect()
}

// ── Payments ──

const PAYMENT_COLS: &str = "id, booking_id, customer_id, worker_id, amount, commission_rate, \
     commission_amount, worker_earnings, payment_method, payment_status, transaction_id, \
     refund_amount, refund_reason, paid_at, created_at";

fn payment_from_row(row: &Row) -> rusqlite::Result<Payment> {
    let paid_at: Option<String> = row.get(13)?;

    Ok(Payment {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        customer_id: row.get(2)?,
        worker_id: row.get(3)?,
        amount: row.get(4)?,
        commission_rate: row.get(5)?,
        commission_amount: row.get(6)?,
        worker_earnings: row.get(7)?,
        payment_method: PaymentMethod::parse(&row.get::<_, String>(8)?)
            .unwrap_or(PaymentMethod::Cash),
        payment_status: PaymentStatus::parse(&row.get::<_, String>(9)?),
        transaction_id: row.get(10)?,
        refund_amount: row.get(11)?,
        refund_reason: row.get(12)?,
        paid_at: paid_at.map(|s| parse_dt(&s)),
        created_at: parse_dt(&row.get::<_, String>(14)?),
    })
}

pub fn insert_payment(conn: &Connection, payment: &Payment) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO payments (id, booking_id, customer_id, worker_id, amount, commission_rate, \
         commission_amount, worker_earnings, payment_method, payment_status, transaction_id, \
         refund_amount, refund_reason, paid_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            payment.id,
            payment.booking_id,
            payment.customer_id,
            payment.worker_id,
            payment.amount,
            payment.commission_rate,
            payment.commission_amount,
            payment.worker_earnings,
            payment.payment_method.as_str(),
            payment.payment_status.as_str(),
            payment.transaction_id,
            payment.refund_amount,
            payment.refund_reason,
            payment.paid_at.as_ref().map(fmt_dt),
            fmt_dt(&payment.created_at),
        ],
    )?;
    Ok(())
}

pub fn payments_for_worker(conn: &Connection, worker_id: &str) -> rusqlite::Result<Vec<Payment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLS} FROM payments WHERE worker_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![worker_id], payment_from_row)?;
    rows.collect()
}

pub fn completed_payments_in_range(
    conn: &Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> rusqlite::Result<Vec<Payment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLS} FROM payments
         WHERE payment_status = 'completed'
           AND (?1 IS NULL OR date(paid_at) >= ?1)
           AND (?2 IS NULL OR date(paid_at) <= ?2)
         ORDER BY paid_at ASC"
    ))?;
    let rows = stmt.query_map(
        params![
            from.map(|d| d.format(DATE_FMT).to_string()),
            to.map(|d| d.format(DATE_FMT).to_string()),
        ],
        payment_from_row,
    )?;
    rows.collect()
}

// ── Reviews ──

const REVIEW_COLS: &str = "id, booking_id, customer_id, worker_id, rating, comment, created_at";

fn review_from_row(row: &Row) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        customer_id: row.get(2)?,
        worker_id: row.get(3)?,
        rating: row.get(4)?,
        comment: row.get(5)?,
        created_at: parse_dt(&row.get::<_, String>(6)?),
    })
}

pub fn insert_review(conn: &Connection, review: &Review) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO reviews (id, booking_id, customer_id, worker_id, rating, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            review.id,
            review.booking_id,
            review.customer_id,
            review.worker_id,
            review.rating,
            review.comment,
            fmt_dt(&review.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_review(conn: &Connection, id: &str) -> rusqlite::Result<Option<Review>> {
    let result = conn.query_row(
        &format!("SELECT {REVIEW_COLS} FROM reviews WHERE id = ?1"),
        params![id],
        review_from_row,
    );

    match result {
        Ok(review) => Ok(Some(review)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn delete_review(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM reviews WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn review_ratings_for_worker(conn: &Connection, worker_id: &str) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT rating FROM reviews WHERE worker_id = ?1")?;
    let rows = stmt.query_map(params![worker_id], |row| row.get(0))?;
    rows.collect()
}

// ── Notifications ──

pub fn insert_notification(conn: &Connection, event: &NotificationEvent) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO notifications (recipient_id, recipient_role, kind, title, message, related_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.recipient_id,
            event.recipient_role.as_str(),
            event.kind.as_str(),
            event.title,
            event.message,
            event.related_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn notifications_for_recipient(
    conn: &Connection,
    recipient_id: &str,
    limit: i64,
) -> rusqlite::Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, recipient_id, recipient_role, kind, title, message, related_id, is_read, created_at
         FROM notifications WHERE recipient_id = ?1 ORDER BY id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![recipient_id, limit], |row| {
        Ok(Notification {
            id: row.get(0)?,
            recipient_id: row.get(1)?,
            recipient_role: Role::parse(&row.get::<_, String>(2)?).unwrap_or(Role::Customer),
            kind: NotificationKind::parse(&row.get::<_, String>(3)?),
            title: row.get(4)?,
            message: row.get(5)?,
            related_id: row.get(6)?,
            is_read: row.get::<_, i32>(7)? != 0,
            created_at: parse_dt(&row.get::<_, String>(8)?),
        })
    })?;
    rows.collect()
}

pub fn mark_notification_read(
    conn: &Connection,
    id: i64,
    recipient_id: &str,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND recipient_id = ?2",
        params![id, recipient_id],
    )?;
    Ok(count > 0)
}

// ── System settings ──

pub fn get_settings(conn: &Connection) -> rusqlite::Result<SystemSettings> {
    let result = conn.query_row(
        "SELECT commission_rate FROM system_settings WHERE id = 1",
        [],
        |row| {
            Ok(SystemSettings {
                commission_rate: row.get(0)?,
            })
        },
    );

    match result {
        Ok(settings) => Ok(settings),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(SystemSettings::default()),
        Err(e) => Err(e),
    }
}

pub fn set_commission_rate(conn: &Connection, rate: f64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO system_settings (id, commission_rate, updated_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET
           commission_rate = excluded.commission_rate,
           updated_at = excluded.updated_at",
        params![rate, fmt_dt(&Utc::now().naive_utc())],
    )?;
    Ok(())
}

// ── Dashboard ──

pub struct DashboardCounts {
    pub total_customers: i64,
    pub total_workers: i64,
    pub total_bookings: i64,
    pub total_revenue: f64,
}

pub fn dashboard_counts(conn: &Connection) -> rusqlite::Result<DashboardCounts> {
    let total_customers: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT customer_id) FROM bookings",
        [],
        |row| row.get(0),
    )?;
    let total_workers: i64 =
        conn.query_row("SELECT COUNT(*) FROM workers", [], |row| row.get(0))?;
    let total_bookings: i64 =
        conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
    let total_revenue: f64 = conn.query_row(
        "SELECT COALESCE(SUM(commission_amount), 0) FROM payments WHERE payment_status = 'completed'",
        [],
        |row| row.get(0),
    )?;

    Ok(DashboardCounts {
        total_customers,
        total_workers,
        total_bookings,
        total_revenue,
    })
}
