pub mod attendance;
pub mod booking;
pub mod notification;
pub mod payment;
pub mod review;
pub mod settings;
pub mod worker;

pub use attendance::{Attendance, AttendanceStatus};
pub use booking::{Address, Booking, BookingDuration, BookingStatus, PaymentMethod};
pub use notification::{Notification, NotificationEvent, NotificationKind, Role};
pub use payment::{Payment, PaymentStatus};
pub use review::Review;
pub use settings::SystemSettings;
pub use worker::{VerificationStatus, Worker};
