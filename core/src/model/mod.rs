pub mod booking;
pub mod stats;

pub use booking::{Booking, BookingTable, RawBookingRow};
pub use stats::{DashboardData, KpiSnapshot};
