pub mod model;
pub mod repository;
pub mod service;

pub use model::booking::{Booking, BookingTable, RawBookingRow, MONTH_ORDER};
pub use model::stats::{
    CountryCount, DashboardData, HotelCancellation, KpiSnapshot, LeadTimeSplit, LeadTimeSummary,
    MonthCount,
};
pub use repository::csv_file::{CsvBookingSource, LoadReport};
pub use service::dashboard::{
    cancellation_by_hotel, compute_kpis, filter_bookings, lead_time_by_outcome, monthly_counts,
    summarize_lead_times, top_countries, DashboardService, FilterSelection, TOP_COUNTRIES,
};
