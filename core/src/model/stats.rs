use chrono::Month;

/// Scalar summary of the current filtered view. Every field is a plain
/// total or mean; an empty view yields all zeros rather than NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSnapshot {
    pub total_bookings: usize,
    pub cancelled_bookings: usize,
    /// Percent, 0..=100.
    pub cancellation_rate: f64,
    pub avg_adr: f64,
    /// Mean lead time in days.
    pub avg_lead_time: f64,
}

/// One bar of the monthly trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCount {
    pub month: Month,
    pub count: u64,
}

/// Mean cancellation flag per hotel category.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelCancellation {
    pub hotel: String,
    /// Fraction, 0..=1. Scaled to percent only at the display edge.
    pub rate: f64,
}

/// Lead-time values partitioned by outcome, feeding the distribution
/// comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadTimeSplit {
    pub kept: Vec<u32>,
    pub cancelled: Vec<u32>,
}

/// Five-number summary (plus mean) of one lead-time group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadTimeSummary {
    pub count: usize,
    pub mean: f64,
    pub min: u32,
    pub p25: u32,
    pub median: u32,
    pub p75: u32,
    pub max: u32,
}

/// One entry of the top-countries ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

/// Everything the UI renders for one filter selection: the KPI row plus
/// the four chart series, produced by a single recompute pass.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub kpis: KpiSnapshot,
    pub monthly: Vec<MonthCount>,
    pub by_hotel: Vec<HotelCancellation>,
    pub lead_times: LeadTimeSplit,
    pub top_countries: Vec<CountryCount>,
}
