use std::collections::{HashMap, HashSet};

use crate::model::booking::{Booking, BookingTable, MONTH_ORDER};
use crate::model::stats::{
    CountryCount, DashboardData, HotelCancellation, KpiSnapshot, LeadTimeSplit, LeadTimeSummary,
    MonthCount,
};

/// Ranking cutoff for the country chart.
pub const TOP_COUNTRIES: usize = 10;

/// Which hotel categories and arrival years the user currently wants.
/// An empty selection is legal and simply yields an empty view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub hotels: HashSet<String>,
    pub years: HashSet<i32>,
}

impl FilterSelection {
    /// Selection covering every observed value; the startup default.
    pub fn all(table: &BookingTable) -> Self {
        Self {
            hotels: table.hotels.iter().cloned().collect(),
            years: table.years.iter().copied().collect(),
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.hotels.contains(&booking.hotel) && self.years.contains(&booking.arrival_year)
    }

    pub fn toggle_hotel(&mut self, hotel: &str) {
        if !self.hotels.remove(hotel) {
            self.hotels.insert(hotel.to_string());
        }
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }
}

/// Owns the loaded table and runs the whole filter-and-aggregate pass.
/// Constructed once in main; the table is never mutated afterwards.
pub struct DashboardService {
    table: BookingTable,
}

impl DashboardService {
    pub fn new(table: BookingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BookingTable {
        &self.table
    }

    /// One full recompute: filter, then the KPI snapshot and all four
    /// series. Called by the UI on every selection change.
    pub fn snapshot(&self, selection: &FilterSelection) -> DashboardData {
        let view = filter_bookings(&self.table, selection);
        DashboardData {
            kpis: compute_kpis(&view),
            monthly: monthly_counts(&view),
            by_hotel: cancellation_by_hotel(&view),
            lead_times: lead_time_by_outcome(&view),
            top_countries: top_countries(&view),
        }
    }
}

// Standalone pure functions for the pipeline steps

/// Rows whose hotel category and arrival year both belong to the
/// selection, in source order.
pub fn filter_bookings<'a>(table: &'a BookingTable, selection: &FilterSelection) -> Vec<&'a Booking> {
    table
        .bookings
        .iter()
        .filter(|b| selection.matches(b))
        .collect()
}

pub fn compute_kpis(view: &[&Booking]) -> KpiSnapshot {
    let total = view.len();
    if total == 0 {
        return KpiSnapshot::default();
    }

    let cancelled = view.iter().filter(|b| b.is_canceled).count();
    let adr_sum: f64 = view.iter().map(|b| b.adr).sum();
    let lead_sum: f64 = view.iter().map(|b| b.lead_time as f64).sum();

    KpiSnapshot {
        total_bookings: total,
        cancelled_bookings: cancelled,
        cancellation_rate: cancelled as f64 / total as f64 * 100.0,
        avg_adr: adr_sum / total as f64,
        avg_lead_time: lead_sum / total as f64,
    }
}

/// Booking count per arrival month, reindexed onto January..December with
/// missing months as 0.
pub fn monthly_counts(view: &[&Booking]) -> Vec<MonthCount> {
    let mut counts = [0u64; 12];
    for booking in view {
        counts[booking.arrival_month.number_from_month() as usize - 1] += 1;
    }

    MONTH_ORDER
        .iter()
        .map(|&month| MonthCount {
            month,
            count: counts[month.number_from_month() as usize - 1],
        })
        .collect()
}

/// Mean cancellation flag per hotel category, in first-encountered order.
/// Categories with no rows in the view are absent, not zero.
pub fn cancellation_by_hotel(view: &[&Booking]) -> Vec<HotelCancellation> {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, (u64, u64)> = HashMap::new();

    for booking in view {
        let entry = tallies.entry(booking.hotel.as_str()).or_insert_with(|| {
            order.push(booking.hotel.as_str());
            (0, 0)
        });
        entry.0 += 1;
        if booking.is_canceled {
            entry.1 += 1;
        }
    }

    order
        .into_iter()
        .map(|hotel| {
            let (rows, cancelled) = tallies[hotel];
            HotelCancellation {
                hotel: hotel.to_string(),
                rate: cancelled as f64 / rows as f64,
            }
        })
        .collect()
}

/// Lead-time values partitioned by cancellation flag.
pub fn lead_time_by_outcome(view: &[&Booking]) -> LeadTimeSplit {
    let mut split = LeadTimeSplit::default();
    for booking in view {
        if booking.is_canceled {
            split.cancelled.push(booking.lead_time);
        } else {
            split.kept.push(booking.lead_time);
        }
    }
    split
}

/// Five-number summary plus mean for one lead-time group. All zeros for
/// an empty group.
pub fn summarize_lead_times(values: &[u32]) -> LeadTimeSummary {
    if values.is_empty() {
        return LeadTimeSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let count = sorted.len();
    let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / count as f64;

    LeadTimeSummary {
        count,
        mean,
        min: sorted[0],
        p25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        p75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

// Nearest-rank on the already-sorted values.
fn percentile(sorted: &[u32], q: f64) -> u32 {
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[idx]
}

/// Booking count per country, descending, truncated to [`TOP_COUNTRIES`].
/// Ties keep first-encountered source order (stable sort). Rows without
/// a country count toward the KPIs but are skipped here.
pub fn top_countries(view: &[&Booking]) -> Vec<CountryCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for booking in view {
        let Some(country) = booking.country.as_deref() else {
            continue;
        };
        if !counts.contains_key(country) {
            order.push(country);
        }
        *counts.entry(country).or_insert(0) += 1;
    }

    let mut ranked: Vec<CountryCount> = order
        .into_iter()
        .map(|country| CountryCount {
            country: country.to_string(),
            count: counts[country],
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_COUNTRIES);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    fn booking(
        hotel: &str,
        year: i32,
        month: Month,
        canceled: bool,
        adr: f64,
        lead_time: u32,
        country: Option<&str>,
    ) -> Booking {
        Booking {
            hotel: hotel.to_string(),
            arrival_year: year,
            arrival_month: month,
            is_canceled: canceled,
            adr,
            lead_time,
            country: country.map(|c| c.to_string()),
        }
    }

    fn sample_table() -> BookingTable {
        BookingTable::new(vec![
            booking("Resort Hotel", 2016, Month::July, false, 100.0, 10, Some("PRT")),
            booking("Resort Hotel", 2016, Month::July, true, 120.0, 30, Some("GBR")),
            booking("City Hotel", 2017, Month::August, false, 80.0, 5, Some("PRT")),
            booking("City Hotel", 2016, Month::January, true, 60.0, 200, None),
        ])
    }

    #[test]
    fn test_filter_matches_both_dimensions() {
        let table = sample_table();
        let mut selection = FilterSelection::default();
        selection.hotels.insert("Resort Hotel".to_string());
        selection.years.insert(2016);

        let view = filter_bookings(&table, &selection);
        assert_eq!(view.len(), 2);
        assert!(view
            .iter()
            .all(|b| b.hotel == "Resort Hotel" && b.arrival_year == 2016));
    }

    #[test]
    fn test_filter_all_returns_whole_table() {
        let table = sample_table();
        let view = filter_bookings(&table, &FilterSelection::all(&table));
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn test_empty_selection_yields_empty_view_and_zero_kpis() {
        let table = sample_table();
        let view = filter_bookings(&table, &FilterSelection::default());
        assert!(view.is_empty());

        let kpis = compute_kpis(&view);
        assert_eq!(kpis, KpiSnapshot::default());
        assert_eq!(kpis.cancellation_rate, 0.0);
        assert_eq!(kpis.avg_adr, 0.0);
        assert_eq!(kpis.avg_lead_time, 0.0);
    }

    #[test]
    fn test_kpi_rate_is_exact_percentage() {
        // The two-row Resort/2016 slice: one kept, one cancelled.
        let table = sample_table();
        let mut selection = FilterSelection::default();
        selection.hotels.insert("Resort Hotel".to_string());
        selection.years.insert(2016);

        let kpis = compute_kpis(&filter_bookings(&table, &selection));
        assert_eq!(kpis.total_bookings, 2);
        assert_eq!(kpis.cancelled_bookings, 1);
        assert_eq!(kpis.cancellation_rate, 50.0);
        assert_eq!(kpis.avg_adr, 110.0);
        assert_eq!(kpis.avg_lead_time, 20.0);
    }

    #[test]
    fn test_monthly_counts_cover_the_whole_calendar() {
        let table = sample_table();
        let view = filter_bookings(&table, &FilterSelection::all(&table));
        let monthly = monthly_counts(&view);

        assert_eq!(monthly.len(), 12);
        for (i, entry) in monthly.iter().enumerate() {
            assert_eq!(entry.month.number_from_month() as usize, i + 1);
        }
        let total: u64 = monthly.iter().map(|m| m.count).sum();
        assert_eq!(total as usize, view.len());

        assert_eq!(monthly[0].count, 1); // January
        assert_eq!(monthly[6].count, 2); // July
        assert_eq!(monthly[7].count, 1); // August
        assert_eq!(monthly[2].count, 0); // March: zero-filled
    }

    #[test]
    fn test_cancellation_by_hotel_omits_absent_categories() {
        let table = sample_table();
        let mut selection = FilterSelection::all(&table);
        selection.hotels.remove("City Hotel");

        let rates = cancellation_by_hotel(&filter_bookings(&table, &selection));
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].hotel, "Resort Hotel");
        assert_eq!(rates[0].rate, 0.5);
    }

    #[test]
    fn test_cancellation_by_hotel_rates() {
        let table = sample_table();
        let view = filter_bookings(&table, &FilterSelection::all(&table));
        let rates = cancellation_by_hotel(&view);

        // First-encountered order: Resort first in the source.
        assert_eq!(rates[0].hotel, "Resort Hotel");
        assert_eq!(rates[0].rate, 0.5);
        assert_eq!(rates[1].hotel, "City Hotel");
        assert_eq!(rates[1].rate, 0.5);
    }

    #[test]
    fn test_lead_time_partition_covers_view() {
        let table = sample_table();
        let view = filter_bookings(&table, &FilterSelection::all(&table));
        let split = lead_time_by_outcome(&view);

        assert_eq!(split.kept.len() + split.cancelled.len(), view.len());
        assert_eq!(split.kept, vec![10, 5]);
        assert_eq!(split.cancelled, vec![30, 200]);
    }

    #[test]
    fn test_summarize_lead_times() {
        let summary = summarize_lead_times(&[0, 10, 20, 30, 100]);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 32.0);
        assert_eq!(summary.min, 0);
        assert_eq!(summary.p25, 10);
        assert_eq!(summary.median, 20);
        assert_eq!(summary.p75, 30);
        assert_eq!(summary.max, 100);

        assert_eq!(summarize_lead_times(&[]), LeadTimeSummary::default());
    }

    #[test]
    fn test_top_countries_ranking() {
        let mut bookings = Vec::new();
        for _ in 0..3 {
            bookings.push(booking("City Hotel", 2016, Month::May, false, 50.0, 1, Some("PRT")));
        }
        for _ in 0..2 {
            bookings.push(booking("City Hotel", 2016, Month::May, false, 50.0, 1, Some("GBR")));
        }
        // FRA ties with ESP; FRA appears first in the source.
        bookings.push(booking("City Hotel", 2016, Month::May, false, 50.0, 1, Some("FRA")));
        bookings.push(booking("City Hotel", 2016, Month::May, false, 50.0, 1, Some("ESP")));
        // No country: counted in KPIs, absent from the ranking.
        bookings.push(booking("City Hotel", 2016, Month::May, false, 50.0, 1, None));

        let table = BookingTable::new(bookings);
        let view = filter_bookings(&table, &FilterSelection::all(&table));

        assert_eq!(compute_kpis(&view).total_bookings, 8);

        let ranked = top_countries(&view);
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0].country, "PRT");
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[1].country, "GBR");
        assert_eq!(ranked[2].country, "FRA");
        assert_eq!(ranked[3].country, "ESP");
        for pair in ranked.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_top_countries_truncates_to_ten() {
        let mut bookings = Vec::new();
        for i in 0..15 {
            let code = format!("C{:02}", i);
            for _ in 0..(15 - i) {
                bookings.push(booking("City Hotel", 2016, Month::May, false, 50.0, 1, Some(code.as_str())));
            }
        }
        let table = BookingTable::new(bookings);
        let view = filter_bookings(&table, &FilterSelection::all(&table));

        let ranked = top_countries(&view);
        assert_eq!(ranked.len(), TOP_COUNTRIES);
        assert_eq!(ranked[0].country, "C00");
        assert_eq!(ranked[0].count, 15);
    }

    #[test]
    fn test_toggle_roundtrip() {
        let table = sample_table();
        let mut selection = FilterSelection::all(&table);

        selection.toggle_year(2017);
        assert!(!selection.years.contains(&2017));
        selection.toggle_year(2017);
        assert!(selection.years.contains(&2017));

        selection.toggle_hotel("City Hotel");
        assert!(!selection.hotels.contains("City Hotel"));
        assert_eq!(selection, {
            let mut expected = FilterSelection::all(&table);
            expected.hotels.remove("City Hotel");
            expected
        });
    }

    #[test]
    fn test_service_snapshot_is_one_full_pass() {
        let service = DashboardService::new(sample_table());
        let selection = FilterSelection::all(service.table());
        let data = service.snapshot(&selection);

        assert_eq!(data.kpis.total_bookings, 4);
        assert_eq!(data.monthly.len(), 12);
        assert_eq!(data.by_hotel.len(), 2);
        assert_eq!(data.lead_times.kept.len() + data.lead_times.cancelled.len(), 4);
        assert_eq!(data.top_countries.len(), 2); // PRT, GBR; the None row is skipped

        // Same selection, same numbers: the pass is pure.
        let again = service.snapshot(&selection);
        assert_eq!(again.kpis, data.kpis);
        assert_eq!(again.monthly, data.monthly);
    }
}
