use chrono::Month;
use serde::Deserialize;

/// Calendar ordering for the monthly series. Charts read left-to-right
/// chronologically, not by frequency.
pub const MONTH_ORDER: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// One line of the source CSV as serde hands it over. Every field is kept
/// as an optional string so a single malformed cell never aborts the whole
/// load; conversion into [`Booking`] decides what is usable. Columns not
/// listed here are ignored.
#[derive(Debug, Deserialize)]
pub struct RawBookingRow {
    pub hotel: Option<String>,
    pub is_canceled: Option<String>,
    pub lead_time: Option<String>,
    pub arrival_date_year: Option<String>,
    pub arrival_date_month: Option<String>,
    pub adr: Option<String>,
    pub country: Option<String>,
}

/// One reservation attempt with the attributes the dashboard works on.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub hotel: String,
    pub arrival_year: i32,
    pub arrival_month: Month,
    pub is_canceled: bool,
    /// Average daily rate.
    pub adr: f64,
    /// Days between booking and arrival.
    pub lead_time: u32,
    /// `None` when the source cell is empty or the dataset's "NULL"
    /// placeholder.
    pub country: Option<String>,
}

/// The full record set, loaded once and immutable for the process
/// lifetime, plus the observed distinct filter dimensions used to seed
/// the default selection.
#[derive(Debug, Clone, Default)]
pub struct BookingTable {
    pub bookings: Vec<Booking>,
    /// Distinct hotel categories, sorted.
    pub hotels: Vec<String>,
    /// Distinct arrival years, sorted.
    pub years: Vec<i32>,
}

impl BookingTable {
    pub fn new(bookings: Vec<Booking>) -> Self {
        let mut hotels: Vec<String> = bookings.iter().map(|b| b.hotel.clone()).collect();
        hotels.sort();
        hotels.dedup();

        let mut years: Vec<i32> = bookings.iter().map(|b| b.arrival_year).collect();
        years.sort_unstable();
        years.dedup();

        Self {
            bookings,
            hotels,
            years,
        }
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(hotel: &str, year: i32) -> Booking {
        Booking {
            hotel: hotel.to_string(),
            arrival_year: year,
            arrival_month: Month::July,
            is_canceled: false,
            adr: 100.0,
            lead_time: 10,
            country: None,
        }
    }

    #[test]
    fn test_month_order_is_calendar_order() {
        assert_eq!(MONTH_ORDER.len(), 12);
        for (i, month) in MONTH_ORDER.iter().enumerate() {
            assert_eq!(month.number_from_month() as usize, i + 1);
        }
        assert_eq!("January".parse::<Month>().unwrap(), MONTH_ORDER[0]);
    }

    #[test]
    fn test_table_collects_sorted_distinct_options() {
        let table = BookingTable::new(vec![
            booking("Resort Hotel", 2017),
            booking("City Hotel", 2015),
            booking("Resort Hotel", 2016),
            booking("City Hotel", 2015),
        ]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.hotels, vec!["City Hotel", "Resort Hotel"]);
        assert_eq!(table.years, vec![2015, 2016, 2017]);
    }

    #[test]
    fn test_empty_table() {
        let table = BookingTable::new(Vec::new());
        assert!(table.is_empty());
        assert!(table.hotels.is_empty());
        assert!(table.years.is_empty());
    }
}
