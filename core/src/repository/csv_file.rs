use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Month;
use csv::ReaderBuilder;

use crate::model::booking::{Booking, BookingTable, RawBookingRow};

/// Counters for one load pass. Rows that fail to parse are skipped, not
/// fatal; the CLI surfaces these numbers as a startup diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
}

/// Read-once source for the bookings CSV. There is no write path.
pub struct CsvBookingSource {
    path: PathBuf,
}

impl CsvBookingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole file into an immutable [`BookingTable`]. A missing
    /// or unreadable file is the one fatal error this system knows; the
    /// caller halts on it.
    pub fn load(&self) -> Result<(BookingTable, LoadReport)> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("booking data unavailable: {}", self.path.display()))?;
        read_bookings(file)
            .with_context(|| format!("booking data unavailable: {}", self.path.display()))
    }
}

/// Deserialize bookings from any CSV reader. Split out from the file
/// path so tests can feed in-memory data.
pub fn read_bookings<R: Read>(input: R) -> Result<(BookingTable, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(input);
    let mut report = LoadReport::default();
    let mut bookings = Vec::new();

    for result in rdr.deserialize::<RawBookingRow>() {
        report.rows_read += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.rows_skipped += 1;
                continue;
            }
        };
        match convert(row) {
            Some(booking) => bookings.push(booking),
            None => report.rows_skipped += 1,
        }
    }

    report.rows_kept = bookings.len();
    Ok((BookingTable::new(bookings), report))
}

/// Turn a raw row into a typed booking, or `None` if a required field is
/// missing or unparseable. Country is the only optional attribute: an
/// empty cell or the dataset's literal "NULL" becomes `None` and the row
/// is kept.
fn convert(row: RawBookingRow) -> Option<Booking> {
    let hotel = non_empty(row.hotel)?;
    let is_canceled = match row.is_canceled.as_deref().map(str::trim) {
        Some("0") => false,
        Some("1") => true,
        _ => return None,
    };
    let arrival_year = parse_field::<i32>(row.arrival_date_year.as_deref())?;
    let arrival_month = row
        .arrival_date_month
        .as_deref()?
        .trim()
        .parse::<Month>()
        .ok()?;
    let adr = parse_field::<f64>(row.adr.as_deref())?;
    let lead_time = parse_field::<u32>(row.lead_time.as_deref())?;
    let country = row.country.and_then(|c| {
        let c = c.trim();
        if c.is_empty() || c == "NULL" {
            None
        } else {
            Some(c.to_string())
        }
    });

    Some(Booking {
        hotel,
        arrival_year,
        arrival_month,
        is_canceled,
        adr,
        lead_time,
        country,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_field<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,adr,country";

    fn load(rows: &[&str]) -> (BookingTable, LoadReport) {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        read_bookings(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_reads_well_formed_rows() {
        let (table, report) = load(&[
            "Resort Hotel,0,342,2015,July,95.50,PRT",
            "City Hotel,1,7,2016,August,120.00,GBR",
        ]);

        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_kept, 2);
        assert_eq!(report.rows_skipped, 0);
        assert_eq!(table.len(), 2);

        let first = &table.bookings[0];
        assert_eq!(first.hotel, "Resort Hotel");
        assert!(!first.is_canceled);
        assert_eq!(first.lead_time, 342);
        assert_eq!(first.arrival_year, 2015);
        assert_eq!(first.arrival_month, Month::July);
        assert_eq!(first.adr, 95.5);
        assert_eq!(first.country.as_deref(), Some("PRT"));

        assert_eq!(table.hotels, vec!["City Hotel", "Resort Hotel"]);
        assert_eq!(table.years, vec![2015, 2016]);
    }

    #[test]
    fn test_skips_unparseable_rows_and_counts_them() {
        let (table, report) = load(&[
            "Resort Hotel,0,10,2015,July,80.0,PRT",
            "Resort Hotel,0,10,2015,Julember,80.0,PRT",
            "Resort Hotel,maybe,10,2015,July,80.0,PRT",
            "City Hotel,1,x,2016,May,75.0,ESP",
        ]);

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_kept, 1);
        assert_eq!(report.rows_skipped, 3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_null_country_policy() {
        let (table, report) = load(&[
            "Resort Hotel,0,10,2015,July,80.0,",
            "Resort Hotel,0,10,2015,July,80.0,NULL",
            "Resort Hotel,0,10,2015,July,80.0,PRT",
        ]);

        // Rows without a country still count; only the country is dropped.
        assert_eq!(report.rows_kept, 3);
        assert_eq!(table.bookings[0].country, None);
        assert_eq!(table.bookings[1].country, None);
        assert_eq!(table.bookings[2].country.as_deref(), Some("PRT"));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,adr,country,agent,babies\n\
                   City Hotel,1,3,2017,December,60.0,FRA,9,0";
        let (table, report) = read_bookings(csv.as_bytes()).unwrap();
        assert_eq!(report.rows_kept, 1);
        assert_eq!(table.bookings[0].country.as_deref(), Some("FRA"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let source = CsvBookingSource::new("does_not_exist.csv");
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("booking data unavailable"));
    }
}
