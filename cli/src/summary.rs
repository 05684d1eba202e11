use bookdash_core::{
    summarize_lead_times, DashboardService, FilterSelection, LeadTimeSummary, LoadReport,
};
use num_format::{Locale, ToFormattedString};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: &'static str,
    #[tabled(rename = "Bookings")]
    bookings: String,
}

#[derive(Tabled)]
struct HotelRow {
    #[tabled(rename = "Hotel")]
    hotel: String,
    #[tabled(rename = "Cancellation Rate")]
    rate: String,
}

#[derive(Tabled)]
struct LeadTimeRow {
    #[tabled(rename = "Outcome")]
    outcome: &'static str,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Min")]
    min: u32,
    #[tabled(rename = "P25")]
    p25: u32,
    #[tabled(rename = "Median")]
    median: u32,
    #[tabled(rename = "P75")]
    p75: u32,
    #[tabled(rename = "Max")]
    max: u32,
}

#[derive(Tabled)]
struct CountryRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Bookings")]
    bookings: String,
}

/// One-shot text report over the given filter flags. Empty flag lists
/// mean "all observed values", same as the dashboard default.
pub fn run(service: &DashboardService, report: &LoadReport, hotels: &[String], years: &[i32]) {
    let table = service.table();
    let mut selection = FilterSelection::all(table);
    if !hotels.is_empty() {
        selection.hotels = hotels.iter().cloned().collect();
    }
    if !years.is_empty() {
        selection.years = years.iter().copied().collect();
    }

    let data = service.snapshot(&selection);

    println!(
        "Loaded {} bookings ({} rows read, {} skipped)",
        report.rows_kept.to_formatted_string(&Locale::en),
        report.rows_read.to_formatted_string(&Locale::en),
        report.rows_skipped.to_formatted_string(&Locale::en),
    );

    println!("\n\x1b[1;36mKey Figures\x1b[0m");
    println!(
        "  Total bookings:     {}",
        data.kpis.total_bookings.to_formatted_string(&Locale::en)
    );
    println!(
        "  Cancelled:          {}",
        data.kpis.cancelled_bookings.to_formatted_string(&Locale::en)
    );
    println!("  Cancellation rate:  {:.2}%", data.kpis.cancellation_rate);
    println!("  Avg daily rate:     {:.2}", data.kpis.avg_adr);
    println!("  Avg lead time:      {:.1} days", data.kpis.avg_lead_time);

    println!("\n\x1b[1;36mBookings by Month\x1b[0m");
    let month_rows: Vec<MonthRow> = data
        .monthly
        .iter()
        .map(|m| MonthRow {
            month: m.month.name(),
            bookings: m.count.to_formatted_string(&Locale::en),
        })
        .collect();
    print_table(Table::new(month_rows));

    println!("\n\x1b[1;36mCancellation by Hotel\x1b[0m");
    if data.by_hotel.is_empty() {
        println!("(no rows match the current filter)");
    } else {
        let hotel_rows: Vec<HotelRow> = data
            .by_hotel
            .iter()
            .map(|h| HotelRow {
                hotel: h.hotel.clone(),
                rate: format!("{:.2}%", h.rate * 100.0),
            })
            .collect();
        print_table(Table::new(hotel_rows));
    }

    println!("\n\x1b[1;36mLead Time by Outcome\x1b[0m");
    let lead_rows = vec![
        lead_time_row("Not Cancelled", &summarize_lead_times(&data.lead_times.kept)),
        lead_time_row("Cancelled", &summarize_lead_times(&data.lead_times.cancelled)),
    ];
    print_table(Table::new(lead_rows));

    println!("\n\x1b[1;36mTop Countries\x1b[0m");
    if data.top_countries.is_empty() {
        println!("(no rows with a known country)");
    } else {
        let country_rows: Vec<CountryRow> = data
            .top_countries
            .iter()
            .enumerate()
            .map(|(i, c)| CountryRow {
                rank: i + 1,
                country: c.country.clone(),
                bookings: c.count.to_formatted_string(&Locale::en),
            })
            .collect();
        print_table(Table::new(country_rows));
    }
}

fn lead_time_row(outcome: &'static str, summary: &LeadTimeSummary) -> LeadTimeRow {
    LeadTimeRow {
        outcome,
        count: summary.count.to_formatted_string(&Locale::en),
        mean: format!("{:.1}", summary.mean),
        min: summary.min,
        p25: summary.p25,
        median: summary.median,
        p75: summary.p75,
        max: summary.max,
    }
}

fn print_table(mut table: Table) {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}
