mod summary;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use bookdash_core::{CsvBookingSource, DashboardService};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bookdash")]
#[command(about = "Interactive hotel booking analysis dashboard", long_about = None)]
struct Cli {
    /// Path to the bookings CSV file
    #[arg(long, global = true, default_value = "hotel_booking.csv")]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print a one-shot summary report to stdout
    Summary {
        /// Restrict to these hotel categories (repeatable)
        #[arg(long)]
        hotel: Vec<String>,
        /// Restrict to these arrival years (repeatable)
        #[arg(long)]
        year: Vec<i32>,
    },
    /// Open the interactive dashboard
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The table is loaded exactly once and owned by the service for the
    // rest of the session.
    let source = CsvBookingSource::new(&cli.data);
    let (table, report) = source.load()?;
    let service = DashboardService::new(table);

    match cli.command {
        Some(Commands::Summary { hotel, year }) => {
            summary::run(&service, &report, &hotel, &year);
        }
        Some(Commands::Tui) | None => {
            tui::run(service)?;
        }
    }

    Ok(())
}
