pub mod dashboard;

pub use dashboard::{DashboardService, FilterSelection};
