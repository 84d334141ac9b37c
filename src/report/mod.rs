//! Report module - Console reports and the dashboard view-model

mod console;
mod dashboard;

pub use console::{write_inspection, write_mapped_sample, write_seasonal_report};
pub use dashboard::{DashboardModel, DrillDown, FarmerProfile, MapMarker, Region};
