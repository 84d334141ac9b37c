//! Stats module - Seasonal yield configuration and aggregation

mod config;
mod seasonal;

#[cfg(test)]
pub use config::FruitSeasons;
pub use config::SeasonalConfig;
pub use seasonal::{per_record_totals, sorted_by_total, FruitRanking, RecordYield, SeasonalTotals};
