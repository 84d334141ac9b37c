//! Data module - CSV loading, geocoding and filtering

mod filter;
mod geo;
mod loader;
pub mod schema;

pub use filter::RecordFilter;
pub use geo::{attach_coordinates, coordinates, record_coordinates, write_cleaned_csv, Coordinate};
pub use loader::{column_names, numeric_values, string_values, unique_strings, DataLoader};
