//! Column-name constants for the farmer dataset.

// ── Identity & profile columns ──────────────────────────────────────────────
pub const FARMER_NAME: &str = "Farmer Name";
pub const LOCATION: &str = "Location";
pub const FARMING_METHOD: &str = "Farming Method";
pub const IRRIGATION_METHOD: &str = "Irrigation Method";

// ── Geo columns ─────────────────────────────────────────────────────────────
pub const GPS_COORDINATES: &str = "GPS Coordinates";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";

/// Where the geocode command writes the cleaned table by default.
pub const DEFAULT_CLEANED_PATH: &str = "data/farmer_data_cleaned.csv";

/// Yield column name for a fruit and 1-based season number.
pub fn season_column(fruit: &str, season: usize) -> String {
    format!("{fruit} Season {season}")
}
