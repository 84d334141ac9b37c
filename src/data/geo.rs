//! Geo Normalizer
//! Splits the combined "lat,lon" string into numeric Latitude/Longitude columns.

use crate::data::loader::string_values;
use crate::data::schema::{FARMER_NAME, GPS_COORDINATES, LATITUDE, LONGITUDE};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("expected \"lat,lon\" but found {0} part(s)")]
    WrongArity(usize),
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error("({latitude}, {longitude}) is outside the valid latitude/longitude range")]
    OutOfRange { latitude: f64, longitude: f64 },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Column not found: {0}")]
    MissingColumn(String),
    #[error("Record {row} ({farmer}): invalid coordinate {value:?}: {source}")]
    InvalidCoordinate {
        row: usize,
        farmer: String,
        value: String,
        #[source]
        source: CoordinateError,
    },
    #[error("Record {row} ({farmer}): coordinate is empty")]
    EmptyCoordinate { row: usize, farmer: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        let in_range = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(CoordinateError::OutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse `"lat,lon"`; whitespace around either half is ignored.
    pub fn parse(text: &str) -> Result<Self, CoordinateError> {
        let parts: Vec<&str> = text.split(',').collect();
        let [lat, lon] = parts.as_slice() else {
            return Err(CoordinateError::WrongArity(parts.len()));
        };
        Self::new(parse_degrees(lat)?, parse_degrees(lon)?)
    }
}

fn parse_degrees(part: &str) -> Result<f64, CoordinateError> {
    let trimmed = part.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoordinateError::NotANumber(trimmed.to_string()))
}

/// Parse every record's coordinate string and attach Latitude/Longitude columns.
///
/// Existing Latitude/Longitude columns are replaced, so running this twice
/// leaves the frame unchanged.
pub fn attach_coordinates(df: &DataFrame) -> Result<DataFrame, ParseError> {
    if df.column(GPS_COORDINATES).is_err() {
        return Err(ParseError::MissingColumn(GPS_COORDINATES.to_string()));
    }

    let raw = string_values(df, GPS_COORDINATES)?;
    let farmers = string_values(df, FARMER_NAME).unwrap_or_else(|_| vec![None; df.height()]);

    let mut latitudes: Vec<f64> = Vec::with_capacity(raw.len());
    let mut longitudes: Vec<f64> = Vec::with_capacity(raw.len());

    for (row, value) in raw.into_iter().enumerate() {
        let farmer = || {
            farmers
                .get(row)
                .cloned()
                .flatten()
                .unwrap_or_else(|| "unknown farmer".to_string())
        };
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Err(ParseError::EmptyCoordinate {
                row,
                farmer: farmer(),
            });
        };
        let coordinate = Coordinate::parse(&value).map_err(|source| {
            ParseError::InvalidCoordinate {
                row,
                farmer: farmer(),
                value: value.clone(),
                source,
            }
        })?;
        latitudes.push(coordinate.latitude);
        longitudes.push(coordinate.longitude);
    }

    let mut out = df.clone();
    out.with_column(Column::new(LATITUDE.into(), latitudes))?;
    out.with_column(Column::new(LONGITUDE.into(), longitudes))?;

    info!(records = out.height(), "attached coordinates");
    Ok(out)
}

/// Per-record coordinate from the Latitude/Longitude columns; `None` where absent or invalid.
pub fn record_coordinates(df: &DataFrame) -> PolarsResult<Vec<Option<Coordinate>>> {
    let lat = df.column(LATITUDE)?.cast(&DataType::Float64)?;
    let lon = df.column(LONGITUDE)?.cast(&DataType::Float64)?;
    let lat = lat.as_materialized_series().f64()?;
    let lon = lon.as_materialized_series().f64()?;

    Ok(lat
        .into_iter()
        .zip(lon.into_iter())
        .map(|(la, lo)| Coordinate::new(la?, lo?).ok())
        .collect())
}

/// Valid coordinates of every record that already carries Latitude/Longitude.
pub fn coordinates(df: &DataFrame) -> PolarsResult<Vec<Coordinate>> {
    Ok(record_coordinates(df)?.into_iter().flatten().collect())
}

/// Write the augmented table as the cleaned intermediate CSV.
pub fn write_cleaned_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<(), ParseError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let mut df = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    info!(path = %path.display(), rows = df.height(), "cleaned data with GPS saved");
    Ok(())
}
