//! Console reports.
//! Plain-text sections written to any output stream.

use crate::data::schema::{FARMER_NAME, GPS_COORDINATES, LATITUDE, LOCATION, LONGITUDE};
use crate::data::column_names;
use crate::stats::SeasonalTotals;
use polars::prelude::*;
use std::io::{self, Write};
use thiserror::Error;

const PREVIEW_ROWS: usize = 5;

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Columns, preview rows, missing-value counts, dtypes and a GPS sample.
pub fn write_inspection(df: &DataFrame, out: &mut impl Write) -> Result<(), PresentError> {
    writeln!(out, "Columns in the dataset:")?;
    for name in column_names(df) {
        writeln!(out, "  {name}")?;
    }

    writeln!(out, "\nFirst {PREVIEW_ROWS} rows of data:")?;
    writeln!(out, "{}", df.head(Some(PREVIEW_ROWS)))?;

    writeln!(out, "\nMissing values:")?;
    for column in df.get_columns() {
        writeln!(out, "  {}: {}", column.name(), column.null_count())?;
    }

    writeln!(out, "\nData types:")?;
    for column in df.get_columns() {
        writeln!(out, "  {}: {}", column.name(), column.dtype())?;
    }

    if let Ok(gps) = df.column(GPS_COORDINATES) {
        writeln!(out, "\nSample GPS coordinates:")?;
        writeln!(out, "{}", gps.as_materialized_series().head(Some(PREVIEW_ROWS)))?;
    }
    Ok(())
}

/// Farmer name, location and parsed coordinates of the first rows.
pub fn write_mapped_sample(df: &DataFrame, out: &mut impl Write) -> Result<(), PresentError> {
    let sample = df
        .select([FARMER_NAME, LOCATION, LATITUDE, LONGITUDE])?
        .head(Some(PREVIEW_ROWS));
    writeln!(out, "Sample mapped coordinates:")?;
    writeln!(out, "{sample}")?;
    Ok(())
}

/// Per-season totals, best season and ranking for every configured fruit.
pub fn write_seasonal_report(
    totals: &SeasonalTotals,
    out: &mut impl Write,
) -> Result<(), PresentError> {
    writeln!(out, "Total yield per fruit per season:")?;
    for fruit in totals.fruits() {
        writeln!(out, "\n{}:", fruit.fruit)?;
        for season in &fruit.seasons {
            writeln!(out, "  {}: {}", season.season, season.total)?;
        }
    }

    writeln!(out, "\nBest season per fruit:")?;
    for fruit in totals.fruits() {
        if let Some(best) = fruit.best_season() {
            writeln!(
                out,
                "{}: Best in {} with {} fruits",
                fruit.fruit, best.season, best.total
            )?;
        }
    }

    writeln!(out, "\nFruit ranking by total yield:")?;
    for (fruit, total) in totals.rank_fruits() {
        writeln!(out, "{fruit}: {total} fruits harvested")?;
    }
    Ok(())
}
