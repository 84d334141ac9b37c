//! Farmer Dashboard - Farmer yield analysis & interactive dashboard
//!
//! Loads farmer records from CSV, attaches GPS coordinates, aggregates
//! seasonal fruit yields and presents them on the console or in a window.

mod charts;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use data::schema::{DEFAULT_CLEANED_PATH, LATITUDE, LOCATION, LONGITUDE};
use data::{attach_coordinates, column_names, write_cleaned_csv, DataLoader};
use eframe::egui;
use gui::FarmerDashboardApp;
use polars::prelude::DataFrame;
use report::{write_inspection, write_mapped_sample, write_seasonal_report};
use stats::{SeasonalConfig, SeasonalTotals};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Farmer yield reports and dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print columns, sample rows, missing values, dtypes and GPS samples
    Inspect(InputArgs),
    /// Split GPS coordinates into Latitude/Longitude and save the cleaned CSV
    Geocode {
        #[command(flatten)]
        input: InputArgs,
        /// Where to write the cleaned table
        #[arg(long, short, default_value = DEFAULT_CLEANED_PATH)]
        output: PathBuf,
    },
    /// Print per-season totals, best season and fruit ranking
    Seasonal {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Open the interactive dashboard
    Dashboard {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Farmer records CSV
    input: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON file mapping each fruit to its season columns
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> Result<SeasonalConfig> {
        match &self.config {
            Some(path) => {
                let config = SeasonalConfig::from_json_file(path)
                    .with_context(|| format!("reading seasonal config {}", path.display()))?;
                info!(
                    path = %path.display(),
                    fruits = config.fruits.len(),
                    "loaded seasonal config"
                );
                Ok(config)
            }
            None => Ok(SeasonalConfig::default()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Inspect(args) => {
            let df = load(&args.input)?;
            write_inspection(&df, &mut out)?;
        }
        Command::Geocode { input, output } => {
            let df = load(&input.input)?;
            let cleaned = attach_coordinates(&df)
                .with_context(|| format!("geocoding {}", input.input.display()))?;
            write_mapped_sample(&cleaned, &mut out)?;
            write_cleaned_csv(&cleaned, &output)
                .with_context(|| format!("writing {}", output.display()))?;
            writeln!(out, "\nCleaned data with GPS saved to {}", output.display())?;
        }
        Command::Seasonal { input, config } => {
            let config = config.load()?;
            let df = load(&input.input)?;
            let totals = SeasonalTotals::compute(&df, &config)
                .with_context(|| format!("aggregating {}", input.input.display()))?;
            write_seasonal_report(&totals, &mut out)?;
        }
        Command::Dashboard { input, config } => {
            let config = config.load()?;
            let df = ensure_coordinates(load(&input.input)?)?;
            if let Err(e) = config.validate(&column_names(&df)) {
                warn!("{e}; affected widgets will show a warning");
            }
            run_dashboard(df, config)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn load(path: &Path) -> Result<DataFrame> {
    let mut loader = DataLoader::new();
    loader
        .load_csv(path)
        .with_context(|| format!("loading {}", path.display()))?;
    debug!(
        rows = loader.row_count(),
        columns = loader.columns().len(),
        locations = ?loader.unique_values(LOCATION),
        "records ready"
    );
    loader
        .into_dataframe()
        .ok_or_else(|| anyhow!("no data loaded from {}", path.display()))
}

/// The dashboard reads the cleaned file; geocode on the fly when given raw records.
fn ensure_coordinates(df: DataFrame) -> Result<DataFrame> {
    let has_coordinates = df.column(LATITUDE).is_ok() && df.column(LONGITUDE).is_ok();
    if has_coordinates {
        return Ok(df);
    }
    info!("no Latitude/Longitude columns, attaching coordinates");
    Ok(attach_coordinates(&df)?)
}

fn run_dashboard(df: DataFrame, config: SeasonalConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Makueni Farmer Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Farmer Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(FarmerDashboardApp::new(cc, df, config)))),
    )
    .map_err(|e| anyhow!("dashboard failed: {e}"))
}
