//! Dashboard view-model.
//! Everything the dashboard draws, computed from the records and the current filters.

use crate::data::schema::{FARMER_NAME, FARMING_METHOD, IRRIGATION_METHOD, LOCATION};
use crate::data::{
    column_names, coordinates, record_coordinates, string_values, Coordinate, RecordFilter,
};
use crate::stats::{
    per_record_totals, sorted_by_total, FruitRanking, RecordYield, SeasonalConfig, SeasonalTotals,
};
use polars::prelude::*;
use statrs::statistics::Statistics;
use tracing::{debug, warn};

/// Half-width, in degrees, of the square drawn around a selected location.
pub const REGION_HALF_SIZE: f64 = 0.01;

/// Card background by the last word of the farming method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodTint {
    Organic,
    Conventional,
    Other,
}

impl MethodTint {
    pub fn from_method(method: &str) -> Self {
        match method.split_whitespace().last() {
            Some("Organic") => Self::Organic,
            Some("Conventional") => Self::Conventional,
            _ => Self::Other,
        }
    }

    /// Background colour as RGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Organic => [0xe8, 0xf5, 0xe9],
            Self::Conventional => [0xfc, 0xe4, 0xec],
            Self::Other => [0xf9, 0xf9, 0xf9],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub farmer: String,
    pub coordinate: Coordinate,
}

/// Closed square ring of `[lon, lat]` points around a location's mean position.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub location: String,
    pub ring: Vec<[f64; 2]>,
}

impl Region {
    pub fn around(location: &str, centre: Coordinate) -> Self {
        let (lat, lon, d) = (centre.latitude, centre.longitude, REGION_HALF_SIZE);
        Self {
            location: location.to_string(),
            ring: vec![
                [lon - d, lat + d],
                [lon + d, lat + d],
                [lon + d, lat - d],
                [lon - d, lat - d],
                [lon - d, lat + d],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarmerProfile {
    pub farmer: String,
    pub location: String,
    pub farming_method: String,
    pub irrigation: String,
    pub tint: MethodTint,
}

/// Drill-down for the selected fruit: rows, or a warning when it can't be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillDown {
    Rows(Vec<RecordYield>),
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub columns: Vec<String>,
    pub record_count: usize,
    pub markers: Vec<MapMarker>,
    pub view_centre: Option<Coordinate>,
    pub regions: Vec<Region>,
    /// Season column totals in configured order.
    pub season_trend: Vec<(String, f64)>,
    /// The same totals, highest first.
    pub season_summary: Vec<(String, f64)>,
    pub ranking: FruitRanking,
    /// Configured fruit order; bar colours follow it.
    pub fruits: Vec<String>,
    pub selected_fruit: String,
    pub drill_down: DrillDown,
    pub profiles: Vec<FarmerProfile>,
    pub banner: String,
    pub warnings: Vec<String>,
}

impl DashboardModel {
    /// Filter the records, then recompute every widget from scratch.
    ///
    /// Aggregation failures become warnings; only a failed filter is an error.
    pub fn build(
        df: &DataFrame,
        config: &SeasonalConfig,
        filter: &RecordFilter,
        selected_fruit: &str,
    ) -> PolarsResult<Self> {
        let filtered = filter.apply(df)?;
        let mut warnings = Vec::new();

        let markers = markers(&filtered).unwrap_or_else(|e| {
            warnings.push(format!("No coordinates to map: {e}"));
            Vec::new()
        });
        let view_centre = mean_coordinate(markers.iter().map(|m| m.coordinate));
        let regions = regions(df, filter);

        let (season_trend, ranking) = match SeasonalTotals::compute_available(&filtered, config) {
            Ok((totals, skipped)) => {
                for e in skipped {
                    warnings.push(format!("Left out of the seasonal summary: {e}"));
                }
                (totals.column_totals(), totals.rank_fruits())
            }
            Err(e) => {
                warnings.push(format!("Seasonal summary unavailable: {e}"));
                (Vec::new(), Vec::new())
            }
        };
        let season_summary = sorted_by_total(season_trend.clone());

        let drill_down = match per_record_totals(&filtered, config, selected_fruit) {
            Ok(rows) => DrillDown::Rows(rows),
            Err(e) => {
                let message = format!(
                    "No seasonal columns found for {selected_fruit}. Please check your data. ({e})"
                );
                warnings.push(message.clone());
                DrillDown::Unavailable(message)
            }
        };

        let profiles = profiles(&filtered).unwrap_or_else(|e| {
            warnings.push(format!("Farmer profiles unavailable: {e}"));
            Vec::new()
        });

        for w in &warnings {
            warn!("{w}");
        }
        debug!(records = filtered.height(), "dashboard recomputed");

        Ok(Self {
            columns: column_names(&filtered),
            record_count: filtered.height(),
            markers,
            view_centre,
            regions,
            season_trend,
            season_summary,
            ranking,
            fruits: config.fruit_names().into_iter().map(str::to_string).collect(),
            selected_fruit: selected_fruit.to_string(),
            drill_down,
            profiles,
            banner: filter.summary(),
            warnings,
        })
    }
}

fn markers(df: &DataFrame) -> PolarsResult<Vec<MapMarker>> {
    let farmers = string_values(df, FARMER_NAME)?;
    let points = record_coordinates(df)?;
    Ok(farmers
        .into_iter()
        .zip(points)
        .filter_map(|(farmer, coordinate)| {
            Some(MapMarker {
                farmer: farmer.unwrap_or_default(),
                coordinate: coordinate?,
            })
        })
        .collect())
}

fn mean_coordinate(points: impl Iterator<Item = Coordinate>) -> Option<Coordinate> {
    let (lats, lons): (Vec<f64>, Vec<f64>) =
        points.map(|c| (c.latitude, c.longitude)).unzip();
    if lats.is_empty() {
        return None;
    }
    Coordinate::new(lats.iter().mean(), lons.iter().mean()).ok()
}

/// One square per selected location, centred on its records in the unfiltered data.
fn regions(df: &DataFrame, filter: &RecordFilter) -> Vec<Region> {
    filter
        .locations
        .iter()
        .filter_map(|location| {
            let only = RecordFilter::new([location.as_str()], Vec::<String>::new());
            let records = only.apply(df).ok()?;
            let centre = mean_coordinate(coordinates(&records).ok()?.into_iter())?;
            Some(Region::around(location, centre))
        })
        .collect()
}

/// Distinct farmer profiles in record order.
fn profiles(df: &DataFrame) -> PolarsResult<Vec<FarmerProfile>> {
    let farmers = string_values(df, FARMER_NAME)?;
    let locations = string_values(df, LOCATION)?;
    let methods = string_values(df, FARMING_METHOD)?;
    let irrigation = string_values(df, IRRIGATION_METHOD)?;

    let mut out: Vec<FarmerProfile> = Vec::new();
    for (((farmer, location), method), irrigation) in
        farmers.into_iter().zip(locations).zip(methods).zip(irrigation)
    {
        let method = method.unwrap_or_default();
        let profile = FarmerProfile {
            farmer: farmer.unwrap_or_default(),
            location: location.unwrap_or_default(),
            tint: MethodTint::from_method(&method),
            farming_method: method,
            irrigation: irrigation.unwrap_or_default(),
        };
        if !out.contains(&profile) {
            out.push(profile);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{LATITUDE, LONGITUDE};
    use crate::stats::FruitSeasons;

    fn config() -> SeasonalConfig {
        SeasonalConfig {
            fruits: vec![
                FruitSeasons::numbered("Mango", 2),
                FruitSeasons::numbered("Hass", 2),
            ],
        }
    }

    fn records() -> DataFrame {
        df!(
            FARMER_NAME => ["Alice", "Bob", "Carol", "Alice"],
            LOCATION => ["Wote", "Kibwezi", "Wote", "Wote"],
            FARMING_METHOD => ["Organic", "Conventional", "Certified Organic", "Organic"],
            IRRIGATION_METHOD => ["Drip", "Rain-fed", "Drip", "Drip"],
            LATITUDE => [-1.70, -2.20, -1.72, -1.70],
            LONGITUDE => [37.60, 37.90, 37.62, 37.60],
            "Mango Season 1" => [1i64, 6, 2, 0],
            "Mango Season 2" => [3i64, 0, 1, 0],
            "Hass Season 1" => [4i64, 1, 0, 0],
            "Hass Season 2" => [0i64, 5, 2, 0],
        )
        .unwrap()
    }

    fn build_unfiltered(fruit: &str) -> DashboardModel {
        DashboardModel::build(&records(), &config(), &RecordFilter::default(), fruit).unwrap()
    }

    #[test]
    fn unfiltered_model_covers_everything() {
        let model = build_unfiltered("Mango");

        assert_eq!(model.record_count, 4);
        assert_eq!(model.markers.len(), 4);
        assert!(model.regions.is_empty());
        assert!(model.warnings.is_empty());
        assert_eq!(
            model.ranking,
            vec![("Mango".to_string(), 13.0), ("Hass".to_string(), 12.0)]
        );
        assert_eq!(model.season_summary[0], ("Mango Season 1".to_string(), 9.0));
        assert_eq!(model.fruits, vec!["Mango", "Hass"]);
        assert_eq!(model.profiles.len(), 3);
        assert_eq!(
            model.banner,
            "Showing farmers in `All Locations` using `All Methods` methods"
        );

        let DrillDown::Rows(rows) = &model.drill_down else {
            panic!("expected drill-down rows");
        };
        assert_eq!(rows[0].farmer, "Bob");
        assert_eq!(rows[0].total, 6.0);
    }

    #[test]
    fn filter_is_applied_before_aggregation() {
        let filter = RecordFilter::new(["Wote"], ["Organic"]);
        let model = DashboardModel::build(&records(), &config(), &filter, "Hass").unwrap();

        assert_eq!(model.record_count, 2);
        assert_eq!(
            model.ranking,
            vec![("Mango".to_string(), 4.0), ("Hass".to_string(), 4.0)]
        );
        assert_eq!(model.profiles.len(), 1);
        assert_eq!(model.profiles[0].tint, MethodTint::Organic);
    }

    #[test]
    fn selected_location_gets_a_region() {
        let filter = RecordFilter::new(["Wote"], Vec::<String>::new());
        let model = DashboardModel::build(&records(), &config(), &filter, "Mango").unwrap();

        assert_eq!(model.regions.len(), 1);
        let ring = &model.regions[0].ring;
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());

        let centre = model.view_centre.unwrap();
        assert!((centre.latitude - (-1.70 - 1.72 - 1.70) / 3.0).abs() < 1e-9);
        assert!((ring[1][0] - (centre.longitude + REGION_HALF_SIZE)).abs() < 1e-9);
    }

    #[test]
    fn unknown_fruit_degrades_to_warning() {
        let model = build_unfiltered("Pixie");
        assert!(matches!(model.drill_down, DrillDown::Unavailable(_)));
        assert_eq!(model.warnings.len(), 1);
        assert!(!model.ranking.is_empty());
    }

    #[test]
    fn season_trend_keeps_configured_order() {
        let model = build_unfiltered("Mango");
        let trend: Vec<(&str, f64)> = model
            .season_trend
            .iter()
            .map(|(c, t)| (c.as_str(), *t))
            .collect();
        assert_eq!(
            trend,
            vec![
                ("Mango Season 1", 9.0),
                ("Mango Season 2", 4.0),
                ("Hass Season 1", 5.0),
                ("Hass Season 2", 7.0),
            ]
        );
        assert!(model.season_summary.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(model.season_summary.len(), trend.len());
    }

    #[test]
    fn missing_yield_column_only_drops_that_fruit() {
        let df = records().drop("Hass Season 2").unwrap();
        let model =
            DashboardModel::build(&df, &config(), &RecordFilter::default(), "Mango").unwrap();
        assert_eq!(model.ranking, vec![("Mango".to_string(), 13.0)]);
        assert_eq!(
            model.season_trend,
            vec![
                ("Mango Season 1".to_string(), 9.0),
                ("Mango Season 2".to_string(), 4.0),
            ]
        );
        assert!(matches!(model.drill_down, DrillDown::Rows(_)));
        assert_eq!(model.warnings.len(), 1);
        assert!(model.warnings[0].contains("Hass Season 2"));
    }

    #[test]
    fn method_tint_uses_last_word() {
        assert_eq!(MethodTint::from_method("Certified Organic"), MethodTint::Organic);
        assert_eq!(MethodTint::from_method("Conventional"), MethodTint::Conventional);
        assert_eq!(MethodTint::from_method("Mixed"), MethodTint::Other);
        assert_eq!(MethodTint::from_method(""), MethodTint::Other);
    }
}
