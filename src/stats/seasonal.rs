//! Seasonal Yield Aggregator
//! Sums yield columns per fruit and season, picks the best season and ranks fruits.
//!
//! Null, non-numeric, non-finite and negative yield cells count as zero.

use crate::data::schema::{FARMER_NAME, LOCATION};
use crate::data::{column_names, numeric_values, string_values};
use crate::stats::config::{ConfigError, FruitSeasons, SeasonalConfig};
use polars::prelude::*;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Summed yield of one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTotal {
    pub season: String,
    pub column: String,
    pub total: f64,
}

/// Per-season totals of one fruit, in configured season order.
#[derive(Debug, Clone, PartialEq)]
pub struct FruitTotals {
    pub fruit: String,
    pub seasons: Vec<SeasonTotal>,
}

impl FruitTotals {
    pub fn total_yield(&self) -> f64 {
        self.seasons.iter().map(|s| s.total).sum()
    }

    /// Season with the highest total; the earliest wins a tie.
    pub fn best_season(&self) -> Option<&SeasonTotal> {
        self.seasons.iter().fold(None, |best, s| match best {
            Some(b) if b.total >= s.total => Some(b),
            _ => Some(s),
        })
    }
}

/// `(fruit, total yield)` pairs, highest first.
pub type FruitRanking = Vec<(String, f64)>;

/// Seasonal totals for every configured fruit, in configured fruit order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalTotals {
    fruits: Vec<FruitTotals>,
}

impl SeasonalTotals {
    /// Validate the config against the frame and sum every configured column.
    pub fn compute(df: &DataFrame, config: &SeasonalConfig) -> Result<Self, AggregateError> {
        config.validate(&column_names(df))?;

        let fruits = config
            .fruits
            .iter()
            .map(|fruit| Self::sum_fruit(df, fruit))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(records = df.height(), fruits = fruits.len(), "seasonal totals computed");
        Ok(Self { fruits })
    }

    /// Sum every fruit whose columns are all present; the rest are returned as errors.
    pub fn compute_available(
        df: &DataFrame,
        config: &SeasonalConfig,
    ) -> Result<(Self, Vec<ConfigError>), AggregateError> {
        config.check_shape()?;
        let schema = column_names(df);

        let mut fruits = Vec::new();
        let mut skipped = Vec::new();
        for fruit in &config.fruits {
            match SeasonalConfig::validate_fruit(fruit, &schema) {
                Ok(()) => fruits.push(Self::sum_fruit(df, fruit)?),
                Err(e) => skipped.push(e),
            }
        }

        debug!(
            records = df.height(),
            fruits = fruits.len(),
            skipped = skipped.len(),
            "available seasonal totals computed"
        );
        Ok((Self { fruits }, skipped))
    }

    fn sum_fruit(df: &DataFrame, fruit: &FruitSeasons) -> PolarsResult<FruitTotals> {
        let seasons = fruit
            .seasons
            .iter()
            .map(|s| {
                Ok(SeasonTotal {
                    season: s.season.clone(),
                    column: s.column.clone(),
                    total: numeric_values(df, &s.column)?.iter().sum::<f64>(),
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(FruitTotals {
            fruit: fruit.fruit.clone(),
            seasons,
        })
    }

    pub fn fruits(&self) -> &[FruitTotals] {
        &self.fruits
    }

    /// Every season column with its total, in configured fruit and season order.
    pub fn column_totals(&self) -> Vec<(String, f64)> {
        self.fruits
            .iter()
            .flat_map(|f| f.seasons.iter().map(|s| (s.column.clone(), s.total)))
            .collect()
    }

    fn fruit(&self, fruit: &str) -> Result<&FruitTotals, ConfigError> {
        self.fruits
            .iter()
            .find(|f| f.fruit == fruit)
            .ok_or_else(|| ConfigError::UnknownFruit(fruit.to_string()))
    }

    pub fn total_per_season(&self, fruit: &str) -> Result<&[SeasonTotal], ConfigError> {
        Ok(&self.fruit(fruit)?.seasons)
    }

    pub fn best_season(&self, fruit: &str) -> Result<&SeasonTotal, ConfigError> {
        let totals = self.fruit(fruit)?;
        totals
            .best_season()
            .ok_or_else(|| ConfigError::NoSeasons(totals.fruit.clone()))
    }

    pub fn total_yield(&self, fruit: &str) -> Result<f64, ConfigError> {
        Ok(self.fruit(fruit)?.total_yield())
    }

    /// Fruits by total yield, descending; ties keep configured order.
    pub fn rank_fruits(&self) -> FruitRanking {
        let mut ranking: FruitRanking = self
            .fruits
            .iter()
            .map(|f| (f.fruit.clone(), f.total_yield()))
            .collect();
        ranking.sort_by(|a, b| descending(a.1, b.1));
        ranking
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// One farmer's total yield for a fruit.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordYield {
    pub farmer: String,
    pub location: String,
    pub total: f64,
}

/// Per-record totals for one fruit, highest first (stable).
pub fn per_record_totals(
    df: &DataFrame,
    config: &SeasonalConfig,
    fruit: &str,
) -> Result<Vec<RecordYield>, AggregateError> {
    let fruit = config.fruit(fruit)?;
    SeasonalConfig::validate_fruit(fruit, &column_names(df))?;

    let mut totals = vec![0.0; df.height()];
    for column in fruit.columns() {
        for (acc, v) in totals.iter_mut().zip(numeric_values(df, column)?) {
            *acc += v;
        }
    }

    let farmers = string_values(df, FARMER_NAME)?;
    let locations = string_values(df, LOCATION)?;

    let mut rows: Vec<RecordYield> = farmers
        .into_iter()
        .zip(locations)
        .zip(totals)
        .map(|((farmer, location), total)| RecordYield {
            farmer: farmer.unwrap_or_default(),
            location: location.unwrap_or_default(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.total, b.total));
    Ok(rows)
}

/// Sort `(name, total)` pairs by total, highest first; ties keep their order.
pub fn sorted_by_total(mut totals: Vec<(String, f64)>) -> Vec<(String, f64)> {
    totals.sort_by(|a, b| descending(a.1, b.1));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::config::FruitSeasons;

    fn mango_only() -> SeasonalConfig {
        SeasonalConfig {
            fruits: vec![FruitSeasons::numbered("Mango", 3)],
        }
    }

    fn four_fruit_frame(rows: &[[i64; 12]]) -> DataFrame {
        let config = SeasonalConfig::default();
        let columns: Vec<Column> = config
            .fruits
            .iter()
            .flat_map(|f| f.columns())
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<i64> = rows.iter().map(|r| r[i]).collect();
                Column::new(name.into(), values)
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn single_record_mango_scenario() {
        let df = df!(
            "Mango Season 1" => [3i64],
            "Mango Season 2" => [5i64],
            "Mango Season 3" => [0i64],
        )
        .unwrap();
        let totals = SeasonalTotals::compute(&df, &mango_only()).unwrap();

        let per_season: Vec<(&str, f64)> = totals
            .total_per_season("Mango")
            .unwrap()
            .iter()
            .map(|s| (s.season.as_str(), s.total))
            .collect();
        assert_eq!(
            per_season,
            vec![("Season 1", 3.0), ("Season 2", 5.0), ("Season 3", 0.0)]
        );
        assert_eq!(totals.best_season("Mango").unwrap().season, "Season 2");
        assert_eq!(totals.total_yield("Mango").unwrap(), 8.0);
    }

    #[test]
    fn tie_ranks_in_configured_order() {
        // Mango = 8, Hass = 8, Fuerte = 2, Pixie = 9
        let df = four_fruit_frame(&[
            [3, 5, 0, 4, 4, 0, 1, 1, 0, 3, 3, 3],
        ]);
        let totals = SeasonalTotals::compute(&df, &SeasonalConfig::default()).unwrap();
        assert_eq!(
            totals.rank_fruits(),
            vec![
                ("Pixie".to_string(), 9.0),
                ("Mango".to_string(), 8.0),
                ("Hass".to_string(), 8.0),
                ("Fuerte".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn best_season_tie_picks_first() {
        let df = four_fruit_frame(&[
            [0, 4, 4, 2, 2, 2, 0, 0, 0, 0, 0, 0],
            [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ]);
        let totals = SeasonalTotals::compute(&df, &SeasonalConfig::default()).unwrap();
        assert_eq!(totals.best_season("Mango").unwrap().season, "Season 2");
        assert_eq!(totals.best_season("Hass").unwrap().season, "Season 1");
        assert_eq!(totals.best_season("Fuerte").unwrap().season, "Season 1");
    }

    #[test]
    fn empty_records_total_zero() {
        let df = four_fruit_frame(&[]);
        let config = SeasonalConfig::default();
        let totals = SeasonalTotals::compute(&df, &config).unwrap();

        for fruit in config.fruit_names() {
            assert!(totals
                .total_per_season(fruit)
                .unwrap()
                .iter()
                .all(|s| s.total == 0.0));
        }
        let ranking = totals.rank_fruits();
        let order: Vec<&str> = ranking.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(order, config.fruit_names());
        assert!(ranking.iter().all(|(_, t)| *t == 0.0));
    }

    #[test]
    fn totals_are_consistent() {
        let df = four_fruit_frame(&[
            [7, 1, 2, 0, 9, 3, 4, 4, 1, 6, 0, 2],
            [2, 8, 1, 5, 0, 3, 2, 1, 7, 1, 1, 1],
            [0, 3, 6, 2, 2, 2, 9, 0, 0, 4, 5, 3],
        ]);
        let config = SeasonalConfig::default();
        let totals = SeasonalTotals::compute(&df, &config).unwrap();

        for fruit in config.fruit_names() {
            let seasons = totals.total_per_season(fruit).unwrap();
            let sum: f64 = seasons.iter().map(|s| s.total).sum();
            assert_eq!(totals.total_yield(fruit).unwrap(), sum);

            let best = totals.best_season(fruit).unwrap();
            let max = seasons.iter().map(|s| s.total).fold(f64::MIN, f64::max);
            assert_eq!(best.total, max);
            assert!(config
                .fruit(fruit)
                .unwrap()
                .seasons
                .iter()
                .any(|s| s.season == best.season));
        }

        let ranking = totals.rank_fruits();
        assert!(ranking.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn missing_and_text_cells_count_as_zero() {
        let df = df!(
            "Mango Season 1" => [Some("3"), None, Some("abc")],
            "Mango Season 2" => [Some(1.5), Some(f64::NAN), None],
            "Mango Season 3" => [None::<i64>, None, None],
        )
        .unwrap();
        let totals = SeasonalTotals::compute(&df, &mango_only()).unwrap();
        assert_eq!(totals.total_yield("Mango").unwrap(), 4.5);
    }

    #[test]
    fn missing_column_is_config_error() {
        let df = df!("Mango Season 1" => [1i64]).unwrap();
        let err = SeasonalTotals::compute(&df, &mango_only()).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::Config(ConfigError::MissingColumn { .. })
        ));
    }

    #[test]
    fn unknown_fruit_query_fails() {
        let df = df!(
            "Mango Season 1" => [1i64],
            "Mango Season 2" => [1i64],
            "Mango Season 3" => [1i64],
        )
        .unwrap();
        let totals = SeasonalTotals::compute(&df, &mango_only()).unwrap();
        assert!(matches!(
            totals.total_yield("Hass"),
            Err(ConfigError::UnknownFruit(_))
        ));
    }

    #[test]
    fn per_record_totals_sorted_descending() {
        let df = df!(
            FARMER_NAME => ["Alice", "Bob", "Carol"],
            LOCATION => ["Wote", "Kibwezi", "Wote"],
            "Mango Season 1" => [1i64, 4, 2],
            "Mango Season 2" => [1i64, 0, 0],
            "Mango Season 3" => [0i64, 1, 0],
        )
        .unwrap();
        let rows = per_record_totals(&df, &mango_only(), "Mango").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.farmer.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice", "Carol"]);
        assert_eq!(rows[0].total, 5.0);
        assert_eq!(rows[1].location, "Wote");
    }

    #[test]
    fn column_totals_keep_configured_order() {
        let df = df!(
            "Mango Season 1" => [1i64, 1],
            "Mango Season 2" => [4i64, 0],
            "Mango Season 3" => [2i64, 0],
        )
        .unwrap();
        let totals = SeasonalTotals::compute(&df, &mango_only()).unwrap();
        let columns = totals.column_totals();
        assert_eq!(
            columns,
            vec![
                ("Mango Season 1".to_string(), 2.0),
                ("Mango Season 2".to_string(), 4.0),
                ("Mango Season 3".to_string(), 2.0),
            ]
        );
        assert_eq!(
            sorted_by_total(columns),
            vec![
                ("Mango Season 2".to_string(), 4.0),
                ("Mango Season 1".to_string(), 2.0),
                ("Mango Season 3".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn infinite_and_negative_cells_do_not_reach_totals() {
        let df = df!(
            "Mango Season 1" => [Some("3"), Some("-2")],
            "Mango Season 2" => [Some("n/a"), Some("inf")],
            "Mango Season 3" => [None, Some("1")],
        )
        .unwrap();
        let totals = SeasonalTotals::compute(&df, &mango_only()).unwrap();
        let per_season: Vec<f64> = totals
            .total_per_season("Mango")
            .unwrap()
            .iter()
            .map(|s| s.total)
            .collect();
        assert_eq!(per_season, vec![3.0, 0.0, 1.0]);
        assert_eq!(totals.rank_fruits(), vec![("Mango".to_string(), 4.0)]);
    }

    #[test]
    fn available_totals_skip_fruits_with_missing_columns() {
        let config = SeasonalConfig {
            fruits: vec![
                FruitSeasons::numbered("Mango", 2),
                FruitSeasons::numbered("Hass", 2),
            ],
        };
        let df = df!(
            "Mango Season 1" => [2i64],
            "Mango Season 2" => [1i64],
            "Hass Season 1" => [7i64],
        )
        .unwrap();
        let (totals, skipped) = SeasonalTotals::compute_available(&df, &config).unwrap();

        assert_eq!(totals.rank_fruits(), vec![("Mango".to_string(), 3.0)]);
        assert_eq!(skipped.len(), 1);
        assert!(matches!(
            &skipped[0],
            ConfigError::MissingColumn { fruit, column }
                if fruit == "Hass" && column == "Hass Season 2"
        ));
    }
}
