//! Seasonal column configuration.
//! Maps each fruit to its ordered season columns.

use crate::data::schema::season_column;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Fruits tracked when no configuration file is given.
pub const DEFAULT_FRUITS: [&str; 4] = ["Mango", "Hass", "Fuerte", "Pixie"];
/// Seasons per fruit in the default table.
pub const DEFAULT_SEASON_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No fruits configured")]
    Empty,
    #[error("Fruit configured twice: {0}")]
    DuplicateFruit(String),
    #[error("No seasons configured for {0}")]
    NoSeasons(String),
    #[error("Column not found for {fruit}: {column}")]
    MissingColumn { fruit: String, column: String },
    #[error("Unknown fruit: {0}")]
    UnknownFruit(String),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// One season of a fruit and the column holding its yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonColumn {
    pub season: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitSeasons {
    pub fruit: String,
    pub seasons: Vec<SeasonColumn>,
}

impl FruitSeasons {
    /// `"{fruit} Season 1"` .. `"{fruit} Season {count}"`.
    pub fn numbered(fruit: &str, count: usize) -> Self {
        Self {
            fruit: fruit.to_string(),
            seasons: (1..=count)
                .map(|n| SeasonColumn {
                    season: format!("Season {n}"),
                    column: season_column(fruit, n),
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.seasons.iter().map(|s| s.column.as_str())
    }
}

/// Ordered fruit → season column table, supplied once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConfig {
    pub fruits: Vec<FruitSeasons>,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            fruits: DEFAULT_FRUITS
                .iter()
                .map(|fruit| FruitSeasons::numbered(fruit, DEFAULT_SEASON_COUNT))
                .collect(),
        }
    }
}

impl SeasonalConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.check_shape()?;
        Ok(config)
    }

    pub fn fruit_names(&self) -> Vec<&str> {
        self.fruits.iter().map(|f| f.fruit.as_str()).collect()
    }

    pub fn fruit(&self, name: &str) -> Result<&FruitSeasons, ConfigError> {
        self.fruits
            .iter()
            .find(|f| f.fruit == name)
            .ok_or_else(|| ConfigError::UnknownFruit(name.to_string()))
    }

    /// Structural checks that do not need the data.
    pub fn check_shape(&self) -> Result<(), ConfigError> {
        if self.fruits.is_empty() {
            return Err(ConfigError::Empty);
        }
        for (i, fruit) in self.fruits.iter().enumerate() {
            if self.fruits[..i].iter().any(|f| f.fruit == fruit.fruit) {
                return Err(ConfigError::DuplicateFruit(fruit.fruit.clone()));
            }
            if fruit.seasons.is_empty() {
                return Err(ConfigError::NoSeasons(fruit.fruit.clone()));
            }
        }
        Ok(())
    }

    /// Check every configured column exists in the loaded schema.
    pub fn validate<S: AsRef<str>>(&self, schema: &[S]) -> Result<(), ConfigError> {
        self.check_shape()?;
        for fruit in &self.fruits {
            Self::validate_fruit(fruit, schema)?;
        }
        Ok(())
    }

    pub fn validate_fruit<S: AsRef<str>>(
        fruit: &FruitSeasons,
        schema: &[S],
    ) -> Result<(), ConfigError> {
        match fruit
            .columns()
            .find(|col| !schema.iter().any(|s| s.as_ref() == *col))
        {
            Some(column) => Err(ConfigError::MissingColumn {
                fruit: fruit.fruit.clone(),
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }
}
