use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid sweep configuration: {0}")]
    Invalid(String),
}

/// Everything that shapes a sweep. Any field missing from a config file
/// takes its default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub deck_sizes: Vec<u32>,
    /// Lands per `land_ratio_cards` cards
    pub land_ratio_lands: u32,
    pub land_ratio_cards: u32,
    pub max_turn: u32,
    pub max_single_need: u32,
    /// Cap on each color of a two-color requirement
    pub max_pair_need: u32,
    pub max_good_lands: u32,
    pub trials: u64,
    pub seed: Option<u64>,
    /// Worker threads; defaults to one less than the available cores
    pub workers: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            deck_sizes: vec![40, 60, 99],
            land_ratio_lands: 17,
            land_ratio_cards: 40,
            max_turn: 15,
            max_single_need: 6,
            max_pair_need: 3,
            max_good_lands: 17,
            trials: 1_000_000,
            seed: None,
            workers: None,
        }
    }
}

impl SweepConfig {
    /// Load a sweep configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SweepConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deck_sizes.is_empty() {
            return Err(ConfigError::Invalid("no deck sizes".to_string()));
        }
        if self.deck_sizes.contains(&0) {
            return Err(ConfigError::Invalid("deck size must be positive".to_string()));
        }
        if self.land_ratio_cards == 0 || self.land_ratio_lands > self.land_ratio_cards {
            return Err(ConfigError::Invalid(format!(
                "land ratio {}/{} is not a fraction of the deck",
                self.land_ratio_lands, self.land_ratio_cards
            )));
        }
        if self.max_turn == 0 {
            return Err(ConfigError::Invalid("max_turn must be at least 1".to_string()));
        }
        if self.trials == 0 {
            return Err(ConfigError::Invalid("trials must be at least 1".to_string()));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Lands in a deck of `cards` cards, rounded down
    pub fn lands_for(&self, cards: u32) -> u32 {
        self.land_ratio_lands * cards / self.land_ratio_cards
    }

    /// Worker count for the sweep pool
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1)
        })
    }
}
