use std::{fs, io, path::Path};

use serde::Deserialize;
use tessera_registry::PropertyMode;
use tessera_utils::random::{LegacyRandom, RandomSource, Xoroshiro};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/tessera_config.json5");

/// Errors raised while loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON5 for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Property mode as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyModeConfig {
    /// See [`PropertyMode::Strict`].
    Strict,
    /// See [`PropertyMode::Permissive`].
    #[default]
    Permissive,
}

impl From<PropertyModeConfig> for PropertyMode {
    fn from(value: PropertyModeConfig) -> Self {
        match value {
            PropertyModeConfig::Strict => PropertyMode::Strict,
            PropertyModeConfig::Permissive => PropertyMode::Permissive,
        }
    }
}

/// Random generator as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomSourceConfig {
    /// See [`Xoroshiro`].
    #[default]
    Xoroshiro,
    /// See [`LegacyRandom`].
    Legacy,
}

impl RandomSourceConfig {
    /// A generator of this kind seeded with `seed`.
    #[must_use]
    pub fn create(self, seed: u64) -> RandomSource {
        match self {
            Self::Xoroshiro => RandomSource::Xoroshiro(Xoroshiro::from_seed(seed)),
            Self::Legacy => RandomSource::Legacy(LegacyRandom::from_seed(seed)),
        }
    }
}

/// Engine tuning knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World seed, see [`EngineConfig::seed_value`].
    pub seed: String,
    /// Random ticks per section per game tick.
    pub random_tick_speed: u32,
    /// Cascade guard: neighbour updates per root change.
    pub max_chained_updates: usize,
    /// Scheduled ticks fired per game tick.
    pub max_scheduled_ticks_per_tick: usize,
    /// Behaviour of derived-state calls on missing properties.
    pub property_mode: PropertyModeConfig,
    /// Diagnostics a world keeps until they are taken.
    pub max_diagnostics: usize,
    /// Generator behind the runner's random source.
    pub random_source: RandomSourceConfig,
    /// Ticks the headless runner simulates.
    pub ticks: u64,
}

impl EngineConfig {
    /// Reads the config at `path`, writing the bundled default there first if it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            log::info!("Wrote default config to {}", path.display());
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parses and validates a config from JSON5 text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json5::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Checks every field is in range.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.random_tick_speed > 4096 {
            return Err("Random tick speed must be in range 0..4096");
        }
        if !(1..=1_000_000).contains(&self.max_chained_updates) {
            return Err("Max chained updates must be in range 1..1000000");
        }
        if self.max_scheduled_ticks_per_tick == 0 {
            return Err("Max scheduled ticks per tick must be at least 1");
        }
        if self.max_diagnostics == 0 {
            return Err("Max diagnostics must be at least 1");
        }
        Ok(())
    }

    /// The numeric seed, or `None` when the config leaves it empty.
    ///
    /// Numbers are taken as is; any other text is hashed like Java's `String.hashCode`.
    #[must_use]
    pub fn seed_value(&self) -> Option<u64> {
        let seed = self.seed.trim();
        if seed.is_empty() {
            return None;
        }
        if let Ok(number) = seed.parse::<i64>() {
            return Some(number as u64);
        }
        let hash = seed
            .encode_utf16()
            .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Some(i64::from(hash) as u64)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            random_tick_speed: 3,
            max_chained_updates: 512,
            max_scheduled_ticks_per_tick: 65536,
            property_mode: PropertyModeConfig::Permissive,
            max_diagnostics: 1024,
            random_source: RandomSourceConfig::Xoroshiro,
            ticks: 200,
        }
    }
}
