//! Configuration management for the TrainHub engine
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: TH__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub levels: LevelConfig,
    pub windows: WindowConfig,
    pub streaks: StreakConfig,
}

/// Level curve configuration
///
/// The increment to advance from level n to n+1 is `base_step * n`,
/// so the per-level requirement is strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub base_step: i64,
}

/// Rolling window lengths for weekly/monthly point sums
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub weekly_days: i64,
    pub monthly_days: i64,
}

/// Streak configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Current-streak length at which the flame badge is shown
    pub badge_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            levels: LevelConfig { base_step: 100 },
            windows: WindowConfig {
                weekly_days: 7,
                monthly_days: 30,
            },
            streaks: StreakConfig { badge_threshold: 7 },
        }
    }
}

impl EngineConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with TH__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&EngineConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (TH__ prefix)
            // e.g., TH__LEVELS__BASE_STEP=150 sets levels.base_step
            .add_source(config::Environment::with_prefix("TH").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
