use serde::Deserialize;
use thiserror::Error;

use crate::reader::DEFAULT_MAX_PROPOSALS;
use crate::{FUNDRAISING_WINDOW_DAYS, MS_PER_DAY, TOKEN_DECIMALS};

/// Largest decimal count `format_units` is asked to handle
const MAX_DECIMALS: u32 = 36;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fetch_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("fetch_attempts must be at least 1")]
    ZeroAttempts,

    #[error("max_proposals must be at least 1")]
    ZeroMaxProposals,

    #[error("token_decimals must not exceed 36")]
    TooManyDecimals,

    #[error("Reward thresholds must be strictly ascending (regular < gold < diamond)")]
    UnorderedThresholds,
}

/// Whole-token thresholds and reward amounts for the three donation tiers.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RewardConfig {
    pub regular_threshold: u64,
    pub regular_reward: u64,
    pub gold_threshold: u64,
    pub gold_reward: u64,
    pub diamond_threshold: u64,
    pub diamond_reward: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            regular_threshold: 1_100,
            regular_reward: 10,
            gold_threshold: 2_200,
            gold_reward: 20,
            diamond_threshold: 5_500,
            diamond_reward: 50,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    pub token_decimals: u32,
    pub token_symbol: String,
    pub reward_symbol: String,
    pub fundraising_window_days: u64,
    /// Proposal reads in flight at once
    pub fetch_concurrency: usize,
    /// Reads per proposal before it is skipped
    pub fetch_attempts: u32,
    /// Upper bound on the proposal count read from the contract
    pub max_proposals: u64,
    pub rewards: RewardConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            token_decimals: TOKEN_DECIMALS,
            token_symbol: "ISLM".to_string(),
            reward_symbol: "LGN".to_string(),
            fundraising_window_days: FUNDRAISING_WINDOW_DAYS,
            fetch_concurrency: 4,
            fetch_attempts: 1,
            max_proposals: DEFAULT_MAX_PROPOSALS,
            rewards: RewardConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.fetch_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.max_proposals == 0 {
            return Err(ConfigError::ZeroMaxProposals);
        }
        if self.token_decimals > MAX_DECIMALS {
            return Err(ConfigError::TooManyDecimals);
        }
        let r = &self.rewards;
        if !(r.regular_threshold < r.gold_threshold && r.gold_threshold < r.diamond_threshold) {
            return Err(ConfigError::UnorderedThresholds);
        }
        Ok(())
    }

    pub fn window_ms(&self) -> u64 {
        self.fundraising_window_days.saturating_mul(MS_PER_DAY)
    }
}
