// Ledger configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Leading zero hex digits required of a block's proof hash
pub const MINING_DIFFICULTY: usize = 3;
/// Reserved sender that mints mining rewards
pub const MINING_SENDER: &str = "THE BLOCKCHAIN";
/// Value paid to the miner for each sealed block
pub const MINING_REWARD: f64 = 1.0;
/// Longest possible run of hex zeros in a SHA256 digest
pub const MAX_DIFFICULTY: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Difficulty {0} exceeds the maximum of 64")]
    DifficultyTooHigh(usize),
    #[error("Mining reward must be positive and finite, got {0}")]
    InvalidReward(f64),
    #[error("Reward sender must not be empty")]
    EmptyRewardSender,
}

/// Tunables for a ledger instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Leading zero hex digits required by the proof-of-work
    pub difficulty: usize,
    /// Reward minted per mined block
    pub mining_reward: f64,
    /// Sentinel address that issues rewards
    pub reward_sender: String,
    /// Address credited when no explicit miner is given
    pub miner_address: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: MINING_DIFFICULTY,
            mining_reward: MINING_REWARD,
            reward_sender: MINING_SENDER.to_string(),
            miner_address: "miner".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load config from a JSON file; missing fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the difficulty
    pub fn with_difficulty(mut self, difficulty: usize) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooHigh(self.difficulty));
        }
        if !(self.mining_reward.is_finite() && self.mining_reward > 0.0) {
            return Err(ConfigError::InvalidReward(self.mining_reward));
        }
        if self.reward_sender.is_empty() {
            return Err(ConfigError::EmptyRewardSender);
        }
        Ok(())
    }
}
