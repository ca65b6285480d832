//! Configuration System
//!
//! Loads tuning parameters from a TOML file. Every section falls back to its
//! defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use kitchen_events::{Catalog, FoodKind};

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "kitchen_bot.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Seed for idle wandering
    pub seed: u64,
    pub valuation: ValuationConfig,
    pub assignment: AssignmentConfig,
    pub workflow: WorkflowConfig,
    pub pathing: PathingConfig,
    pub raid: RaidConfig,
    /// Shop prices used for valuation and affordability checks
    pub prices: Catalog,
}

impl BotConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Order valuation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Turns charged per cookable ingredient
    pub cook_turns: u32,
    /// Turns charged per choppable ingredient
    pub chop_turns: u32,
    /// Turns charged per ingredient regardless of prep
    pub per_item_overhead: u32,
    /// Divisor inside the logistic; larger means a flatter curve
    pub steepness: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            cook_turns: 20,
            chop_turns: 2,
            per_item_overhead: 5,
            steepness: 5.0,
        }
    }
}

/// How idle units pick their next order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// Highest expected value that clears the profit and odds thresholds
    #[default]
    ExpectedValue,
    /// First open order in the order the game lists them
    FirstUnclaimed,
}

/// Task assignment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    pub policy: AssignmentPolicy,
    /// Orders at or below this success probability are skipped
    pub min_success_probability: f64,
    /// Skip orders whose reward does not exceed their ingredient cost
    pub require_profit: bool,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            policy: AssignmentPolicy::ExpectedValue,
            min_success_probability: 0.5,
            require_profit: true,
        }
    }
}

/// Workflow state machine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Wash and reuse plates after a submission instead of buying new ones
    pub dish_reuse: bool,
    /// Bound on non-acting transitions evaluated within one turn
    pub max_internal_passes: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            dish_reuse: true,
            max_internal_passes: 4,
        }
    }
}

/// Pathfinding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathingConfig {
    /// Avoid stepping back onto the cell occupied last turn
    pub avoid_backtrack: bool,
    /// Memoize first steps within a turn
    pub cache: bool,
}

impl Default for PathingConfig {
    fn default() -> Self {
        Self {
            avoid_backtrack: true,
            cache: true,
        }
    }
}

/// Late-game sabotage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidConfig {
    pub enabled: bool,
    /// Turn at which the last unit is pulled off orders
    pub start_turn: u32,
    /// Turn by which the raider must be heading home
    pub timeout_turn: u32,
    /// Ingredient to steal and discard
    pub target: FoodKind,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_turn: 250,
            timeout_turn: 350,
            target: FoodKind::Meat,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BotConfig::from_str("").unwrap();
        assert_eq!(config, BotConfig::default());
        assert_eq!(config.valuation.cook_turns, 20);
        assert_eq!(config.assignment.policy, AssignmentPolicy::ExpectedValue);
        assert!(!config.raid.enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config = BotConfig::from_str(
            r#"
seed = 9

[assignment]
policy = "first_unclaimed"

[raid]
enabled = true
target = "EGG"

[prices]
meat = 12
"#,
        )
        .unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.assignment.policy, AssignmentPolicy::FirstUnclaimed);
        assert_eq!(config.assignment.min_success_probability, 0.5);
        assert!(config.raid.enabled);
        assert_eq!(config.raid.target, FoodKind::Egg);
        assert_eq!(config.raid.start_turn, 250);
        assert_eq!(config.prices.meat, 12);
        assert_eq!(config.prices.egg, Catalog::default().egg);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = BotConfig::default();
        config.workflow.dish_reuse = false;
        config.valuation.steepness = 8.0;

        let text = config.to_toml().unwrap();
        let back = BotConfig::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = BotConfig::from_str("[valuation\ncook_turns = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
