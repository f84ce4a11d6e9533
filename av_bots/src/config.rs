//! Simulator configuration.
//!
//! Command-line flags win over environment variables, which win over defaults.

use avalon::{MAX_PARTICIPANTS, MIN_PARTICIPANTS, registry::BotDifficulty};

/// Simulator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Participants per match, all bots
    pub players: usize,
    /// Matches to play
    pub matches: usize,
    /// Bot difficulty preset
    pub difficulty: BotDifficulty,
    /// Matches in flight at once
    pub parallel: usize,
    /// Print the summary as JSON
    pub json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            players: 7,
            matches: 100,
            difficulty: BotDifficulty::Standard,
            parallel: 8,
            json: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from overrides and environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a set environment variable can't be parsed
    pub fn load(
        players_override: Option<usize>,
        matches_override: Option<usize>,
        difficulty_override: Option<BotDifficulty>,
        parallel_override: Option<usize>,
        json: bool,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let players = match players_override {
            Some(players) => players,
            None => parse_env("AV_BOTS_PLAYERS")?.unwrap_or(defaults.players),
        };
        let matches = match matches_override {
            Some(matches) => matches,
            None => parse_env("AV_BOTS_MATCHES")?.unwrap_or(defaults.matches),
        };
        let difficulty = match difficulty_override {
            Some(difficulty) => difficulty,
            None => parse_env("AV_BOTS_DIFFICULTY")?.unwrap_or(defaults.difficulty),
        };

        let config = Self {
            players,
            matches,
            difficulty,
            parallel: parallel_override.unwrap_or(defaults.parallel),
            json,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&self.players) {
            return Err(ConfigError::Invalid {
                var: "players".to_string(),
                reason: format!("Must be between {MIN_PARTICIPANTS} and {MAX_PARTICIPANTS}"),
            });
        }

        if self.matches == 0 {
            return Err(ConfigError::Invalid {
                var: "matches".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.parallel == 0 {
            return Err(ConfigError::Invalid {
                var: "parallel".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parses `key` if it is set. Unset is `None`, unparseable is an error.
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let config = SimConfig::load(Some(9), Some(3), Some(BotDifficulty::Easy), Some(2), true)
            .unwrap();
        assert_eq!(config.players, 9);
        assert_eq!(config.matches, 3);
        assert_eq!(config.difficulty, BotDifficulty::Easy);
        assert_eq!(config.parallel, 2);
        assert!(config.json);
    }

    #[test]
    fn test_validation_player_count() {
        for players in [4, 11] {
            let config = SimConfig {
                players,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("players"));
        }
    }

    #[test]
    fn test_validation_zero_matches() {
        let config = SimConfig {
            matches: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }
}
