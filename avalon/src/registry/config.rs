//! Match configuration models.

use serde::{Deserialize, Serialize};

use crate::game::constants::{MAX_PARTICIPANTS, MIN_PARTICIPANTS};

/// Bot difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Easy,     // Random but legal play
    Standard, // Trust-by-default heuristic
}

impl std::fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotDifficulty::Easy => write!(f, "easy"),
            BotDifficulty::Standard => write!(f, "standard"),
        }
    }
}

impl std::str::FromStr for BotDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(BotDifficulty::Easy),
            "standard" => Ok(BotDifficulty::Standard),
            other => Err(format!("unknown bot difficulty '{other}'")),
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Match name
    pub name: String,

    /// Maximum number of participants (default: 10)
    pub max_participants: usize,

    /// Whether bots fill empty seats when the match starts
    pub bots_enabled: bool,

    /// Roster size bots top up to at start (default: 5)
    pub target_participant_count: usize,

    /// Bot difficulty preset
    pub bot_difficulty: BotDifficulty,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: "Avalon".to_string(),
            max_participants: MAX_PARTICIPANTS,
            bots_enabled: true,
            target_participant_count: MIN_PARTICIPANTS,
            bot_difficulty: BotDifficulty::Standard,
        }
    }
}

impl MatchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Match name must not be empty".to_string());
        }

        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&self.max_participants) {
            return Err(format!(
                "Max participants must be between {MIN_PARTICIPANTS} and {MAX_PARTICIPANTS}"
            ));
        }

        if self.bots_enabled
            && !(MIN_PARTICIPANTS..=self.max_participants).contains(&self.target_participant_count)
        {
            return Err(format!(
                "Target participant count must be between {MIN_PARTICIPANTS} and {}",
                self.max_participants
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.max_participants, 10);
        assert_eq!(config.target_participant_count, 5);
        assert!(config.bots_enabled);
        assert_eq!(config.bot_difficulty, BotDifficulty::Standard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_capacity() {
        for max_participants in [0, 4, 11] {
            let config = MatchConfig {
                max_participants,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_validate_target_only_matters_with_bots() {
        let mut config = MatchConfig {
            max_participants: 6,
            target_participant_count: 8,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.bots_enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let config = MatchConfig {
            name: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_difficulty_parsing_and_serde() {
        assert_eq!("Easy".parse::<BotDifficulty>(), Ok(BotDifficulty::Easy));
        assert_eq!(
            " standard ".parse::<BotDifficulty>(),
            Ok(BotDifficulty::Standard)
        );
        assert!("tag".parse::<BotDifficulty>().is_err());
        assert_eq!(
            serde_json::to_string(&BotDifficulty::Easy).unwrap(),
            "\"easy\""
        );
    }
}
