//! Bot player models and configuration.

use crate::game::{ParticipantId, RoleInfo};
use crate::registry::config::BotDifficulty;

use super::decision::{AgentStrategy, HeuristicStrategy, RandomStrategy};

/// Bot player identifier
pub type BotId = ParticipantId;

/// Bot player configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot unique ID, also its participant ID
    pub id: BotId,

    /// Bot display name
    pub name: String,

    /// Difficulty preset
    pub difficulty: BotDifficulty,
}

/// Bot difficulty parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyParams {
    /// Chance a good bot approves a proposed team
    pub good_approve_rate: f64,

    /// Chance an evil bot approves a team it isn't on
    pub evil_approve_rate: f64,

    /// Whether an evil bot always approves a team it is on
    pub evil_approves_own_team: bool,

    /// Chance an evil bot sabotages a mission it is on
    pub sabotage_rate: f64,
}

impl DifficultyParams {
    /// Get parameters for Easy difficulty
    /// Coin flips everywhere the rules allow a choice
    pub fn easy() -> Self {
        Self {
            good_approve_rate: 0.5,
            evil_approve_rate: 0.5,
            evil_approves_own_team: false,
            sabotage_rate: 0.5,
        }
    }

    /// Get parameters for Standard difficulty
    pub fn standard() -> Self {
        Self {
            good_approve_rate: 0.75,      // Mostly trusting
            evil_approve_rate: 0.5,       // Even odds off the team
            evil_approves_own_team: true, // Self-interest
            sabotage_rate: 1.0,           // Always sabotages
        }
    }

    /// Get parameters for a given difficulty
    pub fn from_difficulty(difficulty: BotDifficulty) -> Self {
        match difficulty {
            BotDifficulty::Easy => Self::easy(),
            BotDifficulty::Standard => Self::standard(),
        }
    }
}

/// Bot statistics tracker
#[derive(Debug, Clone, Default)]
pub struct BotStats {
    /// Teams proposed as leader
    pub proposals: u32,

    /// Team ballots cast
    pub team_votes: u32,

    /// Team ballots that approved
    pub approvals: u32,

    /// Missions the bot went on
    pub missions: u32,

    /// Mission ballots that sabotaged
    pub sabotages: u32,
}

impl BotStats {
    /// Share of team ballots that approved
    pub fn approval_rate(&self) -> f32 {
        if self.team_votes == 0 {
            0.0
        } else {
            self.approvals as f32 / self.team_votes as f32
        }
    }
}

/// Bot player state
#[derive(Debug)]
pub struct BotPlayer {
    /// Bot configuration
    pub config: BotConfig,

    /// Difficulty parameters
    pub params: DifficultyParams,

    /// Statistics tracker
    pub stats: BotStats,

    /// What the bot was told about its role, once roles are dealt
    pub role_info: Option<RoleInfo>,

    /// Decision source
    pub strategy: AgentStrategy,
}

impl BotPlayer {
    /// Create a new bot player
    pub fn new(config: BotConfig) -> Self {
        let params = DifficultyParams::from_difficulty(config.difficulty);
        let strategy: AgentStrategy = match config.difficulty {
            BotDifficulty::Easy => RandomStrategy::new(params.clone()).into(),
            BotDifficulty::Standard => HeuristicStrategy::new(params.clone()).into(),
        };

        Self {
            config,
            params,
            stats: BotStats::default(),
            role_info: None,
            strategy,
        }
    }

    pub fn id(&self) -> BotId {
        self.config.id
    }

    pub fn record_proposal(&mut self) {
        self.stats.proposals += 1;
    }

    pub fn record_team_vote(&mut self, approve: bool) {
        self.stats.team_votes += 1;
        if approve {
            self.stats.approvals += 1;
        }
    }

    pub fn record_mission(&mut self, succeed: bool) {
        self.stats.missions += 1;
        if !succeed {
            self.stats.sabotages += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_params_match_policy() {
        let params = DifficultyParams::standard();
        assert_eq!(params.good_approve_rate, 0.75);
        assert_eq!(params.sabotage_rate, 1.0);
        assert!(params.evil_approves_own_team);
    }

    #[test]
    fn test_strategy_follows_difficulty() {
        let easy = BotPlayer::new(BotConfig {
            id: 1,
            name: "Bot".to_string(),
            difficulty: BotDifficulty::Easy,
        });
        assert!(matches!(easy.strategy, AgentStrategy::Random(_)));

        let standard = BotPlayer::new(BotConfig {
            id: 2,
            name: "Bot".to_string(),
            difficulty: BotDifficulty::Standard,
        });
        assert!(matches!(standard.strategy, AgentStrategy::Heuristic(_)));
    }

    #[test]
    fn test_stats_recording() {
        let mut bot = BotPlayer::new(BotConfig {
            id: 1,
            name: "Bot".to_string(),
            difficulty: BotDifficulty::Standard,
        });
        bot.record_team_vote(true);
        bot.record_team_vote(false);
        bot.record_mission(false);
        assert_eq!(bot.stats.approval_rate(), 0.5);
        assert_eq!(bot.stats.sabotages, 1);
        assert_eq!(bot.stats.missions, 1);
    }
}
