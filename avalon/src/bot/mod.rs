//! Bot module providing stand-in participants with difficulty presets.
//!
//! This module implements:
//! - BotPlayer: Individual bot with statistics tracking
//! - BotManager: Seats bots in a lobby and plays their pending moves
//! - Difficulty presets (Easy, Standard) backed by pluggable strategies
//!
//! Bots decide from the public [`MatchView`](crate::game::MatchView) and
//! their own [`RoleInfo`](crate::game::RoleInfo) only, and act through the
//! same operations as human participants.
//!
//! ## Difficulty Presets
//!
//! ### Easy (Random)
//! - Approves teams on a coin flip
//! - Evil sabotages half the time
//! - Random leader picks and assassination targets
//!
//! ### Standard (Heuristic)
//! - Good approves 75% of teams
//! - Evil approves any team it is on, half of the rest
//! - Evil always sabotages
//! - Merlin keeps known evil off its teams
//!
//! ## Example
//!
//! ```
//! use avalon::bot::BotManager;
//! use avalon::game::{Match, Phase};
//! use avalon::registry::BotDifficulty;
//!
//! let mut game = Match::new();
//! let mut bots = BotManager::new(BotDifficulty::Standard);
//! bots.adjust_bot_count(&mut game, 7).unwrap();
//! game.assign_roles().unwrap();
//!
//! bots.act(&mut game).unwrap();
//! assert_eq!(game.phase(), Phase::Finished);
//! ```

pub mod decision;
pub mod manager;
pub mod models;

pub use decision::{AgentStrategy, DecisionContext, HeuristicStrategy, RandomStrategy, Strategy};
pub use manager::BotManager;
pub use models::{BotConfig, BotId, BotPlayer, BotStats, DifficultyParams};
