//! # Avalon
//!
//! A rules engine for The Resistance: Avalon, a hidden-role social deduction
//! game for 5 to 10 participants.
//!
//! Each match is a finite state machine driven by explicit operations. The
//! engine validates every operation against the current phase and the
//! caller's role, advances automatically once a round's inputs are complete,
//! and derives the winner from recorded facts.
//!
//! ## Architecture
//!
//! A match moves through six phases:
//!
//! - **Lobby**: Participants join and leave
//! - **TeamProposal**: The leader names a team for the current mission
//! - **TeamVoting**: Everyone approves or rejects the team
//! - **Mission**: Team members secretly succeed or sabotage
//! - **Assassination**: After three successes the assassin names Merlin
//! - **Finished**: Winner is fixed
//!
//! ## Core Modules
//!
//! - [`game`]: Match state machine, role tables and disclosure rules
//! - [`bot`]: Stand-in participants that play through public operations
//! - [`registry`]: Concurrent registry hosting one match per key
//!
//! ## Example
//!
//! ```
//! use avalon::{Match, Phase};
//!
//! let mut game = Match::new();
//! for id in 1..=5 {
//!     game.add_participant(id, &format!("player{id}")).unwrap();
//! }
//! assert_eq!(game.assign_roles(), Ok(Some(Phase::TeamProposal)));
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameEvent, GameSettings, Match, MatchError, MatchView, Phase, Role, RoleInfo, Team,
    constants::{self, MAX_PARTICIPANTS, MIN_PARTICIPANTS},
    entities,
};

/// Bot players and their strategies.
pub mod bot;

/// Match registry for many concurrent matches.
pub mod registry;
pub use registry::{MatchConfig, MatchManager, RegistryError};
