//! Avalon rules engine - match FSM, role tables and disclosure rules.
//!
//! This module provides the foundational game implementation including:
//! - Static rule tables keyed by participant count
//! - Role assignment with the good/evil split for 5-10 participants
//! - The information each role is allowed to see
//! - The match state machine and its snapshots and events

pub mod constants;
pub mod disclosure;
pub mod entities;
pub mod roles;
pub mod state_machine;

pub use disclosure::{Disclosure, RoleInfo, Teammate};
pub use entities::{
    GameEvent, MatchView, MissionOutcome, Participant, ParticipantId, Phase, PublicParticipant,
    Team, Username,
};
pub use roles::Role;
pub use state_machine::{GameSettings, Match, MatchError};
