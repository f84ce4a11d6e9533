//! Participants, phases, events and the public match snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::constants::{MAX_REJECTIONS, NUM_MISSIONS};
use super::roles::Role;

/// Identity key a caller uses for a participant (e.g. a chat user id).
pub type ParticipantId = u64;

/// Longest display name kept; anything past this is truncated.
pub const MAX_NAME_LENGTH: usize = 32;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut username: String = s
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .take(MAX_NAME_LENGTH)
            .collect();
        if username.is_empty() {
            username.push('?');
        }
        Self(username)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Alignment of a role.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Good,
    Evil,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Good => "good",
            Self::Evil => "evil",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    Lobby,
    TeamProposal,
    TeamVoting,
    Mission,
    Assassination,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::TeamProposal => "team proposal",
            Self::TeamVoting => "team vote",
            Self::Mission => "mission",
            Self::Assassination => "assassination",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum MissionOutcome {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl fmt::Display for MissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Pending => "·",
            Self::Succeeded => "✓",
            Self::Failed => "✗",
        };
        write!(f, "{repr}")
    }
}

/// A seated participant. The role stays `None` until roles are assigned.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: Username,
    pub role: Option<Role>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: Username) -> Self {
        Self {
            id,
            name,
            role: None,
        }
    }

    pub fn team(&self) -> Option<Team> {
        self.role.map(Role::team)
    }

    pub fn is_good(&self) -> bool {
        self.team() == Some(Team::Good)
    }

    pub fn is_evil(&self) -> bool {
        self.team() == Some(Team::Evil)
    }

    /// Public identity, safe to hand to any other participant.
    pub fn public(&self) -> PublicParticipant {
        PublicParticipant {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A participant's identity without any hidden information.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PublicParticipant {
    pub id: ParticipantId,
    pub name: Username,
}

impl fmt::Display for PublicParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Events that occur during play. Ballot values of mission votes are
/// never part of an event; only the fail count is.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    Joined(Username),
    Left(Username),
    RolesAssigned,
    TeamProposed {
        leader: Username,
        team: Vec<Username>,
    },
    TeamApproved {
        approvals: Vec<Username>,
        rejections: Vec<Username>,
    },
    TeamRejected {
        approvals: Vec<Username>,
        rejections: Vec<Username>,
        streak: usize,
    },
    MissionResolved {
        round: usize,
        outcome: MissionOutcome,
        fails: usize,
    },
    AssassinationAttempted(Username),
    GameOver(Team),
}

fn join_names(names: &[Username]) -> String {
    names
        .iter()
        .map(Username::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Joined(username) => format!("{username} joined the match"),
            Self::Left(username) => format!("{username} left the match"),
            Self::RolesAssigned => "roles have been assigned".to_string(),
            Self::TeamProposed { leader, team } => {
                format!("{leader} proposed {}", join_names(team))
            }
            Self::TeamApproved {
                approvals,
                rejections,
            } => format!(
                "team approved {}-{} (approve: {})",
                approvals.len(),
                rejections.len(),
                join_names(approvals)
            ),
            Self::TeamRejected {
                approvals,
                rejections,
                streak,
            } => format!(
                "team rejected {}-{} (reject: {}), vote track {streak}/{MAX_REJECTIONS}",
                approvals.len(),
                rejections.len(),
                join_names(rejections)
            ),
            Self::MissionResolved {
                round,
                outcome,
                fails,
            } => {
                let result = match outcome {
                    MissionOutcome::Failed => "failed",
                    _ => "succeeded",
                };
                format!("mission {round} {result} with {fails} fail(s)")
            }
            Self::AssassinationAttempted(target) => format!("the assassin struck at {target}"),
            Self::GameOver(team) => format!("{team} wins"),
        };
        write!(f, "{repr}")
    }
}

/// Render-ready snapshot of a match. Holds no roles and no ballot values.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchView {
    pub phase: Phase,
    pub round: usize,
    pub participants: Vec<PublicParticipant>,
    pub leader: Option<PublicParticipant>,
    pub required_mission_size: Option<usize>,
    pub required_fails: usize,
    pub rejection_streak: usize,
    pub missions: [MissionOutcome; NUM_MISSIONS],
    pub proposed_team: Vec<ParticipantId>,
    /// Participants that have already cast a team ballot this proposal.
    pub team_voters: Vec<ParticipantId>,
    pub mission_ballots_cast: usize,
    pub assassination_target: Option<ParticipantId>,
    pub winner: Option<Team>,
}

impl fmt::Display for MatchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} ({}) missions [", self.round, self.phase)?;
        for outcome in &self.missions {
            write!(f, "{outcome}")?;
        }
        write!(f, "] votes [")?;
        for i in 0..MAX_REJECTIONS {
            let mark = if i < self.rejection_streak { '●' } else { '○' };
            write!(f, "{mark}")?;
        }
        write!(f, "]")?;
        if let Some(leader) = &self.leader {
            write!(f, " leader {leader}")?;
        }
        if let Some(winner) = self.winner {
            write!(f, " winner {winner}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_replaces_whitespace() {
        assert_eq!(Username::new("sir lancelot").as_str(), "sir_lancelot");
    }

    #[test]
    fn test_username_truncates() {
        let long = "x".repeat(MAX_NAME_LENGTH * 2);
        assert_eq!(Username::new(&long).as_str().len(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_username_never_empty() {
        assert_eq!(Username::new("   ").as_str(), "?");
    }

    #[test]
    fn test_participant_team_follows_role() {
        let mut participant = Participant::new(1, "alice".into());
        assert_eq!(participant.team(), None);
        assert!(!participant.is_good() && !participant.is_evil());

        participant.role = Some(Role::Morgana);
        assert!(participant.is_evil());

        participant.role = Some(Role::Percival);
        assert!(participant.is_good());
    }

    #[test]
    fn test_event_display() {
        let event = GameEvent::MissionResolved {
            round: 4,
            outcome: MissionOutcome::Succeeded,
            fails: 1,
        };
        assert_eq!(event.to_string(), "mission 4 succeeded with 1 fail(s)");
        assert_eq!(GameEvent::GameOver(Team::Evil).to_string(), "evil wins");
    }

    #[test]
    fn test_view_display_tracks() {
        let view = MatchView {
            phase: Phase::TeamProposal,
            round: 3,
            participants: vec![],
            leader: None,
            required_mission_size: Some(2),
            required_fails: 1,
            rejection_streak: 2,
            missions: [
                MissionOutcome::Succeeded,
                MissionOutcome::Failed,
                MissionOutcome::Pending,
                MissionOutcome::Pending,
                MissionOutcome::Pending,
            ],
            proposed_team: vec![],
            team_voters: vec![],
            mission_ballots_cast: 0,
            assassination_target: None,
            winner: None,
        };
        assert_eq!(
            view.to_string(),
            "round 3 (team proposal) missions [✓✗···] votes [●●○○○]"
        );
    }
}
