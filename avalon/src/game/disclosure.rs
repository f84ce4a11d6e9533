//! What each role is allowed to learn about the others.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::entities::{Participant, ParticipantId, PublicParticipant, Team};
use super::roles::Role;

/// A fellow evil participant with their role revealed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Teammate {
    pub participant: PublicParticipant,
    pub role: Role,
}

/// Role-specific extra visibility.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Disclosure {
    Nothing,
    /// Merlin: every evil participant except Mordred.
    KnownEvil(Vec<PublicParticipant>),
    /// Percival: Merlin and Morgana in random order, unlabelled.
    MerlinCandidates(Vec<PublicParticipant>),
    /// Evil: the rest of the evil team, roles included.
    EvilTeammates(Vec<Teammate>),
}

/// Everything one participant is told privately at the start of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoleInfo {
    pub id: ParticipantId,
    pub role: Role,
    pub team: Team,
    pub description: &'static str,
    pub disclosure: Disclosure,
}

impl RoleInfo {
    /// Ids this participant knows to be evil for certain.
    pub fn known_evil_ids(&self) -> Vec<ParticipantId> {
        match &self.disclosure {
            Disclosure::KnownEvil(evil) => evil.iter().map(|p| p.id).collect(),
            Disclosure::EvilTeammates(teammates) => {
                teammates.iter().map(|t| t.participant.id).collect()
            }
            Disclosure::Nothing | Disclosure::MerlinCandidates(_) => Vec::new(),
        }
    }
}

/// Computes the private information for participant `id`.
///
/// Returns `None` if `id` isn't seated or roles haven't been assigned.
pub fn role_info<R: Rng + ?Sized>(
    participants: &[Participant],
    id: ParticipantId,
    rng: &mut R,
) -> Option<RoleInfo> {
    let me = participants.iter().find(|p| p.id == id)?;
    let role = me.role?;

    let disclosure = match role {
        Role::Merlin => Disclosure::KnownEvil(
            participants
                .iter()
                .filter(|p| p.is_evil() && p.role != Some(Role::Mordred))
                .map(Participant::public)
                .collect(),
        ),
        Role::Percival => {
            let mut candidates: Vec<PublicParticipant> = participants
                .iter()
                .filter(|p| matches!(p.role, Some(Role::Merlin | Role::Morgana)))
                .map(Participant::public)
                .collect();
            candidates.shuffle(rng);
            Disclosure::MerlinCandidates(candidates)
        }
        Role::Assassin | Role::Morgana | Role::Mordred | Role::Minion => Disclosure::EvilTeammates(
            participants
                .iter()
                .filter(|p| p.is_evil() && p.id != id)
                .filter_map(|p| {
                    Some(Teammate {
                        participant: p.public(),
                        role: p.role?,
                    })
                })
                .collect(),
        ),
        Role::Servant => Disclosure::Nothing,
    };

    Some(RoleInfo {
        id,
        role,
        team: role.team(),
        description: role.description(),
        disclosure,
    })
}
