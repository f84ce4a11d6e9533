//! Match state machine.
//!
//! A [`Match`] owns every piece of game data for one match and advances
//! itself once a round's inputs are complete. Callers (chat adapters, bots)
//! only ever go through the operations defined here.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use uuid::Uuid;

use super::constants::{
    self, MAX_PARTICIPANTS, MAX_REJECTIONS, MIN_PARTICIPANTS, MISSIONS_TO_WIN, NUM_MISSIONS,
};
use super::disclosure::{self, RoleInfo};
use super::entities::{
    GameEvent, MatchView, MissionOutcome, Participant, ParticipantId, Phase, Team, Username,
};
use super::roles::{self, Role};

/// Errors that can occur during match operations. A failed operation
/// never changes the match.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum MatchError {
    #[error("can't do that during the {0} phase")]
    WrongPhase(Phase),
    #[error("match is full")]
    CapacityReached,
    #[error("participant already joined")]
    ParticipantAlreadyExists,
    #[error("participant does not exist")]
    ParticipantDoesNotExist,
    #[error("need 5-10 participants, have {0}")]
    InvalidParticipantCount(usize),
    #[error("only the leader can propose a team")]
    NotLeader,
    #[error("team must have {expected} members, got {got}")]
    InvalidTeamSize { expected: usize, got: usize },
    #[error("team lists a participant more than once")]
    DuplicateTeamMember,
    #[error("not on the mission team")]
    NotOnTeam,
    #[error("good participants can't sabotage a mission")]
    CannotSabotage,
    #[error("only the assassin can assassinate")]
    NotAssassin,
}

/// Match configuration settings
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub max_participants: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(MAX_PARTICIPANTS)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(max_participants: usize) -> Self {
        Self { max_participants }
    }

    /// Seats actually available, never more than the rules allow.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_participants.min(MAX_PARTICIPANTS)
    }
}

/// One match of Avalon, from lobby to finish.
#[derive(Debug)]
pub struct Match {
    id: Uuid,
    settings: GameSettings,
    /// Seating order is join order and drives leader rotation.
    participants: Vec<Participant>,
    phase: Phase,
    /// 1-based mission number.
    round: usize,
    leader_idx: usize,
    rejection_streak: usize,
    missions: [MissionOutcome; NUM_MISSIONS],
    proposed_team: Vec<ParticipantId>,
    team_ballots: HashMap<ParticipantId, bool>,
    mission_ballots: HashMap<ParticipantId, bool>,
    merlin: Option<ParticipantId>,
    assassin: Option<ParticipantId>,
    assassination_target: Option<ParticipantId>,
    /// Events queued for the caller to render.
    events: VecDeque<GameEvent>,
}

impl Default for Match {
    fn default() -> Self {
        GameSettings::default().into()
    }
}

impl From<GameSettings> for Match {
    fn from(settings: GameSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            participants: Vec::with_capacity(settings.capacity()),
            settings,
            phase: Phase::Lobby,
            round: 1,
            leader_idx: 0,
            rejection_streak: 0,
            missions: [MissionOutcome::Pending; NUM_MISSIONS],
            proposed_team: Vec::new(),
            team_ballots: HashMap::new(),
            mission_ballots: HashMap::new(),
            merlin: None,
            assassin: None,
            assassination_target: None,
            events: VecDeque::new(),
        }
    }
}

impl Match {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn require_phase(&self, phase: Phase) -> Result<(), MatchError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(MatchError::WrongPhase(self.phase))
        }
    }

    fn seat_of(&self, id: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    fn name_of(&self, id: ParticipantId) -> Username {
        self.participant(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| Username::new(&id.to_string()))
    }

    fn advance_leader(&mut self) {
        self.leader_idx = (self.leader_idx + 1) % self.participants.len();
    }

    fn count_missions(&self, outcome: MissionOutcome) -> usize {
        self.missions.iter().filter(|&&m| m == outcome).count()
    }

    fn finish(&mut self) -> Option<Phase> {
        self.phase = Phase::Finished;
        self.proposed_team.clear();
        if let Some(winner) = self.winner() {
            info!("match {}: {winner} wins", self.id);
            self.events.push_back(GameEvent::GameOver(winner));
        }
        Some(Phase::Finished)
    }

    // === Roster ===

    pub fn add_participant(&mut self, id: ParticipantId, name: &str) -> Result<(), MatchError> {
        self.require_phase(Phase::Lobby)?;
        if self.participants.len() >= self.settings.capacity() {
            return Err(MatchError::CapacityReached);
        }
        if self.seat_of(id).is_some() {
            return Err(MatchError::ParticipantAlreadyExists);
        }

        let name = Username::new(name);
        debug!("match {}: {name} joined", self.id);
        self.events.push_back(GameEvent::Joined(name.clone()));
        self.participants.push(Participant::new(id, name));
        Ok(())
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<(), MatchError> {
        self.require_phase(Phase::Lobby)?;
        let seat = self
            .seat_of(id)
            .ok_or(MatchError::ParticipantDoesNotExist)?;

        let participant = self.participants.remove(seat);
        debug!("match {}: {} left", self.id, participant.name);
        self.events.push_back(GameEvent::Left(participant.name));
        Ok(())
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        (MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&self.participants.len())
    }

    /// Deals roles at random and moves the match to team proposal.
    pub fn assign_roles(&mut self) -> Result<Option<Phase>, MatchError> {
        self.assign_roles_with(&mut rand::rng())
    }

    /// Same as [`Match::assign_roles`] with a caller-provided RNG.
    pub fn assign_roles_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<Phase>, MatchError> {
        self.require_phase(Phase::Lobby)?;
        let n = self.participants.len();
        let dealt = roles::deal_roles(n, rng).ok_or(MatchError::InvalidParticipantCount(n))?;

        for (seat, role) in dealt {
            let participant = &mut self.participants[seat];
            participant.role = Some(role);
            match role {
                Role::Merlin => self.merlin = Some(participant.id),
                Role::Assassin => self.assassin = Some(participant.id),
                _ => {}
            }
        }

        self.phase = Phase::TeamProposal;
        self.round = 1;
        self.leader_idx = 0;
        info!("match {}: roles assigned to {n} participants", self.id);
        self.events.push_back(GameEvent::RolesAssigned);
        Ok(Some(Phase::TeamProposal))
    }

    // === Proposal & voting ===

    pub fn propose_team(
        &mut self,
        leader: ParticipantId,
        members: &[ParticipantId],
    ) -> Result<Option<Phase>, MatchError> {
        self.require_phase(Phase::TeamProposal)?;
        if self.current_leader().map(|p| p.id) != Some(leader) {
            return Err(MatchError::NotLeader);
        }
        let expected = self
            .required_mission_size()
            .ok_or(MatchError::InvalidParticipantCount(self.participants.len()))?;
        if members.len() != expected {
            return Err(MatchError::InvalidTeamSize {
                expected,
                got: members.len(),
            });
        }
        if members.iter().any(|&id| self.seat_of(id).is_none()) {
            return Err(MatchError::ParticipantDoesNotExist);
        }
        let distinct: HashSet<&ParticipantId> = members.iter().collect();
        if distinct.len() != members.len() {
            return Err(MatchError::DuplicateTeamMember);
        }

        self.proposed_team = members.to_vec();
        self.team_ballots.clear();
        self.phase = Phase::TeamVoting;
        self.events.push_back(GameEvent::TeamProposed {
            leader: self.name_of(leader),
            team: members.iter().map(|&id| self.name_of(id)).collect(),
        });
        Ok(Some(Phase::TeamVoting))
    }

    /// Records a team ballot. Re-voting overwrites until the last ballot
    /// arrives, at which point the tally fires exactly once.
    pub fn vote_team(
        &mut self,
        id: ParticipantId,
        approve: bool,
    ) -> Result<Option<Phase>, MatchError> {
        self.require_phase(Phase::TeamVoting)?;
        if self.seat_of(id).is_none() {
            return Err(MatchError::ParticipantDoesNotExist);
        }

        debug!("match {}: team ballot from {id}", self.id);
        self.team_ballots.insert(id, approve);
        if self.team_ballots.len() < self.participants.len() {
            return Ok(None);
        }
        Ok(Some(self.tally_team_vote()))
    }

    fn tally_team_vote(&mut self) -> Phase {
        let (approvals, rejections): (Vec<&Participant>, Vec<&Participant>) = self
            .participants
            .iter()
            .partition(|p| self.team_ballots.get(&p.id).copied().unwrap_or(false));
        let approvals: Vec<Username> = approvals.into_iter().map(|p| p.name.clone()).collect();
        let rejections: Vec<Username> = rejections.into_iter().map(|p| p.name.clone()).collect();
        let majority = self.participants.len() / 2 + 1;

        if approvals.len() >= majority {
            info!(
                "match {}: team approved {}-{}",
                self.id,
                approvals.len(),
                rejections.len()
            );
            self.rejection_streak = 0;
            self.mission_ballots.clear();
            self.phase = Phase::Mission;
            self.events.push_back(GameEvent::TeamApproved {
                approvals,
                rejections,
            });
            return Phase::Mission;
        }

        self.rejection_streak += 1;
        self.proposed_team.clear();
        info!(
            "match {}: team rejected {}-{}, streak {}",
            self.id,
            approvals.len(),
            rejections.len(),
            self.rejection_streak
        );
        self.events.push_back(GameEvent::TeamRejected {
            approvals,
            rejections,
            streak: self.rejection_streak,
        });

        if self.rejection_streak >= MAX_REJECTIONS {
            self.finish();
            Phase::Finished
        } else {
            self.advance_leader();
            self.phase = Phase::TeamProposal;
            Phase::TeamProposal
        }
    }

    // === Missions ===

    pub fn vote_mission(
        &mut self,
        id: ParticipantId,
        succeed: bool,
    ) -> Result<Option<Phase>, MatchError> {
        self.require_phase(Phase::Mission)?;
        if !self.proposed_team.contains(&id) {
            return Err(MatchError::NotOnTeam);
        }
        let participant = self
            .participant(id)
            .ok_or(MatchError::ParticipantDoesNotExist)?;
        if !succeed && !participant.is_evil() {
            return Err(MatchError::CannotSabotage);
        }

        debug!("match {}: mission ballot from {id}", self.id);
        self.mission_ballots.insert(id, succeed);
        if self.mission_ballots.len() < self.proposed_team.len() {
            return Ok(None);
        }
        Ok(Some(self.resolve_mission()))
    }

    fn resolve_mission(&mut self) -> Phase {
        let fails = self.mission_ballots.values().filter(|&&s| !s).count();
        let required = constants::required_fails(self.participants.len(), self.round);
        let outcome = if fails >= required {
            MissionOutcome::Failed
        } else {
            MissionOutcome::Succeeded
        };

        let slot = &mut self.missions[self.round - 1];
        if *slot == MissionOutcome::Pending {
            *slot = outcome;
        }
        info!(
            "match {}: mission {} {outcome:?} with {fails} fail(s)",
            self.id, self.round
        );
        self.events.push_back(GameEvent::MissionResolved {
            round: self.round,
            outcome,
            fails,
        });

        if self.count_missions(MissionOutcome::Failed) >= MISSIONS_TO_WIN {
            self.finish();
            Phase::Finished
        } else if self.count_missions(MissionOutcome::Succeeded) >= MISSIONS_TO_WIN {
            self.proposed_team.clear();
            self.phase = Phase::Assassination;
            Phase::Assassination
        } else {
            self.round += 1;
            self.advance_leader();
            self.proposed_team.clear();
            self.phase = Phase::TeamProposal;
            Phase::TeamProposal
        }
    }

    // === Assassination ===

    /// One irrevocable attempt; the match finishes whoever is targeted.
    pub fn assassinate(
        &mut self,
        assassin: ParticipantId,
        target: ParticipantId,
    ) -> Result<Option<Phase>, MatchError> {
        self.require_phase(Phase::Assassination)?;
        if self.assassin != Some(assassin) {
            return Err(MatchError::NotAssassin);
        }
        if self.seat_of(target).is_none() {
            return Err(MatchError::ParticipantDoesNotExist);
        }

        self.assassination_target = Some(target);
        self.events
            .push_back(GameEvent::AssassinationAttempted(self.name_of(target)));
        Ok(self.finish())
    }

    #[must_use]
    pub fn is_assassination_successful(&self, target: ParticipantId) -> bool {
        self.merlin == Some(target)
    }

    /// Winning team, derived from the recorded facts of a finished match.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        if self.phase != Phase::Finished {
            return None;
        }
        let assassinated_merlin = self
            .assassination_target
            .is_some_and(|target| self.is_assassination_successful(target));
        if self.count_missions(MissionOutcome::Failed) >= MISSIONS_TO_WIN
            || self.rejection_streak >= MAX_REJECTIONS
            || assassinated_merlin
        {
            Some(Team::Evil)
        } else {
            Some(Team::Good)
        }
    }

    // === Queries ===

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn current_leader(&self) -> Option<&Participant> {
        self.participants.get(self.leader_idx)
    }

    #[must_use]
    pub fn required_mission_size(&self) -> Option<usize> {
        constants::mission_size(self.participants.len(), self.round)
    }

    #[must_use]
    pub fn required_fails(&self) -> usize {
        constants::required_fails(self.participants.len(), self.round)
    }

    #[must_use]
    pub fn rejection_streak(&self) -> usize {
        self.rejection_streak
    }

    #[must_use]
    pub fn missions(&self) -> &[MissionOutcome; NUM_MISSIONS] {
        &self.missions
    }

    #[must_use]
    pub fn proposed_team(&self) -> &[ParticipantId] {
        &self.proposed_team
    }

    #[must_use]
    pub fn has_voted_on_team(&self, id: ParticipantId) -> bool {
        self.phase == Phase::TeamVoting && self.team_ballots.contains_key(&id)
    }

    #[must_use]
    pub fn has_voted_on_mission(&self, id: ParticipantId) -> bool {
        self.phase == Phase::Mission && self.mission_ballots.contains_key(&id)
    }

    #[must_use]
    pub fn assassin(&self) -> Option<ParticipantId> {
        self.assassin
    }

    #[must_use]
    pub fn assassination_target(&self) -> Option<ParticipantId> {
        self.assassination_target
    }

    /// Private information for one participant. Percival's pair is
    /// reshuffled on every call.
    #[must_use]
    pub fn role_info(&self, id: ParticipantId) -> Option<RoleInfo> {
        disclosure::role_info(&self.participants, id, &mut rand::rng())
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> MatchView {
        let team_voters: Vec<ParticipantId> = if self.phase == Phase::TeamVoting {
            self.participants
                .iter()
                .filter(|p| self.team_ballots.contains_key(&p.id))
                .map(|p| p.id)
                .collect()
        } else {
            Vec::new()
        };

        MatchView {
            phase: self.phase,
            round: self.round,
            participants: self.participants.iter().map(Participant::public).collect(),
            leader: match self.phase {
                Phase::TeamProposal | Phase::TeamVoting | Phase::Mission => {
                    self.current_leader().map(Participant::public)
                }
                _ => None,
            },
            required_mission_size: self.required_mission_size(),
            required_fails: self.required_fails(),
            rejection_streak: self.rejection_streak,
            missions: self.missions,
            proposed_team: self.proposed_team.clone(),
            team_voters,
            mission_ballots_cast: if self.phase == Phase::Mission {
                self.mission_ballots.len()
            } else {
                0
            },
            assassination_target: self.assassination_target,
            winner: self.winner(),
        }
    }
}
