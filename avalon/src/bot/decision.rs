//! Bot decision-making. Strategies only see what any participant sees:
//! the public match snapshot and their own role information.

use enum_dispatch::enum_dispatch;
use rand::{
    Rng, SeedableRng,
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
};

use super::models::DifficultyParams;
use crate::game::{MatchView, ParticipantId, RoleInfo, Team};

/// Everything a strategy may look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Public snapshot of the match
    pub view: &'a MatchView,

    /// The deciding bot's private role information
    pub me: &'a RoleInfo,
}

impl DecisionContext<'_> {
    fn others(&self) -> Vec<ParticipantId> {
        self.view
            .participants
            .iter()
            .map(|p| p.id)
            .filter(|&id| id != self.me.id)
            .collect()
    }

    fn on_proposed_team(&self) -> bool {
        self.view.proposed_team.contains(&self.me.id)
    }
}

/// A source of decisions for one seat.
#[enum_dispatch]
pub trait Strategy {
    /// Team to propose while leading. Must have the required size.
    fn propose_team(&mut self, ctx: &DecisionContext<'_>) -> Vec<ParticipantId>;

    fn vote_team(&mut self, ctx: &DecisionContext<'_>) -> bool;

    /// `true` to succeed. Good bots must always return `true`.
    fn vote_mission(&mut self, ctx: &DecisionContext<'_>) -> bool;

    fn choose_target(&mut self, ctx: &DecisionContext<'_>) -> Option<ParticipantId>;
}

#[enum_dispatch(Strategy)]
#[derive(Debug)]
pub enum AgentStrategy {
    Heuristic(HeuristicStrategy),
    Random(RandomStrategy),
}

/// Fills a team of `size` with `me` first, then `preferred`, then anyone.
fn fill_team<R: Rng + ?Sized>(
    rng: &mut R,
    me: ParticipantId,
    mut preferred: Vec<ParticipantId>,
    mut fallback: Vec<ParticipantId>,
    size: usize,
) -> Vec<ParticipantId> {
    preferred.shuffle(rng);
    fallback.shuffle(rng);

    let mut team = vec![me];
    for id in preferred.into_iter().chain(fallback) {
        if team.len() >= size {
            break;
        }
        if !team.contains(&id) {
            team.push(id);
        }
    }
    team.truncate(size);
    team
}

/// Simple trust-by-default heuristic.
///
/// Good bots approve most teams and always succeed missions. Evil bots back
/// teams they are on, flip a coin otherwise, always sabotage and strike at
/// a random participant they know to be good.
#[derive(Debug)]
pub struct HeuristicStrategy {
    rng: StdRng,
    params: DifficultyParams,
}

impl HeuristicStrategy {
    pub fn new(params: DifficultyParams) -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            params,
        }
    }

    pub fn with_seed(params: DifficultyParams, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            params,
        }
    }
}

impl Strategy for HeuristicStrategy {
    fn propose_team(&mut self, ctx: &DecisionContext<'_>) -> Vec<ParticipantId> {
        let size = ctx.view.required_mission_size.unwrap_or(0);
        let others = ctx.others();
        if ctx.me.team == Team::Evil {
            return fill_team(&mut self.rng, ctx.me.id, Vec::new(), others, size);
        }

        let known_evil = ctx.me.known_evil_ids();
        let (trusted, suspect): (Vec<_>, Vec<_>) =
            others.into_iter().partition(|id| !known_evil.contains(id));
        fill_team(&mut self.rng, ctx.me.id, trusted, suspect, size)
    }

    fn vote_team(&mut self, ctx: &DecisionContext<'_>) -> bool {
        match ctx.me.team {
            Team::Good => self.rng.random_bool(self.params.good_approve_rate),
            Team::Evil if self.params.evil_approves_own_team && ctx.on_proposed_team() => true,
            Team::Evil => self.rng.random_bool(self.params.evil_approve_rate),
        }
    }

    fn vote_mission(&mut self, ctx: &DecisionContext<'_>) -> bool {
        match ctx.me.team {
            Team::Good => true,
            Team::Evil => !self.rng.random_bool(self.params.sabotage_rate),
        }
    }

    fn choose_target(&mut self, ctx: &DecisionContext<'_>) -> Option<ParticipantId> {
        let known_evil = ctx.me.known_evil_ids();
        let known_good: Vec<ParticipantId> = ctx
            .others()
            .into_iter()
            .filter(|id| !known_evil.contains(id))
            .collect();
        known_good.choose(&mut self.rng).copied()
    }
}

/// Legal but aimless play, for easy tables.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
    params: DifficultyParams,
}

impl RandomStrategy {
    pub fn new(params: DifficultyParams) -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            params,
        }
    }

    pub fn with_seed(params: DifficultyParams, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            params,
        }
    }
}

impl Strategy for RandomStrategy {
    fn propose_team(&mut self, ctx: &DecisionContext<'_>) -> Vec<ParticipantId> {
        let size = ctx.view.required_mission_size.unwrap_or(0);
        let mut everyone: Vec<ParticipantId> = ctx.view.participants.iter().map(|p| p.id).collect();
        everyone.shuffle(&mut self.rng);
        everyone.truncate(size);
        everyone
    }

    fn vote_team(&mut self, ctx: &DecisionContext<'_>) -> bool {
        let rate = match ctx.me.team {
            Team::Good => self.params.good_approve_rate,
            Team::Evil => self.params.evil_approve_rate,
        };
        self.rng.random_bool(rate)
    }

    fn vote_mission(&mut self, ctx: &DecisionContext<'_>) -> bool {
        match ctx.me.team {
            Team::Good => true,
            Team::Evil => !self.rng.random_bool(self.params.sabotage_rate),
        }
    }

    fn choose_target(&mut self, ctx: &DecisionContext<'_>) -> Option<ParticipantId> {
        ctx.others().choose(&mut self.rng).copied()
    }
}
