//! Bot manager for seating bots and feeding their decisions into a match.

use super::decision::{DecisionContext, Strategy};
use super::models::{BotConfig, BotId, BotPlayer};
use crate::game::{Match, MatchError, ParticipantId, Phase};
use crate::registry::config::BotDifficulty;
use std::collections::BTreeMap;

/// First id handed to a bot. Keeps bots clear of small caller-chosen ids.
pub const FIRST_BOT_ID: BotId = 1_000_000;

/// Bot manager for a single match
#[derive(Debug)]
pub struct BotManager {
    /// Bot difficulty for newly spawned bots
    difficulty: BotDifficulty,

    /// Active bots (bot_id -> BotPlayer)
    bots: BTreeMap<BotId, BotPlayer>,

    /// Next bot ID
    next_bot_id: BotId,
}

impl BotManager {
    /// Create a new bot manager
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            bots: BTreeMap::new(),
            next_bot_id: FIRST_BOT_ID,
        }
    }

    /// Seat bots in the lobby until the roster reaches `target_total`.
    ///
    /// # Returns
    ///
    /// * `Result<usize, MatchError>` - Number of bots seated
    pub fn adjust_bot_count(
        &mut self,
        game: &mut Match,
        target_total: usize,
    ) -> Result<usize, MatchError> {
        let current_total = game.participants().len();
        if current_total >= target_total {
            return Ok(0);
        }
        self.spawn_bots(game, target_total - current_total)
    }

    /// Seat `count` new bots. Either every bot is seated or none is.
    pub fn spawn_bots(&mut self, game: &mut Match, count: usize) -> Result<usize, MatchError> {
        if game.phase() != Phase::Lobby {
            return Err(MatchError::WrongPhase(game.phase()));
        }
        if game.participants().len() + count > game.settings().capacity() {
            return Err(MatchError::CapacityReached);
        }

        let mut spawned = 0;

        for _ in 0..count {
            let bot_id = self.next_free_id(game);
            let name = self.generate_bot_name(bot_id);
            game.add_participant(bot_id, &name)?;
            self.next_bot_id = bot_id + 1;

            let bot = BotPlayer::new(BotConfig {
                id: bot_id,
                name,
                difficulty: self.difficulty,
            });
            self.bots.insert(bot_id, bot);
            spawned += 1;

            log::info!(
                "Spawned bot {} ({}) in match {}",
                bot_id,
                self.difficulty,
                game.id()
            );
        }

        Ok(spawned)
    }

    /// Take a bot out of the lobby.
    pub fn despawn_bot(&mut self, game: &mut Match, bot_id: BotId) -> Result<bool, MatchError> {
        if !self.bots.contains_key(&bot_id) {
            return Ok(false);
        }
        game.remove_participant(bot_id)?;
        self.bots.remove(&bot_id);
        log::info!("Despawned bot {} from match {}", bot_id, game.id());
        Ok(true)
    }

    /// Next bot id not already held by a seated participant.
    fn next_free_id(&self, game: &Match) -> BotId {
        let mut id = self.next_bot_id;
        while game.participant(id).is_some() {
            id += 1;
        }
        id
    }

    fn generate_bot_name(&self, bot_id: BotId) -> String {
        format!("Bot_{}", bot_id - FIRST_BOT_ID + 1)
    }

    pub fn is_bot(&self, id: ParticipantId) -> bool {
        self.bots.contains_key(&id)
    }

    pub fn bot_count(&self) -> usize {
        self.bots.len()
    }

    pub fn get_bot(&self, bot_id: BotId) -> Option<&BotPlayer> {
        self.bots.get(&bot_id)
    }

    pub fn bots(&self) -> impl Iterator<Item = &BotPlayer> {
        self.bots.values()
    }

    /// Plays every decision currently owed by a bot, repeating until the
    /// match waits on a human or is over.
    ///
    /// # Returns
    ///
    /// * `Result<usize, MatchError>` - Number of operations applied
    pub fn act(&mut self, game: &mut Match) -> Result<usize, MatchError> {
        let mut total = 0;
        loop {
            let applied = self.act_once(game)?;
            if applied == 0 {
                return Ok(total);
            }
            total += applied;
        }
    }

    fn act_once(&mut self, game: &mut Match) -> Result<usize, MatchError> {
        if matches!(game.phase(), Phase::Lobby | Phase::Finished) {
            return Ok(0);
        }
        for bot in self.bots.values_mut() {
            if bot.role_info.is_none() {
                bot.role_info = game.role_info(bot.id());
            }
        }

        let view = game.view();
        let mut applied = 0;

        match view.phase {
            Phase::TeamProposal => {
                let Some(leader) = view.leader.as_ref().map(|l| l.id) else {
                    return Ok(0);
                };
                if let Some(bot) = self.bots.get_mut(&leader)
                    && let Some(me) = &bot.role_info
                {
                    let team = bot.strategy.propose_team(&DecisionContext { view: &view, me });
                    game.propose_team(leader, &team)?;
                    bot.record_proposal();
                    applied += 1;
                }
            }
            Phase::TeamVoting => {
                for bot in self.bots.values_mut() {
                    if game.phase() != Phase::TeamVoting || game.has_voted_on_team(bot.id()) {
                        continue;
                    }
                    let Some(me) = &bot.role_info else { continue };
                    let approve = bot.strategy.vote_team(&DecisionContext { view: &view, me });
                    game.vote_team(bot.id(), approve)?;
                    bot.record_team_vote(approve);
                    applied += 1;
                }
            }
            Phase::Mission => {
                for &member in &view.proposed_team {
                    if game.phase() != Phase::Mission || game.has_voted_on_mission(member) {
                        continue;
                    }
                    let Some(bot) = self.bots.get_mut(&member) else {
                        continue;
                    };
                    let Some(me) = &bot.role_info else { continue };
                    let succeed = bot.strategy.vote_mission(&DecisionContext { view: &view, me });
                    game.vote_mission(member, succeed)?;
                    bot.record_mission(succeed);
                    applied += 1;
                }
            }
            Phase::Assassination => {
                if let Some(assassin) = game.assassin()
                    && let Some(bot) = self.bots.get_mut(&assassin)
                    && let Some(me) = &bot.role_info
                    && let Some(target) =
                        bot.strategy.choose_target(&DecisionContext { view: &view, me })
                {
                    game.assassinate(assassin, target)?;
                    applied += 1;
                }
            }
            Phase::Lobby | Phase::Finished => {}
        }

        Ok(applied)
    }
}
