//! Match manager for hosting many concurrent matches, one per key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    config::MatchConfig,
    errors::{RegistryError, RegistryResult},
};
use crate::bot::BotManager;
use crate::game::{
    GameEvent, GameSettings, Match, MatchError, MatchView, ParticipantId, Phase, RoleInfo,
};

/// Where a match lives, e.g. a chat channel id.
pub type MatchKey = u64;

/// Match metadata for discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub key: MatchKey,
    pub id: Uuid,
    pub name: String,
    pub host: ParticipantId,
    pub phase: Phase,
    pub participant_count: usize,
    pub max_participants: usize,
    pub bot_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Result of an operation routed through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    /// Phase the match ended up in, if the update moved it
    pub transition: Option<Phase>,

    /// Snapshot after the update, bot moves included
    pub view: MatchView,

    /// Events raised by the update, in order
    pub events: Vec<GameEvent>,
}

#[derive(Debug)]
struct MatchEntry {
    game: Match,
    config: MatchConfig,
    host: ParticipantId,
    bots: BotManager,
    created_at: DateTime<Utc>,
}

/// Registry of live matches
#[derive(Clone, Debug, Default)]
pub struct MatchManager {
    /// Active matches, each behind its own lock
    matches: Arc<RwLock<HashMap<MatchKey, Arc<Mutex<MatchEntry>>>>>,
}

impl MatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lobby under `key` with the host in the first seat.
    ///
    /// # Arguments
    ///
    /// * `key` - Where the match lives
    /// * `config` - Match configuration
    /// * `host` - Participant creating the match
    /// * `host_name` - Host display name
    ///
    /// # Returns
    ///
    /// * `RegistryResult<MatchUpdate>` - Lobby snapshot or error
    pub async fn create_match(
        &self,
        key: MatchKey,
        config: MatchConfig,
        host: ParticipantId,
        host_name: &str,
    ) -> RegistryResult<MatchUpdate> {
        config.validate().map_err(RegistryError::InvalidConfig)?;

        let mut game = Match::from(GameSettings::new(config.max_participants));
        game.add_participant(host, host_name)?;
        let bots = BotManager::new(config.bot_difficulty);
        let mut entry = MatchEntry {
            game,
            config,
            host,
            bots,
            created_at: Utc::now(),
        };
        let update = MatchUpdate {
            transition: Some(Phase::Lobby),
            view: entry.game.view(),
            events: entry.game.drain_events().into(),
        };

        let mut matches = self.matches.write().await;
        if matches.contains_key(&key) {
            log::warn!("Refused to create a second match in {}", key);
            return Err(RegistryError::MatchAlreadyActive(key));
        }
        log::info!(
            "Created match {} '{}' in {}",
            entry.game.id(),
            entry.config.name,
            key
        );
        matches.insert(key, Arc::new(Mutex::new(entry)));

        Ok(update)
    }

    pub async fn join(
        &self,
        key: MatchKey,
        id: ParticipantId,
        name: &str,
    ) -> RegistryResult<MatchUpdate> {
        self.apply(key, |entry| {
            entry.game.add_participant(id, name)?;
            Ok(None)
        })
        .await
    }

    /// Leave the lobby. The host leaving cancels the match.
    pub async fn leave(&self, key: MatchKey, id: ParticipantId) -> RegistryResult<MatchUpdate> {
        let update = self
            .apply(key, |entry| {
                entry.game.remove_participant(id)?;
                Ok(None)
            })
            .await?;

        if self.host_of(key).await == Some(id) {
            self.remove(key).await;
            log::info!("Host left, cancelled match in {}", key);
        }
        Ok(update)
    }

    /// Fill empty seats with bots if enabled, then deal roles.
    pub async fn start(&self, key: MatchKey, requester: ParticipantId) -> RegistryResult<MatchUpdate> {
        self.apply(key, |entry| {
            if entry.host != requester {
                return Err(RegistryError::NotHost);
            }
            if entry.game.phase() != Phase::Lobby {
                return Err(MatchError::WrongPhase(entry.game.phase()).into());
            }
            if entry.config.bots_enabled {
                entry
                    .bots
                    .adjust_bot_count(&mut entry.game, entry.config.target_participant_count)?;
            }
            Ok(entry.game.assign_roles()?)
        })
        .await
    }

    /// Drop a match outright.
    pub async fn cancel(&self, key: MatchKey, requester: ParticipantId) -> RegistryResult<()> {
        let entry = self.entry(key).await?;
        if entry.lock().await.host != requester {
            log::warn!("Non-host {} tried to cancel match in {}", requester, key);
            return Err(RegistryError::NotHost);
        }
        self.remove(key).await;
        log::info!("Cancelled match in {}", key);
        Ok(())
    }

    pub async fn propose_team(
        &self,
        key: MatchKey,
        leader: ParticipantId,
        team: &[ParticipantId],
    ) -> RegistryResult<MatchUpdate> {
        self.apply(key, |entry| Ok(entry.game.propose_team(leader, team)?))
            .await
    }

    pub async fn vote_team(
        &self,
        key: MatchKey,
        id: ParticipantId,
        approve: bool,
    ) -> RegistryResult<MatchUpdate> {
        self.apply(key, |entry| Ok(entry.game.vote_team(id, approve)?))
            .await
    }

    pub async fn vote_mission(
        &self,
        key: MatchKey,
        id: ParticipantId,
        succeed: bool,
    ) -> RegistryResult<MatchUpdate> {
        self.apply(key, |entry| Ok(entry.game.vote_mission(id, succeed)?))
            .await
    }

    pub async fn assassinate(
        &self,
        key: MatchKey,
        assassin: ParticipantId,
        target: ParticipantId,
    ) -> RegistryResult<MatchUpdate> {
        self.apply(key, |entry| Ok(entry.game.assassinate(assassin, target)?))
            .await
    }

    /// Private role information for one participant.
    pub async fn role_info(&self, key: MatchKey, id: ParticipantId) -> RegistryResult<RoleInfo> {
        let entry = self.entry(key).await?;
        let entry = entry.lock().await;
        if entry.game.phase() == Phase::Lobby {
            return Err(MatchError::WrongPhase(Phase::Lobby).into());
        }
        entry
            .game
            .role_info(id)
            .ok_or(RegistryError::Match(MatchError::ParticipantDoesNotExist))
    }

    pub async fn view(&self, key: MatchKey) -> RegistryResult<MatchView> {
        let entry = self.entry(key).await?;
        let view = entry.lock().await.game.view();
        Ok(view)
    }

    /// List all live matches, oldest first
    pub async fn list_matches(&self) -> Vec<MatchMetadata> {
        let entries: Vec<(MatchKey, Arc<Mutex<MatchEntry>>)> = {
            let matches = self.matches.read().await;
            matches.iter().map(|(k, e)| (*k, e.clone())).collect()
        };

        let mut metadata_list = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            let entry = entry.lock().await;
            metadata_list.push(MatchMetadata {
                key,
                id: entry.game.id(),
                name: entry.config.name.clone(),
                host: entry.host,
                phase: entry.game.phase(),
                participant_count: entry.game.participants().len(),
                max_participants: entry.config.max_participants,
                bot_count: entry.bots.bot_count(),
                created_at: entry.created_at,
            });
        }
        metadata_list.sort_by_key(|m| (m.created_at, m.key));
        metadata_list
    }

    /// Get active match count
    pub async fn active_match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    async fn entry(&self, key: MatchKey) -> RegistryResult<Arc<Mutex<MatchEntry>>> {
        let matches = self.matches.read().await;
        matches
            .get(&key)
            .cloned()
            .ok_or(RegistryError::MatchNotFound(key))
    }

    async fn host_of(&self, key: MatchKey) -> Option<ParticipantId> {
        let entry = self.entry(key).await.ok()?;
        let host = entry.lock().await.host;
        Some(host)
    }

    async fn remove(&self, key: MatchKey) {
        self.matches.write().await.remove(&key);
    }

    /// Runs `op` against the match, lets bots answer, and collects the
    /// resulting snapshot and events. Finished matches are removed.
    async fn apply<F>(&self, key: MatchKey, op: F) -> RegistryResult<MatchUpdate>
    where
        F: FnOnce(&mut MatchEntry) -> RegistryResult<Option<Phase>>,
    {
        let entry = self.entry(key).await?;
        let update = {
            let mut entry = entry.lock().await;
            let before = entry.game.phase();

            let transition = match op(&mut *entry) {
                Ok(transition) => transition,
                Err(e) => {
                    log::warn!("Rejected operation in {} ({}): {}", key, before, e);
                    return Err(e);
                }
            };

            let MatchEntry { game, bots, .. } = &mut *entry;
            if let Err(e) = bots.act(game) {
                log::warn!("Bots stalled in {} ({}): {}", key, game.phase(), e);
            }

            let phase = game.phase();
            MatchUpdate {
                transition: (transition.is_some() || phase != before).then_some(phase),
                view: game.view(),
                events: game.drain_events().into(),
            }
        };

        if update.view.phase == Phase::Finished {
            self.remove(key).await;
            log::info!("Match in {} finished and was removed", key);
        }

        Ok(update)
    }
}
