//! Integration tests for the match registry.
//!
//! Tests concurrent matches under different keys, host permissions and
//! removal of finished matches.

use avalon::{
    MatchConfig, MatchManager, Phase, RegistryError,
    entities::ParticipantId,
    registry::{BotDifficulty, MatchUpdate},
};
use std::collections::HashSet;

fn humans_only() -> MatchConfig {
    MatchConfig {
        bots_enabled: false,
        ..Default::default()
    }
}

/// Creates a human-only five seat match under `key` hosted by participant 1.
async fn started_match(manager: &MatchManager, key: u64) -> MatchUpdate {
    manager
        .create_match(key, humans_only(), 1, "host")
        .await
        .unwrap();
    for id in 2..=5 {
        manager.join(key, id, &format!("p{id}")).await.unwrap();
    }
    manager.start(key, 1).await.unwrap()
}

/// Every seat approves, then the team succeeds.
async fn play_clean_round(manager: &MatchManager, key: u64) -> MatchUpdate {
    let view = manager.view(key).await.unwrap();
    let size = view.required_mission_size.unwrap();
    let leader = view.leader.unwrap().id;
    let team: Vec<ParticipantId> = view.participants.iter().take(size).map(|p| p.id).collect();

    manager.propose_team(key, leader, &team).await.unwrap();
    for p in &view.participants {
        manager.vote_team(key, p.id, true).await.unwrap();
    }
    let mut last = None;
    for &id in &team {
        last = Some(manager.vote_mission(key, id, true).await.unwrap());
    }
    last.unwrap()
}

#[tokio::test]
async fn test_matches_under_different_keys_are_independent() {
    let manager = MatchManager::new();
    started_match(&manager, 100).await;
    manager
        .create_match(200, humans_only(), 1, "host")
        .await
        .unwrap();

    assert_eq!(manager.view(100).await.unwrap().phase, Phase::TeamProposal);
    assert_eq!(manager.view(200).await.unwrap().phase, Phase::Lobby);

    let listed = manager.list_matches().await;
    let keys: HashSet<u64> = listed.iter().map(|m| m.key).collect();
    assert_eq!(keys, HashSet::from([100, 200]));
    assert!(listed.iter().all(|m| m.bot_count == 0));
}

#[tokio::test]
async fn test_concurrent_matches() {
    let manager = MatchManager::new();
    let mut handles = Vec::new();
    for key in 0..16u64 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            let config = MatchConfig {
                target_participant_count: 5 + (key as usize % 6),
                bot_difficulty: BotDifficulty::Easy,
                ..Default::default()
            };
            manager.create_match(key, config, 1, "host").await.unwrap();
            manager.start(key, 1).await.unwrap()
        }));
    }
    for handle in handles {
        let update = handle.await.unwrap();
        assert_eq!(update.view.phase, Phase::TeamProposal);
    }
    assert_eq!(manager.active_match_count().await, 16);
}

#[tokio::test]
async fn test_stale_ballot_after_tally() {
    let manager = MatchManager::new();
    let update = started_match(&manager, 7).await;
    let leader = update.view.leader.unwrap().id;

    manager.propose_team(7, leader, &[1, 2]).await.unwrap();
    for id in 1..=4 {
        let update = manager.vote_team(7, id, true).await.unwrap();
        assert_eq!(update.transition, None);
    }
    let update = manager.vote_team(7, 5, true).await.unwrap();
    assert_eq!(update.transition, Some(Phase::Mission));

    assert_eq!(
        manager.vote_team(7, 5, false).await,
        Err(RegistryError::Match(avalon::MatchError::WrongPhase(
            Phase::Mission
        )))
    );
}

#[tokio::test]
async fn test_finished_match_frees_the_key() {
    let manager = MatchManager::new();
    started_match(&manager, 9).await;

    // Five straight rejections end the match
    for _ in 0..5 {
        let view = manager.view(9).await.unwrap();
        let leader = view.leader.unwrap().id;
        manager.propose_team(9, leader, &[1, 2]).await.unwrap();
        for id in 1..=5 {
            manager.vote_team(9, id, false).await.unwrap();
        }
    }

    assert_eq!(
        manager.view(9).await,
        Err(RegistryError::MatchNotFound(9))
    );
    assert!(
        manager
            .create_match(9, humans_only(), 3, "next")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_finishing_update_carries_winner() {
    let manager = MatchManager::new();
    started_match(&manager, 11).await;

    play_clean_round(&manager, 11).await;
    play_clean_round(&manager, 11).await;
    let update = play_clean_round(&manager, 11).await;
    assert_eq!(update.transition, Some(Phase::Assassination));

    // Find the assassin by asking each seat for its role
    let mut assassin = None;
    for id in 1..=5 {
        let info = manager.role_info(11, id).await.unwrap();
        if info.role == avalon::Role::Assassin {
            assassin = Some(id);
        }
    }
    let assassin = assassin.unwrap();
    let target = if assassin == 1 { 2 } else { 1 };

    let update = manager.assassinate(11, assassin, target).await.unwrap();
    assert_eq!(update.transition, Some(Phase::Finished));
    assert!(update.view.winner.is_some());
    assert!(
        update
            .events
            .iter()
            .any(|e| matches!(e, avalon::GameEvent::GameOver(_)))
    );
    assert_eq!(manager.active_match_count().await, 0);
}

#[tokio::test]
async fn test_bots_play_to_the_end_around_a_human() {
    let manager = MatchManager::new();
    let config = MatchConfig {
        target_participant_count: 7,
        ..Default::default()
    };
    manager.create_match(5, config, 1, "human").await.unwrap();
    let mut update = manager.start(5, 1).await.unwrap();
    let me = manager.role_info(5, 1).await.unwrap();

    // The human approves everything, succeeds when good, and only leads,
    // votes, goes on missions or assassinates when asked.
    while update.view.phase != Phase::Finished {
        let view = &update.view;
        update = match view.phase {
            Phase::TeamProposal => {
                let size = view.required_mission_size.unwrap();
                let team: Vec<ParticipantId> =
                    view.participants.iter().take(size).map(|p| p.id).collect();
                manager.propose_team(5, 1, &team).await.unwrap()
            }
            Phase::TeamVoting => manager.vote_team(5, 1, true).await.unwrap(),
            Phase::Mission => manager.vote_mission(5, 1, true).await.unwrap(),
            Phase::Assassination => {
                let target = view.participants.iter().find(|p| p.id != 1).unwrap().id;
                manager.assassinate(5, 1, target).await.unwrap()
            }
            Phase::Lobby | Phase::Finished => unreachable!(),
        };
    }

    assert!(update.view.winner.is_some());
    assert!(me.role.team() == me.team);
    assert_eq!(manager.active_match_count().await, 0);
}

#[tokio::test]
async fn test_start_with_human_holding_a_bot_id() {
    let manager = MatchManager::new();
    let config = MatchConfig {
        target_participant_count: 5,
        ..Default::default()
    };
    manager.create_match(1, config, 10, "host").await.unwrap();
    manager.join(1, 1_000_001, "sly").await.unwrap();

    let update = manager.start(1, 10).await.unwrap();
    assert_ne!(update.view.phase, Phase::Lobby);
    assert_eq!(update.view.participants.len(), 5);

    let ids: HashSet<ParticipantId> = update.view.participants.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 5);
    assert!(ids.contains(&10));
    assert!(ids.contains(&1_000_001));
    assert!(manager.role_info(1, 1_000_001).await.is_ok());
}
