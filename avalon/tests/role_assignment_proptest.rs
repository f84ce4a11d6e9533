/// Property-based tests for role assignment and disclosure using proptest
///
/// These tests verify the role split and what each role is told across
/// every supported participant count and many shuffles.
use avalon::{
    Match, Role, Team,
    constants::team_split,
    entities::ParticipantId,
    game::Disclosure,
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashSet;

fn started(n: usize, seed: u64) -> Match {
    let mut game = Match::new();
    for id in 1..=n as u64 {
        game.add_participant(id, &format!("p{id}")).unwrap();
    }
    game.assign_roles_with(&mut StdRng::seed_from_u64(seed))
        .unwrap();
    game
}

fn holder(game: &Match, role: Role) -> Option<ParticipantId> {
    game.participants()
        .iter()
        .find(|p| p.role == Some(role))
        .map(|p| p.id)
}

proptest! {
    #[test]
    fn test_split_matches_table(n in 5usize..=10, seed in any::<u64>()) {
        let game = started(n, seed);
        let (good, evil) = team_split(n).unwrap();

        let evil_count = game.participants().iter().filter(|p| p.is_evil()).count();
        let good_count = game.participants().iter().filter(|p| p.is_good()).count();
        prop_assert_eq!(good_count, good);
        prop_assert_eq!(evil_count, evil);

        let count = |role| game.participants().iter().filter(|p| p.role == Some(role)).count();
        prop_assert_eq!(count(Role::Merlin), 1);
        prop_assert_eq!(count(Role::Assassin), 1);
        prop_assert_eq!(count(Role::Percival), usize::from(n >= 7));
        prop_assert_eq!(count(Role::Morgana), usize::from(n >= 7));
        prop_assert_eq!(count(Role::Mordred), usize::from(n >= 8));
    }

    #[test]
    fn test_merlin_sees_evil_except_mordred(n in 5usize..=10, seed in any::<u64>()) {
        let game = started(n, seed);
        let merlin = holder(&game, Role::Merlin).unwrap();
        let info = game.role_info(merlin).unwrap();
        prop_assert_eq!(info.team, Team::Good);

        let Disclosure::KnownEvil(seen) = info.disclosure else {
            return Err(TestCaseError::fail("Merlin must see evil"));
        };
        let seen: HashSet<ParticipantId> = seen.iter().map(|p| p.id).collect();
        let expected: HashSet<ParticipantId> = game
            .participants()
            .iter()
            .filter(|p| p.is_evil() && p.role != Some(Role::Mordred))
            .map(|p| p.id)
            .collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn test_percival_pair(n in 7usize..=10, seed in any::<u64>()) {
        let game = started(n, seed);
        let percival = holder(&game, Role::Percival).unwrap();
        let Disclosure::MerlinCandidates(pair) = game.role_info(percival).unwrap().disclosure else {
            return Err(TestCaseError::fail("Percival must see candidates"));
        };
        let pair: HashSet<ParticipantId> = pair.iter().map(|p| p.id).collect();
        let expected: HashSet<ParticipantId> = [Role::Merlin, Role::Morgana]
            .into_iter()
            .filter_map(|role| holder(&game, role))
            .collect();
        prop_assert_eq!(pair, expected);
    }

    #[test]
    fn test_evil_know_each_other(n in 5usize..=10, seed in any::<u64>()) {
        let game = started(n, seed);
        let evil: HashSet<ParticipantId> = game
            .participants()
            .iter()
            .filter(|p| p.is_evil())
            .map(|p| p.id)
            .collect();

        for &id in &evil {
            let info = game.role_info(id).unwrap();
            let known: HashSet<ParticipantId> = info.known_evil_ids().into_iter().collect();
            let mut others = evil.clone();
            others.remove(&id);
            prop_assert_eq!(known, others);
        }
    }

    #[test]
    fn test_servants_see_nothing(n in 5usize..=10, seed in any::<u64>()) {
        let game = started(n, seed);
        for p in game.participants().iter().filter(|p| p.role == Some(Role::Servant)) {
            prop_assert_eq!(game.role_info(p.id).unwrap().disclosure, Disclosure::Nothing);
        }
    }

    #[test]
    fn test_out_of_range_counts_cannot_start(n in 0usize..5) {
        let mut game = Match::new();
        for id in 0..n as u64 {
            game.add_participant(id, "p").unwrap();
        }
        prop_assert!(!game.can_start());
        prop_assert!(game.assign_roles().is_err());
        prop_assert!(game.participants().iter().all(|p| p.role.is_none()));
    }
}
