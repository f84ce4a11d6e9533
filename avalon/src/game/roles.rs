//! Role table and random role assignment.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{self, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use super::entities::Team;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Role {
    Merlin,
    Percival,
    Servant,
    Assassin,
    Morgana,
    Mordred,
    Minion,
}

/// Fixed per-role data.
struct RoleEntry {
    team: Team,
    name: &'static str,
    description: &'static str,
}

const fn entry(role: Role) -> RoleEntry {
    match role {
        Role::Merlin => RoleEntry {
            team: Team::Good,
            name: "Merlin",
            description: "You know the Minions of Mordred, except Mordred himself. \
                          Guide the good team without revealing yourself to the Assassin.",
        },
        Role::Percival => RoleEntry {
            team: Team::Good,
            name: "Percival",
            description: "You see Merlin and Morgana but cannot tell which is which. \
                          Protect Merlin.",
        },
        Role::Servant => RoleEntry {
            team: Team::Good,
            name: "Servant of Arthur",
            description: "You are a loyal Servant of Arthur. \
                          Help the good team complete three missions.",
        },
        Role::Assassin => RoleEntry {
            team: Team::Evil,
            name: "Assassin",
            description: "Sabotage missions with your fellow Minions. If good completes \
                          three missions you get one chance to assassinate Merlin.",
        },
        Role::Morgana => RoleEntry {
            team: Team::Evil,
            name: "Morgana",
            description: "You appear as Merlin to Percival. \
                          Sabotage missions and deceive the good team.",
        },
        Role::Mordred => RoleEntry {
            team: Team::Evil,
            name: "Mordred",
            description: "You are hidden from Merlin's sight. \
                          Sabotage missions with your fellow Minions.",
        },
        Role::Minion => RoleEntry {
            team: Team::Evil,
            name: "Minion of Mordred",
            description: "Sabotage missions with your fellow Minions \
                          and keep the good team from succeeding.",
        },
    }
}

impl Role {
    pub const fn team(self) -> Team {
        entry(self).team
    }

    pub const fn name(self) -> &'static str {
        entry(self).name
    }

    pub const fn description(self) -> &'static str {
        entry(self).description
    }

    pub const fn is_evil(self) -> bool {
        matches!(self.team(), Team::Evil)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Builds the unshuffled role pool for `participants` players.
///
/// Merlin and the Assassin are always present, Percival and Morgana join
/// from 7 players and Mordred from 8. Remaining seats are filled with
/// Servants and Minions so the alignment split matches the table.
#[must_use]
pub fn role_pool(participants: usize) -> Option<Vec<Role>> {
    let (good, evil) = constants::team_split(participants)?;

    let mut pool = vec![Role::Merlin, Role::Assassin];
    if participants >= 7 {
        pool.extend([Role::Percival, Role::Morgana]);
    }
    if participants >= 8 {
        pool.push(Role::Mordred);
    }

    let special_good = pool.iter().filter(|role| !role.is_evil()).count();
    let special_evil = pool.len() - special_good;
    pool.extend(std::iter::repeat_n(Role::Servant, good - special_good));
    pool.extend(std::iter::repeat_n(Role::Minion, evil - special_evil));
    Some(pool)
}

/// Deals a shuffled role pool onto a shuffled seating order.
///
/// Returns `(seat index, role)` pairs covering every seat exactly once,
/// or `None` if `participants` is outside the supported range.
pub fn deal_roles<R: Rng + ?Sized>(participants: usize, rng: &mut R) -> Option<Vec<(usize, Role)>> {
    if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&participants) {
        return None;
    }
    let mut pool = role_pool(participants)?;
    pool.shuffle(rng);

    let mut seats: Vec<usize> = (0..participants).collect();
    seats.shuffle(rng);

    Some(seats.into_iter().zip(pool).collect())
}
