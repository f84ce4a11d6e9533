//! Static rule tables keyed by participant count.

/// Fewest participants a match can start with.
pub const MIN_PARTICIPANTS: usize = 5;

/// Most participants a match can seat.
pub const MAX_PARTICIPANTS: usize = 10;

/// Number of missions on the mission track.
pub const NUM_MISSIONS: usize = 5;

/// Succeeded or failed missions needed to decide the mission track.
pub const MISSIONS_TO_WIN: usize = 3;

/// Consecutive rejected proposals that hand evil the win.
pub const MAX_REJECTIONS: usize = 5;

/// Good/evil split, indexed by `participants - MIN_PARTICIPANTS`.
const TEAM_SPLITS: [(usize, usize); 6] = [(3, 2), (4, 2), (4, 3), (5, 3), (6, 3), (6, 4)];

/// Mission team sizes, indexed by `participants - MIN_PARTICIPANTS`.
const MISSION_SIZES: [[usize; NUM_MISSIONS]; 6] = [
    [2, 3, 2, 3, 3],
    [2, 3, 4, 3, 4],
    [2, 3, 3, 4, 4],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
];

/// Mission (1-based) that needs two sabotage ballots to fail.
const DOUBLE_FAIL_MISSION: usize = 4;

/// Smallest participant count that plays a double-fail mission.
const DOUBLE_FAIL_MIN_PARTICIPANTS: usize = 7;

fn table_index(participants: usize) -> Option<usize> {
    (MIN_PARTICIPANTS..=MAX_PARTICIPANTS)
        .contains(&participants)
        .then(|| participants - MIN_PARTICIPANTS)
}

/// `(good, evil)` counts for a match of `participants`.
#[must_use]
pub fn team_split(participants: usize) -> Option<(usize, usize)> {
    table_index(participants).map(|idx| TEAM_SPLITS[idx])
}

/// Team size for the 1-based `round` of a match of `participants`.
#[must_use]
pub fn mission_size(participants: usize, round: usize) -> Option<usize> {
    let idx = table_index(participants)?;
    MISSION_SIZES[idx].get(round.checked_sub(1)?).copied()
}

/// Sabotage ballots needed to fail the 1-based `round`.
#[must_use]
pub fn required_fails(participants: usize, round: usize) -> usize {
    if participants >= DOUBLE_FAIL_MIN_PARTICIPANTS && round == DOUBLE_FAIL_MISSION {
        2
    } else {
        1
    }
}
