// Property tests for roster selection and scoring.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use dream_xi::draft::controller::{Participant, SelectionController};
use dream_xi::draft::player::{Player, PlayerId, Role};
use dream_xi::draft::pool::{DraftPool, Squad, TeamSide};
use dream_xi::draft::roster::{Roster, ROSTER_CAPACITY};
use dream_xi::scoring::{self, PointsFeed};

const SQUAD_SIZE: usize = 8;

fn pool() -> Arc<DraftPool> {
    let squad = |team: &str| {
        Squad::new(
            team,
            (0..SQUAD_SIZE)
                .map(|i| Player::new(format!("{team}{i}"), Role::ALL[i % 4], team))
                .collect(),
        )
    };
    Arc::new(DraftPool::load(squad("H"), squad("A")).unwrap())
}

/// A pick is (side, index into that squad).
fn picks() -> impl Strategy<Value = Vec<(bool, usize)>> {
    prop::collection::vec((any::<bool>(), 0..SQUAD_SIZE), 0..40)
}

fn player_for(pool: &DraftPool, (away, idx): (bool, usize)) -> (Player, TeamSide) {
    let side = if away { TeamSide::Away } else { TeamSide::Home };
    (pool.squad(side).players[idx].clone(), side)
}

fn all_points(pool: &DraftPool, values: &[i64]) -> PointsFeed {
    TeamSide::BOTH
        .iter()
        .flat_map(|side| pool.squad(*side).players.iter())
        .zip(values.iter().cycle())
        .map(|(p, v)| (PlayerId::new(p.name.clone(), p.country.clone()), *v))
        .collect()
}

proptest! {
    #[test]
    fn roster_never_exceeds_capacity_or_duplicates(seq in picks()) {
        let pool = pool();
        let mut roster = Roster::empty(Arc::clone(&pool));
        for pick in seq {
            let (player, side) = player_for(&pool, pick);
            let _ = roster.toggle(&player, side);

            prop_assert!(roster.size() <= ROSTER_CAPACITY);
            let distinct: HashSet<&Player> = roster.players().collect();
            prop_assert_eq!(distinct.len(), roster.size());
            for side in TeamSide::BOTH {
                for p in roster.bucket(side) {
                    prop_assert!(pool.contains(side, p));
                }
            }
        }
    }

    #[test]
    fn toggling_twice_restores_roster(seq in picks(), extra in (any::<bool>(), 0..SQUAD_SIZE)) {
        let pool = pool();
        let mut roster = Roster::empty(Arc::clone(&pool));
        for pick in seq {
            let (player, side) = player_for(&pool, pick);
            let _ = roster.toggle(&player, side);
        }

        let before = roster.clone();
        let (player, side) = player_for(&pool, extra);
        if roster.toggle(&player, side).is_ok() {
            roster.toggle(&player, side).unwrap();
        }
        // Same players in the same order, whether the first toggle added or removed
        prop_assert_eq!(roster.snapshot(), before.snapshot());
        prop_assert_eq!(roster, before);
    }

    #[test]
    fn swapping_rosters_negates_difference(
        first in picks(),
        second in picks(),
        values in prop::collection::vec(-50i64..150, 1..16),
    ) {
        let pool = pool();
        let mut one = SelectionController::new(Participant::One, Arc::clone(&pool));
        let mut two = SelectionController::new(Participant::Two, Arc::clone(&pool));
        for pick in first {
            let _ = one.select(&player_for(&pool, pick).0);
        }
        for pick in second {
            let _ = two.select(&player_for(&pool, pick).0);
        }
        let feed = all_points(&pool, &values);

        let forward = scoring::score(one.roster(), two.roster(), &feed).unwrap();
        let backward = scoring::score(two.roster(), one.roster(), &feed).unwrap();
        prop_assert_eq!(forward.difference, -backward.difference);
        prop_assert_eq!(forward.team_totals[0], backward.team_totals[1]);
        prop_assert_eq!(forward.difference, forward.team_totals[0] - forward.team_totals[1]);

        let again = scoring::score(one.roster(), two.roster(), &feed).unwrap();
        prop_assert_eq!(forward, again);
    }
}
