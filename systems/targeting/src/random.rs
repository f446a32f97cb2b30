//! Adaptive strategy that hunts randomly chosen columns.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use space_shooter_core::{Action, ProjectileView, TargetView};
use tracing::debug;

use crate::Strategy;

/// Picks a random column that still needs shots and clears its lowest target.
///
/// Every refill reads the live views. Projectiles already travelling up a
/// column are counted against that column's targets from the bottom up, so a
/// target is never fired upon more often than its remaining health.
#[derive(Clone, Debug)]
pub struct RandomHunt {
    rng: ChaCha8Rng,
    pending: VecDeque<Action>,
}

impl RandomHunt {
    /// Creates a hunt whose column choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: VecDeque::new(),
        }
    }

    fn refill(&mut self, targets: &TargetView, projectiles: &ProjectileView) {
        let candidates: Vec<(u32, u8)> = targets
            .occupied_columns()
            .into_iter()
            .filter_map(|column| {
                unclaimed_health(targets, projectiles, column).map(|health| (column, health))
            })
            .collect();

        let Some(&(column, health)) = candidates.choose(&mut self.rng) else {
            return;
        };

        debug!(
            column,
            shots = health,
            candidates = candidates.len(),
            "random hunt picked column"
        );
        self.pending
            .extend((0..health).map(|_| Action::fire_at(column)));
    }
}

impl Strategy for RandomHunt {
    fn name(&self) -> &'static str {
        "random"
    }

    fn next_action(
        &mut self,
        targets: &TargetView,
        projectiles: &ProjectileView,
    ) -> Option<Action> {
        if self.pending.is_empty() {
            self.refill(targets, projectiles);
        }
        self.pending.pop_front()
    }
}

/// Health of the lowest target in `column` not yet covered by projectiles in flight.
fn unclaimed_health(targets: &TargetView, projectiles: &ProjectileView, column: u32) -> Option<u8> {
    let mut in_flight = projectiles.count_in_column(column);
    let mut column_targets: Vec<_> = targets.in_column(column).collect();
    column_targets.sort_by_key(|target| std::cmp::Reverse(target.cell.row()));

    for target in column_targets {
        let health = usize::from(target.health.get());
        if in_flight >= health {
            in_flight -= health;
            continue;
        }
        return u8::try_from(health - in_flight).ok();
    }

    None
}
