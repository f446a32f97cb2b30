//! Fixed plans computed once from the initial grid.

use space_shooter_core::{
    Action, CellCoord, ContributionGrid, ProjectileView, TargetView, NUM_DAYS, NUM_WEEKS,
};
use tracing::debug;

use crate::Strategy;

/// Visits columns left to right, emptying each before moving on.
///
/// Within a column, targets are cleared bottom-up so that every shot lands on
/// the target it was planned for. Columns without targets are skipped.
#[derive(Clone, Debug)]
pub struct ColumnScan {
    plan: FixedPlan,
}

impl ColumnScan {
    /// Plans the sweep for the provided grid.
    #[must_use]
    pub fn new(grid: &ContributionGrid) -> Self {
        let mut actions = Vec::new();
        for column in 0..NUM_WEEKS {
            for row in (0..NUM_DAYS).rev() {
                push_shots(&mut actions, grid, CellCoord::new(column, row));
            }
        }

        Self {
            plan: FixedPlan::new("column", actions),
        }
    }
}

impl Strategy for ColumnScan {
    fn name(&self) -> &'static str {
        self.plan.name
    }

    fn next_action(&mut self, _: &TargetView, _: &ProjectileView) -> Option<Action> {
        self.plan.next()
    }
}

/// Visits rows bottom-up, sweeping each row in alternating directions.
#[derive(Clone, Debug)]
pub struct RowScan {
    plan: FixedPlan,
}

impl RowScan {
    /// Plans the sweep for the provided grid.
    #[must_use]
    pub fn new(grid: &ContributionGrid) -> Self {
        let mut actions = Vec::new();
        for (pass, row) in (0..NUM_DAYS).rev().enumerate() {
            let mut columns: Vec<u32> = (0..NUM_WEEKS).collect();
            if pass % 2 == 1 {
                columns.reverse();
            }

            for column in columns {
                push_shots(&mut actions, grid, CellCoord::new(column, row));
            }
        }

        Self {
            plan: FixedPlan::new("row", actions),
        }
    }
}

impl Strategy for RowScan {
    fn name(&self) -> &'static str {
        self.plan.name
    }

    fn next_action(&mut self, _: &TargetView, _: &ProjectileView) -> Option<Action> {
        self.plan.next()
    }
}

fn push_shots(actions: &mut Vec<Action>, grid: &ContributionGrid, cell: CellCoord) {
    let level = grid.level(cell).unwrap_or(0);
    actions.extend((0..level).map(|_| Action::fire_at(cell.column())));
}

#[derive(Clone, Debug)]
struct FixedPlan {
    name: &'static str,
    actions: std::vec::IntoIter<Action>,
}

impl FixedPlan {
    fn new(name: &'static str, actions: Vec<Action>) -> Self {
        debug!(strategy = name, actions = actions.len(), "fixed plan prepared");
        Self {
            name,
            actions: actions.into_iter(),
        }
    }

    fn next(&mut self) -> Option<Action> {
        self.actions.next()
    }
}
