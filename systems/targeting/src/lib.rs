#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Targeting strategies that decide where the vehicle travels and when it fires.
//!
//! A [`Strategy`] is a lazy, pull-based sequence of [`Action`] values. The
//! drive loop requests one action at a time and hands over fresh views of the
//! live targets and projectiles, so adaptive strategies can react to what has
//! already been destroyed while fixed plans simply ignore the views.

mod plan;
mod random;

use std::{fmt, str::FromStr};

use space_shooter_core::{Action, ContributionGrid, ProjectileView, TargetView};
use thiserror::Error;

pub use crate::{
    plan::{ColumnScan, RowScan},
    random::RandomHunt,
};

/// Policy producing a finite sequence of move and fire actions.
///
/// Implementations must eventually return `None`, and every live target must
/// have been fired upon at least as many times as its health by then.
pub trait Strategy {
    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Produces the next action, or `None` once the plan is exhausted.
    fn next_action(&mut self, targets: &TargetView, projectiles: &ProjectileView)
        -> Option<Action>;
}

/// Built-in strategy variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Sweeps columns left to right.
    Column,
    /// Sweeps rows from the bottom up.
    Row,
    /// Hunts randomly chosen occupied columns.
    Random,
}

impl StrategyKind {
    /// Every built-in strategy, in display order.
    pub const ALL: [StrategyKind; 3] = [Self::Column, Self::Row, Self::Random];

    /// Identifier accepted by [`FromStr`] and produced by [`fmt::Display`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Row => "row",
            Self::Random => "random",
        }
    }

    /// Instantiates the strategy for the provided initial grid.
    ///
    /// `seed` only affects [`StrategyKind::Random`].
    #[must_use]
    pub fn build(self, grid: &ContributionGrid, seed: u64) -> Box<dyn Strategy> {
        match self {
            Self::Column => Box::new(ColumnScan::new(grid)),
            Self::Row => Box::new(RowScan::new(grid)),
            Self::Random => Box::new(RandomHunt::new(seed)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown strategy `{0}` (expected column, row or random)")]
pub struct UnknownStrategy(String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownStrategy(value.to_owned()))
    }
}
