#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drive loop that turns a strategy's actions into a sequence of frames.
//!
//! The animator owns the simulation clock: it is the only caller of
//! [`Command::AdvanceFrame`], and it captures an immutable [`FrameSnapshot`]
//! after every frame it advances. Rendering happens afterwards against those
//! snapshots, never against the live world.

use std::time::Duration;

use serde::Deserialize;
use space_shooter_core::{Action, Command, CommandError, Event, FrameSnapshot};
use space_shooter_system_analytics::{Analytics, RunStats};
use space_shooter_system_targeting::Strategy;
use space_shooter_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, info, info_span};

/// Tuning knobs for the drive loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Identical frames appended once every target is destroyed.
    pub final_frames: u32,
    /// Display duration of each frame in milliseconds.
    pub frame_duration_ms: u64,
    /// Hard cap on simulated frames before the run is abandoned.
    pub max_frames: u64,
}

impl AnimatorConfig {
    /// Display duration of each frame.
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_duration_ms)
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            final_frames: 5,
            frame_duration_ms: 20,
            max_frames: 100_000,
        }
    }
}

/// Frames and statistics produced by a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    /// Snapshots in display order, starting with the initial state.
    pub frames: Vec<FrameSnapshot>,
    /// Display duration of each frame.
    pub frame_duration: Duration,
    /// Counters gathered while simulating.
    pub stats: RunStats,
}

/// Failures that abort a run.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AnimatorError {
    /// The strategy produced an action the world rejected.
    #[error("strategy `{strategy}` issued a rejected command")]
    Rejected {
        /// Name of the strategy that produced the action.
        strategy: &'static str,
        /// Rejection reported by the world.
        #[source]
        source: CommandError,
    },
    /// The run did not clear every target within the frame budget.
    #[error("no completion after {limit} frames, {remaining} targets left")]
    FrameBudgetExceeded {
        /// Configured frame budget.
        limit: u64,
        /// Targets still alive when the budget ran out.
        remaining: usize,
    },
}

/// Drive loop that applies strategy actions to a world.
#[derive(Debug, Default)]
pub struct Animator {
    config: AnimatorConfig,
    analytics: Analytics,
    events: Vec<Event>,
    frames: Vec<FrameSnapshot>,
}

impl Animator {
    /// Creates a drive loop with the provided configuration.
    #[must_use]
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Runs `strategy` against `world` until every target is destroyed.
    ///
    /// The returned animation starts with the initial state, contains one
    /// frame per simulated frame, and ends with
    /// [`AnimatorConfig::final_frames`] copies of the final state.
    pub fn run(
        mut self,
        world: &mut World,
        strategy: &mut dyn Strategy,
    ) -> Result<Animation, AnimatorError> {
        let span = info_span!("animate", strategy = strategy.name());
        let _guard = span.enter();
        info!(
            targets = query::target_view(world).len(),
            "animation started"
        );

        self.frames.push(query::frame_snapshot(world));

        loop {
            let targets = query::target_view(world);
            let projectiles = query::projectile_view(world);
            let Some(action) = strategy.next_action(&targets, &projectiles) else {
                break;
            };
            self.execute(world, action, strategy.name())?;
        }

        debug!(
            in_flight = query::projectile_view(world).len(),
            "strategy exhausted, draining projectiles"
        );
        while !query::is_complete(world) {
            self.advance(world)?;
        }

        let last = query::frame_snapshot(world);
        for _ in 0..self.config.final_frames {
            self.frames.push(last.clone());
        }

        let stats = self.analytics.report();
        info!(
            frames = self.frames.len(),
            shots = stats.shots_fired,
            destroyed = stats.targets_destroyed,
            "animation finished"
        );

        Ok(Animation {
            frames: self.frames,
            frame_duration: self.config.frame_duration(),
            stats,
        })
    }

    /// Travels to the action's column, then waits out the cooldown and fires.
    fn execute(
        &mut self,
        world: &mut World,
        action: Action,
        strategy: &'static str,
    ) -> Result<(), AnimatorError> {
        self.submit(
            world,
            Command::RequestMove {
                column: action.column,
            },
        )
        .map_err(|source| AnimatorError::Rejected { strategy, source })?;

        while !query::is_vehicle_idle(world) {
            self.advance(world)?;
        }

        if action.fire {
            while !query::can_fire(world) {
                self.advance(world)?;
            }
            self.submit(world, Command::Fire)
                .map_err(|source| AnimatorError::Rejected { strategy, source })?;
            self.advance(world)?;
        }

        Ok(())
    }

    fn advance(&mut self, world: &mut World) -> Result<(), AnimatorError> {
        if query::frame_index(world) >= self.config.max_frames {
            return Err(AnimatorError::FrameBudgetExceeded {
                limit: self.config.max_frames,
                remaining: query::target_view(world).len(),
            });
        }

        self.submit(world, Command::AdvanceFrame)
            .map_err(|source| AnimatorError::Rejected {
                strategy: "animator",
                source,
            })?;
        self.frames.push(query::frame_snapshot(world));
        Ok(())
    }

    fn submit(&mut self, world: &mut World, command: Command) -> Result<(), CommandError> {
        self.events.clear();
        let result = world::apply(world, command, &mut self.events);
        self.analytics.handle(&self.events);
        result
    }
}
