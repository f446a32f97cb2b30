#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that folds world events into run statistics.

use serde::Serialize;
use space_shooter_core::Event;

/// Aggregate counters describing a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RunStats {
    /// Frames simulated.
    pub frames: u64,
    /// Projectiles launched by the vehicle.
    pub shots_fired: u32,
    /// Fire commands ignored because of the cooldown.
    pub fires_suppressed: u32,
    /// Hits that left the target alive.
    pub hits: u32,
    /// Targets destroyed.
    pub targets_destroyed: u32,
    /// Projectiles that left the grid without hitting anything.
    pub projectiles_expired: u32,
}

impl RunStats {
    /// Shots that struck a target, whether or not it survived.
    #[must_use]
    pub const fn landed_shots(&self) -> u32 {
        self.hits + self.targets_destroyed
    }
}

/// Pure analytics system that accumulates statistics from event batches.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: RunStats,
}

impl Analytics {
    /// Creates a new analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a batch of world events into the running totals.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            let stats = &mut self.stats;
            match event {
                Event::FrameAdvanced { frame } => stats.frames = *frame,
                Event::ProjectileFired { .. } => stats.shots_fired += 1,
                Event::FireSuppressed { .. } => stats.fires_suppressed += 1,
                Event::TargetHit { .. } => stats.hits += 1,
                Event::TargetDestroyed { .. } => stats.targets_destroyed += 1,
                Event::ProjectileExpired { .. } => stats.projectiles_expired += 1,
                Event::VehicleRetargeted { .. } => {}
            }
        }
    }

    /// Returns the statistics gathered so far.
    #[must_use]
    pub fn report(&self) -> RunStats {
        self.stats
    }
}
