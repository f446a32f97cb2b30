#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the space shooter.
//!
//! The [`World`] is the sole owner of every live entity. Entities expose pure
//! state transitions; removal of destroyed targets and spent projectiles is
//! decided and performed here, never by the entities themselves.

mod combat;
mod vehicle;

use space_shooter_core::{Command, CommandError, ContributionGrid, Event, NUM_WEEKS};
use tracing::{debug, trace, warn};

use crate::{
    combat::{Projectile, Target},
    vehicle::Vehicle,
};

/// Represents the authoritative space shooter world state.
#[derive(Clone, Debug)]
pub struct World {
    targets: Vec<Target>,
    projectiles: Vec<Projectile>,
    vehicle: Vehicle,
    frame_index: u64,
}

impl World {
    /// Creates a world with one target per nonzero cell of the grid.
    ///
    /// Targets are created in row-major order with health equal to the cell's
    /// intensity. The vehicle starts parked at its start column.
    #[must_use]
    pub fn new(grid: &ContributionGrid) -> Self {
        let targets: Vec<Target> = grid
            .nonzero_cells()
            .map(|(cell, health)| Target::new(cell, health))
            .collect();
        debug!(targets = targets.len(), "world initialised");

        Self {
            targets,
            projectiles: Vec::new(),
            vehicle: Vehicle::parked(),
            frame_index: 0,
        }
    }

    fn fire(&mut self, out_events: &mut Vec<Event>) {
        if !self.vehicle.can_fire() {
            out_events.push(Event::FireSuppressed {
                cooldown: self.vehicle.cooldown(),
            });
            return;
        }

        let column = self.vehicle.fire_column();
        self.projectiles.push(Projectile::launch(column));
        self.vehicle.arm();
        out_events.push(Event::ProjectileFired { column });
    }

    fn advance_frame(&mut self, out_events: &mut Vec<Event>) {
        self.vehicle.advance();
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
        self.resolve_collisions(out_events);

        self.frame_index = self.frame_index.saturating_add(1);
        trace!(
            frame = self.frame_index,
            targets = self.targets.len(),
            projectiles = self.projectiles.len(),
            "frame advanced"
        );
        out_events.push(Event::FrameAdvanced {
            frame: self.frame_index,
        });
    }

    /// Each projectile strikes at most one target: the first live target in
    /// row-major order that it has reached.
    fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        let targets = &mut self.targets;
        self.projectiles.retain(|projectile| {
            if let Some(index) = targets.iter().position(|target| projectile.reaches(target)) {
                strike(targets, index, out_events);
                return false;
            }

            if projectile.has_left_grid() {
                warn!(column = projectile.column(), "projectile expired without a hit");
                out_events.push(Event::ProjectileExpired {
                    column: projectile.column(),
                });
                return false;
            }

            true
        });
    }
}

fn strike(targets: &mut Vec<Target>, index: usize, out_events: &mut Vec<Event>) {
    let remaining = targets[index].absorb_hit();
    if remaining.is_depleted() {
        let destroyed = targets.remove(index);
        let cell = destroyed.cell();
        debug!(
            column = cell.column(),
            row = cell.row(),
            remaining_targets = targets.len(),
            "target destroyed"
        );
        out_events.push(Event::TargetDestroyed { cell });
    } else {
        out_events.push(Event::TargetHit {
            cell: targets[index].cell(),
            remaining,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Move requests outside the grid are rejected without touching the world.
/// Fire commands issued during the cooldown are ignored and reported through
/// [`Event::FireSuppressed`].
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    match command {
        Command::RequestMove { column } => {
            if column >= NUM_WEEKS {
                return Err(CommandError::ColumnOutOfRange { column });
            }
            world.vehicle.retarget(column);
            out_events.push(Event::VehicleRetargeted { column });
        }
        Command::Fire => world.fire(out_events),
        Command::AdvanceFrame => world.advance_frame(out_events),
    }

    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use space_shooter_core::{FrameSnapshot, ProjectileView, TargetView, VehicleSnapshot};

    use super::World;

    /// Captures the vehicle's position, destination, and cooldown.
    #[must_use]
    pub fn vehicle(world: &World) -> VehicleSnapshot {
        world.vehicle.snapshot()
    }

    /// Reports whether the vehicle sits exactly on its destination column.
    #[must_use]
    pub fn is_vehicle_idle(world: &World) -> bool {
        world.vehicle.is_idle()
    }

    /// Reports whether a fire command would currently launch a projectile.
    #[must_use]
    pub fn can_fire(world: &World) -> bool {
        world.vehicle.can_fire()
    }

    /// Reports whether every target has been destroyed.
    #[must_use]
    pub fn is_complete(world: &World) -> bool {
        world.targets.is_empty()
    }

    /// Number of frames simulated so far.
    #[must_use]
    pub fn frame_index(world: &World) -> u64 {
        world.frame_index
    }

    /// Captures a read-only view of the live targets.
    #[must_use]
    pub fn target_view(world: &World) -> TargetView {
        TargetView::from_snapshots(world.targets.iter().map(|target| target.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures everything a renderer needs to draw the current frame.
    #[must_use]
    pub fn frame_snapshot(world: &World) -> FrameSnapshot {
        FrameSnapshot {
            frame: world.frame_index,
            vehicle: vehicle(world),
            targets: target_view(world).into_vec(),
            projectiles: projectile_view(world).into_vec(),
        }
    }
}
