//! Targets, projectiles, and the collision rule that connects them.

use space_shooter_core::{
    CellCoord, Health, ProjectileSnapshot, TargetSnapshot, PROJECTILE_STEP, VEHICLE_LANE_ROW,
};

/// Row above which a projectile is considered gone for good.
const PROJECTILE_EXPIRY_ROW: f32 = -1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Target {
    cell: CellCoord,
    health: Health,
}

impl Target {
    pub(crate) fn new(cell: CellCoord, health: Health) -> Self {
        Self { cell, health }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Removes one point of health and returns what is left.
    pub(crate) fn absorb_hit(&mut self) -> Health {
        self.health = self.health.after_hit();
        self.health
    }

    pub(crate) fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            cell: self.cell,
            health: self.health,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Projectile {
    column: u32,
    row: f32,
}

impl Projectile {
    /// Spawns a projectile on the row just above the vehicle lane.
    pub(crate) fn launch(column: u32) -> Self {
        Self {
            column,
            row: (VEHICLE_LANE_ROW - 1) as f32,
        }
    }

    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    pub(crate) fn advance(&mut self) {
        self.row -= PROJECTILE_STEP;
    }

    /// Shares the target's column and has reached or passed its row.
    pub(crate) fn reaches(&self, target: &Target) -> bool {
        self.column == target.cell.column() && target.cell.row() as f32 >= self.row
    }

    pub(crate) fn has_left_grid(&self) -> bool {
        self.row < PROJECTILE_EXPIRY_ROW
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            column: self.column,
            row: self.row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_reaches_target_only_in_same_column() {
        let target = Target::new(CellCoord::new(4, 6), Health::new(2));
        let mut projectile = Projectile::launch(4);
        let stray = Projectile::launch(5);

        assert!(!projectile.reaches(&target));
        while projectile.snapshot().row > 6.0 {
            projectile.advance();
        }

        assert!(projectile.reaches(&target));
        assert!(!stray.reaches(&target));
    }

    #[test]
    fn absorb_hit_counts_down_health() {
        let mut target = Target::new(CellCoord::new(0, 0), Health::new(2));
        assert_eq!(target.absorb_hit(), Health::new(1));
        assert!(target.absorb_hit().is_depleted());
    }

    #[test]
    fn projectile_leaves_grid_after_climbing_past_top_row() {
        let mut projectile = Projectile::launch(0);
        let mut frames = 0;
        while !projectile.has_left_grid() {
            projectile.advance();
            frames += 1;
        }

        assert!(frames > 60);
        assert!(projectile.snapshot().row < PROJECTILE_EXPIRY_ROW);
    }
}
