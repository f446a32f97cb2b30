//! Vehicle state and its per-frame movement rules.

use space_shooter_core::{VehicleSnapshot, FIRE_COOLDOWN_FRAMES, VEHICLE_START_COLUMN, VEHICLE_STEP};

/// Single vehicle travelling along the lane beneath the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vehicle {
    position: f32,
    target_column: u32,
    cooldown: u32,
}

impl Vehicle {
    pub(crate) fn parked() -> Self {
        Self {
            position: VEHICLE_START_COLUMN as f32,
            target_column: VEHICLE_START_COLUMN,
            cooldown: 0,
        }
    }

    pub(crate) fn retarget(&mut self, column: u32) {
        self.target_column = column;
    }

    /// Steps toward the target column, clamping on arrival, and ticks the cooldown.
    pub(crate) fn advance(&mut self) {
        let target = self.target_column as f32;
        if self.position < target {
            self.position = (self.position + VEHICLE_STEP).min(target);
        } else if self.position > target {
            self.position = (self.position - VEHICLE_STEP).max(target);
        }

        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.position == self.target_column as f32
    }

    pub(crate) fn can_fire(&self) -> bool {
        self.cooldown == 0
    }

    pub(crate) fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub(crate) fn fire_column(&self) -> u32 {
        self.position.round() as u32
    }

    pub(crate) fn arm(&mut self) {
        self.cooldown = FIRE_COOLDOWN_FRAMES;
    }

    pub(crate) fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            position: self.position,
            target_column: self.target_column,
            cooldown: self.cooldown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_converges_exactly_on_target() {
        let mut vehicle = Vehicle::parked();
        vehicle.retarget(VEHICLE_START_COLUMN + 3);

        let mut frames = 0;
        while !vehicle.is_idle() {
            vehicle.advance();
            frames += 1;
            assert!(frames <= 12, "vehicle failed to arrive");
        }

        assert_eq!(frames, 12);
        assert_eq!(vehicle.snapshot().position, (VEHICLE_START_COLUMN + 3) as f32);
    }

    #[test]
    fn advance_moves_left_toward_lower_columns() {
        let mut vehicle = Vehicle::parked();
        vehicle.retarget(0);
        vehicle.advance();

        assert_eq!(
            vehicle.snapshot().position,
            VEHICLE_START_COLUMN as f32 - VEHICLE_STEP
        );
    }

    #[test]
    fn cooldown_ticks_down_to_zero() {
        let mut vehicle = Vehicle::parked();
        vehicle.arm();
        assert!(!vehicle.can_fire());

        for _ in 0..FIRE_COOLDOWN_FRAMES {
            vehicle.advance();
        }

        assert!(vehicle.can_fire());
        vehicle.advance();
        assert_eq!(vehicle.cooldown(), 0);
    }
}
