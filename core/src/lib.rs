#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the space shooter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then appends [`Event`] values describing what
//! happened. Systems read immutable views ([`TargetView`], [`ProjectileView`])
//! and respond with [`Action`] values that the drive loop turns back into
//! commands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of week columns in a contribution graph.
pub const NUM_WEEKS: u32 = 52;

/// Number of day rows in a contribution graph.
pub const NUM_DAYS: u32 = 7;

/// Virtual row the vehicle travels along, below the bottom grid row.
pub const VEHICLE_LANE_ROW: u32 = NUM_DAYS + 3;

/// Column the vehicle occupies when a simulation starts.
pub const VEHICLE_START_COLUMN: u32 = 25;

/// Columns travelled by the vehicle per frame.
///
/// Must divide one column exactly so that the vehicle lands on integer
/// columns without drift.
pub const VEHICLE_STEP: f32 = 0.25;

/// Rows travelled upward by a projectile per frame.
pub const PROJECTILE_STEP: f32 = 0.15;

/// Frames the vehicle must wait after firing before it can fire again.
pub const FIRE_COOLDOWN_FRAMES: u32 = 8;

/// Highest intensity level a contribution cell can carry.
pub const MAX_INTENSITY: u8 = 4;

const NUM_DAYS_USIZE: usize = NUM_DAYS as usize;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Points the vehicle at a new column. The vehicle travels there over
    /// subsequent frames.
    RequestMove {
        /// Destination column, which must lie within `0..NUM_WEEKS`.
        column: u32,
    },
    /// Fires a projectile from the vehicle's rounded column unless the
    /// weapon is cooling down.
    Fire,
    /// Advances the simulation by exactly one frame.
    AdvanceFrame,
}

/// Events appended by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The vehicle accepted a new destination column.
    VehicleRetargeted {
        /// Column the vehicle now travels toward.
        column: u32,
    },
    /// A projectile left the vehicle.
    ProjectileFired {
        /// Column the projectile travels along.
        column: u32,
    },
    /// A fire command was ignored because the weapon was cooling down.
    FireSuppressed {
        /// Frames remaining before the vehicle can fire again.
        cooldown: u32,
    },
    /// The simulation clock advanced by one frame.
    FrameAdvanced {
        /// Index of the frame that just completed, starting at one.
        frame: u64,
    },
    /// A projectile struck a target that survived the hit.
    TargetHit {
        /// Cell occupied by the target.
        cell: CellCoord,
        /// Health left after the hit.
        remaining: Health,
    },
    /// A target lost its final point of health and left the live set.
    TargetDestroyed {
        /// Cell the target occupied.
        cell: CellCoord,
    },
    /// A projectile climbed past the top of the grid without hitting anything.
    ProjectileExpired {
        /// Column the projectile travelled along.
        column: u32,
    },
}

/// Reasons the world rejects a command.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The requested column lies outside the contribution grid.
    #[error("column {column} lies outside the grid of {} columns", NUM_WEEKS)]
    ColumnOutOfRange {
        /// Column supplied by the caller.
        column: u32,
    },
}

/// Reasons a contribution grid fails validation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The grid does not contain exactly [`NUM_WEEKS`] columns.
    #[error("expected {} columns, found {found}", NUM_WEEKS)]
    ColumnCount {
        /// Number of columns supplied.
        found: usize,
    },
    /// A column does not contain exactly [`NUM_DAYS`] rows.
    #[error("column {column} has {found} rows, expected {}", NUM_DAYS)]
    RowCount {
        /// Index of the offending column.
        column: usize,
        /// Number of rows supplied for the column.
        found: usize,
    },
    /// A cell carries an intensity above [`MAX_INTENSITY`].
    #[error("cell ({column}, {row}) has intensity {level}, above the maximum of {}", MAX_INTENSITY)]
    Intensity {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
        /// Intensity found in the cell.
        level: u8,
    },
    /// A cell coordinate lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the grid")]
    CellOutOfRange {
        /// Column supplied by the caller.
        column: u32,
        /// Row supplied by the caller.
        row: u32,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column (week) index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row (day) index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the coordinate addresses a cell of the contribution grid.
    #[must_use]
    pub const fn is_within_grid(&self) -> bool {
        self.column < NUM_WEEKS && self.row < NUM_DAYS
    }
}

/// Remaining hit points of a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u8);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the health.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns the health left after absorbing a single hit.
    #[must_use]
    pub const fn after_hit(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Validated 52×7 matrix of contribution intensity levels.
///
/// Columns are weeks and rows are days, matching the layout of a GitHub
/// contribution graph. Serialises to and from the
/// `{"weeks":[{"days":[{"level":n}]}]}` document shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContributionDocument", into = "ContributionDocument")]
pub struct ContributionGrid {
    levels: Vec<u8>,
}

impl ContributionGrid {
    /// Creates a grid in which every cell has zero intensity.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            levels: vec![0; NUM_WEEKS as usize * NUM_DAYS_USIZE],
        }
    }

    /// Builds a grid from column-major intensity levels.
    pub fn from_columns(columns: Vec<Vec<u8>>) -> Result<Self, GridError> {
        if columns.len() != NUM_WEEKS as usize {
            return Err(GridError::ColumnCount {
                found: columns.len(),
            });
        }

        let mut grid = Self::empty();
        for (column_index, column) in columns.into_iter().enumerate() {
            if column.len() != NUM_DAYS_USIZE {
                return Err(GridError::RowCount {
                    column: column_index,
                    found: column.len(),
                });
            }

            for (row_index, level) in column.into_iter().enumerate() {
                let cell = CellCoord::new(column_index as u32, row_index as u32);
                grid = grid.with_level(cell, level)?;
            }
        }

        Ok(grid)
    }

    /// Returns a copy of the grid with the provided cell set to `level`.
    pub fn with_level(mut self, cell: CellCoord, level: u8) -> Result<Self, GridError> {
        let Some(index) = index_of(cell) else {
            return Err(GridError::CellOutOfRange {
                column: cell.column(),
                row: cell.row(),
            });
        };

        if level > MAX_INTENSITY {
            return Err(GridError::Intensity {
                column: cell.column(),
                row: cell.row(),
                level,
            });
        }

        self.levels[index] = level;
        Ok(self)
    }

    /// Intensity recorded for the cell, or `None` when the cell lies outside the grid.
    #[must_use]
    pub fn level(&self, cell: CellCoord) -> Option<u8> {
        index_of(cell).map(|index| self.levels[index])
    }

    /// Iterates over every cell with a positive intensity in row-major order.
    pub fn nonzero_cells(&self) -> impl Iterator<Item = (CellCoord, Health)> + '_ {
        (0..NUM_DAYS).flat_map(move |row| {
            (0..NUM_WEEKS).filter_map(move |column| {
                let cell = CellCoord::new(column, row);
                match self.level(cell) {
                    Some(level) if level > 0 => Some((cell, Health::new(level))),
                    _ => None,
                }
            })
        })
    }

    /// Sum of all intensity levels, equal to the shots needed to clear the grid.
    #[must_use]
    pub fn total_intensity(&self) -> u32 {
        self.levels.iter().map(|level| u32::from(*level)).sum()
    }

    fn to_columns(&self) -> Vec<Vec<u8>> {
        self.levels
            .chunks(NUM_DAYS_USIZE)
            .map(<[u8]>::to_vec)
            .collect()
    }
}

fn index_of(cell: CellCoord) -> Option<usize> {
    if !cell.is_within_grid() {
        return None;
    }
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    Some(column * NUM_DAYS_USIZE + row)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ContributionDocument {
    weeks: Vec<WeekDocument>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct WeekDocument {
    days: Vec<DayDocument>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct DayDocument {
    level: u8,
}

impl TryFrom<ContributionDocument> for ContributionGrid {
    type Error = GridError;

    fn try_from(document: ContributionDocument) -> Result<Self, Self::Error> {
        let columns = document
            .weeks
            .into_iter()
            .map(|week| week.days.into_iter().map(|day| day.level).collect())
            .collect();
        Self::from_columns(columns)
    }
}

impl From<ContributionGrid> for ContributionDocument {
    fn from(grid: ContributionGrid) -> Self {
        let weeks = grid
            .to_columns()
            .into_iter()
            .map(|column| WeekDocument {
                days: column
                    .into_iter()
                    .map(|level| DayDocument { level })
                    .collect(),
            })
            .collect();
        Self { weeks }
    }
}

/// Single step of a targeting plan: travel to a column and optionally fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    /// Column the vehicle should travel to.
    pub column: u32,
    /// Whether the vehicle fires once it arrives.
    pub fire: bool,
}

impl Action {
    /// Travels to `column` and fires once there.
    #[must_use]
    pub const fn fire_at(column: u32) -> Self {
        Self { column, fire: true }
    }

    /// Travels to `column` without firing.
    #[must_use]
    pub const fn move_to(column: u32) -> Self {
        Self {
            column,
            fire: false,
        }
    }
}

/// Immutable representation of a live target used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TargetSnapshot {
    /// Cell occupied by the target.
    pub cell: CellCoord,
    /// Hits the target can still absorb.
    pub health: Health,
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Column the projectile travels along.
    pub column: u32,
    /// Current row of the projectile, decreasing as it climbs.
    pub row: f32,
}

/// Immutable representation of the vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    /// Continuous column position.
    pub position: f32,
    /// Column the vehicle is travelling toward.
    pub target_column: u32,
    /// Frames left before the vehicle can fire.
    pub cooldown: u32,
}

/// Read-only snapshot describing all live targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new target view, ordering snapshots row-major.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.cell.row(), snapshot.cell.column()));
        Self { snapshots }
    }

    /// Iterator over the captured target snapshots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Targets occupying `column`, ordered from the top row down.
    pub fn in_column(&self, column: u32) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.cell.column() == column)
    }

    /// Columns that contain at least one live target, in ascending order.
    #[must_use]
    pub fn occupied_columns(&self) -> Vec<u32> {
        let mut columns: Vec<u32> = self
            .snapshots
            .iter()
            .map(|snapshot| snapshot.cell.column())
            .collect();
        columns.sort_unstable();
        columns.dedup();
        columns
    }

    /// Number of live targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no targets remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TargetSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view preserving firing order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles travelling along `column`.
    #[must_use]
    pub fn count_in_column(&self, column: u32) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.column == column)
            .count()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Number of frames simulated before the snapshot was taken.
    pub frame: u64,
    /// State of the vehicle.
    pub vehicle: VehicleSnapshot,
    /// Live targets in row-major order.
    pub targets: Vec<TargetSnapshot>,
    /// Projectiles in flight in firing order.
    pub projectiles: Vec<ProjectileSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_has_no_nonzero_cells() {
        let grid = ContributionGrid::empty();
        assert_eq!(grid.nonzero_cells().count(), 0);
        assert_eq!(grid.total_intensity(), 0);
    }

    #[test]
    fn nonzero_cells_iterate_row_major() {
        let grid = ContributionGrid::empty()
            .with_level(CellCoord::new(9, 1), 2)
            .and_then(|grid| grid.with_level(CellCoord::new(3, 4), 1))
            .and_then(|grid| grid.with_level(CellCoord::new(0, 1), 4))
            .expect("valid cells");

        let cells: Vec<_> = grid.nonzero_cells().collect();
        assert_eq!(
            cells,
            vec![
                (CellCoord::new(0, 1), Health::new(4)),
                (CellCoord::new(9, 1), Health::new(2)),
                (CellCoord::new(3, 4), Health::new(1)),
            ]
        );
        assert_eq!(grid.total_intensity(), 7);
    }

    #[test]
    fn with_level_rejects_excessive_intensity() {
        let error = ContributionGrid::empty()
            .with_level(CellCoord::new(1, 1), 5)
            .expect_err("intensity 5 must be rejected");
        assert_eq!(
            error,
            GridError::Intensity {
                column: 1,
                row: 1,
                level: 5
            }
        );
    }

    #[test]
    fn with_level_rejects_cells_outside_grid() {
        let error = ContributionGrid::empty()
            .with_level(CellCoord::new(NUM_WEEKS, 0), 1)
            .expect_err("column 52 is outside the grid");
        assert!(matches!(error, GridError::CellOutOfRange { column: 52, .. }));
    }

    #[test]
    fn from_columns_validates_shape() {
        let short = vec![vec![0; NUM_DAYS_USIZE]; 51];
        assert_eq!(
            ContributionGrid::from_columns(short),
            Err(GridError::ColumnCount { found: 51 })
        );

        let mut ragged = vec![vec![0; NUM_DAYS_USIZE]; NUM_WEEKS as usize];
        ragged[7] = vec![0; 6];
        assert_eq!(
            ContributionGrid::from_columns(ragged),
            Err(GridError::RowCount {
                column: 7,
                found: 6
            })
        );
    }

    #[test]
    fn document_deserialises_into_validated_grid() {
        let mut weeks = Vec::new();
        for week in 0..NUM_WEEKS {
            let days: Vec<_> = (0..NUM_DAYS)
                .map(|day| {
                    let level = if week == 5 && day == 2 { 3 } else { 0 };
                    serde_json::json!({ "level": level, "date": "2024-01-01" })
                })
                .collect();
            weeks.push(serde_json::json!({ "days": days }));
        }
        let document = serde_json::json!({ "weeks": weeks });

        let grid: ContributionGrid = serde_json::from_value(document).expect("valid document");
        assert_eq!(grid.level(CellCoord::new(5, 2)), Some(3));
        assert_eq!(grid.total_intensity(), 3);
    }

    #[test]
    fn document_with_invalid_level_is_rejected() {
        let weeks: Vec<_> = (0..NUM_WEEKS)
            .map(|_| serde_json::json!({ "days": vec![serde_json::json!({ "level": 9 }); 7] }))
            .collect();
        let result: Result<ContributionGrid, _> =
            serde_json::from_value(serde_json::json!({ "weeks": weeks }));
        assert!(result.is_err());
    }

    #[test]
    fn health_after_hit_saturates_at_zero() {
        let health = Health::new(1).after_hit();
        assert!(health.is_depleted());
        assert!(health.after_hit().is_depleted());
    }

    #[test]
    fn target_view_reports_occupied_columns() {
        let view = TargetView::from_snapshots(vec![
            TargetSnapshot {
                cell: CellCoord::new(12, 6),
                health: Health::new(1),
            },
            TargetSnapshot {
                cell: CellCoord::new(3, 0),
                health: Health::new(2),
            },
            TargetSnapshot {
                cell: CellCoord::new(12, 1),
                health: Health::new(4),
            },
        ]);

        assert_eq!(view.occupied_columns(), vec![3, 12]);
        let column: Vec<_> = view.in_column(12).map(|target| target.cell.row()).collect();
        assert_eq!(column, vec![1, 6]);
    }

    #[test]
    fn projectile_view_counts_by_column() {
        let view = ProjectileView::from_snapshots(vec![
            ProjectileSnapshot {
                column: 4,
                row: 8.0,
            },
            ProjectileSnapshot {
                column: 4,
                row: 3.5,
            },
            ProjectileSnapshot {
                column: 9,
                row: 1.0,
            },
        ]);

        assert_eq!(view.count_in_column(4), 2);
        assert_eq!(view.count_in_column(9), 1);
        assert_eq!(view.count_in_column(0), 0);
    }
}
