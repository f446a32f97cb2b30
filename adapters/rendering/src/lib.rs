#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for space shooter adapters.
//!
//! Nothing here rasterises. A [`Scene`] is a flat list of primitives in draw
//! order, composed from a [`FrameSnapshot`] and a [`RenderContext`]; encoders
//! receive scenes through the [`FrameSink`] seam.

use anyhow::Result as AnyResult;
use glam::Vec2;
use serde::Serialize;
use space_shooter_core::{
    FrameSnapshot, ProjectileSnapshot, TargetSnapshot, VehicleSnapshot, NUM_DAYS, NUM_WEEKS,
    VEHICLE_LANE_ROW,
};
use std::{error::Error, fmt, time::Duration};

/// Radius of the circle drawn for each projectile.
pub const PROJECTILE_RADIUS: f32 = 3.0;

const WING_WIDTH: f32 = 8.0;
const WING_ALPHA: f32 = 0.5;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Cell geometry and palette used to turn grid coordinates into pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderContext {
    /// Edge length of a grid cell in pixels.
    pub cell_size: f32,
    /// Gap between neighbouring cells in pixels.
    pub cell_spacing: f32,
    /// Margin around the grid in pixels.
    pub padding: f32,
    /// Color of empty grid slots and the canvas background.
    pub grid_color: Color,
    /// Color of the vehicle.
    pub vehicle_color: Color,
    /// Color of projectiles.
    pub projectile_color: Color,
    /// Target colors indexed by health minus one.
    pub target_colors: [Color; 4],
}

impl RenderContext {
    /// Palette and geometry matching GitHub's dark contribution graph.
    #[must_use]
    pub const fn dark_mode() -> Self {
        Self {
            cell_size: 12.0,
            cell_spacing: 2.0,
            padding: 40.0,
            grid_color: Color::from_rgb_u8(22, 27, 34),
            vehicle_color: Color::from_rgb_u8(88, 166, 255),
            projectile_color: Color::from_rgb_u8(255, 223, 0),
            target_colors: [
                Color::from_rgb_u8(0, 109, 50),
                Color::from_rgb_u8(38, 166, 65),
                Color::from_rgb_u8(57, 211, 83),
                Color::from_rgb_u8(87, 242, 135),
            ],
        }
    }

    /// Returns a copy with the provided geometry, validating the cell size.
    pub fn with_geometry(
        self,
        cell_size: f32,
        cell_spacing: f32,
        padding: f32,
    ) -> Result<Self, RenderingError> {
        if cell_size.is_nan() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        if cell_spacing < 0.0 || padding < 0.0 {
            return Err(RenderingError::NegativeMargin {
                cell_spacing,
                padding,
            });
        }

        Ok(Self {
            cell_size,
            cell_spacing,
            padding,
            ..self
        })
    }

    /// Distance between the origins of two neighbouring cells.
    #[must_use]
    pub fn cell_pitch(&self) -> f32 {
        self.cell_size + self.cell_spacing
    }

    /// Top-left pixel of the cell at a possibly fractional grid position.
    #[must_use]
    pub fn cell_origin(&self, column: f32, row: f32) -> Vec2 {
        Vec2::new(column, row) * self.cell_pitch() + Vec2::splat(self.padding)
    }

    /// Canvas dimensions in pixels, tall enough to include the vehicle lane.
    #[must_use]
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(NUM_WEEKS as f32, (VEHICLE_LANE_ROW + 1) as f32) * self.cell_pitch()
            + Vec2::splat(2.0 * self.padding)
    }

    /// Color for a target with the provided remaining health.
    #[must_use]
    pub fn target_color(&self, health: u8) -> Color {
        let index = usize::from(health.saturating_sub(1));
        self.target_colors
            .get(index)
            .copied()
            .unwrap_or(self.target_colors[0])
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::dark_mode()
    }
}

/// Drawing primitive expressed in canvas pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Axis aligned filled rectangle.
    Rect {
        /// Top-left corner.
        min: Vec2,
        /// Bottom-right corner.
        max: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Filled circle.
    Circle {
        /// Circle centre.
        center: Vec2,
        /// Circle radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Filled polygon with vertices in winding order.
    Polygon {
        /// Polygon vertices.
        points: Vec<Vec2>,
        /// Fill color.
        color: Color,
    },
}

impl Shape {
    fn rect(min: Vec2, size: Vec2, color: Color) -> Self {
        Self::Rect {
            min,
            max: min + size,
            color,
        }
    }
}

/// Declarative description of a single animation frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    /// Simulation frame the scene was composed from.
    pub frame: u64,
    /// Canvas dimensions in pixels.
    pub size: Vec2,
    /// Color the canvas is cleared with.
    pub background: Color,
    /// Primitives in back-to-front draw order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Composes the primitives for `frame` using the provided context.
    #[must_use]
    pub fn compose(frame: &FrameSnapshot, context: &RenderContext) -> Self {
        let mut shapes = Vec::with_capacity(
            (NUM_WEEKS * NUM_DAYS) as usize + frame.targets.len() + frame.projectiles.len() + 5,
        );

        let cell = Vec2::splat(context.cell_size);
        for row in 0..NUM_DAYS {
            for column in 0..NUM_WEEKS {
                let origin = context.cell_origin(column as f32, row as f32);
                shapes.push(Shape::rect(origin, cell, context.grid_color));
            }
        }

        shapes.extend(frame.targets.iter().map(|target| target_shape(target, context)));
        shapes.extend(
            frame
                .projectiles
                .iter()
                .map(|projectile| projectile_shape(projectile, context)),
        );
        shapes.extend(vehicle_shapes(&frame.vehicle, context));

        Self {
            frame: frame.frame,
            size: context.canvas_size(),
            background: context.grid_color,
            shapes,
        }
    }
}

fn target_shape(target: &TargetSnapshot, context: &RenderContext) -> Shape {
    let origin = context.cell_origin(target.cell.column() as f32, target.cell.row() as f32);
    Shape::rect(
        origin,
        Vec2::splat(context.cell_size),
        context.target_color(target.health.get()),
    )
}

fn projectile_shape(projectile: &ProjectileSnapshot, context: &RenderContext) -> Shape {
    let origin = context.cell_origin(projectile.column as f32, projectile.row);
    Shape::Circle {
        center: origin + Vec2::splat(context.cell_size / 2.0),
        radius: PROJECTILE_RADIUS,
        color: context.projectile_color,
    }
}

/// Two translucent wings with solid tips, then the body on top.
fn vehicle_shapes(vehicle: &VehicleSnapshot, context: &RenderContext) -> [Shape; 5] {
    let origin = context.cell_origin(vehicle.position, VEHICLE_LANE_ROW as f32);
    let height = context.cell_size;
    let center_x = origin.x + context.cell_size / 2.0;
    let at = |dx: f32, fraction: f32| Vec2::new(center_x + dx, origin.y + height * fraction);
    let wing_color = context.vehicle_color.with_alpha(WING_ALPHA);

    let wing = |side: f32| Shape::Polygon {
        points: vec![
            at(side * 2.0, 0.5),
            at(side * WING_WIDTH, 0.8),
            at(side * WING_WIDTH, 1.0),
            at(side * 2.0, 0.7),
        ],
        color: wing_color,
    };
    let tip = |side: f32| {
        let outer = side * WING_WIDTH;
        let min_x = outer.min(outer + side);
        Shape::rect(
            at(min_x, 0.5),
            Vec2::new(1.0, height * 0.5),
            context.vehicle_color,
        )
    };

    [
        wing(-1.0),
        tip(-1.0),
        wing(1.0),
        tip(1.0),
        Shape::Polygon {
            points: vec![at(0.0, 0.0), at(-3.0, 0.7), at(0.0, 1.0), at(3.0, 0.7)],
            color: context.vehicle_color,
        },
    ]
}

/// Destination for composed scenes, implemented by frame encoders.
pub trait FrameSink {
    /// Appends a scene that should be displayed for `duration`.
    fn push(&mut self, scene: &Scene, duration: Duration) -> AnyResult<()>;

    /// Flushes any buffered output once the last scene has been pushed.
    fn finish(&mut self) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell size must be positive to avoid a zero-sized cell.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
    /// Spacing and padding cannot be negative.
    NegativeMargin {
        /// Provided spacing between cells.
        cell_spacing: f32,
        /// Provided padding around the grid.
        padding: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
            Self::NegativeMargin {
                cell_spacing,
                padding,
            } => write!(
                f,
                "cell_spacing and padding must not be negative (received {cell_spacing} and {padding})"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use space_shooter_core::{CellCoord, Health, VEHICLE_START_COLUMN};

    fn frame(targets: Vec<TargetSnapshot>, projectiles: Vec<ProjectileSnapshot>) -> FrameSnapshot {
        FrameSnapshot {
            frame: 7,
            vehicle: VehicleSnapshot {
                position: VEHICLE_START_COLUMN as f32,
                target_column: VEHICLE_START_COLUMN,
                cooldown: 0,
            },
            targets,
            projectiles,
        }
    }

    #[test]
    fn cell_origin_includes_padding_and_spacing() {
        let context = RenderContext::dark_mode();

        assert_eq!(context.cell_origin(0.0, 0.0), Vec2::splat(40.0));
        assert_eq!(context.cell_origin(3.0, 2.0), Vec2::new(82.0, 68.0));
        assert_eq!(context.cell_origin(0.5, 0.0), Vec2::new(47.0, 40.0));
    }

    #[test]
    fn canvas_fits_grid_and_vehicle_lane() {
        let context = RenderContext::dark_mode();
        let size = context.canvas_size();

        assert_eq!(size, Vec2::new(808.0, 234.0));
        let lane_bottom = context.cell_origin(0.0, VEHICLE_LANE_ROW as f32).y + context.cell_size;
        assert!(lane_bottom <= size.y);
    }

    #[test]
    fn geometry_rejects_non_positive_cell_size() {
        let error = RenderContext::dark_mode()
            .with_geometry(0.0, 2.0, 40.0)
            .expect_err("zero cell size must be rejected");

        assert_eq!(error, RenderingError::InvalidCellSize { cell_size: 0.0 });
        assert!(RenderContext::dark_mode()
            .with_geometry(10.0, -1.0, 0.0)
            .is_err());
    }

    #[test]
    fn target_colors_follow_health_with_fallback() {
        let context = RenderContext::dark_mode();

        assert_eq!(context.target_color(1), Color::from_rgb_u8(0, 109, 50));
        assert_eq!(context.target_color(4), Color::from_rgb_u8(87, 242, 135));
        assert_eq!(context.target_color(9), context.target_colors[0]);
        assert_eq!(context.target_color(0), context.target_colors[0]);
    }

    #[test]
    fn compose_draws_background_then_entities_then_vehicle() {
        let context = RenderContext::dark_mode();
        let snapshot = frame(
            vec![TargetSnapshot {
                cell: CellCoord::new(2, 6),
                health: Health::new(3),
            }],
            vec![ProjectileSnapshot {
                column: 2,
                row: 8.5,
            }],
        );

        let scene = Scene::compose(&snapshot, &context);
        let background = (NUM_WEEKS * NUM_DAYS) as usize;

        assert_eq!(scene.frame, 7);
        assert_eq!(scene.shapes.len(), background + 1 + 1 + 5);
        assert_eq!(
            scene.shapes[background],
            Shape::Rect {
                min: Vec2::new(68.0, 124.0),
                max: Vec2::new(80.0, 136.0),
                color: context.target_color(3),
            }
        );
        assert_eq!(
            scene.shapes[background + 1],
            Shape::Circle {
                center: Vec2::new(74.0, 165.0),
                radius: PROJECTILE_RADIUS,
                color: context.projectile_color,
            }
        );
    }

    #[test]
    fn vehicle_body_is_centred_on_its_column() {
        let context = RenderContext::dark_mode();
        let scene = Scene::compose(&frame(Vec::new(), Vec::new()), &context);

        let Some(Shape::Polygon { points, color }) = scene.shapes.last() else {
            panic!("vehicle body is drawn last");
        };
        let lane = context.cell_origin(VEHICLE_START_COLUMN as f32, VEHICLE_LANE_ROW as f32);
        assert_eq!(*color, context.vehicle_color);
        assert_eq!(points[0], Vec2::new(lane.x + 6.0, lane.y));
        assert_eq!(points[2], Vec2::new(lane.x + 6.0, lane.y + 12.0));

        let wings = scene
            .shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Polygon { color, .. } if color.alpha < 1.0))
            .count();
        assert_eq!(wings, 2);
    }
}
