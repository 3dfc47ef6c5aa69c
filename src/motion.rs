use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultySettings;
use crate::session::RandomSource;

pub const DEFAULT_BAR_WIDTH: u32 = 240;
pub const DEFAULT_CURSOR_PADDING: u32 = 10;

/// Dimensions of the bar the cursor travels across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub total_width: u32,
    /// Minimum distance the cursor keeps from either bar edge
    pub cursor_padding: u32,
}

impl Default for BarGeometry {
    fn default() -> Self {
        Self {
            total_width: DEFAULT_BAR_WIDTH,
            cursor_padding: DEFAULT_CURSOR_PADDING,
        }
    }
}

impl BarGeometry {
    pub fn new(total_width: u32, cursor_padding: u32) -> Self {
        Self {
            total_width,
            cursor_padding,
        }
    }

    pub fn half_width(&self) -> i32 {
        // u32::MAX / 2 == i32::MAX
        (self.total_width / 2) as i32
    }

    /// Bound of the travel range `[-max_offset, +max_offset]` for a given speed
    pub fn max_offset(&self, cursor_speed: u32) -> i32 {
        let reserved = i64::from(cursor_speed) + i64::from(self.cursor_padding);
        saturate(i64::from(self.half_width()) - reserved)
    }

    /// Width of the start-offset draw, never below one
    pub fn start_span(&self, cursor_speed: u32) -> i32 {
        let reserved = 4 * (i64::from(self.cursor_padding) + i64::from(cursor_speed));
        saturate(i64::from(self.total_width) - reserved).max(1)
    }
}

/// Clamp into `[-i32::MAX, i32::MAX]` so negation never overflows
fn saturate(value: i64) -> i32 {
    value.clamp(-i64::from(i32::MAX), i64::from(i32::MAX)) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Cursor offset from bar center plus travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub position: i32,
    pub direction: Direction,
}

impl CursorState {
    pub fn new(position: i32, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// Pick a starting offset in `[0, span) - total_width/2`, moving right.
pub fn start_position<R>(
    rng: &mut R,
    settings: &DifficultySettings,
    geometry: &BarGeometry,
) -> CursorState
where
    R: RandomSource + ?Sized,
{
    let span = geometry.start_span(settings.cursor_speed);
    let position = rng.draw(0..span) - geometry.half_width();
    CursorState::new(position, Direction::Right)
}

/// Advance the cursor by one tick.
///
/// Direction flips once when the cursor is at or past a bound and still heading
/// outward; the step is then applied unconditionally. When the bound is not a
/// multiple of the speed the cursor can overshoot it by up to `cursor_speed - 1`.
/// Positions saturate at `±i32::MAX` for extreme speeds or bar widths.
pub fn advance(
    state: CursorState,
    settings: &DifficultySettings,
    geometry: &BarGeometry,
) -> CursorState {
    let speed = i64::from(settings.cursor_speed);
    let max_offset = i64::from(geometry.max_offset(settings.cursor_speed));
    let position = i64::from(state.position);

    let mut direction = state.direction;
    let at_bound = position <= -max_offset || position >= max_offset;
    if at_bound && position * i64::from(direction.sign()) > 0 {
        direction = direction.reversed();
    }

    CursorState {
        position: saturate(position + i64::from(direction.sign()) * speed),
        direction,
    }
}

/// Number of ticks for one full sweep out and back, rounded
pub fn period_ticks(settings: &DifficultySettings, geometry: &BarGeometry) -> u32 {
    let max_offset = geometry.max_offset(settings.cursor_speed).max(0) as f64;
    (4.0 * max_offset / settings.cursor_speed as f64).round() as u32
}
