//! Mouse input: clicks on the on-screen control pad and drag gestures.
//!
//! A left-button drag plays the role of a touch swipe. Terminal coordinates
//! are in character cells, so they are scaled to logical pixels before the
//! swipe threshold is applied.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::game::Direction;

/// Dominant-axis travel, in logical pixels, before a drag counts as a swipe
pub const SWIPE_THRESHOLD_PX: f32 = 30.0;

/// Approximate size of a terminal cell in logical pixels
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Turns a stream of pointer positions into at most one direction per gesture
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
    threshold: f32,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Feed the current pointer position. Once a direction is recognised
    /// the gesture ends, so a long drag yields a single turn. This holds even
    /// when the session then refuses the turn (a reversal): the player has to
    /// press and drag again.
    pub fn update(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (start_x, start_y) = self.start?;
        let dx = x - start_x;
        let dy = y - start_y;

        let direction = if dx.abs() > dy.abs() {
            if dx > self.threshold {
                Some(Direction::Right)
            } else if dx < -self.threshold {
                Some(Direction::Left)
            } else {
                None
            }
        } else if dy > self.threshold {
            Some(Direction::Down)
        } else if dy < -self.threshold {
            Some(Direction::Up)
        } else {
            None
        };

        if direction.is_some() {
            self.start = None;
        }
        direction
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD_PX)
    }
}

/// Mouse handling for the play screen
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    swipe: SwipeTracker,
    buttons: Vec<(Rect, Direction)>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clickable control pad, as laid out by the last frame
    pub fn set_buttons(&mut self, buttons: &[(Rect, Direction)]) {
        self.buttons.clear();
        self.buttons.extend_from_slice(buttons);
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Direction> {
        self.buttons
            .iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x.saturating_add(rect.width)
                    && row >= rect.y
                    && row < rect.y.saturating_add(rect.height)
            })
            .map(|(_, direction)| *direction)
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        let (x, y) = to_pixels(event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(direction) = self.button_at(event.column, event.row) {
                    self.swipe.cancel();
                    return Some(direction);
                }
                self.swipe.begin(x, y);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => self.swipe.update(x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                self.swipe.cancel();
                None
            }
            _ => None,
        }
    }
}

fn to_pixels(column: u16, row: u16) -> (f32, f32) {
    (
        f32::from(column) * CELL_WIDTH_PX,
        f32::from(row) * CELL_HEIGHT_PX,
    )
}
