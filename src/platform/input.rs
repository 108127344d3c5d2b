//! Gesture input
//!
//! A horizontal drag becomes one lane move once it clears the swipe threshold.
//! Shorter drags are ignored.

use crate::consts::SWIPE_THRESHOLD;
use crate::engine::Command;

/// Map a released gesture's horizontal displacement to a lane command
pub fn swipe_command(dx: f32) -> Option<Command> {
    if dx > SWIPE_THRESHOLD {
        Some(Command::MoveRight)
    } else if dx < -SWIPE_THRESHOLD {
        Some(Command::MoveLeft)
    } else {
        None
    }
}

/// Tracks a single press/release gesture
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    origin: Option<f32>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer/touch went down at `x`
    pub fn press(&mut self, x: f32) {
        self.origin = Some(x);
    }

    /// Pointer/touch released at `x`. A release without a press yields nothing.
    pub fn release(&mut self, x: f32) -> Option<Command> {
        let origin = self.origin.take()?;
        swipe_command(x - origin)
    }

    /// Drop an in-flight gesture (e.g. touch cancelled)
    pub fn cancel(&mut self) {
        self.origin = None;
    }
}
