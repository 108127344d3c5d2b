//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (wall clock, or a manually advanced clock for tests)
//! - Input events (swipe gestures to lane commands)

pub mod clock;
pub mod input;

pub use clock::RealtimeScheduler;
pub use clock::{ManualScheduler, Scheduler, Trigger};
pub use input::{SwipeTracker, swipe_command};
