//! Trimview Controller
//!
//! Interprets recognized gestures against the trim range:
//! - **Hit-testing:** each Down is classified as left handle, right handle,
//!   body, or nothing
//! - **Dragging:** scrolls move the touched handle or the whole range
//! - **Zoom:** a long-press on a handle expands the timeline around it until
//!   the contact lifts
//!
//! The controller talks to its surroundings only through [`TimelineHost`]
//! (layout, repaint, and scheduling) and [`TrimListener`] (notifications).

pub mod controller;
pub mod target;

pub use controller::{ControllerPhase, TrimRangeController};
pub use target::{hit_test, GestureTarget};

use trimview_common::clock::{ScheduledTask, TaskToken};

/// Layout and scheduling services supplied by the view that hosts the trimmer.
pub trait TimelineHost {
    /// Current layout width of the track.
    fn track_width_pixels(&self) -> f64;

    /// Current layout height of the track; handles sit on its vertical center.
    fn track_height_pixels(&self) -> f64;

    /// Shortest allowed selection, converted to pixels by the host.
    fn min_trim_width_pixels(&self) -> f64;

    /// Longest allowed selection, converted to pixels by the host.
    fn max_trim_width_pixels(&self) -> f64;

    /// Ask for the trimmer to be redrawn.
    fn request_repaint(&mut self);

    /// Ask for a frame callback carrying `token` (see
    /// [`TrimRangeController::on_frame`]).
    fn request_animation_frame(&mut self, token: TaskToken);

    /// Ask for a timer callback at `task.deadline_ms` (see
    /// [`TrimRangeController::on_timer`]). Hosts that poll instead can
    /// ignore this.
    fn schedule_long_press(&mut self, _task: ScheduledTask) {}
}

/// Notifications for the application that owns the trimmer.
pub trait TrimListener {
    /// The committed selection changed. Always in logical (collapsed) pixels.
    fn on_range_changed(&mut self, left: f64, right: f64);

    /// A long-press started zooming around `pivot`.
    fn on_zoom_enter(&mut self, _pivot: f64) {}

    /// The zoom is being reverted.
    fn on_zoom_exit(&mut self) {}
}
