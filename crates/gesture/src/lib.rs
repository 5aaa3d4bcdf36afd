//! Trimview Gesture Recognition
//!
//! Turns a raw multi-touch pointer stream into semantic gestures:
//!
//! - **Down:** delivered immediately for every first contact
//! - **Scroll:** delivered once the focal point leaves the touch-slop region,
//!   flagged as a *drag* when a long-press preceded it
//! - **Long-press:** delivered by a deferred, cancelable task
//! - **Up:** delivered when the last contact lifts
//!
//! The recognizer owns no clock and no timer thread. The pending long-press is
//! exposed as a [`trimview_common::ScheduledTask`] that the host either
//! schedules and hands back by token, or polls with the current time.

pub mod event;
pub mod recognizer;

pub use event::{Point, PointerAction, PointerEvent};
pub use recognizer::GestureRecognizer;

/// Receiver of semantic gesture callbacks.
///
/// Every method has a no-op default so implementors only override what they
/// care about.
pub trait GestureListener {
    /// A gesture started. Returning true marks the Down as consumed.
    fn on_down(&mut self, _event: &PointerEvent) -> bool {
        false
    }

    /// The last contact lifted.
    fn on_up(&mut self) {}

    /// The focal point moved by `(distance_x, distance_y)` since the previous
    /// scroll (previous minus current, so dragging right yields a negative
    /// `distance_x`). `down` is the Down that started the gesture.
    fn on_scroll(
        &mut self,
        _down: &PointerEvent,
        _current: &PointerEvent,
        _distance_x: f64,
        _distance_y: f64,
        _is_drag: bool,
    ) -> bool {
        false
    }

    /// The contact was held in place long enough. `down` is the starting Down.
    fn on_long_press(&mut self, _down: &PointerEvent) {}
}
