//! The trim-range interaction controller.
//!
//! # State machine
//!
//! ```text
//! Idle -> Touching(target) -> Idle
//!                          -> Expanding(handle) -> Expanded(handle) -> Collapsing -> Idle
//! ```
//!
//! A long-press on a handle starts the expansion; lifting the contact starts
//! the collapse. Body drags never expand, and `Touching(None)` consumes
//! nothing.
//!
//! Notifications always carry logical (collapsed) coordinates and are only
//! sent for committed changes: after each drag step and once when an
//! animation settles.

use serde::{Deserialize, Serialize};

use trimview_common::clock::{DeferredSlot, ScheduledTask, TaskToken, TimestampMs};
use trimview_common::config::TrimmerConfig;
use trimview_common::error::TrimResult;
use trimview_gesture::{GestureListener, GestureRecognizer, PointerAction, PointerEvent};
use trimview_range_model::{Bounds, RangeModel, TimeScale, TrimWindow};

use crate::target::{hit_test, GestureTarget};
use crate::{TimelineHost, TrimListener};

/// Where the controller is in its interaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "target", rename_all = "snake_case")]
pub enum ControllerPhase {
    Idle,
    Touching(GestureTarget),
    Expanding(GestureTarget),
    Expanded(GestureTarget),
    Collapsing,
}

/// Everything the gesture callbacks touch, split from the recognizer so the
/// recognizer can call back into it while being borrowed itself.
struct Interaction<H, L> {
    host: H,
    listener: L,
    model: RangeModel,
    handle_radius: f64,
    /// `None` between gestures; `Some(GestureTarget::None)` for pass-through touches.
    target: Option<GestureTarget>,
    frame: DeferredSlot,
    now_ms: TimestampMs,
    playhead: Option<f64>,
}

impl<H: TimelineHost, L: TrimListener> Interaction<H, L> {
    fn emit_range_changed(&mut self) {
        let logical = self.model.logical_bounds();
        self.listener.on_range_changed(logical.left, logical.right);
    }

    fn request_frame(&mut self) {
        let task = self.frame.arm(self.now_ms);
        self.host.request_animation_frame(task.token);
    }

    fn advance_animation(&mut self, now_ms: TimestampMs) -> bool {
        self.now_ms = now_ms;
        let running = self.model.step_animation(now_ms);
        self.host.request_repaint();
        if running {
            self.request_frame();
        } else {
            tracing::debug!(expanded = self.model.is_expanded(), "Range animation settled");
            self.emit_range_changed();
        }
        running
    }

    /// Re-read track width and width limits from the host. Returns whether
    /// the track width changed.
    fn sync_layout(&mut self) -> TrimResult<bool> {
        let width = self.host.track_width_pixels();
        let resized = self.model.resize_track(width);
        if resized {
            tracing::debug!(track_width = width, "Track resized");
        }
        if self.model.is_degenerate() {
            return Ok(false);
        }

        let min_width = self.host.min_trim_width_pixels();
        let max_width = self.host.max_trim_width_pixels();
        if min_width != self.model.min_width() || max_width != self.model.max_width() {
            self.model.set_width_limits(min_width, max_width)?;
            tracing::debug!(min_width, max_width, "Width limits updated");
        }
        Ok(resized)
    }

    fn begin_collapse(&mut self) {
        if self.model.begin_collapse(self.now_ms) {
            tracing::info!(pivot = self.model.pivot(), "Zoom exit");
            self.listener.on_zoom_exit();
            self.request_frame();
            self.host.request_repaint();
        }
    }
}

impl<H: TimelineHost, L: TrimListener> GestureListener for Interaction<H, L> {
    fn on_down(&mut self, event: &PointerEvent) -> bool {
        let target = match event.position() {
            Some(point) if !self.model.is_degenerate() => hit_test(
                point,
                self.model.bounds(),
                self.handle_radius,
                self.host.track_height_pixels() / 2.0,
            ),
            _ => GestureTarget::None,
        };
        tracing::debug!(?target, "Trim gesture target");
        self.target = Some(target);
        target != GestureTarget::None
    }

    fn on_up(&mut self) {
        if self.model.is_expanded() {
            self.begin_collapse();
        }
        self.target = None;
    }

    fn on_scroll(
        &mut self,
        _down: &PointerEvent,
        _current: &PointerEvent,
        distance_x: f64,
        _distance_y: f64,
        _is_drag: bool,
    ) -> bool {
        let applied = match self.target {
            Some(GestureTarget::LeftHandle) => self.model.move_left(distance_x),
            Some(GestureTarget::RightHandle) => self.model.move_right(distance_x),
            Some(GestureTarget::Body) => self.model.move_both(distance_x),
            Some(GestureTarget::None) | None => return false,
        };
        if !applied {
            return false;
        }

        self.emit_range_changed();
        self.host.request_repaint();
        true
    }

    fn on_long_press(&mut self, _down: &PointerEvent) {
        let Some(held) = self.target.filter(GestureTarget::is_handle) else {
            return;
        };
        let target = self.model.target();
        let pivot = if held == GestureTarget::LeftHandle {
            target.left
        } else {
            target.right
        };

        if self.model.begin_expansion(pivot, self.now_ms) {
            tracing::info!(pivot, "Zoom enter");
            self.listener.on_zoom_enter(pivot);
            self.request_frame();
            self.host.request_repaint();
        }
    }
}

/// Drives a [`RangeModel`] from raw pointer input.
pub struct TrimRangeController<H, L> {
    recognizer: GestureRecognizer,
    interaction: Interaction<H, L>,
}

impl<H: TimelineHost, L: TrimListener> TrimRangeController<H, L> {
    /// Build a controller, reading the initial layout from `host`.
    ///
    /// Fails on invalid configuration or host-reported geometry.
    pub fn new(config: &TrimmerConfig, host: H, listener: L) -> TrimResult<Self> {
        config.validate()?;
        let recognizer = GestureRecognizer::new(&config.gesture)?;
        let model = RangeModel::new(
            host.track_width_pixels(),
            host.min_trim_width_pixels(),
            host.max_trim_width_pixels(),
            &config.range,
        )?;

        tracing::debug!(
            track_width = model.track_width(),
            min_width = model.min_width(),
            max_width = model.max_width(),
            "Trim controller created"
        );

        Ok(Self {
            recognizer,
            interaction: Interaction {
                host,
                listener,
                model,
                handle_radius: config.range.handle_radius_px,
                target: None,
                frame: DeferredSlot::new(),
                now_ms: 0,
                playhead: None,
            },
        })
    }

    /// Feed one pointer event. Returns whether the trimmer consumed it.
    ///
    /// Input-contract errors are fatal: the controller rejects every later
    /// event and a fresh instance has to be built.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> TrimResult<bool> {
        self.interaction.now_ms = event.time_ms;

        if event.action == PointerAction::Down {
            self.interaction.sync_layout()?;
        }

        let consumed = self.recognizer.handle(event, &mut self.interaction)?;

        match event.action {
            PointerAction::Down => {
                if let Some(task) = self.recognizer.pending_long_press() {
                    self.interaction.host.schedule_long_press(task);
                }
            }
            PointerAction::Cancel => {
                // The recognizer stays silent on cancel, so the controller
                // unwinds its own state here.
                self.interaction.begin_collapse();
                self.interaction.target = None;
            }
            _ => {}
        }

        Ok(consumed)
    }

    /// Deliver a long-press timer scheduled through
    /// [`TimelineHost::schedule_long_press`]. Stale tokens are ignored.
    pub fn on_timer(&mut self, token: TaskToken, now_ms: TimestampMs) -> bool {
        self.interaction.now_ms = now_ms;
        self.recognizer
            .dispatch_long_press(token, &mut self.interaction)
    }

    /// Fire the long-press if it is due at `now_ms`, for hosts that poll.
    pub fn poll_timers(&mut self, now_ms: TimestampMs) -> bool {
        self.interaction.now_ms = now_ms;
        self.recognizer
            .poll_long_press(now_ms, &mut self.interaction)
    }

    /// Deliver a frame requested through
    /// [`TimelineHost::request_animation_frame`]. Returns whether the
    /// animation is still running; stale tokens are ignored.
    pub fn on_frame(&mut self, token: TaskToken, now_ms: TimestampMs) -> bool {
        if !self.interaction.frame.take(token) {
            tracing::trace!(token = token.generation(), "Stale frame ignored");
            return false;
        }
        self.interaction.advance_animation(now_ms)
    }

    /// Advance a pending animation frame without a token, for hosts that
    /// tick on their own cadence.
    pub fn tick(&mut self, now_ms: TimestampMs) -> bool {
        match self.interaction.frame.pending() {
            Some(task) if self.interaction.frame.take(task.token) => {
                self.interaction.advance_animation(now_ms)
            }
            _ => false,
        }
    }

    /// Follow a host layout change.
    pub fn on_resize(&mut self) -> TrimResult<()> {
        if self.interaction.sync_layout()? {
            self.interaction.emit_range_changed();
            self.interaction.host.request_repaint();
        }
        Ok(())
    }

    /// Replace the selection with logical bounds and notify.
    pub fn set_selection(&mut self, left: f64, right: f64) -> TrimResult<()> {
        self.interaction.model.set_bounds(left, right)?;
        self.interaction.frame.cancel();
        self.interaction.emit_range_changed();
        self.interaction.host.request_repaint();
        Ok(())
    }

    /// Show the playback position indicator at `position` (track pixels).
    pub fn show_playhead(&mut self, position: f64) {
        self.interaction.playhead = Some(position);
        self.interaction.host.request_repaint();
    }

    pub fn hide_playhead(&mut self) {
        self.interaction.playhead = None;
        self.interaction.host.request_repaint();
    }

    pub fn playhead(&self) -> Option<f64> {
        self.interaction.playhead
    }

    pub fn set_long_press_enabled(&mut self, enabled: bool) {
        self.recognizer.set_long_press_enabled(enabled);
    }

    pub fn phase(&self) -> ControllerPhase {
        let model = &self.interaction.model;
        let target = self.interaction.target;
        if model.is_expanded() {
            let held = target.unwrap_or(GestureTarget::None);
            if model.is_animating() {
                ControllerPhase::Expanding(held)
            } else {
                ControllerPhase::Expanded(held)
            }
        } else if model.is_animating() {
            ControllerPhase::Collapsing
        } else {
            match target {
                Some(t) => ControllerPhase::Touching(t),
                None => ControllerPhase::Idle,
            }
        }
    }

    /// Selection in logical (collapsed) pixels.
    pub fn logical_bounds(&self) -> Bounds {
        self.interaction.model.logical_bounds()
    }

    /// Selection as a media time window.
    pub fn trim_window(&self, scale: &TimeScale) -> Option<TrimWindow> {
        scale.window(self.logical_bounds())
    }

    pub fn target(&self) -> Option<GestureTarget> {
        self.interaction.target
    }

    pub fn pending_long_press(&self) -> Option<ScheduledTask> {
        self.recognizer.pending_long_press()
    }

    pub fn pending_frame(&self) -> Option<TaskToken> {
        self.interaction.frame.pending().map(|task| task.token)
    }

    pub fn model(&self) -> &RangeModel {
        &self.interaction.model
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn host(&self) -> &H {
        &self.interaction.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.interaction.host
    }

    pub fn listener(&self) -> &L {
        &self.interaction.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.interaction.listener
    }
}
