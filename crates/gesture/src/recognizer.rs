//! Down / scroll / long-press / up recognition.
//!
//! # Algorithm
//!
//! 1. **Focal point:** average of all active contacts, skipping the one that
//!    lifts on a `PointerUp` so the focus does not jump.
//! 2. **Down:** start a session anchored at the event and arm the long-press
//!    task for `down_time + tap_timeout + long_press_timeout`.
//! 3. **Move:** stay silent until the squared displacement from the down focus
//!    exceeds `touch_slop²`; from then on report every move of at least one
//!    pixel on either axis.
//! 4. **Up / Cancel:** disarm the long-press task. Up notifies the listener,
//!    Cancel does not.

use trimview_common::clock::{DeferredSlot, ScheduledTask, TaskToken, TimestampMs};
use trimview_common::config::GestureConfig;
use trimview_common::error::{TrimError, TrimResult};

use crate::event::{Point, PointerAction, PointerEvent};
use crate::GestureListener;

/// State of one touch interaction, Down through Up/Cancel.
#[derive(Debug, Clone)]
struct GestureSession {
    anchor: PointerEvent,
    down_focus: Point,
    last_focus: Point,
    always_in_tap_region: bool,
    in_long_press: bool,
}

/// The gesture recognizer.
pub struct GestureRecognizer {
    touch_slop_sq: f64,
    long_press_delay_ms: TimestampMs,
    long_press_enabled: bool,
    session: Option<GestureSession>,
    long_press: DeferredSlot,
    poisoned: Option<String>,
}

impl GestureRecognizer {
    /// Create a recognizer, validating the thresholds first.
    pub fn new(config: &GestureConfig) -> TrimResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Create a recognizer with the default thresholds.
    pub fn with_defaults() -> Self {
        Self::from_validated(&GestureConfig::default())
    }

    fn from_validated(config: &GestureConfig) -> Self {
        Self {
            touch_slop_sq: config.touch_slop_px * config.touch_slop_px,
            long_press_delay_ms: config.long_press_delay_ms(),
            long_press_enabled: config.long_press_enabled,
            session: None,
            long_press: DeferredSlot::new(),
            poisoned: None,
        }
    }

    /// Enable or disable long-press detection for future Downs.
    ///
    /// With long-press disabled a held contact can later be dragged and only
    /// scroll callbacks are delivered.
    pub fn set_long_press_enabled(&mut self, enabled: bool) {
        self.long_press_enabled = enabled;
    }

    pub fn is_long_press_enabled(&self) -> bool {
        self.long_press_enabled
    }

    /// Feed one pointer event, returning whether the listener consumed it.
    ///
    /// Contract violations (no contacts, multi-touch transitions outside a
    /// gesture) poison the recognizer: this and every later call fail.
    pub fn handle<L>(&mut self, event: &PointerEvent, listener: &mut L) -> TrimResult<bool>
    where
        L: GestureListener + ?Sized,
    {
        if let Some(reason) = &self.poisoned {
            return Err(TrimError::poisoned(reason.clone()));
        }

        let focus = match event.focal_point() {
            Ok(focus) => focus,
            Err(e) => return Err(self.poison(e)),
        };

        let handled = match event.action {
            PointerAction::Down => {
                self.long_press.cancel();
                self.session = Some(GestureSession {
                    anchor: event.clone(),
                    down_focus: focus,
                    last_focus: focus,
                    always_in_tap_region: true,
                    in_long_press: false,
                });
                if self.long_press_enabled {
                    let deadline = event.down_time_ms.saturating_add(self.long_press_delay_ms);
                    let task = self.long_press.arm(deadline);
                    tracing::trace!(
                        deadline_ms = task.deadline_ms,
                        token = task.token.generation(),
                        "Long-press armed"
                    );
                }
                tracing::debug!(x = focus.x, y = focus.y, t = event.time_ms, "Gesture down");
                listener.on_down(event)
            }

            PointerAction::PointerDown | PointerAction::PointerUp => {
                let Some(session) = self.session.as_mut() else {
                    let err = TrimError::input_contract(format!(
                        "{:?} at t={} arrived without a preceding Down",
                        event.action, event.time_ms
                    ));
                    return Err(self.poison(err));
                };
                session.down_focus = focus;
                session.last_focus = focus;
                false
            }

            PointerAction::Move => {
                let Some(session) = self.session.as_mut() else {
                    return Ok(false);
                };
                let scroll_x = session.last_focus.x - focus.x;
                let scroll_y = session.last_focus.y - focus.y;

                if session.always_in_tap_region {
                    if focus.distance_sq(&session.down_focus) > self.touch_slop_sq {
                        session.always_in_tap_region = false;
                        if self.long_press.cancel() {
                            tracing::trace!("Long-press cancelled by slop");
                        }
                        let handled = listener.on_scroll(
                            &session.anchor,
                            event,
                            scroll_x,
                            scroll_y,
                            session.in_long_press,
                        );
                        session.last_focus = focus;
                        handled
                    } else {
                        false
                    }
                } else if scroll_x.abs() >= 1.0 || scroll_y.abs() >= 1.0 {
                    let handled = listener.on_scroll(
                        &session.anchor,
                        event,
                        scroll_x,
                        scroll_y,
                        session.in_long_press,
                    );
                    session.last_focus = focus;
                    handled
                } else {
                    false
                }
            }

            PointerAction::Up => {
                self.long_press.cancel();
                if self.session.take().is_some() {
                    tracing::debug!(t = event.time_ms, "Gesture up");
                    listener.on_up();
                }
                false
            }

            PointerAction::Cancel => {
                self.long_press.cancel();
                if self.session.take().is_some() {
                    tracing::debug!(t = event.time_ms, "Gesture cancelled");
                }
                false
            }
        };

        Ok(handled)
    }

    /// The long-press task waiting to fire, for hosts that schedule timers.
    pub fn pending_long_press(&self) -> Option<ScheduledTask> {
        self.long_press.pending()
    }

    /// Deliver a scheduled long-press. Stale tokens are ignored.
    pub fn dispatch_long_press<L>(&mut self, token: TaskToken, listener: &mut L) -> bool
    where
        L: GestureListener + ?Sized,
    {
        if self.poisoned.is_some() || !self.long_press.take(token) {
            return false;
        }
        self.fire_long_press(listener)
    }

    /// Deliver the long-press if its deadline has passed at `now_ms`.
    pub fn poll_long_press<L>(&mut self, now_ms: TimestampMs, listener: &mut L) -> bool
    where
        L: GestureListener + ?Sized,
    {
        if self.poisoned.is_some() || self.long_press.take_due(now_ms).is_none() {
            return false;
        }
        self.fire_long_press(listener)
    }

    fn fire_long_press<L>(&mut self, listener: &mut L) -> bool
    where
        L: GestureListener + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.in_long_press = true;
        tracing::debug!(t = session.anchor.time_ms, "Long-press");
        listener.on_long_press(&session.anchor);
        true
    }

    /// The Down event anchoring the current gesture.
    pub fn anchor_event(&self) -> Option<&PointerEvent> {
        self.session.as_ref().map(|s| &s.anchor)
    }

    pub fn is_in_gesture(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_in_tap_region(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.always_in_tap_region)
    }

    pub fn is_in_long_press(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.in_long_press)
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    fn poison(&mut self, err: TrimError) -> TrimError {
        tracing::warn!(error = %err, "Gesture recognizer poisoned");
        self.poisoned = Some(err.to_string());
        self.long_press.cancel();
        self.session = None;
        err
    }
}
