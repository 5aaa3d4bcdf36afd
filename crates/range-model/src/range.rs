//! The two-handle trim range.
//!
//! Bounds live in *display* coordinates: identical to track pixels while
//! collapsed, scaled by the expansion factor around the pivot while expanded.
//! [`RangeModel::logical_bounds`] maps back to the collapsed space, which is
//! what the hosting application sees.
//!
//! Moves always apply to the *target* interval: the animation's end bounds
//! while an animation is in flight, the displayed bounds otherwise. That way a
//! drag that starts during the zoom-in lands where the finger leads once the
//! animation settles.

use trimview_common::clock::TimestampMs;
use trimview_common::config::RangeConfig;
use trimview_common::error::{TrimError, TrimResult};

use crate::animation::{Bounds, BoundsAnimation};

/// Standard interval clamp. When `min > max`, `min` wins.
pub fn clamp(min: f64, max: f64, value: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Selection state of the trimmer.
#[derive(Debug, Clone)]
pub struct RangeModel {
    track_width: f64,
    /// Set while the host reports a non-positive width mid-resize.
    degenerate: bool,
    min_width: f64,
    max_width: f64,
    expansion_factor: f64,
    animation_duration_ms: TimestampMs,
    bounds: Bounds,
    is_expanded: bool,
    pivot: f64,
    animation: Option<BoundsAnimation>,
}

fn validate_width_limits(min_width: f64, max_width: f64) -> TrimResult<()> {
    if !min_width.is_finite() || !max_width.is_finite() || min_width < 0.0 {
        return Err(TrimError::config(format!(
            "width limits must be finite and non-negative (got {min_width}..{max_width})"
        )));
    }
    if min_width > max_width {
        return Err(TrimError::config(format!(
            "minimum width {min_width} exceeds maximum width {max_width}"
        )));
    }
    Ok(())
}

impl RangeModel {
    /// Create a model spanning `initial_margin_px` from the track start up to
    /// `max_width` (or the opposite margin, whichever comes first).
    pub fn new(
        track_width: f64,
        min_width: f64,
        max_width: f64,
        config: &RangeConfig,
    ) -> TrimResult<Self> {
        config.validate()?;
        validate_width_limits(min_width, max_width)?;
        if !track_width.is_finite() || track_width <= 0.0 {
            return Err(TrimError::config(format!(
                "track width must be positive (got {track_width})"
            )));
        }

        let margin = config.initial_margin_px;
        let max_right = track_width - margin;
        if max_right - margin < min_width {
            return Err(TrimError::config(format!(
                "track of {track_width}px with {margin}px margins cannot hold the {min_width}px minimum width"
            )));
        }
        let left = margin;
        let right = (left + max_width).min(max_right);

        Ok(Self {
            track_width,
            degenerate: false,
            min_width,
            max_width,
            expansion_factor: config.expansion_factor,
            animation_duration_ms: config.animation_duration_ms,
            bounds: Bounds::new(left, right),
            is_expanded: false,
            pivot: 0.0,
            animation: None,
        })
    }

    /// Replace the host-supplied width limits (collapsed pixels).
    pub fn set_width_limits(&mut self, min_width: f64, max_width: f64) -> TrimResult<()> {
        validate_width_limits(min_width, max_width)?;
        self.min_width = min_width;
        self.max_width = max_width;
        Ok(())
    }

    /// Restore a selection given in logical (collapsed) coordinates.
    ///
    /// Only track containment is checked; width limits are enforced by later
    /// moves, which never push an out-of-limit width further out.
    pub fn set_bounds(&mut self, left: f64, right: f64) -> TrimResult<()> {
        if !(0.0 <= left && left <= right && right <= self.track_width) {
            return Err(TrimError::config(format!(
                "bounds {left}..{right} do not fit a {}px track",
                self.track_width
            )));
        }
        let logical = Bounds::new(left, right);
        let display = if self.is_expanded {
            logical.scaled_around(self.pivot, self.expansion_factor)
        } else {
            logical
        };
        self.animation = None;
        self.bounds = display;
        Ok(())
    }

    /// Follow a layout change. A non-positive width marks the model degenerate
    /// (every move becomes a no-op) until a positive width arrives; positive
    /// widths rescale the selection proportionally.
    pub fn resize_track(&mut self, track_width: f64) -> bool {
        if !track_width.is_finite() || track_width <= 0.0 {
            if !self.degenerate {
                tracing::debug!(track_width, "Track collapsed to zero width; movement suspended");
            }
            self.degenerate = true;
            return false;
        }

        let ratio = track_width / self.track_width;
        self.degenerate = false;
        if (ratio - 1.0).abs() < f64::EPSILON {
            return false;
        }

        self.track_width = track_width;
        self.pivot *= ratio;
        self.bounds = Bounds::new(self.bounds.left * ratio, self.bounds.right * ratio);
        if let Some(anim) = self.animation.as_mut() {
            anim.start = Bounds::new(anim.start.left * ratio, anim.start.right * ratio);
            anim.end = Bounds::new(anim.end.left * ratio, anim.end.right * ratio);
        }
        true
    }

    /// Minimum width in display coordinates.
    pub fn current_min_width(&self) -> f64 {
        if self.is_expanded {
            self.min_width * self.expansion_factor
        } else {
            self.min_width
        }
    }

    /// Maximum width in display coordinates.
    pub fn current_max_width(&self) -> f64 {
        if self.is_expanded {
            self.max_width * self.expansion_factor
        } else {
            self.max_width
        }
    }

    /// Start of the track in display coordinates.
    pub fn track_start(&self) -> f64 {
        if self.is_expanded {
            self.pivot - self.pivot * self.expansion_factor
        } else {
            0.0
        }
    }

    /// End of the track in display coordinates.
    pub fn track_end(&self) -> f64 {
        if self.is_expanded {
            self.pivot + (self.track_width - self.pivot) * self.expansion_factor
        } else {
            self.track_width
        }
    }

    /// Move the left handle by `-distance`. Returns false when suspended.
    pub fn move_left(&mut self, distance: f64) -> bool {
        if self.degenerate {
            return false;
        }
        let (min_w, max_w, start) = (
            self.current_min_width(),
            self.current_max_width(),
            self.track_start(),
        );
        let b = self.target_mut();
        let lower = (b.right - max_w).min(b.left).max(start);
        let upper = (b.right - min_w).max(b.left);
        b.left = clamp(lower, upper, b.left - distance);
        true
    }

    /// Move the right handle by `-distance`. Returns false when suspended.
    pub fn move_right(&mut self, distance: f64) -> bool {
        if self.degenerate {
            return false;
        }
        let (min_w, max_w, end) = (
            self.current_min_width(),
            self.current_max_width(),
            self.track_end(),
        );
        let b = self.target_mut();
        let lower = (b.left + min_w).min(b.right);
        let upper = (b.left + max_w).max(b.right).min(end);
        b.right = clamp(lower, upper, b.right - distance);
        true
    }

    /// Translate the whole interval by `-distance` without leaving the track.
    ///
    /// Each bound is clamped on its own; the smaller of the two resulting
    /// shifts is applied to both so the width never changes.
    pub fn move_both(&mut self, distance: f64) -> bool {
        if self.degenerate {
            return false;
        }
        let (start, end) = (self.track_start(), self.track_end());
        let b = self.target_mut();
        let new_left = clamp(start, end, b.left - distance);
        let new_right = clamp(start, end, b.right - distance);

        let sign = if distance > 0.0 { 1.0 } else { -1.0 };
        let allowed = (new_left - b.left).abs().min((new_right - b.right).abs()) * sign;
        *b = b.shifted(-allowed);
        true
    }

    /// Zoom in around `pivot` (display coordinates). No-op when already expanded.
    pub fn begin_expansion(&mut self, pivot: f64, now_ms: TimestampMs) -> bool {
        if self.is_expanded {
            return false;
        }
        let end = self.target().scaled_around(pivot, self.expansion_factor);
        self.pivot = pivot;
        self.is_expanded = true;
        self.start_animation(end, now_ms);
        true
    }

    /// Zoom back out around the stored pivot. No-op when not expanded.
    pub fn begin_collapse(&mut self, now_ms: TimestampMs) -> bool {
        if !self.is_expanded {
            return false;
        }
        let end = self
            .target()
            .unscaled_around(self.pivot, self.expansion_factor);
        self.is_expanded = false;
        self.start_animation(end, now_ms);
        true
    }

    fn start_animation(&mut self, end: Bounds, now_ms: TimestampMs) {
        self.animation = Some(BoundsAnimation::new(
            self.bounds,
            end,
            now_ms,
            self.animation_duration_ms,
        ));
    }

    /// Advance the animation to `now_ms`. Returns whether it is still running;
    /// on completion the bounds snap exactly to the end values.
    pub fn step_animation(&mut self, now_ms: TimestampMs) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        self.bounds = anim.sample(now_ms);
        if anim.is_finished(now_ms) {
            self.animation = None;
            false
        } else {
            true
        }
    }

    /// Bounds the model is heading to: the animation end, or the current bounds.
    pub fn target(&self) -> Bounds {
        self.animation.map_or(self.bounds, |a| a.end)
    }

    fn target_mut(&mut self) -> &mut Bounds {
        match self.animation.as_mut() {
            Some(anim) => &mut anim.end,
            None => &mut self.bounds,
        }
    }

    /// Target bounds mapped back to collapsed coordinates.
    pub fn logical_bounds(&self) -> Bounds {
        let target = self.target();
        if self.is_expanded {
            target.unscaled_around(self.pivot, self.expansion_factor)
        } else {
            target
        }
    }

    /// Currently displayed bounds (interpolated while animating).
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn left(&self) -> f64 {
        self.bounds.left
    }

    pub fn right(&self) -> f64 {
        self.bounds.right
    }

    pub fn pivot(&self) -> f64 {
        self.pivot
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&BoundsAnimation> {
        self.animation.as_ref()
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    pub fn expansion_factor(&self) -> f64 {
        self.expansion_factor
    }
}
