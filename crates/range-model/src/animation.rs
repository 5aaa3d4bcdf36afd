//! Pixel intervals and their linear animation.

use serde::{Deserialize, Serialize};

use trimview_common::clock::TimestampMs;

/// A `[left, right]` interval in track pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
}

impl Bounds {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Scale both bounds linearly around `pivot`.
    pub fn scaled_around(&self, pivot: f64, factor: f64) -> Bounds {
        Bounds {
            left: pivot + (self.left - pivot) * factor,
            right: pivot + (self.right - pivot) * factor,
        }
    }

    /// Inverse of [`Bounds::scaled_around`]: divide distances from `pivot` by `factor`.
    pub fn unscaled_around(&self, pivot: f64, factor: f64) -> Bounds {
        Bounds {
            left: pivot + (self.left - pivot) / factor,
            right: pivot + (self.right - pivot) / factor,
        }
    }

    /// Translate both bounds by `delta`.
    pub fn shifted(&self, delta: f64) -> Bounds {
        Bounds {
            left: self.left + delta,
            right: self.right + delta,
        }
    }

    /// Linearly interpolate between two intervals.
    pub fn lerp(a: &Bounds, b: &Bounds, t: f64) -> Bounds {
        let t = t.clamp(0.0, 1.0);
        Bounds {
            left: a.left + (b.left - a.left) * t,
            right: a.right + (b.right - a.right) * t,
        }
    }
}

/// A fixed-duration linear transition between two intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsAnimation {
    pub start: Bounds,
    pub end: Bounds,
    pub start_time_ms: TimestampMs,
    pub duration_ms: TimestampMs,
}

impl BoundsAnimation {
    pub fn new(
        start: Bounds,
        end: Bounds,
        start_time_ms: TimestampMs,
        duration_ms: TimestampMs,
    ) -> Self {
        Self {
            start,
            end,
            start_time_ms,
            duration_ms,
        }
    }

    /// Progress in `[0, 1]` at `now_ms`. Zero-length animations are complete immediately.
    pub fn progress(&self, now_ms: TimestampMs) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_time_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }

    pub fn is_finished(&self, now_ms: TimestampMs) -> bool {
        now_ms.saturating_sub(self.start_time_ms) >= self.duration_ms
    }

    /// Interpolated bounds at `now_ms`; exactly `end` once finished.
    pub fn sample(&self, now_ms: TimestampMs) -> Bounds {
        if self.is_finished(now_ms) {
            self.end
        } else {
            Bounds::lerp(&self.start, &self.end, self.progress(now_ms))
        }
    }
}
