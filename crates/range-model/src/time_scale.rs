//! Mapping between track pixels and media time.

use serde::{Deserialize, Serialize};

use trimview_common::error::{TrimError, TrimResult};

use crate::animation::Bounds;

/// Shortest trimmed clip the host normally allows (ms).
pub const DEFAULT_MIN_TRIM_MS: f64 = 1_000.0;

/// Longest trimmed clip the host normally allows (ms).
pub const DEFAULT_MAX_TRIM_MS: f64 = 15_000.0;

/// A selected span of media time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimWindow {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl TrimWindow {
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}

/// Linear scale from a track of `track_width` pixels to `duration_ms` of media.
///
/// Conversions return `None` while the track has no width (mid-layout).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    duration_ms: f64,
    track_width: f64,
}

impl TimeScale {
    pub fn new(duration_ms: f64, track_width: f64) -> TrimResult<Self> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(TrimError::config(format!(
                "media duration must be positive (got {duration_ms}ms)"
            )));
        }
        Ok(Self {
            duration_ms,
            track_width: if track_width.is_finite() { track_width } else { 0.0 },
        })
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn pixel_to_ms(&self, pixel: f64) -> Option<f64> {
        if self.track_width <= 0.0 {
            return None;
        }
        Some(pixel / self.track_width * self.duration_ms)
    }

    pub fn ms_to_pixel(&self, ms: f64) -> Option<f64> {
        if self.track_width <= 0.0 {
            return None;
        }
        Some(ms / self.duration_ms * self.track_width)
    }

    /// Pixel width limits for a clip length between `min_ms` and `max_ms`.
    pub fn width_limits(&self, min_ms: f64, max_ms: f64) -> Option<(f64, f64)> {
        Some((self.ms_to_pixel(min_ms)?, self.ms_to_pixel(max_ms)?))
    }

    /// Convert logical pixel bounds into a media time window.
    pub fn window(&self, bounds: Bounds) -> Option<TrimWindow> {
        Some(TrimWindow {
            start_ms: self.pixel_to_ms(bounds.left)?,
            end_ms: self.pixel_to_ms(bounds.right)?,
        })
    }
}
