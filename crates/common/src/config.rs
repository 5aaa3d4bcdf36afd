//! Trimmer configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clock::TimestampMs;
use crate::error::{TrimError, TrimResult};

/// Global trimmer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrimmerConfig {
    /// Gesture recognition thresholds.
    pub gesture: GestureConfig,

    /// Range interaction parameters.
    pub range: RangeConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Thresholds used to tell taps, drags, and long-presses apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Distance (pixels) a contact may wander before a drag is recognized.
    pub touch_slop_px: f64,

    /// Time a press must last before it stops being a tap (ms).
    pub tap_timeout_ms: TimestampMs,

    /// Additional hold time after the tap timeout before a long-press fires (ms).
    pub long_press_timeout_ms: TimestampMs,

    /// Whether long-press detection is enabled at all.
    pub long_press_enabled: bool,
}

/// Geometry and animation parameters for the two-handle range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Hit radius around each handle (pixels).
    pub handle_radius_px: f64,

    /// Zoom multiplier applied around the pivot on long-press.
    pub expansion_factor: f64,

    /// Duration of the expand/collapse animation (ms).
    pub animation_duration_ms: TimestampMs,

    /// Gap between the track start and the initial left bound (pixels).
    pub initial_margin_px: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trimview_gesture=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop_px: 8.0,
            tap_timeout_ms: 100,
            long_press_timeout_ms: 500,
            long_press_enabled: true,
        }
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            handle_radius_px: 15.0,
            expansion_factor: 3.0,
            animation_duration_ms: 300,
            initial_margin_px: 0.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl GestureConfig {
    /// Delay between a Down and its long-press callback.
    pub fn long_press_delay_ms(&self) -> TimestampMs {
        self.tap_timeout_ms.saturating_add(self.long_press_timeout_ms)
    }

    pub fn validate(&self) -> TrimResult<()> {
        if !self.touch_slop_px.is_finite() || self.touch_slop_px < 0.0 {
            return Err(TrimError::config(format!(
                "touch slop must be a finite, non-negative distance (got {})",
                self.touch_slop_px
            )));
        }
        if self
            .tap_timeout_ms
            .checked_add(self.long_press_timeout_ms)
            .is_none()
        {
            return Err(TrimError::config(format!(
                "tap timeout {}ms plus long-press timeout {}ms overflows",
                self.tap_timeout_ms, self.long_press_timeout_ms
            )));
        }
        Ok(())
    }
}

impl RangeConfig {
    pub fn validate(&self) -> TrimResult<()> {
        if !self.handle_radius_px.is_finite() || self.handle_radius_px < 0.0 {
            return Err(TrimError::config(format!(
                "handle radius must be finite and non-negative (got {})",
                self.handle_radius_px
            )));
        }
        if !self.expansion_factor.is_finite() || self.expansion_factor < 1.0 {
            return Err(TrimError::config(format!(
                "expansion factor must be finite and at least 1 (got {})",
                self.expansion_factor
            )));
        }
        if !self.initial_margin_px.is_finite() || self.initial_margin_px < 0.0 {
            return Err(TrimError::config(format!(
                "initial margin must be finite and non-negative (got {})",
                self.initial_margin_px
            )));
        }
        Ok(())
    }
}

impl TrimmerConfig {
    /// Check every section, failing on the first invalid value.
    pub fn validate(&self) -> TrimResult<()> {
        self.gesture.validate()?;
        self.range.validate()
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json_str(json: &str) -> TrimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn from_path(path: &Path) -> TrimResult<Self> {
        if !path.exists() {
            return Err(TrimError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Save config to the standard location.
    pub fn save(&self) -> TrimResult<()> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("trimview").join("config.json")
}
