//! Pointer event types for the raw multi-touch input stream.
//!
//! Events can be recorded in append-only JSONL form (one event per line,
//! `#` lines are comments) so interaction bugs can be replayed offline.

use serde::{Deserialize, Serialize};

use trimview_common::clock::TimestampMs;
use trimview_common::error::{TrimError, TrimResult};

/// A position in track pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// What happened at this instant of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    /// First contact touched down; starts a gesture.
    Down,
    /// An additional contact touched down during a gesture.
    PointerDown,
    /// One of several contacts lifted; the others remain.
    PointerUp,
    /// One or more contacts moved.
    Move,
    /// The last contact lifted; ends the gesture.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

/// One sample of the pointer stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Monotonic milliseconds.
    #[serde(rename = "t")]
    pub time_ms: TimestampMs,

    /// Timestamp of the Down that started this gesture.
    #[serde(rename = "down_t")]
    pub down_time_ms: TimestampMs,

    pub action: PointerAction,

    /// Active contacts, indexed by pointer id.
    pub contacts: Vec<Point>,

    /// Index of the contact that lifted, for `PointerUp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_index: Option<usize>,
}

impl PointerEvent {
    /// Single-contact event with an explicit action.
    pub fn single(
        action: PointerAction,
        time_ms: TimestampMs,
        down_time_ms: TimestampMs,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            time_ms,
            down_time_ms,
            action,
            contacts: vec![Point::new(x, y)],
            action_index: None,
        }
    }

    /// Create a Down event; it starts its own gesture.
    pub fn down(time_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::single(PointerAction::Down, time_ms, time_ms, x, y)
    }

    pub fn moved(time_ms: TimestampMs, down_time_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::single(PointerAction::Move, time_ms, down_time_ms, x, y)
    }

    pub fn up(time_ms: TimestampMs, down_time_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::single(PointerAction::Up, time_ms, down_time_ms, x, y)
    }

    pub fn cancel(time_ms: TimestampMs, down_time_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::single(PointerAction::Cancel, time_ms, down_time_ms, x, y)
    }

    /// Multi-contact event.
    pub fn with_contacts(
        action: PointerAction,
        time_ms: TimestampMs,
        down_time_ms: TimestampMs,
        contacts: Vec<Point>,
    ) -> Self {
        Self {
            time_ms,
            down_time_ms,
            action,
            contacts,
            action_index: None,
        }
    }

    /// A `PointerUp` where contact `lifted` leaves the surface.
    pub fn pointer_up(
        time_ms: TimestampMs,
        down_time_ms: TimestampMs,
        contacts: Vec<Point>,
        lifted: usize,
    ) -> Self {
        Self {
            time_ms,
            down_time_ms,
            action: PointerAction::PointerUp,
            contacts,
            action_index: Some(lifted),
        }
    }

    /// Position of the first contact, if any.
    pub fn position(&self) -> Option<Point> {
        self.contacts.first().copied()
    }

    /// Centroid of the active contacts, excluding one that is lifting.
    ///
    /// Fails when no contact remains to average over.
    pub fn focal_point(&self) -> TrimResult<Point> {
        let skip = match self.action {
            PointerAction::PointerUp => {
                let index = self.action_index.ok_or_else(|| {
                    TrimError::input_contract("PointerUp without the index of the lifting contact")
                })?;
                if index >= self.contacts.len() {
                    return Err(TrimError::input_contract(format!(
                        "PointerUp lifts contact {index} but only {} are active",
                        self.contacts.len()
                    )));
                }
                Some(index)
            }
            _ => None,
        };

        let (sum, count) = self
            .contacts
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .fold((Point::default(), 0usize), |(acc, n), (_, p)| {
                (Point::new(acc.x + p.x, acc.y + p.y), n + 1)
            });

        if count == 0 {
            return Err(TrimError::input_contract(format!(
                "{:?} event at t={} has no active contacts",
                self.action, self.time_ms
            )));
        }

        Ok(Point::new(sum.x / count as f64, sum.y / count as f64))
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[PointerEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
