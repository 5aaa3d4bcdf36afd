//! Replay a recorded pointer stream through a virtual timeline.
//!
//! The virtual host fires the long-press timer and animation frames on a
//! simulated clock (one frame every 16ms) between recorded events, so a
//! replay is deterministic.

use std::path::PathBuf;

use serde::Serialize;

use trimview_common::clock::{ScheduledTask, TaskToken, TimestampMs};
use trimview_common::config::TrimmerConfig;
use trimview_controller::{TimelineHost, TrimListener, TrimRangeController};
use trimview_gesture::event::parse_events;
use trimview_gesture::PointerEvent;
use trimview_range_model::time_scale::{DEFAULT_MAX_TRIM_MS, DEFAULT_MIN_TRIM_MS};
use trimview_range_model::TimeScale;

const FRAME_INTERVAL_MS: TimestampMs = 16;

/// Geometry of the virtual timeline.
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub duration_ms: f64,
}

struct VirtualHost {
    scale: TimeScale,
    height: f64,
    repaints: usize,
    frame: Option<TaskToken>,
    long_press: Option<ScheduledTask>,
}

impl VirtualHost {
    fn width_limits(&self) -> (f64, f64) {
        self.scale
            .width_limits(DEFAULT_MIN_TRIM_MS, DEFAULT_MAX_TRIM_MS)
            .unwrap_or((0.0, 0.0))
    }
}

impl TimelineHost for VirtualHost {
    fn track_width_pixels(&self) -> f64 {
        self.scale.track_width()
    }

    fn track_height_pixels(&self) -> f64 {
        self.height
    }

    fn min_trim_width_pixels(&self) -> f64 {
        self.width_limits().0
    }

    fn max_trim_width_pixels(&self) -> f64 {
        self.width_limits().1
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn request_animation_frame(&mut self, token: TaskToken) {
        self.frame = Some(token);
    }

    fn schedule_long_press(&mut self, task: ScheduledTask) {
        self.long_press = Some(task);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Notification {
    RangeChanged { left: f64, right: f64 },
    ZoomEnter { pivot: f64 },
    ZoomExit,
}

#[derive(Default)]
struct Collector {
    pending: Vec<Notification>,
}

impl TrimListener for Collector {
    fn on_range_changed(&mut self, left: f64, right: f64) {
        self.pending.push(Notification::RangeChanged { left, right });
    }

    fn on_zoom_enter(&mut self, pivot: f64) {
        self.pending.push(Notification::ZoomEnter { pivot });
    }

    fn on_zoom_exit(&mut self) {
        self.pending.push(Notification::ZoomExit);
    }
}

#[derive(Serialize)]
struct Line<'a> {
    t: TimestampMs,
    #[serde(flatten)]
    note: &'a Notification,
}

type Controller = TrimRangeController<VirtualHost, Collector>;

/// Parse `LEFT,RIGHT` into a pixel pair.
pub fn parse_selection(value: &str) -> Result<(f64, f64), String> {
    let (left, right) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LEFT,RIGHT but got '{value}'"))?;
    let left = left
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid left bound '{left}': {e}"))?;
    let right = right
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid right bound '{right}': {e}"))?;
    Ok((left, right))
}

/// A controller driven on the simulated clock, with every notification
/// stamped by the clock time it was emitted at.
struct Replay {
    controller: Controller,
    clock: TimestampMs,
    log: Vec<(TimestampMs, Notification)>,
}

impl Replay {
    fn new(
        config: &TrimmerConfig,
        layout: &Layout,
        selection: Option<(f64, f64)>,
    ) -> anyhow::Result<Self> {
        let host = VirtualHost {
            scale: TimeScale::new(layout.duration_ms, layout.width)?,
            height: layout.height,
            repaints: 0,
            frame: None,
            long_press: None,
        };
        let mut controller = TrimRangeController::new(config, host, Collector::default())?;
        if let Some((left, right)) = selection {
            controller.set_selection(left, right)?;
            controller.listener_mut().pending.clear();
        }
        Ok(Self {
            controller,
            clock: 0,
            log: Vec::new(),
        })
    }

    fn collect(&mut self, at: TimestampMs) {
        let pending = &mut self.controller.listener_mut().pending;
        self.log.extend(pending.drain(..).map(|note| (at, note)));
    }

    /// Run the timer and frames that fall due up to `target`.
    fn advance(&mut self, target: TimestampMs) {
        if let Some(task) = self.controller.host().long_press {
            if task.deadline_ms <= target {
                self.controller.host_mut().long_press = None;
                self.clock = self.clock.max(task.deadline_ms);
                self.controller.on_timer(task.token, task.deadline_ms);
                self.collect(self.clock);
            }
        }

        while let Some(token) = self.controller.host().frame {
            let next = self.clock.saturating_add(FRAME_INTERVAL_MS);
            if next > target {
                break;
            }
            self.clock = next;
            self.controller.host_mut().frame = None;
            self.controller.on_frame(token, next);
            self.collect(next);
        }

        self.clock = self.clock.max(target);
    }

    /// Feed every event in order, then let pending animations settle.
    fn feed(&mut self, events: &[PointerEvent]) -> anyhow::Result<()> {
        self.clock = events.first().map_or(0, |e| e.time_ms);
        for event in events {
            self.advance(event.time_ms);
            self.controller
                .handle_pointer_event(event)
                .map_err(|e| anyhow::anyhow!("Replay stopped at t={}: {e}", event.time_ms))?;
            self.collect(self.clock);
        }
        self.advance(TimestampMs::MAX);
        Ok(())
    }
}

fn print_note(t: TimestampMs, note: &Notification, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(&Line { t, note })?);
        return Ok(());
    }
    match note {
        Notification::RangeChanged { left, right } => {
            println!("  t={t:>6}  range  {left:.2} .. {right:.2}")
        }
        Notification::ZoomEnter { pivot } => println!("  t={t:>6}  zoom   enter at {pivot:.2}"),
        Notification::ZoomExit => println!("  t={t:>6}  zoom   exit"),
    }
    Ok(())
}

pub fn run(
    config: &TrimmerConfig,
    script: PathBuf,
    layout: Layout,
    selection: Option<(f64, f64)>,
    json: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", script.display()))?;
    let events =
        parse_events(&content).map_err(|e| anyhow::anyhow!("Failed to parse events: {e}"))?;

    let mut replay = Replay::new(config, &layout, selection)?;
    if !json {
        println!("Replaying {} event(s) from {}", events.len(), script.display());
        let b = replay.controller.logical_bounds();
        println!("  start  {:.2} .. {:.2}", b.left, b.right);
    }
    tracing::info!(events = events.len(), script = %script.display(), "Replay started");

    let outcome = replay.feed(&events);
    for (t, note) in &replay.log {
        print_note(*t, note, json)?;
    }
    outcome?;

    let c = &replay.controller;
    let bounds = c.logical_bounds();
    tracing::info!(
        left = bounds.left,
        right = bounds.right,
        repaints = c.host().repaints,
        "Replay finished"
    );

    if !json {
        println!();
        println!("Final selection: {:.2} .. {:.2} px", bounds.left, bounds.right);
        if let Some(window) = c.trim_window(&c.host().scale) {
            println!(
                "Trim window: {:.0} .. {:.0} ms ({:.0} ms)",
                window.start_ms,
                window.end_ms,
                window.duration_ms()
            );
        }
        println!("Repaints requested: {}", c.host().repaints);
    }

    Ok(())
}
