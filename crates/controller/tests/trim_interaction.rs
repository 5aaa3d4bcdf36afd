use std::path::PathBuf;

use proptest::prelude::*;

use trimview_common::clock::{ScheduledTask, TaskToken};
use trimview_common::config::TrimmerConfig;
use trimview_common::error::TrimError;
use trimview_common::logging::init_test_logging;
use trimview_controller::{
    ControllerPhase, GestureTarget, TimelineHost, TrimListener, TrimRangeController,
};
use trimview_gesture::event::parse_events;
use trimview_gesture::{Point, PointerAction, PointerEvent};
use trimview_range_model::Bounds;

#[derive(Debug, Default)]
struct RecordingHost {
    width: f64,
    min_width: f64,
    max_width: f64,
    repaints: usize,
    frames: Vec<TaskToken>,
    timers: Vec<ScheduledTask>,
}

impl TimelineHost for RecordingHost {
    fn track_width_pixels(&self) -> f64 {
        self.width
    }
    fn track_height_pixels(&self) -> f64 {
        60.0
    }
    fn min_trim_width_pixels(&self) -> f64 {
        self.min_width
    }
    fn max_trim_width_pixels(&self) -> f64 {
        self.max_width
    }
    fn request_repaint(&mut self) {
        self.repaints += 1;
    }
    fn request_animation_frame(&mut self, token: TaskToken) {
        self.frames.push(token);
    }
    fn schedule_long_press(&mut self, task: ScheduledTask) {
        self.timers.push(task);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Note {
    Range(f64, f64),
    ZoomEnter(f64),
    ZoomExit,
}

#[derive(Debug, Default)]
struct Notes(Vec<Note>);

impl Notes {
    fn zoom_enters(&self) -> usize {
        self.0.iter().filter(|n| matches!(n, Note::ZoomEnter(_))).count()
    }

    fn zoom_exits(&self) -> usize {
        self.0.iter().filter(|n| matches!(n, Note::ZoomExit)).count()
    }

    fn last_range(&self) -> Option<(f64, f64)> {
        self.0.iter().rev().find_map(|n| match n {
            Note::Range(l, r) => Some((*l, *r)),
            _ => None,
        })
    }
}

impl TrimListener for Notes {
    fn on_range_changed(&mut self, left: f64, right: f64) {
        self.0.push(Note::Range(left, right));
    }
    fn on_zoom_enter(&mut self, pivot: f64) {
        self.0.push(Note::ZoomEnter(pivot));
    }
    fn on_zoom_exit(&mut self) {
        self.0.push(Note::ZoomExit);
    }
}

type Controller = TrimRangeController<RecordingHost, Notes>;

/// 1000x60 track, limits 50..400, selection 25..975.
fn controller() -> Controller {
    init_test_logging();
    let host = RecordingHost {
        width: 1000.0,
        min_width: 50.0,
        max_width: 400.0,
        ..RecordingHost::default()
    };
    let mut c = TrimRangeController::new(&TrimmerConfig::default(), host, Notes::default())
        .expect("default configuration is valid");
    c.set_selection(25.0, 975.0).unwrap();
    c.listener_mut().0.clear();
    c
}

fn feed(c: &mut Controller, events: &[PointerEvent]) {
    for event in events {
        c.handle_pointer_event(event).unwrap();
    }
}

/// Drive pending frames until the animation settles.
fn settle(c: &mut Controller, mut now: u64) -> u64 {
    while let Some(token) = c.pending_frame() {
        now += 16;
        c.on_frame(token, now);
    }
    now
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn left_handle_drag_moves_left_bound() {
    let mut c = controller();
    feed(
        &mut c,
        &[
            PointerEvent::down(0, 25.0, 30.0),
            PointerEvent::moved(20, 0, 35.0, 30.0),
            PointerEvent::moved(40, 0, 55.0, 30.0),
            PointerEvent::up(60, 0, 55.0, 30.0),
        ],
    );

    assert_eq!(
        c.listener().0,
        vec![Note::Range(35.0, 975.0), Note::Range(55.0, 975.0)]
    );
    assert_eq!(c.logical_bounds(), Bounds::new(55.0, 975.0));
    assert!(!c.poll_timers(10_000));
    assert_eq!(c.phase(), ControllerPhase::Idle);
}

#[test]
fn body_drag_clamps_at_track_start_and_keeps_width() {
    let mut c = controller();
    feed(
        &mut c,
        &[
            PointerEvent::down(0, 500.0, 30.0),
            PointerEvent::moved(16, 0, -500.0, 30.0),
            PointerEvent::up(32, 0, -500.0, 30.0),
        ],
    );

    assert_eq!(c.listener().last_range(), Some((0.0, 950.0)));
    assert_eq!(c.model().bounds(), Bounds::new(0.0, 950.0));
}

#[test]
fn long_press_on_right_handle_zooms_around_it() {
    let mut c = controller();
    assert!(c
        .handle_pointer_event(&PointerEvent::down(0, 975.0, 30.0))
        .unwrap());
    assert_eq!(c.target(), Some(GestureTarget::RightHandle));

    let timer = *c.host().timers.last().expect("long-press scheduled");
    assert_eq!(timer.deadline_ms, 600);
    assert!(c.on_timer(timer.token, timer.deadline_ms));
    assert_eq!(c.listener().0, vec![Note::ZoomEnter(975.0)]);

    let anim = *c.model().animation().expect("expansion animating");
    assert_eq!(anim.end, Bounds::new(-1875.0, 975.0));

    let first = *c.host().frames.last().unwrap();
    assert!(c.on_frame(first, 750));
    // Reusing a consumed token does nothing.
    assert!(!c.on_frame(first, 760));

    settle(&mut c, 750);
    assert_eq!(c.phase(), ControllerPhase::Expanded(GestureTarget::RightHandle));
    assert_eq!(c.model().bounds(), Bounds::new(-1875.0, 975.0));
    assert_eq!(c.listener().last_range(), Some((25.0, 975.0)));
}

#[test]
fn drag_while_expanded_then_release_collapses() {
    let mut c = controller();
    c.handle_pointer_event(&PointerEvent::down(0, 975.0, 30.0))
        .unwrap();
    assert!(c.poll_timers(600));
    let now = settle(&mut c, 600);

    assert!(c
        .handle_pointer_event(&PointerEvent::moved(now + 10, 0, 945.0, 30.0))
        .unwrap());
    assert_eq!(c.model().right(), 945.0);
    assert_eq!(c.listener().last_range(), Some((25.0, 965.0)));

    c.handle_pointer_event(&PointerEvent::up(now + 20, 0, 945.0, 30.0))
        .unwrap();
    assert_eq!(c.phase(), ControllerPhase::Collapsing);
    settle(&mut c, now + 20);

    assert_eq!(c.phase(), ControllerPhase::Idle);
    assert_close(c.model().left(), 25.0);
    assert_close(c.model().right(), 965.0);
    assert_eq!(c.listener().zoom_enters(), 1);
    assert_eq!(c.listener().zoom_exits(), 1);
}

#[test]
fn release_mid_expansion_collapses_to_pre_zoom_bounds() {
    let mut c = controller();
    c.handle_pointer_event(&PointerEvent::down(0, 25.0, 30.0))
        .unwrap();
    assert!(c.poll_timers(600));
    let token = c.pending_frame().unwrap();
    c.on_frame(token, 700);

    c.handle_pointer_event(&PointerEvent::up(710, 0, 25.0, 30.0))
        .unwrap();
    settle(&mut c, 710);

    assert_close(c.model().left(), 25.0);
    assert_close(c.model().right(), 975.0);
    assert!(!c.model().is_expanded());
}

#[test]
fn body_long_press_does_not_zoom() {
    let mut c = controller();
    c.handle_pointer_event(&PointerEvent::down(0, 500.0, 30.0))
        .unwrap();
    assert!(c.poll_timers(600));
    c.handle_pointer_event(&PointerEvent::up(700, 0, 500.0, 30.0))
        .unwrap();
    assert_eq!(c.listener().zoom_enters(), 0);
    assert_eq!(c.listener().zoom_exits(), 0);
    assert!(c.pending_frame().is_none());
}

#[test]
fn cancel_before_long_press_suppresses_it() {
    let mut c = controller();
    c.handle_pointer_event(&PointerEvent::down(0, 975.0, 30.0))
        .unwrap();
    let timer = *c.host().timers.last().unwrap();
    c.handle_pointer_event(&PointerEvent::cancel(100, 0, 975.0, 30.0))
        .unwrap();

    assert!(!c.on_timer(timer.token, 600));
    assert!(!c.poll_timers(10_000));
    assert!(c.listener().0.is_empty());
    assert_eq!(c.phase(), ControllerPhase::Idle);
}

#[test]
fn cancel_while_expanded_collapses() {
    let mut c = controller();
    c.handle_pointer_event(&PointerEvent::down(0, 975.0, 30.0))
        .unwrap();
    c.poll_timers(600);
    let now = settle(&mut c, 600);

    c.handle_pointer_event(&PointerEvent::cancel(now, 0, 975.0, 30.0))
        .unwrap();
    assert_eq!(c.listener().zoom_exits(), 1);
    settle(&mut c, now);
    assert_eq!(c.phase(), ControllerPhase::Idle);
    assert_close(c.model().left(), 25.0);
}

#[test]
fn touch_outside_range_is_not_consumed() {
    let mut c = controller();
    c.set_selection(100.0, 400.0).unwrap();
    c.listener_mut().0.clear();

    assert!(!c
        .handle_pointer_event(&PointerEvent::down(0, 700.0, 30.0))
        .unwrap());
    assert_eq!(c.phase(), ControllerPhase::Touching(GestureTarget::None));
    assert!(!c
        .handle_pointer_event(&PointerEvent::moved(16, 0, 600.0, 30.0))
        .unwrap());
    c.poll_timers(600);
    assert!(c.listener().0.is_empty());
}

#[test]
fn handle_band_far_from_center_misses() {
    let mut c = controller();
    assert!(!c
        .handle_pointer_event(&PointerEvent::down(0, 25.0, 55.0))
        .unwrap());
    assert_eq!(c.target(), Some(GestureTarget::None));
}

#[test]
fn disabled_long_press_never_zooms() {
    let mut c = controller();
    c.set_long_press_enabled(false);
    c.handle_pointer_event(&PointerEvent::down(0, 975.0, 30.0))
        .unwrap();
    assert!(c.pending_long_press().is_none());
    assert!(c.host().timers.is_empty());
    assert!(!c.poll_timers(10_000));
    assert_eq!(c.listener().zoom_enters(), 0);
}

#[test]
fn second_finger_does_not_jump_the_range() {
    let mut c = controller();
    let a = Point::new(500.0, 30.0);
    feed(
        &mut c,
        &[
            PointerEvent::down(0, a.x, a.y),
            PointerEvent::with_contacts(
                PointerAction::PointerDown,
                10,
                0,
                vec![a, Point::new(600.0, 30.0)],
            ),
        ],
    );
    assert!(c.listener().0.is_empty());

    c.handle_pointer_event(&PointerEvent::with_contacts(
        PointerAction::Move,
        20,
        0,
        vec![Point::new(510.0, 30.0), Point::new(610.0, 30.0)],
    ))
    .unwrap();
    assert_eq!(c.listener().last_range(), Some((35.0, 985.0)));
}

#[test]
fn zero_width_layout_suspends_dragging() {
    let mut c = controller();
    c.host_mut().width = 0.0;
    c.on_resize().unwrap();
    assert!(c.model().is_degenerate());

    feed(
        &mut c,
        &[
            PointerEvent::down(0, 500.0, 30.0),
            PointerEvent::moved(16, 0, 400.0, 30.0),
            PointerEvent::up(32, 0, 400.0, 30.0),
        ],
    );
    assert!(c.listener().0.is_empty());
    assert_eq!(c.logical_bounds(), Bounds::new(25.0, 975.0));

    c.host_mut().width = 1000.0;
    c.on_resize().unwrap();
    assert!(!c.model().is_degenerate());
}

#[test]
fn resize_rescales_selection_and_notifies() {
    let mut c = controller();
    c.host_mut().width = 500.0;
    c.on_resize().unwrap();
    assert_eq!(c.listener().0, vec![Note::Range(12.5, 487.5)]);
}

#[test]
fn host_limit_change_applies_on_next_down() {
    let mut c = controller();
    c.set_selection(300.0, 600.0).unwrap();
    c.host_mut().max_width = 200.0;

    feed(
        &mut c,
        &[
            PointerEvent::down(0, 600.0, 30.0),
            PointerEvent::moved(16, 0, 700.0, 30.0),
            PointerEvent::up(32, 0, 700.0, 30.0),
        ],
    );
    assert_eq!(c.model().max_width(), 200.0);
    assert_eq!(c.logical_bounds(), Bounds::new(300.0, 600.0));
}

#[test]
fn resize_refreshes_limits_without_width_change() {
    let mut c = controller();
    c.host_mut().min_width = 80.0;
    c.on_resize().unwrap();
    assert_eq!(c.model().min_width(), 80.0);
    assert!(c.listener().0.is_empty());
}

#[test]
fn empty_contact_set_poisons_controller() {
    let mut c = controller();
    let bad = PointerEvent::with_contacts(PointerAction::Move, 0, 0, Vec::new());
    let err = c.handle_pointer_event(&bad).unwrap_err();
    assert!(matches!(err, TrimError::InputContract { .. }));
    assert!(err.is_fatal());

    let err = c
        .handle_pointer_event(&PointerEvent::down(10, 500.0, 30.0))
        .unwrap_err();
    assert!(matches!(err, TrimError::Poisoned { .. }));
}

#[test]
fn pointer_up_without_gesture_is_rejected() {
    let mut c = controller();
    let stray = PointerEvent::pointer_up(
        0,
        0,
        vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
        1,
    );
    assert!(c.handle_pointer_event(&stray).is_err());
    assert!(c.recognizer().is_poisoned());
}

#[test]
fn recorded_fixture_replays_left_handle_drag() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("left-handle-drag.jsonl");
    let content = std::fs::read_to_string(path).expect("fixture should be readable");
    let events = parse_events(&content).expect("fixture should parse");

    let mut c = controller();
    for event in &events {
        c.handle_pointer_event(event).unwrap();
        c.poll_timers(event.time_ms);
    }
    assert_eq!(c.logical_bounds(), Bounds::new(55.0, 975.0));
    assert_eq!(c.listener().zoom_enters(), 0);
}

proptest! {
    #[test]
    fn prop_handle_drags_keep_limits(
        steps in prop::collection::vec(-300.0f64..300.0, 1..20),
        grab_left in any::<bool>(),
    ) {
        let mut c = controller();
        c.set_selection(300.0, 600.0).unwrap();
        let start_x = if grab_left { 300.0 } else { 600.0 };
        c.handle_pointer_event(&PointerEvent::down(0, start_x, 30.0)).unwrap();

        let mut x = start_x;
        for (i, dx) in steps.into_iter().enumerate() {
            x += dx;
            let t = 10 * (i as u64 + 1);
            c.handle_pointer_event(&PointerEvent::moved(t, 0, x, 30.0)).unwrap();
            let b = c.logical_bounds();
            prop_assert!(b.width() >= 50.0 - 1e-6 && b.width() <= 400.0 + 1e-6);
            prop_assert!(b.left >= -1e-6 && b.right <= 1000.0 + 1e-6);
        }
    }
}
