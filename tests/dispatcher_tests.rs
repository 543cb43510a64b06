//! Frame Dispatcher Tests
//!
//! Tests for:
//! - Animation managers updated once, in registration order, before drawing
//! - Targets with empty view lists are skipped
//! - `begin_frame` backpressure skips a target without `end_frame`
//! - Renderable upsert and removal
//! - Typed manager lookup and removal

mod common;

use ember::{AnimationUpdate, FrameDispatcher, FrameSource, TargetId, ViewId};

use common::{Event, Journal, RecordingManager, RecordingRenderer, journal};

fn dispatcher(events: &Journal) -> FrameDispatcher<RecordingRenderer> {
    common::init_logger();
    FrameDispatcher::new(RecordingRenderer::new(events.clone()))
}

/// Counts its own updates; used for typed lookups.
#[derive(Debug, Default)]
struct Counter {
    updates: u32,
    last_now: f64,
}

impl AnimationUpdate for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn update(&mut self, now: f64) {
        self.updates += 1;
        self.last_now = now;
    }
}

// ============================================================================
// Render pass
// ============================================================================

#[test]
fn managers_update_in_registration_order_before_drawing() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.add_animation_manager(RecordingManager {
        label: "skeletal",
        journal: events.clone(),
    });
    dispatcher.add_animation_manager(RecordingManager {
        label: "morph",
        journal: events.clone(),
    });
    dispatcher.set_renderable(TargetId(1), [ViewId(1)]);

    assert!(dispatcher.render(0.5));

    assert_eq!(
        *events.lock(),
        vec![
            Event::Update("skeletal"),
            Event::Update("morph"),
            Event::Begin(TargetId(1)),
            Event::Render(ViewId(1)),
            Event::End,
        ]
    );
}

#[test]
fn empty_view_lists_are_not_drawn() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.set_renderable(TargetId(1), Vec::<ViewId>::new());

    assert!(!dispatcher.render(0.0));
    assert!(events.lock().is_empty());
}

#[test]
fn unready_target_is_skipped_without_end_frame() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.set_renderable(TargetId(1), [ViewId(1)]);
    dispatcher.set_renderable(TargetId(2), [ViewId(2)]);
    dispatcher.renderer().block(TargetId(1));

    assert!(dispatcher.render(0.0));
    assert_eq!(
        *events.lock(),
        vec![
            Event::Rejected(TargetId(1)),
            Event::Begin(TargetId(2)),
            Event::Render(ViewId(2)),
            Event::End,
        ]
    );
}

#[test]
fn nothing_ready_means_no_frame() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.add_animation_manager(Counter::default());
    dispatcher.set_renderable(TargetId(1), [ViewId(1)]);
    dispatcher.renderer().block(TargetId(1));

    assert!(!dispatcher.render(1.0));
    // Animation still advances even when nothing is drawn.
    assert_eq!(dispatcher.animation_manager::<Counter>().unwrap().updates, 1);

    dispatcher.renderer().unblock_all();
    assert!(dispatcher.render(1.1));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn set_renderable_replaces_the_view_list() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.set_renderable(TargetId(1), [ViewId(1), ViewId(2)]);
    dispatcher.set_renderable(TargetId(1), [ViewId(3)]);

    dispatcher.render(0.0);

    assert_eq!(
        *events.lock(),
        vec![Event::Begin(TargetId(1)), Event::Render(ViewId(3)), Event::End]
    );
    assert_eq!(dispatcher.registry().len(), 1);
}

#[test]
fn removed_renderable_is_no_longer_drawn() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.set_renderable(TargetId(1), [ViewId(1)]);

    assert!(dispatcher.remove_renderable(TargetId(1)));
    assert!(!dispatcher.remove_renderable(TargetId(1)));
    assert!(!dispatcher.render(0.0));
    assert!(events.lock().is_empty());
}

#[test]
fn registry_handle_is_shared() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    let registry = dispatcher.registry().clone();

    registry.set(TargetId(4), [ViewId(40)]);

    assert!(dispatcher.render(0.0));
    assert_eq!(events.lock().first(), Some(&Event::Begin(TargetId(4))));
}

// ============================================================================
// Manager registration
// ============================================================================

#[test]
fn typed_lookup_and_removal() {
    let events = journal();
    let mut dispatcher = dispatcher(&events);
    dispatcher.add_animation_manager(RecordingManager {
        label: "recording",
        journal: events.clone(),
    });
    dispatcher.add_animation_manager(Counter::default());

    dispatcher.render(0.75);
    let counter = dispatcher.animation_manager_mut::<Counter>().unwrap();
    assert_eq!(counter.updates, 1);
    assert!((counter.last_now - 0.75).abs() < f64::EPSILON);

    let removed = dispatcher.remove_animation_manager::<Counter>().unwrap();
    assert_eq!(removed.updates, 1);
    assert_eq!(dispatcher.animation_manager_count(), 1);
    assert!(dispatcher.animation_manager::<Counter>().is_none());
    assert!(dispatcher.remove_animation_manager::<Counter>().is_none());
}
