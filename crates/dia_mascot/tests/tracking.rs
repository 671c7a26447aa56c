use dia_core::{Emitter, PointerEvent, Rect, Scheduler};
use dia_mascot::{
    MascotController, MascotOptions, MotionState, PointerOffset, PointerTracker, TrackerConfig,
    TrackerUpdate,
};
use dia_theme::AmbientPreference;
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn tracker(scheduler: &Scheduler) -> (PointerTracker, Rc<RefCell<Vec<TrackerUpdate>>>, dia_core::Subscription) {
    let tracker = PointerTracker::new(scheduler.clone(), TrackerConfig::default(), || {
        Some(Rect::at(10.0, 2.0))
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = tracker.on_update(move |update| sink.borrow_mut().push(*update));
    (tracker, seen, sub)
}

#[test]
fn emitted_offsets_never_repeat_back_to_back() {
    let scheduler = Scheduler::new();
    let (tracker, seen, _sub) = tracker(&scheduler);
    let pointer = Emitter::new();
    tracker.attach(&pointer);

    let path = [
        (110.0, 122.0),
        (110.0, 122.0),
        (111.0, 123.0),
        (210.0, 242.0),
        (210.0, 242.0),
        (10.0, 2.0),
        (10.0, 2.0),
    ];
    for (x, y) in path {
        pointer.emit(&PointerEvent::new(x, y));
        scheduler.run_frame();
    }

    let offsets: Vec<PointerOffset> = seen.borrow().iter().map(|u| u.offset).collect();
    assert!(!offsets.is_empty());
    for pair in offsets.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn burst_within_one_frame_uses_latest_sample() {
    let scheduler = Scheduler::new();
    let (tracker, seen, _sub) = tracker(&scheduler);

    for step in 0..10 {
        let step = f64::from(step);
        tracker.on_pointer_move(10.0 + step * 100.0, 2.0 + step * 120.0);
    }
    scheduler.run_frame();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].offset, PointerOffset::new(9.0, 9.0));
}

#[test]
fn idle_reset_happens_once() {
    let scheduler = Scheduler::new();
    let (tracker, seen, _sub) = tracker(&scheduler);

    tracker.on_pointer_move(110.0, 122.0);
    scheduler.run_frame();
    assert_eq!(tracker.motion_state(), MotionState::Moving);

    scheduler.advance_with_frames(10_000, 16);

    let seen = seen.borrow();
    let resets = seen.iter().filter(|u| !u.moving).count();
    assert_eq!(resets, 1);
    assert_eq!(seen.last().map(|u| u.offset), Some(PointerOffset::ZERO));
    assert_eq!(tracker.motion_state(), MotionState::Idle);
    assert!(!tracker.is_moving());
}

#[test]
fn steady_motion_postpones_reset() {
    let scheduler = Scheduler::new();
    let (tracker, _seen, _sub) = tracker(&scheduler);

    for step in 0..5 {
        let step = f64::from(step);
        tracker.on_pointer_move(110.0 + step * 100.0, 122.0);
        scheduler.run_frame();
        scheduler.advance(1500);
        assert!(tracker.is_moving());
    }

    scheduler.advance(500);
    assert!(!tracker.is_moving());
    assert_eq!(tracker.offset(), PointerOffset::ZERO);
}

#[test]
fn controller_notifies_on_eye_movement() {
    let scheduler = Scheduler::new();
    let preference = AmbientPreference::default();
    let mascot = MascotController::new(
        scheduler.clone(),
        MascotOptions::default(),
        &preference,
        || Some(Rect::at(10.0, 2.0)),
    );
    let pointer = Emitter::new();
    mascot.attach_pointer(&pointer);

    let moves = Rc::new(Cell::new(0));
    let counter = moves.clone();
    let _sub = mascot.subscribe(move |snapshot| {
        if snapshot.is_moving {
            counter.set(counter.get() + 1);
        }
    });

    pointer.emit(&PointerEvent::new(110.0, 122.0));
    scheduler.run_frame();

    let snapshot = mascot.snapshot();
    assert_eq!(moves.get(), 1);
    assert_eq!(snapshot.eye_transform(), "translateY(1px) translateX(1px)");

    scheduler.advance(2000);
    assert_eq!(mascot.snapshot().eye_transform(), "translateY(0) translateX(0)");
}

#[test]
fn missing_anchor_skips_samples() {
    let scheduler = Scheduler::new();
    let present = Rc::new(Cell::new(false));
    let flag = present.clone();
    let tracker = PointerTracker::new(scheduler.clone(), TrackerConfig::default(), move || {
        flag.get().then(|| Rect::at(10.0, 2.0))
    });

    tracker.on_pointer_move(110.0, 122.0);
    scheduler.run_frame();
    assert_eq!(tracker.emitted_count(), 0);
    assert_eq!(scheduler.pending_timers(), 0);

    present.set(true);
    tracker.on_pointer_move(110.0, 122.0);
    scheduler.run_frame();
    assert_eq!(tracker.offset(), PointerOffset::new(1.0, 1.0));
}
