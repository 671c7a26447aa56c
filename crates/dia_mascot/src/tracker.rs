//! Eye tracking
//!
//! Pointer samples are coalesced per frame: a newer sample replaces any
//! sample still waiting for the next frame, so at most one offset is computed
//! per frame. The anchor rectangle is resolved when the frame runs.
//!
//! Motion state:
//!
//! ```text
//! Idle --emit--> Moving --emit--> Moving
//!   ^                |
//!   +--idle timeout--+
//! ```
//!
//! Every emitted offset restarts the idle countdown. When it expires the
//! offset returns to zero and the moving flag clears, in one update.

use dia_core::{
    DiaError, Emitter, FrameSlot, PointerEvent, Rect, Scheduler, StateMachine, Subscription,
    TimerSlot,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Horizontal damping divisor
pub const DEFAULT_DIVISOR_X: f64 = 100.0;
/// Vertical damping divisor; larger than horizontal so vertical travel is damped more
pub const DEFAULT_DIVISOR_Y: f64 = 120.0;
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 2000;

/// Eye displacement in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

impl PointerOffset {
    pub const ZERO: PointerOffset = PointerOffset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Scale down to at most `max` pixels, keeping direction
    pub fn clamp_magnitude(self, max: f64) -> Self {
        let magnitude = self.magnitude();
        if magnitude <= max || magnitude == 0.0 {
            return self;
        }
        let scale = max / magnitude;
        Self::new(self.x * scale, self.y * scale)
    }

    /// CSS transform applied to both eyes
    pub fn to_css_transform(&self) -> String {
        if self.is_zero() {
            "translateY(0) translateX(0)".to_string()
        } else {
            format!("translateY({}px) translateX({}px)", self.y, self.x)
        }
    }
}

/// Tracker tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub divisor_x: f64,
    pub divisor_y: f64,
    pub idle_timeout_ms: u64,
    /// Upper bound on offset length; unbounded when `None`
    pub max_magnitude: Option<f64>,
}

impl TrackerConfig {
    /// Replace unusable divisors with the defaults
    fn sanitized(mut self) -> Self {
        if !(self.divisor_x.is_finite() && self.divisor_x > 0.0) {
            tracing::warn!("invalid divisor_x {}, using {}", self.divisor_x, DEFAULT_DIVISOR_X);
            self.divisor_x = DEFAULT_DIVISOR_X;
        }
        if !(self.divisor_y.is_finite() && self.divisor_y > 0.0) {
            tracing::warn!("invalid divisor_y {}, using {}", self.divisor_y, DEFAULT_DIVISOR_Y);
            self.divisor_y = DEFAULT_DIVISOR_Y;
        }
        if self.max_magnitude.is_some_and(|m| m.is_nan() || m < 0.0) {
            tracing::warn!("ignoring invalid max_magnitude {:?}", self.max_magnitude);
            self.max_magnitude = None;
        }
        self
    }

    /// Offset for a pointer sample relative to the anchor origin
    pub fn offset_for(&self, sample: PointerEvent, anchor: Rect) -> PointerOffset {
        let offset = PointerOffset::new(
            -(anchor.left - sample.client_x) / self.divisor_x,
            -(anchor.top - sample.client_y) / self.divisor_y,
        );
        match self.max_magnitude {
            Some(max) => offset.clamp_magnitude(max),
            None => offset,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            divisor_x: DEFAULT_DIVISOR_X,
            divisor_y: DEFAULT_DIVISOR_Y,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            max_magnitude: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    Idle,
    Moving,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum MotionEvent {
    Emit,
    IdleTimeout,
}

/// Offset and moving flag, always published together
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackerUpdate {
    pub offset: PointerOffset,
    pub moving: bool,
}

/// Supplies the anchor rectangle at frame time
pub type AnchorProvider = Rc<dyn Fn() -> Option<Rect>>;

struct TrackerState {
    config: TrackerConfig,
    anchor: AnchorProvider,
    motion: StateMachine<MotionState, MotionEvent>,
    offset: PointerOffset,
    moving: bool,
    emitted: u64,
    pending_sample: FrameSlot,
    idle: TimerSlot,
    disposed: bool,
}

struct TrackerShared {
    state: RefCell<TrackerState>,
    updates: Emitter<TrackerUpdate>,
}

impl TrackerShared {
    fn queue_sample(shared: &Rc<Self>, sample: PointerEvent) {
        let weak: Weak<Self> = Rc::downgrade(shared);
        let mut state = shared.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.pending_sample.request(move || {
            if let Some(shared) = weak.upgrade() {
                Self::process(&shared, sample);
            }
        });
    }

    fn process(shared: &Rc<Self>, sample: PointerEvent) {
        let anchor = {
            let state = shared.state.borrow();
            if state.disposed {
                return;
            }
            state.anchor.clone()
        };

        let Some(rect) = anchor() else {
            tracing::warn!("PointerTracker: {}, sample skipped", DiaError::MissingAnchor);
            return;
        };

        let update = {
            let mut state = shared.state.borrow_mut();
            let offset = state.config.offset_for(sample, rect);
            if !offset.is_finite() {
                tracing::warn!(
                    "PointerTracker: non-finite offset from {:?} against {:?}, sample skipped",
                    sample,
                    rect
                );
                return;
            }
            if offset == state.offset {
                tracing::trace!("PointerTracker: offset unchanged at {:?}", offset);
                return;
            }

            state.offset = offset;
            state.moving = true;
            state.emitted += 1;
            state.motion.send(MotionEvent::Emit);
            tracing::trace!("PointerTracker: emit {:?}", offset);

            let weak = Rc::downgrade(shared);
            let timeout = state.config.idle_timeout_ms;
            state.idle.schedule(timeout, move || {
                if let Some(shared) = weak.upgrade() {
                    Self::reset(&shared);
                }
            });

            TrackerUpdate {
                offset,
                moving: true,
            }
        };

        shared.updates.emit(&update);
    }

    fn reset(shared: &Rc<Self>) {
        let update = {
            let mut state = shared.state.borrow_mut();
            if state.disposed || !state.moving {
                return;
            }
            state.offset = PointerOffset::ZERO;
            state.moving = false;
            state.motion.send(MotionEvent::IdleTimeout);
            tracing::debug!("PointerTracker: idle, eyes reset");

            TrackerUpdate {
                offset: PointerOffset::ZERO,
                moving: false,
            }
        };

        shared.updates.emit(&update);
    }
}

/// Computes damped eye offsets from pointer movement
pub struct PointerTracker {
    shared: Rc<TrackerShared>,
    pointer: RefCell<Option<Subscription>>,
}

impl PointerTracker {
    pub fn new<F>(scheduler: Scheduler, config: TrackerConfig, anchor: F) -> Self
    where
        F: Fn() -> Option<Rect> + 'static,
    {
        let motion = StateMachine::builder(MotionState::Idle)
            .on(MotionState::Idle, MotionEvent::Emit, MotionState::Moving)
            .on(MotionState::Moving, MotionEvent::Emit, MotionState::Moving)
            .on(MotionState::Moving, MotionEvent::IdleTimeout, MotionState::Idle)
            .build();

        let state = TrackerState {
            config: config.sanitized(),
            anchor: Rc::new(anchor),
            motion,
            offset: PointerOffset::ZERO,
            moving: false,
            emitted: 0,
            pending_sample: FrameSlot::new(scheduler.clone()),
            idle: TimerSlot::new(scheduler),
            disposed: false,
        };

        Self {
            shared: Rc::new(TrackerShared {
                state: RefCell::new(state),
                updates: Emitter::new(),
            }),
            pointer: RefCell::new(None),
        }
    }

    /// Follow a pointer-move source, replacing any previous one
    pub fn attach(&self, source: &Emitter<PointerEvent>) {
        if self.is_disposed() {
            tracing::debug!("PointerTracker::attach ignored after dispose");
            return;
        }
        let weak = Rc::downgrade(&self.shared);
        let subscription = source.subscribe(move |event: &PointerEvent| {
            if let Some(shared) = weak.upgrade() {
                TrackerShared::queue_sample(&shared, *event);
            }
        });
        let previous = self.pointer.borrow_mut().replace(subscription);
        drop(previous);
    }

    /// Queue a pointer sample for the next frame
    pub fn on_pointer_move(&self, client_x: f64, client_y: f64) {
        TrackerShared::queue_sample(&self.shared, PointerEvent::new(client_x, client_y));
    }

    /// Listen for offset updates
    pub fn on_update<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&TrackerUpdate) + 'static,
    {
        self.shared.updates.subscribe(handler)
    }

    pub fn offset(&self) -> PointerOffset {
        self.shared.state.borrow().offset
    }

    pub fn is_moving(&self) -> bool {
        self.shared.state.borrow().moving
    }

    pub fn motion_state(&self) -> MotionState {
        self.shared.state.borrow().motion.current_state()
    }

    /// Number of offsets emitted so far
    pub fn emitted_count(&self) -> u64 {
        self.shared.state.borrow().emitted
    }

    pub fn config(&self) -> TrackerConfig {
        self.shared.state.borrow().config.clone()
    }

    /// Detach from the pointer source and cancel the pending frame and idle timer
    pub fn dispose(&self) {
        let pointer = self.pointer.borrow_mut().take();
        drop(pointer);

        let mut state = self.shared.state.borrow_mut();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.pending_sample.cancel();
        state.idle.cancel();
        tracing::debug!("PointerTracker disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.state.borrow().disposed
    }
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("PointerTracker")
            .field("offset", &state.offset)
            .field("moving", &state.moving)
            .field("disposed", &state.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn tracker_at(scheduler: &Scheduler, left: f64, top: f64) -> PointerTracker {
        PointerTracker::new(scheduler.clone(), TrackerConfig::default(), move || {
            Some(Rect::at(left, top))
        })
    }

    #[test]
    fn test_offset_computation() {
        let scheduler = Scheduler::new();
        let tracker = tracker_at(&scheduler, 10.0, 2.0);

        tracker.on_pointer_move(110.0, 122.0);
        assert_eq!(tracker.offset(), PointerOffset::ZERO);

        scheduler.run_frame();
        assert_eq!(tracker.offset(), PointerOffset::new(1.0, 1.0));
        assert!(tracker.is_moving());
        assert_eq!(tracker.motion_state(), MotionState::Moving);
    }

    #[test]
    fn test_same_frame_samples_coalesce() {
        let scheduler = Scheduler::new();
        let tracker = tracker_at(&scheduler, 0.0, 0.0);
        let updates = Rc::new(RefCell::new(Vec::new()));

        let u = updates.clone();
        let _sub = tracker.on_update(move |update| u.borrow_mut().push(update.offset));

        tracker.on_pointer_move(100.0, 120.0);
        tracker.on_pointer_move(200.0, 240.0);
        tracker.on_pointer_move(300.0, 360.0);
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.run_frame();
        assert_eq!(*updates.borrow(), vec![PointerOffset::new(3.0, 3.0)]);
    }

    #[test]
    fn test_identical_offset_is_suppressed() {
        let scheduler = Scheduler::new();
        let tracker = tracker_at(&scheduler, 0.0, 0.0);

        tracker.on_pointer_move(50.0, 60.0);
        scheduler.run_frame();
        tracker.on_pointer_move(50.0, 60.0);
        scheduler.run_frame();

        assert_eq!(tracker.emitted_count(), 1);
    }

    #[test]
    fn test_idle_reset() {
        let scheduler = Scheduler::new();
        let tracker = tracker_at(&scheduler, 0.0, 0.0);

        tracker.on_pointer_move(100.0, 120.0);
        scheduler.run_frame();

        scheduler.advance(1999);
        assert!(tracker.is_moving());

        scheduler.advance(1);
        assert!(!tracker.is_moving());
        assert_eq!(tracker.offset(), PointerOffset::ZERO);
        assert_eq!(tracker.motion_state(), MotionState::Idle);
    }

    #[test]
    fn test_emission_restarts_idle_countdown() {
        let scheduler = Scheduler::new();
        let tracker = tracker_at(&scheduler, 0.0, 0.0);

        tracker.on_pointer_move(100.0, 120.0);
        scheduler.run_frame();
        scheduler.advance(1500);

        tracker.on_pointer_move(200.0, 240.0);
        scheduler.run_frame();
        assert_eq!(scheduler.pending_timers(), 1);

        scheduler.advance(1500);
        assert!(tracker.is_moving());
        scheduler.advance(500);
        assert!(!tracker.is_moving());
    }

    #[test]
    fn test_missing_anchor_skips_sample() {
        let scheduler = Scheduler::new();
        let available = Rc::new(Cell::new(false));

        let a = available.clone();
        let tracker = PointerTracker::new(scheduler.clone(), TrackerConfig::default(), move || {
            a.get().then(|| Rect::at(0.0, 0.0))
        });

        tracker.on_pointer_move(100.0, 120.0);
        scheduler.run_frame();
        assert_eq!(tracker.offset(), PointerOffset::ZERO);
        assert!(!tracker.is_moving());
        assert_eq!(scheduler.pending_timers(), 0);

        available.set(true);
        tracker.on_pointer_move(100.0, 120.0);
        scheduler.run_frame();
        assert_eq!(tracker.offset(), PointerOffset::new(1.0, 1.0));
    }

    #[test]
    fn test_non_finite_sample_skipped() {
        let scheduler = Scheduler::new();
        let tracker = tracker_at(&scheduler, 0.0, 0.0);
        let updates = Rc::new(Cell::new(0));

        let u = updates.clone();
        let _sub = tracker.on_update(move |_| u.set(u.get() + 1));

        for _ in 0..3 {
            tracker.on_pointer_move(f64::NAN, 0.0);
            scheduler.run_frame();
        }
        tracker.on_pointer_move(f64::INFINITY, 120.0);
        scheduler.run_frame();

        assert_eq!(updates.get(), 0);
        assert_eq!(tracker.offset(), PointerOffset::ZERO);
        assert!(!tracker.is_moving());
        assert_eq!(scheduler.pending_timers(), 0);
        assert_eq!(tracker.offset().to_css_transform(), "translateY(0) translateX(0)");

        let nan_anchor =
            PointerTracker::new(scheduler.clone(), TrackerConfig::default(), || {
                Some(Rect::at(f64::NAN, 0.0))
            });
        nan_anchor.on_pointer_move(100.0, 120.0);
        scheduler.run_frame();
        assert_eq!(nan_anchor.emitted_count(), 0);

        // A finite sample afterwards is tracked normally
        tracker.on_pointer_move(100.0, 120.0);
        scheduler.run_frame();
        assert_eq!(tracker.offset(), PointerOffset::new(1.0, 1.0));
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn test_max_magnitude_clamps() {
        let scheduler = Scheduler::new();
        let config = TrackerConfig {
            max_magnitude: Some(5.0),
            ..Default::default()
        };
        let tracker = PointerTracker::new(scheduler.clone(), config, || Some(Rect::at(0.0, 0.0)));

        tracker.on_pointer_move(3000.0, 0.0);
        scheduler.run_frame();
        assert_eq!(tracker.offset(), PointerOffset::new(5.0, 0.0));
    }

    #[test]
    fn test_invalid_divisors_fall_back() {
        let config = TrackerConfig {
            divisor_x: 0.0,
            divisor_y: f64::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.divisor_x, DEFAULT_DIVISOR_X);
        assert_eq!(config.divisor_y, DEFAULT_DIVISOR_Y);
    }

    #[test]
    fn test_dispose_cancels_pending_work() {
        let scheduler = Scheduler::new();
        let source = Emitter::<PointerEvent>::new();
        let tracker = tracker_at(&scheduler, 0.0, 0.0);
        tracker.attach(&source);

        source.emit(&PointerEvent::new(100.0, 120.0));
        scheduler.run_frame();
        source.emit(&PointerEvent::new(200.0, 240.0));
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.pending_timers(), 1);

        tracker.dispose();
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.pending_timers(), 0);
        assert_eq!(source.listener_count(), 0);

        source.emit(&PointerEvent::new(300.0, 360.0));
        scheduler.advance_with_frames(5000, 16);
        assert_eq!(tracker.offset(), PointerOffset::new(1.0, 1.0));
        assert!(tracker.is_moving());
    }

    #[test]
    fn test_css_transform() {
        assert_eq!(
            PointerOffset::new(1.5, -2.0).to_css_transform(),
            "translateY(-2px) translateX(1.5px)"
        );
        assert_eq!(
            PointerOffset::ZERO.to_css_transform(),
            "translateY(0) translateX(0)"
        );
    }
}
