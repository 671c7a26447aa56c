//! Cooperative scheduler
//!
//! A single-threaded event loop with a virtual millisecond clock. Work is
//! deferred either as a timer (fires once the clock reaches its due time) or
//! as a next-frame callback (fires on the next [`Scheduler::run_frame`]).
//! Every scheduled callback can be cancelled through the id it was issued.
//!
//! The host drives the loop: `advance` moves the clock and fires due timers,
//! `run_frame` flushes the frame queue. `advance_with_frames` interleaves the
//! two the way a display-synced loop would.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

new_key_type! {
    pub struct TimerId;
    pub struct FrameId;
}

/// Default frame interval used by hosts that don't supply their own (≈60 Hz)
pub const DEFAULT_FRAME_MS: u64 = 16;

type Callback = Box<dyn FnOnce()>;

struct Timer {
    due_ms: u64,
    seq: u64,
    callback: Callback,
}

struct FrameCallback {
    seq: u64,
    callback: Callback,
}

struct SchedulerInner {
    now_ms: u64,
    /// Monotonic counter so equal due times fire in scheduling order
    seq: u64,
    frame_count: u64,
    timers: SlotMap<TimerId, Timer>,
    frames: SlotMap<FrameId, FrameCallback>,
}

impl SchedulerInner {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

/// Handle to the event loop; clones share the same queue and clock
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now_ms: 0,
                seq: 0,
                frame_count: 0,
                timers: SlotMap::with_key(),
                frames: SlotMap::with_key(),
            })),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame_count
    }

    // ========== Timers ==========

    /// Schedule `callback` to run once `delay_ms` has elapsed
    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let due_ms = inner.now_ms.saturating_add(delay_ms);
        let seq = inner.next_seq();
        inner.timers.insert(Timer {
            due_ms,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        // Drop the callback outside the borrow; it may own handles that
        // cancel other work on drop.
        let removed = self.inner.borrow_mut().timers.remove(id);
        removed.is_some()
    }

    pub fn has_timer(&self, id: TimerId) -> bool {
        self.inner.borrow().timers.contains_key(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    // ========== Frames ==========

    /// Queue `callback` for the next frame
    pub fn request_frame<F>(&self, callback: F) -> FrameId
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq();
        inner.frames.insert(FrameCallback {
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a queued frame callback. Returns false if it already ran.
    pub fn cancel_frame(&self, id: FrameId) -> bool {
        let removed = self.inner.borrow_mut().frames.remove(id);
        removed.is_some()
    }

    pub fn has_frame(&self, id: FrameId) -> bool {
        self.inner.borrow().frames.contains_key(id)
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    // ========== Driving the loop ==========

    /// Move the clock forward by `ms`, firing due timers in order
    ///
    /// Timers scheduled by a callback that fall due within the window fire in
    /// the same call. Returns the number of timers fired.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms().saturating_add(ms);
        let mut fired = 0;

        loop {
            let next = {
                let inner = self.inner.borrow();
                inner
                    .timers
                    .iter()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.seq))
                    .map(|(id, _)| id)
            };
            let Some(id) = next else {
                break;
            };

            let timer = {
                let mut inner = self.inner.borrow_mut();
                let Some(timer) = inner.timers.remove(id) else {
                    break;
                };
                inner.now_ms = inner.now_ms.max(timer.due_ms);
                timer
            };

            (timer.callback)();
            fired += 1;
        }

        let mut inner = self.inner.borrow_mut();
        inner.now_ms = inner.now_ms.max(target);
        fired
    }

    /// Run every frame callback queued before this call
    ///
    /// Callbacks requested while the frame runs are deferred to the next
    /// frame; callbacks cancelled mid-frame are skipped. Returns the number
    /// of callbacks run.
    pub fn run_frame(&self) -> usize {
        let queued: SmallVec<[FrameId; 8]> = {
            let mut inner = self.inner.borrow_mut();
            inner.frame_count += 1;
            let mut order: SmallVec<[(u64, FrameId); 8]> =
                inner.frames.iter().map(|(id, f)| (f.seq, id)).collect();
            order.sort_unstable_by_key(|(seq, _)| *seq);
            order.into_iter().map(|(_, id)| id).collect()
        };

        let mut ran = 0;
        for id in queued {
            let frame = self.inner.borrow_mut().frames.remove(id);
            if let Some(frame) = frame {
                (frame.callback)();
                ran += 1;
            }
        }
        ran
    }

    /// Advance `total_ms` in steps of `frame_ms`, running a frame after each step
    pub fn advance_with_frames(&self, total_ms: u64, frame_ms: u64) {
        let frame_ms = frame_ms.max(1);
        let mut remaining = total_ms;
        while remaining > 0 {
            let step = remaining.min(frame_ms);
            self.advance(step);
            self.run_frame();
            remaining -= step;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now_ms", &inner.now_ms)
            .field("timers", &inner.timers.len())
            .field("frames", &inner.frames.len())
            .finish()
    }
}

/// Single-slot timer handle
///
/// Holds at most one pending countdown. Scheduling replaces (cancels) the
/// previous one, and dropping the slot cancels whatever is pending.
pub struct TimerSlot {
    scheduler: Scheduler,
    pending: Option<TimerId>,
}

impl TimerSlot {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Cancel any pending countdown and start a new one
    pub fn schedule<F>(&mut self, delay_ms: u64, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();
        self.pending = Some(self.scheduler.set_timeout(delay_ms, callback));
    }

    /// Cancel the pending countdown, if any
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(id) => self.scheduler.clear_timeout(id),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some_and(|id| self.scheduler.has_timer(id))
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TimerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerSlot")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Single-slot next-frame handle
///
/// Requesting a frame replaces any callback still queued from an earlier
/// request, so only the latest one runs.
pub struct FrameSlot {
    scheduler: Scheduler,
    pending: Option<FrameId>,
}

impl FrameSlot {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    pub fn request<F>(&mut self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();
        self.pending = Some(self.scheduler.request_frame(callback));
    }

    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(id) => self.scheduler.cancel_frame(id),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some_and(|id| self.scheduler.has_frame(id))
    }
}

impl Drop for FrameSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for FrameSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSlot")
            .field("pending", &self.is_pending())
            .finish()
    }
}
