//! Aurora Dia Core Runtime
//!
//! Foundational primitives shared by the mascot crates:
//!
//! - **Scheduler**: a single-threaded, cooperative event loop with a virtual
//!   clock. Timers and next-frame callbacks are the only way work is deferred.
//! - **Emitters**: listener registries that hand out [`Subscription`] disposers
//!   instead of relying on process-wide listener singletons.
//! - **State Machines**: small typed transition tables for lifecycle and
//!   motion states.
//!
//! # Example
//!
//! ```rust
//! use dia_core::{Scheduler, TimerSlot};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let scheduler = Scheduler::new();
//! let fired = Rc::new(Cell::new(0));
//!
//! let mut slot = TimerSlot::new(scheduler.clone());
//! let counter = fired.clone();
//! slot.schedule(100, move || counter.set(counter.get() + 1));
//!
//! // Rescheduling replaces the pending countdown
//! let counter = fired.clone();
//! slot.schedule(100, move || counter.set(counter.get() + 10));
//!
//! scheduler.advance(100);
//! assert_eq!(fired.get(), 10);
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod scheduler;

pub use error::{DiaError, Result};
pub use events::{Emitter, ListenerId, PointerEvent, Rect, Subscription};
pub use fsm::{StateMachine, StateMachineBuilder, Transition};
pub use scheduler::{FrameId, FrameSlot, Scheduler, TimerId, TimerSlot, DEFAULT_FRAME_MS};
