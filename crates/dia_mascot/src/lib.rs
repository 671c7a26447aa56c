//! Aurora Dia Mascot
//!
//! The behavior behind the mascot: a one-shot activation lifecycle, eyes
//! that follow the pointer and settle back after a pause, and theme-driven
//! style variables that track the ambient light/dark preference.
//!
//! Rendering is out of scope. A host feeds pointer samples and drives the
//! [`Scheduler`](dia_core::Scheduler); the controller hands back
//! [`MascotSnapshot`]s describing what to draw.
//!
//! # Example
//!
//! ```rust
//! use dia_core::{Rect, Scheduler};
//! use dia_mascot::{ActivationState, MascotController, MascotOptions, PointerOffset};
//! use dia_theme::AmbientPreference;
//!
//! let scheduler = Scheduler::new();
//! let preference = AmbientPreference::default();
//! let mascot = MascotController::new(
//!     scheduler.clone(),
//!     MascotOptions::default(),
//!     &preference,
//!     || Some(Rect::at(10.0, 2.0)),
//! );
//!
//! mascot.initialize();
//! assert_eq!(mascot.activation_state(), ActivationState::Active);
//!
//! scheduler.advance(1000);
//! assert!(mascot.is_visible());
//!
//! mascot.handle_pointer_move(110.0, 122.0);
//! scheduler.run_frame();
//! assert_eq!(mascot.snapshot().pointer_offset, PointerOffset::new(1.0, 1.0));
//! ```

pub mod controller;
pub mod options;
pub mod placement;
pub mod snapshot;
pub mod store;
pub mod tips;
pub mod tracker;

pub use controller::MascotController;
pub use options::{MascotOptions, OptionsError, DEFAULT_VISIBILITY_DELAY_MS};
pub use placement::Position;
pub use snapshot::MascotSnapshot;
pub use store::{ActivationState, ConfigStore, DiaConfig, InstallOutcome};
pub use tips::{TipCatalog, FALLBACK_LOCALE};
pub use tracker::{
    MotionState, PointerOffset, PointerTracker, TrackerConfig, TrackerUpdate, DEFAULT_DIVISOR_X,
    DEFAULT_DIVISOR_Y, DEFAULT_IDLE_TIMEOUT_MS,
};
