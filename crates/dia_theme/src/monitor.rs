//! Ambient color scheme monitoring
//!
//! A [`PreferenceSource`] is whatever the host uses to report the system
//! light/dark preference; it may re-announce the same value. The
//! [`ColorSchemeMonitor`] sits on top of a source, remembers the last value
//! it saw, and only notifies its own listeners on a genuine flip.

use crate::platform::detect_system_color_scheme;
use crate::scheme::ColorScheme;
use dia_core::{Emitter, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Host-side source of the ambient light/dark preference
pub trait PreferenceSource {
    /// Current preference
    fn query(&self) -> ColorScheme;

    /// Register for change announcements; dropping the subscription detaches
    fn subscribe(&self, handler: Box<dyn Fn(ColorScheme)>) -> Subscription;
}

/// In-process preference source driven by the host
///
/// Every [`AmbientPreference::set`] announces the value, changed or not, the
/// way a re-evaluated media query would.
#[derive(Clone, Debug)]
pub struct AmbientPreference {
    current: Rc<Cell<ColorScheme>>,
    changes: Emitter<ColorScheme>,
}

impl AmbientPreference {
    pub fn new(initial: ColorScheme) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
            changes: Emitter::new(),
        }
    }

    /// Seed from the detected system preference
    pub fn from_system() -> Self {
        Self::new(detect_system_color_scheme())
    }

    pub fn set(&self, scheme: ColorScheme) {
        self.current.set(scheme);
        self.changes.emit(&scheme);
    }

    pub fn get(&self) -> ColorScheme {
        self.current.get()
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.changes.listener_count()
    }
}

impl Default for AmbientPreference {
    fn default() -> Self {
        Self::new(ColorScheme::Light)
    }
}

impl PreferenceSource for AmbientPreference {
    fn query(&self) -> ColorScheme {
        self.get()
    }

    fn subscribe(&self, handler: Box<dyn Fn(ColorScheme)>) -> Subscription {
        self.changes.subscribe(move |scheme| handler(*scheme))
    }
}

struct MonitorShared {
    current: Cell<ColorScheme>,
    changes: Emitter<ColorScheme>,
}

impl MonitorShared {
    fn observe(&self, scheme: ColorScheme) {
        if self.current.get() == scheme {
            tracing::trace!("ColorSchemeMonitor: ignoring repeated {}", scheme);
            return;
        }
        tracing::debug!(
            "ColorSchemeMonitor: {} -> {}",
            self.current.get(),
            scheme
        );
        self.current.set(scheme);
        self.changes.emit(&scheme);
    }
}

/// Follows a [`PreferenceSource`] and reports genuine light/dark flips
pub struct ColorSchemeMonitor {
    shared: Rc<MonitorShared>,
    source: RefCell<Option<Subscription>>,
}

impl ColorSchemeMonitor {
    /// Query the source once and subscribe to its announcements
    pub fn new<S: PreferenceSource + ?Sized>(source: &S) -> Self {
        let shared = Rc::new(MonitorShared {
            current: Cell::new(source.query()),
            changes: Emitter::new(),
        });

        let weak: Weak<MonitorShared> = Rc::downgrade(&shared);
        let subscription = source.subscribe(Box::new(move |scheme| {
            if let Some(shared) = weak.upgrade() {
                shared.observe(scheme);
            }
        }));

        Self {
            shared,
            source: RefCell::new(Some(subscription)),
        }
    }

    /// Last observed ambient scheme
    pub fn current_scheme(&self) -> ColorScheme {
        self.shared.current.get()
    }

    /// Register a listener for genuine flips
    pub fn on_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(ColorScheme) + 'static,
    {
        self.shared.changes.subscribe(move |scheme| handler(*scheme))
    }

    /// Detach from the source; no further notifications are delivered
    pub fn dispose(&self) {
        let subscription = self.source.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.source.borrow().is_some()
    }
}

impl std::fmt::Debug for ColorSchemeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorSchemeMonitor")
            .field("current", &self.current_scheme())
            .field("attached", &self.is_attached())
            .finish()
    }
}
