//! Mascot controller
//!
//! Owns every subscription and timer the mascot creates: the pointer
//! listener and idle timer (through the tracker), the color scheme listener,
//! and the visibility delay. [`MascotController::dispose`] releases all of
//! them; nothing scheduled before disposal can change state afterwards.
//!
//! Lifecycle, as driven by [`MascotController::initialize`]:
//!
//! 1. install the configuration (`Configured`)
//! 2. activate (`Active`)
//! 3. become visible after the configured delay
//!
//! A theme change re-runs the whole sequence instead of patching state.

use crate::options::MascotOptions;
use crate::placement::Position;
use crate::snapshot::MascotSnapshot;
use crate::store::{ActivationState, ConfigStore, DiaConfig, InstallOutcome};
use crate::tips::TipCatalog;
use crate::tracker::PointerTracker;
use dia_core::{Emitter, PointerEvent, Rect, Result, Scheduler, Subscription, TimerSlot};
use dia_theme::{
    resolve, ColorScheme, ColorSchemeMonitor, PreferenceSource, StyleVariableSet, ThemeConfig,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct ControllerShared {
    position: Position,
    locale: RefCell<String>,
    visibility_delay_ms: u64,
    tips: TipCatalog,

    store: RefCell<ConfigStore>,
    theme: RefCell<ThemeConfig>,
    /// Replaced wholesale on every theme or scheme change
    style: RefCell<StyleVariableSet>,
    tip_text: RefCell<String>,
    visible: Cell<bool>,

    visibility: RefCell<TimerSlot>,
    tracker: PointerTracker,
    monitor: ColorSchemeMonitor,
    changes: Emitter<MascotSnapshot>,
    subscriptions: RefCell<Vec<Subscription>>,
    disposed: Cell<bool>,
}

impl ControllerShared {
    fn snapshot(&self) -> MascotSnapshot {
        MascotSnapshot {
            visible: self.visible.get(),
            activation_state: self.store.borrow().state(),
            pointer_offset: self.tracker.offset(),
            is_moving: self.tracker.is_moving(),
            style_variables: self.style.borrow().clone(),
            position: self.position,
            tip_text: self.tip_text.borrow().clone(),
        }
    }

    fn notify(&self) {
        if self.disposed.get() {
            return;
        }
        let snapshot = self.snapshot();
        self.changes.emit(&snapshot);
    }

    fn restyle(&self) {
        let style = resolve(&self.theme.borrow(), self.monitor.current_scheme());
        *self.style.borrow_mut() = style;
    }

    fn on_scheme_change(&self, scheme: ColorScheme) {
        if self.disposed.get() {
            return;
        }
        tracing::debug!("MascotController: ambient scheme now {}", scheme);
        self.restyle();
        self.notify();
    }

    fn become_visible(&self) {
        if self.disposed.get() || self.visible.get() {
            return;
        }
        tracing::debug!("MascotController: visible");
        self.visible.set(true);
        self.notify();
    }
}

/// Orchestrates configuration, activation, tracking, and theming
pub struct MascotController {
    shared: Rc<ControllerShared>,
}

impl MascotController {
    /// Build a controller; nothing is installed or activated yet
    ///
    /// `anchor` supplies the eyes' bounding rectangle whenever a pointer
    /// sample is processed.
    pub fn new<S, F>(scheduler: Scheduler, options: MascotOptions, preference: &S, anchor: F) -> Self
    where
        S: PreferenceSource + ?Sized,
        F: Fn() -> Option<Rect> + 'static,
    {
        Self::with_tips(scheduler, options, preference, anchor, TipCatalog::builtin())
    }

    /// Like [`MascotController::new`] with a custom tip catalog
    pub fn with_tips<S, F>(
        scheduler: Scheduler,
        options: MascotOptions,
        preference: &S,
        anchor: F,
        tips: TipCatalog,
    ) -> Self
    where
        S: PreferenceSource + ?Sized,
        F: Fn() -> Option<Rect> + 'static,
    {
        let MascotOptions {
            position,
            locale,
            visibility_delay_ms,
            tracker,
            theme,
        } = options;

        if let Err(err) = theme.validate() {
            tracing::debug!("MascotController: {}", err);
        }

        let monitor = ColorSchemeMonitor::new(preference);
        let style = resolve(&theme, monitor.current_scheme());
        let tip_text = tips.greeting(&locale);

        let shared = Rc::new(ControllerShared {
            position,
            locale: RefCell::new(locale),
            visibility_delay_ms,
            tips,
            store: RefCell::new(ConfigStore::new()),
            theme: RefCell::new(theme),
            style: RefCell::new(style),
            tip_text: RefCell::new(tip_text),
            visible: Cell::new(false),
            visibility: RefCell::new(TimerSlot::new(scheduler.clone())),
            tracker: PointerTracker::new(scheduler, tracker, anchor),
            monitor,
            changes: Emitter::new(),
            subscriptions: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        });

        let weak: Weak<ControllerShared> = Rc::downgrade(&shared);
        let scheme_sub = shared.monitor.on_change(move |scheme| {
            if let Some(shared) = weak.upgrade() {
                shared.on_scheme_change(scheme);
            }
        });

        let weak: Weak<ControllerShared> = Rc::downgrade(&shared);
        let tracker_sub = shared.tracker.on_update(move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.notify();
            }
        });

        shared
            .subscriptions
            .borrow_mut()
            .extend([scheme_sub, tracker_sub]);

        Self { shared }
    }

    // ========== Lifecycle ==========

    /// Install the configured locale, activate, and schedule visibility
    pub fn initialize(&self) {
        let locale = self.shared.locale.borrow().clone();
        self.install_config(DiaConfig::new(locale));
        // Cannot fail right after an install
        let _ = self.activate();
        self.request_visible(self.shared.visibility_delay_ms);
    }

    /// Store a configuration; re-installing the same one is a no-op
    pub fn install_config(&self, config: DiaConfig) {
        if self.shared.disposed.get() {
            return;
        }

        let locale = config.locale.clone();
        let outcome = self.shared.store.borrow_mut().install(config);
        match outcome {
            InstallOutcome::Unchanged => return,
            InstallOutcome::Installed { locale_changed } => {
                if locale_changed {
                    *self.shared.tip_text.borrow_mut() = self.shared.tips.greeting(&locale);
                    *self.shared.locale.borrow_mut() = locale;
                }
            }
        }
        self.shared.notify();
    }

    /// Move from `Configured` to `Active`
    ///
    /// Before any configuration is installed this changes nothing and
    /// returns [`dia_core::DiaError::NotConfigured`].
    pub fn activate(&self) -> Result<()> {
        if self.shared.disposed.get() {
            return Ok(());
        }

        let before = self.shared.store.borrow().state();
        let result = self.shared.store.borrow_mut().activate();
        match &result {
            Err(err) => tracing::warn!("MascotController::activate: {}", err),
            Ok(()) if before != ActivationState::Active => self.shared.notify(),
            Ok(()) => {}
        }
        result
    }

    /// Schedule `visible = true` after `delay_ms`, replacing any pending request
    pub fn request_visible(&self, delay_ms: u64) {
        if self.shared.disposed.get() {
            return;
        }
        let weak = Rc::downgrade(&self.shared);
        self.shared
            .visibility
            .borrow_mut()
            .schedule(delay_ms, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.become_visible();
                }
            });
    }

    /// Replace the theme; a changed theme restyles and re-runs [`initialize`](Self::initialize)
    pub fn set_theme_config(&self, theme: ThemeConfig) {
        if self.shared.disposed.get() || *self.shared.theme.borrow() == theme {
            return;
        }
        if let Err(err) = theme.validate() {
            tracing::debug!("MascotController: {}", err);
        }

        *self.shared.theme.borrow_mut() = theme;
        self.shared.restyle();
        tracing::debug!("MascotController: theme changed, reinitializing");
        self.initialize();
        self.shared.notify();
    }

    /// Tear down: cancel timers, drop every subscription, stop notifying
    pub fn dispose(&self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        self.shared.visibility.borrow_mut().cancel();
        self.shared.tracker.dispose();
        self.shared.monitor.dispose();
        let subscriptions = std::mem::take(&mut *self.shared.subscriptions.borrow_mut());
        drop(subscriptions);
        tracing::debug!("MascotController disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }

    // ========== Input ==========

    /// Follow a host pointer-move source
    pub fn attach_pointer(&self, source: &Emitter<PointerEvent>) {
        if self.shared.disposed.get() {
            return;
        }
        self.shared.tracker.attach(source);
    }

    /// Feed one pointer sample directly
    pub fn handle_pointer_move(&self, client_x: f64, client_y: f64) {
        if self.shared.disposed.get() {
            return;
        }
        self.shared.tracker.on_pointer_move(client_x, client_y);
    }

    // ========== Output ==========

    pub fn snapshot(&self) -> MascotSnapshot {
        self.shared.snapshot()
    }

    /// Called with a fresh snapshot after every observable change
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&MascotSnapshot) + 'static,
    {
        self.shared.changes.subscribe(handler)
    }

    pub fn activation_state(&self) -> ActivationState {
        self.shared.store.borrow().state()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.visible.get()
    }

    pub fn style_variables(&self) -> StyleVariableSet {
        self.shared.style.borrow().clone()
    }

    /// Scheme in effect after the theme's dark mode override
    pub fn effective_scheme(&self) -> ColorScheme {
        self.shared
            .theme
            .borrow()
            .dark_mode
            .effective(self.shared.monitor.current_scheme())
    }

    pub fn theme_config(&self) -> ThemeConfig {
        self.shared.theme.borrow().clone()
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.shared.tracker
    }
}

impl Drop for MascotController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for MascotController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MascotController")
            .field("state", &self.activation_state())
            .field("visible", &self.is_visible())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
