//! Event dispatch
//!
//! Pointer samples, anchor geometry, and the [`Emitter`] every component
//! uses to publish notifications. Registration returns a [`Subscription`]
//! owned by whoever subscribed; dropping or unsubscribing it removes the
//! listener.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Unique identifier for a registered listener
    pub struct ListenerId;
}

/// A pointer-move sample in client (viewport) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Bounding rectangle in client coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A zero-sized rectangle at the given origin
    pub const fn at(left: f64, top: f64) -> Self {
        Self::new(left, top, 0.0, 0.0)
    }
}

type Handler<T> = Rc<dyn Fn(&T)>;
type Registry<T> = RefCell<SlotMap<ListenerId, Handler<T>>>;

/// Single-threaded listener registry
///
/// Cloning an emitter yields another handle to the same registry.
pub struct Emitter<T: 'static> {
    handlers: Rc<Registry<T>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register a listener
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.handlers.borrow_mut().insert(Rc::new(handler));
        let registry: Weak<Registry<T>> = Rc::downgrade(&self.handlers);
        Subscription::from_fn(move || {
            if let Some(registry) = registry.upgrade() {
                let removed = registry.borrow_mut().remove(id);
                drop(removed);
            }
        })
    }

    /// Deliver a value to every listener registered at the time of the call
    ///
    /// Listeners may subscribe or unsubscribe while being notified. A listener
    /// removed by an earlier one in the same pass is skipped.
    pub fn emit(&self, value: &T) {
        let snapshot: SmallVec<[(ListenerId, Handler<T>); 4]> = self
            .handlers
            .borrow()
            .iter()
            .map(|(id, handler)| (id, handler.clone()))
            .collect();

        for (id, handler) in snapshot {
            if self.handlers.borrow().contains_key(id) {
                handler(value);
            }
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}

impl<T: 'static> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Disposer for a registered listener
///
/// The listener is removed when [`Subscription::unsubscribe`] is called or
/// the subscription is dropped, whichever happens first.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a custom disposer (used by sources that are not [`Emitter`]s)
    pub fn from_fn<F: FnOnce() + 'static>(dispose: F) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A subscription with nothing to release
    pub fn empty() -> Self {
        Self { dispose: None }
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Whether the listener is still registered through this handle
    pub fn is_active(&self) -> bool {
        self.dispose.is_some()
    }

    fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_listeners() {
        let emitter = Emitter::<i32>::new();
        let total = Rc::new(Cell::new(0));

        let t = total.clone();
        let _a = emitter.subscribe(move |v| t.set(t.get() + *v));
        let t = total.clone();
        let _b = emitter.subscribe(move |v| t.set(t.get() + *v * 10));

        emitter.emit(&2);
        assert_eq!(total.get(), 22);
        assert_eq!(emitter.listener_count(), 2);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let emitter = Emitter::<()>::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        let sub = emitter.subscribe(move |_| c.set(c.get() + 1));
        emitter.emit(&());
        sub.unsubscribe();
        emitter.emit(&());

        assert_eq!(count.get(), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let emitter = Emitter::<()>::new();
        {
            let _sub = emitter.subscribe(|_| {});
            assert_eq!(emitter.listener_count(), 1);
        }
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_listener_removed_mid_emit_is_skipped() {
        let emitter = Emitter::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = victim.clone();
        let _killer = emitter.subscribe(move |_| {
            slot.borrow_mut().take();
        });
        let h = hits.clone();
        *victim.borrow_mut() = Some(emitter.subscribe(move |_| h.set(h.get() + 1)));

        emitter.emit(&());
        emitter.emit(&());
        // Depending on slot order the victim may run once before being
        // removed, but never after.
        assert!(hits.get() <= 1);
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_emitter() {
        let emitter = Emitter::<()>::new();
        let sub = emitter.subscribe(|_| {});
        drop(emitter);
        // Registry is gone; unsubscribing is a no-op
        sub.unsubscribe();
    }
}
