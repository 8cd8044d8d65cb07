//! Observer registry and notification fan-out.
//!
//! [`ObserverRegistry`] maps [`ObserverName`]s to callbacks while keeping
//! insertion order, which is also the notification order. Re-registering a
//! name swaps the callback in place.
//!
//! Delivery ([`deliver`]) works on a snapshot so the owner can release its
//! own borrow before any observer code runs. Each observer is isolated: a
//! panic is caught and logged, and the remaining observers still receive the
//! event. An observer that is still running when a newer event arrives gets
//! that event right after its current call returns; only the latest one is
//! kept.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use log::{debug, error};

use crate::events::resize::ResizeEvent;
use crate::subject::name::ObserverName;

/// One registered callback plus the event waiting for it while it runs.
pub struct ObserverSlot {
    callback: RefCell<Box<dyn FnMut(ResizeEvent)>>,
    queued: Cell<Option<ResizeEvent>>,
}

/// Shared handle to a registered observer.
pub type SharedObserver = Rc<ObserverSlot>;

/// Insertion-ordered map of observers.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: Vec<(ObserverName, SharedObserver)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        ObserverRegistry {
            entries: Vec::new(),
        }
    }

    /// Insert or replace the observer for `name`.
    ///
    /// A replaced observer keeps the slot of the original registration.
    /// Returns the stored callback.
    pub fn insert<F>(&mut self, name: ObserverName, observer: F) -> SharedObserver
    where
        F: FnMut(ResizeEvent) + 'static,
    {
        let shared = Rc::new(ObserverSlot {
            callback: RefCell::new(Box::new(observer)),
            queued: Cell::new(None),
        });
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = shared.clone(),
            None => self.entries.push((name, shared.clone())),
        }
        shared
    }

    /// Remove `name`. Returns whether it was present.
    pub fn remove(&mut self, name: &ObserverName) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cheap copy of the current entries for delivery outside a borrow.
    pub fn snapshot(&self) -> Vec<(ObserverName, SharedObserver)> {
        self.entries.clone()
    }
}

/// Invoke each observer in order with `event`.
///
/// Returns the number of observers that handled the event during this call
/// without panicking. Events queued for a busy observer are not counted.
pub fn deliver(observers: &[(ObserverName, SharedObserver)], event: ResizeEvent) -> usize {
    observers
        .iter()
        .filter(|(name, observer)| deliver_one(name, observer, event))
        .count()
}

/// Invoke a single observer, isolating panics.
///
/// If the observer is already running further up the stack, `event` replaces
/// whatever was queued for it and is delivered once that call returns.
/// Returns whether the observer handled `event` now without panicking.
pub fn deliver_one(name: &ObserverName, observer: &SharedObserver, event: ResizeEvent) -> bool {
    let Ok(mut callback) = observer.callback.try_borrow_mut() else {
        debug!("Observer '{}' busy; {}x{} queued", name, event.width, event.height);
        observer.queued.set(Some(event));
        return false;
    };
    let handled = invoke(name, &mut **callback, event);
    // Events that arrived while the callback ran
    while let Some(next) = observer.queued.take() {
        invoke(name, &mut **callback, next);
    }
    handled
}

fn invoke(name: &ObserverName, callback: &mut dyn FnMut(ResizeEvent), event: ResizeEvent) -> bool {
    match catch_unwind(AssertUnwindSafe(|| callback(event))) {
        Ok(()) => true,
        Err(payload) => {
            error!(
                "Observer '{}' panicked while handling {}x{}: {}",
                name,
                event.width,
                event.height,
                panic_message(payload.as_ref())
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::name::ObserverToken;

    fn recorder() -> (Rc<RefCell<Vec<ResizeEvent>>>, impl FnMut(ResizeEvent) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |e| sink.borrow_mut().push(e))
    }

    #[test]
    fn test_insert_keeps_order_and_overwrite_keeps_slot() {
        let mut reg = ObserverRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let (a, b, a2) = (order.clone(), order.clone(), order.clone());
        reg.insert("a".into(), move |_| a.borrow_mut().push("a"));
        reg.insert("b".into(), move |_| b.borrow_mut().push("b"));
        reg.insert("a".into(), move |_| a2.borrow_mut().push("a2"));
        assert_eq!(reg.len(), 2);

        deliver(&reg.snapshot(), ResizeEvent::ZERO);
        assert_eq!(*order.borrow(), vec!["a2", "b"]);
    }

    #[test]
    fn test_overwrite_replaces_callback() {
        let mut reg = ObserverRegistry::new();
        let (old, old_cb) = recorder();
        let (new, new_cb) = recorder();
        reg.insert("a".into(), old_cb);
        reg.insert("a".into(), new_cb);
        deliver(&reg.snapshot(), ResizeEvent::new(1, 2));
        assert!(old.borrow().is_empty());
        assert_eq!(*new.borrow(), vec![ResizeEvent::new(1, 2)]);
    }

    #[test]
    fn test_remove_missing_is_false() {
        let mut reg = ObserverRegistry::new();
        assert!(!reg.remove(&"nope".into()));
        let token = ObserverToken::new();
        reg.insert(token.into(), |_| {});
        assert!(!reg.remove(&ObserverToken::new().into()));
        assert_eq!(reg.len(), 1);
        assert!(reg.remove(&token.into()));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_deliver_isolates_panicking_observer() {
        let mut reg = ObserverRegistry::new();
        let (first, first_cb) = recorder();
        let (last, last_cb) = recorder();
        reg.insert("first".into(), first_cb);
        reg.insert("boom".into(), |_| panic!("observer failure"));
        reg.insert("last".into(), last_cb);

        let delivered = deliver(&reg.snapshot(), ResizeEvent::new(3, 4));
        assert_eq!(delivered, 2);
        assert_eq!(first.borrow().len(), 1);
        assert_eq!(*last.borrow(), vec![ResizeEvent::new(3, 4)]);
    }

    #[test]
    fn test_deliver_one_reports_panic() {
        let mut reg = ObserverRegistry::new();
        let name = ObserverName::from("boom");
        let observer = reg.insert(name.clone(), |_| panic!("nope"));
        assert!(!deliver_one(&name, &observer, ResizeEvent::ZERO));
    }

    #[test]
    fn test_busy_observer_gets_latest_event_after_returning() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<SharedObserver>>> = Rc::new(RefCell::new(None));
        let (sink, me) = (seen.clone(), slot.clone());
        let name = ObserverName::from("nested");
        let nested_name = name.clone();

        let mut reg = ObserverRegistry::new();
        let observer = reg.insert(name.clone(), move |e: ResizeEvent| {
            sink.borrow_mut().push(e);
            if e.width == 1 {
                let this = me.borrow().clone().unwrap();
                // Two events while busy: only the last one is kept
                assert!(!deliver_one(&nested_name, &this, ResizeEvent::new(2, 2)));
                assert!(!deliver_one(&nested_name, &this, ResizeEvent::new(3, 3)));
            }
        });
        *slot.borrow_mut() = Some(observer.clone());

        assert!(deliver_one(&name, &observer, ResizeEvent::new(1, 1)));
        assert_eq!(
            *seen.borrow(),
            vec![ResizeEvent::new(1, 1), ResizeEvent::new(3, 3)]
        );
        // Break the self-reference
        slot.borrow_mut().take();
    }
}
