//! Debounced viewport resize subject.
//!
//! [`ResizeSubject`] keeps a registry of observers and, while subscribed,
//! listens to the host's `resize` and `orientationchange` signals. Every raw
//! signal cancels the pending timer and arms a new one for the configured
//! delay; only when the timer expires is the viewport read and the event
//! pushed to all observers. A burst of signals therefore produces exactly one
//! notification carrying the size current at expiry.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use resizesubject::host::SignalKind;
//! use resizesubject::host::manual::ManualHost;
//! use resizesubject::subject::ResizeSubject;
//!
//! let host = Rc::new(ManualHost::new(1280, 720));
//! let mut subject = ResizeSubject::new(host.clone());
//! subject
//!     .add_observer("layout", |e| println!("{}x{}", e.width, e.height))
//!     .subscribe();
//!
//! host.set_size(800, 600);
//! host.emit(SignalKind::Resize);
//! host.advance(33);
//! ```
//!
//! Submodules:
//! - [`name`] – observer identities (strings or unique tokens)
//! - [`registry`] – insertion-ordered observer storage and panic-isolated fan-out

pub mod name;
pub mod registry;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use arrayvec::ArrayVec;
use log::{debug, trace};

use crate::events::resize::ResizeEvent;
use crate::host::{Host, ListenerId, SignalHandler, SignalKind, TimerHandle};
use crate::resources::subjectconfig::SubjectConfig;
use crate::subject::name::ObserverName;
use crate::subject::registry::{ObserverRegistry, deliver, deliver_one};

/// Debounce delay used when none is configured.
pub const DEFAULT_DELAY_MS: u32 = 33;

struct SubjectState {
    observers: ObserverRegistry,
    delay_ms: u32,
    /// Live registrations; non-empty iff subscribed.
    listeners: ArrayVec<(SignalKind, ListenerId), 2>,
    pending: Option<PendingDispatch>,
    /// Bumped each time a timer is armed.
    generation: u64,
    last_event: Option<ResizeEvent>,
}

/// The armed debounce timer.
///
/// `handle` is `None` until `schedule_after` returns; a host may fire the
/// callback before that.
struct PendingDispatch {
    generation: u64,
    handle: Option<TimerHandle>,
}

/// State reachable from host callbacks through a `Weak` reference.
struct Shared {
    host: Rc<dyn Host>,
    state: RefCell<SubjectState>,
}

impl Shared {
    fn read_event(&self) -> ResizeEvent {
        ResizeEvent::from_reading(self.host.viewport_size())
    }

    fn notify(&self, event: ResizeEvent) {
        let observers = {
            let mut state = self.state.borrow_mut();
            state.last_event = Some(event);
            state.observers.snapshot()
        };
        let delivered = deliver(&observers, event);
        trace!(
            "Delivered {}x{} to {}/{} observer(s)",
            event.width,
            event.height,
            delivered,
            observers.len()
        );
    }

    fn dispatch(&self) {
        self.notify(self.read_event());
    }

    /// Raw `resize`/`orientationchange` signal: restart the debounce window.
    fn handle_signal(self: &Rc<Self>) {
        let (previous, delay_ms, generation) = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            let generation = state.generation;
            let previous = state.pending.replace(PendingDispatch {
                generation,
                handle: None,
            });
            (previous, state.delay_ms, generation)
        };
        if let Some(handle) = previous.and_then(|p| p.handle) {
            self.host.cancel_scheduled(handle);
        }
        trace!("Viewport signal; dispatch re-armed for {}ms", delay_ms);

        let weak = Rc::downgrade(self);
        let handle = self.host.schedule_after(
            delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_timer_expired(generation);
                }
            }),
        );
        // Nothing to record when the host already fired it inside `schedule_after`.
        let mut state = self.state.borrow_mut();
        if let Some(pending) = state.pending.as_mut().filter(|p| p.generation == generation) {
            pending.handle = Some(handle);
        }
    }

    /// Dispatch for the timer armed as `generation`; stale timers are ignored.
    fn on_timer_expired(&self, generation: u64) {
        {
            let mut state = self.state.borrow_mut();
            let current = state
                .pending
                .as_ref()
                .is_some_and(|p| p.generation == generation);
            if !current {
                return;
            }
            state.pending = None;
        }
        self.dispatch();
    }

    fn signal_handler(self: &Rc<Self>) -> SignalHandler {
        let weak: Weak<Shared> = Rc::downgrade(self);
        Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.handle_signal();
            }
        })
    }
}

/// Debounced publish/subscribe notifier for viewport size changes.
///
/// All mutators return `&mut Self` so calls can be chained. Dropping the
/// subject unsubscribes it and cancels any pending dispatch.
pub struct ResizeSubject {
    shared: Rc<Shared>,
}

impl ResizeSubject {
    /// Subject with the default 33ms delay.
    pub fn new<H: Host + 'static>(host: Rc<H>) -> Self {
        Self::with_config(host, &SubjectConfig::default())
    }

    /// Subject configured from `config`.
    pub fn with_config<H: Host + 'static>(host: Rc<H>, config: &SubjectConfig) -> Self {
        ResizeSubject {
            shared: Rc::new(Shared {
                host,
                state: RefCell::new(SubjectState {
                    observers: ObserverRegistry::new(),
                    delay_ms: config.delay_ms,
                    listeners: ArrayVec::new(),
                    pending: None,
                    generation: 0,
                    last_event: None,
                }),
            }),
        }
    }

    /// Register `observer` under `name`, replacing any observer with that name.
    ///
    /// The observer is called once right away with the current viewport size
    /// (zero-sized when the host has no viewport).
    pub fn add_observer<F>(&mut self, name: impl Into<ObserverName>, observer: F) -> &mut Self
    where
        F: FnMut(ResizeEvent) + 'static,
    {
        let name = name.into();
        let stored = self
            .shared
            .state
            .borrow_mut()
            .observers
            .insert(name.clone(), observer);
        debug!("Observer '{}' added", name);
        deliver_one(&name, &stored, self.shared.read_event());
        self
    }

    /// Remove the observer registered under `name`, if any.
    pub fn delete_observer(&mut self, name: impl Into<ObserverName>) -> &mut Self {
        let name = name.into();
        if self.shared.state.borrow_mut().observers.remove(&name) {
            debug!("Observer '{}' deleted", name);
        }
        self
    }

    /// Remove every observer.
    pub fn delete_observers(&mut self) -> &mut Self {
        self.shared.state.borrow_mut().observers.clear();
        self
    }

    /// Deliver `event` to every observer in registration order.
    pub fn notify_observers(&mut self, event: ResizeEvent) -> &mut Self {
        self.shared.notify(event);
        self
    }

    /// Start listening to the host's viewport signals.
    ///
    /// No-op when already subscribed or when the host has no viewport.
    pub fn subscribe(&mut self) -> &mut Self {
        if !self.shared.host.has_viewport() {
            debug!("subscribe skipped: host has no viewport");
            return self;
        }
        if self.is_subscribed() {
            return self;
        }
        let handler = self.shared.signal_handler();
        let mut listeners = ArrayVec::new();
        for kind in SignalKind::ALL {
            let id = self.shared.host.add_listener(kind, handler.clone());
            listeners.push((kind, id));
        }
        self.shared.state.borrow_mut().listeners = listeners;
        debug!("Subscribed to viewport signals");
        self
    }

    /// Stop listening to viewport signals. No-op when not subscribed.
    ///
    /// Observers are kept; a later [`subscribe`](Self::subscribe) resumes
    /// delivery to them.
    pub fn unsubscribe(&mut self) -> &mut Self {
        let listeners = std::mem::take(&mut self.shared.state.borrow_mut().listeners);
        if listeners.is_empty() {
            return self;
        }
        for (kind, id) in listeners {
            self.shared.host.remove_listener(kind, id);
        }
        debug!("Unsubscribed from viewport signals");
        self
    }

    /// Change the debounce delay. An already pending timer keeps its deadline.
    pub fn set_delay(&mut self, delay_ms: u32) -> &mut Self {
        self.shared.state.borrow_mut().delay_ms = delay_ms;
        self
    }

    /// Whether at least one observer is registered.
    pub fn has_observer(&self) -> bool {
        !self.shared.state.borrow().observers.is_empty()
    }

    /// Read the viewport now and notify observers, bypassing the debounce timer.
    pub fn dispatch(&mut self) -> &mut Self {
        self.shared.dispatch();
        self
    }

    /// Delay applied to the next armed timer, in milliseconds.
    pub fn delay_ms(&self) -> u32 {
        self.shared.state.borrow().delay_ms
    }

    /// Whether the subject currently holds listener registrations on the host.
    pub fn is_subscribed(&self) -> bool {
        !self.shared.state.borrow().listeners.is_empty()
    }

    /// Whether a debounced dispatch is waiting on its timer.
    pub fn is_pending(&self) -> bool {
        self.shared.state.borrow().pending.is_some()
    }

    /// Most recent event delivered through [`notify_observers`](Self::notify_observers),
    /// [`dispatch`](Self::dispatch) or a debounced dispatch.
    pub fn last_event(&self) -> Option<ResizeEvent> {
        self.shared.state.borrow().last_event
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.state.borrow().observers.len()
    }
}

impl Drop for ResizeSubject {
    fn drop(&mut self) {
        self.unsubscribe();
        let pending = self.shared.state.borrow_mut().pending.take();
        if let Some(handle) = pending.and_then(|p| p.handle) {
            self.shared.host.cancel_scheduled(handle);
        }
    }
}
