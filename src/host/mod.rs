//! Host environment seams.
//!
//! The subject never touches a window system directly. Everything it needs
//! from the outside world goes through two traits:
//!
//! - [`ViewportSource`] – reads the viewport and (de)registers change listeners
//! - [`TimerScheduler`] – one-shot timers used for debouncing
//!
//! A host without a viewport (headless runs, tests, servers) returns `None`
//! from [`ViewportSource::viewport_size`]; the subject then degrades to
//! zero-sized events and never registers listeners.
//!
//! Submodules:
//! - [`manual`] – deterministic in-process host with a virtual clock

pub mod manual;

use std::rc::Rc;

/// Logical kinds of viewport change signals.
///
/// The subject treats both identically: either one re-arms the debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The viewport changed size.
    Resize,
    /// The device orientation changed.
    OrientationChange,
}

impl SignalKind {
    /// Every kind the subject listens to.
    pub const ALL: [SignalKind; 2] = [SignalKind::Resize, SignalKind::OrientationChange];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Resize => "resize",
            SignalKind::OrientationChange => "orientationchange",
        }
    }
}

/// Callback registered on a viewport signal.
pub type SignalHandler = Rc<dyn Fn()>;

/// One-shot callback run when a scheduled timer expires.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Identifies one listener registration within a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifies one scheduled timer within a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Viewport query and change-signal registration.
pub trait ViewportSource {
    /// Current viewport size, or `None` when the host has no viewport.
    fn viewport_size(&self) -> Option<(u32, u32)>;

    /// Whether a viewport exists at all.
    fn has_viewport(&self) -> bool {
        self.viewport_size().is_some()
    }

    /// Register `handler` for `kind`.
    fn add_listener(&self, kind: SignalKind, handler: SignalHandler) -> ListenerId;

    /// Deregister a listener. Unknown ids are ignored.
    fn remove_listener(&self, kind: SignalKind, id: ListenerId);
}

/// Generic one-shot timer primitive.
pub trait TimerScheduler {
    /// Run `callback` once after `delay_ms` milliseconds.
    ///
    /// A host may run `callback` before returning (e.g. for a zero delay).
    fn schedule_after(&self, delay_ms: u32, callback: TimerCallback) -> TimerHandle;

    /// Cancel a timer that has not fired yet. Fired or unknown handles are ignored.
    fn cancel_scheduled(&self, handle: TimerHandle);
}

/// Anything that can back a [`ResizeSubject`](crate::subject::ResizeSubject).
pub trait Host: ViewportSource + TimerScheduler {}

impl<T: ViewportSource + TimerScheduler> Host for T {}
