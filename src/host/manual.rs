//! Deterministic in-process host.
//!
//! [`ManualHost`] plays the role a browser window or an OS window plays in a
//! real application, but everything is driven explicitly:
//!
//! - the viewport size is set with [`ManualHost::set_size`]
//! - raw change signals are raised with [`ManualHost::emit`]
//! - time only moves through [`ManualHost::advance`] or
//!   [`ManualHost::run_all_timers`]
//!
//! It also records how it was used (listener registrations, scheduled
//! delays) so callers can assert on the subject's interaction with its host.
//!
//! Callbacks (listeners and timers) always run with no internal borrow held,
//! so they are free to register listeners or schedule timers themselves.

use std::cell::RefCell;

use log::{trace, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::host::{
    ListenerId, SignalHandler, SignalKind, TimerCallback, TimerHandle, TimerScheduler,
    ViewportSource,
};

/// Upper bound on timers fired by a single [`ManualHost::run_all_timers`] call.
const MAX_TIMER_RUNS: usize = 10_000;
/// Most recent `schedule_after` delays kept for inspection.
pub const MAX_RECORDED_DELAYS: usize = 256;

struct PendingTimer {
    handle: TimerHandle,
    deadline_ms: u64,
    callback: TimerCallback,
}

struct ManualState {
    size: Option<(u32, u32)>,
    now_ms: u64,
    next_id: u64,
    listeners: FxHashMap<SignalKind, SmallVec<[(ListenerId, SignalHandler); 2]>>,
    timers: Vec<PendingTimer>,
    add_listener_calls: usize,
    remove_listener_calls: usize,
    scheduled_delays: Vec<u32>,
}

impl ManualState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Remove and return the earliest timer due at or before `limit_ms`.
    ///
    /// Ties on the deadline resolve by handle, i.e. scheduling order.
    fn pop_due(&mut self, limit_ms: Option<u64>) -> Option<PendingTimer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| limit_ms.is_none_or(|limit| t.deadline_ms <= limit))
            .min_by_key(|(_, t)| (t.deadline_ms, t.handle.0))
            .map(|(i, _)| i)?;
        Some(self.timers.swap_remove(index))
    }
}

/// Single-threaded host with a virtual clock.
pub struct ManualHost {
    state: RefCell<ManualState>,
}

impl ManualHost {
    /// Host with a viewport of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_size(Some((width, height)))
    }

    /// Host without any viewport.
    pub fn headless() -> Self {
        Self::with_size(None)
    }

    fn with_size(size: Option<(u32, u32)>) -> Self {
        ManualHost {
            state: RefCell::new(ManualState {
                size,
                now_ms: 0,
                next_id: 0,
                listeners: FxHashMap::default(),
                timers: Vec::new(),
                add_listener_calls: 0,
                remove_listener_calls: 0,
                scheduled_delays: Vec::new(),
            }),
        }
    }

    /// Change the viewport size. Does not raise any signal by itself.
    ///
    /// Ignored on a headless host.
    pub fn set_size(&self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        if state.size.is_none() {
            warn!("set_size({}x{}) ignored: host has no viewport", width, height);
            return;
        }
        state.size = Some((width, height));
    }

    /// Raise a raw change signal, calling every listener registered for `kind`.
    pub fn emit(&self, kind: SignalKind) {
        let handlers: SmallVec<[SignalHandler; 2]> = {
            let state = self.state.borrow();
            state
                .listeners
                .get(&kind)
                .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };
        trace!("emit {} to {} listener(s)", kind.as_str(), handlers.len());
        for handler in handlers {
            handler();
        }
    }

    /// Move the clock forward by `ms`, firing every timer that falls due.
    ///
    /// Timers scheduled by callbacks during the advance also fire if their
    /// deadline lands inside the window.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now_ms + ms;
        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let due = state.pop_due(Some(target));
                if let Some(timer) = &due {
                    state.now_ms = timer.deadline_ms;
                }
                due
            };
            match due {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.state.borrow_mut().now_ms = target;
    }

    /// Fire pending timers in deadline order until none remain.
    ///
    /// Returns the number of timers fired.
    pub fn run_all_timers(&self) -> usize {
        let mut fired = 0;
        while fired < MAX_TIMER_RUNS {
            let due = {
                let mut state = self.state.borrow_mut();
                let due = state.pop_due(None);
                if let Some(timer) = &due {
                    state.now_ms = state.now_ms.max(timer.deadline_ms);
                }
                due
            };
            match due {
                Some(timer) => {
                    (timer.callback)();
                    fired += 1;
                }
                None => return fired,
            }
        }
        warn!(
            "run_all_timers stopped after {} timers; callbacks keep rescheduling",
            MAX_TIMER_RUNS
        );
        fired
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Number of `add_listener` calls received.
    pub fn add_listener_calls(&self) -> usize {
        self.state.borrow().add_listener_calls
    }

    /// Number of `remove_listener` calls received, including unknown ids.
    pub fn remove_listener_calls(&self) -> usize {
        self.state.borrow().remove_listener_calls
    }

    /// Live listeners for `kind`.
    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.state
            .borrow()
            .listeners
            .get(&kind)
            .map_or(0, |list| list.len())
    }

    /// Timers scheduled but neither fired nor cancelled.
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Delays passed to `schedule_after`, oldest first.
    ///
    /// Only the last [`MAX_RECORDED_DELAYS`] are kept, so long simulations
    /// stay bounded.
    pub fn scheduled_delays(&self) -> Vec<u32> {
        self.state.borrow().scheduled_delays.clone()
    }
}

impl ViewportSource for ManualHost {
    fn viewport_size(&self) -> Option<(u32, u32)> {
        self.state.borrow().size
    }

    fn add_listener(&self, kind: SignalKind, handler: SignalHandler) -> ListenerId {
        let mut state = self.state.borrow_mut();
        state.add_listener_calls += 1;
        let id = ListenerId(state.next_id());
        state.listeners.entry(kind).or_default().push((id, handler));
        id
    }

    fn remove_listener(&self, kind: SignalKind, id: ListenerId) {
        let mut state = self.state.borrow_mut();
        state.remove_listener_calls += 1;
        if let Some(list) = state.listeners.get_mut(&kind) {
            list.retain(|(listener, _)| *listener != id);
        }
    }
}

impl TimerScheduler for ManualHost {
    fn schedule_after(&self, delay_ms: u32, callback: TimerCallback) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let handle = TimerHandle(state.next_id());
        let deadline_ms = state.now_ms + u64::from(delay_ms);
        if state.scheduled_delays.len() == MAX_RECORDED_DELAYS {
            state.scheduled_delays.remove(0);
        }
        state.scheduled_delays.push(delay_ms);
        state.timers.push(PendingTimer {
            handle,
            deadline_ms,
            callback,
        });
        handle
    }

    fn cancel_scheduled(&self, handle: TimerHandle) {
        self.state.borrow_mut().timers.retain(|t| t.handle != handle);
    }
}
