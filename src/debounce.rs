//! Collapses bursts of calls into at most one effective call per wait window.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// First call of a burst fires, the rest of the burst is swallowed.
    Leading,
    /// Only the last call fires, once the window has stayed quiet.
    Trailing,
    /// First call fires at once, then at most one call per window while calls
    /// keep arriving. The last call of a burst is always delivered.
    Both,
}

/// What the wrapper should do with one incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateCall {
    pub fire_now: bool,
    /// (Re)start the window timer.
    pub arm_timer: bool,
}

/// Timer-free decision logic behind [`Debounced`].
///
/// `call` is invoked for every incoming call; `expire` when the window timer
/// elapses and says whether to fire the queued call. If the gate is still
/// pending after `expire`, the window must be armed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceGate {
    edge: Edge,
    pending: bool,
    queued: bool,
}

impl DebounceGate {
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            pending: false,
            queued: false,
        }
    }

    pub fn call(&mut self) -> GateCall {
        match self.edge {
            Edge::Leading => {
                let fire_now = !self.pending;
                self.pending = true;
                GateCall { fire_now, arm_timer: true }
            }
            Edge::Trailing => {
                self.pending = true;
                self.queued = true;
                GateCall { fire_now: false, arm_timer: true }
            }
            Edge::Both if self.pending => {
                self.queued = true;
                GateCall { fire_now: false, arm_timer: false }
            }
            Edge::Both => {
                self.pending = true;
                GateCall { fire_now: true, arm_timer: true }
            }
        }
    }

    pub fn expire(&mut self) -> bool {
        let fire = std::mem::take(&mut self.queued);
        // A trailing fire in `Both` opens a fresh window.
        self.pending = self.edge == Edge::Both && fire;
        fire
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

struct Inner<A> {
    wait_ms: u32,
    gate: RefCell<DebounceGate>,
    latest: RefCell<Option<A>>,
    timer: RefCell<Option<Timeout>>,
    callback: Box<dyn Fn(A)>,
}

/// Browser-side debounced callback. Cloning shares the same timer.
pub struct Debounced<A> {
    inner: Rc<Inner<A>>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub fn debounce<A, F>(callback: F, wait_ms: u32, edge: Edge) -> Debounced<A>
where
    A: 'static,
    F: Fn(A) + 'static,
{
    Debounced {
        inner: Rc::new(Inner {
            wait_ms,
            gate: RefCell::new(DebounceGate::new(edge)),
            latest: RefCell::new(None),
            timer: RefCell::new(None),
            callback: Box::new(callback),
        }),
    }
}

fn arm<A: 'static>(inner: &Rc<Inner<A>>) {
    let weak: Weak<Inner<A>> = Rc::downgrade(inner);
    let timeout = Timeout::new(inner.wait_ms, move || {
        let Some(inner) = weak.upgrade() else { return };
        let fire = inner.gate.borrow_mut().expire();
        let latest = inner.latest.borrow_mut().take();
        if fire {
            if let Some(args) = latest {
                (inner.callback)(args);
            }
        }
        if inner.gate.borrow().is_pending() {
            arm(&inner);
        }
    });
    // Replacing the handle drops (and cancels) the previous timeout.
    *inner.timer.borrow_mut() = Some(timeout);
}

impl<A: 'static> Debounced<A> {
    pub fn call(&self, args: A) {
        let decision = self.inner.gate.borrow_mut().call();
        if decision.arm_timer {
            arm(&self.inner);
        }

        if decision.fire_now {
            self.inner.latest.borrow_mut().take();
            (self.inner.callback)(args);
        } else {
            *self.inner.latest.borrow_mut() = Some(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fires every window that has elapsed by `now` (all of them when `None`).
    fn expire_until(gate: &mut DebounceGate, deadline: &mut Option<u32>, window: u32, fired: &mut Vec<u32>, now: Option<u32>) {
        while let Some(due) = deadline.filter(|d| now.map_or(true, |n| *d <= n)) {
            *deadline = None;
            if gate.expire() {
                fired.push(due);
            }
            if gate.is_pending() {
                *deadline = Some(due + window);
            }
        }
    }

    /// Drives a gate with calls at `call_times` and a window of `window` ms,
    /// returning the times at which the callback fired.
    fn simulate(edge: Edge, window: u32, call_times: &[u32]) -> Vec<u32> {
        let mut gate = DebounceGate::new(edge);
        let mut deadline: Option<u32> = None;
        let mut fired = Vec::new();

        for &now in call_times {
            expire_until(&mut gate, &mut deadline, window, &mut fired, Some(now));
            let call = gate.call();
            if call.fire_now {
                fired.push(now);
            }
            if call.arm_timer {
                deadline = Some(now + window);
            }
        }
        expire_until(&mut gate, &mut deadline, window, &mut fired, None);
        fired
    }

    fn every_8ms() -> Vec<u32> {
        (0..=96).step_by(8).collect()
    }

    #[test]
    fn test_leading_fires_first_call_only() {
        let mut gate = DebounceGate::new(Edge::Leading);

        assert!(gate.call().fire_now);
        assert!(!gate.call().fire_now);
        assert!(!gate.call().fire_now);
        assert!(!gate.expire());

        // A fresh burst fires again.
        assert!(gate.call().fire_now);
    }

    #[test]
    fn test_trailing_fires_once_after_window() {
        let mut gate = DebounceGate::new(Edge::Trailing);

        assert!(!gate.call().fire_now);
        assert!(!gate.call().fire_now);
        assert!(gate.is_pending());
        assert!(gate.expire());
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_expire_without_calls_does_nothing() {
        for edge in [Edge::Leading, Edge::Trailing, Edge::Both] {
            let mut gate = DebounceGate::new(edge);
            assert!(!gate.expire());
            assert!(!gate.is_pending());
        }
    }

    #[test]
    fn test_both_keeps_firing_while_calls_outpace_window() {
        let fired = simulate(Edge::Both, 10, &every_8ms());

        assert_eq!(fired.first(), Some(&0));
        // Never more than one window between effective calls during the burst.
        assert!(fired.windows(2).all(|pair| pair[1] - pair[0] <= 10), "{:?}", fired);
        // The final call is still delivered after the burst ends.
        assert!(*fired.last().unwrap() >= 96);
    }

    #[test]
    fn test_trailing_stalls_while_calls_outpace_window() {
        assert_eq!(simulate(Edge::Trailing, 10, &every_8ms()), vec![106]);
        assert_eq!(simulate(Edge::Leading, 10, &every_8ms()), vec![0]);
    }

    #[test]
    fn test_both_single_call_fires_once() {
        assert_eq!(simulate(Edge::Both, 10, &[5]), vec![5]);
    }

    #[test]
    fn test_separate_bursts_fire_separately() {
        assert_eq!(simulate(Edge::Trailing, 10, &[0, 2, 4, 50, 52]), vec![14, 62]);
        assert_eq!(simulate(Edge::Leading, 10, &[0, 2, 4, 50, 52]), vec![0, 50]);
    }
}
