//! Debounced change notification.
//!
//! The notifier owns no timer. Every mutation pushes a single deadline
//! forward; the host event loop arms its own timer from
//! [`Notifier::next_deadline`] and calls [`Notifier::poll`] when it expires.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut()>;

/// Fires listeners once per burst of changes.
pub struct Notifier {
    delay: Duration,
    clock: Box<dyn Clock>,
    listeners: Vec<(Subscription, Listener)>,
    next_id: u64,
    deadline: Option<Instant>,
}

impl Notifier {
    pub fn new(delay: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            delay,
            clock: Box::new(clock),
            listeners: Vec::new(),
            next_id: 0,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    /// Push the pending notification to `delay` from now.
    pub fn schedule(&mut self) {
        self.deadline = Some(self.clock.now() + self.delay);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire the pending notification if its deadline has passed.
    ///
    /// Returns whether listeners were called.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.deadline = None;
                log::trace!("notifying {} listener(s)", self.listeners.len());
                for (_, listener) in &mut self.listeners {
                    listener();
                }
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending notification and drop every listener.
    pub fn dispose(&mut self) {
        self.deadline = None;
        self.listeners.clear();
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("delay", &self.delay)
            .field("listeners", &self.listeners.len())
            .field("deadline", &self.deadline)
            .finish()
    }
}
