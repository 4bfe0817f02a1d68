//! # Marker Index
//!
//! Placed highlights ordered by flattened start offset, regardless of group,
//! so a host can move a cursor from one highlight to the next.
//!
//! - **`cursor`**: the host's current position among navigable highlights
//! - **`notify`**: debounced change notification driven by an injectable clock

pub mod cursor;
pub mod notify;

pub use cursor::Cursor;
pub use notify::{Clock, ManualClock, Notifier, Subscription, SystemClock};

use std::time::{Duration, Instant};

/// What the index needs to know about a placed highlight.
pub trait Placement {
    /// Name of the group owning the highlight.
    fn group(&self) -> &str;

    fn group_enabled(&self) -> bool;

    /// Whether the highlight is rendered and visible. Evaluated on every
    /// query, never cached.
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<H> {
    pub item: H,
    pub offset: usize,
}

#[derive(Debug)]
pub struct MarkerIndex<H> {
    entries: Vec<Entry<H>>,
    notifier: Notifier,
}

impl<H: Placement + PartialEq> MarkerIndex<H> {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, SystemClock)
    }

    pub fn with_clock(delay: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            entries: Vec::new(),
            notifier: Notifier::new(delay, clock),
        }
    }

    /// Insert `item` at `offset`, after any entries with the same offset.
    pub fn insert(&mut self, item: H, offset: usize) {
        let position = self.entries.partition_point(|e| e.offset <= offset);
        self.entries.insert(position, Entry { item, offset });
        self.notifier.schedule();
    }

    pub fn remove(&mut self, item: &H) -> bool {
        let Some(position) = self.entries.iter().position(|e| &e.item == item) else {
            return false;
        };
        self.entries.remove(position);
        self.notifier.schedule();
        true
    }

    /// Remove every entry whose group matches `owned`; returns how many.
    pub fn remove_all(&mut self, mut owned: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !owned(e.item.group()));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.notifier.schedule();
        }
        removed
    }

    /// Number of entries, optionally restricted to the named groups.
    pub fn count(&self, groups: Option<&[&str]>) -> usize {
        self.entries
            .iter()
            .filter(|e| in_groups(&e.item, groups))
            .count()
    }

    pub fn count_active(&self, groups: Option<&[&str]>) -> usize {
        self.entries
            .iter()
            .filter(|e| in_groups(&e.item, groups) && e.item.is_active())
            .count()
    }

    /// The `position`-th navigable entry in offset order.
    ///
    /// Entries in disabled groups, outside `groups`, or inactive are skipped
    /// and do not count toward `position`.
    pub fn nth(&self, position: usize, groups: Option<&[&str]>) -> Option<&Entry<H>> {
        self.navigable(groups).nth(position)
    }

    /// Number of entries [`MarkerIndex::nth`] can reach.
    pub fn count_navigable(&self, groups: Option<&[&str]>) -> usize {
        self.navigable(groups).count()
    }

    fn navigable<'a>(&'a self, groups: Option<&[&str]>) -> impl Iterator<Item = &'a Entry<H>> {
        self.entries.iter().filter(move |e| {
            e.item.group_enabled() && in_groups(&e.item, groups) && e.item.is_active()
        })
    }

    pub fn get(&self, index: usize) -> Option<&Entry<H>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<H>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> Subscription {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.notifier.unsubscribe(subscription)
    }

    /// Deliver the pending change notification if it is due.
    pub fn poll(&mut self) -> bool {
        self.notifier.poll()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.notifier.next_deadline()
    }

    /// Cancel any pending notification and drop listeners and entries.
    pub fn dispose(&mut self) {
        self.notifier.dispose();
        self.entries.clear();
    }
}

fn in_groups<H: Placement>(item: &H, groups: Option<&[&str]>) -> bool {
    groups.is_none_or(|names| names.contains(&item.group()))
}
