//! Cursor over a [`MarkerIndex`].
//!
//! Positions count navigable entries only, as [`MarkerIndex::nth`] does, so
//! position 2 is the third highlight the user can actually visit. Moving
//! past either end wraps around.

use super::{Entry, MarkerIndex, Placement};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    position: Option<usize>,
    groups: Option<Vec<String>>,
    total: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Active entries within the cursor's groups, as of the last
    /// [`Cursor::update`].
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn groups(&self) -> Option<&[String]> {
        self.groups.as_deref()
    }

    /// Restrict movement to `groups`, or lift the restriction with `None`.
    /// Clears the position.
    pub fn set_groups<H: Placement + PartialEq>(
        &mut self,
        groups: Option<&[&str]>,
        index: &MarkerIndex<H>,
    ) {
        self.groups = groups.map(|names| names.iter().map(|n| n.to_string()).collect());
        self.clear(index);
    }

    pub fn clear<H: Placement + PartialEq>(&mut self, index: &MarkerIndex<H>) {
        self.position = None;
        self.update(index);
    }

    /// Recount [`Cursor::total`]. Hosts call this after the index notifies.
    pub fn update<H: Placement + PartialEq>(&mut self, index: &MarkerIndex<H>) {
        self.total = {
            let names = self.names();
            index.count_active(names.as_deref())
        };
    }

    /// Move to the `position`-th navigable entry, wrapping to the first when
    /// `position` is past the end.
    ///
    /// Returns `None` and leaves the cursor where it was when nothing is
    /// navigable.
    pub fn set<'m, H: Placement + PartialEq>(
        &mut self,
        position: usize,
        index: &'m MarkerIndex<H>,
    ) -> Option<&'m Entry<H>> {
        let (position, entry) = {
            let names = self.names();
            let groups = names.as_deref();
            match index.nth(position, groups) {
                Some(entry) => (position, entry),
                None => {
                    log::trace!("cursor position {position} overflows, wrapping");
                    (0, index.nth(0, groups)?)
                }
            }
        };
        self.position = Some(position);
        Some(entry)
    }

    pub fn next<'m, H: Placement + PartialEq>(
        &mut self,
        index: &'m MarkerIndex<H>,
    ) -> Option<&'m Entry<H>> {
        let position = self.position.map_or(0, |p| p + 1);
        self.set(position, index)
    }

    pub fn prev<'m, H: Placement + PartialEq>(
        &mut self,
        index: &'m MarkerIndex<H>,
    ) -> Option<&'m Entry<H>> {
        let position = match self.position {
            Some(p) if p > 0 => p - 1,
            _ => {
                let names = self.names();
                index.count_navigable(names.as_deref()).checked_sub(1)?
            }
        };
        self.set(position, index)
    }

    fn names(&self) -> Option<Vec<&str>> {
        self.groups
            .as_ref()
            .map(|names| names.iter().map(String::as_str).collect())
    }
}
