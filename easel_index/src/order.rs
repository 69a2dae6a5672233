// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Total stacking order over a set of handles.
//!
//! [`ZOrderList`] is a doubly-linked list threaded through a dense slot table,
//! so membership, rank lookup, unlinking and neighbour swaps are all
//! constant-time. Each entry carries an integer rank; iteration order equals
//! ascending rank order (back to front).
//!
//! Ranks are only meaningful relative to each other. They are spaced
//! [`RANK_STEP`] apart so that an entry can usually be placed between two
//! neighbours by taking the midpoint; removals leave gaps behind.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::region::Handle;

/// Distance between the ranks of freshly placed neighbours.
pub const RANK_STEP: i64 = 1 << 20;

#[derive(Copy, Clone, Debug)]
struct Link<K> {
    handle: K,
    rank: i64,
    /// Neighbour toward the back.
    below: Option<usize>,
    /// Neighbour toward the front.
    above: Option<usize>,
}

/// Stacking order over handles: the back is painted first, the front is hit first.
#[derive(Clone)]
pub struct ZOrderList<K: Handle> {
    links: Vec<Option<Link<K>>>,
    back: Option<usize>,
    front: Option<usize>,
    len: usize,
}

impl<K: Handle> Default for ZOrderList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Handle> Debug for ZOrderList<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Handle> ZOrderList<K> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            links: Vec::new(),
            back: None,
            front: None,
            len: 0,
        }
    }

    /// Number of handles in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `handle` is in the list.
    pub fn has_item(&self, handle: K) -> bool {
        self.link(handle).is_some()
    }

    /// Rank of `handle`, or `None` if absent.
    ///
    /// Ranks order present handles; their absolute values carry no meaning and
    /// may change when the list is respaced.
    pub fn z_index(&self, handle: K) -> Option<i64> {
        self.link(handle).map(|l| l.rank)
    }

    /// Compare the stacking position of two present handles.
    pub fn compare(&self, a: K, b: K) -> Option<Ordering> {
        Some(self.z_index(a)?.cmp(&self.z_index(b)?))
    }

    /// Frontmost handle.
    pub fn front(&self) -> Option<K> {
        self.front.map(|s| self.at(s).handle)
    }

    /// Backmost handle.
    pub fn back(&self) -> Option<K> {
        self.back.map(|s| self.at(s).handle)
    }

    /// Handle directly behind `handle`.
    pub fn below(&self, handle: K) -> Option<K> {
        self.link(handle)?.below.map(|s| self.at(s).handle)
    }

    /// Handle directly in front of `handle`.
    pub fn above(&self, handle: K) -> Option<K> {
        self.link(handle)?.above.map(|s| self.at(s).handle)
    }

    /// Add `handle` as the new frontmost entry.
    ///
    /// Returns `false` and leaves the list untouched if it is already present.
    pub fn insert(&mut self, handle: K) -> bool {
        if self.has_item(handle) {
            return false;
        }
        let rank = self.front_rank();
        self.attach(handle, rank);
        self.link_above(handle.slot(), self.front);
        true
    }

    /// Add `handle` directly in front of `anchor`, or at the very back for `None`.
    ///
    /// An anchor that is not in the list places `handle` at the front.
    /// Returns `false` if `handle` is already present.
    pub fn insert_above(&mut self, handle: K, anchor: Option<K>) -> bool {
        if self.has_item(handle) {
            return false;
        }
        self.attach(handle, 0);
        self.place_above(handle.slot(), anchor);
        true
    }

    /// Remove `handle`. Survivors keep their ranks.
    ///
    /// Returns `false` if it was absent.
    pub fn remove(&mut self, handle: K) -> bool {
        if !self.has_item(handle) {
            return false;
        }
        let slot = handle.slot();
        self.unlink(slot);
        self.links[slot] = None;
        self.len -= 1;
        true
    }

    /// Remove every handle.
    pub fn clear(&mut self) {
        self.links.clear();
        self.back = None;
        self.front = None;
        self.len = 0;
    }

    /// Swap `handle` with its neighbour in front. Returns whether it moved.
    pub fn bring_forward(&mut self, handle: K) -> bool {
        let Some(above) = self.link(handle).and_then(|l| l.above) else {
            return false;
        };
        let slot = handle.slot();
        self.unlink(slot);
        self.link_above(slot, Some(above));
        self.swap_ranks(slot, above);
        true
    }

    /// Swap `handle` with its neighbour behind. Returns whether it moved.
    pub fn send_backward(&mut self, handle: K) -> bool {
        let Some(below) = self.link(handle).and_then(|l| l.below) else {
            return false;
        };
        let slot = handle.slot();
        let target = self.at(below).below;
        self.unlink(slot);
        self.link_above(slot, target);
        self.swap_ranks(slot, below);
        true
    }

    /// Move `handle` to the front. Returns whether it moved.
    pub fn bring_to_front(&mut self, handle: K) -> bool {
        let slot = handle.slot();
        if !self.has_item(handle) || self.front == Some(slot) {
            return false;
        }
        self.unlink(slot);
        let rank = self.front_rank();
        self.at_mut(slot).rank = rank;
        self.link_above(slot, self.front);
        true
    }

    /// Move `handle` to the back. Returns whether it moved.
    pub fn send_to_back(&mut self, handle: K) -> bool {
        let slot = handle.slot();
        if !self.has_item(handle) || self.back == Some(slot) {
            return false;
        }
        self.unlink(slot);
        let rank = self.back_rank();
        self.at_mut(slot).rank = rank;
        self.link_above(slot, None);
        true
    }

    /// Move `handle` directly in front of `anchor`, or to the back for `None`.
    ///
    /// Used to put an entry back where it was. An absent anchor moves it to the
    /// front. Returns `false` if `handle` is absent or `anchor == Some(handle)`.
    pub fn move_above(&mut self, handle: K, anchor: Option<K>) -> bool {
        if !self.has_item(handle) || anchor == Some(handle) {
            return false;
        }
        let slot = handle.slot();
        self.unlink(slot);
        self.place_above(slot, anchor);
        true
    }

    /// Iterate back to front (paint order).
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        let mut cursor = self.back;
        core::iter::from_fn(move || {
            let link = self.at(cursor?);
            cursor = link.above;
            Some(link.handle)
        })
    }

    /// Iterate front to back (hit order).
    pub fn iter_front_to_back(&self) -> impl Iterator<Item = K> + '_ {
        let mut cursor = self.front;
        core::iter::from_fn(move || {
            let link = self.at(cursor?);
            cursor = link.below;
            Some(link.handle)
        })
    }

    /// Sort handles back to front. Handles not in the list sort first.
    pub fn sort_back_to_front(&self, handles: &mut [K]) {
        handles.sort_by_cached_key(|h| self.z_index(*h));
    }

    // --- internals ---

    fn link(&self, handle: K) -> Option<&Link<K>> {
        self.links
            .get(handle.slot())?
            .as_ref()
            .filter(|l| l.handle == handle)
    }

    fn at(&self, slot: usize) -> &Link<K> {
        self.links[slot].as_ref().expect("dangling z-order link")
    }

    fn at_mut(&mut self, slot: usize) -> &mut Link<K> {
        self.links[slot].as_mut().expect("dangling z-order link")
    }

    fn front_rank(&self) -> i64 {
        self.front
            .map(|s| self.at(s).rank.saturating_add(RANK_STEP))
            .unwrap_or(0)
    }

    fn back_rank(&self) -> i64 {
        self.back
            .map(|s| self.at(s).rank.saturating_sub(RANK_STEP))
            .unwrap_or(0)
    }

    /// Store an unlinked entry for `handle`.
    fn attach(&mut self, handle: K, rank: i64) {
        let slot = handle.slot();
        if self.links.len() <= slot {
            self.links.resize_with(slot + 1, || None);
        }
        self.links[slot] = Some(Link {
            handle,
            rank,
            below: None,
            above: None,
        });
        self.len += 1;
    }

    /// Link an unlinked `slot` in front of `anchor`'s position and give it a rank there.
    fn place_above(&mut self, slot: usize, anchor: Option<K>) {
        let anchor = match anchor {
            None => None,
            Some(a) if self.has_item(a) => Some(a.slot()),
            Some(_) => self.front,
        };
        let rank = match anchor {
            None => self.back_rank(),
            Some(a) => match self.at(a).above {
                None => self.front_rank(),
                Some(next) => match midpoint(self.at(a).rank, self.at(next).rank) {
                    Some(r) => r,
                    None => {
                        self.respace();
                        midpoint(self.at(a).rank, self.at(next).rank)
                            .expect("respaced ranks leave room between neighbours")
                    }
                },
            },
        };
        self.at_mut(slot).rank = rank;
        self.link_above(slot, anchor);
    }

    /// Reassign ranks in list order, `RANK_STEP` apart.
    fn respace(&mut self) {
        let mut cursor = self.back;
        let mut rank = 0_i64;
        while let Some(slot) = cursor {
            let link = self.at_mut(slot);
            link.rank = rank;
            cursor = link.above;
            rank = rank.saturating_add(RANK_STEP);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len, "z-order ranks respaced");
    }

    fn swap_ranks(&mut self, a: usize, b: usize) {
        let ra = self.at(a).rank;
        let rb = self.at(b).rank;
        self.at_mut(a).rank = rb;
        self.at_mut(b).rank = ra;
    }

    /// Splice `slot` out of the chain, leaving its entry in place.
    fn unlink(&mut self, slot: usize) {
        let Link { below, above, .. } = *self.at(slot);
        match below {
            Some(b) => self.at_mut(b).above = above,
            None => self.back = above,
        }
        match above {
            Some(a) => self.at_mut(a).below = below,
            None => self.front = below,
        }
        let link = self.at_mut(slot);
        link.below = None;
        link.above = None;
    }

    /// Splice an unlinked `slot` directly in front of `anchor` (or at the back).
    fn link_above(&mut self, slot: usize, anchor: Option<usize>) {
        let above = match anchor {
            Some(a) => self.at(a).above,
            None => self.back,
        };
        {
            let link = self.at_mut(slot);
            link.below = anchor;
            link.above = above;
        }
        match anchor {
            Some(a) => self.at_mut(a).above = Some(slot),
            None => self.back = Some(slot),
        }
        match above {
            Some(n) => self.at_mut(n).below = Some(slot),
            None => self.front = Some(slot),
        }
    }
}

fn midpoint(lo: i64, hi: i64) -> Option<i64> {
    let gap = hi.checked_sub(lo)?;
    (gap > 1).then(|| lo + gap / 2)
}
