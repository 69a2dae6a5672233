// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the canvas: item identifiers, flags, kinds, and query filters.

use easel_index::Handle;

/// Identifier for an item on a [`Canvas`](crate::Canvas).
///
/// This is a small, copyable handle that stays stable while the item lives but
/// becomes invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On add, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ItemId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ItemId`.
/// - [`Canvas::restore`](crate::Canvas::restore) brings a removed item back under
///   its *old* id, provided the slot has not been reused meanwhile. Undo relies on
///   this so later history entries keep pointing at the right item.
///
/// ### Liveness
///
/// Use [`Canvas::contains`](crate::Canvas::contains) to check whether an `ItemId` still refers to a live item.
/// Stale `ItemId`s never alias a different live item because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32, pub(crate) u32);

impl ItemId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

impl Handle for ItemId {
    #[inline]
    fn slot(self) -> usize {
        self.idx()
    }
}

bitflags::bitflags! {
    /// Item flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// Item is visible (participates in painting and region queries).
        const VISIBLE  = 0b0000_0001;
        /// Item is pickable (participates in hit testing and erasing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// The kind of drawable an item is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Axis-aligned rectangle outline.
    Rectangle,
    /// Axis-aligned ellipse outline.
    Ellipse,
    /// Straight segment.
    Line,
    /// Straight segment with an arrow head at its end.
    Arrow,
    /// Freehand polyline stroke.
    Freeform,
    /// Text box.
    Text,
}

/// Filters applied during queries and hit testing.
///
/// Used by [`Canvas::query`](crate::Canvas::query) and [`Canvas::hit_test`](crate::Canvas::hit_test).
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, only consider items marked [`ItemFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider items marked [`ItemFlags::PICKABLE`].
    pub pickable_only: bool,
}

impl QueryFilter {
    /// Filter for painting: visible items only.
    pub const PAINT: Self = Self {
        visible_only: true,
        pickable_only: false,
    };

    /// Filter for pointer interaction: visible and pickable items only.
    pub const PICK: Self = Self {
        visible_only: true,
        pickable_only: true,
    };

    /// Whether an item with `flags` passes this filter.
    pub fn accepts(&self, flags: ItemFlags) -> bool {
        (!self.visible_only || flags.contains(ItemFlags::VISIBLE))
            && (!self.pickable_only || flags.contains(ItemFlags::PICKABLE))
    }
}
