// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use kurbo::Rect;

use crate::types::ItemId;

/// Why an item could not be added to a [`Canvas`](crate::Canvas).
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// The bounding box has a NaN or infinite coordinate.
    #[error("item bounds are not finite: {0:?}")]
    NonFiniteBounds(Rect),
    /// The bounding box has `x0 > x1` or `y0 > y1`.
    #[error("item bounds are inverted: {0:?}")]
    InvertedBounds(Rect),
}

/// A broken consistency rule between the canvas, its spatial index and its z-order.
///
/// Returned by [`Canvas::check_invariants`](crate::Canvas::check_invariants).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// The index, the z-order list and the arena disagree on the item count.
    #[error("item counts differ: {items} live, {indexed} indexed, {ordered} ordered")]
    CountMismatch {
        /// Live items in the arena.
        items: usize,
        /// Items in the spatial index.
        indexed: usize,
        /// Items in the z-order list.
        ordered: usize,
    },
    /// A live item is missing from the spatial index.
    #[error("{0:?} is not indexed")]
    NotIndexed(ItemId),
    /// A live item is missing from the z-order list.
    #[error("{0:?} is not in the z-order list")]
    NotOrdered(ItemId),
    /// A live item is indexed under a box other than its current bounds.
    #[error("{0:?} is indexed under stale bounds")]
    StaleBounds(ItemId),
    /// A query returned the same item twice.
    #[error("{0:?} reported twice by one query")]
    DuplicateHit(ItemId),
}
