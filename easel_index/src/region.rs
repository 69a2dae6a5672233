// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query shapes and item handles shared by the quad-tree and the z-order list.

use core::fmt::Debug;

use crate::types::Aabb2D;

/// A query shape.
///
/// The quad-tree only needs two things from a shape: a bounding box to test
/// item boxes against, and an intersection test with a rectangular node
/// region so whole subtrees can be skipped. Precise per-item matching is left
/// to the predicate passed alongside the region.
pub trait Region<T: Copy + PartialOrd> {
    /// Axis-aligned bounds of the shape.
    fn bounds(&self) -> Aabb2D<T>;

    /// Whether the shape touches the given box.
    ///
    /// The default compares bounds only, which is exact for rectangles and
    /// conservative for anything else.
    fn intersects_aabb(&self, aabb: &Aabb2D<T>) -> bool {
        self.bounds().overlaps(aabb)
    }
}

impl<T: Copy + PartialOrd> Region<T> for Aabb2D<T> {
    fn bounds(&self) -> Aabb2D<T> {
        *self
    }
}

/// Identity of an indexed item.
///
/// Handles are small, copyable, and map onto a dense slot number. Both the
/// quad-tree and the z-order list use the slot for constant-time
/// back-references, and compare the full handle so a reused slot never
/// aliases a stale handle.
pub trait Handle: Copy + Eq + Debug {
    /// Dense slot number for this handle.
    fn slot(self) -> usize;
}

impl Handle for usize {
    #[inline]
    fn slot(self) -> usize {
        self
    }
}

impl Handle for u32 {
    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}
