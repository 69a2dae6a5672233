// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Index: spatial and stacking indexes for an unbounded 2D canvas.
//!
//! Two geometry-agnostic building blocks live here:
//!
//! - [`QuadTree`]: a region quad-tree over item bounding boxes. Leaves split when
//!   they fill up, and the root doubles toward items that fall outside of it, so
//!   the indexed plane is effectively unbounded.
//! - [`ZOrderList`]: a total stacking order over the same handles, with
//!   constant-time reordering (forward, backward, front, back) and rank lookup.
//!
//! Both are keyed by a small copyable [`Handle`] and never own the items they
//! index. Queries take a [`Region`] to prune subtrees plus a predicate for the
//! precise per-item test, and can be sorted back-to-front through a
//! [`ZOrderList`].
//!
//! The crate is generic over the scalar type `T` and does not depend on any
//! geometry crate. Higher layers (like a canvas of drawable items) compute
//! bounding boxes and feed them here.
//!
//! # Example
//!
//! ```rust
//! use easel_index::{Aabb2D, QuadTree, ZOrderList};
//!
//! let mut tree: QuadTree<f64, u32> = QuadTree::new(Aabb2D::new(0.0, 0.0, 1000.0, 1000.0));
//! let mut order = ZOrderList::new();
//! for (id, x) in [(1_u32, 0.0), (2, 5.0), (3, 100.0)] {
//!     tree.insert(id, Aabb2D::<f64>::from_xywh(x, x, 10.0, 10.0));
//!     order.insert(id);
//! }
//!
//! // Raise the first item above the second.
//! order.bring_to_front(1);
//!
//! let hits = tree.query_ordered(
//!     &Aabb2D::<f64>::from_xywh(0.0, 0.0, 20.0, 20.0),
//!     &order,
//!     &mut |_, _| true,
//! );
//! assert_eq!(hits, vec![2, 1]);
//! ```
//!
//! ### Float semantics
//!
//! Boxes are closed: touching edges overlap and zero-area boxes are points.
//! Coordinates are assumed finite; debug builds assert it on insert.

#![no_std]

extern crate alloc;

pub mod order;
pub mod quadtree;
pub mod region;
pub mod types;

pub use order::{RANK_STEP, ZOrderList};
pub use quadtree::{NodeInfo, QuadTree, QuadTreeConfig, QuadTreeStats};
pub use region::{Handle, Region};
pub use types::{Aabb2D, Scalar};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn ordered_query_follows_stacking() {
        let mut tree: QuadTree<i64, u32> = QuadTree::new(Aabb2D::new(0, 0, 100, 100));
        let mut order = ZOrderList::new();
        for id in 0..4 {
            tree.insert(id, Aabb2D::new(0, 0, 10, 10));
            order.insert(id);
        }
        order.send_to_back(3);
        order.bring_forward(0);
        let hits = tree.query_ordered(&Aabb2D::new(5, 5, 5, 5), &order, &mut |_, _| true);
        let expected: Vec<u32> = order.iter().collect();
        assert_eq!(hits, expected);
        assert_eq!(hits, vec![3, 1, 0, 2]);
    }

    #[test]
    fn removal_from_both_keeps_them_in_step() {
        let mut tree: QuadTree<f64, usize> = QuadTree::new(Aabb2D::new(0.0, 0.0, 10.0, 10.0));
        let mut order = ZOrderList::new();
        for id in 0..20 {
            #[allow(clippy::cast_precision_loss, reason = "Small test values.")]
            let x = id as f64 * 3.0;
            tree.insert(id, Aabb2D::<f64>::from_xywh(x, 0.0, 2.0, 2.0));
            order.insert(id);
        }
        for id in (0..20).filter(|i| i % 4 == 1) {
            assert!(tree.remove(id).is_some());
            assert!(order.remove(id));
        }
        let mut all = tree.all_items();
        order.sort_back_to_front(&mut all);
        assert_eq!(all, order.iter().collect::<Vec<_>>());
    }
}
