// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based model tests for the quad-tree and the z-order list.
//!
//! Both structures are checked against a naive model after random edits:
//!
//! 1. Quad-tree region queries return exactly the boxes a linear scan finds
//! 2. Every inserted item stays findable wherever the root has grown to
//! 3. Splittable leaves never hold more than `capacity` items, even after the
//!    root has grown far past its initial region
//! 4. Z-order iteration matches a plain `Vec` kept in stacking order
//! 5. Ranks strictly increase back to front, even after many respacings

use std::collections::BTreeMap;

use easel_index::{Aabb2D, QuadTree, QuadTreeConfig, ZOrderList};
use proptest::prelude::*;

// ── Quad-tree ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(u32, Aabb2D<i64>),
    Update(u32, Aabb2D<i64>),
    Remove(u32),
}

fn aabb_strategy() -> impl Strategy<Value = Aabb2D<i64>> {
    let span = prop_oneof![4 => Just(200_i64), 1 => Just(1_000_000_i64)];
    (span, -1000_i64..1000, -1000_i64..1000, 0_i64..40, 0_i64..40).prop_map(
        |(span, x, y, w, h)| {
            let x = x * span / 1000;
            let y = y * span / 1000;
            Aabb2D::new(x, y, x + w, y + h)
        },
    )
}

/// A far box followed by a dense cluster near the origin.
fn far_then_cluster() -> impl Strategy<Value = Vec<TreeOp>> {
    (
        (1_i64 << 20..1_i64 << 40, 1_i64 << 20..1_i64 << 40),
        prop::collection::vec((0_i64..256, 0_i64..256, 0_i64..4), 20..200),
    )
        .prop_map(|((fx, fy), cluster)| {
            let mut ops = vec![TreeOp::Insert(0, Aabb2D::new(fx, -fy, fx + 8, -fy + 8))];
            ops.extend(cluster.into_iter().enumerate().map(|(i, (x, y, s))| {
                #[allow(clippy::cast_possible_truncation, reason = "Fewer than 200 ops.")]
                let k = i as u32 + 1;
                TreeOp::Insert(k, Aabb2D::new(x, y, x + s, y + s))
            }));
            ops
        })
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        4 => (0_u32..48, aabb_strategy()).prop_map(|(k, b)| TreeOp::Insert(k, b)),
        2 => (0_u32..48, aabb_strategy()).prop_map(|(k, b)| TreeOp::Update(k, b)),
        2 => (0_u32..48).prop_map(TreeOp::Remove),
    ]
}

fn sorted(mut v: Vec<u32>) -> Vec<u32> {
    v.sort_unstable();
    v
}

proptest! {
    #[test]
    fn quadtree_queries_match_linear_scan(
        ops in prop::collection::vec(tree_op_strategy(), 1..120),
        probes in prop::collection::vec(aabb_strategy(), 1..8),
    ) {
        let config = QuadTreeConfig { capacity: 2, ..QuadTreeConfig::default() };
        let mut tree = QuadTree::with_config(Aabb2D::new(0, 0, 64, 64), config);
        let mut model: BTreeMap<u32, Aabb2D<i64>> = BTreeMap::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(k, b) => {
                    let fresh = !model.contains_key(&k);
                    prop_assert_eq!(tree.insert(k, b), fresh);
                    model.insert(k, b);
                }
                TreeOp::Update(k, b) => {
                    let known = model.contains_key(&k);
                    prop_assert_eq!(tree.update(k, b), known);
                    if known {
                        model.insert(k, b);
                    }
                }
                TreeOp::Remove(k) => {
                    prop_assert_eq!(tree.remove(k), model.remove(&k));
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        for (k, b) in &model {
            prop_assert!(tree.root_bounds().contains(b), "root does not cover {:?}", k);
            prop_assert_eq!(tree.bounds_of(*k), Some(*b));
        }
        prop_assert_eq!(sorted(tree.all_items()), model.keys().copied().collect::<Vec<_>>());

        for probe in &probes {
            let expected: Vec<u32> = model
                .iter()
                .filter(|(_, b)| b.overlaps(probe))
                .map(|(k, _)| *k)
                .collect();
            let got = tree.query_rect(*probe);
            let got = sorted(got);
            prop_assert!(got.windows(2).all(|w| w[0] != w[1]), "query reported an item twice");
            prop_assert_eq!(got, expected);
        }
    }
}

proptest! {
    // Removal may leave a leaf of straddlers behind, so only insertions are
    // checked against the capacity bound.
    #[test]
    fn growth_does_not_stop_splitting(ops in far_then_cluster()) {
        let config = QuadTreeConfig { capacity: 2, ..QuadTreeConfig::default() };
        let mut tree = QuadTree::with_config(Aabb2D::new(0, 0, 64, 64), config);
        for op in &ops {
            if let TreeOp::Insert(k, b) = *op {
                prop_assert!(tree.insert(k, b));
            }
        }
        prop_assert!(tree.stats().depth >= 15, "far box grows the root");

        let mut crowded = None;
        tree.visit_nodes(|info| {
            let splittable = info.is_leaf
                && i64::from(info.level) < i64::from(config.max_depth)
                && info.bounds.width() >= 2
                && info.bounds.height() >= 2;
            if splittable && info.local_items > config.capacity {
                crowded = Some(info);
            }
        });
        prop_assert!(crowded.is_none(), "leaf over capacity: {:?}", crowded);
    }
}

// ── Z-order ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum OrderOp {
    Insert(u32),
    InsertAbove(u32, usize),
    Remove(u32),
    Forward(u32),
    Backward(u32),
    ToFront(u32),
    ToBack(u32),
}

fn order_op_strategy() -> impl Strategy<Value = OrderOp> {
    prop_oneof![
        3 => (0_u32..32).prop_map(OrderOp::Insert),
        3 => (0_u32..32, any::<usize>()).prop_map(|(k, at)| OrderOp::InsertAbove(k, at)),
        2 => (0_u32..32).prop_map(OrderOp::Remove),
        1 => (0_u32..32).prop_map(OrderOp::Forward),
        1 => (0_u32..32).prop_map(OrderOp::Backward),
        1 => (0_u32..32).prop_map(OrderOp::ToFront),
        1 => (0_u32..32).prop_map(OrderOp::ToBack),
    ]
}

fn position(model: &[u32], k: u32) -> Option<usize> {
    model.iter().position(|m| *m == k)
}

proptest! {
    #[test]
    fn z_order_matches_vec_model(ops in prop::collection::vec(order_op_strategy(), 1..200)) {
        let mut order = ZOrderList::new();
        // Back to front.
        let mut model: Vec<u32> = Vec::new();

        for op in &ops {
            match *op {
                OrderOp::Insert(k) => {
                    let fresh = position(&model, k).is_none();
                    prop_assert_eq!(order.insert(k), fresh);
                    if fresh {
                        model.push(k);
                    }
                }
                OrderOp::InsertAbove(k, at) => {
                    if position(&model, k).is_some() || model.is_empty() {
                        continue;
                    }
                    // Always wedge between two neighbours to exercise midpoint splitting.
                    let anchor = model[at % model.len()];
                    prop_assert!(order.insert_above(k, Some(anchor)));
                    let i = position(&model, anchor).unwrap();
                    model.insert(i + 1, k);
                }
                OrderOp::Remove(k) => {
                    let at = position(&model, k);
                    prop_assert_eq!(order.remove(k), at.is_some());
                    if let Some(i) = at {
                        model.remove(i);
                    }
                }
                OrderOp::Forward(k) => {
                    let moved = position(&model, k).filter(|i| i + 1 < model.len());
                    prop_assert_eq!(order.bring_forward(k), moved.is_some());
                    if let Some(i) = moved {
                        model.swap(i, i + 1);
                    }
                }
                OrderOp::Backward(k) => {
                    let moved = position(&model, k).filter(|i| *i > 0);
                    prop_assert_eq!(order.send_backward(k), moved.is_some());
                    if let Some(i) = moved {
                        model.swap(i - 1, i);
                    }
                }
                OrderOp::ToFront(k) => {
                    let moved = position(&model, k).filter(|i| i + 1 < model.len());
                    prop_assert_eq!(order.bring_to_front(k), moved.is_some());
                    if let Some(i) = moved {
                        let k = model.remove(i);
                        model.push(k);
                    }
                }
                OrderOp::ToBack(k) => {
                    let moved = position(&model, k).filter(|i| *i > 0);
                    prop_assert_eq!(order.send_to_back(k), moved.is_some());
                    if let Some(i) = moved {
                        let k = model.remove(i);
                        model.insert(0, k);
                    }
                }
            }
            prop_assert_eq!(order.iter().collect::<Vec<_>>(), model.clone());
        }

        let ranks: Vec<i64> = model.iter().filter_map(|k| order.z_index(*k)).collect();
        prop_assert_eq!(ranks.len(), model.len());
        prop_assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(order.front(), model.last().copied());
        prop_assert_eq!(order.back(), model.first().copied());
    }
}
