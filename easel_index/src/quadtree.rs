// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region quad-tree over item bounding boxes, with a root that grows on demand.
//!
//! Every item lives at exactly one node: the shallowest node whose region fully
//! contains its bounding box. Leaves hold up to `capacity` items; once a leaf is
//! full and may still subdivide, it splits into four equal quadrants and pushes
//! down every item that fits wholly inside one of them. Items straddling the
//! split lines stay where they are.
//!
//! The root starts at a caller-chosen region. Inserting outside of it doubles
//! the root repeatedly, keeping the old root as one quadrant of the new one, so
//! the canvas behaves as unbounded without pre-allocating anything.
//!
//! Subdivision limits are counted in levels relative to the initial root, not
//! in distance from the current root. Growing the root adds levels above the
//! initial one (numbered below zero), so far-away items never use up the
//! subdivision budget of the region they were inserted around.

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::order::ZOrderList;
use crate::region::{Handle, Region};
use crate::types::{Aabb2D, Scalar, le, lt};

/// Construction-time tuning for a [`QuadTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadTreeConfig<T> {
    /// Number of items a leaf holds before it splits.
    pub capacity: usize,
    /// Nodes at this level never split. The initial root is level 0; roots
    /// created by growth sit at negative levels.
    pub max_depth: u32,
    /// Nodes whose quadrants would be narrower or shorter than this never split.
    pub min_extent: T,
}

impl<T: Scalar> Default for QuadTreeConfig<T> {
    fn default() -> Self {
        Self {
            capacity: 8,
            max_depth: 16,
            min_extent: T::one(),
        }
    }
}

/// Summary of the current node structure, for diagnostics and tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadTreeStats {
    /// Indexed items.
    pub items: usize,
    /// Live nodes, internal and leaf.
    pub nodes: usize,
    /// Live leaves.
    pub leaves: usize,
    /// Depth of the deepest live node.
    pub depth: u32,
    /// Largest local item list of any node.
    pub max_local_items: usize,
}

/// A node as seen by [`QuadTree::visit_nodes`].
#[derive(Copy, Clone, Debug)]
pub struct NodeInfo<T> {
    /// Region covered by the node.
    pub bounds: Aabb2D<T>,
    /// Distance from the current root.
    pub depth: u32,
    /// Subdivision level relative to the initial root.
    pub level: i32,
    /// Items stored directly at this node.
    pub local_items: usize,
    /// Whether the node has no children.
    pub is_leaf: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct QNode<K, T> {
    bounds: Aabb2D<T>,
    parent: Option<NodeIdx>,
    level: i32,
    /// Top-left, top-right, bottom-right, bottom-left.
    children: Option<[NodeIdx; 4]>,
    items: Vec<(K, Aabb2D<T>)>,
}

#[derive(Copy, Clone, Debug)]
struct SlotRef<K, T> {
    handle: K,
    node: NodeIdx,
    aabb: Aabb2D<T>,
}

/// Quad-tree spatial index keyed by item [`Handle`]s.
pub struct QuadTree<T: Scalar, K: Handle> {
    config: QuadTreeConfig<T>,
    root: NodeIdx,
    arena: Vec<QNode<K, T>>,
    free_nodes: Vec<NodeIdx>,
    slots: Vec<Option<SlotRef<K, T>>>,
    len: usize,
}

impl<T: Scalar, K: Handle> Debug for QuadTree<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let stats = self.stats();
        f.debug_struct("QuadTree")
            .field("root", &self.root_bounds())
            .field("items", &stats.items)
            .field("nodes", &stats.nodes)
            .field("depth", &stats.depth)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, K: Handle> QuadTree<T, K> {
    /// Create an empty tree over `root` with the default configuration.
    pub fn new(root: Aabb2D<T>) -> Self {
        Self::with_config(root, QuadTreeConfig::default())
    }

    /// Create an empty tree over `root`.
    ///
    /// A root narrower or shorter than one unit is widened to one unit so that
    /// doubling it can always reach a far-away item.
    pub fn with_config(root: Aabb2D<T>, config: QuadTreeConfig<T>) -> Self {
        debug_assert!(root.is_valid(), "root region must be finite: {root:?}");
        let mut root = root;
        if lt(root.width(), T::one()) {
            root.max_x = T::add(root.min_x, T::one());
        }
        if lt(root.height(), T::one()) {
            root.max_y = T::add(root.min_y, T::one());
        }
        Self {
            config,
            root: NodeIdx::new(0),
            arena: vec![QNode {
                bounds: root,
                parent: None,
                level: 0,
                children: None,
                items: Vec::new(),
            }],
            free_nodes: Vec::new(),
            slots: Vec::new(),
            len: 0,
        }
    }

    /// The configuration the tree was built with.
    pub fn config(&self) -> &QuadTreeConfig<T> {
        &self.config
    }

    /// Region currently covered by the root node.
    pub fn root_bounds(&self) -> Aabb2D<T> {
        self.arena[self.root.get()].bounds
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `handle` is indexed.
    pub fn contains(&self, handle: K) -> bool {
        self.slot_ref(handle).is_some()
    }

    /// Bounding box `handle` was indexed with.
    pub fn bounds_of(&self, handle: K) -> Option<Aabb2D<T>> {
        self.slot_ref(handle).map(|s| s.aabb)
    }

    /// Index `handle` under `aabb`.
    ///
    /// The box must be finite and not inverted; debug builds assert this.
    /// Re-inserting a present handle moves it to the new box. Returns `true` if
    /// the handle was not present before.
    pub fn insert(&mut self, handle: K, aabb: Aabb2D<T>) -> bool {
        debug_assert!(aabb.is_valid(), "item box must be finite: {aabb:?}");
        let fresh = self.remove(handle).is_none();
        self.grow_to_fit(&aabb);
        self.place(self.root, handle, aabb);
        self.len += 1;
        fresh
    }

    /// Move a present handle to a new box. Returns `false` if it is absent.
    pub fn update(&mut self, handle: K, aabb: Aabb2D<T>) -> bool {
        if !self.contains(handle) {
            return false;
        }
        self.insert(handle, aabb);
        true
    }

    /// Remove `handle`, returning the box it was indexed with.
    ///
    /// Returns `None` without touching anything if the handle is absent.
    pub fn remove(&mut self, handle: K) -> Option<Aabb2D<T>> {
        let entry = *self.slot_ref(handle)?;
        self.slots[handle.slot()] = None;
        let items = &mut self.arena[entry.node.get()].items;
        if let Some(pos) = items.iter().position(|(h, _)| *h == handle) {
            items.swap_remove(pos);
        }
        self.len -= 1;
        self.prune(entry.node);
        Some(entry.aabb)
    }

    /// Remove every item. The root keeps its current extent.
    pub fn clear(&mut self) {
        let bounds = self.root_bounds();
        let level = self.arena[self.root.get()].level;
        self.arena.clear();
        self.arena.push(QNode {
            bounds,
            parent: None,
            level,
            children: None,
            items: Vec::new(),
        });
        self.root = NodeIdx::new(0);
        self.free_nodes.clear();
        self.slots.clear();
        self.len = 0;
    }

    /// Collect items whose box touches `region` and that `predicate` accepts.
    ///
    /// Subtrees whose region does not touch `region` are skipped. The result
    /// has no particular order and never contains a handle twice.
    pub fn query(
        &self,
        region: &dyn Region<T>,
        predicate: &mut dyn FnMut(K, &Aabb2D<T>) -> bool,
    ) -> Vec<K> {
        let mut out = Vec::new();
        if region.bounds().is_empty() {
            return out;
        }
        let mut seen = BTreeSet::new();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx.get()];
            if !region.intersects_aabb(&node.bounds) {
                continue;
            }
            for (handle, aabb) in &node.items {
                if region.intersects_aabb(aabb) && predicate(*handle, aabb) {
                    let fresh = seen.insert(handle.slot());
                    debug_assert!(fresh, "item stored at more than one node: {handle:?}");
                    if fresh {
                        out.push(*handle);
                    }
                }
            }
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        out
    }

    /// Like [`query`](Self::query), sorted back-to-front by `order`.
    pub fn query_ordered(
        &self,
        region: &dyn Region<T>,
        order: &ZOrderList<K>,
        predicate: &mut dyn FnMut(K, &Aabb2D<T>) -> bool,
    ) -> Vec<K> {
        let mut hits = self.query(region, predicate);
        debug_assert!(
            hits.iter().all(|h| order.has_item(*h)),
            "indexed item missing from the z-order list"
        );
        order.sort_back_to_front(&mut hits);
        hits
    }

    /// Items whose box touches `rect`, unordered.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> Vec<K> {
        self.query(&rect, &mut |_, _| true)
    }

    /// Items whose box contains the point, unordered.
    pub fn query_point(&self, x: T, y: T) -> Vec<K> {
        self.query_rect(Aabb2D::new(x, y, x, y))
    }

    /// Every indexed item, found by walking the whole tree. No ordering guarantee.
    pub fn all_items(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx.get()];
            out.extend(node.items.iter().map(|(h, _)| *h));
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        out
    }

    /// Call `f` for every live node, parents before children.
    pub fn visit_nodes(&self, mut f: impl FnMut(NodeInfo<T>)) {
        let mut stack = vec![(self.root, 0_u32)];
        while let Some((idx, depth)) = stack.pop() {
            let node = &self.arena[idx.get()];
            f(NodeInfo {
                bounds: node.bounds,
                depth,
                level: node.level,
                local_items: node.items.len(),
                is_leaf: node.children.is_none(),
            });
            if let Some(children) = node.children {
                stack.extend(children.iter().rev().map(|c| (*c, depth + 1)));
            }
        }
    }

    /// Node structure summary.
    pub fn stats(&self) -> QuadTreeStats {
        let mut stats = QuadTreeStats {
            items: self.len,
            ..QuadTreeStats::default()
        };
        self.visit_nodes(|info| {
            stats.nodes += 1;
            if info.is_leaf {
                stats.leaves += 1;
            }
            stats.depth = stats.depth.max(info.depth);
            stats.max_local_items = stats.max_local_items.max(info.local_items);
        });
        stats
    }

    // --- internals ---

    fn slot_ref(&self, handle: K) -> Option<&SlotRef<K, T>> {
        self.slots
            .get(handle.slot())?
            .as_ref()
            .filter(|s| s.handle == handle)
    }

    fn alloc_node(&mut self, bounds: Aabb2D<T>, parent: Option<NodeIdx>, level: i32) -> NodeIdx {
        let node = QNode {
            bounds,
            parent,
            level,
            children: None,
            items: Vec::new(),
        };
        if let Some(idx) = self.free_nodes.pop() {
            self.arena[idx.get()] = node;
            idx
        } else {
            self.arena.push(node);
            NodeIdx::new(self.arena.len() - 1)
        }
    }

    fn free_node(&mut self, idx: NodeIdx) {
        let node = &mut self.arena[idx.get()];
        node.items = Vec::new();
        node.children = None;
        node.parent = None;
        self.free_nodes.push(idx);
    }

    fn push_local(&mut self, node: NodeIdx, handle: K, aabb: Aabb2D<T>) {
        self.arena[node.get()].items.push((handle, aabb));
        let slot = handle.slot();
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(SlotRef { handle, node, aabb });
    }

    fn place(&mut self, mut node: NodeIdx, handle: K, aabb: Aabb2D<T>) {
        loop {
            if self.arena[node.get()].children.is_none() {
                let full = self.arena[node.get()].items.len() >= self.config.capacity;
                if !full || !self.can_split(node) {
                    self.push_local(node, handle, aabb);
                    return;
                }
                self.split(node);
            }
            match self.child_containing(node, &aabb) {
                Some(child) => node = child,
                None => {
                    self.push_local(node, handle, aabb);
                    return;
                }
            }
        }
    }

    fn can_split(&self, node: NodeIdx) -> bool {
        let node = &self.arena[node.get()];
        if i64::from(node.level) >= i64::from(self.config.max_depth) {
            return false;
        }
        let b = node.bounds;
        let (cx, cy) = b.center();
        le(self.config.min_extent, T::sub(cx, b.min_x))
            && le(self.config.min_extent, T::sub(cy, b.min_y))
    }

    fn split(&mut self, node: NodeIdx) {
        let b = self.arena[node.get()].bounds;
        let (cx, cy) = b.center();
        let quads = quadrants(b, cx, cy);
        let level = self.arena[node.get()].level + 1;
        let children = quads.map(|q| self.alloc_node(q, Some(node), level));
        self.arena[node.get()].children = Some(children);
        let items = core::mem::take(&mut self.arena[node.get()].items);
        for (handle, aabb) in items {
            let target = self.child_containing(node, &aabb).unwrap_or(node);
            self.push_local(target, handle, aabb);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            bounds = ?b,
            kept = self.arena[node.get()].items.len(),
            "quad-tree node split"
        );
    }

    fn child_containing(&self, node: NodeIdx, aabb: &Aabb2D<T>) -> Option<NodeIdx> {
        let children = self.arena[node.get()].children?;
        children
            .into_iter()
            .find(|c| self.arena[c.get()].bounds.contains(aabb))
    }

    /// Double the root toward `aabb` until it fits.
    ///
    /// Invalid boxes and roots that stop growing (saturated integers, infinite
    /// floats) end the loop early; the item then stays at the root.
    fn grow_to_fit(&mut self, aabb: &Aabb2D<T>) {
        if !aabb.is_valid() {
            return;
        }
        while !self.root_bounds().contains(aabb) {
            let old = self.root;
            let old_level = self.arena[old.get()].level;
            let b = self.root_bounds();
            let w = T::sub(b.max_x, b.min_x);
            let h = T::sub(b.max_y, b.min_y);
            let grow_left = lt(aabb.min_x, b.min_x);
            let grow_up = lt(aabb.min_y, b.min_y);
            // The split lines of the new root are the old root's edges, exactly.
            let (min_x, cx, max_x) = if grow_left {
                (T::sub(b.min_x, w), b.min_x, b.max_x)
            } else {
                (b.min_x, b.max_x, T::add(b.max_x, w))
            };
            let (min_y, cy, max_y) = if grow_up {
                (T::sub(b.min_y, h), b.min_y, b.max_y)
            } else {
                (b.min_y, b.max_y, T::add(b.max_y, h))
            };
            let bounds = Aabb2D::new(min_x, min_y, max_x, max_y);
            if bounds == b || !bounds.is_valid() {
                return;
            }
            let new_root = self.alloc_node(bounds, None, old_level - 1);
            let old_quadrant = match (grow_left, grow_up) {
                (false, false) => 0,
                (true, false) => 1,
                (true, true) => 2,
                (false, true) => 3,
            };
            let mut children = [old; 4];
            for (i, q) in quadrants(bounds, cx, cy).into_iter().enumerate() {
                if i != old_quadrant {
                    children[i] = self.alloc_node(q, Some(new_root), old_level);
                }
            }
            self.arena[old.get()].parent = Some(new_root);
            self.arena[new_root.get()].children = Some(children);
            self.root = new_root;
            #[cfg(feature = "tracing")]
            tracing::debug!(root = ?bounds, "quad-tree root grown");
        }
    }

    /// Collapse quartets of empty leaves, walking up from `node`.
    fn prune(&mut self, node: NodeIdx) {
        let mut current = self.arena[node.get()].parent;
        while let Some(parent) = current {
            let Some(children) = self.arena[parent.get()].children else {
                break;
            };
            let collapsible = children.iter().all(|c| {
                let n = &self.arena[c.get()];
                n.children.is_none() && n.items.is_empty()
            });
            if !collapsible {
                break;
            }
            for c in children {
                self.free_node(c);
            }
            self.arena[parent.get()].children = None;
            if !self.arena[parent.get()].items.is_empty() {
                break;
            }
            current = self.arena[parent.get()].parent;
        }
    }
}

/// Top-left, top-right, bottom-right, bottom-left quadrants split at `(cx, cy)`.
fn quadrants<T: Copy>(b: Aabb2D<T>, cx: T, cy: T) -> [Aabb2D<T>; 4] {
    [
        Aabb2D::new(b.min_x, b.min_y, cx, cy),
        Aabb2D::new(cx, b.min_y, b.max_x, cy),
        Aabb2D::new(cx, cy, b.max_x, b.max_y),
        Aabb2D::new(b.min_x, cy, cx, b.max_y),
    ]
}
