// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core canvas implementation: item storage, paired index/order updates, queries.

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::vec::Vec;

use easel_index::{QuadTree, QuadTreeConfig, QuadTreeStats, ZOrderList};
use kurbo::{Rect, Vec2};

use crate::error::{CanvasError, InvariantError};
use crate::shape::{Item, Predicate, Probe, ProbeRegion, bounds_touch, probe_hits};
use crate::types::{ItemFlags, ItemId, QueryFilter};
use crate::util::{aabb_to_rect, rect_is_finite, rect_to_aabb};

/// Region the spatial index starts out covering. It grows on demand.
pub const DEFAULT_ROOT: Rect = Rect::new(-4096.0, -4096.0, 4096.0, 4096.0);

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

/// An unbounded set of drawable items with a spatial index and a stacking order.
///
/// Every live item is in the index and in the z-order list exactly once; each
/// structural mutation goes through both.
pub struct Canvas {
    slots: Vec<Option<Slot>>,
    generations: Vec<u32>, // highest generation issued per slot (persists across frees)
    free_list: Vec<usize>,
    index: QuadTree<f64, ItemId>,
    order: ZOrderList<ItemId>,
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("items", &self.len())
            .field("slots_total", &self.slots.len())
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    item: Rc<dyn Item>,
    bounds: Rect,
    flags: ItemFlags,
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_ROOT, QuadTreeConfig::default())
    }

    /// Create an empty canvas whose index starts at `root` with the given tuning.
    pub fn with_config(root: Rect, config: QuadTreeConfig<f64>) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            index: QuadTree::with_config(rect_to_aabb(root.abs()), config),
            order: ZOrderList::new(),
        }
    }

    /// Build a canvas from items listed back to front.
    pub fn from_items(items: impl IntoIterator<Item = Rc<dyn Item>>) -> Self {
        Self::from_items_with_config(DEFAULT_ROOT, QuadTreeConfig::default(), items)
    }

    /// Like [`from_items`](Self::from_items), with the index starting at `root`
    /// with the given tuning. Pass an exporter's [`root_bounds`](Self::root_bounds)
    /// and [`index_config`](Self::index_config) to rebuild the same index shape.
    pub fn from_items_with_config(
        root: Rect,
        config: QuadTreeConfig<f64>,
        items: impl IntoIterator<Item = Rc<dyn Item>>,
    ) -> Self {
        let mut canvas = Self::with_config(root, config);
        for item in items {
            canvas.add(item);
        }
        canvas
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Add an item in front of everything else.
    ///
    /// The item's bounding box must be finite and normalized; debug builds
    /// assert this. Use [`try_add`](Self::try_add) for unchecked input.
    pub fn add(&mut self, item: Rc<dyn Item>) -> ItemId {
        let bounds = item.bounding_box();
        debug_assert!(
            check_bounds(bounds).is_ok(),
            "item bounds must be finite and normalized: {bounds:?}"
        );
        let id = self.alloc_slot(item, bounds);
        self.index.insert(id, rect_to_aabb(bounds));
        self.order.insert(id);
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, ?bounds, "item added");
        id
    }

    /// Add an item after validating its bounding box.
    pub fn try_add(&mut self, item: Rc<dyn Item>) -> Result<ItemId, CanvasError> {
        check_bounds(item.bounding_box())?;
        Ok(self.add(item))
    }

    /// Remove an item, returning it. Stale ids are ignored.
    pub fn remove(&mut self, id: ItemId) -> Option<Rc<dyn Item>> {
        if !self.contains(id) {
            return None;
        }
        self.index.remove(id);
        self.order.remove(id);
        let slot = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, "item removed");
        Some(slot.item)
    }

    /// Put a removed item back under its old id with its old flags, directly in
    /// front of `below` (or at the very back for `None`).
    ///
    /// Fails and returns `false` if the id's slot is occupied. An absent
    /// `below` places the item in front of everything.
    pub fn restore(
        &mut self,
        id: ItemId,
        item: Rc<dyn Item>,
        below: Option<ItemId>,
        flags: ItemFlags,
    ) -> bool {
        let idx = id.idx();
        if self.slots.get(idx).is_some_and(Option::is_some) {
            return false;
        }
        while self.slots.len() <= idx {
            self.free_list.push(self.slots.len());
            self.slots.push(None);
            self.generations.push(0);
        }
        self.free_list.retain(|&i| i != idx);
        self.generations[idx] = self.generations[idx].max(id.generation());
        let bounds = item.bounding_box();
        self.slots[idx] = Some(Slot {
            generation: id.generation(),
            item,
            bounds,
            flags,
        });
        self.index.insert(id, rect_to_aabb(bounds));
        self.order.insert_above(id, below);
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, ?below, "item restored");
        true
    }

    /// Swap in new geometry for an item, keeping its id and stacking position.
    ///
    /// Returns the previous item, or `None` for a stale id.
    pub fn replace(&mut self, id: ItemId, item: Rc<dyn Item>) -> Option<Rc<dyn Item>> {
        let bounds = item.bounding_box();
        debug_assert!(
            check_bounds(bounds).is_ok(),
            "item bounds must be finite and normalized: {bounds:?}"
        );
        let slot = self.slot_mut(id)?;
        slot.bounds = bounds;
        let old = core::mem::replace(&mut slot.item, item);
        self.index.update(id, rect_to_aabb(bounds));
        Some(old)
    }

    /// Move an item by `delta`. Returns the item as it was before the move.
    pub fn translate(&mut self, id: ItemId, delta: Vec2) -> Option<Rc<dyn Item>> {
        let moved = self.get(id)?.translated(delta);
        self.replace(id, moved)
    }

    /// Returns true if `id` refers to a live item.
    ///
    /// See [`ItemId`] docs for the generational semantics.
    pub fn contains(&self, id: ItemId) -> bool {
        self.slot(id).is_some()
    }

    /// The item behind `id`.
    pub fn get(&self, id: ItemId) -> Option<&Rc<dyn Item>> {
        self.slot(id).map(|s| &s.item)
    }

    /// The bounding box `id` is indexed under.
    pub fn bounds(&self, id: ItemId) -> Option<Rect> {
        self.slot(id).map(|s| s.bounds)
    }

    /// Flags of a live item.
    pub fn flags(&self, id: ItemId) -> Option<ItemFlags> {
        self.slot(id).map(|s| s.flags)
    }

    /// Update item flags. Returns `false` for a stale id.
    pub fn set_flags(&mut self, id: ItemId, flags: ItemFlags) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.flags = flags;
                true
            }
            None => false,
        }
    }

    // --- stacking ---

    /// Stacking rank of a live item. Only meaningful compared with other ranks.
    pub fn z_index(&self, id: ItemId) -> Option<i64> {
        self.order.z_index(id)
    }

    /// The frontmost item.
    pub fn front(&self) -> Option<ItemId> {
        self.order.front()
    }

    /// The item directly behind `id`.
    pub fn below(&self, id: ItemId) -> Option<ItemId> {
        self.order.below(id)
    }

    /// Swap with the item directly in front. Returns whether anything moved.
    pub fn bring_forward(&mut self, id: ItemId) -> bool {
        self.order.bring_forward(id)
    }

    /// Swap with the item directly behind. Returns whether anything moved.
    pub fn send_backward(&mut self, id: ItemId) -> bool {
        self.order.send_backward(id)
    }

    /// Move in front of everything. Returns whether anything moved.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        self.order.bring_to_front(id)
    }

    /// Move behind everything. Returns whether anything moved.
    pub fn send_to_back(&mut self, id: ItemId) -> bool {
        self.order.send_to_back(id)
    }

    /// Move directly in front of `below`, or to the back for `None`.
    pub fn move_above(&mut self, id: ItemId, below: Option<ItemId>) -> bool {
        self.order.move_above(id, below)
    }

    // --- queries ---

    /// Items the probe hits, back to front.
    pub fn query(&self, probe: &dyn Probe, filter: QueryFilter) -> Vec<ItemId> {
        self.query_with(probe, filter, &probe_hits)
    }

    /// Items accepted by `predicate` among those whose bounds touch the probe,
    /// back to front.
    pub fn query_with(
        &self,
        probe: &dyn Probe,
        filter: QueryFilter,
        predicate: Predicate<'_>,
    ) -> Vec<ItemId> {
        let region = ProbeRegion(probe);
        self.index
            .query_ordered(&region, &self.order, &mut |id, _| {
                self.slot(id)
                    .is_some_and(|s| filter.accepts(s.flags) && predicate(&*s.item, probe))
            })
    }

    /// Items the probe hits, front to back: pointer precedence order.
    pub fn hits_top_first(&self, probe: &dyn Probe, filter: QueryFilter) -> Vec<ItemId> {
        let mut hits = self.query(probe, filter);
        hits.reverse();
        hits
    }

    /// The topmost item the probe hits.
    pub fn hit_test(&self, probe: &dyn Probe, filter: QueryFilter) -> Option<ItemId> {
        self.query(probe, filter).pop()
    }

    /// Visible items whose bounds touch `viewport`, in paint order.
    pub fn visible_items(&self, viewport: Rect) -> Vec<ItemId> {
        self.query_with(&viewport, QueryFilter::PAINT, &bounds_touch)
    }

    // --- snapshot ---

    /// Every live item id, in no particular order.
    pub fn all_items(&self) -> Vec<ItemId> {
        self.index.all_items()
    }

    /// Every live item, back to front. Feeding these to
    /// [`from_items`](Self::from_items) rebuilds the same stacking.
    pub fn items_back_to_front(&self) -> impl Iterator<Item = (ItemId, &Rc<dyn Item>)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(id).map(|item| (id, item)))
    }

    /// Remove every item. Outstanding ids become stale.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.index.clear();
        self.order.clear();
    }

    /// Region the spatial index currently covers.
    pub fn root_bounds(&self) -> Rect {
        aabb_to_rect(&self.index.root_bounds())
    }

    /// Tuning the spatial index was built with.
    pub fn index_config(&self) -> QuadTreeConfig<f64> {
        *self.index.config()
    }

    /// Shape of the spatial index.
    pub fn index_stats(&self) -> QuadTreeStats {
        self.index.stats()
    }

    /// Verify that the arena, the spatial index and the z-order list agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let items = self.slots.iter().filter(|s| s.is_some()).count();
        let indexed = self.index.len();
        let ordered = self.order.len();
        if items != indexed || items != ordered {
            return Err(InvariantError::CountMismatch {
                items,
                indexed,
                ordered,
            });
        }
        let mut seen = BTreeSet::new();
        for id in self.index.all_items() {
            if !seen.insert(id) {
                return Err(InvariantError::DuplicateHit(id));
            }
        }
        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ItemId stores 32-bit slot indices."
            )]
            let id = ItemId::new(idx as u32, slot.generation);
            match self.index.bounds_of(id) {
                None => return Err(InvariantError::NotIndexed(id)),
                Some(aabb) if aabb != rect_to_aabb(slot.bounds) => {
                    return Err(InvariantError::StaleBounds(id));
                }
                Some(_) => {}
            }
            if !self.order.has_item(id) {
                return Err(InvariantError::NotOrdered(id));
            }
        }
        Ok(())
    }

    // --- internals ---

    fn alloc_slot(&mut self, item: Rc<dyn Item>, bounds: Rect) -> ItemId {
        let slot = |generation| Slot {
            generation,
            item,
            bounds,
            flags: ItemFlags::default(),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(slot(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(slot(generation)));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ItemId stores 32-bit slot indices."
        )]
        ItemId::new(idx as u32, generation)
    }

    fn slot(&self, id: ItemId) -> Option<&Slot> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|s| s.generation == id.generation())
    }

    fn slot_mut(&mut self, id: ItemId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|s| s.generation == id.generation())
    }
}

fn check_bounds(bounds: Rect) -> Result<(), CanvasError> {
    if !rect_is_finite(bounds) {
        return Err(CanvasError::NonFiniteBounds(bounds));
    }
    if bounds.x0 > bounds.x1 || bounds.y0 > bounds.y1 {
        return Err(CanvasError::InvertedBounds(bounds));
    }
    Ok(())
}
