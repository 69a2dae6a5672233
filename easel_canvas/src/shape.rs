// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry capabilities the canvas relies on: drawable items and query probes.
//!
//! The canvas never inspects item geometry directly. It asks an [`Item`] for
//! its bounding box when indexing, and hands a [`Probe`] (the shape being
//! queried with) plus a [`Predicate`] to the index when querying. The
//! predicate decides precise membership; the default one is [`Probe::hits`].

use alloc::rc::Rc;
use core::fmt::Debug;

use easel_index::{Aabb2D, Region};
use kurbo::{Line, Point, Rect, Vec2};

use crate::types::ItemKind;
use crate::util::{aabb_to_rect, rect_to_aabb, rects_touch, segment_touches_rect};

/// A drawable item, as far as indexing and hit testing are concerned.
///
/// Items are immutable once added. Edits produce a new item (see
/// [`Item::translated`]) that replaces the old one on the canvas, which keeps
/// old versions around for undo at the cost of one `Rc` each.
pub trait Item: Debug {
    /// The kind of drawable.
    fn kind(&self) -> ItemKind;

    /// Axis-aligned bounds in canvas coordinates, including stroke.
    ///
    /// Must be finite and normalized for the item to be indexed.
    fn bounding_box(&self) -> Rect;

    /// Whether the drawn item touches `rect`.
    ///
    /// The default compares bounding boxes.
    fn intersects_rect(&self, rect: Rect) -> bool {
        rects_touch(self.bounding_box(), rect)
    }

    /// Whether the drawn item touches the segment `line`.
    ///
    /// The default clips the segment against the bounding box.
    fn intersects_line(&self, line: Line) -> bool {
        segment_touches_rect(line.p0, line.p1, self.bounding_box())
    }

    /// A copy of this item moved by `delta`.
    fn translated(&self, delta: Vec2) -> Rc<dyn Item>;
}

/// A query shape: viewport, marquee, pointer position, eraser sweep.
pub trait Probe {
    /// Axis-aligned bounds of the probe.
    fn bounding_box(&self) -> Rect;

    /// Whether the probe touches `rect`. Used to skip whole index nodes.
    ///
    /// The default compares bounding boxes, which is exact for rectangles.
    fn intersects_rect(&self, rect: Rect) -> bool {
        rects_touch(self.bounding_box(), rect)
    }

    /// Precise test against an item's drawn geometry.
    fn hits(&self, item: &dyn Item) -> bool;
}

impl Probe for Rect {
    fn bounding_box(&self) -> Rect {
        *self
    }

    fn hits(&self, item: &dyn Item) -> bool {
        item.intersects_rect(*self)
    }
}

impl Probe for Point {
    fn bounding_box(&self) -> Rect {
        Rect::from_points(*self, *self)
    }

    fn hits(&self, item: &dyn Item) -> bool {
        item.intersects_rect(Probe::bounding_box(self))
    }
}

impl Probe for Line {
    fn bounding_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        segment_touches_rect(self.p0, self.p1, rect)
    }

    fn hits(&self, item: &dyn Item) -> bool {
        item.intersects_line(*self)
    }
}

/// Precise membership test for a query, passed as a first-class value.
pub type Predicate<'a> = &'a dyn Fn(&dyn Item, &dyn Probe) -> bool;

/// The default predicate: the probe's own precise test.
pub fn probe_hits(item: &dyn Item, probe: &dyn Probe) -> bool {
    probe.hits(item)
}

/// A coarse predicate: bounding boxes touch. Good enough for building paint lists.
pub fn bounds_touch(item: &dyn Item, probe: &dyn Probe) -> bool {
    rects_touch(item.bounding_box(), probe.bounding_box())
}

/// Adapts a [`Probe`] to the index's [`Region`].
pub(crate) struct ProbeRegion<'a>(pub(crate) &'a dyn Probe);

impl Region<f64> for ProbeRegion<'_> {
    fn bounds(&self) -> Aabb2D<f64> {
        rect_to_aabb(self.0.bounding_box())
    }

    fn intersects_aabb(&self, aabb: &Aabb2D<f64>) -> bool {
        self.0.intersects_rect(aabb_to_rect(aabb))
    }
}
