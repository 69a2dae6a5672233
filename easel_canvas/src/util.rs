// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-interval geometry helpers shared by probes, shapes and the canvas.
//!
//! Kurbo's own `Rect::contains` is half-open and `Rect::overlaps` is strict;
//! the index treats edges as part of a box, so these helpers do too.

use easel_index::Aabb2D;
use kurbo::{Point, Rect, Vec2};

pub(crate) fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn aabb_to_rect(a: &Aabb2D<f64>) -> Rect {
    Rect::new(a.min_x, a.min_y, a.max_x, a.max_y)
}

pub(crate) fn rect_is_finite(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

/// Whether two normalized rects share at least one point.
pub(crate) fn rects_touch(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Whether `inner` lies in the open interior of `outer`.
pub(crate) fn rect_strictly_inside(outer: Rect, inner: Rect) -> bool {
    outer.x0 < inner.x0 && inner.x1 < outer.x1 && outer.y0 < inner.y0 && inner.y1 < outer.y1
}

pub(crate) fn point_strictly_inside(r: Rect, p: Point) -> bool {
    r.x0 < p.x && p.x < r.x1 && r.y0 < p.y && p.y < r.y1
}

/// Liang-Barsky clip of the segment `p0..p1` against a closed rect.
pub(crate) fn segment_touches_rect(p0: Point, p1: Point, r: Rect) -> bool {
    let d = p1 - p0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, p0.x - r.x0),
        (d.x, r.x1 - p0.x),
        (-d.y, p0.y - r.y0),
        (d.y, r.y1 - p0.y),
    ] {
        if p == 0.0 {
            // Parallel to this edge: reject if outside of it.
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return false;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return false;
            }
            t1 = t1.min(t);
        }
    }
    t0 <= t1
}

/// Squared distance from `p` to the segment `a..b`.
pub(crate) fn point_segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    (p - (a + ab * t)).hypot2()
}

fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether the closed segments `a0..a1` and `b0..b1` share a point.
pub(crate) fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let d1 = cross(a1 - a0, b0 - a0);
    let d2 = cross(a1 - a0, b1 - a0);
    let d3 = cross(b1 - b0, a0 - b0);
    let d4 = cross(b1 - b0, a1 - b0);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(b0, a0, a1))
        || (d2 == 0.0 && on_segment(b1, a0, a1))
        || (d3 == 0.0 && on_segment(a0, b0, b1))
        || (d4 == 0.0 && on_segment(a1, b0, b1))
}

/// Squared distance between the segments `a0..a1` and `b0..b1`.
pub(crate) fn segment_distance_sq(a0: Point, a1: Point, b0: Point, b1: Point) -> f64 {
    if segments_cross(a0, a1, b0, b1) {
        return 0.0;
    }
    point_segment_distance_sq(a0, b0, b1)
        .min(point_segment_distance_sq(a1, b0, b1))
        .min(point_segment_distance_sq(b0, a0, a1))
        .min(point_segment_distance_sq(b1, a0, a1))
}
