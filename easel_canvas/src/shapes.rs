// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default item kinds.
//!
//! Rectangles and ellipses are stroked outlines: a probe lying entirely inside
//! the hollow interior does not hit them, which is what an eraser or a click
//! expects. Segments and freehand strokes hit within half their stroke width.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Line, Point, Rect, Vec2};

use crate::shape::Item;
use crate::types::ItemKind;
use crate::util::{
    point_segment_distance_sq, point_strictly_inside, rect_strictly_inside, rects_touch,
    segment_distance_sq, segment_touches_rect,
};

/// Stroked rectangle outline.
#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    /// Outline path, centered on the stroke.
    pub rect: Rect,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Rectangle {
    /// Create a rectangle outline. The rect is normalized.
    pub fn new(rect: Rect, stroke_width: f64) -> Self {
        Self {
            rect: rect.abs(),
            stroke_width,
        }
    }

    fn inner(&self) -> Rect {
        let hw = self.stroke_width * 0.5;
        self.rect.inflate(-hw, -hw)
    }
}

impl Item for Rectangle {
    fn kind(&self) -> ItemKind {
        ItemKind::Rectangle
    }

    fn bounding_box(&self) -> Rect {
        let hw = self.stroke_width * 0.5;
        self.rect.inflate(hw, hw)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        rects_touch(self.bounding_box(), rect) && !rect_strictly_inside(self.inner(), rect)
    }

    fn intersects_line(&self, line: Line) -> bool {
        let inner = self.inner();
        segment_touches_rect(line.p0, line.p1, self.bounding_box())
            && !(point_strictly_inside(inner, line.p0) && point_strictly_inside(inner, line.p1))
    }

    fn translated(&self, delta: Vec2) -> Rc<dyn Item> {
        Rc::new(Self {
            rect: self.rect + delta,
            ..*self
        })
    }
}

/// Stroked axis-aligned ellipse outline, inscribed in `rect`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    /// Box the outline path is inscribed in.
    pub rect: Rect,
    /// Stroke width.
    pub stroke_width: f64,
}

/// Axis-aligned ellipse in center/radii form.
#[derive(Copy, Clone)]
struct Radii {
    center: Point,
    rx: f64,
    ry: f64,
}

impl Radii {
    /// Squared normalized distance: `<= 1` on or inside the ellipse.
    fn norm_sq(&self, p: Point) -> f64 {
        let dx = (p.x - self.center.x) / self.rx;
        let dy = (p.y - self.center.y) / self.ry;
        dx * dx + dy * dy
    }

    /// Map into the space where this ellipse is the unit circle at the origin.
    fn to_unit(self, p: Point) -> Point {
        Point::new(
            (p.x - self.center.x) / self.rx,
            (p.y - self.center.y) / self.ry,
        )
    }

    fn touches_rect(&self, r: Rect) -> bool {
        let nearest = Point::new(
            self.center.x.clamp(r.x0, r.x1),
            self.center.y.clamp(r.y0, r.y1),
        );
        self.norm_sq(nearest) <= 1.0
    }

    fn touches_segment(&self, a: Point, b: Point) -> bool {
        point_segment_distance_sq(Point::ORIGIN, self.to_unit(a), self.to_unit(b)) <= 1.0
    }
}

impl Ellipse {
    /// Create an ellipse outline inscribed in `rect`. The rect is normalized.
    pub fn new(rect: Rect, stroke_width: f64) -> Self {
        Self {
            rect: rect.abs(),
            stroke_width,
        }
    }

    fn radii(&self, grow: f64) -> Option<Radii> {
        let rx = self.rect.width() * 0.5 + grow;
        let ry = self.rect.height() * 0.5 + grow;
        (rx > 0.0 && ry > 0.0).then(|| Radii {
            center: self.rect.center(),
            rx,
            ry,
        })
    }
}

impl Item for Ellipse {
    fn kind(&self) -> ItemKind {
        ItemKind::Ellipse
    }

    fn bounding_box(&self) -> Rect {
        let hw = self.stroke_width * 0.5;
        self.rect.inflate(hw, hw)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        let hw = self.stroke_width * 0.5;
        let Some(outer) = self.radii(hw) else {
            return rects_touch(self.bounding_box(), rect);
        };
        if !outer.touches_rect(rect) {
            return false;
        }
        // The inner ellipse is convex, so four corners inside means the whole rect is.
        match self.radii(-hw) {
            Some(inner) => !(inner.norm_sq(Point::new(rect.x0, rect.y0)) < 1.0
                && inner.norm_sq(Point::new(rect.x1, rect.y0)) < 1.0
                && inner.norm_sq(Point::new(rect.x1, rect.y1)) < 1.0
                && inner.norm_sq(Point::new(rect.x0, rect.y1)) < 1.0),
            None => true,
        }
    }

    fn intersects_line(&self, line: Line) -> bool {
        let hw = self.stroke_width * 0.5;
        let Some(outer) = self.radii(hw) else {
            return segment_touches_rect(line.p0, line.p1, self.bounding_box());
        };
        if !outer.touches_segment(line.p0, line.p1) {
            return false;
        }
        match self.radii(-hw) {
            Some(inner) => !(inner.norm_sq(line.p0) < 1.0 && inner.norm_sq(line.p1) < 1.0),
            None => true,
        }
    }

    fn translated(&self, delta: Vec2) -> Rc<dyn Item> {
        Rc::new(Self {
            rect: self.rect + delta,
            ..*self
        })
    }
}

/// Stroked straight segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Centerline.
    pub line: Line,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Segment {
    /// Create a stroked segment.
    pub fn new(line: Line, stroke_width: f64) -> Self {
        Self { line, stroke_width }
    }
}

fn stroked_segment_touches_rect(a: Point, b: Point, hw: f64, rect: Rect) -> bool {
    segment_touches_rect(a, b, rect.inflate(hw, hw))
}

fn stroked_segment_touches_line(a: Point, b: Point, hw: f64, line: Line) -> bool {
    segment_distance_sq(a, b, line.p0, line.p1) <= hw * hw
}

impl Item for Segment {
    fn kind(&self) -> ItemKind {
        ItemKind::Line
    }

    fn bounding_box(&self) -> Rect {
        let hw = self.stroke_width * 0.5;
        Rect::from_points(self.line.p0, self.line.p1).inflate(hw, hw)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        stroked_segment_touches_rect(self.line.p0, self.line.p1, self.stroke_width * 0.5, rect)
    }

    fn intersects_line(&self, line: Line) -> bool {
        stroked_segment_touches_line(self.line.p0, self.line.p1, self.stroke_width * 0.5, line)
    }

    fn translated(&self, delta: Vec2) -> Rc<dyn Item> {
        Rc::new(Self {
            line: Line::new(self.line.p0 + delta, self.line.p1 + delta),
            ..*self
        })
    }
}

/// Default length of an arrow head's barbs.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;

// Barbs open 30 degrees either side of the shaft.
const BARB_COS: f64 = 0.866_025_403_784_438_6;
const BARB_SIN: f64 = 0.5;

/// Stroked segment with an arrow head at `line.p1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    /// Shaft, from tail to tip.
    pub line: Line,
    /// Stroke width.
    pub stroke_width: f64,
    /// Length of each barb of the head.
    pub head_length: f64,
}

impl Arrow {
    /// Create an arrow with the default head length.
    pub fn new(line: Line, stroke_width: f64) -> Self {
        Self {
            line,
            stroke_width,
            head_length: ARROW_HEAD_LENGTH,
        }
    }

    /// The shaft followed by the two barbs, all ending at the tip.
    fn segments(&self) -> Vec<(Point, Point)> {
        let tip = self.line.p1;
        let mut out = alloc::vec![(self.line.p0, tip)];
        let back = self.line.p0 - tip;
        let len = back.hypot();
        if len > 0.0 {
            let u = back * (self.head_length / len);
            let left = Vec2::new(u.x * BARB_COS - u.y * BARB_SIN, u.x * BARB_SIN + u.y * BARB_COS);
            let right = Vec2::new(u.x * BARB_COS + u.y * BARB_SIN, -u.x * BARB_SIN + u.y * BARB_COS);
            out.push((tip + left, tip));
            out.push((tip + right, tip));
        }
        out
    }
}

impl Item for Arrow {
    fn kind(&self) -> ItemKind {
        ItemKind::Arrow
    }

    fn bounding_box(&self) -> Rect {
        let hw = self.stroke_width * 0.5;
        self.segments()
            .into_iter()
            .map(|(a, b)| Rect::from_points(a, b))
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO)
            .inflate(hw, hw)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        let hw = self.stroke_width * 0.5;
        self.segments()
            .into_iter()
            .any(|(a, b)| stroked_segment_touches_rect(a, b, hw, rect))
    }

    fn intersects_line(&self, line: Line) -> bool {
        let hw = self.stroke_width * 0.5;
        self.segments()
            .into_iter()
            .any(|(a, b)| stroked_segment_touches_line(a, b, hw, line))
    }

    fn translated(&self, delta: Vec2) -> Rc<dyn Item> {
        Rc::new(Self {
            line: Line::new(self.line.p0 + delta, self.line.p1 + delta),
            ..*self
        })
    }
}

/// Freehand stroke: a polyline with a uniform width.
#[derive(Clone, Debug, PartialEq)]
pub struct Freeform {
    /// Sampled points, in drawing order. Never empty.
    pub points: Vec<Point>,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Freeform {
    /// Create a stroke from sampled points.
    ///
    /// Returns `None` when there are no points.
    pub fn new(points: Vec<Point>, stroke_width: f64) -> Option<Self> {
        (!points.is_empty()).then_some(Self {
            points,
            stroke_width,
        })
    }

    /// Consecutive point pairs. A single point is a zero-length segment.
    fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let single = (self.points.len() == 1).then(|| (self.points[0], self.points[0]));
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(single)
    }
}

impl Item for Freeform {
    fn kind(&self) -> ItemKind {
        ItemKind::Freeform
    }

    fn bounding_box(&self) -> Rect {
        let hw = self.stroke_width * 0.5;
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
            .inflate(hw, hw)
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        let hw = self.stroke_width * 0.5;
        rects_touch(self.bounding_box(), rect)
            && self
                .segments()
                .any(|(a, b)| stroked_segment_touches_rect(a, b, hw, rect))
    }

    fn intersects_line(&self, line: Line) -> bool {
        let hw = self.stroke_width * 0.5;
        self.segments()
            .any(|(a, b)| stroked_segment_touches_line(a, b, hw, line))
    }

    fn translated(&self, delta: Vec2) -> Rc<dyn Item> {
        Rc::new(Self {
            points: self.points.iter().map(|p| *p + delta).collect(),
            stroke_width: self.stroke_width,
        })
    }
}

/// A text box. Hit anywhere inside its box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    /// Layout box.
    pub rect: Rect,
    /// Contents.
    pub text: String,
}

impl TextBox {
    /// Create a text box. The rect is normalized.
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect: rect.abs(),
            text: text.into(),
        }
    }
}

impl Item for TextBox {
    fn kind(&self) -> ItemKind {
        ItemKind::Text
    }

    fn bounding_box(&self) -> Rect {
        self.rect
    }

    fn translated(&self, delta: Vec2) -> Rc<dyn Item> {
        Rc::new(Self {
            rect: self.rect + delta,
            text: self.text.clone(),
        })
    }
}
