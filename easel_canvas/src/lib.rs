// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Canvas: a Kurbo-native infinite canvas of drawable items.
//!
//! Easel Canvas is the item store behind a whiteboard or brainstorming tool.
//!
//! - Holds an unbounded, changing set of drawable items behind generational [`ItemId`]s.
//! - Keeps a spatial index and a total stacking order over them in step.
//! - Answers region queries (paint lists, hit tests, eraser sweeps, marquee
//!   selection) with results sorted by stacking order.
//! - Records edits in an undo/redo [`History`] that restores removed items at
//!   their old stacking position and under their old ids.
//!
//! ## Integration with Easel Index
//!
//! This crate uses [`easel_index`] for the heavy lifting: a [`QuadTree`](easel_index::QuadTree)
//! whose root grows toward far-away items, and a [`ZOrderList`](easel_index::ZOrderList)
//! with constant-time reordering. The canvas translates Kurbo geometry into
//! index boxes and guarantees that every live item is in both structures
//! exactly once. Coordinates are assumed finite; [`Canvas::try_add`] checks.
//!
//! ## API overview
//!
//! - [`Canvas`]: item arena plus the paired index and z-order.
//! - [`Item`]: what a drawable must provide (kind, bounds, precise intersection).
//!   Default kinds live in [`shapes`].
//! - [`Probe`]: what a query shape must provide. Implemented for [`kurbo::Rect`]
//!   (viewport, marquee, eraser), [`kurbo::Point`] (pointer) and [`kurbo::Line`]
//!   (eraser sweep between two pointer samples).
//! - [`QueryFilter`] and [`ItemFlags`]: visibility and picking controls.
//! - [`History`] and [`Command`]: undoable edits with saved-state tracking.
//!
//! Key operations:
//! - [`Canvas::add`] → [`ItemId`], [`Canvas::remove`], [`Canvas::replace`], [`Canvas::translate`]
//! - [`Canvas::bring_forward`], [`Canvas::send_backward`], [`Canvas::bring_to_front`], [`Canvas::send_to_back`]
//! - [`Canvas::query`] (back to front), [`Canvas::hits_top_first`], [`Canvas::hit_test`],
//!   [`Canvas::visible_items`]
//!
//! ### Minimal usage
//!
//! ```
//! use std::rc::Rc;
//! use easel_canvas::{Canvas, QueryFilter};
//! use easel_canvas::shapes::{Ellipse, Rectangle};
//! use kurbo::{Point, Rect};
//!
//! let mut canvas = Canvas::new();
//! let frame = canvas.add(Rc::new(Rectangle::new(Rect::new(0.0, 0.0, 100.0, 100.0), 2.0)));
//! let blob = canvas.add(Rc::new(Ellipse::new(Rect::new(50.0, 50.0, 150.0, 150.0), 2.0)));
//!
//! // Paint order: back to front.
//! assert_eq!(canvas.visible_items(Rect::new(0.0, 0.0, 200.0, 200.0)), vec![frame, blob]);
//!
//! // Clicking the hollow middle of the frame hits nothing.
//! assert_eq!(canvas.hit_test(&Point::new(20.0, 20.0), QueryFilter::PICK), None);
//!
//! // Both outlines pass through (100, 50); the ellipse is on top until reordered.
//! let eraser = Rect::from_center_size((100.0, 50.0), (10.0, 10.0));
//! assert_eq!(canvas.hits_top_first(&eraser, QueryFilter::PICK), vec![blob, frame]);
//! canvas.send_to_back(blob);
//! assert_eq!(canvas.hit_test(&eraser, QueryFilter::PICK), Some(frame));
//! ```

#![no_std]

extern crate alloc;

mod canvas;
mod error;
mod history;
mod shape;
mod types;
mod util;

pub mod shapes;

pub use canvas::{Canvas, DEFAULT_ROOT};
pub use error::{CanvasError, InvariantError};
pub use history::{Command, History, ReorderOp};
pub use shape::{Item, Predicate, Probe, bounds_touch, probe_hits};
pub use types::{ItemFlags, ItemId, ItemKind, QueryFilter};

pub use easel_index::QuadTreeConfig;
