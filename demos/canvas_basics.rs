// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small board, list what a viewport paints and what a click picks.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p easel_demos --example canvas_basics`

use std::rc::Rc;

use easel_canvas::shapes::{Arrow, Ellipse, Rectangle, TextBox};
use easel_canvas::{Canvas, ItemFlags, QueryFilter};
use kurbo::{Line, Point, Rect};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut canvas = Canvas::new();
    let note = canvas.add(Rc::new(TextBox::new(
        Rect::new(0.0, 0.0, 160.0, 60.0),
        "Ship it",
    )));
    let frame = canvas.add(Rc::new(Rectangle::new(
        Rect::new(-20.0, -20.0, 180.0, 80.0),
        2.0,
    )));
    let bubble = canvas.add(Rc::new(Ellipse::new(
        Rect::new(140.0, 40.0, 260.0, 120.0),
        3.0,
    )));
    let pointer = canvas.add(Rc::new(Arrow::new(
        Line::new((300.0, 200.0), (200.0, 80.0)),
        2.0,
    )));
    let names = [(note, "note"), (frame, "frame"), (bubble, "bubble"), (pointer, "arrow")];
    let name = |id| {
        names
            .iter()
            .find(|(n, _)| *n == id)
            .map_or("?", |(_, s)| *s)
    };

    let viewport = Rect::new(0.0, 0.0, 200.0, 100.0);
    let painted: Vec<_> = canvas.visible_items(viewport).into_iter().map(name).collect();
    println!("paint {viewport:?}: {painted:?}");

    for click in [Point::new(80.0, 30.0), Point::new(-20.0, 0.0), Point::new(200.0, 80.0)] {
        let hits: Vec<_> = canvas
            .hits_top_first(&click, QueryFilter::PICK)
            .into_iter()
            .map(name)
            .collect();
        println!("click {click:?}: {hits:?}");
    }

    // Locked items still paint but no longer pick.
    canvas.set_flags(frame, ItemFlags::VISIBLE);
    println!(
        "click on locked frame edge: {:?}",
        canvas.hit_test(&Point::new(-20.0, 0.0), QueryFilter::PICK).map(name)
    );

    canvas.bring_to_front(note);
    let order: Vec<_> = canvas.items_back_to_front().map(|(id, _)| name(id)).collect();
    println!("stacking after raising the note: {order:?}");
    println!("index: {:?}", canvas.index_stats());
}
