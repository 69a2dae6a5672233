// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag an eraser across a row of strokes, then undo and redo the erase.
//!
//! Run:
//! - `RUST_LOG=easel_canvas=trace cargo run -p easel_demos --example eraser_undo`

use std::rc::Rc;

use easel_canvas::shapes::Freeform;
use easel_canvas::{Canvas, Command, History, ItemId, QueryFilter};
use kurbo::{Line, Point, Rect};
use tracing_subscriber::EnvFilter;

/// Side of the square eraser tip.
const ERASER_SIZE: f64 = 30.0;

fn wave(x0: f64, y0: f64) -> Freeform {
    let points = (0..=20)
        .map(|i| {
            let t = f64::from(i);
            Point::new(x0 + t * 4.0, y0 + (t * 0.6).sin() * 12.0)
        })
        .collect();
    Freeform::new(points, 3.0).expect("wave has points")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut canvas = Canvas::new();
    let mut history = History::new();
    for col in 0..6 {
        let x0 = f64::from(col) * 100.0;
        history.apply(&mut canvas, Command::Add(Rc::new(wave(x0, 0.0))));
        history.apply(&mut canvas, Command::Add(Rc::new(wave(x0, 200.0))));
    }
    history.mark_saved();
    println!("{} strokes on the board", canvas.len());

    // Pointer samples along the top row. Each pair of samples sweeps a segment,
    // and each sample itself covers a square tip.
    let samples: Vec<Point> = (0..=12).map(|i| Point::new(f64::from(i) * 25.0, 5.0)).collect();
    let mut erased: Vec<ItemId> = Vec::new();
    for pair in samples.windows(2) {
        let tip = Rect::from_center_size(pair[1], (ERASER_SIZE, ERASER_SIZE));
        let swept = canvas.query(&Line::new(pair[0], pair[1]), QueryFilter::PICK);
        for id in swept.into_iter().chain(canvas.query(&tip, QueryFilter::PICK)) {
            if !erased.contains(&id) {
                erased.push(id);
            }
        }
    }
    let removed = history.apply(&mut canvas, Command::Remove(erased));
    println!(
        "erased {} strokes, {} left, dirty={}",
        removed.len(),
        canvas.len(),
        history.is_dirty()
    );

    history.undo(&mut canvas);
    println!(
        "undo: {} strokes, same ids back: {}, dirty={}",
        canvas.len(),
        removed.iter().all(|id| canvas.contains(*id)),
        history.is_dirty()
    );

    history.redo(&mut canvas);
    println!("redo: {} strokes", canvas.len());
    if let Err(err) = canvas.check_invariants() {
        println!("inconsistent canvas: {err}");
    }
}
