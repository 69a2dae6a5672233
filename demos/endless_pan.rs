// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keep drawing while panning far away; the index root grows to follow.
//!
//! Run:
//! - `RUST_LOG=easel_index=debug cargo run -p easel_demos --example endless_pan`

use std::rc::Rc;

use easel_canvas::shapes::Rectangle;
use easel_canvas::{Canvas, QuadTreeConfig};
use kurbo::{Rect, Vec2};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = QuadTreeConfig {
        capacity: 4,
        ..QuadTreeConfig::default()
    };
    let mut canvas = Canvas::with_config(Rect::new(0.0, 0.0, 512.0, 512.0), config);
    let mut camera = Rect::new(0.0, 0.0, 800.0, 600.0);
    let step = Vec2::new(5_000.0, -3_000.0);

    for frame in 0..8 {
        for i in 0..16 {
            let x = camera.x0 + f64::from(i % 4) * 150.0;
            let y = camera.y0 + f64::from(i / 4) * 120.0;
            canvas.add(Rc::new(Rectangle::new(Rect::new(x, y, x + 100.0, y + 80.0), 2.0)));
        }
        println!(
            "frame {frame}: {} visible of {}, root {:?}",
            canvas.visible_items(camera).len(),
            canvas.len(),
            canvas.root_bounds()
        );
        camera = camera + step;
    }
    println!("index: {:?}", canvas.index_stats());
}
