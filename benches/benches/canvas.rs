// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use easel_canvas::shapes::{Ellipse, Freeform, Rectangle, Segment};
use easel_canvas::{Canvas, Command, History, Item, QueryFilter};
use kurbo::{Line, Point, Rect, Vec2};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A board of mixed shapes scattered over `extent`.
fn gen_items(count: usize, extent: f64) -> Vec<Rc<dyn Item>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x = (rng.next_f64() - 0.5) * extent;
            let y = (rng.next_f64() - 0.5) * extent;
            let w = 10.0 + rng.next_f64() * 120.0;
            let h = 10.0 + rng.next_f64() * 120.0;
            let item: Rc<dyn Item> = match rng.next_u64() % 4 {
                0 => Rc::new(Rectangle::new(Rect::new(x, y, x + w, y + h), 2.0)),
                1 => Rc::new(Ellipse::new(Rect::new(x, y, x + w, y + h), 2.0)),
                2 => Rc::new(Segment::new(Line::new((x, y), (x + w, y + h)), 2.0)),
                _ => {
                    let points = (0..16)
                        .map(|i| {
                            let t = f64::from(i) / 15.0;
                            Point::new(x + t * w, y + (t * 6.0).sin() * h * 0.5)
                        })
                        .collect();
                    match Freeform::new(points, 3.0) {
                        Some(stroke) => Rc::new(stroke),
                        None => Rc::new(Rectangle::new(Rect::new(x, y, x + w, y + h), 2.0)),
                    }
                }
            };
            item
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_build");
    for &n in &[1024usize, 8192] {
        let items = gen_items(n, 20_000.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("from_items_n{}", n), |b| {
            b.iter(|| black_box(Canvas::from_items(items.iter().cloned()).len()))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_query");
    let canvas = Canvas::from_items(gen_items(8192, 20_000.0));
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let points: Vec<Point> = (0..256)
        .map(|_| {
            Point::new(
                (rng.next_f64() - 0.5) * 20_000.0,
                (rng.next_f64() - 0.5) * 20_000.0,
            )
        })
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("visible_items_256", |b| {
        b.iter(|| {
            let total: usize = points
                .iter()
                .map(|p| canvas.visible_items(Rect::from_origin_size(*p, (1280.0, 800.0))).len())
                .sum();
            black_box(total)
        })
    });
    group.bench_function("hit_test_256", |b| {
        b.iter(|| {
            let hits = points
                .iter()
                .filter(|p| canvas.hit_test(*p, QueryFilter::PICK).is_some())
                .count();
            black_box(hits)
        })
    });
    group.bench_function("eraser_sweep_256", |b| {
        b.iter(|| {
            let total: usize = points
                .windows(2)
                .map(|w| canvas.query(&Line::new(w[0], w[0] + (w[1] - w[0]) * 0.01), QueryFilter::PICK).len())
                .sum();
            black_box(total)
        })
    });
    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_history");
    let items = gen_items(2048, 20_000.0);
    group.bench_function("erase_then_undo_2048", |b| {
        b.iter_batched(
            || Canvas::from_items(items.iter().cloned()),
            |mut canvas| {
                let mut history = History::new();
                let ids = canvas.all_items();
                for chunk in ids.chunks(8) {
                    history.apply(&mut canvas, Command::Remove(chunk.to_vec()));
                }
                while history.undo(&mut canvas) {}
                canvas
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("drag_2048", |b| {
        b.iter_batched(
            || Canvas::from_items(items.iter().cloned()),
            |mut canvas| {
                let mut history = History::new();
                let ids = canvas.all_items();
                history.apply(&mut canvas, Command::Move(ids, Vec2::new(3.0, -2.0)));
                canvas
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_queries, bench_history);
criterion_main!(benches);
