// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use easel_index::{Aabb2D, QuadTree, ZOrderList};

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

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

fn gen_random_rects(count: usize, extent: f64, size: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = (rng.next_f64() - 0.5) * extent;
        let y0 = (rng.next_f64() - 0.5) * extent;
        out.push(Aabb2D::<f64>::from_xywh(x0, y0, size, size));
    }
    out
}

/// Strokes spread along a line that keeps leaving the root, as when a user pans
/// steadily in one direction while drawing.
fn gen_drift_rects(count: usize, step: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|i| {
            let x0 = i as f64 * step;
            let y0 = (rng.next_f64() - 0.5) * 400.0;
            Aabb2D::<f64>::from_xywh(x0, y0, 20.0, 20.0)
        })
        .collect()
}

fn build(rects: &[Aabb2D<f64>]) -> QuadTree<f64, u32> {
    let mut tree = QuadTree::new(Aabb2D::new(-1024.0, -1024.0, 1024.0, 1024.0));
    for (i, r) in rects.iter().copied().enumerate() {
        tree.insert(i as u32, r);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_insert");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter(|| black_box(build(&rects).len()))
        });
    }
    let rects = gen_random_rects(4096, 20_000.0, 12.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("random_4096", |b| b.iter(|| black_box(build(&rects).len())));
    let rects = gen_drift_rects(4096, 50.0);
    group.bench_function("drift_growth_4096", |b| {
        b.iter(|| black_box(build(&rects).root_bounds()))
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");
    let tree = build(&gen_random_rects(16_384, 20_000.0, 12.0));
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let viewports: Vec<_> = (0..256)
        .map(|_| {
            let x = (rng.next_f64() - 0.5) * 20_000.0;
            let y = (rng.next_f64() - 0.5) * 20_000.0;
            Aabb2D::<f64>::from_xywh(x, y, 1280.0, 800.0)
        })
        .collect();
    group.throughput(Throughput::Elements(viewports.len() as u64));
    group.bench_function("viewports_256", |b| {
        b.iter(|| {
            let total: usize = viewports.iter().map(|v| tree.query_rect(*v).len()).sum();
            black_box(total)
        })
    });
    group.bench_function("points_256", |b| {
        b.iter(|| {
            let total: usize = viewports
                .iter()
                .map(|v| tree.query_point(v.min_x, v.min_y).len())
                .sum();
            black_box(total)
        })
    });
    let mut order = ZOrderList::new();
    for i in 0..16_384_u32 {
        order.insert(i);
    }
    group.bench_function("viewports_256_ordered", |b| {
        b.iter(|| {
            let total: usize = viewports
                .iter()
                .map(|v| tree.query_ordered(v, &order, &mut |_, _| true).len())
                .sum();
            black_box(total)
        })
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_update");
    let rects = gen_grid_rects(64, 10.0);
    group.bench_function("nudge_all", |b| {
        b.iter_batched(
            || build(&rects),
            |mut tree| {
                for (j, r) in rects.iter().enumerate() {
                    let dx = (j % 5) as f64 - 2.0;
                    let dy = ((j * 7) % 5) as f64 - 2.0;
                    tree.update(
                        j as u32,
                        Aabb2D::new(r.min_x + dx, r.min_y + dy, r.max_x + dx, r.max_y + dy),
                    );
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_z_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("z_order");
    let n = 4096_u32;
    group.bench_function("reorder_mix_4096", |b| {
        b.iter_batched(
            || {
                let mut order = ZOrderList::new();
                for i in 0..n {
                    order.insert(i);
                }
                order
            },
            |mut order| {
                let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
                for _ in 0..n {
                    let h = (rng.next_u64() % u64::from(n)) as u32;
                    match rng.next_u64() % 4 {
                        0 => order.bring_forward(h),
                        1 => order.send_backward(h),
                        2 => order.bring_to_front(h),
                        _ => order.send_to_back(h),
                    };
                }
                order
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("wedge_middle_4096", |b| {
        b.iter(|| {
            // Always inserting in front of the same anchor halves the gap each time.
            let mut order = ZOrderList::new();
            order.insert(0_u32);
            order.insert(1_u32);
            for i in 2..n {
                order.insert_above(i, Some(0));
            }
            black_box(order.len())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_query,
    bench_update,
    bench_z_order
);
criterion_main!(benches);
