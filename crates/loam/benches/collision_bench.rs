use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use loam::{move_and_collide, Rect, TileGrid, TileKind};

/// 64x64 bordered room with a wall every eighth column, gap every fourth row.
fn striped_grid() -> TileGrid {
    let mut grid = TileGrid::bordered(64, 64, 48.0).unwrap();
    for col in (8..64).step_by(8) {
        for row in 1..63 {
            if row % 4 != 0 {
                grid = grid.with_tile(col, row, TileKind::Wall);
            }
        }
    }
    grid
}

fn bench_short_step(c: &mut Criterion) {
    let grid = striped_grid();
    let start = Rect::new(100.0, 100.0, 36.0, 36.0);

    c.bench_function("move_short_step", |b| {
        b.iter(|| move_and_collide(black_box(start), black_box(Vec2::new(3.7, 2.1)), &grid, &[]))
    });
}

fn bench_long_sweep(c: &mut Criterion) {
    // Open floor, so the sweep scans every column to the border
    let grid = TileGrid::filled(256, 8, 48.0, TileKind::Floor).unwrap();
    let start = Rect::new(60.0, 60.0, 36.0, 36.0);

    c.bench_function("move_long_sweep", |b| {
        b.iter(|| move_and_collide(black_box(start), black_box(Vec2::new(20_000.0, 0.0)), &grid, &[]))
    });
}

fn bench_with_obstacles(c: &mut Criterion) {
    let grid = striped_grid();
    let obstacles: Vec<Rect> = (0..64)
        .map(|i| {
            let f = i as f32;
            Rect::new(50.0 + f * 40.0, 50.0 + (f * 7.0) % 300.0, 20.0, 20.0)
        })
        .collect();
    let start = Rect::new(100.0, 100.0, 36.0, 36.0);

    c.bench_function("move_with_obstacles", |b| {
        b.iter(|| move_and_collide(black_box(start), black_box(Vec2::new(-6.0, 6.0)), &grid, &obstacles))
    });
}

criterion_group!(benches, bench_short_step, bench_long_sweep, bench_with_obstacles);
criterion_main!(benches);
