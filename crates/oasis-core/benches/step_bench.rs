use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oasis_core::room::{Room, SpawnDef, SpawnKind};
use oasis_core::{InputSnapshot, SimConfig, Simulation, World};
use oasis_core::loam::TileGrid;

/// 24x16 room with a grunt on every third cell of every third row.
fn crowded_world() -> World {
    let mut room = Room::new("arena", TileGrid::bordered(24, 16, 48.0).unwrap());
    for row in (2..14).step_by(3) {
        for col in (2..22).step_by(3) {
            room.spawns.push(SpawnDef::new(SpawnKind::Enemy, col, row));
        }
    }
    World::from_rooms(vec![room], &"arena".into(), SimConfig::default()).unwrap()
}

fn bench_step(c: &mut Criterion) {
    c.bench_function("step_crowded_room", |b| {
        let mut sim = Simulation::new(crowded_world(), 7);
        let mut tick = 0u32;
        b.iter(|| {
            tick = tick.wrapping_add(1);
            let input = if tick % 40 < 20 { InputSnapshot::RIGHT } else { InputSnapshot::LEFT | InputSnapshot::ATTACK };
            sim.step(black_box(input));
        });
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut sim = Simulation::new(crowded_world(), 7);
    for _ in 0..60 {
        sim.step(InputSnapshot::empty());
    }

    c.bench_function("frame_capture", |b| b.iter(|| black_box(sim.frame())));
}

criterion_group!(benches, bench_step, bench_frame);
criterion_main!(benches);
