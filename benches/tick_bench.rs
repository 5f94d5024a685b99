use criterion::{black_box, criterion_group, criterion_main, Criterion};
use turn_scheduler::core::events::SemanticEvent;
use turn_scheduler::scheduler::{Daemon, Fuse, Scheduler};
use turn_scheduler::world::GameWorld;

fn busy_scheduler(daemons: usize, fuses: usize) -> Scheduler<GameWorld> {
    let mut scheduler = Scheduler::new(42);
    for i in 0..daemons {
        let daemon = Daemon::new(format!("daemon-{}", i), "Bench daemon", |ctx| {
            Ok(if ctx.random.chance(0.5) {
                vec![SemanticEvent::message("tick")]
            } else {
                Vec::new()
            })
        })
        .with_priority((i % 7) as i32);
        scheduler.register_daemon(daemon).unwrap();
    }
    for i in 0..fuses {
        scheduler.set_fuse(
            Fuse::new(format!("fuse-{}", i), "Bench fuse", (i % 5 + 1) as u32, |_| {
                Ok(vec![SemanticEvent::message("boom")])
            })
            .repeating(),
        );
    }
    scheduler
}

fn bench_tick(c: &mut Criterion) {
    let mut world = GameWorld::new();
    world.place("player", "hall");

    let mut scheduler = busy_scheduler(100, 100);
    let mut turn = 0;
    c.bench_function("tick_100_daemons_100_fuses", |b| {
        b.iter(|| {
            turn += 1;
            black_box(scheduler.tick(&mut world, turn, "player"))
        })
    });

    let scheduler = busy_scheduler(100, 100);
    c.bench_function("state_snapshot_200", |b| {
        b.iter(|| black_box(scheduler.state().to_json().unwrap()))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
