use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reel_animation::flow::wait_for;
use reel_animation::threading::{join, spawn, threadable, Scheduler};
use reel_animation::{Animator, BisectionMode, CubicBezier, Easing};
use reel_core::{PlaybackClock, SharedProperty};
use std::rc::Rc;

const TASK_COUNTS: &[usize] = &[16, 256, 4096];

fn bench_bezier(c: &mut Criterion) {
    let mut group = c.benchmark_group("bezier_solve");
    let curves = [
        ("ease", CubicBezier::new(0.25, 0.1, 0.25, 1.0)),
        ("steep", CubicBezier::new(0.9, 0.0, 0.1, 1.0)),
        (
            "steep_exact",
            CubicBezier::new(0.9, 0.0, 0.1, 1.0).with_bisection(BisectionMode::Exact),
        ),
    ];
    for (name, curve) in curves {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for i in 0..=100 {
                    sum += curve.solve(black_box(i as f64 / 100.0));
                }
                sum
            })
        });
    }
    group.finish();

    c.bench_function("easing_apply", |b| {
        let easing = Easing::EaseInOutElastic(reel_animation::easing::ELASTIC_IN_OUT_FREQUENCY);
        b.iter(|| easing.apply(black_box(0.37)))
    });
}

/// A root that spawns `count` waiting children and joins them
fn populated_scheduler(count: usize) -> (Rc<PlaybackClock>, Scheduler) {
    let clock = Rc::new(PlaybackClock::new(60.0).unwrap());
    let mut scheduler = Scheduler::new(clock.clone());
    scheduler.spawn(threadable("root", async move {
        let mut tasks = Vec::with_capacity(count);
        for _ in 0..count {
            tasks.push(spawn(wait_for(3600.0)).await);
        }
        join(true, tasks).await;
    }));
    scheduler.tick().unwrap();
    (clock, scheduler)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_tick");
    for &count in TASK_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (clock, mut scheduler) = populated_scheduler(count);
            b.iter(|| {
                clock.advance();
                scheduler.tick().unwrap()
            })
        });
    }
    group.finish();

    c.bench_function("animator_tick", |b| {
        let clock = Rc::new(PlaybackClock::new(60.0).unwrap());
        let mut scheduler = Scheduler::new(clock.clone());
        let value = SharedProperty::new(0.0);
        scheduler.spawn(
            Animator::new(value)
                .key(1.0, 1.0, Easing::EaseInOutCubic)
                .back(1.0, Easing::EaseInOutCubic)
                .run(usize::MAX),
        );
        b.iter(|| {
            clock.advance();
            scheduler.tick().unwrap()
        })
    });
}

criterion_group!(benches, bench_bezier, bench_tick);
criterion_main!(benches);
