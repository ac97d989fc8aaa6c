use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use smuggler::{Broker, Message, Subscription};

fn bench_subscribe(c: &mut Criterion) {
    let broker = Broker::default();
    c.bench_function("broker_subscribe", |b| {
        b.iter(|| {
            let _sub = black_box(broker.subscribe("chan", None));
        })
    });
}

fn bench_unsubscribe_all(c: &mut Criterion) {
    let broker = Broker::default();
    c.bench_function("broker_unsubscribe_all", |b| {
        b.iter(|| {
            let _sub = broker.subscribe("chan", None);
            broker.unsubscribe_all("chan");
            black_box(())
        });
    });
}

fn bench_post(c: &mut Criterion) {
    let mut group = c.benchmark_group("broker_post");
    for subscribers in [0_usize, 1, 10, 100] {
        let broker = Broker::default();
        let _subs: Vec<Subscription> = (0..subscribers)
            .map(|_| broker.subscribe("chan", None))
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| broker.post(black_box(Message::new("chan").with_entry("n", 1_u64))));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_subscribe, bench_unsubscribe_all, bench_post);
criterion_main!(benches);
