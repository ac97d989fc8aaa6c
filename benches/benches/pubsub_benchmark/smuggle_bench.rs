use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use smuggler::{build_envelope, decode, smuggled, Message, SenderRef, Smuggled, Smuggler};

#[derive(Debug, Clone, PartialEq)]
struct Quote {
    symbol: String,
    price: f64,
}

smuggled!(Quote);

fn quote() -> Quote {
    Quote {
        symbol: "ACME".to_string(),
        price: 42.5,
    }
}

fn bench_channel_name(c: &mut Criterion) {
    c.bench_function("smuggled_channel_name", |b| {
        b.iter(|| black_box(Quote::channel_name()))
    });
}

fn bench_envelope(c: &mut Criterion) {
    let sender = SenderRef::anonymous();
    c.bench_function("build_envelope", |b| {
        b.iter(|| black_box(build_envelope(quote(), Some(&sender))))
    });

    let message = build_envelope(quote(), None);
    c.bench_function("decode_hit", |b| {
        b.iter(|| black_box(decode::<Quote>(black_box(&message))))
    });

    let foreign = Message::new(Quote::channel_name()).with_entry(Quote::payload_key(), 1_u8);
    c.bench_function("decode_type_mismatch", |b| {
        b.iter(|| black_box(decode::<Quote>(black_box(&foreign))))
    });
}

fn bench_publish_observe(c: &mut Criterion) {
    let smuggler = Smuggler::default();
    let mut observation = smuggler.observe::<Quote>();
    c.bench_function("publish_then_try_next", |b| {
        b.iter(|| {
            smuggler.publish(quote());
            black_box(observation.try_next().ok())
        })
    });
}

criterion_group!(benches, bench_channel_name, bench_envelope, bench_publish_observe);
criterion_main!(benches);
