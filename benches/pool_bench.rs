// benches/pool_bench.rs
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zmq_pool::pool::{MessagePool, PoolConfig};
use zmq_pool::prelude::{Context, SendFlags, Socket, SocketType};

fn bench_rent_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_rent_return");

    for size in [32, 512, 4096, 65536].iter() {
        group.bench_with_input(BenchmarkId::new("pooled", size), size, |b, &size| {
            let pool = MessagePool::new(PoolConfig::default());
            b.iter(|| {
                let msg = pool.rent(black_box(size)).unwrap();
                drop(msg);
            });
        });

        group.bench_with_input(BenchmarkId::new("one_shot_oversized", size), size, |b, &size| {
            let pool = MessagePool::new(PoolConfig::default());
            b.iter(|| {
                // A request larger than the biggest bucket always falls back
                // to a fresh one-shot allocation, giving an "unpooled" baseline
                // at comparable per-call overhead.
                let msg = pool.rent(black_box(size) + 8 * 1024 * 1024).unwrap();
                drop(msg);
            });
        });
    }

    group.finish();
}

fn bench_bucket_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_selection");
    let pool = MessagePool::new(PoolConfig::default());

    group.bench_function("warm_hit", |b| {
        // Prime one bucket, then rent/return repeatedly so every iteration
        // after the first is a stack hit.
        let warm = pool.rent(1024).unwrap();
        drop(warm);
        b.iter(|| {
            let msg = pool.rent(black_box(1024)).unwrap();
            drop(msg);
        });
    });

    group.bench_function("cold_miss", |b| {
        let fresh_pool = MessagePool::new(PoolConfig::default());
        b.iter(|| {
            // A size class never rented before on this pool is always a miss.
            let msg = fresh_pool.rent(black_box(2048)).unwrap();
            drop(msg);
        });
    });

    group.finish();
}

fn bench_send_recv_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("send_recv_round_trip");
    let ctx = Context::new().expect("engine must be linked for this benchmark");

    group.bench_function("pooled_inproc_round_trip", |b| {
        let pool = MessagePool::new(PoolConfig::default());
        let puller = Socket::new(&ctx, SocketType::Pull).unwrap();
        puller.bind("inproc://pool-bench-pooled").unwrap();
        let pusher = Socket::new(&ctx, SocketType::Push).unwrap();
        pusher.connect("inproc://pool-bench-pooled").unwrap();
        let payload = [0x42u8; 256];

        b.iter(|| {
            let msg = pool.rent_with_bytes(black_box(&payload)).unwrap();
            pusher.send_msg(msg, SendFlags::NONE.bits()).unwrap();
            let mut buf = [0u8; 256];
            puller.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
        });
    });

    group.bench_function("regular_inproc_round_trip", |b| {
        let puller = Socket::new(&ctx, SocketType::Pull).unwrap();
        puller.bind("inproc://pool-bench-regular").unwrap();
        let pusher = Socket::new(&ctx, SocketType::Push).unwrap();
        pusher.connect("inproc://pool-bench-regular").unwrap();
        let payload = [0x42u8; 256];

        b.iter(|| {
            pusher.send(black_box(&payload), SendFlags::NONE.bits()).unwrap();
            let mut buf = [0u8; 256];
            puller.recv(&mut buf, SendFlags::NONE.bits()).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rent_return,
    bench_bucket_selection,
    bench_send_recv_round_trip
);
criterion_main!(benches);
