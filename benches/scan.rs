use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tefind::libs::detect::{DetectParams, Detector};
use tefind::libs::nt::Sequence;
use tefind::libs::repeat::{BruteForce, Cancel, RepeatScan, TirParams, TsdParams};

fn random_seq(len: usize) -> Sequence {
    let mut rng = SmallRng::seed_from_u64(42);
    let bases: Vec<u8> = (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect();
    Sequence::new(bases).unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let seq = random_seq(5_000);
    let serial = BruteForce::serial();
    let parallel = BruteForce::with_threads(4);

    c.bench_function("inverted 5k serial", |b| {
        b.iter(|| serial.inverted(black_box(&seq), &TirParams::default(), &Cancel::none()))
    });
    c.bench_function("inverted 5k 4 threads", |b| {
        b.iter(|| parallel.inverted(black_box(&seq), &TirParams::default(), &Cancel::none()))
    });
    c.bench_function("direct 5k serial", |b| {
        b.iter(|| serial.direct(black_box(&seq), &TsdParams::default(), &Cancel::none()))
    });
}

fn bench_detect(c: &mut Criterion) {
    let seq = random_seq(2_000);
    let detector = Detector::new(DetectParams::default());

    c.bench_function("detect 2k", |b| b.iter(|| detector.run("bench", black_box(&seq))));
}

criterion_group!(benches, bench_scan, bench_detect);
criterion_main!(benches);
