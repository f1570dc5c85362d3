use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ecocrop_agronomy::{FieldReading, rank_crops};

fn bench_rank_crops(c: &mut Criterion) {
    let reading = FieldReading {
        nitrogen: 85.0,
        phosphorus: 45.0,
        potassium: 40.0,
        temperature_c: 24.0,
        humidity_pct: 82.0,
        ph: 6.0,
        rainfall_mm: 220.0,
    };

    c.bench_function("rank_crops", |b| {
        b.iter(|| rank_crops(black_box(&reading)).unwrap())
    });
}

criterion_group!(benches, bench_rank_crops);
criterion_main!(benches);
