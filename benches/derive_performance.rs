use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use telemetry_toolkit::{
    Column, HeaderNaming, TelemetryFilter, TelemetryRecord,
    telemetry::{derive, read_telemetry_csv, selection},
    writer,
};

fn create_session(points: usize) -> Vec<TelemetryRecord> {
    (0..points)
        .map(|i| {
            let t = i as f64 * 0.01; // 100Hz
            TelemetryRecord::new(t, 80. + (t * 0.3).sin() * 40., t * 30., 0., 6000.)
                .with_g_forces((t * 0.5).sin(), (t * 0.2).cos() * 0.5)
        })
        .collect()
}

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");

    for points in [1_000, 100_000] {
        let session = create_session(points);
        group.bench_with_input(BenchmarkId::from_parameter(points), &session, |b, s| {
            b.iter(|| black_box(derive(s).unwrap()));
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let derived = derive(&create_session(100_000)).unwrap();
    let filter = TelemetryFilter::new()
        .with_min_speed_kmh(30.)
        .with_min_rpm(5000.);

    c.bench_function("filter_100k", |b| {
        b.iter(|| black_box(selection::filter_records(&derived, &filter)));
    });
}

fn bench_csv_round_trip(c: &mut Criterion) {
    let derived = derive(&create_session(10_000)).unwrap();
    let mut csv = Vec::new();
    writer::write_csv(&mut csv, &derived, &Column::ALL, HeaderNaming::Canonical).unwrap();

    let mut group = c.benchmark_group("csv");
    group.bench_function("write_10k", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(csv.len());
            writer::write_csv(&mut out, &derived, &Column::ALL, HeaderNaming::Canonical).unwrap();
            black_box(out)
        });
    });
    group.bench_function("read_10k", |b| {
        b.iter(|| black_box(read_telemetry_csv(csv.as_slice()).unwrap()));
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50);
    targets = bench_derive, bench_filter, bench_csv_round_trip
}
criterion_main!(benches);
