use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dsss_core::filters::{
    convolve, design_bandpass, design_lowpass, BandpassEdges, LowpassEdges,
};

fn benchmark_kaiser_design(c: &mut Criterion) {
    c.bench_function("design_bandpass_19_23khz", |b| {
        let edges = BandpassEdges {
            fs1: 19_000.0,
            fp1: 20_000.0,
            fp2: 22_000.0,
            fs2: 23_000.0,
        };
        b.iter(|| design_bandpass(black_box(edges), 0.1, 80.0, 48_000.0))
    });

    c.bench_function("design_lowpass_4_8khz", |b| {
        let edges = LowpassEdges { fp: 4_000.0, fs: 8_000.0 };
        b.iter(|| design_lowpass(black_box(edges), 0.1, 80.0, 48_000.0))
    });
}

fn benchmark_fir_apply(c: &mut Criterion) {
    let edges = LowpassEdges { fp: 4_000.0, fs: 8_000.0 };
    let filter = design_lowpass(edges, 0.1, 80.0, 48_000.0).unwrap();

    let mut group = c.benchmark_group("fir_apply");
    for size in [256usize, 1024, 4096].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let input: Vec<f64> = (0..size).map(|n| (n as f64 * 0.01).sin()).collect();
            let mut filter = filter.clone();
            b.iter(|| filter.apply(black_box(&input)))
        });
    }
    group.finish();
}

fn benchmark_convolve(c: &mut Criterion) {
    let signal: Vec<f64> = (0..2048).map(|n| (n as f64 * 0.01).sin()).collect();
    let kernel: Vec<f64> = vec![0.1, 0.2, 0.3, 0.2, 0.1];

    c.bench_function("convolve_2048x5", |b| {
        b.iter(|| convolve(black_box(&signal), black_box(&kernel)))
    });
}

criterion_group!(
    benches,
    benchmark_kaiser_design,
    benchmark_fir_apply,
    benchmark_convolve
);
criterion_main!(benches);
