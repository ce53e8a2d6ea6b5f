//! Benchmarks for fftcorr operations.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use fftcorr_core::Array2D;
use fftcorr_ops::direct::correlate_or_convolve_direct;
use fftcorr_ops::transform::{PaddedBuffer, RustFftTransform, SpectralTransform};
use fftcorr_ops::{Engine, EngineConfig, Mode, PaddingPolicy};

fn image(size: usize) -> Array2D<f32> {
    Array2D::from_fn(size, size, |r, c| ((r * 7 + c * 13) % 17) as f32 / 17.0)
}

fn kernel(size: usize) -> Array2D<f32> {
    let w = 1.0 / (size * size) as f32;
    Array2D::filled(size, size, w)
}

/// Direct vs FFT correlation as the kernel grows.
fn bench_direct_vs_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlate_128");
    group.sample_size(20);

    let img = image(128);
    let fft = Engine::new(EngineConfig::default());
    group.throughput(Throughput::Elements((128 * 128) as u64));

    for k in [3, 7, 15, 31] {
        let ker = kernel(k);

        group.bench_with_input(BenchmarkId::new("direct", k), &ker, |b, ker| {
            b.iter(|| correlate_or_convolve_direct(black_box(&img), ker, Mode::Correlate))
        });

        group.bench_with_input(BenchmarkId::new("fft", k), &ker, |b, ker| {
            b.iter(|| fft.run(black_box(&img), ker, Mode::Correlate))
        });
    }

    group.finish();
}

/// Effect of the padding policy on awkward sizes.
fn bench_padding(c: &mut Criterion) {
    let mut group = c.benchmark_group("padding");
    group.sample_size(20);

    // 251 + 9 - 1 = 259 = 7 * 37
    let img = image(251);
    let ker = kernel(9);

    for padding in [PaddingPolicy::Exact, PaddingPolicy::PowerOfTwo, PaddingPolicy::Smooth] {
        let engine = Engine::new(EngineConfig::default().with_padding(padding));
        group.bench_function(format!("{:?}", padding), |b| {
            b.iter(|| engine.run(black_box(&img), &ker, Mode::Convolve))
        });
    }

    group.finish();
}

/// Sequential vs rayon row passes.
fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for size in [64, 256, 512] {
        let src = image(size);
        group.throughput(Throughput::Elements((size * size) as u64));

        for parallel in [false, true] {
            let fft = RustFftTransform::new(parallel);
            let name = if parallel { "forward_par" } else { "forward_seq" };
            group.bench_with_input(BenchmarkId::new(name, size), &src, |b, src| {
                b.iter(|| {
                    let buffer = PaddedBuffer::from_array(black_box(src)).unwrap();
                    fft.forward(buffer).unwrap()
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_direct_vs_fft, bench_padding, bench_transform);

criterion_main!(benches);
