//! Performance benchmarks for onset detection and resampling

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use transient_analyzer::audio::resample_mono;
use transient_analyzer::onset::{OnsetDetector, SpectralFluxDetector};

fn synthetic(sample_rate: u32, seconds: usize) -> Vec<f32> {
    // 440 Hz tone with a short click every half second
    (0..sample_rate as usize * seconds)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let tone = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3;
            let click = if i % (sample_rate as usize / 2) < 64 { 0.6 } else { 0.0 };
            tone + click
        })
        .collect()
}

fn bench_spectral_flux(c: &mut Criterion) {
    let samples = synthetic(48_000, 30);
    let detector = SpectralFluxDetector::new();

    c.bench_function("spectral_flux_30s_48k", |b| {
        b.iter(|| {
            let _ = detector.detect(black_box(&samples), black_box(48_000));
        });
    });
}

fn bench_resample(c: &mut Criterion) {
    let samples = synthetic(44_100, 30);

    c.bench_function("resample_30s_44k_to_48k", |b| {
        b.iter(|| {
            let _ = resample_mono(black_box(&samples), 44_100, 48_000);
        });
    });
}

criterion_group!(benches, bench_spectral_flux, bench_resample);
criterion_main!(benches);
