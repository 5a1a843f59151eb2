use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use melpress::config::SpectrogramConfig;
use melpress::dsp::MelSpectrogramExtractor;

fn bench_config() -> SpectrogramConfig {
    SpectrogramConfig {
        sampling_rate: 22_050,
        duration_seconds: 4.0,
        hop_length: 512,
        n_fft: 2_048,
        n_mels: 128,
        fmin_hz: 20.0,
        fmax_hz: 11_025.0,
        trim_top_db: 60.0,
    }
}

fn tone(config: &SpectrogramConfig) -> Vec<f32> {
    (0..config.samples())
        .map(|i| {
            let t = i as f32 / config.sampling_rate as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let config = bench_config();
    let samples = tone(&config);
    let mut extractor = MelSpectrogramExtractor::new(&config).expect("extractor");
    c.bench_with_input(
        BenchmarkId::new("mel_extract", samples.len()),
        &samples,
        |b, samples| {
            b.iter(|| {
                let mel = extractor.extract(black_box(samples));
                black_box(mel.frames());
            });
        },
    );
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
