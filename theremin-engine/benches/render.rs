use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use theremin_engine::{Engine, Interpolation, LoadedSample, ToneState, Voice};

const SR: f32 = 16_000.0;
const FRAMES: usize = 128;

fn tone() -> Arc<ToneState> {
    let tone = Arc::new(ToneState::new(1234.5, 0.8));
    tone.play();
    tone
}

fn bench_harmonic(c: &mut Criterion) {
    let mut engine = Engine::new(Voice::new(None, Interpolation::Linear), tone(), SR);
    let mut buf = [0u8; FRAMES];
    c.bench_function("render_harmonic_128", |b| {
        b.iter(|| {
            engine.render(black_box(&mut buf));
        });
    });
}

fn bench_sample(c: &mut Criterion) {
    let data: Vec<i16> = (0..16_000)
        .map(|i| ((i as f32 * core::f32::consts::TAU * 440.0 / SR).sin() * 20_000.0) as i16)
        .collect();
    let sample = LoadedSample::new(data, 16_000).expect("sample");
    for interp in [Interpolation::Nearest, Interpolation::Linear] {
        let mut engine = Engine::new(Voice::new(Some(&sample), interp), tone(), SR);
        let mut buf = [0u8; FRAMES];
        c.bench_function(&format!("render_sample_{interp:?}_128").to_lowercase(), |b| {
            b.iter(|| {
                engine.render(black_box(&mut buf));
            });
        });
    }
}

criterion_group!(benches, bench_harmonic, bench_sample);
criterion_main!(benches);
