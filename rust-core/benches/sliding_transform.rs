//! Sliding transforms against per-sample batch recomputation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex64;
use realfft::RealFftPlanner;
use trace_panel::{
    run_panel, DftDenoiser, PanelConfig, SlidingDct, SlidingDft, SlidingTransform, Trace, WindowType,
};

const NUM_SAMPLES: usize = 2000;
const WINDOW: usize = 31;

fn test_trace() -> Vec<f32> {
    (0..NUM_SAMPLES)
        .map(|i| {
            let t = i as f32 * 0.004;
            (2.0 * std::f32::consts::PI * 25.0 * t).sin() + 0.3 * (2.0 * std::f32::consts::PI * 60.0 * t).cos()
        })
        .collect()
}

fn bench_forward(c: &mut Criterion) {
    let samples = test_trace();

    let mut sdft = SlidingDft::new(WINDOW, NUM_SAMPLES).unwrap();
    let mut spectrum = sdft.new_spectrum();
    c.bench_function("sdft_forward_2000x31", |b| {
        b.iter(|| {
            sdft.forward(black_box(&samples), WindowType::Hann, &mut spectrum)
                .unwrap();
        });
    });

    let mut sdct = SlidingDct::new(WINDOW, NUM_SAMPLES).unwrap();
    let mut cosine = sdct.new_spectrum();
    c.bench_function("sdct_forward_2000x31", |b| {
        b.iter(|| {
            sdct.forward(black_box(&samples), WindowType::Hann, &mut cosine)
                .unwrap();
        });
    });

    // One FFT per time sample, the cost the recursion avoids
    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(WINDOW);
    let mut input = fft.make_input_vec();
    let mut output = fft.make_output_vec();
    let mut columns = vec![Complex64::new(0.0, 0.0); (WINDOW / 2 + 1) * NUM_SAMPLES];
    c.bench_function("batch_fft_2000x31", |b| {
        b.iter(|| {
            let h = (WINDOW / 2) as isize;
            for t in 0..NUM_SAMPLES {
                for (m, value) in input.iter_mut().enumerate() {
                    let index = (t as isize + m as isize - h).clamp(0, NUM_SAMPLES as isize - 1);
                    *value = samples[index as usize] as f64;
                }
                fft.process(&mut input, &mut output).unwrap();
                let start = t * output.len();
                columns[start..start + output.len()].copy_from_slice(&output);
            }
            black_box(&columns);
        });
    });
}

fn bench_denoise(c: &mut Criterion) {
    let samples = test_trace();
    let traces: Vec<Trace> = (0..40)
        .map(|i| Trace::new(vec![i as u8; 240], samples.clone()))
        .collect();
    let config = PanelConfig::default();

    c.bench_function("sdft_denoise_40_traces", |b| {
        b.iter(|| {
            let mut denoiser = DftDenoiser::new(&config).unwrap();
            black_box(run_panel(&mut denoiser, black_box(&traces)).unwrap());
        });
    });
}

criterion_group!(benches, bench_forward, bench_denoise);
criterion_main!(benches);
