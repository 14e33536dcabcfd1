use num_complex::Complex32;
use std::f64::consts::PI;

/// Linear frequency sweep from `start` to `stop` cycles/sample over `length` samples.
pub fn linear_chirp(length: usize, start: f64, stop: f64) -> Vec<Complex32> {
    let rate = (stop - start) / length.max(1) as f64;
    (0..length)
        .map(|i| {
            let t = i as f64;
            let phase = 2.0 * PI * (start * t + 0.5 * rate * t * t);
            Complex32::new(phase.cos() as f32, phase.sin() as f32)
        })
        .collect()
}
