use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps a forward/inverse `rustfft` plan pair of one length.
pub struct FftHelper {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            forward,
            inverse,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Zero-pads (or truncates) `input` to the plan length and transforms it.
    pub fn forward(&self, input: &[Complex64]) -> Vec<Complex64> {
        let mut buffer = vec![Complex64::zero(); self.size];
        let used = input.len().min(self.size);
        buffer[..used].copy_from_slice(&input[..used]);
        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse transform in place, scaled by `1 / size`.
    pub fn inverse(&self, buffer: &mut [Complex64]) {
        self.inverse.process(buffer);
        let scale = 1.0 / self.size as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
    }
}
