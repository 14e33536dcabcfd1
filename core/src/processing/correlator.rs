use crate::math::fft::FftHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{PipelineConfig, ProcessingStage, StageError, StageResult};
use crate::sounding::CorrelationCurve;
use crate::telemetry::log::LogManager;
use num_complex::{Complex32, Complex64};
use std::sync::Arc;

/// Full linear cross-correlation of `candidate` against `reference`.
///
/// Output index `i` holds `sum_n candidate[n + k] * conj(reference[n])` with
/// `k = i - (reference.len() - 1)`, for `reference.len() + candidate.len() - 1`
/// offsets, computed through zero-padded FFTs.
pub fn correlate(reference: &[Complex32], candidate: &[Complex32]) -> StageResult<Vec<Complex64>> {
    if reference.is_empty() {
        return Err(StageError::EmptyInput("reference chirp has no samples".into()));
    }
    if candidate.is_empty() {
        return Err(StageError::EmptyInput("recording has no samples".into()));
    }

    let full_len = reference.len() + candidate.len() - 1;
    let helper = FftHelper::new(full_len.next_power_of_two());
    let fft_len = helper.size();

    let widen = |s: &Complex32| Complex64::new(f64::from(s.re), f64::from(s.im));
    let reference_spectrum = helper.forward(&reference.iter().map(widen).collect::<Vec<_>>());
    let mut spectrum = helper.forward(&candidate.iter().map(widen).collect::<Vec<_>>());
    for (bin, reference_bin) in spectrum.iter_mut().zip(reference_spectrum.iter()) {
        *bin *= reference_bin.conj();
    }
    helper.inverse(&mut spectrum);

    let negative_span = reference.len() - 1;
    Ok((0..full_len)
        .map(|i| spectrum[(i + fft_len - negative_span) % fft_len])
        .collect())
}

/// Correlates and projects onto the dB curve used for peak search.
pub fn cross_correlate(reference: &[Complex32], candidate: &[Complex32]) -> StageResult<CorrelationCurve> {
    let correlation = correlate(reference, candidate)?;
    let magnitudes = correlation
        .iter()
        .map(|value| StatsHelper::to_db(value.norm()))
        .collect();
    Ok(CorrelationCurve::from_magnitudes(magnitudes))
}

/// Matched-filter stage holding the shared reference chirp.
pub struct CrossCorrelator {
    reference: Arc<[Complex32]>,
    logger: LogManager,
}

impl CrossCorrelator {
    pub fn new(reference: Arc<[Complex32]>) -> Self {
        Self {
            reference,
            logger: LogManager::new("ionocore::correlator"),
        }
    }
}

impl ProcessingStage for CrossCorrelator {
    type Input = Vec<Complex32>;
    type Output = CorrelationCurve;

    fn initialize(&mut self, _config: &PipelineConfig) -> StageResult<()> {
        if self.reference.is_empty() {
            return Err(StageError::InvalidConfig("reference chirp is empty".into()));
        }
        Ok(())
    }

    fn execute(&mut self, input: Vec<Complex32>) -> StageResult<CorrelationCurve> {
        let curve = cross_correlate(&self.reference, &input)?;
        self.logger.detail(&format!(
            "correlated {} samples into {} lags",
            input.len(),
            curve.len()
        ));
        Ok(curve)
    }

    fn cleanup(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<Complex32> {
        (0..len)
            .map(|i| Complex32::new((i as f32 * 0.7).sin(), (i as f32 * 0.3).cos()))
            .collect()
    }

    fn direct_correlation(reference: &[Complex32], candidate: &[Complex32]) -> Vec<Complex64> {
        let m = reference.len() as i64;
        let n = candidate.len() as i64;
        (-(m - 1)..n)
            .map(|k| {
                (0..m)
                    .filter(|&j| (0..n).contains(&(j + k)))
                    .map(|j| {
                        let a = candidate[(j + k) as usize];
                        let v = reference[j as usize];
                        Complex64::new(a.re as f64, a.im as f64)
                            * Complex64::new(v.re as f64, v.im as f64).conj()
                    })
                    .sum::<Complex64>()
            })
            .collect()
    }

    #[test]
    fn fft_correlation_matches_direct_sum() {
        let reference = ramp(5);
        let candidate = ramp(9);
        let fast = correlate(&reference, &candidate).unwrap();
        let slow = direct_correlation(&reference, &candidate);
        assert_eq!(fast.len(), slow.len());
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn curve_length_is_sum_of_lengths_minus_one() {
        let curve = cross_correlate(&ramp(10), &ramp(25)).unwrap();
        assert_eq!(curve.len(), 34);
        assert_eq!(curve.lags.len(), curve.magnitudes.len());
        let equal = cross_correlate(&ramp(16), &ramp(16)).unwrap();
        assert_eq!(equal.len(), 2 * 16 - 1);
    }

    #[test]
    fn autocorrelation_peaks_at_zero_lag() {
        let signal = ramp(64);
        let curve = cross_correlate(&signal, &signal).unwrap();
        let best = curve.argmax().unwrap();
        assert_eq!(curve.lags[best], 0);
    }

    #[test]
    fn delayed_copy_shows_up_at_its_offset() {
        let reference = ramp(32);
        let mut candidate = vec![Complex32::new(0.0, 0.0); 32];
        candidate.extend_from_slice(&reference);
        let correlation = correlate(&reference, &candidate).unwrap();
        let best = correlation
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(best as i64 - (reference.len() as i64 - 1), 32);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(
            cross_correlate(&ramp(4), &[]),
            Err(StageError::EmptyInput(_))
        ));
        let mut stage = CrossCorrelator::new(Arc::from(Vec::new()));
        assert!(stage.initialize(&PipelineConfig::default()).is_err());
    }
}
