use crate::math::peaks::find_peaks;
use crate::math::stats::StatsHelper;
use crate::prelude::{PipelineConfig, ProcessingStage, StageError, StageResult};
use crate::sounding::{CorrelationCurve, DelayEstimate, Peak};
use crate::telemetry::log::LogManager;
use ndarray::{s, ArrayView1};

/// Peaks of `curve` that survive the spacing rule, strongest first.
///
/// Equal magnitudes keep their time order, so the earlier lag ranks higher.
pub fn ranked_peaks(curve: &CorrelationCurve, min_spacing: usize) -> StageResult<Vec<Peak>> {
    let magnitudes = curve
        .magnitudes
        .as_slice()
        .ok_or_else(|| StageError::Internal("correlation magnitudes are not contiguous".into()))?;
    let mut peaks: Vec<Peak> = find_peaks(magnitudes, min_spacing)
        .into_iter()
        .map(|index| curve.peak_at(index))
        .collect();
    peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    Ok(peaks)
}

/// `[center - halfwidth, center + halfwidth)`, or `None` if it runs past either end.
fn window(magnitudes: ArrayView1<f64>, center: usize, halfwidth: usize) -> Option<ArrayView1<f64>> {
    let start = center.checked_sub(halfwidth)?;
    let end = center.checked_add(halfwidth)?;
    if end > magnitudes.len() {
        return None;
    }
    Some(magnitudes.slice_move(s![start..end]))
}

/// Mismatch between the neighbourhoods of two peaks after levelling the
/// direct peak down to the indirect one. NaN when either window does not
/// fit inside the curve.
pub fn peak_shape_mismatch(
    curve: &CorrelationCurve,
    direct: &Peak,
    indirect: &Peak,
    halfwidth: usize,
) -> f64 {
    let offset = direct.magnitude - indirect.magnitude;
    let magnitudes = curve.magnitudes.view();
    match (
        window(magnitudes, direct.index, halfwidth),
        window(magnitudes, indirect.index, halfwidth),
    ) {
        (Some(direct_window), Some(indirect_window)) => {
            let levelled = direct_window.mapv(|v| v - offset);
            StatsHelper::root_sum_squares_diff(levelled.view(), indirect_window)
        }
        _ => f64::NAN,
    }
}

/// Picks the direct and reflected arrivals and measures their separation.
///
/// The strongest peak is taken as the direct path and the runner-up as the
/// ionospheric echo, regardless of which comes first in time.
pub fn estimate_delay(curve: &CorrelationCurve, config: &PipelineConfig) -> StageResult<DelayEstimate> {
    let peaks = ranked_peaks(curve, config.peak_min_spacing)?;
    let (direct, indirect) = match peaks.as_slice() {
        [direct, indirect, ..] => (*direct, *indirect),
        _ => return Err(StageError::InsufficientPeaks { found: peaks.len() }),
    };

    let delay_s = (indirect.lag - direct.lag) as f64 / config.sample_rate;
    let quality = peak_shape_mismatch(curve, &direct, &indirect, config.quality_window_halfwidth);

    Ok(DelayEstimate {
        delay_s,
        quality,
        direct: Some(direct),
        indirect: Some(indirect),
    })
}

/// Stage turning a correlation curve into a delay estimate.
pub struct DelayEstimator {
    config: Option<PipelineConfig>,
    logger: LogManager,
}

impl DelayEstimator {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new("ionocore::delay"),
        }
    }
}

impl Default for DelayEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for DelayEstimator {
    type Input = CorrelationCurve;
    type Output = DelayEstimate;

    fn initialize(&mut self, config: &PipelineConfig) -> StageResult<()> {
        config.validate()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: CorrelationCurve) -> StageResult<DelayEstimate> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let estimate = estimate_delay(&input, config)?;
        self.logger.detail(&format!(
            "delay {:.6} s, quality {:.3}",
            estimate.delay_s, estimate.quality
        ));
        Ok(estimate)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
