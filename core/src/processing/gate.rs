use crate::prelude::PipelineConfig;
use crate::sounding::{DelayEstimate, Verdict};

/// Accepts or rejects a measured delay.
///
/// The signal-quality check runs first: a NaN score or one above
/// `max_quality` means the echo is lost in noise. A surviving delay must
/// then fall inside `[min_delay_s, max_delay_s]`; anything else is taken
/// as noise or multi-hop propagation.
pub fn assess(estimate: &DelayEstimate, config: &PipelineConfig) -> Verdict {
    if estimate.quality.is_nan() || estimate.quality > config.max_quality {
        return Verdict::QualityRejected;
    }
    let plausible = estimate.delay_s >= config.min_delay_s && estimate.delay_s <= config.max_delay_s;
    if !plausible {
        return Verdict::PlausibilityRejected;
    }
    Verdict::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(delay_s: f64, quality: f64) -> DelayEstimate {
        DelayEstimate {
            delay_s,
            quality,
            ..DelayEstimate::failed()
        }
    }

    #[test]
    fn in_band_delay_with_good_quality_is_accepted() {
        let config = PipelineConfig::default();
        assert_eq!(assess(&estimate(0.002, 10.0), &config), Verdict::Accepted);
    }

    #[test]
    fn short_delay_is_implausible() {
        let config = PipelineConfig::default();
        assert_eq!(
            assess(&estimate(0.0005, 10.0), &config),
            Verdict::PlausibilityRejected
        );
        assert_eq!(
            assess(&estimate(0.0035, 0.0), &config),
            Verdict::PlausibilityRejected
        );
        assert_eq!(
            assess(&estimate(-0.002, 1.0), &config),
            Verdict::PlausibilityRejected
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let config = PipelineConfig::default();
        assert_eq!(assess(&estimate(0.001, 1.0), &config), Verdict::Accepted);
        assert_eq!(assess(&estimate(0.003, 1.0), &config), Verdict::Accepted);
        assert_eq!(assess(&estimate(0.002, 500.0), &config), Verdict::Accepted);
    }

    #[test]
    fn poor_quality_is_rejected_even_when_plausible() {
        let config = PipelineConfig::default();
        assert_eq!(
            assess(&estimate(0.002, 500.5), &config),
            Verdict::QualityRejected
        );
        assert_eq!(
            assess(&estimate(0.002, f64::NAN), &config),
            Verdict::QualityRejected
        );
    }

    #[test]
    fn nan_delay_is_never_accepted() {
        let config = PipelineConfig::default();
        assert_eq!(
            assess(&estimate(f64::NAN, 1.0), &config),
            Verdict::PlausibilityRejected
        );
    }

    #[test]
    fn thresholds_follow_config() {
        let config = PipelineConfig {
            max_quality: 50.0,
            min_delay_s: 0.0001,
            ..Default::default()
        };
        assert_eq!(
            assess(&estimate(0.0005, 60.0), &config),
            Verdict::QualityRejected
        );
        assert_eq!(assess(&estimate(0.0005, 40.0), &config), Verdict::Accepted);
    }
}
