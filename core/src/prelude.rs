use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunable parameters shared by every processing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Receiver sample rate in Hz.
    pub sample_rate: f64,
    /// Largest accepted peak-shape mismatch score.
    pub max_quality: f64,
    pub min_delay_s: f64,
    pub max_delay_s: f64,
    /// Minimum distance in samples between two correlation peaks.
    pub peak_min_spacing: usize,
    /// Half width in samples of the window compared around each peak.
    pub quality_window_halfwidth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 195_312.0,
            max_quality: 500.0,
            min_delay_s: 0.001,
            max_delay_s: 0.003,
            peak_min_spacing: 300,
            quality_window_halfwidth: 175,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> StageResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(StageError::InvalidConfig(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.min_delay_s.is_nan() || self.max_delay_s.is_nan() {
            return Err(StageError::InvalidConfig("delay bounds must be numbers".into()));
        }
        if self.min_delay_s > self.max_delay_s {
            return Err(StageError::InvalidConfig(format!(
                "min_delay_s {} exceeds max_delay_s {}",
                self.min_delay_s, self.max_delay_s
            )));
        }
        if self.peak_min_spacing == 0 {
            return Err(StageError::InvalidConfig(
                "peak_min_spacing must be at least 1".into(),
            ));
        }
        if self.quality_window_halfwidth == 0 {
            return Err(StageError::InvalidConfig(
                "quality_window_halfwidth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("cannot decode {}: {len} bytes is not a whole number of complex f32 samples", path.display())]
    Decode { path: PathBuf, len: usize },
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("found {found} correlation peaks, need at least 2")]
    InsufficientPeaks { found: usize },
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("processing cancelled")]
    Cancelled,
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing a stateful step of the per-file pipeline.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &PipelineConfig) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.peak_min_spacing, 300);
        assert_eq!(config.quality_window_halfwidth, 175);
    }

    #[test]
    fn inverted_delay_bounds_are_rejected() {
        let config = PipelineConfig {
            min_delay_s: 0.004,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let config = PipelineConfig {
            sample_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
