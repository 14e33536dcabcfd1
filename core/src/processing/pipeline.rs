use crate::prelude::{PipelineConfig, ProcessingStage, StageError, StageResult};
use crate::processing::cancel::CancellationToken;
use crate::processing::correlator::CrossCorrelator;
use crate::processing::delay::DelayEstimator;
use crate::processing::gate;
use crate::processing::height::virtual_height_km;
use crate::processing::reader::{read_samples, SampleReader};
use crate::sounding::{DelayEstimate, ProcessedFile, SoundingFile, Verdict};
use crate::telemetry::log::LogManager;
use num_complex::Complex32;
use std::path::Path;
use std::sync::Arc;

/// Per-file chain: read, correlate, estimate, gate, convert.
///
/// Holds only immutable state, so one instance is shared by every worker;
/// the stages themselves are built fresh for each file.
pub struct Pipeline {
    config: PipelineConfig,
    reference: Arc<[Complex32]>,
    logger: LogManager,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, reference: Vec<Complex32>) -> StageResult<Self> {
        config.validate()?;
        if reference.is_empty() {
            return Err(StageError::InvalidConfig("reference chirp is empty".into()));
        }
        Ok(Self {
            config,
            reference: Arc::from(reference),
            logger: LogManager::new("ionocore::pipeline"),
        })
    }

    pub fn from_reference_file(config: PipelineConfig, path: &Path) -> StageResult<Self> {
        let reference = read_samples(path)?;
        Self::new(config, reference)
    }

    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    /// Processes one file into exactly one result.
    ///
    /// Per-file problems become a rejected result; only cancellation and
    /// internal faults surface as `Err`.
    pub fn process(&self, file: &SoundingFile, cancel: &CancellationToken) -> StageResult<ProcessedFile> {
        ensure_live(cancel)?;

        let mut reader = SampleReader::new();
        reader.initialize(&self.config)?;
        let read = reader.execute(file.path.clone());
        reader.cleanup();
        let samples = match read {
            Ok(samples) => samples,
            Err(err) => {
                let verdict = match err {
                    StageError::Decode { .. } => Verdict::DecodeFailed,
                    _ => Verdict::ReadFailed,
                };
                self.logger.warn(&format!("{}: {}", file.path.display(), err));
                return Ok(ProcessedFile::rejected(file, verdict, DelayEstimate::failed()));
            }
        };

        if samples.is_empty() {
            self.logger
                .detail(&format!("{}: empty capture", file.path.display()));
            return Ok(ProcessedFile::rejected(
                file,
                Verdict::EmptyCapture,
                DelayEstimate::failed(),
            ));
        }

        ensure_live(cancel)?;
        let mut correlator = CrossCorrelator::new(self.reference.clone());
        correlator.initialize(&self.config)?;
        let curve = correlator.execute(samples)?;
        correlator.cleanup();

        ensure_live(cancel)?;
        let mut estimator = DelayEstimator::new();
        estimator.initialize(&self.config)?;
        let estimated = estimator.execute(curve);
        estimator.cleanup();
        let estimate = match estimated {
            Ok(estimate) => estimate,
            Err(StageError::InsufficientPeaks { found }) => {
                self.logger.detail(&format!(
                    "{}: only {} correlation peaks",
                    file.path.display(),
                    found
                ));
                return Ok(ProcessedFile::rejected(
                    file,
                    Verdict::InsufficientPeaks,
                    DelayEstimate::failed(),
                ));
            }
            Err(err) => return Err(err),
        };

        let verdict = gate::assess(&estimate, &self.config);
        self.logger.detail(&format!(
            "{}: delay {:.6} s quality {:.2} -> {}",
            file.path.display(),
            estimate.delay_s,
            estimate.quality,
            verdict
        ));
        Ok(match verdict {
            Verdict::Accepted => {
                ProcessedFile::accepted(file, virtual_height_km(estimate.delay_s), estimate)
            }
            rejected => ProcessedFile::rejected(file, rejected, estimate),
        })
    }
}

fn ensure_live(cancel: &CancellationToken) -> StageResult<()> {
    if cancel.is_cancelled() {
        Err(StageError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::processing::cancel::cancellation;
    use crate::processing::reader::write_samples;
    use chrono::{TimeZone, Utc};
    use std::f64::consts::PI;
    use tempfile::TempDir;

    /// Linear chirp sweeping 0.02 to 0.45 cycles/sample.
    pub(crate) fn chirp(len: usize) -> Vec<Complex32> {
        let (f0, f1) = (0.02, 0.45);
        let rate = (f1 - f0) / len as f64;
        (0..len)
            .map(|i| {
                let t = i as f64;
                let phase = 2.0 * PI * (f0 * t + 0.5 * rate * t * t);
                Complex32::new(phase.cos() as f32, phase.sin() as f32)
            })
            .collect()
    }

    /// Direct copy at offset zero plus a half-amplitude copy `delay` samples later.
    pub(crate) fn echo(reference: &[Complex32], delay: usize) -> Vec<Complex32> {
        let mut samples = vec![Complex32::new(0.0, 0.0); reference.len() + delay];
        for (i, value) in reference.iter().enumerate() {
            samples[i] += *value;
            samples[i + delay] += *value * 0.5;
        }
        samples
    }

    pub(crate) fn sounding(dir: &TempDir, name: &str, samples: &[Complex32]) -> SoundingFile {
        let path = dir.path().join(name);
        write_samples(&path, samples).unwrap();
        SoundingFile::new(Utc.with_ymd_and_hms(2026, 2, 6, 0, 0, 0).unwrap(), 5.1, path)
    }

    #[test]
    fn delayed_echo_yields_expected_height() {
        let dir = tempfile::tempdir().unwrap();
        let reference = chirp(1000);
        let file = sounding(&dir, "echo", &echo(&reference, 400));
        let pipeline = Pipeline::new(PipelineConfig::default(), reference).unwrap();

        let result = pipeline.process(&file, &CancellationToken::never()).unwrap();

        let expected_delay = 400.0 / 195_312.0;
        assert_eq!(result.verdict, Verdict::Accepted);
        assert!(result.record.echo_detected);
        assert!((result.estimate.delay_s - expected_delay).abs() < 1e-9);
        assert!(result.estimate.quality < 500.0);
        let expected_height = expected_delay * 149_896.229;
        assert!((result.record.virtual_height_km - expected_height).abs() < 1e-6);
        assert!((result.record.virtual_height_km - 306.99).abs() < 0.01);
        assert_eq!(result.record.frequency_mhz, 5.1);
    }

    #[test]
    fn distant_echo_is_rejected_as_implausible() {
        let dir = tempfile::tempdir().unwrap();
        let reference = chirp(1000);
        let file = sounding(&dir, "multi_hop", &echo(&reference, 800));
        let pipeline = Pipeline::new(PipelineConfig::default(), reference).unwrap();

        let result = pipeline.process(&file, &CancellationToken::never()).unwrap();
        assert_eq!(result.verdict, Verdict::PlausibilityRejected);
        assert!(!result.record.echo_detected);
        assert!(result.record.virtual_height_km.is_nan());
    }

    #[test]
    fn empty_file_is_an_empty_capture() {
        let dir = tempfile::tempdir().unwrap();
        let file = sounding(&dir, "empty", &[]);
        let pipeline = Pipeline::new(PipelineConfig::default(), chirp(64)).unwrap();

        let result = pipeline.process(&file, &CancellationToken::never()).unwrap();
        assert_eq!(result.verdict, Verdict::EmptyCapture);
        assert!(!result.record.echo_detected);
        assert!(result.record.virtual_height_km.is_nan());
    }

    #[test]
    fn misaligned_file_is_recorded_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated");
        std::fs::write(&path, [0u8; 10]).unwrap();
        let file = SoundingFile::new(Utc.with_ymd_and_hms(2026, 2, 6, 0, 0, 0).unwrap(), 5.1, path);
        let pipeline = Pipeline::new(PipelineConfig::default(), chirp(64)).unwrap();

        let result = pipeline.process(&file, &CancellationToken::never()).unwrap();
        assert_eq!(result.verdict, Verdict::DecodeFailed);
        assert!(result.record.virtual_height_km.is_nan());
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = SoundingFile::new(
            Utc.with_ymd_and_hms(2026, 2, 6, 0, 0, 0).unwrap(),
            5.1,
            dir.path().join("gone"),
        );
        let pipeline = Pipeline::new(PipelineConfig::default(), chirp(64)).unwrap();
        let result = pipeline.process(&file, &CancellationToken::never()).unwrap();
        assert_eq!(result.verdict, Verdict::ReadFailed);
    }

    #[test]
    fn short_recording_has_too_few_peaks() {
        let dir = tempfile::tempdir().unwrap();
        let reference = chirp(64);
        let file = sounding(&dir, "short", &reference[..16]);
        let pipeline = Pipeline::new(PipelineConfig::default(), reference).unwrap();

        let result = pipeline.process(&file, &CancellationToken::never()).unwrap();
        assert_eq!(result.verdict, Verdict::InsufficientPeaks);
        assert!(!result.record.echo_detected);
    }

    #[test]
    fn cancelled_token_stops_processing() {
        let dir = tempfile::tempdir().unwrap();
        let reference = chirp(64);
        let file = sounding(&dir, "echo", &reference);
        let pipeline = Pipeline::new(PipelineConfig::default(), reference).unwrap();
        let (handle, token) = cancellation();
        handle.cancel();
        assert!(matches!(
            pipeline.process(&file, &token),
            Err(StageError::Cancelled)
        ));
    }

    #[test]
    fn empty_reference_is_a_configuration_error() {
        assert!(matches!(
            Pipeline::new(PipelineConfig::default(), Vec::new()),
            Err(StageError::InvalidConfig(_))
        ));
    }
}
