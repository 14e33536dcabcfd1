use crate::sounding::Verdict;
use std::sync::Mutex;

/// Tally of per-file verdicts over one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub accepted: usize,
    pub empty: usize,
    pub insufficient_peaks: usize,
    pub quality_rejected: usize,
    pub plausibility_rejected: usize,
    pub failed: usize,
}

impl MetricsSnapshot {
    pub fn rejected(&self) -> usize {
        self.processed - self.accepted
    }
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record(&self, verdict: Verdict) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
            match verdict {
                Verdict::Accepted => metrics.accepted += 1,
                Verdict::EmptyCapture => metrics.empty += 1,
                Verdict::InsufficientPeaks => metrics.insufficient_peaks += 1,
                Verdict::QualityRejected => metrics.quality_rejected += 1,
                Verdict::PlausibilityRejected => metrics.plausibility_rejected += 1,
                Verdict::DecodeFailed | Verdict::ReadFailed => metrics.failed += 1,
            }
        }
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = MetricsSnapshot::default();
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
