use crate::sounding::{DelayEstimate, SoundingFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a file did or did not produce a virtual height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    EmptyCapture,
    InsufficientPeaks,
    QualityRejected,
    PlausibilityRejected,
    DecodeFailed,
    ReadFailed,
}

impl Verdict {
    pub fn echo_detected(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Accepted => "accepted",
            Verdict::EmptyCapture => "empty capture",
            Verdict::InsufficientPeaks => "insufficient peaks",
            Verdict::QualityRejected => "quality rejected",
            Verdict::PlausibilityRejected => "plausibility rejected",
            Verdict::DecodeFailed => "decode failed",
            Verdict::ReadFailed => "read failed",
        };
        f.write_str(label)
    }
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "frequencies_MHz")]
    pub frequency_mhz: f64,
    #[serde(rename = "virtual_heights_km")]
    pub virtual_height_km: f64,
    pub echo_detected: bool,
}

/// Full per-file result: the table row plus what led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub record: HeightRecord,
    pub verdict: Verdict,
    pub estimate: DelayEstimate,
}

impl ProcessedFile {
    /// Result for a file that was gated out or could not be processed.
    pub fn rejected(file: &SoundingFile, verdict: Verdict, estimate: DelayEstimate) -> Self {
        Self {
            record: HeightRecord {
                timestamp: file.timestamp,
                frequency_mhz: file.frequency_mhz,
                virtual_height_km: f64::NAN,
                echo_detected: false,
            },
            verdict,
            estimate,
        }
    }

    pub fn accepted(file: &SoundingFile, height_km: f64, estimate: DelayEstimate) -> Self {
        Self {
            record: HeightRecord {
                timestamp: file.timestamp,
                frequency_mhz: file.frequency_mhz,
                virtual_height_km: height_km,
                echo_detected: true,
            },
            verdict: Verdict::Accepted,
            estimate,
        }
    }
}
