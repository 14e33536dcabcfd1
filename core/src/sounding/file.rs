use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One echo recording handed to the pipeline, already identified by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundingFile {
    pub timestamp: DateTime<Utc>,
    pub frequency_mhz: f64,
    pub path: PathBuf,
}

impl SoundingFile {
    pub fn new(timestamp: DateTime<Utc>, frequency_mhz: f64, path: impl Into<PathBuf>) -> Self {
        Self {
            timestamp,
            frequency_mhz,
            path: path.into(),
        }
    }
}
