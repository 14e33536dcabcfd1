//! Enumerates the recordings of a date range from the dated directory tree.

pub mod naming;

use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use chrono::NaiveDate;
use ionocore::sounding::SoundingFile;
use log::{debug, warn};
use naming::parse_recording_name;
use std::fs;
use std::path::{Path, PathBuf};

/// `<root>/<YYYY>/<MM>/<DD>` for every date from `start` to `end` inclusive.
pub fn day_directories(root: &Path, start: NaiveDate, end: NaiveDate) -> Vec<PathBuf> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| root.join(day.format("%Y/%m/%d").to_string()))
        .collect()
}

/// Recordings of one day directory in file-name order.
pub fn scan_day(directory: &Path, skip_names: &[String]) -> anyhow::Result<Vec<SoundingFile>> {
    let mut entries = fs::read_dir(directory)
        .with_context(|| format!("listing {}", directory.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("listing {}", directory.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!("skipping non UTF-8 file name {}", path.display());
            continue;
        };
        if skip_names.iter().any(|skip| *skip == name) {
            debug!("skipping {}", path.display());
            continue;
        }
        match parse_recording_name(&name) {
            Ok(parsed) => {
                if parsed.frequency_mhz.is_nan() {
                    warn!("{} carries no frequency", path.display());
                }
                files.push(SoundingFile::new(parsed.timestamp, parsed.frequency_mhz, path));
            }
            Err(err) => warn!("skipping {}: {:#}", path.display(), err),
        }
    }
    Ok(files)
}

/// Every recording in the configured date range, in enumeration order.
pub fn enumerate(config: &WorkflowConfig) -> anyhow::Result<Vec<SoundingFile>> {
    if !config.root.is_dir() {
        anyhow::bail!("data root {} is not a directory", config.root.display());
    }

    let mut files = Vec::new();
    for directory in day_directories(&config.root, config.start_date, config.end_date) {
        if !directory.is_dir() {
            warn!("no recordings directory {}", directory.display());
            continue;
        }
        files.extend(scan_day(&directory, &config.skip_names)?);
    }
    Ok(files)
}
