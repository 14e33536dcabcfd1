use crate::generator::template::linear_chirp;
use anyhow::Context;
use chrono::{Duration, NaiveDate};
use ionocore::processing::write_samples;
use num_complex::Complex32;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the reference chirp written at the dataset root.
pub const REFERENCE_NAME: &str = "chirpA";

/// Configuration for generating synthetic sounder recordings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub chirp_len: usize,
    pub sweep_start: f64,
    pub sweep_stop: f64,
    /// Reflected-path delay in samples, one recording per entry.
    pub delays: Vec<usize>,
    pub frequencies_mhz: Vec<f64>,
    pub echo_amplitude: f32,
    pub noise: f32,
    pub seed: u64,
    /// Also write a zero-length capture.
    pub include_empty: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            chirp_len: 1000,
            sweep_start: 0.02,
            sweep_stop: 0.45,
            delays: vec![300, 400, 500, 800],
            frequencies_mhz: vec![3.5, 5.1, 7.2],
            echo_amplitude: 0.5,
            noise: 0.0,
            seed: 0,
            include_empty: true,
        }
    }
}

impl GeneratorConfig {
    pub fn reference(&self) -> Vec<Complex32> {
        linear_chirp(self.chirp_len, self.sweep_start, self.sweep_stop)
    }
}

/// Direct copy at offset zero plus an attenuated copy `delay` samples later.
pub fn build_echo(
    reference: &[Complex32],
    delay: usize,
    amplitude: f32,
    noise: f32,
    rng: &mut StdRng,
) -> Vec<Complex32> {
    let mut samples = vec![Complex32::new(0.0, 0.0); reference.len() + delay];
    for (index, &value) in reference.iter().enumerate() {
        samples[index] += value;
        samples[index + delay] += value * amplitude;
    }
    if noise > 0.0 {
        for sample in samples.iter_mut() {
            *sample += Complex32::new(rng.gen_range(-noise..noise), rng.gen_range(-noise..noise));
        }
    }
    samples
}

/// Files produced by [`synthesize`].
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub reference: PathBuf,
    pub day_directory: PathBuf,
    pub recordings: Vec<PathBuf>,
}

/// Writes a reference chirp plus one day of echo recordings under `root`,
/// laid out as `<root>/<YYYY>/<MM>/<DD>/<YYYY_MM_DD_HH_MM_SS>_<freq>MHz`.
pub fn synthesize(
    root: &Path,
    date: NaiveDate,
    config: &GeneratorConfig,
) -> anyhow::Result<SyntheticDataset> {
    let day_directory = root.join(date.format("%Y/%m/%d").to_string());
    fs::create_dir_all(&day_directory)
        .with_context(|| format!("creating {}", day_directory.display()))?;

    let reference = config.reference();
    let reference_path = root.join(REFERENCE_NAME);
    write_samples(&reference_path, &reference)
        .with_context(|| format!("writing reference chirp {}", reference_path.display()))?;
    // The transmitted chirp is also archived beside the echoes under a fixed name.
    write_samples(&day_directory.join("no_name"), &reference)
        .context("writing archived chirp")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("building start of day timestamp")?;
    let frequencies = if config.frequencies_mhz.is_empty() {
        vec![f64::NAN]
    } else {
        config.frequencies_mhz.clone()
    };

    let mut recordings = Vec::new();
    let mut slot = 0i64;
    let mut next_name = |frequency: f64| {
        let timestamp = midnight + Duration::minutes(5 * slot);
        slot += 1;
        format!("{}_{}MHz", timestamp.format("%Y_%m_%d_%H_%M_%S"), frequency)
    };

    for (index, &delay) in config.delays.iter().enumerate() {
        let frequency = frequencies[index % frequencies.len()];
        let path = day_directory.join(next_name(frequency));
        let samples = build_echo(&reference, delay, config.echo_amplitude, config.noise, &mut rng);
        write_samples(&path, &samples).with_context(|| format!("writing {}", path.display()))?;
        recordings.push(path);
    }

    if config.include_empty {
        let path = day_directory.join(next_name(frequencies[0]));
        fs::write(&path, b"").with_context(|| format!("writing {}", path.display()))?;
        recordings.push(path);
    }

    Ok(SyntheticDataset {
        reference: reference_path,
        day_directory,
        recordings,
    })
}
