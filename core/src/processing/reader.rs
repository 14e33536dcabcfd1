use crate::prelude::{PipelineConfig, ProcessingStage, StageError, StageResult};
use crate::telemetry::log::LogManager;
use byteorder::{ByteOrder, LittleEndian};
use num_complex::Complex32;
use std::fs;
use std::path::{Path, PathBuf};

/// Bytes per interleaved (real, imaginary) f32 pair.
pub const BYTES_PER_SAMPLE: usize = 2 * std::mem::size_of::<f32>();

/// Decodes little-endian interleaved f32 IQ pairs.
pub fn decode_samples(path: &Path, bytes: &[u8]) -> StageResult<Vec<Complex32>> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(StageError::Decode {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    }
    let mut floats = vec![0.0f32; bytes.len() / std::mem::size_of::<f32>()];
    LittleEndian::read_f32_into(bytes, &mut floats);
    Ok(floats
        .chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect())
}

pub fn encode_samples(samples: &[Complex32]) -> Vec<u8> {
    let floats: Vec<f32> = samples.iter().flat_map(|s| [s.re, s.im]).collect();
    let mut bytes = vec![0u8; floats.len() * std::mem::size_of::<f32>()];
    LittleEndian::write_f32_into(&floats, &mut bytes);
    bytes
}

pub fn read_samples(path: &Path) -> StageResult<Vec<Complex32>> {
    let bytes = fs::read(path).map_err(|source| StageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_samples(path, &bytes)
}

pub fn write_samples(path: &Path, samples: &[Complex32]) -> StageResult<()> {
    fs::write(path, encode_samples(samples)).map_err(|source| StageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// First stage: loads one recording into memory.
pub struct SampleReader {
    logger: LogManager,
}

impl SampleReader {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("ionocore::reader"),
        }
    }
}

impl Default for SampleReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for SampleReader {
    type Input = PathBuf;
    type Output = Vec<Complex32>;

    fn initialize(&mut self, _config: &PipelineConfig) -> StageResult<()> {
        Ok(())
    }

    fn execute(&mut self, input: PathBuf) -> StageResult<Vec<Complex32>> {
        let samples = read_samples(&input)?;
        self.logger.detail(&format!(
            "read {} samples from {}",
            samples.len(),
            input.display()
        ));
        Ok(samples)
    }

    fn cleanup(&mut self) {}
}
