//! Correlation and delay-extraction core for the chirp-sounder virtual height platform.
//!
//! Each recording flows through a fixed chain of stages: raw IQ samples are
//! decoded, cross-correlated against the reference chirp, reduced to a
//! direct/reflected peak pair and finally converted into a virtual height.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod sounding;
pub mod telemetry;

pub use prelude::{PipelineConfig, ProcessingStage, StageError, StageResult};
