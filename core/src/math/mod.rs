pub mod fft;
pub mod peaks;
pub mod stats;

pub use fft::FftHelper;
pub use peaks::find_peaks;
pub use stats::StatsHelper;
