pub mod batch;
pub mod cancel;
pub mod correlator;
pub mod delay;
pub mod gate;
pub mod height;
pub mod pipeline;
pub mod reader;

pub use batch::{default_workers, BatchProcessor};
pub use cancel::{cancellation, CancellationHandle, CancellationToken};
pub use correlator::{cross_correlate, CrossCorrelator};
pub use delay::{estimate_delay, DelayEstimator};
pub use height::{virtual_height_km, SPEED_OF_LIGHT_KM_S};
pub use pipeline::Pipeline;
pub use reader::{read_samples, write_samples, SampleReader};
