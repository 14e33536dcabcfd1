pub mod curve;
pub mod file;
pub mod record;
pub mod table;

pub use curve::{CorrelationCurve, DelayEstimate, Peak};
pub use file::SoundingFile;
pub use record::{HeightRecord, ProcessedFile, Verdict};
pub use table::ResultTable;
