pub mod error;
pub mod traits;
pub mod types;

pub use error::AccessError;
pub use traits::AssistProvider;
pub use types::{
    AltBatch, AltResult, FailureMode, FormStats, HeuristicsReport, ImageStats, IssueCounts,
    LandmarkStats, LinkStats, PageMeta, ProcessingError, ReportSource, SynthesizedReport,
    MAX_ALT_LEN,
};
