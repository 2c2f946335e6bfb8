pub mod candidate_filter;
pub mod generator;
pub mod status;

pub use candidate_filter::CandidateFilter;
pub use generator::{Manifest, ManifestGenerator, ManifestReport, ScanOutcome};
pub use status::{CompletionReport, FileState, FileStatus, OverallProgress, StatusBuilder};
