use crate::config::ManifestConfig;
use crate::tracker::DoneList;

/// Decides which directory entries belong in the manifest.
pub struct CandidateFilter {
    suffix: String,
    done: DoneList,
}

impl CandidateFilter {
    pub fn new(config: &ManifestConfig, done: DoneList) -> Self {
        let extension = config.extension.trim_start_matches('.').to_lowercase();

        Self {
            suffix: format!(".{}", extension),
            done,
        }
    }

    /// Case-insensitive suffix match on the name itself, so `.CSV` counts
    /// and `archive.csv.bak` does not.
    pub fn has_candidate_extension(&self, filename: &str) -> bool {
        filename.to_lowercase().ends_with(&self.suffix)
    }

    /// Exclusion compares exact names; case differences are not folded.
    pub fn is_done(&self, filename: &str) -> bool {
        self.done.contains(filename)
    }
}
