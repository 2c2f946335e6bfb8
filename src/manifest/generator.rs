use crate::config::Config;
use crate::error::{Result, TransManifestError};
use crate::manifest::candidate_filter::CandidateFilter;
use crate::persist::write_atomic;
use crate::tracker::DoneList;
use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The pending-work descriptor consumed by the translation front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub last_updated: String,
    pub files: Vec<String>,
}

impl Manifest {
    pub fn new(files: Vec<String>, generated_at: DateTime<Local>) -> Self {
        Self {
            last_updated: generated_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            files,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TransManifestError::InputFileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| TransManifestError::InvalidManifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Bare file names, with the directory prefix removed.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f.as_str()))
    }
}

/// Directory entries split into manifest candidates and done files.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub candidates: Vec<String>,
    pub skipped_done: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ManifestReport {
    pub manifest: Manifest,
    pub output_file: PathBuf,
    pub skipped_done: Vec<String>,
    pub written: bool,
}

pub struct ManifestGenerator {
    input_directory: String,
    output_file: PathBuf,
    filter: CandidateFilter,
}

impl ManifestGenerator {
    pub fn new(config: &Config, done: DoneList) -> Self {
        Self {
            input_directory: config.input_directory_prefix(),
            output_file: config.manifest.output_file.clone(),
            filter: CandidateFilter::new(&config.manifest, done),
        }
    }

    /// Builds the generator with the done list read from the configured path.
    pub fn from_config(config: &Config) -> Result<Self> {
        let done = DoneList::load(&config.done_files.output_file)?;
        Ok(Self::new(config, done))
    }

    /// Lists the input directory one level deep, sorted by file name.
    pub fn scan(&self) -> Result<ScanOutcome> {
        let root = Path::new(&self.input_directory);

        if !root.exists() {
            return Err(TransManifestError::InputDirectoryNotFound {
                path: self.input_directory.clone(),
            });
        }

        if !root.is_dir() {
            return Err(TransManifestError::NotADirectory {
                path: self.input_directory.clone(),
            });
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut outcome = ScanOutcome::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 1 && is_dangling_link(&e) => {
                    tracing::warn!(
                        path = %e.path().map(|p| p.display().to_string()).unwrap_or_default(),
                        "Skipping dangling link"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };

            if !self.filter.has_candidate_extension(name) {
                continue;
            }

            if self.filter.is_done(name) {
                tracing::debug!(file = name, "Excluding done file");
                outcome.skipped_done.push(name.to_string());
            } else {
                outcome.candidates.push(name.to_string());
            }
        }

        tracing::info!(
            candidates = outcome.candidates.len(),
            excluded = outcome.skipped_done.len(),
            directory = %self.input_directory,
            "Scanned input directory"
        );

        Ok(outcome)
    }

    pub fn build_at(&self, outcome: &ScanOutcome, generated_at: DateTime<Local>) -> Manifest {
        let files = outcome
            .candidates
            .iter()
            .map(|name| format!("{}{}", self.input_directory, name))
            .collect();

        Manifest::new(files, generated_at)
    }

    /// Serializes in memory first; the file is only replaced once the
    /// whole document exists.
    pub fn write(&self, manifest: &Manifest) -> Result<()> {
        let json = manifest.to_json()?;
        write_atomic(&self.output_file, json.as_bytes())
    }

    pub fn generate(&self, dry_run: bool) -> Result<ManifestReport> {
        let outcome = self.scan()?;
        let manifest = self.build_at(&outcome, Local::now());

        if !dry_run {
            self.write(&manifest)?;
        }

        Ok(ManifestReport {
            manifest,
            output_file: self.output_file.clone(),
            skipped_done: outcome.skipped_done,
            written: !dry_run,
        })
    }
}

fn is_dangling_link(error: &walkdir::Error) -> bool {
    error
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.manifest.input_directory = format!("{}/inputs/", root.display());
        config.manifest.output_file = root.join("manifest.json");
        config.done_files.output_file = root.join("done_files.txt");
        config
    }

    fn populate(root: &Path, names: &[&str]) {
        let inputs = root.join("inputs");
        fs::create_dir_all(&inputs).unwrap();
        for name in names {
            fs::write(inputs.join(name), "text\nhello\n").unwrap();
        }
    }

    #[test]
    fn test_manifest_serialization_shape() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let manifest = Manifest::new(vec!["inputs/a.csv".to_string()], at);
        let json = manifest.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["files"][0], "inputs/a.csv");
        assert!(value["lastUpdated"]
            .as_str()
            .unwrap()
            .starts_with("2024-03-01T09:30:00.000000"));
        assert!(json.contains("\n  \"files\""));
    }

    #[test]
    fn test_empty_manifest_serializes_empty_array() {
        let manifest = Manifest::new(Vec::new(), Local::now());
        assert!(manifest.to_json().unwrap().contains("\"files\": []"));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        populate(
            temp_dir.path(),
            &["zeta.csv", "alpha.CSV", "notes.txt", "done.csv", "mid.csv"],
        );
        fs::create_dir_all(temp_dir.path().join("inputs").join("nested.csv")).unwrap();

        let config = create_config(temp_dir.path());
        let generator = ManifestGenerator::new(&config, ["done.csv"].into_iter().collect());
        let outcome = generator.scan().unwrap();

        assert_eq!(outcome.candidates, vec!["alpha.CSV", "mid.csv", "zeta.csv"]);
        assert_eq!(outcome.skipped_done, vec!["done.csv"]);
    }

    #[test]
    fn test_build_prefixes_input_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_config(temp_dir.path());
        config.manifest.input_directory = "inputs".to_string();

        let generator = ManifestGenerator::new(&config, DoneList::new());
        let outcome = ScanOutcome {
            candidates: vec!["a.csv".to_string(), "b.csv".to_string()],
            skipped_done: Vec::new(),
        };
        let manifest = generator.build_at(&outcome, Local::now());

        assert_eq!(manifest.files, vec!["inputs/a.csv", "inputs/b.csv"]);
        assert_eq!(manifest.file_names().collect::<Vec<_>>(), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_missing_directory_leaves_manifest_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_config(temp_dir.path());
        fs::write(&config.manifest.output_file, "previous").unwrap();

        let generator = ManifestGenerator::new(&config, DoneList::new());
        let result = generator.generate(false);

        assert!(matches!(
            result,
            Err(TransManifestError::InputDirectoryNotFound { .. })
        ));
        assert_eq!(
            fs::read_to_string(&config.manifest.output_file).unwrap(),
            "previous"
        );
    }

    #[test]
    fn test_generate_writes_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path(), &["b.csv", "a.csv", "finished.csv"]);
        let config = create_config(temp_dir.path());
        fs::write(&config.done_files.output_file, "finished.csv\n").unwrap();

        let generator = ManifestGenerator::from_config(&config).unwrap();
        let report = generator.generate(false).unwrap();

        assert!(report.written);
        assert_eq!(report.skipped_done, vec!["finished.csv"]);

        let loaded = Manifest::load(&config.manifest.output_file).unwrap();
        assert_eq!(loaded, report.manifest);
        assert_eq!(loaded.file_names().collect::<Vec<_>>(), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_repeated_runs_list_same_files() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path(), &["c.csv", "a.csv", "b.csv"]);
        let config = create_config(temp_dir.path());
        let generator = ManifestGenerator::from_config(&config).unwrap();

        let first = generator.generate(false).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = generator.generate(false).unwrap();

        assert_eq!(first.manifest.files, second.manifest.files);
        assert_ne!(first.manifest.last_updated, second.manifest.last_updated);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_skips_dangling_links() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path(), &["a.csv"]);
        let inputs = temp_dir.path().join("inputs");
        std::os::unix::fs::symlink(inputs.join("gone.csv"), inputs.join("stale.csv")).unwrap();
        std::os::unix::fs::symlink(inputs.join("a.csv"), inputs.join("linked.csv")).unwrap();

        let config = create_config(temp_dir.path());
        let generator = ManifestGenerator::new(&config, DoneList::new());
        let outcome = generator.scan().unwrap();

        assert_eq!(outcome.candidates, vec!["a.csv", "linked.csv"]);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path(), &["a.csv"]);
        let config = create_config(temp_dir.path());

        let generator = ManifestGenerator::new(&config, DoneList::new());
        let report = generator.generate(true).unwrap();

        assert!(!report.written);
        assert_eq!(report.manifest.files.len(), 1);
        assert!(!config.manifest.output_file.exists());
    }

    #[test]
    fn test_invalid_manifest_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        fs::write(&path, r#"{"lastUpdated": "now"}"#).unwrap();

        assert!(matches!(
            Manifest::load(&path),
            Err(TransManifestError::InvalidManifest { .. })
        ));
    }
}
