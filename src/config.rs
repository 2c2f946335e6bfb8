use crate::error::{Result, TransManifestError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub translations: TranslationsConfig,
    pub done_files: DoneFilesConfig,
    pub manifest: ManifestConfig,
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationsConfig {
    pub workbook: PathBuf,
    pub sheet: String,
    pub path_column: usize,
    pub path_prefix: String,
    pub skip_rows: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DoneFilesConfig {
    pub threshold: usize,
    pub output_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub input_directory: String,
    pub extension: String,
    pub output_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    pub text_columns: Vec<String>,
    pub minutes_per_line: u64,
}

impl Default for TranslationsConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("Translations.xlsx"),
            sheet: "ALL_TRANSLATIONS".to_string(),
            path_column: 3,
            path_prefix: "inputs/".to_string(),
            skip_rows: 0,
        }
    }
}

impl Default for DoneFilesConfig {
    fn default() -> Self {
        Self {
            threshold: 45,
            output_file: PathBuf::from("done_files.txt"),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            input_directory: "inputs/".to_string(),
            extension: "csv".to_string(),
            output_file: PathBuf::from("manifest.json"),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            text_columns: vec!["text".to_string(), "Sentence".to_string()],
            minutes_per_line: 2,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TransManifestError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TransManifestError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TransManifestError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["transmanifest.toml", ".transmanifest.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!(path = *default_path, "Loading configuration");
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref workbook) = cli_args.workbook {
            self.translations.workbook = workbook.clone();
        }

        if let Some(ref sheet) = cli_args.sheet {
            self.translations.sheet = sheet.clone();
        }

        if let Some(column) = cli_args.path_column {
            self.translations.path_column = column;
        }

        if let Some(ref prefix) = cli_args.path_prefix {
            self.translations.path_prefix = prefix.clone();
        }

        if let Some(skip_rows) = cli_args.skip_rows {
            self.translations.skip_rows = skip_rows;
        }

        if let Some(threshold) = cli_args.threshold {
            self.done_files.threshold = threshold;
        }

        if let Some(ref done_files) = cli_args.done_files {
            self.done_files.output_file = done_files.clone();
        }

        if let Some(ref input_dir) = cli_args.input_directory {
            self.manifest.input_directory = input_dir.clone();
        }

        if let Some(ref manifest) = cli_args.manifest_file {
            self.manifest.output_file = manifest.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TransManifestError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TransManifestError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.translations.sheet.trim().is_empty() {
            return Err(TransManifestError::Config {
                message: "Sheet name must not be empty".to_string(),
            });
        }

        if self.translations.path_prefix.is_empty() {
            return Err(TransManifestError::Config {
                message: "Path prefix must not be empty".to_string(),
            });
        }

        if self.done_files.threshold == 0 {
            return Err(TransManifestError::Config {
                message: "Done threshold must be greater than 0".to_string(),
            });
        }

        if self.manifest.extension.trim_start_matches('.').is_empty() {
            return Err(TransManifestError::Config {
                message: "Candidate file extension must not be empty".to_string(),
            });
        }

        if self.status.text_columns.is_empty() {
            return Err(TransManifestError::Config {
                message: "At least one status text column must be specified".to_string(),
            });
        }

        if self.status.minutes_per_line == 0 {
            return Err(TransManifestError::Config {
                message: "Minutes per line must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Manifest entries are the input directory joined textually with the
    /// file name, so the directory string always ends in a separator.
    pub fn input_directory_prefix(&self) -> String {
        let dir = &self.manifest.input_directory;
        if dir.ends_with('/') || dir.ends_with('\\') {
            dir.clone()
        } else {
            format!("{}/", dir)
        }
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    pub path_column: Option<usize>,
    pub path_prefix: Option<String>,
    pub skip_rows: Option<usize>,
    pub threshold: Option<usize>,
    pub done_files: Option<PathBuf>,
    pub input_directory: Option<String>,
    pub manifest_file: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(mut self, workbook: Option<PathBuf>) -> Self {
        self.workbook = workbook;
        self
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_path_column(mut self, column: Option<usize>) -> Self {
        self.path_column = column;
        self
    }

    pub fn with_path_prefix(mut self, prefix: Option<String>) -> Self {
        self.path_prefix = prefix;
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: Option<usize>) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<usize>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_done_files(mut self, done_files: Option<PathBuf>) -> Self {
        self.done_files = done_files;
        self
    }

    pub fn with_input_directory(mut self, input_dir: Option<String>) -> Self {
        self.input_directory = input_dir;
        self
    }

    pub fn with_manifest_file(mut self, manifest: Option<PathBuf>) -> Self {
        self.manifest_file = manifest;
        self
    }
}
