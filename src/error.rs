use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransManifestError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read workbook {path}: {message}")]
    Workbook { path: String, message: String },

    #[error("Sheet '{sheet}' not found in {path}")]
    SheetNotFound {
        sheet: String,
        path: String,
        available: Vec<String>,
    },

    #[error("Unsupported translation table format: {path}")]
    UnsupportedTable { path: String },

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row} has no value in column {column}")]
    MissingPathValue { row: usize, column: usize },

    #[error("Row {row}: '{value}' does not start with '{prefix}'")]
    UnexpectedPrefix {
        row: usize,
        value: String,
        prefix: String,
    },

    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    #[error("Directory '{path}' does not exist")]
    InputDirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid manifest {path}: {message}")]
    InvalidManifest { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },
}

impl TransManifestError {
    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            TransManifestError::Config { .. } => 2,
            TransManifestError::InputFileNotFound { .. }
            | TransManifestError::InputDirectoryNotFound { .. }
            | TransManifestError::NotADirectory { .. }
            | TransManifestError::SheetNotFound { .. } => 3,
            TransManifestError::MissingPathValue { .. }
            | TransManifestError::UnexpectedPrefix { .. }
            | TransManifestError::UnsupportedTable { .. }
            | TransManifestError::Workbook { .. }
            | TransManifestError::Csv(_) => 4,
            TransManifestError::InvalidManifest { .. } => 5,
            _ => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TransManifestError {
    fn user_message(&self) -> String {
        match self {
            TransManifestError::SheetNotFound {
                sheet,
                path,
                available,
            } => {
                if available.is_empty() {
                    format!("Sheet '{}' not found in {}", sheet, path)
                } else {
                    format!(
                        "Sheet '{}' not found in {} (available: {})",
                        sheet,
                        path,
                        available.join(", ")
                    )
                }
            }
            TransManifestError::UnexpectedPrefix { row, value, prefix } => {
                format!(
                    "Unexpected path in row {}: '{}' (expected prefix '{}')",
                    row, value, prefix
                )
            }
            TransManifestError::InputDirectoryNotFound { path } => {
                format!("Error: Directory '{}' does not exist", path)
            }
            TransManifestError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            TransManifestError::Serialization(e) => {
                format!("Error generating manifest: {}", e)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TransManifestError::SheetNotFound { .. } => Some(
                "Set the sheet name with --sheet or in the [translations] section of the configuration.".to_string()
            ),
            TransManifestError::UnsupportedTable { .. } => Some(
                "Provide an .xlsx, .xlsm, .xls, .ods workbook or a .csv export of the translations sheet.".to_string()
            ),
            TransManifestError::MissingPathValue { .. } => Some(
                "Check --column points at the file path column, or use --skip-rows to skip header rows.".to_string()
            ),
            TransManifestError::UnexpectedPrefix { .. } => Some(
                "Check the path prefix with --prefix, or use --skip-rows to skip header rows.".to_string()
            ),
            TransManifestError::InputFileNotFound { .. } => Some(
                "Check the path, or set it in the configuration file.".to_string()
            ),
            TransManifestError::InputDirectoryNotFound { .. } => Some(
                "Create the directory or point --input-dir at the folder holding the CSV inputs.".to_string()
            ),
            TransManifestError::InvalidManifest { .. } => Some(
                "Regenerate the manifest with `transmanifest manifest`.".to_string()
            ),
            TransManifestError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are valid.".to_string()
            ),
            TransManifestError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target path.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for TransManifestError {
    fn from(error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match error.into_io_error() {
            Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                TransManifestError::Permission { path }
            }
            Some(io) => TransManifestError::Io(std::io::Error::new(
                io.kind(),
                format!("{}: {}", path, io),
            )),
            None => TransManifestError::Io(std::io::Error::other(format!(
                "directory walk failed at {}",
                path
            ))),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = TransManifestError::InputDirectoryNotFound {
            path: "inputs/".to_string(),
        };
        assert_eq!(
            error.user_message(),
            "Error: Directory 'inputs/' does not exist"
        );
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_sheet_not_found_lists_available_sheets() {
        let error = TransManifestError::SheetNotFound {
            sheet: "ALL_TRANSLATIONS".to_string(),
            path: "Translations.xlsx".to_string(),
            available: vec!["Sheet1".to_string(), "Sheet2".to_string()],
        };
        assert!(error.user_message().contains("available: Sheet1, Sheet2"));
    }

    #[test]
    fn test_exit_codes() {
        let config = TransManifestError::Config {
            message: "bad".to_string(),
        };
        let missing = TransManifestError::InputDirectoryNotFound {
            path: "x".to_string(),
        };
        let prefix = TransManifestError::UnexpectedPrefix {
            row: 1,
            value: "a.csv".to_string(),
            prefix: "inputs/".to_string(),
        };
        let manifest = TransManifestError::InvalidManifest {
            path: "manifest.json".to_string(),
            message: "no files".to_string(),
        };

        assert_eq!(config.exit_code(), 2);
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(prefix.exit_code(), 4);
        assert_eq!(manifest.exit_code(), 5);
        assert_eq!(
            TransManifestError::Io(std::io::Error::other("boom")).exit_code(),
            1
        );
    }

    #[test]
    fn test_walk_errors_name_the_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let walk_error = walkdir::WalkDir::new(&missing)
            .into_iter()
            .find_map(|entry| entry.err())
            .unwrap();

        match TransManifestError::from(walk_error) {
            TransManifestError::Io(io) => {
                assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
                assert!(io.to_string().contains(&missing.display().to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
