pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod persist;
pub mod tracker;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Commands, OutputFormat};
pub use config::{CliOverrides, Config, DoneFilesConfig, ManifestConfig, StatusConfig, TranslationsConfig};
pub use error::{Result, TransManifestError, UserFriendlyError};

// Core functionality re-exports
pub use manifest::{
    CandidateFilter, CompletionReport, FileState, FileStatus, Manifest, ManifestGenerator,
    ManifestReport, StatusBuilder,
};
pub use tracker::{DoneFileExtractor, DoneFilesReport, DoneList, FileCount};
pub use ui::{OutputFormatter, OutputMode};

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Main library interface for TransManifest functionality
pub struct TransManifest {
    config: Config,
    output_formatter: OutputFormatter,
}

impl TransManifest {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    /// Create TransManifest instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;

        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Count translation rows per input file and write the done-file list
    pub fn extract_done_files(&self, dry_run: bool) -> Result<DoneFilesReport> {
        let translations = &self.config.translations;
        self.output_formatter.start_operation(&format!(
            "Reading translations from {}",
            translations.workbook.display()
        ));

        let cells = tracker::read_path_column(translations)?;
        let extractor = DoneFileExtractor::new(translations, &self.config.done_files);
        let counts = extractor.count(&cells)?;
        let done = extractor.select_done(&counts);

        tracing::info!(
            rows = cells.len(),
            files = counts.len(),
            done = done.len(),
            threshold = extractor.threshold(),
            "Counted translation rows"
        );

        let output_file = self.config.done_files.output_file.clone();
        if !dry_run {
            done.save(&output_file)?;
        }

        Ok(DoneFilesReport {
            source: translations.workbook.clone(),
            rows: cells.len(),
            threshold: extractor.threshold(),
            counts,
            done_files: done.names().to_vec(),
            output_file,
            written: !dry_run,
        })
    }

    /// Scan the input directory and write the manifest of pending files
    pub fn generate_manifest(&self, dry_run: bool) -> Result<ManifestReport> {
        self.output_formatter.start_operation(&format!(
            "Scanning {} for pending inputs",
            self.config.manifest.input_directory
        ));

        let generator = ManifestGenerator::from_config(&self.config)?;
        generator.generate(dry_run)
    }

    /// Compare the manifest against recorded translations
    pub fn completion_status(&self) -> Result<CompletionReport> {
        self.output_formatter
            .start_operation("Calculating translation progress");

        let manifest = Manifest::load(&self.config.manifest.output_file)?;
        let cells = tracker::read_path_column(&self.config.translations)?;
        let extractor = DoneFileExtractor::new(&self.config.translations, &self.config.done_files);
        let counts = extractor.count(&cells)?;

        let builder = StatusBuilder::new(&self.config.status);
        Ok(builder.build(&manifest, &counts))
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &TransManifestError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
