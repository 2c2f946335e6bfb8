use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "transmanifest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track finished translation inputs and generate the pending-file manifest")]
#[command(
    long_about = "TransManifest counts translation rows per input file in the translations \
                  workbook, records the files that are done, and writes manifest.json listing \
                  the CSV inputs that still need translating."
)]
#[command(after_help = "EXAMPLES:\n  \
    transmanifest done-files\n  \
    transmanifest done-files --workbook export.csv --threshold 30\n  \
    transmanifest manifest --input-dir inputs/ --output manifest.json\n  \
    transmanifest status --output-format json\n  \
    transmanifest --generate-config --config transmanifest.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write the list of input files that reached the translation threshold
    DoneFiles(DoneFilesArgs),

    /// Write manifest.json listing the CSV inputs still pending
    Manifest(ManifestArgs),

    /// Report translation progress for every file in the manifest
    Status(StatusArgs),
}

/// Where the translation rows come from.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Translations workbook (.xlsx, .ods, ...) or CSV export
    #[arg(short, long)]
    pub workbook: Option<PathBuf>,

    /// Sheet holding the translation rows
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Zero-based column holding the input file path
    #[arg(long)]
    pub column: Option<usize>,

    /// Directory token every path value starts with
    #[arg(long)]
    pub prefix: Option<String>,

    /// Leading rows to ignore (e.g. a header row)
    #[arg(long)]
    pub skip_rows: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DoneFilesArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Minimum translation rows for a file to count as done
    #[arg(short, long)]
    pub threshold: Option<usize>,

    /// Done-file list to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the list without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ManifestArgs {
    /// Directory scanned for CSV inputs
    #[arg(short, long)]
    pub input_dir: Option<String>,

    /// Done-file list whose entries are excluded
    #[arg(long)]
    pub done_files: Option<PathBuf>,

    /// Manifest file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the manifest without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Manifest to report on
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let overrides = CliOverrides::new();

        match &self.command {
            Some(Commands::DoneFiles(args)) => with_table(overrides, &args.table)
                .with_threshold(args.threshold)
                .with_done_files(args.output.clone()),
            Some(Commands::Manifest(args)) => overrides
                .with_input_directory(args.input_dir.clone())
                .with_done_files(args.done_files.clone())
                .with_manifest_file(args.output.clone()),
            Some(Commands::Status(args)) => {
                with_table(overrides, &args.table).with_manifest_file(args.manifest.clone())
            }
            None => overrides,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default tracing filter when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "transmanifest=error";
        }

        match self.verbose {
            0 => "transmanifest=warn",
            1 => "transmanifest=info",
            2 => "transmanifest=debug",
            _ => "transmanifest=trace",
        }
    }
}

fn with_table(overrides: CliOverrides, table: &TableArgs) -> CliOverrides {
    overrides
        .with_workbook(table.workbook.clone())
        .with_sheet(table.sheet.clone())
        .with_path_column(table.column)
        .with_path_prefix(table.prefix.clone())
        .with_skip_rows(table.skip_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_done_files_command() {
        let cli = Cli::try_parse_from([
            "transmanifest",
            "done-files",
            "--workbook",
            "export.csv",
            "--threshold",
            "30",
            "--column",
            "2",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::DoneFiles(ref args)) => {
                assert_eq!(args.table.workbook, Some(PathBuf::from("export.csv")));
                assert_eq!(args.threshold, Some(30));
                assert_eq!(args.table.column, Some(2));
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["transmanifest", "manifest", "-vv", "--output-format", "json"])
            .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.output_format, OutputFormat::Json));
        assert_eq!(cli.output_mode(), OutputMode::Json);
        assert!(matches!(cli.command, Some(Commands::Manifest(_))));
    }

    #[test]
    fn test_overrides_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "transmanifest",
            "manifest",
            "--input-dir",
            "queue/",
            "--output",
            "pending.json",
        ])
        .unwrap();

        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.manifest.input_directory, "queue/");
        assert_eq!(config.manifest.output_file, PathBuf::from("pending.json"));
        assert_eq!(config.done_files.threshold, 45);
    }

    #[test]
    fn test_quiet_overrides_verbosity() {
        let cli = Cli::try_parse_from(["transmanifest", "status", "-v", "--quiet"]).unwrap();

        assert_eq!(cli.verbosity_level(), 0);
        assert_eq!(cli.log_filter(), "transmanifest=error");
    }

    #[test]
    fn test_log_filter_levels() {
        let cli = Cli::try_parse_from(["transmanifest", "status"]).unwrap();
        assert_eq!(cli.log_filter(), "transmanifest=warn");

        let cli = Cli::try_parse_from(["transmanifest", "status", "-vvv"]).unwrap();
        assert_eq!(cli.log_filter(), "transmanifest=trace");
    }

    #[test]
    fn test_generate_config_without_subcommand() {
        let cli = Cli::try_parse_from(["transmanifest", "--generate-config"]).unwrap();
        assert!(cli.generate_config);
        assert!(cli.command.is_none());
    }
}
