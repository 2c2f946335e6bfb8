use clap::{CommandFactory, Parser};
use std::process;
use transmanifest::{
    Cli, Commands, OutputFormatter, TransManifest, TransManifestError, UserFriendlyError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    transmanifest::init_logging(cli.log_filter());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(command) = cli.command.clone() else {
        let _ = Cli::command().print_help();
        return 2;
    };

    let app = match TransManifest::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&cli, &e);
            return e.exit_code();
        }
    };

    let result = match command {
        Commands::DoneFiles(args) => app
            .extract_done_files(args.dry_run)
            .map(|report| app.output_formatter().print_done_files_report(&report)),
        Commands::Manifest(args) => app.generate_manifest(args.dry_run).map(|report| {
            app.output_formatter()
                .print_manifest_report(&report, &app.config().input_directory_prefix())
        }),
        Commands::Status(_) => app
            .completion_status()
            .map(|report| app.output_formatter().print_status_report(&report)),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "transmanifest.toml".to_string());

    match TransManifest::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  transmanifest manifest --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(cli: &Cli, error: &TransManifestError) {
    let formatter = OutputFormatter::new(cli.output_mode(), cli.verbosity_level(), cli.quiet);
    formatter.print_user_friendly_error(error);
}
