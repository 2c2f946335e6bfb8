use crate::error::{TransManifestError, UserFriendlyError};
use crate::manifest::{CompletionReport, FileState, ManifestReport};
use crate::tracker::DoneFilesReport;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &TransManifestError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Reports
    pub fn print_done_files_report(&self, report: &DoneFilesReport) {
        match self.mode {
            OutputMode::Json => self.print_json_report("done_files", report),
            _ => {
                if report.written {
                    self.success(&format!(
                        "Wrote {} done files to {}",
                        report.done_files.len(),
                        report.output_file.display()
                    ));
                } else {
                    self.info(&format!(
                        "Dry run: {} done files would be written to {}",
                        report.done_files.len(),
                        report.output_file.display()
                    ));
                }

                if report.done_files.is_empty() {
                    self.warning(&format!(
                        "No file reached {} translations",
                        report.threshold
                    ));
                }

                if self.quiet {
                    return;
                }

                self.debug(&format!(
                    "{} translation rows across {} files in {}",
                    report.rows,
                    report.counts.len(),
                    report.source.display()
                ));

                for count in report.counts.iter().filter(|c| c.count >= report.threshold) {
                    println!("  - {} ({})", count.filename, count.count);
                }

                if self.verbose_level >= 1 {
                    for count in report.counts.iter().filter(|c| c.count < report.threshold) {
                        println!("  . {} ({}/{})", count.filename, count.count, report.threshold);
                    }
                }
            }
        }
    }

    pub fn print_manifest_report(&self, report: &ManifestReport, input_directory: &str) {
        let files = &report.manifest.files;

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "manifest",
                "output_file": report.output_file.display().to_string(),
                "written": report.written,
                "lastUpdated": report.manifest.last_updated,
                "files": files,
                "skipped_done": report.skipped_done,
            })),
            _ => {
                if files.is_empty() {
                    self.warning(&format!("No CSV files found in '{}'", input_directory));
                }

                if report.written {
                    self.success(&format!(
                        "Manifest generated successfully with {} CSV files.",
                        files.len()
                    ));
                    self.info(&format!("Saved to {}", report.output_file.display()));
                } else {
                    self.info(&format!(
                        "Dry run: manifest with {} CSV files not written",
                        files.len()
                    ));
                }

                if !report.skipped_done.is_empty() {
                    self.debug(&format!(
                        "Excluded {} done files: {}",
                        report.skipped_done.len(),
                        report.skipped_done.join(", ")
                    ));
                }

                if !files.is_empty() && !self.quiet {
                    println!();
                    println!("Files included:");
                    for file in files {
                        println!("  - {}", file);
                    }
                }
            }
        }
    }

    pub fn print_status_report(&self, report: &CompletionReport) {
        match self.mode {
            OutputMode::Json => self.print_json_report("status", report),
            OutputMode::Plain => self.print_plain_status(report),
            OutputMode::Human => self.print_human_status(report),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "Warning:",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_report<T: serde::Serialize>(&self, kind: &str, report: &T) {
        let mut value = serde_json::to_value(report).unwrap_or(serde_json::Value::Null);
        if let Some(object) = value.as_object_mut() {
            object.insert("type".to_string(), serde_json::Value::from(kind));
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_status(&self, report: &CompletionReport) {
        self.print_header("Translation Completion Status");

        let overall = &report.overall;
        let percent = format!("{}%", overall.progress_percent);
        println!(
            "Overall completion: {}",
            if self.use_colors {
                style(percent).cyan().bold().to_string()
            } else {
                percent
            }
        );
        println!(
            "Files:     {} completed out of {} total ({} in progress)",
            overall.completed_files, overall.total_files, overall.in_progress_files
        );
        println!(
            "Sentences: {} translated out of {} total",
            overall.completed_entries, overall.total_entries
        );
        println!(
            "Remaining: {} lines (about {} hours)",
            overall.remaining_lines, overall.estimated_hours
        );

        if report.files.is_empty() {
            return;
        }

        println!();
        self.print_separator();
        for file in &report.files {
            let label = format!("{:<11}", file.state.label());
            let label = if self.use_colors {
                match file.state {
                    FileState::Complete => style(label).green().bold().to_string(),
                    FileState::InProgress => style(label).yellow().to_string(),
                    FileState::NotStarted => style(label).dim().to_string(),
                }
            } else {
                label
            };

            println!(
                "  {} {}/{} ({}%)  {}",
                label,
                file.completed_entries,
                file.total_entries,
                file.percentage(),
                file.filename
            );

            if let Some(ref note) = file.note {
                self.debug(&format!("{}: {}", file.filename, note));
            }
        }
        self.print_separator();
    }

    fn print_plain_status(&self, report: &CompletionReport) {
        let overall = &report.overall;
        println!("REPORT: Translation completion");
        println!("Progress: {}%", overall.progress_percent);
        println!("Files: {}/{}", overall.completed_files, overall.total_files);
        println!(
            "Sentences: {}/{}",
            overall.completed_entries, overall.total_entries
        );
        println!("Remaining lines: {}", overall.remaining_lines);
        println!("Estimated hours: {}", overall.estimated_hours);

        for file in &report.files {
            println!(
                "{}\t{}\t{}/{}",
                file.filename,
                file.state.label(),
                file.completed_entries,
                file.total_entries
            );
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
