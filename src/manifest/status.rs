use crate::config::StatusConfig;
use crate::error::Result;
use crate::manifest::generator::Manifest;
use crate::tracker::FileCount;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Complete,
    InProgress,
    NotStarted,
}

impl FileState {
    pub fn label(&self) -> &'static str {
        match self {
            FileState::Complete => "Complete",
            FileState::InProgress => "In Progress",
            FileState::NotStarted => "Not Started",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub file: String,
    pub filename: String,
    pub total_entries: usize,
    pub completed_entries: usize,
    pub state: FileState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FileStatus {
    fn ratio(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            self.completed_entries as f64 / self.total_entries as f64
        }
    }

    pub fn percentage(&self) -> u64 {
        (self.ratio() * 100.0).round() as u64
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverallProgress {
    pub total_files: usize,
    pub completed_files: usize,
    pub in_progress_files: usize,
    pub total_entries: usize,
    pub completed_entries: usize,
    pub progress_percent: u64,
    pub remaining_lines: usize,
    pub estimated_hours: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub files: Vec<FileStatus>,
    pub overall: OverallProgress,
}

/// Result of counting the sentences of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCount {
    pub total: usize,
    pub note: Option<String>,
}

pub struct StatusBuilder {
    text_columns: Vec<String>,
    minutes_per_line: u64,
}

impl StatusBuilder {
    pub fn new(config: &StatusConfig) -> Self {
        Self {
            text_columns: config.text_columns.clone(),
            minutes_per_line: config.minutes_per_line,
        }
    }

    /// Counts rows with a non-blank sentence in the first text column the
    /// header provides. Unreadable files count as empty with a note.
    pub fn count_entries(&self, path: &Path) -> EntryCount {
        if !path.exists() {
            return EntryCount {
                total: 0,
                note: Some("file not found".to_string()),
            };
        }

        match self.try_count_entries(path) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read input file");
                EntryCount {
                    total: 0,
                    note: Some(format!("unreadable: {}", e)),
                }
            }
        }
    }

    fn try_count_entries(&self, path: &Path) -> Result<EntryCount> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();

        let column = self
            .text_columns
            .iter()
            .find_map(|name| headers.iter().position(|h| h.trim() == name.as_str()));

        let Some(column) = column else {
            return Ok(EntryCount {
                total: 0,
                note: Some(format!(
                    "no {} column",
                    self.text_columns
                        .iter()
                        .map(|c| format!("\"{}\"", c))
                        .collect::<Vec<_>>()
                        .join(" or ")
                )),
            });
        };

        let mut total = 0;
        for record in reader.records() {
            let record = record?;
            if record.get(column).is_some_and(|v| !v.trim().is_empty()) {
                total += 1;
            }
        }

        Ok(EntryCount { total, note: None })
    }

    pub fn build(&self, manifest: &Manifest, counts: &[FileCount]) -> CompletionReport {
        let recorded: HashMap<&str, usize> = counts
            .iter()
            .map(|c| (c.filename.as_str(), c.count))
            .collect();

        let mut files: Vec<FileStatus> = manifest
            .files
            .iter()
            .zip(manifest.file_names())
            .map(|(file, filename)| {
                let entries = self.count_entries(Path::new(file));
                let completed = recorded
                    .get(filename)
                    .copied()
                    .unwrap_or(0)
                    .min(entries.total);

                FileStatus {
                    file: file.clone(),
                    filename: filename.to_string(),
                    total_entries: entries.total,
                    completed_entries: completed,
                    state: classify(entries.total, completed),
                    note: entries.note,
                }
            })
            .collect();

        files.sort_by(|a, b| b.ratio().partial_cmp(&a.ratio()).unwrap_or(Ordering::Equal));

        let overall = self.summarize(&files);
        CompletionReport { files, overall }
    }

    fn summarize(&self, files: &[FileStatus]) -> OverallProgress {
        let total_entries: usize = files.iter().map(|f| f.total_entries).sum();
        let completed_entries: usize = files.iter().map(|f| f.completed_entries).sum();
        let completed_files = files
            .iter()
            .filter(|f| f.state == FileState::Complete)
            .count();
        let remaining_lines = total_entries - completed_entries;

        let progress_percent = if total_entries == 0 {
            0
        } else {
            (completed_entries as f64 * 100.0 / total_entries as f64).round() as u64
        };

        OverallProgress {
            total_files: files.len(),
            completed_files,
            in_progress_files: files.len() - completed_files,
            total_entries,
            completed_entries,
            progress_percent,
            remaining_lines,
            estimated_hours: (remaining_lines as u64 * self.minutes_per_line).div_ceil(60),
        }
    }
}

fn classify(total: usize, completed: usize) -> FileState {
    if total > 0 && completed >= total {
        FileState::Complete
    } else if completed > 0 {
        FileState::InProgress
    } else {
        FileState::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::fs;
    use tempfile::TempDir;

    fn builder() -> StatusBuilder {
        StatusBuilder::new(&StatusConfig::default())
    }

    fn write_input(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn count(filename: &str, count: usize) -> FileCount {
        FileCount {
            filename: filename.to_string(),
            count,
        }
    }

    #[test]
    fn test_count_entries_prefers_text_column() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_input(
            temp_dir.path(),
            "a.csv",
            "id,Sentence,text\n1,x,hello\n2,y,\n3,z,  \n4,w,world\n",
        );

        let entries = builder().count_entries(Path::new(&file));
        assert_eq!(entries, EntryCount { total: 2, note: None });
    }

    #[test]
    fn test_count_entries_falls_back_to_sentence() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_input(temp_dir.path(), "a.csv", "Sentence\none\ntwo\nthree\n");

        assert_eq!(builder().count_entries(Path::new(&file)).total, 3);
    }

    #[test]
    fn test_count_entries_without_text_column() {
        let temp_dir = TempDir::new().unwrap();
        let file = write_input(temp_dir.path(), "a.csv", "id,body\n1,hello\n");

        let entries = builder().count_entries(Path::new(&file));
        assert_eq!(entries.total, 0);
        assert!(entries.note.unwrap().contains("\"text\" or \"Sentence\""));
    }

    #[test]
    fn test_count_entries_missing_file() {
        let entries = builder().count_entries(Path::new("no/such/file.csv"));
        assert_eq!(entries.total, 0);
        assert_eq!(entries.note.as_deref(), Some("file not found"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(10, 10), FileState::Complete);
        assert_eq!(classify(10, 3), FileState::InProgress);
        assert_eq!(classify(10, 0), FileState::NotStarted);
        assert_eq!(classify(0, 0), FileState::NotStarted);
    }

    #[test]
    fn test_build_report() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let done = write_input(dir, "done.csv", "text\na\nb\n");
        let partial = write_input(dir, "partial.csv", "text\na\nb\nc\nd\n");
        let fresh = write_input(dir, "fresh.csv", "text\na\nb\nc\nd\ne\nf\n");

        let manifest = Manifest::new(vec![fresh, partial, done], Local::now());
        let counts = vec![count("done.csv", 5), count("partial.csv", 1)];

        let report = builder().build(&manifest, &counts);

        let order: Vec<(&str, usize, usize, FileState)> = report
            .files
            .iter()
            .map(|f| (f.filename.as_str(), f.completed_entries, f.total_entries, f.state))
            .collect();
        assert_eq!(
            order,
            vec![
                ("done.csv", 2, 2, FileState::Complete),
                ("partial.csv", 1, 4, FileState::InProgress),
                ("fresh.csv", 0, 6, FileState::NotStarted),
            ]
        );
        assert_eq!(report.files[1].percentage(), 25);

        let overall = &report.overall;
        assert_eq!(overall.total_files, 3);
        assert_eq!(overall.completed_files, 1);
        assert_eq!(overall.in_progress_files, 2);
        assert_eq!(overall.total_entries, 12);
        assert_eq!(overall.completed_entries, 3);
        assert_eq!(overall.progress_percent, 25);
        assert_eq!(overall.remaining_lines, 9);
        // 9 lines at 2 minutes each rounds up to one hour
        assert_eq!(overall.estimated_hours, 1);
    }

    #[test]
    fn test_empty_manifest_report() {
        let manifest = Manifest::new(Vec::new(), Local::now());
        let report = builder().build(&manifest, &[]);

        assert!(report.files.is_empty());
        assert_eq!(report.overall.progress_percent, 0);
        assert_eq!(report.overall.estimated_hours, 0);
    }
}
