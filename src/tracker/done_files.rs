use crate::config::{DoneFilesConfig, TranslationsConfig};
use crate::error::{Result, TransManifestError};
use crate::persist::write_atomic;
use crate::tracker::table::PathCell;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of translation rows recorded against one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCount {
    pub filename: String,
    pub count: usize,
}

/// Outcome of one done-file extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct DoneFilesReport {
    pub source: PathBuf,
    pub rows: usize,
    pub threshold: usize,
    pub counts: Vec<FileCount>,
    pub done_files: Vec<String>,
    pub output_file: PathBuf,
    pub written: bool,
}

pub struct DoneFileExtractor {
    prefix: String,
    column: usize,
    threshold: usize,
}

impl DoneFileExtractor {
    pub fn new(translations: &TranslationsConfig, done_files: &DoneFilesConfig) -> Self {
        Self {
            prefix: translations.path_prefix.clone(),
            column: translations.path_column,
            threshold: done_files.threshold,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Strips the directory token, leaving the bare input filename.
    pub fn normalize(&self, cell: &PathCell) -> Result<String> {
        let value = cell
            .value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(TransManifestError::MissingPathValue {
                row: cell.row,
                column: self.column,
            })?;

        value
            .strip_prefix(&self.prefix)
            .map(str::to_string)
            .ok_or_else(|| TransManifestError::UnexpectedPrefix {
                row: cell.row,
                value: value.to_string(),
                prefix: self.prefix.clone(),
            })
    }

    /// Counts rows per filename, most frequent first. Equal counts keep the
    /// order in which the filenames first appeared.
    pub fn count(&self, cells: &[PathCell]) -> Result<Vec<FileCount>> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<FileCount> = Vec::new();

        for cell in cells {
            let filename = self.normalize(cell)?;
            match positions.get(&filename) {
                Some(&index) => counts[index].count += 1,
                None => {
                    positions.insert(filename.clone(), counts.len());
                    counts.push(FileCount { filename, count: 1 });
                }
            }
        }

        // sort_by is stable
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    pub fn select_done(&self, counts: &[FileCount]) -> DoneList {
        counts
            .iter()
            .filter(|c| c.count >= self.threshold)
            .map(|c| c.filename.clone())
            .collect()
    }
}

/// Filenames judged finished, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoneList {
    names: Vec<String>,
    lookup: HashSet<String>,
}

impl DoneList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        if self.lookup.insert(name.clone()) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Loads a newline-delimited list. A missing file is an empty list.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No done-file list, nothing excluded");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_atomic(path, self.render().as_bytes())
    }
}

impl<S: Into<String>> FromIterator<S> for DoneList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = DoneList::new();
        for name in iter {
            list.push(name);
        }
        list
    }
}
