use crate::config::TranslationsConfig;
use crate::error::{Result, TransManifestError};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Workbook,
    Csv,
}

impl TableFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Workbook),
            "csv" => Ok(TableFormat::Csv),
            _ => Err(TransManifestError::UnsupportedTable {
                path: path.display().to_string(),
            }),
        }
    }
}

/// One cell of the path column, tagged with its 1-based row in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCell {
    pub row: usize,
    pub value: Option<String>,
}

/// Reads the configured path column from the translations table.
pub fn read_path_column(config: &TranslationsConfig) -> Result<Vec<PathCell>> {
    let path = config.workbook.as_path();

    if !path.exists() {
        return Err(TransManifestError::InputFileNotFound {
            path: path.display().to_string(),
        });
    }

    let cells = match TableFormat::detect(path)? {
        TableFormat::Workbook => read_workbook_column(path, &config.sheet, config.path_column)?,
        TableFormat::Csv => read_csv_column(path, config.path_column)?,
    };

    let cells: Vec<PathCell> = cells
        .into_iter()
        .filter(|cell| cell.row > config.skip_rows)
        .collect();

    tracing::debug!(
        rows = cells.len(),
        path = %path.display(),
        "Read translation rows"
    );

    Ok(cells)
}

/// Row and column positions are absolute sheet positions counted from A1,
/// even when calamine trims leading empty rows or columns from the range.
fn read_workbook_column(path: &Path, sheet: &str, column: usize) -> Result<Vec<PathCell>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TransManifestError::Workbook {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet) {
        return Err(TransManifestError::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.display().to_string(),
            available: sheet_names,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| TransManifestError::Workbook {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let Some((start_row, start_col)) = range.start() else {
        return Ok(Vec::new());
    };
    let offset = column.checked_sub(start_col as usize);

    let cells = range
        .rows()
        .enumerate()
        .map(|(index, row)| PathCell {
            row: start_row as usize + index + 1,
            value: offset.and_then(|offset| row.get(offset)).and_then(cell_text),
        })
        .collect();

    Ok(cells)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn read_csv_column(path: &Path, column: usize) -> Result<Vec<PathCell>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut cells = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        cells.push(PathCell {
            row: index + 1,
            value: record
                .get(column)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        });
    }

    Ok(cells)
}
