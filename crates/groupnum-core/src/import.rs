//! Spreadsheet import.
//!
//! Only the first column of the first sheet is read. Cells are rendered to
//! text, trimmed, and blank cells are dropped.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::error::{GroupnumError, Result};

/// Workbook extensions handled by the workbook reader
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];
const CSV_EXTENSION: &str = "csv";

/// Container family of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Workbook,
    Csv,
}

impl ImportFormat {
    /// Decide the format from the file extension (case-insensitive).
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Self::Workbook)
        } else if ext == CSV_EXTENSION {
            Ok(Self::Csv)
        } else {
            Err(GroupnumError::ImportFormat {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Read the value list from a spreadsheet file.
pub fn import_values(path: &Path) -> Result<Vec<String>> {
    let values = match ImportFormat::detect(path)? {
        ImportFormat::Workbook => read_workbook(path)?,
        ImportFormat::Csv => {
            let file = std::fs::File::open(path)?;
            read_csv(file).map_err(|e| parse_error(path, e))?
        }
    };

    debug!(path = %path.display(), count = values.len(), "imported values");
    Ok(values)
}

/// First-column values from CSV data without a header row.
pub fn read_csv<R: Read>(reader: R) -> std::result::Result<Vec<String>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut cells = Vec::new();
    for record in rdr.records() {
        let record = record?;
        cells.push(record.get(0).unwrap_or_default().to_string());
    }

    Ok(clean_values(cells))
}

fn read_workbook(path: &Path) -> Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| GroupnumError::Parse {
            path: path.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        })?
        .map_err(|e| parse_error(path, e))?;

    // a used range starting right of column A leaves column A blank
    if range.start().is_some_and(|(_, col)| col > 0) {
        return Ok(Vec::new());
    }

    let cells = range.rows().map(|row| row.first().map(cell_text).unwrap_or_default());
    Ok(clean_values(cells))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Trim every cell and drop the ones left empty.
pub fn clean_values<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .filter_map(|cell| {
            let trimmed = cell.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> GroupnumError {
    GroupnumError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
