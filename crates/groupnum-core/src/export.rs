//! Grid export to spreadsheet files.
//!
//! Every format carries the same cells as text; only the container differs.
//! `.xls` is written as an Excel 2003 XML Spreadsheet, which Excel and
//! LibreOffice open directly.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::Grid;
use crate::error::{GroupnumError, Result};

pub const DEFAULT_FILE_NAME: &str = "export";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Excel's sheet name limit
const MAX_SHEET_NAME_LEN: usize = 31;
const ILLEGAL_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const PATH_SEPARATORS: &[char] = &['/', '\\', '\0'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Xls,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Xls];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Xls => "xls",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = GroupnumError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == lower)
            .ok_or_else(|| GroupnumError::InvalidExportFormat {
                value: s.to_string(),
            })
    }
}

/// `{name}.{ext}`, falling back to `export` when no usable name is given.
///
/// Path separators and leading dots are dropped, so the file always lands
/// directly inside the export directory.
pub fn export_file_name(name: Option<&str>, format: ExportFormat) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .filter(|c| !PATH_SEPARATORS.contains(c))
        .collect();
    let stem = cleaned.trim().trim_start_matches('.').trim();
    let stem = if stem.is_empty() { DEFAULT_FILE_NAME } else { stem };
    format!("{}.{}", stem, format.extension())
}

/// Sheet name derived from the user's file name, made acceptable to Excel.
pub fn sheet_name(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .filter(|c| !ILLEGAL_SHEET_CHARS.contains(c))
        .collect();
    let cleaned: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if cleaned.trim().is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

/// Write `grid` into `dir` as `{name}.{ext}` and return the file path.
pub fn export_grid(
    grid: &Grid,
    dir: &Path,
    name: Option<&str>,
    format: ExportFormat,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(name, format));
    write_grid(grid, &path, format, &sheet_name(name))?;
    Ok(path)
}

/// Write `grid` to exactly `path`.
pub fn write_grid(grid: &Grid, path: &Path, format: ExportFormat, sheet: &str) -> Result<()> {
    match format {
        ExportFormat::Xlsx => write_xlsx(grid, path, sheet)?,
        ExportFormat::Csv => write_csv(grid, path)?,
        ExportFormat::Xls => write_spreadsheet_ml(grid, path, sheet)?,
    }

    debug!(
        path = %path.display(),
        format = %format,
        rows = grid.len(),
        "exported grid"
    );
    Ok(())
}

fn write_xlsx(grid: &Grid, path: &Path, sheet: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet)
        .map_err(|e| export_error(path, e))?;

    for (r, row) in grid.iter().enumerate() {
        let r = u32::try_from(r).map_err(|e| export_error(path, e))?;
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let c = u16::try_from(c).map_err(|e| export_error(path, e))?;
            worksheet
                .write_string(r, c, cell.as_str())
                .map_err(|e| export_error(path, e))?;
        }
    }

    workbook.save(path).map_err(|e| export_error(path, e))
}

fn write_csv(grid: &Grid, path: &Path) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| export_error(path, e))?;

    for row in grid {
        wtr.write_record(row).map_err(|e| export_error(path, e))?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_spreadsheet_ml(grid: &Grid, path: &Path, sheet: &str) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_spreadsheet_ml_to(grid, sheet, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Excel 2003 XML Spreadsheet body.
fn write_spreadsheet_ml_to<W: Write>(grid: &Grid, sheet: &str, out: &mut W) -> std::io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<?mso-application progid="Excel.Sheet"?>"#)?;
    writeln!(
        out,
        r#"<Workbook xmlns="urn:schemas-microsoft-com:office:spreadsheet" xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet">"#
    )?;
    writeln!(out, r#" <Worksheet ss:Name="{}">"#, escape_xml(sheet))?;
    writeln!(out, "  <Table>")?;

    for row in grid {
        writeln!(out, "   <Row>")?;
        for cell in row {
            if cell.is_empty() {
                writeln!(out, "    <Cell/>")?;
            } else {
                writeln!(
                    out,
                    r#"    <Cell><Data ss:Type="String">{}</Data></Cell>"#,
                    escape_xml(cell)
                )?;
            }
        }
        writeln!(out, "   </Row>")?;
    }

    writeln!(out, "  </Table>")?;
    writeln!(out, " </Worksheet>")?;
    writeln!(out, "</Workbook>")?;
    Ok(())
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn export_error(path: &Path, err: impl fmt::Display) -> GroupnumError {
    GroupnumError::Export {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
