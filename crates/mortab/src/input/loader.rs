//! Workbook loader backed by calamine.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::SourceMetadata;
use super::workbook::{Cell, CellValue, Sheet, Workbook};
use crate::error::{MortabError, Result};
use crate::text::fold;

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Case-insensitive sheet-name substrings (empty = all sheets).
    pub sheet_name_filters: Vec<String>,
    /// Whether to read formula source text alongside cached values.
    pub read_formulas: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheet_name_filters: Vec::new(),
            read_formulas: true,
        }
    }
}

/// Opens spreadsheet containers into [`Workbook`]s.
pub struct WorkbookLoader {
    config: LoaderConfig,
}

impl WorkbookLoader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Open a workbook file and return the selected sheets and file metadata.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Workbook, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| MortabError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| MortabError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let workbook = self.load_bytes(contents, path)?;
        let source = SourceMetadata::new(path.to_path_buf(), hash, size_bytes);

        Ok((workbook, source))
    }

    /// Open a workbook from in-memory bytes; `path` is used for error messages.
    fn load_bytes(&self, contents: Vec<u8>, path: &Path) -> Result<Workbook> {
        let workbook_error = |message: String| MortabError::Workbook {
            path: path.to_path_buf(),
            message,
        };

        let mut container = open_workbook_auto_from_rs(Cursor::new(contents))
            .map_err(|e| workbook_error(format!("not a readable spreadsheet: {}", e)))?;

        let available_sheets = container.sheet_names();
        let (selected, filter_fallback) =
            select_sheets(&available_sheets, &self.config.sheet_name_filters);

        let mut sheets = Vec::with_capacity(selected.len());
        for name in selected {
            let values = container
                .worksheet_range(&name)
                .map_err(|e| workbook_error(format!("failed to read sheet '{}': {}", name, e)))?;

            // Sheets without formula XML (or formats lacking it) just have none.
            let formulas = if self.config.read_formulas {
                container.worksheet_formula(&name).ok()
            } else {
                None
            };

            let sheet = build_sheet(&name, &values, formulas.as_ref());
            debug!(
                sheet = %sheet.name,
                rows = sheet.max_row(),
                columns = sheet.max_column(),
                "loaded sheet"
            );
            sheets.push(sheet);
        }

        Ok(Workbook {
            sheets,
            available_sheets,
            filter_fallback,
        })
    }
}

impl Default for WorkbookLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply case-insensitive substring filters to sheet names.
///
/// Returns the selected names in file order and whether a non-empty filter
/// list matched nothing (in which case every sheet is selected).
pub fn select_sheets(names: &[String], filters: &[String]) -> (Vec<String>, bool) {
    let filters: Vec<String> = filters
        .iter()
        .map(|f| fold(f))
        .filter(|f| !f.is_empty())
        .collect();

    if filters.is_empty() {
        return (names.to_vec(), false);
    }

    let matched: Vec<String> = names
        .iter()
        .filter(|name| {
            let folded = fold(name);
            filters.iter().any(|f| folded.contains(f.as_str()))
        })
        .cloned()
        .collect();

    if matched.is_empty() {
        (names.to_vec(), true)
    } else {
        (matched, false)
    }
}

/// Lay calamine's ranges onto an A1-anchored grid.
fn build_sheet(name: &str, values: &Range<Data>, formulas: Option<&Range<String>>) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let Some((row0, col0)) = values.start() {
        for (r, c, data) in values.used_cells() {
            let value = convert_data(data);
            if value.is_empty() {
                continue;
            }
            let (row, col) = (row0 as usize + r + 1, col0 as usize + c + 1);
            sheet.set_cell(row, col, Cell::new(value));
        }
    }

    if let Some(formulas) = formulas {
        if let Some((row0, col0)) = formulas.start() {
            for (r, c, formula) in formulas.used_cells() {
                let (row, col) = (row0 as usize + r + 1, col0 as usize + c + 1);
                let value = sheet
                    .cell(row, col)
                    .map(|cell| cell.value.clone())
                    .unwrap_or_default();
                sheet.set_cell(
                    row,
                    col,
                    Cell {
                        value,
                        formula: Some(formula.clone()),
                    },
                );
            }
        }
    }

    sheet
}

/// Map a calamine cell onto the workbook's value variant.
fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // calamine applies the workbook's 1900/1904 epoch.
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
