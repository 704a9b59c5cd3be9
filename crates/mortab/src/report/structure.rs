//! Workbook structure overview and formula census.

use serde::{Deserialize, Serialize};

use crate::inference::sheet_type;
use crate::input::{coordinate, CellValue, Sheet, Workbook};
use crate::schema::SheetType;

/// One formula cell with its cached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaEntry {
    pub sheet: String,
    /// A1 reference.
    pub cell: String,
    pub formula: String,
    pub cached_value: CellValue,
}

/// Shape of one scanned sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetOverview {
    pub name: String,
    pub sheet_type: SheetType,
    pub max_row: usize,
    pub max_column: usize,
    /// Used range in A1 notation.
    pub dimension: String,
    pub formula_count: usize,
}

impl SheetOverview {
    pub fn of(sheet: &Sheet, formula_count: usize) -> Self {
        Self {
            name: sheet.name.clone(),
            sheet_type: sheet_type(&sheet.name),
            max_row: sheet.max_row(),
            max_column: sheet.max_column(),
            dimension: sheet.dimension(),
            formula_count,
        }
    }
}

/// Structural summary of the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStructure {
    /// Every sheet in the container, in file order.
    pub sheet_names: Vec<String>,
    pub sheet_count: usize,
    /// Sheets actually scanned after name filtering.
    pub scanned_sheets: Vec<SheetOverview>,
    /// Sum of `max_row` over scanned sheets.
    pub total_rows: usize,
    /// Zero when the census is disabled.
    pub formula_count: usize,
    pub formulas: Vec<FormulaEntry>,
}

impl FileStructure {
    /// Describe a workbook, recording formulas only when `census` is set.
    pub fn survey(workbook: &Workbook, census: bool) -> Self {
        let mut formulas = Vec::new();
        let mut scanned_sheets = Vec::with_capacity(workbook.sheets.len());

        for sheet in &workbook.sheets {
            let before = formulas.len();
            if census {
                formulas.extend(formula_census(sheet));
            }
            scanned_sheets.push(SheetOverview::of(sheet, formulas.len() - before));
        }

        Self {
            sheet_names: workbook.available_sheets.clone(),
            sheet_count: workbook.available_sheets.len(),
            total_rows: scanned_sheets.iter().map(|s| s.max_row).sum(),
            formula_count: formulas.len(),
            scanned_sheets,
            formulas,
        }
    }
}

/// Every formula cell of a sheet in row-major order.
pub fn formula_census(sheet: &Sheet) -> Vec<FormulaEntry> {
    sheet
        .formula_cells()
        .filter_map(|(row, column, cell)| {
            cell.formula.as_ref().map(|formula| FormulaEntry {
                sheet: sheet.name.clone(),
                cell: coordinate(row, column),
                formula: formula.clone(),
                cached_value: cell.value.clone(),
            })
        })
        .collect()
}
