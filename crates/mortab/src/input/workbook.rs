//! In-memory workbook model.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Raw value held by a spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Integer or floating-point number.
    Number(f64),
    /// Text, including spreadsheet error codes such as `#N/A`.
    Text(String),
    /// Date or date-time.
    Date(NaiveDateTime),
    /// Boolean.
    Bool(bool),
}

impl CellValue {
    /// Whether the cell carries no usable content.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value as plain text for header cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

/// A single cell: cached value plus optional formula source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub formula: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self { value, formula: None }
    }
}

/// One worksheet as a dense grid of cells anchored at A1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name, unique within its workbook.
    pub name: String,
    /// Row-major grid; `rows[0]` is spreadsheet row 1.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from plain values, row 1 first.
    pub fn from_values(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::new).collect())
                .collect(),
        }
    }

    /// Get a cell by 1-indexed row and column.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row == 0 || column == 0 {
            return None;
        }
        self.rows.get(row - 1).and_then(|r| r.get(column - 1))
    }

    /// Set a cell by 1-indexed row and column, growing the grid as needed.
    pub fn set_cell(&mut self, row: usize, column: usize, cell: Cell) {
        if row == 0 || column == 0 {
            return;
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let target = &mut self.rows[row - 1];
        if target.len() < column {
            target.resize_with(column, Cell::default);
        }
        target[column - 1] = cell;
    }

    /// Highest populated row number (1-indexed), 0 for an empty sheet.
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn max_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Used range in A1 notation, e.g. `A1:D120`.
    pub fn dimension(&self) -> String {
        let (rows, cols) = (self.max_row().max(1), self.max_column().max(1));
        format!("A1:{}{}", column_letter(cols), rows)
    }

    /// Iterate formula cells as (row, column, cell), 1-indexed.
    pub fn formula_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.formula.is_some())
                .map(move |(c, cell)| (r + 1, c + 1, cell))
        })
    }
}

/// An opened workbook restricted to the selected sheets.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Selected sheets in file order.
    pub sheets: Vec<Sheet>,
    /// Every sheet name in the container, in file order.
    pub available_sheets: Vec<String>,
    /// Whether a non-empty name filter matched nothing and was ignored.
    pub filter_fallback: bool,
}

impl Workbook {
    /// Build a workbook directly from sheets (all selected).
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        let available_sheets = sheets.iter().map(|s| s.name.clone()).collect();
        Self {
            sheets,
            available_sheets,
            filter_fallback: false,
        }
    }
}

/// Convert a 1-indexed column number to its letter form (1 → A, 28 → AB).
pub fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style coordinate for a 1-indexed cell position.
pub fn coordinate(row: usize, column: usize) -> String {
    format!("{}{}", column_letter(column), row)
}

/// Convert an Excel 1900-system serial number to a date-time.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Serials below 60 precede the phantom 1900-02-29.
    let adjusted = if serial < 60.0 { serial + 1.0 } else { serial };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (adjusted * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(28), "AB");
        assert_eq!(coordinate(3, 2), "B3");
    }

    #[test]
    fn test_excel_serial_conversion() {
        let dt = excel_serial_to_datetime(45_292.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let dt = excel_serial_to_datetime(1.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());

        assert!(excel_serial_to_datetime(-1.0).is_none());
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
    }

    #[test]
    fn test_sheet_addressing_is_one_indexed() {
        let mut sheet = Sheet::new("A");
        sheet.set_cell(2, 3, Cell::new(CellValue::Number(7.0)));

        assert_eq!(sheet.max_row(), 2);
        assert_eq!(sheet.max_column(), 3);
        assert_eq!(sheet.cell(2, 3).unwrap().value, CellValue::Number(7.0));
        assert!(sheet.cell(0, 1).is_none());
        assert_eq!(sheet.dimension(), "A1:C2");
    }

    #[test]
    fn test_empty_detection() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::Text("   ".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::Bool(false).is_empty());
    }

    #[test]
    fn test_header_text_rendering() {
        assert_eq!(CellValue::Number(2024.0).as_text().unwrap(), "2024");
        assert_eq!(CellValue::Number(1.5).as_text().unwrap(), "1.5");
        assert!(CellValue::Empty.as_text().is_none());
    }
}
