//! Row-oriented extraction of a sheet's data area.

use indexmap::IndexMap;

use super::workbook::{CellValue, Sheet};

/// Rows of a sheet keyed by header text.
///
/// Row 1 supplies the keys; every later row with at least one non-empty
/// cell becomes a record, in sheet order. Values are passed through as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    /// Column keys, one per sheet column.
    pub headers: Vec<String>,
    /// Data rows aligned with `headers`.
    pub rows: Vec<Vec<CellValue>>,
}

impl ExtractedTable {
    /// Extract the header row and non-empty data rows of a sheet.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let width = sheet.max_column();
        let headers = header_row(sheet, width);

        let rows = sheet
            .rows
            .iter()
            .skip(1)
            .filter(|row| row.iter().any(|cell| !cell.value.is_empty()))
            .map(|row| {
                (0..width)
                    .map(|c| row.get(c).map(|cell| cell.value.clone()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// All values of a column by header text.
    pub fn column(&self, header: &str) -> Option<Vec<&CellValue>> {
        let index = self.column_index(header)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// One row as a header → value map.
    pub fn record(&self, row: usize) -> Option<IndexMap<String, CellValue>> {
        let values = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect(),
        )
    }

    /// The first `n` records.
    pub fn head(&self, n: usize) -> Vec<IndexMap<String, CellValue>> {
        (0..n.min(self.rows.len()))
            .filter_map(|i| self.record(i))
            .collect()
    }

    /// Count rows with a non-empty value in every one of the given columns.
    ///
    /// With no columns every row counts as complete.
    pub fn complete_rows(&self, headers: &[&str]) -> usize {
        let indices: Vec<usize> = headers
            .iter()
            .filter_map(|h| self.column_index(h))
            .collect();

        self.rows
            .iter()
            .filter(|row| indices.iter().all(|&i| !row[i].is_empty()))
            .count()
    }
}

/// Trimmed header texts with positional placeholders and unique keys.
fn header_row(sheet: &Sheet, width: usize) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(width);

    for column in 1..=width {
        let text = sheet
            .cell(1, column)
            .and_then(|cell| cell.value.as_text())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("col_{}", column));

        let mut key = text.clone();
        let mut n = 1;
        while headers.contains(&key) {
            key = format!("{}.{}", text, n);
            n += 1;
        }
        headers.push(key);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    #[test]
    fn test_extract_skips_empty_rows() {
        let sheet = Sheet::from_values(
            "Massa",
            vec![
                vec![text("IDADE"), text("SEXO")],
                vec![num(45.0), text("M")],
                vec![CellValue::Empty, text("  ")],
                vec![num(70.0), text("F")],
            ],
        );

        let table = ExtractedTable::from_sheet(&sheet);
        assert_eq!(table.headers, vec!["IDADE", "SEXO"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("IDADE").unwrap(), vec![&num(45.0), &num(70.0)]);
    }

    #[test]
    fn test_blank_headers_get_placeholders() {
        let sheet = Sheet::from_values(
            "S",
            vec![
                vec![text(" Nome "), CellValue::Empty, text("Idade")],
                vec![text("Ana"), num(1.0), num(30.0)],
            ],
        );

        let table = ExtractedTable::from_sheet(&sheet);
        assert_eq!(table.headers, vec!["Nome", "col_2", "Idade"]);
    }

    #[test]
    fn test_duplicate_headers_stay_addressable() {
        let sheet = Sheet::from_values(
            "S",
            vec![vec![text("Valor"), text("Valor")], vec![num(1.0), num(2.0)]],
        );

        let table = ExtractedTable::from_sheet(&sheet);
        assert_eq!(table.headers, vec!["Valor", "Valor.1"]);
        assert_eq!(table.column("Valor.1").unwrap(), vec![&num(2.0)]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let sheet = Sheet::from_values(
            "S",
            vec![vec![text("A"), text("B")], vec![num(1.0)]],
        );

        let table = ExtractedTable::from_sheet(&sheet);
        let record = table.record(0).unwrap();
        assert_eq!(record["A"], num(1.0));
        assert_eq!(record["B"], CellValue::Empty);
    }

    #[test]
    fn test_complete_rows() {
        let sheet = Sheet::from_values(
            "S",
            vec![
                vec![text("A"), text("B")],
                vec![num(1.0), num(2.0)],
                vec![num(1.0), CellValue::Empty],
            ],
        );

        let table = ExtractedTable::from_sheet(&sheet);
        assert_eq!(table.complete_rows(&["A", "B"]), 1);
        assert_eq!(table.complete_rows(&["A"]), 2);
        assert_eq!(table.complete_rows(&[]), 2);
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let sheet = Sheet::from_values("S", vec![vec![text("A")]]);
        let table = ExtractedTable::from_sheet(&sheet);
        assert!(table.is_empty());
        assert!(table.head(5).is_empty());
    }
}
