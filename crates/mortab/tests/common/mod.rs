//! Minimal `.xlsx` writer for integration tests.
//!
//! Produces just enough OOXML for a spreadsheet reader: content types, the
//! package and workbook relationships, the workbook part, a stylesheet with
//! one date format, and one worksheet per sheet with inline strings, numbers,
//! dates, booleans, and formulas.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A cell to write.
#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    Num(f64),
    Str(String),
    Bool(bool),
    /// Date serial shown with the built-in short date format.
    Date(f64),
    /// Formula source with its cached numeric result.
    Formula(String, f64),
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Build a row from heterogeneous literals.
#[macro_export]
macro_rules! row {
    ($($v:expr),* $(,)?) => {
        vec![$($crate::common::Value::from($v)),*]
    };
}

/// One sheet: a name and its rows, row 1 first.
pub struct SheetSpec {
    pub name: String,
    pub rows: Vec<Vec<Value>>,
}

impl SheetSpec {
    pub fn new(name: &str, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }
}

/// A workbook written into its own temporary directory.
pub struct TestWorkbook {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestWorkbook {
    pub fn new(sheets: &[SheetSpec]) -> Self {
        Self::build(sheets, false)
    }

    /// A workbook using the Mac 1904 date system.
    pub fn new_1904(sheets: &[SheetSpec]) -> Self {
        Self::build(sheets, true)
    }

    fn build(sheets: &[SheetSpec], date1904: bool) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("workbook.xlsx");
        write_xlsx(&path, sheets, date1904);
        Self { _dir: dir, path }
    }
}

/// Write sheets as an `.xlsx` file.
pub fn write_xlsx(path: &Path, sheets: &[SheetSpec], date1904: bool) {
    let file = File::create(path).expect("Failed to create workbook file");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut put = |name: &str, body: String| {
        zip.start_file(name, options).expect("Failed to start zip entry");
        zip.write_all(body.as_bytes()).expect("Failed to write zip entry");
    };

    put("[Content_Types].xml", content_types(sheets.len()));
    put("_rels/.rels", PACKAGE_RELS.to_string());
    put("xl/workbook.xml", workbook_xml(sheets, date1904));
    put("xl/_rels/workbook.xml.rels", workbook_rels(sheets.len()));
    put("xl/styles.xml", STYLES.to_string());
    for (i, sheet) in sheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", i + 1), worksheet_xml(sheet));
    }

    zip.finish().expect("Failed to finish workbook");
}

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Style 0 is General, style 1 is built-in format 14 (short date).
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font/></fonts><fills count="1"><fill/></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

fn content_types(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{}</Types>"#,
        overrides
    )
}

fn workbook_xml(sheets: &[SheetSpec], date1904: bool) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(&sheet.name),
                i + 1,
                i + 1
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr date1904="{}"/><sheets>{}</sheets></workbook>"#,
        u8::from(date1904),
        entries
    )
}

fn workbook_rels(sheet_count: usize) -> String {
    let entries: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i, i
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
        entries
    )
}

fn worksheet_xml(sheet: &SheetSpec) -> String {
    let mut body = String::new();

    for (r, row) in sheet.rows.iter().enumerate() {
        body.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c + 1), r + 1);
            match value {
                Value::Empty => {}
                Value::Num(n) => {
                    body.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n));
                }
                Value::Str(s) => body.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(s)
                )),
                Value::Date(serial) => {
                    body.push_str(&format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, serial));
                }
                Value::Bool(b) => body.push_str(&format!(
                    r#"<c r="{}" t="b"><v>{}</v></c>"#,
                    reference,
                    u8::from(*b)
                )),
                Value::Formula(f, cached) => body.push_str(&format!(
                    r#"<c r="{}"><f>{}</f><v>{}</v></c>"#,
                    reference,
                    escape(f),
                    cached
                )),
            }
        }
        body.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        body
    )
}

fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
