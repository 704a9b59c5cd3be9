//! Workbook loading and tabular extraction.

mod loader;
mod source;
mod table;
mod workbook;

pub use loader::{select_sheets, LoaderConfig, WorkbookLoader};
pub use source::SourceMetadata;
pub use table::ExtractedTable;
pub use workbook::{
    column_letter, coordinate, excel_serial_to_datetime, Cell, CellValue, Sheet, Workbook,
};
