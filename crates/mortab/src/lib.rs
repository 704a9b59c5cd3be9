//! Mortab: statistical extraction for demographic and mortality workbooks.
//!
//! Mortab opens a spreadsheet whose layout was written by people rather than
//! programs, decides what each sheet is about from its name, works out which
//! columns hold ages, sexes, dates, salaries, or mortality rates from their
//! headers, and produces one consolidated JSON report with a validation
//! ledger.
//!
//! # Core Principles
//!
//! - **Heuristics as data**: classification and column-role rules are
//!   ordered keyword tables, not code
//! - **Visible data loss**: every distribution reports how many values were
//!   coerced and why the rest were dropped
//! - **Sheet isolation**: a failure in one sheet is recorded in the report
//!   and never aborts the run
//!
//! # Example
//!
//! ```no_run
//! use mortab::{AnalysisConfig, Mortab};
//!
//! let config = AnalysisConfig::from_json(r#"{"sheet_name_filters": ["massa", "obito"]}"#)?;
//! let report = Mortab::with_config(config).analyze("base.xlsx")?;
//!
//! println!("Roster analyzed: {}", report.statistics.summary.roster_analyzed);
//! println!("Warnings: {}", report.validation.warnings().len());
//! # Ok::<(), mortab::MortabError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod report;
pub mod schema;
pub mod text;
pub mod validation;

mod engine;

pub use config::{AnalysisConfig, QuantileMethod};
pub use engine::Mortab;
pub use error::{MortabError, Result};
pub use input::{CellValue, SourceMetadata, Workbook, WorkbookLoader};
pub use report::{ErrorReport, Report};
pub use schema::{ColumnRole, SheetType};
pub use validation::ValidationLedger;
