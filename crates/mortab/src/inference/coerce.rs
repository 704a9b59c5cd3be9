//! Per-value coercion with explicit drop reasons.
//!
//! Every coercion is a two-outcome function: the typed value, or the reason
//! it was dropped. Analyzers tally both so data loss stays visible.

use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::input::{excel_serial_to_datetime, CellValue};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// Digits with optional `.`/`,` grouping or decimal separators.
static LOCALE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d[\d.,]*|[.,]\d+)$").unwrap());

static SCIENTIFIC_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?[eE][+-]?\d+$").unwrap());

/// Date layouts accepted in text cells, day-first before month-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];

/// Why a raw value did not survive coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The cell was empty.
    Empty,
    /// Not interpretable as a number.
    NotNumeric,
    /// Not interpretable as a calendar date.
    NotDate,
    /// A boolean where a number or date was expected.
    Boolean,
    /// Numeric but outside the configured plausible range.
    OutOfRange,
}

/// Outcome of coercing one value.
pub type Coercion<T> = std::result::Result<T, DropReason>;

/// Tally of coerced and dropped values for one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoercionSummary {
    /// Values seen.
    pub total: usize,
    /// Values that coerced successfully.
    pub coerced: usize,
    /// Values dropped.
    pub dropped: usize,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub dropped_by_reason: IndexMap<DropReason, usize>,
}

impl CoercionSummary {
    /// Record one outcome.
    pub fn record<T>(&mut self, outcome: &Coercion<T>) {
        self.total += 1;
        match outcome {
            Ok(_) => self.coerced += 1,
            Err(reason) => self.drop_value(*reason),
        }
    }

    /// Move one already-coerced value to the dropped side.
    pub fn reject(&mut self, reason: DropReason) {
        self.coerced = self.coerced.saturating_sub(1);
        self.drop_value(reason);
    }

    fn drop_value(&mut self, reason: DropReason) {
        self.dropped += 1;
        *self.dropped_by_reason.entry(reason).or_insert(0) += 1;
    }
}

/// Coerce a whole series, keeping survivors in order.
pub fn coerce_series<T, F>(values: &[&CellValue], coerce: F) -> (Vec<T>, CoercionSummary)
where
    F: Fn(&CellValue) -> Coercion<T>,
{
    let mut summary = CoercionSummary::default();
    let mut kept = Vec::with_capacity(values.len());

    for value in values {
        let outcome = coerce(value);
        summary.record(&outcome);
        if let Ok(v) = outcome {
            kept.push(v);
        }
    }

    (kept, summary)
}

/// Coerce to a finite number.
pub fn to_number(value: &CellValue) -> Coercion<f64> {
    match value {
        CellValue::Empty => Err(DropReason::Empty),
        CellValue::Number(n) if n.is_finite() => Ok(*n),
        CellValue::Number(_) => Err(DropReason::NotNumeric),
        CellValue::Text(s) if s.trim().is_empty() => Err(DropReason::Empty),
        CellValue::Text(s) => parse_locale_number(s).ok_or(DropReason::NotNumeric),
        CellValue::Date(_) => Err(DropReason::NotNumeric),
        CellValue::Bool(_) => Err(DropReason::Boolean),
    }
}

/// Coerce to a calendar date.
///
/// Numbers are read as Excel serial dates; text accepts ISO and day-first
/// layouts with an optional time part.
pub fn to_date(value: &CellValue) -> Coercion<NaiveDate> {
    match value {
        CellValue::Empty => Err(DropReason::Empty),
        CellValue::Date(dt) => Ok(dt.date()),
        CellValue::Number(n) if *n >= 1.0 => excel_serial_to_datetime(*n)
            .map(|dt| dt.date())
            .ok_or(DropReason::NotDate),
        CellValue::Number(_) => Err(DropReason::NotDate),
        CellValue::Text(s) if s.trim().is_empty() => Err(DropReason::Empty),
        CellValue::Text(s) => parse_date_text(s).ok_or(DropReason::NotDate),
        CellValue::Bool(_) => Err(DropReason::Boolean),
    }
}

/// Coerce to an upper-cased, trimmed label.
pub fn to_label(value: &CellValue) -> Coercion<String> {
    if value.is_empty() {
        return Err(DropReason::Empty);
    }
    value
        .as_text()
        .map(|t| t.trim().to_uppercase())
        .ok_or(DropReason::Empty)
}

/// Parse a number written with either `.` or `,` as decimal separator.
///
/// With both separators present the rightmost one is the decimal point.
/// A single separator is decimal; a repeated one is digit grouping.
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != '€')
        .collect();

    if SCIENTIFIC_NUMBER.is_match(&cleaned) {
        return cleaned.parse::<f64>().ok().filter(|v| v.is_finite());
    }
    if !LOCALE_NUMBER.is_match(&cleaned) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) | (0, 1) => cleaned,
        (0, _) => cleaned.replace('.', ""),
        (1, 0) => cleaned.replace(',', "."),
        (_, 0) => cleaned.replace(',', ""),
        _ => {
            if cleaned.rfind(',') > cleaned.rfind('.') {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split([' ', 'T']).next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
