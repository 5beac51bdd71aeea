//! Workbook decoding and roster row parsing.
//!
//! Only the first sheet is read. The first row is the header; columns are
//! located by case-insensitive substring so that headers such as
//! `"Matrícula"` or `"% ETIT Mês"` still match.

use crate::errors::AppError;
use crate::evaluator::is_missing;
use crate::models::EmployeeRecord;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// A decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Cell rendered as plain text, integers without a trailing `.0`.
    fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::String(s) if s.trim().is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Decodes the first sheet of an XLSX/XLS/ODS workbook.
pub fn parse_workbook(bytes: Vec<u8>) -> Result<Vec<Vec<CellValue>>, AppError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("Workbook has no sheets".to_string()))??;

    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    tracing::debug!("Decoded first sheet: {} rows", rows.len());
    Ok(rows)
}

/// Converts a sheet cell into indicator display text.
///
/// Fractions are scaled to whole percentages (`0.873` becomes `"87%"`); text
/// already carrying `%` is kept as is.
pub fn format_sheet_value(cell: Option<&CellValue>) -> String {
    match cell {
        None | Some(CellValue::Empty) => "-".to_string(),
        Some(CellValue::Number(n)) => format_fraction(*n),
        Some(CellValue::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return "-".to_string();
            }
            if trimmed.contains('%') {
                return trimmed.to_string();
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => format_fraction(n),
                _ => trimmed.to_string(),
            }
        }
    }
}

fn format_fraction(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

#[derive(Debug, Default)]
struct ColumnIndices {
    matricula: Option<usize>,
    nome: Option<usize>,
    setor: Option<usize>,
    etit: Option<usize>,
    dpa: Option<usize>,
    assertividade: Option<usize>,
}

impl ColumnIndices {
    fn from_header(header: &[CellValue]) -> Self {
        let labels: Vec<String> = header.iter().map(|c| c.as_text().to_lowercase()).collect();
        let find = |needles: &[&str]| {
            labels
                .iter()
                .position(|label| needles.iter().any(|n| label.contains(n)))
        };

        Self {
            matricula: find(&["matricula", "matrícula"]),
            nome: find(&["nome"]),
            setor: find(&["setor"]),
            etit: find(&["etit"]),
            dpa: find(&["dpa"]),
            assertividade: find(&["assertividade", "acerto"]),
        }
    }
}

/// Parses decoded sheet rows into employee records.
///
/// Fails only when the header has no ID column. Rows without an ID are
/// skipped; missing indicator columns yield `"-"`.
pub fn parse_roster_rows(rows: &[Vec<CellValue>]) -> Result<Vec<EmployeeRecord>, AppError> {
    let header = rows
        .first()
        .ok_or_else(|| AppError::ParseError("Sheet is empty".to_string()))?;

    let cols = ColumnIndices::from_header(header);
    let id_col = cols.matricula.ok_or_else(|| {
        AppError::ParseError("Header has no 'matrícula' column".to_string())
    })?;

    for (name, idx) in [
        ("nome", cols.nome),
        ("setor", cols.setor),
        ("etit", cols.etit),
        ("dpa", cols.dpa),
        ("assertividade", cols.assertividade),
    ] {
        if idx.is_none() {
            tracing::warn!("Sheet header has no '{}' column", name);
        }
    }

    let mut records = Vec::with_capacity(rows.len().saturating_sub(1));
    let mut skipped = 0usize;

    for row in rows.iter().skip(1) {
        let id = text(row, Some(id_col));
        if is_missing(&id) {
            skipped += 1;
            continue;
        }

        records.push(EmployeeRecord::new(
            &id,
            &text(row, cols.nome),
            &text(row, cols.setor),
            format_sheet_value(cell(row, cols.etit)).as_str(),
            format_sheet_value(cell(row, cols.dpa)).as_str(),
            format_sheet_value(cell(row, cols.assertividade)).as_str(),
        ));
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} rows without matrícula", skipped);
    }
    Ok(records)
}

fn cell(row: &[CellValue], idx: Option<usize>) -> Option<&CellValue> {
    idx.and_then(|i| row.get(i))
}

fn text(row: &[CellValue], idx: Option<usize>) -> String {
    cell(row, idx).map(CellValue::as_text).unwrap_or_default()
}
