//! Excel sheet ingestion.
//!
//! Every cell enters the pipeline as text or null; type coercion is a
//! normalization concern, applied per field after column reconciliation.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use crate::error::{IngestError, Result};
use crate::polars_utils::format_numeric;

/// Reads one sheet of a workbook into an all-text data frame.
///
/// The first row is taken as the header row. Header spellings are kept
/// verbatim apart from whitespace normalization; reconciliation decides
/// what they mean. Columns with a blank header are skipped, and repeated
/// header names get a positional suffix (`Causa`, `Causa.1`, ...).
pub fn read_sheet(path: &Path, sheet: &str) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| IngestError::SheetRead {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            source: e,
        })?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let headers = dedupe_headers(
        header_row
            .iter()
            .map(|cell| normalize_header(&cell_to_string(cell).unwrap_or_default()))
            .collect(),
    );

    let data_rows: Vec<&[Data]> = rows.collect();
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        let values: Vec<Option<String>> = data_rows
            .iter()
            .map(|row| row.get(col_idx).and_then(cell_to_string))
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into());
    }

    DataFrame::new(columns).map_err(|e| IngestError::Frame {
        sheet: sheet.to_string(),
        source: e,
    })
}

/// Converts one spreadsheet cell to text; empty, blank, and error cells
/// become null.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_numeric(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_numeric(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::BTreeMap<String, usize> = std::collections::BTreeMap::new();
    headers
        .into_iter()
        .map(|header| {
            if header.is_empty() {
                return header;
            }
            let count = seen.entry(header.clone()).or_insert(0);
            let name = if *count == 0 {
                header.clone()
            } else {
                format!("{header}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_conversion_nulls_empty_and_error_cells() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String("  ".into())), None);
        assert_eq!(cell_to_string(&Data::String(" x ".into())), Some("x".into()));
        assert_eq!(cell_to_string(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_to_string(&Data::Float(150.0)), Some("150".into()));
        assert_eq!(cell_to_string(&Data::Float(12.5)), Some("12.5".into()));
    }

    #[test]
    fn header_normalization_collapses_whitespace() {
        assert_eq!(normalize_header("  Código  de   Equipo "), "Código de Equipo");
        assert_eq!(normalize_header("\u{feff}Causa"), "Causa");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn duplicate_headers_get_positional_suffixes() {
        let deduped = dedupe_headers(vec![
            "Causa".to_string(),
            "Causa".to_string(),
            "Causa".to_string(),
            "Observaciones".to_string(),
        ]);
        assert_eq!(deduped, vec!["Causa", "Causa.1", "Causa.2", "Observaciones"]);
    }
}
