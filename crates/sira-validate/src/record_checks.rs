//! Record-type-specific checks.

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, Column, DataFrame};

use sira_ingest::{any_to_datetime, any_to_f64, any_to_string, is_null_value};
use sira_model::{Finding, FindingKind, RecordType};
use sira_normalize::parse_timestamp;
use sira_schema::columns;

const EXAMPLE_LIMIT: usize = 3;

pub fn findings(df: &DataFrame, record_type: RecordType) -> Vec<Finding> {
    match record_type {
        RecordType::TransformerCenter => transformer_center_findings(df),
        RecordType::SwitchingEquipment => switching_equipment_findings(df),
        RecordType::Interruption => interruption_findings(df),
    }
}

fn transformer_center_findings(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    for name in [
        columns::KVA_INSTALLED,
        columns::CT_UTM_NORTH,
        columns::CT_UTM_WEST,
    ] {
        findings.extend(non_numeric_finding(df, name));
    }
    findings.extend(range_finding(df, columns::KVA_INSTALLED, columns::KVA_LIMIT));
    findings
}

fn switching_equipment_findings(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    findings.extend(missing_key_finding(df, columns::EQUIPMENT_CODE));
    for name in [
        columns::VOLTAGE_LEVEL,
        columns::MAX_CURRENT,
        columns::EQ_UTM_NORTH,
        columns::EQ_UTM_WEST,
    ] {
        findings.extend(non_numeric_finding(df, name));
    }
    findings.extend(range_finding(
        df,
        columns::VOLTAGE_LEVEL,
        columns::VOLTAGE_LIMIT_KV,
    ));
    findings
}

fn interruption_findings(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    for name in [
        columns::INTERRUPTION_START,
        columns::INTERRUPTION_CLOSE,
        columns::INTERRUPTION_USER_NOTICE,
    ] {
        findings.extend(invalid_date_finding(df, name));
    }
    findings.extend(temporal_findings(df));
    findings.extend(multi_code_finding(df));
    findings
}

/// Non-numeric values in a designated numeric column, with up to three
/// example offenders.
fn non_numeric_finding(df: &DataFrame, name: &str) -> Option<Finding> {
    let column = df.column(name).ok()?;
    let mut invalid = 0u64;
    let mut examples: Vec<String> = Vec::new();
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if is_null_value(&value) {
            continue;
        }
        if any_to_f64(&value).is_none() {
            invalid += 1;
            if examples.len() < EXAMPLE_LIMIT {
                examples.push(any_to_string(value));
            }
        }
    }
    if invalid == 0 {
        return None;
    }
    let mut message = format!("'{name}' has {invalid} non-numeric value(s)");
    if !examples.is_empty() {
        message.push_str(&format!(" examples: {}", examples.join(", ")));
    }
    Some(
        Finding::warning(FindingKind::NonNumeric, message)
            .with_column(name)
            .with_count(invalid),
    )
}

/// Values past the destination's declared precision. Flagged only; the
/// values are loaded unmodified.
fn range_finding(df: &DataFrame, name: &str, limit: f64) -> Option<Finding> {
    let column = df.column(name).ok()?;
    let mut oversized = 0u64;
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if let Some(number) = any_to_f64(&value)
            && number > limit
        {
            oversized += 1;
        }
    }
    if oversized == 0 {
        return None;
    }
    Some(
        Finding::warning(
            FindingKind::RangeExceeded,
            format!("'{name}' has {oversized} value(s) above {limit}; values pass through unmodified"),
        )
        .with_column(name)
        .with_count(oversized),
    )
}

/// Null values in a column that feeds the destination's key.
fn missing_key_finding(df: &DataFrame, name: &str) -> Option<Finding> {
    let column = df.column(name).ok()?;
    let mut missing = 0u64;
    for idx in 0..df.height() {
        if is_null_value(&column.get(idx).unwrap_or(AnyValue::Null)) {
            missing += 1;
        }
    }
    if missing == 0 {
        return None;
    }
    Some(
        Finding::warning(
            FindingKind::MissingKey,
            format!("'{name}' has {missing} empty code(s); the key column cannot be null"),
        )
        .with_column(name)
        .with_count(missing),
    )
}

/// Date values that parse with neither the typed path nor the format list.
fn invalid_date_finding(df: &DataFrame, name: &str) -> Option<Finding> {
    let column = df.column(name).ok()?;
    let mut invalid = 0u64;
    let mut non_null = 0u64;
    let mut examples: Vec<String> = Vec::new();
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if is_null_value(&value) {
            continue;
        }
        non_null += 1;
        if cell_datetime(column, idx).is_none() {
            invalid += 1;
            if examples.len() < EXAMPLE_LIMIT {
                examples.push(any_to_string(value));
            }
        }
    }
    if invalid == 0 {
        return None;
    }
    let mut message =
        format!("'{name}' has {invalid} of {non_null} non-null value(s) that do not parse as timestamps");
    if !examples.is_empty() {
        message.push_str(&format!(" examples: {}", examples.join(", ")));
    }
    Some(
        Finding::warning(FindingKind::InvalidDate, message)
            .with_column(name)
            .with_count(invalid),
    )
}

/// One finding per row whose close time precedes its start time.
fn temporal_findings(df: &DataFrame) -> Vec<Finding> {
    let (Ok(start), Ok(close)) = (
        df.column(columns::INTERRUPTION_START),
        df.column(columns::INTERRUPTION_CLOSE),
    ) else {
        return Vec::new();
    };
    let mut findings = Vec::new();
    for idx in 0..df.height() {
        let (Some(start_at), Some(close_at)) = (cell_datetime(start, idx), cell_datetime(close, idx))
        else {
            continue;
        };
        if close_at < start_at {
            findings.push(
                Finding::warning(
                    FindingKind::TemporalInconsistency,
                    format!("row {idx}: close time {close_at} precedes start time {start_at}"),
                )
                .with_column(columns::INTERRUPTION_CLOSE)
                .with_row(idx),
            );
        }
    }
    findings
}

/// Informational count of rows listing several comma-separated codes.
fn multi_code_finding(df: &DataFrame) -> Option<Finding> {
    let column = df.column(columns::INTERRUPTION_EQUIPMENT).ok()?;
    let mut multi = 0u64;
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if is_null_value(&value) {
            continue;
        }
        if any_to_string(value).contains(',') {
            multi += 1;
        }
    }
    if multi == 0 {
        return None;
    }
    Some(
        Finding::info(
            FindingKind::MultipleCodes,
            format!(
                "{multi} row(s) list several comma-separated equipment codes; '{}' is derived downstream",
                columns::FIRST_EQUIPMENT_CODE
            ),
        )
        .with_column(columns::INTERRUPTION_EQUIPMENT)
        .with_count(multi),
    )
}

/// Timestamp of a cell, whether the column was already coerced or still
/// holds text.
fn cell_datetime(column: &Column, idx: usize) -> Option<NaiveDateTime> {
    let value = column.get(idx).unwrap_or(AnyValue::Null);
    any_to_datetime(&value).or_else(|| parse_timestamp(&any_to_string(value)))
}
