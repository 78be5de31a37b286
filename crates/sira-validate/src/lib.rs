//! Data-quality validation.
//!
//! Every check appends findings and nothing else: the batch is never
//! mutated, checks are independent of each other, and running a check
//! twice over the same batch yields the same findings. Validation runs
//! both pre-flight over raw sheets and inside the load path over
//! normalized ones, so value checks accept text and typed columns alike.

mod record_checks;

use polars::prelude::{AnyValue, DataFrame, DataType};

use sira_ingest::{any_to_string, is_null_value};
use sira_model::{Finding, FindingKind, QualityReport, RecordType};

/// Destination identifier length limit.
const NAME_LIMIT: usize = 128;

/// Approximate destination text column limit.
const TEXT_LIMIT: usize = 255;

/// Null fraction beyond which a column is flagged.
const NULL_RATIO_LIMIT: f64 = 0.5;

const ACCENTED: &[char] = &['á', 'é', 'í', 'ó', 'ú', 'ñ', 'Á', 'É', 'Í', 'Ó', 'Ú', 'Ñ'];

const SPECIAL: &[char] = &['(', ')', '[', ']', '{', '}', '@', '#', '$', '%'];

/// Placeholder spellings that stand in for missing values, compared
/// case-insensitively.
const PROBLEM_TOKENS: &[&str] = &["nan", "na", "n/a", "#n/a", "-", "/", ""];

/// Runs every check for the record type over one batch.
pub fn validate(df: &DataFrame, record_type: RecordType) -> QualityReport {
    let mut report = QualityReport::new(record_type);
    report.findings.extend(unsafe_name_findings(df));
    report.findings.extend(null_ratio_findings(df));
    report.findings.extend(problem_token_findings(df));
    report.findings.extend(oversized_text_findings(df));
    report.findings.extend(duplicate_row_findings(df));
    report
        .findings
        .extend(record_checks::findings(df, record_type));
    report
}

/// Column names the destination will struggle with: accents, slashes,
/// spaces, special characters, or over-long identifiers.
pub fn unsafe_name_findings(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    for name in df.get_column_names() {
        let name = name.as_str();
        let mut issues: Vec<&str> = Vec::new();
        if name.chars().any(|ch| ACCENTED.contains(&ch)) {
            issues.push("accented characters");
        }
        if name.contains('/') {
            issues.push("slash");
        }
        if name.contains(' ') {
            issues.push("spaces");
        }
        if name.chars().any(|ch| SPECIAL.contains(&ch)) {
            issues.push("special characters");
        }
        if name.chars().count() > NAME_LIMIT {
            issues.push("name longer than 128 characters");
        }
        if !issues.is_empty() {
            findings.push(
                Finding::warning(
                    FindingKind::UnsafeName,
                    format!("'{name}': {}", issues.join(", ")),
                )
                .with_column(name),
            );
        }
    }
    findings
}

/// Columns that are mostly null.
pub fn null_ratio_findings(df: &DataFrame) -> Vec<Finding> {
    let height = df.height();
    if height == 0 {
        return Vec::new();
    }
    let mut findings = Vec::new();
    for column in df.get_columns() {
        let nulls = (0..height)
            .filter(|idx| is_null_value(&column.get(*idx).unwrap_or(AnyValue::Null)))
            .count();
        let ratio = nulls as f64 / height as f64;
        if ratio > NULL_RATIO_LIMIT {
            findings.push(
                Finding::warning(
                    FindingKind::NullRatio,
                    format!("'{}': {:.1}% null values", column.name(), ratio * 100.0),
                )
                .with_column(column.name().as_str())
                .with_count(nulls as u64),
            );
        }
    }
    findings
}

/// Cells holding placeholder text instead of a value or a proper null.
pub fn problem_token_findings(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    for column in df.get_columns() {
        if column.dtype() != &DataType::String {
            continue;
        }
        let mut count = 0u64;
        for idx in 0..df.height() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            if matches!(value, AnyValue::Null) {
                continue;
            }
            let text = any_to_string(value).trim().to_lowercase();
            if PROBLEM_TOKENS.contains(&text.as_str()) {
                count += 1;
            }
        }
        if count > 0 {
            findings.push(
                Finding::warning(
                    FindingKind::ProblemToken,
                    format!(
                        "'{}' has {count} placeholder value(s) (NA, -, /, ...)",
                        column.name()
                    ),
                )
                .with_column(column.name().as_str())
                .with_count(count),
            );
        }
    }
    findings
}

/// Text values longer than the destination column limit. Also used by the
/// load path as its pre-insert light check.
pub fn oversized_text_findings(df: &DataFrame) -> Vec<Finding> {
    let mut findings = Vec::new();
    for column in df.get_columns() {
        if column.dtype() != &DataType::String {
            continue;
        }
        let mut longest = 0usize;
        let mut over = 0u64;
        for idx in 0..df.height() {
            let length = any_to_string(column.get(idx).unwrap_or(AnyValue::Null))
                .chars()
                .count();
            longest = longest.max(length);
            if length > TEXT_LIMIT {
                over += 1;
            }
        }
        if over > 0 {
            findings.push(
                Finding::warning(
                    FindingKind::OversizedText,
                    format!(
                        "'{}' has values up to {longest} characters (destination limit {TEXT_LIMIT})",
                        column.name()
                    ),
                )
                .with_column(column.name().as_str())
                .with_count(over),
            );
        }
    }
    findings
}

/// Fully identical rows. Reported only; the loader persists them all.
pub fn duplicate_row_findings(df: &DataFrame) -> Vec<Finding> {
    if df.height() == 0 || df.width() == 0 {
        return Vec::new();
    }
    let mut seen = std::collections::BTreeSet::new();
    let mut duplicates = 0u64;
    let columns = df.get_columns();
    for idx in 0..df.height() {
        let key = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect::<Vec<_>>()
            .join("\u{1f}");
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    if duplicates == 0 {
        return Vec::new();
    }
    vec![
        Finding::warning(
            FindingKind::DuplicateRow,
            format!("{duplicates} fully identical row(s)"),
        )
        .with_count(duplicates),
    ]
}
