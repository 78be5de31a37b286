use serde::{Deserialize, Serialize};

use crate::record_type::RecordType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// What a finding is about. One variant per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// Column name carries accents, slashes, spaces, special characters, or
    /// exceeds the destination identifier limit.
    UnsafeName,
    /// More than half of a column's values are null.
    NullRatio,
    /// Cells holding placeholder text such as "N/A" or "-".
    ProblemToken,
    /// A text value longer than the destination column limit.
    OversizedText,
    /// Fully identical rows present in the batch.
    DuplicateRow,
    /// Non-numeric values in a column expected to be numeric.
    NonNumeric,
    /// Date values that do not parse.
    InvalidDate,
    /// Close time earlier than start time on the same row.
    TemporalInconsistency,
    /// Null values in a key column that cannot be null.
    MissingKey,
    /// Cells listing several comma-separated equipment codes.
    MultipleCodes,
    /// Numeric values beyond the destination column's declared range.
    RangeExceeded,
    /// Input column with no alias entry; kept under its original name.
    UnmappedColumn,
    /// Input column mapped onto its canonical name.
    MappedColumn,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnsafeName => "unsafe-name",
            FindingKind::NullRatio => "null-ratio",
            FindingKind::ProblemToken => "problem-token",
            FindingKind::OversizedText => "oversized-text",
            FindingKind::DuplicateRow => "duplicate-row",
            FindingKind::NonNumeric => "non-numeric",
            FindingKind::InvalidDate => "invalid-date",
            FindingKind::TemporalInconsistency => "temporal-inconsistency",
            FindingKind::MissingKey => "missing-key",
            FindingKind::MultipleCodes => "multiple-codes",
            FindingKind::RangeExceeded => "range-exceeded",
            FindingKind::UnmappedColumn => "unmapped-column",
            FindingKind::MappedColumn => "mapped-column",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single non-blocking diagnostic. Findings never mutate the batch they
/// describe; they are reported alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    /// Column the finding is about, when column-scoped.
    pub column: Option<String>,
    /// Zero-based row index, when row-scoped.
    pub row: Option<usize>,
    pub message: String,
    /// Occurrence count, when the check counts cells or rows.
    pub count: Option<u64>,
}

impl Finding {
    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            column: None,
            row: None,
            message: message.into(),
            count: None,
        }
    }

    pub fn info(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            column: None,
            row: None,
            message: message.into(),
            count: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

/// All findings produced by one validation pass over one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub record_type: RecordType,
    pub findings: Vec<Finding>,
}

impl QualityReport {
    pub fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            findings: Vec::new(),
        }
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Info)
            .count()
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }
}
