//! Validator contract tests.

use polars::prelude::{DataFrame, NamedFrom, Series};

use sira_model::{FindingKind, RecordType, Severity};
use sira_normalize::normalize;
use sira_schema::columns;
use sira_validate::validate;

fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    DataFrame::new(
        columns
            .into_iter()
            .map(|(name, values)| Series::new(name.into(), values).into())
            .collect(),
    )
    .unwrap()
}

#[test]
fn validation_is_idempotent_and_non_mutating() {
    let df = frame(vec![
        (columns::EQUIPMENT_CODE, vec![Some("EQ-1"), None, Some("x")]),
        (columns::VOLTAGE_LEVEL, vec![Some("13.8"), Some("abc"), None]),
    ]);
    let before = df.clone();
    let first = validate(&df, RecordType::SwitchingEquipment);
    let second = validate(&df, RecordType::SwitchingEquipment);
    assert_eq!(first.findings, second.findings);
    assert!(df.equals_missing(&before));
}

#[test]
fn unsafe_names_are_flagged_with_their_issues() {
    let df = frame(vec![
        ("Código Centro MT/BT", vec![Some("a")]),
        ("plain_name", vec![Some("b")]),
    ]);
    let report = validate(&df, RecordType::TransformerCenter);
    let unsafe_findings: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::UnsafeName)
        .collect();
    assert_eq!(unsafe_findings.len(), 1);
    let message = &unsafe_findings[0].message;
    assert!(message.contains("accented characters"));
    assert!(message.contains("slash"));
    assert!(message.contains("spaces"));
}

#[test]
fn null_ratio_over_half_is_flagged_with_percentage() {
    let df = frame(vec![(
        "Observaciones",
        vec![None, None, None, Some("ok")],
    )]);
    let report = validate(&df, RecordType::Interruption);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::NullRatio)
        .expect("null-ratio finding");
    assert!(finding.message.contains("75.0%"));
    assert_eq!(finding.count, Some(3));
}

#[test]
fn problem_tokens_match_case_insensitively() {
    let df = frame(vec![(
        "Causa",
        vec![Some("NaN"), Some("N/A"), Some("-"), Some("viento")],
    )]);
    let report = validate(&df, RecordType::Interruption);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::ProblemToken)
        .expect("problem-token finding");
    assert_eq!(finding.count, Some(3));
}

#[test]
fn duplicate_rows_are_reported_not_removed() {
    let df = frame(vec![
        ("Causa", vec![Some("viento"), Some("viento"), Some("otro")]),
        ("Observaciones", vec![Some("x"), Some("x"), Some("y")]),
    ]);
    let report = validate(&df, RecordType::Interruption);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::DuplicateRow)
        .expect("duplicate-row finding");
    assert_eq!(finding.count, Some(1));
    assert_eq!(df.height(), 3);
}

#[test]
fn non_numeric_keys_report_up_to_three_examples() {
    let df = frame(vec![(
        columns::CT_UTM_NORTH,
        vec![Some("a"), Some("b"), Some("c"), Some("d"), Some("5")],
    )]);
    let report = validate(&df, RecordType::TransformerCenter);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::NonNumeric)
        .expect("non-numeric finding");
    assert_eq!(finding.count, Some(4));
    let examples = finding.message.split(" examples: ").nth(1).unwrap();
    assert_eq!(examples, "a, b, c");
}

#[test]
fn oversized_kva_survives_normalization_and_is_flagged() {
    let df = frame(vec![(columns::KVA_INSTALLED, vec![Some("150.0")])]);
    let df = normalize(df, RecordType::TransformerCenter).unwrap();
    let report = validate(&df, RecordType::TransformerCenter);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::RangeExceeded)
        .expect("range finding");
    assert_eq!(finding.column.as_deref(), Some(columns::KVA_INSTALLED));
    assert_eq!(finding.severity, Severity::Warning);
}

#[test]
fn null_equipment_codes_are_a_hard_warning() {
    let df = frame(vec![(
        columns::EQUIPMENT_CODE,
        vec![Some("EQ-1"), None, None],
    )]);
    let report = validate(&df, RecordType::SwitchingEquipment);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::MissingKey)
        .expect("missing-key finding");
    assert_eq!(finding.count, Some(2));
}

#[test]
fn temporal_inconsistency_flags_exactly_the_offending_row() {
    let df = frame(vec![
        (
            columns::INTERRUPTION_START,
            vec![
                Some("2024-08-01 10:00:00"),
                Some("2024-08-02 10:00:00"),
                Some("2024-08-03 10:00:00"),
            ],
        ),
        (
            columns::INTERRUPTION_CLOSE,
            vec![
                Some("2024-08-01 12:00:00"),
                Some("2024-08-02 08:00:00"),
                None,
            ],
        ),
    ]);
    let report = validate(&df, RecordType::Interruption);
    let temporal: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::TemporalInconsistency)
        .collect();
    assert_eq!(temporal.len(), 1);
    assert_eq!(temporal[0].row, Some(1));
}

#[test]
fn multi_code_rows_are_informational_only() {
    let df = frame(vec![(
        columns::INTERRUPTION_EQUIPMENT,
        vec![Some("A100, B200"), Some("C300")],
    )]);
    let report = validate(&df, RecordType::Interruption);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::MultipleCodes)
        .expect("multi-code finding");
    assert_eq!(finding.severity, Severity::Info);
    assert_eq!(finding.count, Some(1));
}

#[test]
fn invalid_dates_are_counted_with_examples() {
    let df = frame(vec![(
        columns::INTERRUPTION_START,
        vec![Some("2024-08-01"), Some("pronto"), None],
    )]);
    let report = validate(&df, RecordType::Interruption);
    let finding = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::InvalidDate)
        .expect("invalid-date finding");
    assert_eq!(finding.count, Some(1));
    assert!(finding.message.contains("pronto"));
}

#[test]
fn validation_after_normalization_accepts_typed_columns() {
    let df = frame(vec![
        (
            columns::INTERRUPTION_START,
            vec![Some("2024-08-01 10:00:00")],
        ),
        (
            columns::INTERRUPTION_CLOSE,
            vec![Some("2024-08-01 08:00:00")],
        ),
    ]);
    let df = normalize(df, RecordType::Interruption).unwrap();
    let report = validate(&df, RecordType::Interruption);
    assert!(
        report
            .findings
            .iter()
            .any(|f| f.kind == FindingKind::TemporalInconsistency)
    );
}
