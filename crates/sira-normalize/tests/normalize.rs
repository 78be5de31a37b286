//! Normalization contract tests.

use polars::prelude::{AnyValue, DataFrame, DataType, NamedFrom, Series};

use sira_model::RecordType;
use sira_normalize::normalize;
use sira_schema::columns;

fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    DataFrame::new(
        columns
            .into_iter()
            .map(|(name, values)| Series::new(name.into(), values).into())
            .collect(),
    )
    .unwrap()
}

fn f64_at(df: &DataFrame, column: &str, idx: usize) -> Option<f64> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Float64(v) => Some(v),
        AnyValue::Null => None,
        other => panic!("unexpected value {other:?}"),
    }
}

fn i64_at(df: &DataFrame, column: &str, idx: usize) -> Option<i64> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Int64(v) => Some(v),
        AnyValue::Null => None,
        other => panic!("unexpected value {other:?}"),
    }
}

fn str_at(df: &DataFrame, column: &str, idx: usize) -> Option<String> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Null => None,
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn utm_coordinates_round_halves_up_and_null_garbage() {
    let df = frame(vec![
        (columns::CT_UTM_NORTH, vec![Some("12.5"), Some("abc"), None]),
        (columns::CT_UTM_WEST, vec![Some("87.4"), Some("88.6"), Some("90")]),
        ("Propietario", vec![Some("EEH"), Some("EEH"), Some("EEH")]),
    ]);
    let df = normalize(df, RecordType::TransformerCenter).unwrap();

    assert_eq!(i64_at(&df, columns::CT_UTM_NORTH, 0), Some(13));
    assert_eq!(i64_at(&df, columns::CT_UTM_NORTH, 1), None);
    assert_eq!(i64_at(&df, columns::CT_UTM_WEST, 0), Some(87));
    assert_eq!(i64_at(&df, columns::CT_UTM_WEST, 1), Some(89));
}

#[test]
fn oversized_kva_is_preserved_not_truncated() {
    let df = frame(vec![(
        columns::KVA_INSTALLED,
        vec![Some("150.0"), Some("50.5")],
    )]);
    let df = normalize(df, RecordType::TransformerCenter).unwrap();
    assert_eq!(f64_at(&df, columns::KVA_INSTALLED, 0), Some(150.0));
    assert_eq!(f64_at(&df, columns::KVA_INSTALLED, 1), Some(50.5));
}

#[test]
fn voltage_flag_preserves_and_current_rounds() {
    let df = frame(vec![
        (columns::VOLTAGE_LEVEL, vec![Some("13.8"), Some("0.24")]),
        (columns::MAX_CURRENT, vec![Some("399.5"), Some("x")]),
    ]);
    let df = normalize(df, RecordType::SwitchingEquipment).unwrap();
    assert_eq!(f64_at(&df, columns::VOLTAGE_LEVEL, 0), Some(13.8));
    assert_eq!(i64_at(&df, columns::MAX_CURRENT, 0), Some(400));
    assert_eq!(i64_at(&df, columns::MAX_CURRENT, 1), None);
}

#[test]
fn text_is_trimmed_collapsed_and_nan_nulled() {
    let df = frame(vec![
        ("Propietario", vec![Some("  EEH   Honduras "), Some("nan"), Some("NaN")]),
        ("Equipo aguas arriba", vec![Some("a"), Some("b"), Some("c")]),
    ]);
    let df = normalize(df, RecordType::TransformerCenter).unwrap();
    assert_eq!(str_at(&df, "Propietario", 0), Some("EEH Honduras".into()));
    assert_eq!(str_at(&df, "Propietario", 1), None);
    // Replacement is case-sensitive; "NaN" is a validator concern.
    assert_eq!(str_at(&df, "Propietario", 2), Some("NaN".into()));
}

#[test]
fn empty_columns_and_rows_are_dropped_in_order() {
    let df = frame(vec![
        ("Propietario", vec![Some("a"), None, Some("c")]),
        ("Vacía", vec![None, None, None]),
    ]);
    let df = normalize(df, RecordType::TransformerCenter).unwrap();
    assert!(df.column("Vacía").is_err());
    assert_eq!(df.height(), 2);
    assert_eq!(str_at(&df, "Propietario", 0), Some("a".into()));
    assert_eq!(str_at(&df, "Propietario", 1), Some("c".into()));
}

#[test]
fn interruption_dates_parse_and_bad_values_null() {
    let df = frame(vec![
        (
            columns::INTERRUPTION_START,
            vec![Some("2024-08-01 10:00:00"), Some("no es fecha")],
        ),
        (
            columns::INTERRUPTION_CLOSE,
            vec![Some("01/08/2024 12:30"), None],
        ),
    ]);
    let df = normalize(df, RecordType::Interruption).unwrap();
    assert!(matches!(
        df.column(columns::INTERRUPTION_START).unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
    let start = df.column(columns::INTERRUPTION_START).unwrap();
    assert!(!matches!(start.get(0).unwrap(), AnyValue::Null));
    assert!(matches!(start.get(1).unwrap(), AnyValue::Null));
}

#[test]
fn first_equipment_code_is_derived() {
    let df = frame(vec![(
        columns::INTERRUPTION_EQUIPMENT,
        vec![Some("A100, B200"), Some("C300"), None],
    )]);
    let df = normalize(df, RecordType::Interruption).unwrap();
    assert_eq!(
        str_at(&df, columns::FIRST_EQUIPMENT_CODE, 0),
        Some("A100".into())
    );
    assert_eq!(
        str_at(&df, columns::FIRST_EQUIPMENT_CODE, 1),
        Some("C300".into())
    );
    assert_eq!(str_at(&df, columns::FIRST_EQUIPMENT_CODE, 2), None);
}

#[test]
fn identity_column_is_dropped_for_every_record_type() {
    for record_type in RecordType::ALL {
        let df = frame(vec![
            ("id", vec![Some("1"), Some("2")]),
            ("Observaciones", vec![Some("a"), Some("b")]),
        ]);
        let df = normalize(df, record_type).unwrap();
        assert!(df.column("id").is_err(), "{record_type}: id survived");
    }
}
