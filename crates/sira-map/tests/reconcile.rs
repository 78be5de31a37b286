//! Reconciliation contract tests.

use polars::prelude::{DataFrame, NamedFrom, Series};

use sira_map::reconcile;
use sira_model::{RecordType, Severity};
use sira_schema::SchemaRegistry;

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
fn mapped_columns_land_inside_the_canonical_field_set() {
    let registry = SchemaRegistry::new();
    let mut df = frame(vec![
        ("Codigo Centro MT/BT", vec![Some("CT-001")]),
        ("KVA instalado por transformador", vec![Some("50")]),
        ("Columna Extra", vec![Some("x")]),
    ]);
    let outcome = reconcile(&mut df, RecordType::TransformerCenter, &registry).unwrap();

    let canonical = registry.canonical_fields_for(RecordType::TransformerCenter);
    for (_, target) in &outcome.renamed {
        assert!(canonical.contains(target), "'{target}' not in schema");
    }
    assert!(
        df.column("Código Centro de transformación MT/BT").is_ok(),
        "accentless alias was not renamed"
    );
}

#[test]
fn unmapped_columns_flow_through_with_a_warning() {
    let registry = SchemaRegistry::new();
    let mut df = frame(vec![
        ("Columna Extra", vec![Some("x"), Some("y")]),
        ("Propietario", vec![Some("EEH"), None]),
    ]);
    let outcome = reconcile(&mut df, RecordType::TransformerCenter, &registry).unwrap();

    assert_eq!(outcome.unmapped, vec!["Columna Extra".to_string()]);
    assert!(df.column("Columna Extra").is_ok());
    // No row loss.
    assert_eq!(df.height(), 2);

    let warnings: Vec<_> = outcome
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].column.as_deref(), Some("Columna Extra"));
}

#[test]
fn one_finding_per_input_column() {
    let registry = SchemaRegistry::new();
    let mut df = frame(vec![
        ("ID Interrupcion", vec![Some("1")]),
        ("Causa", vec![Some("viento")]),
        ("Misterio", vec![Some("?")]),
    ]);
    let outcome = reconcile(&mut df, RecordType::Interruption, &registry).unwrap();
    assert_eq!(outcome.findings.len(), 3);
    assert_eq!(outcome.renamed.len(), 2);
    assert_eq!(outcome.unmapped.len(), 1);
}

#[test]
fn rename_is_exact_and_accent_sensitive() {
    let registry = SchemaRegistry::new();
    // An uppercase variant that is not in the alias table stays untouched.
    let mut df = frame(vec![("NIVEL DE TENSION", vec![Some("13.8")])]);
    let outcome = reconcile(&mut df, RecordType::SwitchingEquipment, &registry).unwrap();
    assert_eq!(outcome.unmapped, vec!["NIVEL DE TENSION".to_string()]);
    assert!(df.column("NIVEL DE TENSION").is_ok());
}
