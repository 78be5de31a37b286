//! Column reconciliation.
//!
//! Maps the raw column names of an incoming batch onto the canonical
//! destination schema of its record type. Renaming is the only mutation:
//! no row is ever dropped here, and a column with no alias entry flows
//! downstream under its original name so no data is lost.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, PolarsResult};
use tracing::warn;

use sira_model::{Finding, FindingKind, RecordType};
use sira_schema::SchemaRegistry;

/// The rename plan applied to one batch, plus its diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// (raw, canonical) pairs for every column with an alias entry,
    /// in input column order. Identity renames are included.
    pub renamed: Vec<(String, String)>,
    /// Columns with no alias entry, kept under their original name.
    pub unmapped: Vec<String>,
    /// One info finding per mapped column, one warning per unmapped one.
    pub findings: Vec<Finding>,
}

/// Renames the batch's columns onto the record type's canonical schema.
///
/// When two raw columns alias to the same canonical name, the later one in
/// column order wins and the earlier column is dropped (last-wins, a
/// documented boundary case).
pub fn reconcile(
    df: &mut DataFrame,
    record_type: RecordType,
    registry: &SchemaRegistry,
) -> PolarsResult<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();

    let raw_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    // Resolve every column first; the winner map's insert order makes the
    // last alias for a canonical name win.
    let mut targets: Vec<(String, String)> = Vec::with_capacity(raw_names.len());
    let mut winner: BTreeMap<String, String> = BTreeMap::new();
    for raw in &raw_names {
        match registry.resolve(record_type, raw) {
            Some(canonical) => {
                outcome.renamed.push((raw.clone(), canonical.to_string()));
                outcome.findings.push(
                    Finding::info(
                        FindingKind::MappedColumn,
                        format!("'{raw}' -> '{canonical}'"),
                    )
                    .with_column(canonical),
                );
                targets.push((raw.clone(), canonical.to_string()));
                winner.insert(canonical.to_string(), raw.clone());
            }
            None => {
                outcome.unmapped.push(raw.clone());
                outcome.findings.push(
                    Finding::warning(
                        FindingKind::UnmappedColumn,
                        format!("'{raw}' has no alias entry; keeping the original name"),
                    )
                    .with_column(raw),
                );
                targets.push((raw.clone(), raw.clone()));
                winner.insert(raw.clone(), raw.clone());
            }
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(targets.len());
    for (raw, target) in &targets {
        if winner.get(target) != Some(raw) {
            warn!(
                column = raw.as_str(),
                canonical = target.as_str(),
                "alias collision: a later column also maps to this name, dropping the earlier one"
            );
            continue;
        }
        let column = df.column(raw)?.clone().with_name(target.as_str().into());
        columns.push(column);
    }

    *df = DataFrame::new(columns)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

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
    fn canonical_names_survive_unchanged() {
        let registry = SchemaRegistry::new();
        let mut df = frame(vec![("Propietario", vec![Some("EEH")])]);
        let outcome = reconcile(&mut df, RecordType::TransformerCenter, &registry).unwrap();
        assert_eq!(df.get_column_names()[0].as_str(), "Propietario");
        assert_eq!(
            outcome.renamed,
            vec![("Propietario".to_string(), "Propietario".to_string())]
        );
        assert!(outcome.unmapped.is_empty());
    }

    #[test]
    fn later_alias_wins_a_collision() {
        let registry = SchemaRegistry::new();
        let mut df = frame(vec![
            ("Codigo de Equipo", vec![Some("early")]),
            ("Código de equipo", vec![Some("late")]),
        ]);
        reconcile(&mut df, RecordType::SwitchingEquipment, &registry).unwrap();
        assert_eq!(df.width(), 1);
        let column = df.column("Código de equipo").unwrap();
        assert_eq!(value_to_string(column.get(0).unwrap()), "late");
    }

    fn value_to_string(value: polars::prelude::AnyValue<'_>) -> String {
        match value {
            polars::prelude::AnyValue::String(s) => s.to_string(),
            polars::prelude::AnyValue::StringOwned(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}
