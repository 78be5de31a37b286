use serde::{Deserialize, Serialize};

use crate::record_type::RecordType;

/// How one (workbook, sheet) unit ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum OutcomeStatus {
    /// The sheet was read, normalized, and appended.
    Loaded { rows: usize },
    /// Any stage failed; the rest of the run continued.
    Failed { error: String },
}

/// The success/failure record for one (workbook, record type) unit.
/// Created once when the sheet finishes, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Workbook file name (not the full path).
    pub source: String,
    pub record_type: RecordType,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl RunOutcome {
    pub fn loaded(source: impl Into<String>, record_type: RecordType, rows: usize) -> Self {
        Self {
            source: source.into(),
            record_type,
            status: OutcomeStatus::Loaded { rows },
        }
    }

    pub fn failed(
        source: impl Into<String>,
        record_type: RecordType,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            record_type,
            status: OutcomeStatus::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Loaded { .. })
    }
}

/// Aggregate of every outcome in a run, in processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcomes: Vec<RunOutcome>,
}

impl RunSummary {
    pub fn push(&mut self, outcome: RunOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn total_rows(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome.status {
                OutcomeStatus::Loaded { rows } => Some(rows),
                OutcomeStatus::Failed { .. } => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_aggregates_outcomes() {
        let mut summary = RunSummary::default();
        summary.push(RunOutcome::loaded(
            "agosto.xlsx",
            RecordType::TransformerCenter,
            120,
        ));
        summary.push(RunOutcome::loaded(
            "agosto.xlsx",
            RecordType::SwitchingEquipment,
            45,
        ));
        summary.push(RunOutcome::failed(
            "agosto.xlsx",
            RecordType::Interruption,
            "sheet not found",
        ));
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total_rows(), 165);
    }
}
