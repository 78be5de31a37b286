//! Per-sheet processing: read, reconcile, normalize, light checks, append.
//!
//! A failure in any stage is caught at sheet granularity: the outcome is
//! recorded and the remaining sheets and workbooks keep processing.

use std::path::Path;

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame};
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use sira_db::append_frame;
use sira_ingest::{any_to_string, read_sheet};
use sira_map::reconcile;
use sira_model::{Finding, RecordType, RunOutcome, Severity};
use sira_normalize::normalize;
use sira_schema::SchemaRegistry;
use sira_validate::oversized_text_findings;

const PREVIEW_ROWS: usize = 3;

/// Processes every record-type sheet of one workbook.
pub async fn process_workbook(
    pool: Option<&PgPool>,
    registry: &SchemaRegistry,
    path: &Path,
) -> Vec<RunOutcome> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut outcomes = Vec::new();
    for record_type in RecordType::ALL {
        info!(
            file = %file_name,
            sheet = record_type.sheet_name(),
            table = record_type.table_name(),
            "processing sheet"
        );
        match process_sheet(pool, registry, path, record_type).await {
            Ok(rows) => {
                info!(rows, "sheet loaded");
                outcomes.push(RunOutcome::loaded(&file_name, record_type, rows));
            }
            Err(err) => {
                let detail = format!("{err:#}");
                error!(
                    file = %file_name,
                    sheet = record_type.sheet_name(),
                    error = %detail,
                    "sheet failed"
                );
                outcomes.push(RunOutcome::failed(&file_name, record_type, detail));
            }
        }
    }
    outcomes
}

async fn process_sheet(
    pool: Option<&PgPool>,
    registry: &SchemaRegistry,
    path: &Path,
    record_type: RecordType,
) -> Result<usize> {
    let mut df = read_sheet(path, record_type.sheet_name())?;
    info!(rows = df.height(), columns = df.width(), "sheet read");
    debug!(columns = ?df.get_column_names(), "original columns");

    let outcome = reconcile(&mut df, record_type, registry)?;
    log_findings(&outcome.findings);

    let df = normalize(df, record_type)?;
    info!(
        rows = df.height(),
        columns = df.width(),
        "batch normalized"
    );
    preview_rows(&df);

    // Pre-insert light check; warnings only, the batch still loads.
    for finding in oversized_text_findings(&df) {
        warn!("{}", finding.message);
    }

    let rows = df.height();
    match pool {
        Some(pool) => {
            let written = append_frame(pool, record_type.table_name(), &df).await?;
            info!(rows = written, table = record_type.table_name(), "batch appended");
        }
        None => {
            info!(table = record_type.table_name(), "dry run, append skipped");
        }
    }
    Ok(rows)
}

fn log_findings(findings: &[Finding]) {
    for finding in findings {
        match finding.severity {
            Severity::Info => info!("{}", finding.message),
            Severity::Warning => warn!("{}", finding.message),
        }
    }
}

fn preview_rows(df: &DataFrame) {
    let columns = df.get_columns();
    for idx in 0..df.height().min(PREVIEW_ROWS) {
        let rendered = columns
            .iter()
            .map(|column| {
                format!(
                    "{}={}",
                    column.name(),
                    any_to_string(column.get(idx).unwrap_or(AnyValue::Null))
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        debug!(row = idx, "{rendered}");
    }
}
