//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use sira_db::DbConfig;
use sira_ingest::{list_workbooks, read_sheet};
use sira_model::{RecordType, RunSummary};
use sira_schema::SchemaRegistry;
use sira_validate::validate;

use crate::cli::{CheckArgs, LoadArgs};
use crate::pipeline::process_workbook;
use crate::summary::{print_findings, print_schema};

/// Fallback workbook folder when neither the CLI argument nor SOURCE_DIR
/// is set.
const DEFAULT_SOURCE_DIR: &str = "datos_regulatorios";

pub async fn run_load(args: &LoadArgs) -> Result<RunSummary> {
    // Fail fast on configuration before any file is touched.
    let config = DbConfig::from_env().context("datastore configuration")?;
    config.log_summary();

    let source_dir = resolve_source_dir(args.source_dir.clone());
    let workbooks = list_workbooks(&source_dir)?;
    if workbooks.is_empty() {
        bail!("no workbooks found in {}", source_dir.display());
    }
    info!(count = workbooks.len(), folder = %source_dir.display(), "workbooks found");
    for (idx, workbook) in workbooks.iter().enumerate() {
        info!("  {}. {}", idx + 1, workbook.display());
    }

    let pool = if args.dry_run {
        info!("dry run: the datastore will not be touched");
        None
    } else {
        Some(
            sira_db::connect(&config)
                .await
                .context("connect to datastore")?,
        )
    };

    let registry = SchemaRegistry::new();
    let mut summary = RunSummary::default();
    for workbook in &workbooks {
        for outcome in process_workbook(pool.as_ref(), &registry, workbook).await {
            summary.push(outcome);
        }
    }

    // Released in every outcome; sheet failures are already recorded.
    if let Some(pool) = pool {
        pool.close().await;
        info!("datastore connection closed");
    }

    Ok(summary)
}

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let source_dir = resolve_source_dir(args.source_dir.clone());
    let workbooks = list_workbooks(&source_dir)?;
    if workbooks.is_empty() {
        bail!("no workbooks found in {}", source_dir.display());
    }

    for workbook in &workbooks {
        let file_name = workbook
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| workbook.display().to_string());
        for record_type in RecordType::ALL {
            match read_sheet(workbook, record_type.sheet_name()) {
                Ok(df) => {
                    let report = validate(&df, record_type);
                    print_findings(&file_name, record_type, df.height(), df.width(), &report);
                }
                Err(err) => {
                    warn!(
                        file = %file_name,
                        sheet = record_type.sheet_name(),
                        error = %err,
                        "sheet could not be read"
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn run_schema() {
    let registry = SchemaRegistry::new();
    print_schema(&registry);
}

fn resolve_source_dir(arg: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = arg {
        return dir;
    }
    if let Ok(dir) = std::env::var("SOURCE_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    warn!("SOURCE_DIR not set; using default source folder '{DEFAULT_SOURCE_DIR}'");
    PathBuf::from(DEFAULT_SOURCE_DIR)
}
