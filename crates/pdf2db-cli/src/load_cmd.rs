use std::path::Path;

use pdf2db::{DatabaseConfig, MySqlGateway, RawTable, RunReport, TableSink, TableStatus};
use tracing::{info, warn};

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<(), i32> {
    let config = cli.to_config();

    let mut gateway = if cli.dry_run {
        info!("dry run: MySQL connection skipped");
        None
    } else {
        connect(&config.database, cli.require_db)?
    };

    let report = pdf2db::run(&config, gateway.as_mut().map(|g| g as &mut dyn TableSink))
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;

    log_outcomes(&report);

    if let Some(path) = &cli.raw_json {
        write_raw_json(path, &report.raw_tables)?;
    }

    if gateway.take().is_some() {
        info!("MySQL connection closed");
    }
    Ok(())
}

/// Open the database, or fall back to extraction-only mode unless the
/// connection is required.
fn connect(database: &DatabaseConfig, required: bool) -> Result<Option<MySqlGateway>, i32> {
    match MySqlGateway::connect(database) {
        Ok(gateway) => Ok(Some(gateway)),
        Err(e) if required => {
            eprintln!("Error: {e}");
            Err(1)
        }
        Err(_) => {
            warn!("continuing without persistence; tables will not be written");
            Ok(None)
        }
    }
}

fn log_outcomes(report: &RunReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            TableStatus::Loaded(counts) => info!(
                table = %outcome.name,
                page = outcome.page,
                columns = outcome.table.column_count(),
                inserted = counts.inserted,
                failed = counts.failed,
                "table loaded"
            ),
            TableStatus::Skipped => info!(
                table = %outcome.name,
                page = outcome.page,
                columns = outcome.table.column_count(),
                rows = outcome.table.row_count(),
                "table not persisted"
            ),
            TableStatus::NoColumns => {
                info!(page = outcome.page, "table has no usable columns; skipped")
            }
            TableStatus::SchemaFailed(msg) | TableStatus::InsertFailed(msg) => {
                warn!(table = %outcome.name, error = %msg, "table not loaded")
            }
        }
    }
}

fn write_raw_json(path: &Path, tables: &[RawTable]) -> Result<(), i32> {
    let json = serde_json::to_string_pretty(tables).map_err(|e| {
        eprintln!("Error: failed to serialize tables: {e}");
        1
    })?;
    std::fs::write(path, json).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", path.display());
        1
    })?;
    info!(path = %path.display(), tables = tables.len(), "wrote raw tables");
    Ok(())
}
