//! One run: extract, normalize, and load every table of a PDF.

use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::ExtractError;
use crate::extract::extract_tables;
use crate::gateway::{InsertReport, TableSink};
use crate::model::{NormalizedTable, RawTable};
use crate::normalize::normalize;

/// What happened to one detected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    /// Created (or already present) and rows inserted.
    Loaded(InsertReport),
    /// No sink was given, so nothing was written.
    Skipped,
    /// Nothing survived normalization; no table was created.
    NoColumns,
    /// `CREATE TABLE` failed; no rows were attempted.
    SchemaFailed(String),
    /// The insert batch could not be started or committed.
    InsertFailed(String),
}

/// Result of processing one raw table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOutcome {
    /// 1-based position among detected tables.
    pub index: usize,
    pub page: usize,
    /// Database table name, `table_<index>_<file stem>`.
    pub name: String,
    pub table: NormalizedTable,
    pub status: TableStatus,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Tables as detected, before normalization.
    pub raw_tables: Vec<RawTable>,
    pub outcomes: Vec<TableOutcome>,
}

impl RunReport {
    /// Number of tables written to the sink.
    pub fn tables_loaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, TableStatus::Loaded(_)))
            .count()
    }

    /// Total rows inserted across all tables.
    pub fn rows_inserted(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                TableStatus::Loaded(report) => report.inserted,
                _ => 0,
            })
            .sum()
    }
}

/// Database table name for the `index`-th table (1-based) of `file`.
///
/// Uses the file name without directories or its extension, so
/// `reports/q3.pdf` gives `table_1_q3` for the first table.
pub fn table_name(index: usize, file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("table_{index}_{stem}")
}

/// Extract tables from `config.file` and load each into `sink`.
///
/// With `sink = None` the tables are still extracted and normalized, but
/// nothing is persisted. Database failures are recorded per table in the
/// returned report and never abort the run.
///
/// # Errors
///
/// Returns [`ExtractError`] if the PDF cannot be read.
pub fn run(config: &Config, sink: Option<&mut dyn TableSink>) -> Result<RunReport, ExtractError> {
    let raw_tables = extract_tables(
        &config.file,
        config.intersection_tolerance,
        config.pages.as_ref(),
    )?;
    let outcomes = load_tables(&raw_tables, &config.file, sink);

    let report = RunReport {
        raw_tables,
        outcomes,
    };
    info!(
        detected = report.raw_tables.len(),
        loaded = report.tables_loaded(),
        rows = report.rows_inserted(),
        "run finished"
    );
    Ok(report)
}

/// Normalize and load already-extracted tables, in order.
pub fn load_tables(
    raw_tables: &[RawTable],
    file: &Path,
    mut sink: Option<&mut dyn TableSink>,
) -> Vec<TableOutcome> {
    raw_tables
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let index = i + 1;
            let name = table_name(index, file);
            let table = normalize(raw);
            let status = load_table(sink.as_deref_mut(), &name, &table);
            debug!(table = %name, page = raw.page, ?status, "processed table");
            TableOutcome {
                index,
                page: raw.page,
                name,
                table,
                status,
            }
        })
        .collect()
}

fn load_table(
    sink: Option<&mut (dyn TableSink + '_)>,
    name: &str,
    table: &NormalizedTable,
) -> TableStatus {
    if table.column_count() == 0 {
        return TableStatus::NoColumns;
    }
    let Some(sink) = sink else {
        return TableStatus::Skipped;
    };

    if let Err(e) = sink.create_table_if_absent(name, &table.columns) {
        return TableStatus::SchemaFailed(e.to_string());
    }
    match sink.insert_rows(name, &table.columns, &table.rows) {
        Ok(report) => TableStatus::Loaded(report),
        Err(e) => TableStatus::InsertFailed(e.to_string()),
    }
}
