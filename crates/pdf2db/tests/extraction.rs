//! Extraction and pipeline tests against generated PDFs.

mod common;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use pdf2db::ruling::{RulingSource, with_rulings};
use pdf2db::{
    CellValue, Config, ExtractError, GatewayError, InsertReport, PageSelection, TableSink,
    TableStatus, extract_tables, lattice_settings, normalize, run,
};
use pdfplumber::Pdf;

const INVOICE: &[&[&str]] = &[
    &["Item", "Qty", "Price"],
    &["Pen", "3", "$1,200"],
    &["Book", "1", "$9"],
];

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Row counts of every table the lattice strategy finds on page 1, before
/// the minimum-row filter.
fn detected_row_counts(bytes: &[u8]) -> Vec<usize> {
    let pdf = Pdf::open(bytes, None).unwrap();
    let source = RulingSource::load(bytes).unwrap();
    let page = pdf.page(0).unwrap();
    let rulings = source.rulings(1, page.media_box().height()).unwrap();
    with_rulings(page, rulings)
        .find_tables(&lattice_settings(10))
        .iter()
        .map(|t| t.rows.len())
        .collect()
}

#[derive(Default)]
struct RecordingSink {
    schemas: BTreeMap<String, Vec<String>>,
    rows: BTreeMap<String, Vec<Vec<CellValue>>>,
}

impl TableSink for RecordingSink {
    fn create_table_if_absent(
        &mut self,
        table: &str,
        columns: &[String],
    ) -> Result<(), GatewayError> {
        self.schemas
            .entry(table.to_string())
            .or_insert_with(|| columns.to_vec());
        Ok(())
    }

    fn insert_rows(
        &mut self,
        table: &str,
        _columns: &[String],
        rows: &[Vec<CellValue>],
    ) -> Result<InsertReport, GatewayError> {
        self.rows
            .entry(table.to_string())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(InsertReport {
            inserted: rows.len(),
            failed: 0,
        })
    }
}

#[test]
fn text_only_page_has_no_tables() {
    let f = common::write_temp_pdf(&common::pdf_with_pages(&[common::text_content(
        "Hello World",
    )]));
    let tables = extract_tables(f.path(), 10, None).unwrap();
    assert!(tables.is_empty(), "expected no tables, got {tables:?}");
}

#[test]
fn ruled_table_is_extracted_with_header_and_rows() {
    let f = common::write_temp_pdf(&common::pdf_with_table(INVOICE));
    let tables = extract_tables(f.path(), 10, None).unwrap();

    assert_eq!(tables.len(), 1, "tables: {tables:?}");
    let table = &tables[0];
    assert_eq!(table.page, 1);
    assert_eq!(
        table.rows,
        vec![
            vec![text("Item"), text("Qty"), text("Price")],
            vec![text("Pen"), text("3"), text("$1,200")],
            vec![text("Book"), text("1"), text("$9")],
        ]
    );
}

#[test]
fn boxed_cells_drawn_as_rects_are_detected() {
    let bytes = common::pdf_with_pages(&[common::boxed_grid_content(INVOICE, 700)]);
    let f = common::write_temp_pdf(&bytes);
    let tables = extract_tables(f.path(), 10, None).unwrap();

    assert_eq!(tables.len(), 1, "tables: {tables:?}");
    assert_eq!(tables[0].rows.len(), 3);
    assert_eq!(tables[0].rows[1][2], text("$1,200"));
}

#[test]
fn extracted_table_normalizes_to_typed_columns() {
    let f = common::write_temp_pdf(&common::pdf_with_table(INVOICE));
    let tables = extract_tables(f.path(), 10, None).unwrap();
    let normalized = normalize(&tables[0]);

    assert_eq!(normalized.columns, vec!["Item", "Qty", "Price"]);
    assert_eq!(
        normalized.rows,
        vec![
            vec![
                CellValue::Text("Pen".into()),
                CellValue::Integer(3),
                CellValue::Integer(1200),
            ],
            vec![
                CellValue::Text("Book".into()),
                CellValue::Integer(1),
                CellValue::Integer(9),
            ],
        ]
    );
}

#[test]
fn single_row_grid_is_detected_but_discarded() {
    let bytes = common::pdf_with_table(&[&["Only", "Header"]]);
    assert_eq!(detected_row_counts(&bytes), vec![1]);

    let f = common::write_temp_pdf(&bytes);
    let tables = extract_tables(f.path(), 10, None).unwrap();
    assert!(tables.is_empty(), "single-row table kept: {tables:?}");
}

#[test]
fn tables_on_several_pages_keep_page_order() {
    let bytes = common::pdf_with_pages(&[
        common::text_content("Cover"),
        common::grid_content(INVOICE, 700),
        common::grid_content(&[&["Code", "Name"], &["A1", "Alpha"]], 500),
    ]);
    let f = common::write_temp_pdf(&bytes);
    let tables = extract_tables(f.path(), 10, None).unwrap();

    let pages: Vec<usize> = tables.iter().map(|t| t.page).collect();
    assert_eq!(pages, vec![2, 3]);
    assert_eq!(tables[1].rows[0], vec![text("Code"), text("Name")]);
}

#[test]
fn page_selection_limits_scanned_pages() {
    let bytes = common::pdf_with_pages(&[
        common::grid_content(INVOICE, 700),
        common::text_content("Appendix"),
    ]);
    let f = common::write_temp_pdf(&bytes);

    let all = extract_tables(f.path(), 10, None).unwrap();
    assert_eq!(all.len(), 1);

    let selection: PageSelection = "2".parse().unwrap();
    let tables = extract_tables(f.path(), 10, Some(&selection)).unwrap();
    assert!(tables.is_empty());
}

#[test]
fn page_selection_beyond_document_is_rejected() {
    let f = common::write_temp_pdf(&common::pdf_with_table(INVOICE));
    let selection: PageSelection = "1-4".parse().unwrap();
    let err = extract_tables(f.path(), 10, Some(&selection)).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidPages(_)), "got {err:?}");
}

#[test]
fn non_pdf_file_fails_to_open() {
    let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    f.write_all(b"this is not a pdf").unwrap();
    f.flush().unwrap();

    let err = extract_tables(f.path(), 10, None).unwrap_err();
    assert!(matches!(err, ExtractError::Open { .. }), "got {err:?}");
}

#[test]
fn dry_run_names_tables_after_the_file() {
    let f = common::write_temp_pdf(&common::pdf_with_table(INVOICE));
    let stem = f.path().file_stem().unwrap().to_string_lossy().into_owned();
    let config = Config {
        file: f.path().to_path_buf(),
        ..Config::default()
    };

    let report = run(&config, None).unwrap();

    assert_eq!(report.raw_tables.len(), 1);
    assert_eq!(report.outcomes.len(), 1);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.index, 1);
    assert_eq!(outcome.page, 1);
    assert_eq!(outcome.name, format!("table_1_{stem}"));
    assert_eq!(outcome.status, TableStatus::Skipped);
    assert_eq!(outcome.table.columns, vec!["Item", "Qty", "Price"]);
    assert_eq!(report.tables_loaded(), 0);
}

#[test]
fn run_loads_detected_table_into_sink() {
    let f = common::write_temp_pdf(&common::pdf_with_table(INVOICE));
    let stem = f.path().file_stem().unwrap().to_string_lossy().into_owned();
    let name = format!("table_1_{stem}");
    let config = Config {
        file: f.path().to_path_buf(),
        ..Config::default()
    };
    let mut sink = RecordingSink::default();

    let report = run(&config, Some(&mut sink)).unwrap();

    assert_eq!(report.tables_loaded(), 1);
    assert_eq!(report.rows_inserted(), 2);
    assert_eq!(sink.schemas[&name], vec!["Item", "Qty", "Price"]);
    assert_eq!(
        sink.rows[&name][0],
        vec![
            CellValue::Text("Pen".into()),
            CellValue::Integer(3),
            CellValue::Integer(1200),
        ]
    );
}

#[test]
fn run_with_empty_path_fails() {
    let config = Config {
        file: PathBuf::new(),
        ..Config::default()
    };
    assert!(matches!(
        run(&config, None).unwrap_err(),
        ExtractError::NotFound(_)
    ));
}
