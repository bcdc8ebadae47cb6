//! Table detection on PDF pages.
//!
//! Detection itself is done by [`pdfplumber`] with the lattice strategy:
//! cells are formed where horizontal and vertical ruling lines (and rect
//! edges) cross within the configured intersection tolerance. Page
//! geometry comes from [`crate::ruling`].

use std::path::Path;

use pdfplumber::{Pdf, Strategy, TableSettings};
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::model::RawTable;
use crate::pages::PageSelection;
use crate::ruling::{RulingSource, Rulings, with_rulings};

/// Minimum rows for a table to be kept: a header plus one data row.
pub const MIN_TABLE_ROWS: usize = 2;

/// Line-based detection settings with the given intersection tolerance.
///
/// The tolerance applies to both axes. All other settings keep the
/// pdfplumber defaults.
pub fn lattice_settings(intersection_tolerance: u32) -> TableSettings {
    let tolerance = f64::from(intersection_tolerance);
    TableSettings {
        strategy: Strategy::Lattice,
        intersection_tolerance: tolerance,
        intersection_x_tolerance: tolerance,
        intersection_y_tolerance: tolerance,
        ..TableSettings::default()
    }
}

/// Extract every table with a header and at least one data row.
///
/// Tables come back in page order, then in the order pdfplumber detected
/// them on the page.
///
/// # Errors
///
/// Fails if the file is missing or is not a readable PDF, if `pages`
/// names a page the document does not have, or if a page cannot be read.
pub fn extract_tables(
    path: &Path,
    intersection_tolerance: u32,
    pages: Option<&PageSelection>,
) -> Result<Vec<RawTable>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let open_error = |message: String| ExtractError::Open {
        path: path.to_path_buf(),
        message,
    };
    let bytes = std::fs::read(path).map_err(|e| open_error(e.to_string()))?;
    let pdf = Pdf::open(&bytes, None).map_err(|e| open_error(e.to_string()))?;
    let source = RulingSource::load(&bytes).map_err(|e| open_error(e.to_string()))?;

    let page_indices = match pages {
        Some(selection) => selection
            .resolve(pdf.page_count())
            .map_err(ExtractError::InvalidPages)?,
        None => (0..pdf.page_count()).collect(),
    };

    let settings = lattice_settings(intersection_tolerance);
    let mut tables = Vec::new();

    for idx in page_indices {
        let page_number = idx + 1;
        let page = pdf.page(idx).map_err(|e| ExtractError::Page {
            page: page_number,
            message: e.to_string(),
        })?;

        let rulings = source
            .rulings(page_number, page.media_box().height())
            .unwrap_or_else(|e| {
                warn!(page = page_number, error = %e, "could not read page rulings");
                Rulings::default()
            });
        let page = with_rulings(page, rulings);

        let found = page.find_tables(&settings);
        debug!(page = page_number, detected = found.len(), "scanned page");

        tables.extend(found.into_iter().filter_map(|table| {
            let rows = table
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.text).collect())
                .collect();
            accept_table(page_number, rows)
        }));
    }

    info!(
        file = %path.display(),
        tables = tables.len(),
        "extracted tables"
    );
    Ok(tables)
}

/// Wrap detected rows as a [`RawTable`], or drop them if there are fewer
/// than [`MIN_TABLE_ROWS`].
pub fn accept_table(page: usize, rows: Vec<Vec<Option<String>>>) -> Option<RawTable> {
    if rows.len() < MIN_TABLE_ROWS {
        debug!(page, rows = rows.len(), "skipping table without data rows");
        return None;
    }
    Some(RawTable::new(page, rows))
}
