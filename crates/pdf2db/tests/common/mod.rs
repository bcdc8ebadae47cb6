//! PDF fixtures built with lopdf.

#![allow(dead_code)]

use std::io::Write;

use lopdf::{Document, Object, Stream, dictionary};

const LEFT: i64 = 100;
const TOP: i64 = 700;
const COL_WIDTH: i64 = 100;
const ROW_HEIGHT: i64 = 20;

/// Content stream for a ruled grid holding `cells`, one string per cell.
///
/// Rules are stroked `m`/`l` segments. Empty strings leave the cell
/// without text.
pub fn grid_content(cells: &[&[&str]], top: i64) -> String {
    let rows = cells.len() as i64;
    let cols = column_count(cells);
    let right = LEFT + cols * COL_WIDTH;
    let bottom = top - rows * ROW_HEIGHT;

    let mut content = String::from("1 w\n");
    for r in 0..=rows {
        let y = top - r * ROW_HEIGHT;
        content.push_str(&format!("{LEFT} {y} m {right} {y} l S\n"));
    }
    for c in 0..=cols {
        let x = LEFT + c * COL_WIDTH;
        content.push_str(&format!("{x} {top} m {x} {bottom} l S\n"));
    }
    content.push_str(&cell_text(cells, top));
    content
}

/// Same layout as [`grid_content`], with every cell stroked as a `re` box.
pub fn boxed_grid_content(cells: &[&[&str]], top: i64) -> String {
    let cols = column_count(cells);

    let mut content = String::from("0.5 w\n");
    for r in 0..cells.len() as i64 {
        let y = top - (r + 1) * ROW_HEIGHT;
        for c in 0..cols {
            let x = LEFT + c * COL_WIDTH;
            content.push_str(&format!("{x} {y} {COL_WIDTH} {ROW_HEIGHT} re S\n"));
        }
    }
    content.push_str(&cell_text(cells, top));
    content
}

fn column_count(cells: &[&[&str]]) -> i64 {
    cells.iter().map(|r| r.len()).max().unwrap_or(0) as i64
}

fn cell_text(cells: &[&[&str]], top: i64) -> String {
    let mut content = String::new();
    for (r, row) in cells.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let x = LEFT + c as i64 * COL_WIDTH + 10;
            let y = top - r as i64 * ROW_HEIGHT - 15;
            content.push_str(&format!("BT /F1 10 Tf {x} {y} Td ({text}) Tj ET\n"));
        }
    }
    content
}

/// Content stream with a single line of text and no rules.
pub fn text_content(text: &str) -> String {
    format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET")
}

/// Build a PDF with one page per content stream.
pub fn pdf_with_pages(contents: &[String]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let stream = Stream::new(dictionary! {}, content.clone().into_bytes());
        let content_id = doc.add_object(stream);
        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    });

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Single-page PDF with a ruled table.
pub fn pdf_with_table(cells: &[&[&str]]) -> Vec<u8> {
    pdf_with_pages(&[grid_content(cells, TOP)])
}

/// Write PDF bytes to a temporary `.pdf` file.
pub fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .prefix("invoice")
        .suffix(".pdf")
        .tempfile()
        .unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}
