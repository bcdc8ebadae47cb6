//! Ruling geometry read from page content streams.
//!
//! The pdfplumber 0.2 page interpreter collects text but discards painted
//! paths, which leaves the lattice strategy with no edges. The path
//! operators are replayed here with lopdf and pdfplumber's own
//! [`PathBuilder`] and [`extract_shapes`], so lines and rects come out in
//! the same top-left coordinate space as the page's chars.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Document, ObjectId};
use pdfplumber::{
    Ctm, Curve, GraphicsState, Line, Page, PaintedPath, PathBuilder, Rect, extract_shapes,
};

/// Painted shapes found on one page.
#[derive(Debug, Clone, Default)]
pub struct Rulings {
    pub lines: Vec<Line>,
    pub rects: Vec<Rect>,
    pub curves: Vec<Curve>,
}

impl Rulings {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.curves.is_empty()
    }
}

/// Content streams of a loaded document, keyed by 1-based page number.
pub struct RulingSource {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl RulingSource {
    pub fn load(bytes: &[u8]) -> Result<Self, lopdf::Error> {
        let doc = Document::load_mem(bytes)?;
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Replay the content stream of `page_number` (1-based).
    ///
    /// `page_height` is the MediaBox height used to flip y to top-left
    /// origin. A page number the document does not have yields no shapes.
    pub fn rulings(&self, page_number: usize, page_height: f64) -> Result<Rulings, lopdf::Error> {
        let Some(&page_id) = u32::try_from(page_number)
            .ok()
            .and_then(|n| self.pages.get(&n))
        else {
            return Ok(Rulings::default());
        };
        let bytes = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&bytes)?;
        Ok(replay(&content.operations, page_height))
    }
}

/// Interpret path construction, painting, and graphics-state operators.
///
/// Text, colour, and XObject operators are ignored.
pub fn replay(operations: &[Operation], page_height: f64) -> Rulings {
    let mut ctm = Ctm::identity();
    let mut gstate = GraphicsState::default();
    let mut saved: Vec<(Ctm, GraphicsState)> = Vec::new();
    let mut builder = PathBuilder::new(ctm);
    let mut rulings = Rulings::default();

    for op in operations {
        let args: Vec<f64> = op
            .operands
            .iter()
            .filter_map(|o| o.as_float().ok())
            .map(f64::from)
            .collect();

        let painted: Option<PaintedPath> = match op.operator.as_str() {
            "q" => {
                saved.push((ctm, gstate.clone()));
                None
            }
            "Q" => {
                if let Some((prev_ctm, prev_gstate)) = saved.pop() {
                    ctm = prev_ctm;
                    gstate = prev_gstate;
                    builder.set_ctm(ctm);
                }
                None
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers(&args) {
                    ctm = Ctm::new(a, b, c, d, e, f).concat(&ctm);
                    builder.set_ctm(ctm);
                }
                None
            }
            "w" => {
                if let Some([width]) = numbers(&args) {
                    gstate.line_width = width;
                }
                None
            }

            "m" => {
                if let Some([x, y]) = numbers(&args) {
                    builder.move_to(x, y);
                }
                None
            }
            "l" => {
                if let Some([x, y]) = numbers(&args) {
                    builder.line_to(x, y);
                }
                None
            }
            "c" => {
                if let Some([x1, y1, x2, y2, x3, y3]) = numbers(&args) {
                    builder.curve_to(x1, y1, x2, y2, x3, y3);
                }
                None
            }
            "v" => {
                if let Some([x2, y2, x3, y3]) = numbers(&args) {
                    builder.curve_to_v(x2, y2, x3, y3);
                }
                None
            }
            "y" => {
                if let Some([x1, y1, x3, y3]) = numbers(&args) {
                    builder.curve_to_y(x1, y1, x3, y3);
                }
                None
            }
            "re" => {
                if let Some([x, y, w, h]) = numbers(&args) {
                    builder.rectangle(x, y, w, h);
                }
                None
            }
            "h" => {
                builder.close_path();
                None
            }

            "S" => Some(builder.stroke(&gstate)),
            "s" => Some(builder.close_and_stroke(&gstate)),
            "f" | "F" => Some(builder.fill(&gstate)),
            "f*" => Some(builder.fill_even_odd(&gstate)),
            "B" => Some(builder.fill_and_stroke(&gstate)),
            "B*" => Some(builder.fill_even_odd_and_stroke(&gstate)),
            "b" => Some(builder.close_fill_and_stroke(&gstate)),
            "b*" => Some(builder.close_fill_even_odd_and_stroke(&gstate)),
            "n" => builder.end_path(),
            _ => None,
        };

        if let Some(painted) = painted {
            let (lines, rects, curves) = extract_shapes(&painted, page_height);
            rulings.lines.extend(lines);
            rulings.rects.extend(rects);
            rulings.curves.extend(curves);
        }
    }

    rulings
}

/// Rebuild `page` with `rulings` as its geometry.
///
/// Pages that already carry lines or rects are returned unchanged.
pub fn with_rulings(page: Page, rulings: Rulings) -> Page {
    if rulings.is_empty() || !page.lines().is_empty() || !page.rects().is_empty() {
        return page;
    }
    Page::with_geometry(
        page.page_number(),
        page.width(),
        page.height(),
        page.chars().to_vec(),
        rulings.lines,
        rulings.rects,
        rulings.curves,
    )
}

/// The first `N` operands, when there are at least that many.
fn numbers<const N: usize>(args: &[f64]) -> Option<[f64; N]> {
    args.get(..N)?.try_into().ok()
}
