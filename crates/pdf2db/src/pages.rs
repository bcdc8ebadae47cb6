//! Page selection such as `"1,3-5"`.
//!
//! Parsing happens before the document is opened, so only syntax is checked
//! by [`FromStr`]. Ranges are kept as written and expanded by
//! [`PageSelection::resolve`] once they are known to fit the document.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Inclusive ranges of 1-based page numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<RangeInclusive<usize>>,
}

impl PageSelection {
    /// Convert to sorted, deduplicated 0-based page indices.
    ///
    /// Every range is checked against `page_count` before it is expanded.
    pub fn resolve(&self, page_count: usize) -> Result<Vec<usize>, String> {
        if let Some(last) = self.ranges.iter().map(|r| *r.end()).max() {
            if last > page_count {
                return Err(format!(
                    "page {last} exceeds document page count ({page_count})"
                ));
            }
        }
        let pages: BTreeSet<usize> = self.ranges.iter().cloned().flatten().collect();
        Ok(pages.into_iter().map(|p| p - 1).collect())
    }
}

fn parse_page(token: &str) -> Result<usize, String> {
    let token = token.trim();
    let page: usize = token
        .parse()
        .map_err(|_| format!("invalid page number: '{token}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    Ok(page)
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();

        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = parse_page(end)?;
                    if end < start {
                        return Err(format!("invalid range '{part}': end is before start"));
                    }
                    ranges.push(start..=end);
                }
                None => {
                    let page = parse_page(part)?;
                    ranges.push(page..=page);
                }
            }
        }

        if ranges.is_empty() {
            return Err("page selection is empty".to_string());
        }
        Ok(Self { ranges })
    }
}
