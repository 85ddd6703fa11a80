//! DOM extraction: mapping listing nodes to plain records.
//!
//! Extraction runs over the rendered page source with [`scraper`], never over
//! the live session, so every mapping here is a pure function testable
//! against HTML fixtures. Field extraction is defensive: a missing
//! sub-element yields `""` rather than an error.

mod flight;
mod train;

pub use flight::{extract_ctrip_flights, extract_fliggy_flights, extract_qunar_flights};
pub use train::{extract_left_ticket_rows, extract_qunar_train_rows};

use crate::sources::SourceError;
use scraper::{ElementRef, Selector};

/// Parse a CSS selector literal.
pub(crate) fn css(selector: &str) -> Result<Selector, SourceError> {
    Selector::parse(selector)
        .map_err(|e| SourceError::Parse(format!("bad selector '{}': {}", selector, e)))
}

/// innerText-style cell text: fragments trimmed, empties dropped, internal
/// line breaks collapsed to commas so a multi-line cell stays a single
/// display line (raw newlines would break markdown table rows downstream).
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|fragment| fragment.split('\n'))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Text of the first descendant matching `selector`, or `""` when absent.
pub(crate) fn select_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(cell_text)
        .unwrap_or_default()
}

/// Text fragments of the first descendant matching `selector`, one entry per
/// displayed line. Used for cells that stack two values vertically.
pub(crate) fn select_lines(element: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    element
        .select(selector)
        .next()
        .map(|el| {
            el.text()
                .flat_map(|fragment| fragment.split('\n'))
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn cell_text_joins_lines_with_commas() {
        let html = Html::parse_fragment("<div>  东方航空 \n <span>MU5101</span>  </div>");
        let root = html.root_element();
        assert_eq!(cell_text(root), "东方航空,MU5101");
    }

    #[test]
    fn select_text_defaults_to_empty() {
        let html = Html::parse_fragment("<div><p>hi</p></div>");
        let missing = css(".nope").unwrap();
        assert_eq!(select_text(html.root_element(), &missing), "");
    }
}
