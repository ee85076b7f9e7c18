/*!
 * Markup segmentation.
 *
 * Splits a flat markup string into titled sections along heading boundaries
 * (`<h1>`..`<h6>`). No DOM is built: the input is walked linearly, producing an
 * alternating sequence of body and heading spans, and each heading is paired
 * with the body span that follows it.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Title used when a document contains no headings at all
pub const UNTITLED_SECTION_TITLE: &str = "Document Content";

// Opening heading tag, attributes allowed
static OPEN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<h([1-6])[^>]*>").unwrap());

// Closing tags, one per level; the regex crate has no backreferences so the
// matching close is looked up by the captured level digit
static CLOSE_HEADINGS: Lazy<[Regex; 6]> = Lazy::new(|| {
    [1, 2, 3, 4, 5, 6].map(|level| Regex::new(&format!(r"(?i)</h{}\s*>", level)).unwrap())
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// A titled document section extracted from markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading text with inline tags stripped
    pub title: String,

    /// Section markup, including the heading's own tag
    pub content: String,

    /// Heading depth, 1 = top-level
    pub level: u8,

    /// 0-based position among emitted sections
    pub order: usize,
}

/// One span of the alternating body/heading sequence
#[derive(Debug)]
enum Span<'a> {
    Body(&'a str),
    Heading {
        /// Full heading markup, open tag through close tag
        raw: &'a str,
        /// Text between the open and close tags
        inner: &'a str,
        level: u8,
    },
}

/// Split markup into ordered, titled sections.
///
/// Everything before the first heading is a preamble and is not emitted.
/// A heading whose stripped title is blank produces no section and does not
/// consume an order slot. Malformed headings (an open tag with no matching
/// close of the same level) are treated as ordinary body text.
pub fn segment(markup: &str) -> Vec<Section> {
    let spans = scan_spans(markup);

    let has_heading = spans.iter().any(|s| matches!(s, Span::Heading { .. }));
    if !has_heading {
        if markup.trim().is_empty() {
            return Vec::new();
        }
        return vec![Section {
            title: UNTITLED_SECTION_TITLE.to_string(),
            content: markup.to_string(),
            level: 1,
            order: 0,
        }];
    }

    let mut sections = Vec::new();
    let mut order = 0;
    let mut iter = spans.iter().peekable();

    // Skip the preamble
    while matches!(iter.peek(), Some(Span::Body(_))) {
        iter.next();
    }

    while let Some(span) = iter.next() {
        let Span::Heading { raw, inner, level } = span else {
            continue;
        };

        let title = strip_tags(inner);
        // The body is the span up to the next heading, possibly absent
        let body = match iter.peek() {
            Some(Span::Body(text)) => {
                iter.next();
                *text
            }
            _ => "",
        };

        if title.is_empty() {
            continue;
        }

        sections.push(Section {
            title,
            content: format!("{}{}", raw, body),
            level: *level,
            order,
        });
        order += 1;
    }

    sections
}

/// Remove all inline tags from a markup fragment and trim the result
pub fn strip_tags(fragment: &str) -> String {
    ANY_TAG.replace_all(fragment, "").trim().to_string()
}

/// Walk the markup once, producing alternating body and heading spans
fn scan_spans(markup: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    // Start of the pending body span
    let mut body_start = 0;
    // Where to search for the next open tag; advances past open tags that
    // never close so they fall through into body text
    let mut search_from = 0;

    while let Some(open) = OPEN_HEADING.captures_at(markup, search_from) {
        let open_match = open.get(0).unwrap();
        let level_digit = open.get(1).unwrap().as_str();
        let level: u8 = level_digit.parse().unwrap();

        let inner_start = open_match.end();
        let close = CLOSE_HEADINGS[(level - 1) as usize].find_at(markup, inner_start);

        let Some(close_match) = close else {
            search_from = open_match.end();
            continue;
        };

        if open_match.start() > body_start {
            spans.push(Span::Body(&markup[body_start..open_match.start()]));
        }
        spans.push(Span::Heading {
            raw: &markup[open_match.start()..close_match.end()],
            inner: &markup[inner_start..close_match.start()],
            level,
        });
        body_start = close_match.end();
        search_from = close_match.end();
    }

    if body_start < markup.len() {
        spans.push(Span::Body(&markup[body_start..]));
    }

    spans
}
