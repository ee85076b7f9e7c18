/*!
 * Text chunking for translation requests.
 *
 * Long raw content is normalized once, then packed greedily into chunks that
 * stay under a character bound while respecting paragraph boundaries where
 * possible. Only paragraphs that are themselves oversized get hard-split at
 * fixed character offsets.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum characters per chunk
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 12_000;

/// Separator re-inserted between paragraphs packed into the same chunk; its
/// length is budgeted during packing
const PARAGRAPH_SEPARATOR: &str = "\n\n";

// ASCII control characters except \n and \r
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x09\x0B\x0C\x0E-\x1F\x7F]").unwrap());

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

static SPACE_BEFORE_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r" \n").unwrap());

static SPACE_AFTER_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n ").unwrap());

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

static ANY_NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Normalize raw text before chunking. Idempotent.
///
/// Strips control characters, unifies line endings, collapses horizontal
/// whitespace runs, trims around newlines, and caps consecutive newlines at
/// two (a paragraph break).
pub fn normalize(text: &str) -> String {
    let cleaned = CONTROL_CHARS.replace_all(text, "");
    let cleaned = cleaned.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned = HORIZONTAL_WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = SPACE_BEFORE_NEWLINE.replace_all(&cleaned, "\n");
    let cleaned = SPACE_AFTER_NEWLINE.replace_all(&cleaned, "\n");
    let cleaned = EXCESS_NEWLINES.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}

/// Split text into translation-sized chunks of at most `max_chars` characters.
///
/// The input is normalized first, then split on paragraph breaks and packed
/// greedily in order. When a document has almost no blank-line paragraphs but
/// is still long, it is re-split on single newlines instead. A paragraph
/// longer than the bound is hard-split into consecutive `max_chars`-character
/// slices; those slices may end mid-word.
pub fn smart_split(text: &str, max_chars: usize) -> Vec<String> {
    let clean = normalize(text);
    if clean.is_empty() {
        return Vec::new();
    }

    let mut paragraphs: Vec<&str> = PARAGRAPH_BREAK.split(&clean).collect();

    // Single-spaced or oddly formatted documents have no blank-line breaks;
    // fall back to line-level splitting so packing still has units to work with
    if paragraphs.len() < 5 && clean.chars().count() > max_chars {
        paragraphs = ANY_NEWLINE_RUN.split(&clean).collect();
        warn!(
            "Sparse paragraph breaks in long text, re-split into {} lines",
            paragraphs.len()
        );
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for para in paragraphs {
        let para_chars = para.chars().count();

        if para_chars > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            hard_split_into(para, max_chars, &mut chunks);
            continue;
        }

        // +2 budgets the paragraph separator added back when packing
        if current_chars + para_chars + PARAGRAPH_SEPARATOR.len() > max_chars
            && !current.is_empty()
        {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if current.is_empty() {
            current.push_str(para);
            current_chars = para_chars;
        } else {
            current.push_str(PARAGRAPH_SEPARATOR);
            current.push_str(para);
            current_chars += PARAGRAPH_SEPARATOR.len() + para_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Append fixed-length character slices of an oversized paragraph
fn hard_split_into(para: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut slice = String::with_capacity(max_chars);
    let mut count = 0usize;
    for ch in para.chars() {
        slice.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut slice));
            count = 0;
        }
    }
    if !slice.is_empty() {
        chunks.push(slice);
    }
}
