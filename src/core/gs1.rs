//! GS1 Application Identifier decoding.
//!
//! Scanners hand us the element string in "bracketed" human-readable form:
//! parenthesized two-digit AI codes immediately followed by their data, e.g.
//! `(01)00012345678905(17)251231(10)ABC123`. A single regex pass tokenizes
//! the string into (AI, value) pairs; each value runs up to the next AI
//! marker or the end of the string. Unknown AIs are tokenized and ignored.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::model::{Gs1Record, NOT_AVAILABLE};

/// AI 01: GTIN, fixed 14 characters per the GS1 general specification.
const AI_GTIN: &str = "01";
/// AI 10: batch/lot, variable length.
const AI_BATCH: &str = "10";
/// AI 17: expiration date, 6 digits YYMMDD.
const AI_EXPIRY: &str = "17";

const GTIN_WIDTH: usize = 14;
const EXPIRY_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gs1DecodeOptions {
    /// When set, an AI-01 value shorter than 14 characters is treated as
    /// absent instead of being passed through truncated.
    pub strict_gtin: bool,
}

#[derive(Debug)]
struct Gs1Element<'a> {
    ai: &'a str,
    value: &'a str,
}

fn ai_marker() -> &'static Regex {
    static AI_MARKER: OnceLock<Regex> = OnceLock::new();
    AI_MARKER.get_or_init(|| Regex::new(r"\(\d{2}\)").expect("AI marker pattern is valid"))
}

fn tokenize(raw: &str) -> Vec<Gs1Element<'_>> {
    let markers: Vec<regex::Match<'_>> = ai_marker().find_iter(raw).collect();
    let mut elements = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let value_end = markers.get(i + 1).map_or(raw.len(), |next| next.start());
        elements.push(Gs1Element {
            ai: &raw[marker.start() + 1..marker.end() - 1],
            value: &raw[marker.end()..value_end],
        });
    }
    elements
}

/// First occurrence of an AI wins, matching scanner output where repeated
/// elements are not meaningful.
fn first_value<'a>(elements: &[Gs1Element<'a>], ai: &str) -> Option<&'a str> {
    elements.iter().find(|e| e.ai == ai).map(|e| e.value)
}

/// Decode a GS1 element string with default options (permissive GTIN).
pub fn decode_gs1(raw: &str) -> Gs1Record {
    decode_gs1_with(raw, &Gs1DecodeOptions::default())
}

/// Decode a GS1 element string into expiry date, batch and GTIN.
///
/// Malformed input never errors: absent or unparseable elements come back as
/// `None` (or the `"N/A"` batch sentinel). The two-digit AI-17 year is mapped
/// into 2000–2099 unconditionally; expiry dates from 2100 on cannot be
/// represented. There is no rollover policy.
pub fn decode_gs1_with(raw: &str, options: &Gs1DecodeOptions) -> Gs1Record {
    let elements = tokenize(raw);

    let expiry_date_full = first_value(&elements, AI_EXPIRY).and_then(parse_expiry);

    let batch = match first_value(&elements, AI_BATCH) {
        Some(value) => trim_at_paren(value).to_string(),
        None => NOT_AVAILABLE.to_string(),
    };

    let gtin =
        first_value(&elements, AI_GTIN).and_then(|value| parse_gtin(value, options.strict_gtin));

    Gs1Record {
        expiry_date_full,
        batch,
        gtin,
    }
}

/// AI-17 carries YYMMDD. Anything other than exactly six leading ASCII
/// digits is malformed and yields `None`; partial dates are never guessed.
fn parse_expiry(value: &str) -> Option<String> {
    let digits: String = value.chars().take(EXPIRY_WIDTH).collect();
    if digits.chars().count() == EXPIRY_WIDTH && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(format!("20{}", digits))
    } else {
        None
    }
}

/// A batch value ends at the next `(`, even one that does not open a valid
/// AI marker.
fn trim_at_paren(value: &str) -> &str {
    match value.find('(') {
        Some(index) => &value[..index],
        None => value,
    }
}

fn parse_gtin(value: &str, strict: bool) -> Option<String> {
    let taken: String = value.chars().take(GTIN_WIDTH).collect();
    if taken.is_empty() {
        return None;
    }
    if strict && taken.chars().count() < GTIN_WIDTH {
        return None;
    }
    Some(taken)
}
