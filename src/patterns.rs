//! Height×visibility shorthand (`600х6`, `50х0.6`) and the text helpers shared
//! by the parser, the classifier and the text fitter.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

/// Ceiling at or below which a pattern is highlighted as dangerous.
pub const DANGEROUS_MAX_HEIGHT: f64 = 100.0;
/// Visibility strictly below which a pattern is highlighted as dangerous.
pub const DANGEROUS_MIN_VISIBILITY: f64 = 1.0;

/// A `<ceiling><х|x><visibility>` match found in condition text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightVisibilityPattern {
    pub height: f64,
    pub visibility: f64,
    /// The exact matched substring, separator and inner whitespace included
    pub raw_match: String,
    /// Byte range of `raw_match` in the searched text
    #[serde(skip)]
    pub range: Range<usize>,
}

impl HeightVisibilityPattern {
    /// Low ceiling or sub-kilometre visibility.
    ///
    /// This is the highlight rule only; tiering lives in [`crate::risk`] and
    /// uses its own bands.
    pub fn is_dangerous(&self) -> bool {
        self.height <= DANGEROUS_MAX_HEIGHT || self.visibility < DANGEROUS_MIN_VISIBILITY
    }
}

/// How strictly the separator must bind the two numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSyntax {
    /// Whitespace allowed around the separator (`600 х 6`)
    Loose,
    /// Digits glued to the separator (`600х6`)
    Compact,
}

fn loose_regex() -> &'static Regex {
    static LOOSE: OnceLock<Regex> = OnceLock::new();
    LOOSE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*[хx]\s*(\d+(?:\.\d+)?)").unwrap())
}

fn compact_regex() -> &'static Regex {
    static COMPACT: OnceLock<Regex> = OnceLock::new();
    COMPACT.get_or_init(|| Regex::new(r"(?i)(\d+)[хx](\d+(?:\.\d+)?)").unwrap())
}

/// Extract every height×visibility pattern in `text`, left to right.
///
/// Captures that do not parse as plain decimal floats (non-ASCII digits, for
/// instance) are skipped.
pub fn extract_patterns(text: &str, syntax: PatternSyntax) -> Vec<HeightVisibilityPattern> {
    let re = match syntax {
        PatternSyntax::Loose => loose_regex(),
        PatternSyntax::Compact => compact_regex(),
    };

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let raw_match = whole.as_str();
            let height = caps[1].parse::<f64>();
            let visibility = caps[2].parse::<f64>();
            match (height, visibility) {
                (Ok(height), Ok(visibility)) => Some(HeightVisibilityPattern {
                    height,
                    visibility,
                    raw_match: raw_match.to_string(),
                    range: whole.range(),
                }),
                _ => {
                    tracing::warn!(pattern = raw_match, "skipping unparseable height×visibility pattern");
                    None
                }
            }
        })
        .collect()
}

/// Collapse `"<dec> <int>х <int>х<dec>"` into `"<int>х<dec>"`.
///
/// Spreadsheet exports sometimes repeat the visibility in front of the pair,
/// e.g. `"0.6 50х 50х0.6"` for a plain `"50х0.6"`.
pub fn normalize_visibility_format(text: &str) -> String {
    static DUPLICATED: OnceLock<Regex> = OnceLock::new();
    let re = DUPLICATED.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s+(\d+)([хx])\s+\d+[хx](\d+(?:\.\d+)?)").unwrap()
    });
    re.replace_all(text, "${2}${3}${4}").into_owned()
}

/// True for a whole token like `600x6` or `50х0.6`
pub fn is_numeric_format(token: &str) -> bool {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    let re = NUMERIC.get_or_init(|| Regex::new(r"^\d+(?:х|x)\d+(?:\.\d+)?$").unwrap());
    re.is_match(token.trim())
}

/// Copy of `text` without the given byte ranges, which must be ordered and
/// non-overlapping
pub fn remove_ranges<'a, I>(text: &str, ranges: I) -> String
where
    I: IntoIterator<Item = &'a Range<usize>>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        out.push_str(&text[cursor..range.start]);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Collapse whitespace runs into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
