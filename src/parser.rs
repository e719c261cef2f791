use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::hazard::{HazardKeywords, HazardMatch};
use crate::patterns::{
    collapse_whitespace, extract_patterns, normalize_visibility_format, remove_ranges,
    HeightVisibilityPattern, PatternSyntax,
};

/// The three text parts of one cell as the arrow renders them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionText {
    pub main_text: String,
    /// Rendered emphasized (red); bracketed or auto-detected hazard content
    pub highlight_text: String,
    pub after_text: String,
}

impl ConditionText {
    pub fn is_empty(&self) -> bool {
        self.main_text.is_empty() && self.highlight_text.is_empty() && self.after_text.is_empty()
    }
}

/// How a cell's text was split, in precedence order.
///
/// An explicit `{…}` bracket always wins. Otherwise dangerous height×visibility
/// patterns are pulled out first, then hazard keywords from what is left.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// `before{inside}after`, parts kept untrimmed
    Bracket {
        before: String,
        inside: String,
        after: String,
    },
    /// Dangerous patterns and/or hazard keywords were found
    Hazard {
        remaining: String,
        patterns: Vec<HeightVisibilityPattern>,
        keywords: Vec<HazardMatch>,
    },
    /// Nothing to highlight
    Plain(String),
}

impl Segment {
    /// Flatten into the rendered text parts
    pub fn into_text(self) -> ConditionText {
        match self {
            Segment::Bracket {
                before,
                inside,
                after,
            } => ConditionText {
                main_text: format!("{} {}", before.trim(), after.trim())
                    .trim()
                    .to_string(),
                highlight_text: inside.trim().to_string(),
                after_text: String::new(),
            },
            Segment::Hazard {
                remaining,
                patterns,
                keywords,
            } => {
                let buffer: Vec<&str> = patterns
                    .iter()
                    .map(|p| p.raw_match.as_str())
                    .chain(keywords.iter().map(|k| k.matched.as_str()))
                    .collect();
                ConditionText {
                    main_text: remaining,
                    highlight_text: collapse_whitespace(&buffer.join(" ")),
                    after_text: String::new(),
                }
            }
            Segment::Plain(text) => ConditionText {
                main_text: text,
                ..Default::default()
            },
        }
    }

    /// Rebuild the bracketed source text. `None` for non-bracket segments,
    /// whose highlight was detected rather than written.
    pub fn reconstruct(&self) -> Option<String> {
        match self {
            Segment::Bracket {
                before,
                inside,
                after,
            } => Some(format!("{}{{{}}}{}", before, inside, after)),
            _ => None,
        }
    }
}

/// Splits raw cell text into main and highlighted parts
#[derive(Debug, Clone, Default)]
pub struct ConditionParser {
    keywords: HazardKeywords,
}

impl ConditionParser {
    /// Parser over the built-in hazard keyword table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(keywords: HazardKeywords) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &HazardKeywords {
        &self.keywords
    }

    /// Parse one raw cell. Never fails; empty input gives empty text.
    pub fn parse(&self, raw: &str) -> ConditionText {
        self.segment(raw).into_text()
    }

    /// Run the decision chain and report which branch applied
    pub fn segment(&self, raw: &str) -> Segment {
        let text = collapse_whitespace(raw);
        if text.is_empty() {
            return Segment::Plain(text);
        }

        if let Some(bracket) = split_bracket(&text) {
            return bracket;
        }

        self.detect_hazards(&text)
    }

    fn detect_hazards(&self, text: &str) -> Segment {
        let normalized = normalize_visibility_format(text);

        let patterns: Vec<HeightVisibilityPattern> =
            extract_patterns(&normalized, PatternSyntax::Loose)
                .into_iter()
                .filter(HeightVisibilityPattern::is_dangerous)
                .collect();

        let remaining = remove_ranges(&normalized, patterns.iter().map(|p| &p.range));

        let words: Vec<&str> = remaining.split_whitespace().collect();
        let mut keywords = Vec::new();
        let mut safe = Vec::new();
        let mut i = 0;
        while i < words.len() {
            match self.keywords.match_at(&words, i) {
                Some(hit) => {
                    i += hit.word_count;
                    keywords.push(hit);
                }
                None => {
                    safe.push(words[i]);
                    i += 1;
                }
            }
        }

        let remaining = safe.join(" ");
        if patterns.is_empty() && keywords.is_empty() {
            Segment::Plain(remaining)
        } else {
            Segment::Hazard {
                remaining,
                patterns,
                keywords,
            }
        }
    }
}

fn split_bracket(text: &str) -> Option<Segment> {
    static BRACKET: OnceLock<Regex> = OnceLock::new();
    let re = BRACKET.get_or_init(|| Regex::new(r"^(.*?)\{(.*?)\}(.*)$").unwrap());

    let caps = re.captures(text)?;
    Some(Segment::Bracket {
        before: caps[1].to_string(),
        inside: caps[2].to_string(),
        after: caps[3].to_string(),
    })
}
