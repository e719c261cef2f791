use serde::{Deserialize, Serialize};

use crate::parser::ConditionText;
use crate::patterns::is_numeric_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Height×visibility pair, rendered at the inherited size
    Numeric,
    /// Descriptive word, rendered shrunk
    Word,
}

/// One whitespace-separated token of highlighted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpan {
    pub text: String,
    pub kind: TokenKind,
    /// Size relative to the parent font size
    pub size_scale: f64,
}

/// Split highlighted text into numeric and word tokens.
///
/// Numeric tokens never shrink; words get `word_scale`.
pub fn decompose(highlight: &str, word_scale: f64) -> Vec<TokenSpan> {
    highlight
        .split_whitespace()
        .map(|word| {
            if is_numeric_format(word) {
                TokenSpan {
                    text: word.to_string(),
                    kind: TokenKind::Numeric,
                    size_scale: 1.0,
                }
            } else {
                TokenSpan {
                    text: word.to_string(),
                    kind: TokenKind::Word,
                    size_scale: word_scale,
                }
            }
        })
        .collect()
}

/// A piece of laid-out text: one word and its size relative to the parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece<'a> {
    pub text: &'a str,
    pub scale: f64,
    pub highlighted: bool,
}

/// Text handed to a measurement backend: the condition's text parts with the
/// highlight pre-split into sized tokens
#[derive(Debug, Clone, PartialEq)]
pub struct FitContent {
    pub text: ConditionText,
    pub highlight: Vec<TokenSpan>,
}

impl FitContent {
    pub fn new(text: ConditionText, word_scale: f64) -> Self {
        let highlight = decompose(&text.highlight_text, word_scale);
        Self { text, highlight }
    }

    /// Words in reading order: main text, highlight tokens, after text
    pub fn pieces(&self) -> Vec<Piece<'_>> {
        plain_pieces(&self.text.main_text)
            .chain(self.highlight.iter().map(|span| Piece {
                text: &span.text,
                scale: span.size_scale,
                highlighted: true,
            }))
            .chain(plain_pieces(&self.text.after_text))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn plain_pieces(text: &str) -> impl Iterator<Item = Piece<'_>> {
    text.split_whitespace().map(|text| Piece {
        text,
        scale: 1.0,
        highlighted: false,
    })
}
