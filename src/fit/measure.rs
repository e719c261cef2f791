//! Text measurement seam.
//!
//! The fitter never lays text out itself. It writes a [`TextStyle`] and asks a
//! [`Measure`] backend for the resulting box, the way a browser element is
//! restyled and then re-read after layout. Any shaping engine can sit behind
//! the trait; [`GlyphMetrics`] is a deterministic approximation used by the
//! CLI and tests.

use serde::{Deserialize, Serialize};

use super::tokens::FitContent;

/// Presentation directives for one text element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    /// Lines may break between tokens
    pub wrap: bool,
    /// Width available to wrapped lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    /// Content beyond `max_height` is hidden
    pub clip: bool,
}

impl TextStyle {
    /// Single line at `font_size`, nothing capped
    pub fn single_line(font_size: f64) -> Self {
        Self {
            font_size,
            wrap: false,
            max_width: None,
            max_height: None,
            clip: false,
        }
    }
}

/// Rendered size of a text element, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

impl TextBox {
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Measures content rendered with a given style
pub trait Measure {
    fn measure(&self, content: &FitContent, style: &TextStyle) -> TextBox;
}

impl<F> Measure for F
where
    F: Fn(&FitContent, &TextStyle) -> TextBox,
{
    fn measure(&self, content: &FitContent, style: &TextStyle) -> TextBox {
        self(content, style)
    }
}

/// Deterministic per-character advance widths, as fractions of the font size.
///
/// Wrapped text breaks greedily between tokens at `max_width`; a token wider
/// than a line overflows it and is reported at its full width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlyphMetrics {
    pub digit: f64,
    pub narrow: f64,
    pub lowercase: f64,
    pub uppercase: f64,
    pub space: f64,
    pub line_height: f64,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            digit: 0.56,
            narrow: 0.28,
            lowercase: 0.55,
            uppercase: 0.68,
            space: 0.28,
            line_height: 1.2,
        }
    }
}

impl GlyphMetrics {
    fn advance(&self, c: char) -> f64 {
        match c {
            '0'..='9' => self.digit,
            '.' | ',' | ':' | ';' | '!' | '\'' | '|' | 'i' | 'l' => self.narrow,
            c if c.is_whitespace() => self.space,
            c if c.is_uppercase() => self.uppercase,
            _ => self.lowercase,
        }
    }

    /// Width of one word at a font size
    pub fn word_width(&self, word: &str, font_size: f64) -> f64 {
        word.chars().map(|c| self.advance(c)).sum::<f64>() * font_size
    }
}

impl Measure for GlyphMetrics {
    fn measure(&self, content: &FitContent, style: &TextStyle) -> TextBox {
        let pieces = content.pieces();
        if pieces.is_empty() {
            return TextBox {
                width: 0.0,
                height: 0.0,
            };
        }

        let space = self.space * style.font_size;
        let line_limit = match (style.wrap, style.max_width) {
            (true, Some(width)) => width,
            _ => f64::INFINITY,
        };

        let mut lines = 1usize;
        let mut line_width = 0.0_f64;
        let mut widest = 0.0_f64;
        for (i, piece) in pieces.iter().enumerate() {
            let width = self.word_width(piece.text, style.font_size * piece.scale);
            if i == 0 {
                line_width = width;
            } else if line_width + space + width <= line_limit {
                line_width += space + width;
            } else {
                widest = widest.max(line_width);
                lines += 1;
                line_width = width;
            }
        }
        widest = widest.max(line_width);

        let mut height = lines as f64 * style.font_size * self.line_height;
        if style.clip {
            if let Some(max_height) = style.max_height {
                height = height.min(max_height);
            }
        }

        TextBox {
            width: widest,
            height,
        }
    }
}
