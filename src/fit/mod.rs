//! # Text fitting
//!
//! Lays condition text out inside a fixed-width arrow without overflow. The
//! fitter walks four stages and stops at the first one whose measurement
//! fits the container minus a padding buffer:
//!
//! 1. **Start**: maximum font size, single line
//! 2. **ShrinkNoWrap**: step the size down towards the mid size
//! 3. **EnableWrap**: let tokens wrap, cap and clip the height
//! 4. **ShrinkWithWrap**: keep stepping down towards the minimum size
//!
//! If nothing fits the text is left at the minimum size, wrapped and clipped.
//! Highlighted text is split into numeric tokens (`600x6`, kept at full size)
//! and words (shrunk), so the operational numbers stay legible.
//!
//! ## Usage
//! ```ignore
//! use airboard::fit::{GlyphMetrics, TextFitter};
//!
//! let fitter = TextFitter::default();
//! let outcome = fitter.fit(&condition.text(), &GlyphMetrics::default(), 118.0, 22.0)?;
//! ```

pub mod fitter;
pub mod measure;
pub mod tokens;

pub use fitter::{FitOutcome, FitRequest, FitResult, FitStage, TextFitter};
pub use measure::{GlyphMetrics, Measure, TextBox, TextStyle};
pub use tokens::{decompose, FitContent, TokenKind, TokenSpan};
