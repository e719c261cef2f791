//! # Airboard
//!
//! Core of an airport weather schedule board: airport rows crossed with hourly
//! columns, each run of columns covered by a colored arrow describing the
//! forecast condition.
//!
//! ## Features
//! - Condition text parsing: `{bracketed}` highlights, dangerous
//!   height×visibility pairs (`50х0.6`) and hazard keywords (`гроза`, `туман`)
//! - Risk classification into Green / Blue / Yellow / Red tiers, Purple for
//!   the `минус` marker
//! - Run merging of identical adjacent hourly cells into one arrow
//! - Text fitting: shrink and wrap arrow text into its box through a
//!   pluggable measurement backend
//!
//! ## Example
//! ```ignore
//! use airboard::{parse_cell, merge_cells, classify, ArrowColor};
//!
//! let condition = parse_cell("300х3 гроза").unwrap();
//! assert_eq!(condition.highlight_text, "гроза");
//! assert_eq!(classify("600х6"), ArrowColor::Green);
//!
//! let runs = merge_cells(&["600х6", "600х6", "", "600х6"]);
//! assert_eq!(runs.len(), 2);
//! ```

pub mod board;
pub mod condition;
pub mod config;
pub mod error;
pub mod fit;
pub mod hazard;
pub mod merge;
pub mod parser;
pub mod patterns;
pub mod risk;

// --- Core types ---
pub use board::{AirportRow, ArrowFit, ArrowGeometry, Board, ScheduleFile, ScheduleRow};
pub use condition::{ParsedCondition, PredefinedCondition, PREDEFINED_CONDITIONS};
pub use config::{BoardConfig, FitConfig, GridConfig};
pub use error::{BoardError, BoardResult};
pub use hazard::{HazardKeywords, HazardMatch, HAZARD_KEYWORDS};
pub use parser::{ConditionParser, ConditionText, Segment};
pub use patterns::HeightVisibilityPattern;
pub use risk::{classify, ArrowColor, Tier};

// --- Text fitting ---
pub use fit::{FitOutcome, FitResult, GlyphMetrics, Measure, TextFitter, TextStyle};

/// Split one raw cell into main / highlight / after text with the built-in
/// hazard keywords
pub fn parse_text(raw: &str) -> ConditionText {
    ConditionParser::new().parse(raw)
}

/// Parse and classify one raw cell; `None` for a blank cell
pub fn parse_cell(raw: &str) -> Option<ParsedCondition> {
    condition::parse_condition(&ConditionParser::new(), raw)
}

/// Parse a row of raw cells and merge identical neighbours into runs
pub fn merge_cells<S: AsRef<str>>(cells: &[S]) -> Vec<ParsedCondition> {
    merge::merge_row(&ConditionParser::new(), cells)
}

/// Fit condition text into a container with the default font bounds
pub fn fit_text<M: Measure + ?Sized>(
    text: &ConditionText,
    measure: &M,
    container_width: f64,
    container_height: f64,
) -> BoardResult<FitOutcome> {
    TextFitter::default().fit(text, measure, container_width, container_height)
}
