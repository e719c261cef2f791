use serde::{Deserialize, Serialize};

use crate::parser::{ConditionParser, ConditionText};
use crate::risk::{classify, ArrowColor, MINUS_MARKER};

/// One condition arrow: text parts, color and the columns it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCondition {
    pub main_text: String,
    pub highlight_text: String,
    #[serde(default)]
    pub after_text: String,
    pub color: ArrowColor,
    #[serde(default)]
    pub start_column: usize,
    #[serde(default = "default_span")]
    pub span_columns: usize,
}

fn default_span() -> usize {
    1
}

impl ParsedCondition {
    /// Caller-supplied structured condition (manual entry); one column at 0
    pub fn from_parts(
        main_text: impl Into<String>,
        highlight_text: impl Into<String>,
        after_text: impl Into<String>,
        color: ArrowColor,
    ) -> Self {
        Self {
            main_text: main_text.into(),
            highlight_text: highlight_text.into(),
            after_text: after_text.into(),
            color,
            start_column: 0,
            span_columns: 1,
        }
    }

    pub fn from_text(text: ConditionText, color: ArrowColor) -> Self {
        Self::from_parts(text.main_text, text.highlight_text, text.after_text, color)
    }

    /// Place the condition on the board
    pub fn at(mut self, start_column: usize, span_columns: usize) -> Self {
        self.start_column = start_column;
        self.span_columns = span_columns.max(1);
        self
    }

    /// First column after this condition's run
    pub fn end_column(&self) -> usize {
        self.start_column + self.span_columns
    }

    /// Same text parts and color; placement is ignored
    pub fn same_condition(&self, other: &ParsedCondition) -> bool {
        self.main_text == other.main_text
            && self.highlight_text == other.highlight_text
            && self.after_text == other.after_text
            && self.color == other.color
    }

    /// The arrow stands for the "unavailable" marker rather than weather
    pub fn is_minus(&self) -> bool {
        self.main_text == MINUS_MARKER
    }

    pub fn text(&self) -> ConditionText {
        ConditionText {
            main_text: self.main_text.clone(),
            highlight_text: self.highlight_text.clone(),
            after_text: self.after_text.clone(),
        }
    }
}

/// Parse and classify one raw cell.
///
/// `None` for blank cells, which carry no condition.
pub fn parse_condition(parser: &ConditionParser, raw: &str) -> Option<ParsedCondition> {
    if raw.trim().is_empty() {
        return None;
    }
    let text = parser.parse(raw);
    Some(ParsedCondition::from_text(text, classify(raw)))
}

/// A ready-made one-hour condition offered by the board's editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedCondition {
    pub condition: &'static str,
    pub hours: usize,
    pub color: ArrowColor,
}

pub const PREDEFINED_CONDITIONS: &[PredefinedCondition] = &[
    PredefinedCondition {
        condition: "600х6",
        hours: 1,
        color: ArrowColor::Green,
    },
    PredefinedCondition {
        condition: "300х3",
        hours: 1,
        color: ArrowColor::Blue,
    },
    PredefinedCondition {
        condition: "200х2",
        hours: 1,
        color: ArrowColor::Yellow,
    },
    PredefinedCondition {
        condition: "50х0.6",
        hours: 1,
        color: ArrowColor::Red,
    },
    PredefinedCondition {
        condition: MINUS_MARKER,
        hours: 1,
        color: ArrowColor::Purple,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cell_has_no_condition() {
        let parser = ConditionParser::new();
        assert_eq!(parse_condition(&parser, ""), None);
        assert_eq!(parse_condition(&parser, "   "), None);
    }

    #[test]
    fn test_parse_condition_combines_text_and_color() {
        let parser = ConditionParser::new();
        let condition = parse_condition(&parser, "300х3 гроза").unwrap();
        assert_eq!(condition.main_text, "300х3");
        assert_eq!(condition.highlight_text, "гроза");
        assert_eq!(condition.color, ArrowColor::Blue);
        assert_eq!(condition.start_column, 0);
        assert_eq!(condition.span_columns, 1);
    }

    #[test]
    fn test_predefined_conditions_match_classifier() {
        for predefined in PREDEFINED_CONDITIONS {
            assert_eq!(classify(predefined.condition), predefined.color);
            assert_eq!(predefined.hours, 1);
        }
    }

    #[test]
    fn test_minus_marker() {
        let parser = ConditionParser::new();
        let condition = parse_condition(&parser, " минус ").unwrap();
        assert!(condition.is_minus());
        assert_eq!(condition.color, ArrowColor::Purple);
    }

    #[test]
    fn test_same_condition_ignores_placement() {
        let a = ParsedCondition::from_parts("600х6", "", "", ArrowColor::Green).at(0, 2);
        let b = ParsedCondition::from_parts("600х6", "", "", ArrowColor::Green).at(5, 1);
        let c = ParsedCondition::from_parts("600х6", "", "", ArrowColor::Blue);
        assert!(a.same_condition(&b));
        assert!(!a.same_condition(&c));
        assert_eq!(a.end_column(), 2);
    }

    #[test]
    fn test_at_keeps_span_positive() {
        let condition = ParsedCondition::from_parts("a", "", "", ArrowColor::Red).at(3, 0);
        assert_eq!(condition.span_columns, 1);
    }
}
