use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patterns::{extract_patterns, HeightVisibilityPattern, PatternSyntax};

/// Operational "unavailable" marker; always classified Purple
pub const MINUS_MARKER: &str = "минус";

/// Arrow fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowColor {
    Green,
    Blue,
    Yellow,
    Red,
    Purple,
}

impl ArrowColor {
    pub const ALL: [ArrowColor; 5] = [
        ArrowColor::Green,
        ArrowColor::Blue,
        ArrowColor::Yellow,
        ArrowColor::Red,
        ArrowColor::Purple,
    ];

    /// Board fill color
    pub fn hex(self) -> &'static str {
        match self {
            ArrowColor::Green => "#E9FFEA",
            ArrowColor::Blue => "#DAE6F4",
            ArrowColor::Yellow => "#FFFECE",
            ArrowColor::Red => "#FDCDC9",
            ArrowColor::Purple => "#DEE7F6",
        }
    }

    /// Name shown in the board's color picker
    pub fn display_name(self) -> &'static str {
        match self {
            ArrowColor::Green => "Зеленый",
            ArrowColor::Blue => "Синий",
            ArrowColor::Yellow => "Желтый",
            ArrowColor::Red => "Красный",
            ArrowColor::Purple => "Фиолетовый",
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.hex().eq_ignore_ascii_case(hex))
    }

    /// Severity tier, `None` for the Purple minus marker
    pub fn tier(self) -> Option<Tier> {
        match self {
            ArrowColor::Green => Some(Tier::Green),
            ArrowColor::Blue => Some(Tier::Blue),
            ArrowColor::Yellow => Some(Tier::Yellow),
            ArrowColor::Red => Some(Tier::Red),
            ArrowColor::Purple => None,
        }
    }
}

impl fmt::Display for ArrowColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrowColor::Green => "green",
            ArrowColor::Blue => "blue",
            ArrowColor::Yellow => "yellow",
            ArrowColor::Red => "red",
            ArrowColor::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// Severity ranking, 1 (best) to 4 (worst). Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green = 1,
    Blue = 2,
    Yellow = 3,
    Red = 4,
}

impl Tier {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn color(self) -> ArrowColor {
        match self {
            Tier::Green => ArrowColor::Green,
            Tier::Blue => ArrowColor::Blue,
            Tier::Yellow => ArrowColor::Yellow,
            Tier::Red => ArrowColor::Red,
        }
    }

    /// First matching band in [`RISK_BANDS`]; Red when none matches
    pub fn for_pattern(pattern: &HeightVisibilityPattern) -> Tier {
        RISK_BANDS
            .iter()
            .find(|band| band.matches(pattern))
            .map(|band| band.tier)
            .unwrap_or(Tier::Red)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilityRule {
    /// Inclusive range
    Between(f64, f64),
    OneOf(&'static [f64]),
}

impl VisibilityRule {
    fn matches(&self, visibility: f64) -> bool {
        match *self {
            VisibilityRule::Between(lo, hi) => visibility >= lo && visibility <= hi,
            VisibilityRule::OneOf(values) => values.contains(&visibility),
        }
    }
}

/// A visibility rule paired with the ceilings it applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBand {
    pub tier: Tier,
    pub visibility: VisibilityRule,
    pub heights: &'static [f64],
}

impl RiskBand {
    pub fn matches(&self, pattern: &HeightVisibilityPattern) -> bool {
        self.visibility.matches(pattern.visibility) && self.heights.contains(&pattern.height)
    }
}

/// Band table, checked in order
pub const RISK_BANDS: &[RiskBand] = &[
    RiskBand {
        tier: Tier::Green,
        visibility: VisibilityRule::Between(4.0, 6.0),
        heights: &[1000.0, 600.0, 500.0, 400.0],
    },
    RiskBand {
        tier: Tier::Blue,
        visibility: VisibilityRule::OneOf(&[3.0]),
        heights: &[1000.0, 600.0, 500.0, 400.0, 300.0],
    },
    RiskBand {
        tier: Tier::Yellow,
        visibility: VisibilityRule::OneOf(&[1.0, 2.0]),
        heights: &[1000.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0],
    },
    RiskBand {
        tier: Tier::Yellow,
        visibility: VisibilityRule::Between(3.0, 6.0),
        heights: &[200.0, 100.0],
    },
];

/// Worst tier across all compact height×visibility patterns, `None` when the
/// text has none
pub fn worst_tier(raw: &str) -> Option<Tier> {
    let normalized = raw.to_lowercase();
    extract_patterns(&normalized, PatternSyntax::Compact)
        .iter()
        .map(Tier::for_pattern)
        .max()
}

/// Color for a raw cell.
///
/// The minus marker wins unconditionally. Text without any structured
/// pattern is treated as the worst case.
pub fn classify(raw: &str) -> ArrowColor {
    let normalized = raw.trim().to_lowercase();
    if normalized.contains(MINUS_MARKER) {
        return ArrowColor::Purple;
    }
    worst_tier(&normalized)
        .unwrap_or(Tier::Red)
        .color()
}
