use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BoardError, BoardResult};
use crate::hazard::HazardKeywords;
use crate::parser::ConditionParser;

/// Upper bound on shrink steps between the largest and smallest font size
pub const MAX_FIT_STEPS: f64 = 10_000.0;

/// Font-size bounds and spacing for the text fitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitConfig {
    pub max_font_size: f64,
    pub mid_font_size: f64,
    pub min_font_size: f64,
    pub font_step: f64,
    /// Horizontal padding inside an arrow, in pixels
    pub arrow_padding: f64,
    /// Multiplier turning `arrow_padding` into the fit buffer
    pub padding_factor: f64,
    /// Relative size of word tokens inside highlighted text
    pub word_scale: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_font_size: 15.0,
            mid_font_size: 12.0,
            min_font_size: 10.0,
            font_step: 0.5,
            arrow_padding: 5.0,
            padding_factor: 1.8,
            word_scale: 0.6,
        }
    }
}

impl FitConfig {
    /// Width reserved on top of the measured text
    pub fn buffer(&self) -> f64 {
        self.arrow_padding * self.padding_factor
    }

    pub fn validate(&self) -> BoardResult<()> {
        let fields = [
            ("maxFontSize", self.max_font_size),
            ("midFontSize", self.mid_font_size),
            ("minFontSize", self.min_font_size),
            ("fontStep", self.font_step),
            ("arrowPadding", self.arrow_padding),
            ("paddingFactor", self.padding_factor),
            ("wordScale", self.word_scale),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid_fit(field, format!("{} is not a finite number", value)));
            }
        }

        if self.min_font_size <= 0.0 {
            return Err(invalid_fit("minFontSize", "must be positive"));
        }
        if self.min_font_size > self.mid_font_size || self.mid_font_size > self.max_font_size {
            return Err(invalid_fit(
                "midFontSize",
                format!(
                    "sizes must satisfy min <= mid <= max (got {} / {} / {})",
                    self.min_font_size, self.mid_font_size, self.max_font_size
                ),
            ));
        }
        if self.font_step <= 0.0 {
            return Err(invalid_fit("fontStep", "must be positive"));
        }
        // A step below the float spacing at maxFontSize leaves the size unchanged
        if self.max_font_size - self.font_step >= self.max_font_size {
            return Err(invalid_fit(
                "fontStep",
                format!("{} is too small to change a {}px font", self.font_step, self.max_font_size),
            ));
        }
        if (self.max_font_size - self.min_font_size) / self.font_step > MAX_FIT_STEPS {
            return Err(invalid_fit(
                "fontStep",
                format!(
                    "{} needs more than {} steps from {}px to {}px",
                    self.font_step, MAX_FIT_STEPS, self.max_font_size, self.min_font_size
                ),
            ));
        }
        if self.arrow_padding < 0.0 || self.padding_factor < 0.0 {
            return Err(invalid_fit("arrowPadding", "padding must not be negative"));
        }
        if self.word_scale <= 0.0 || self.word_scale > 1.0 {
            return Err(invalid_fit("wordScale", "must be in (0, 1]"));
        }
        Ok(())
    }
}

fn invalid_fit(field: &str, reason: impl Into<String>) -> BoardError {
    BoardError::InvalidFitConfig {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Board grid: hourly columns and arrow geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub total_columns: usize,
    /// Hour of day shown above column 0
    pub start_hour: u32,
    pub cell_width: f64,
    pub arrow_height: f64,
    pub min_arrow_hours: usize,
    pub max_arrow_hours: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            total_columns: 18,
            start_hour: 7,
            cell_width: 60.0,
            arrow_height: 22.0,
            min_arrow_hours: 1,
            max_arrow_hours: 18,
        }
    }
}

impl GridConfig {
    /// Two-digit hour label for a column, wrapping past midnight
    pub fn hour_label(&self, column: usize) -> String {
        let hour = (self.start_hour as usize + column) % 24;
        format!("{:02}", hour)
    }

    pub fn validate(&self) -> BoardResult<()> {
        if self.total_columns == 0 {
            return Err(invalid_grid("totalColumns", "must be at least 1"));
        }
        if self.start_hour > 23 {
            return Err(invalid_grid("startHour", "must be an hour of day (0-23)"));
        }
        if !self.cell_width.is_finite() || self.cell_width <= 0.0 {
            return Err(invalid_grid("cellWidth", "must be a positive number"));
        }
        if !self.arrow_height.is_finite() || self.arrow_height <= 0.0 {
            return Err(invalid_grid("arrowHeight", "must be a positive number"));
        }
        if self.min_arrow_hours == 0 || self.min_arrow_hours > self.max_arrow_hours {
            return Err(invalid_grid(
                "minArrowHours",
                "must satisfy 1 <= minArrowHours <= maxArrowHours",
            ));
        }
        Ok(())
    }
}

fn invalid_grid(field: &str, reason: &str) -> BoardError {
    BoardError::InvalidGridConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Everything configurable about the board, typically loaded from YAML:
///
/// ```yaml
/// fit:
///   maxFontSize: 16
///   minFontSize: 9
/// grid:
///   startHour: 6
/// hazardKeywords: [туман, гроза, "ледяной дождь"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    pub fit: FitConfig,
    pub grid: GridConfig,
    /// Replaces the built-in hazard keyword table when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_keywords: Option<Vec<String>>,
}

impl BoardConfig {
    pub fn from_yaml(yaml: &str) -> BoardResult<Self> {
        let config: BoardConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> BoardResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> BoardResult<()> {
        self.fit.validate()?;
        self.grid.validate()?;
        self.keywords().map(|_| ())
    }

    pub fn keywords(&self) -> BoardResult<HazardKeywords> {
        match &self.hazard_keywords {
            Some(list) => HazardKeywords::from_list(list),
            None => Ok(HazardKeywords::builtin()),
        }
    }

    pub fn parser(&self) -> BoardResult<ConditionParser> {
        Ok(ConditionParser::with_keywords(self.keywords()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BoardConfig::default().validate().is_ok());
        assert_eq!(FitConfig::default().buffer(), 5.0 * 1.8);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BoardConfig::from_yaml("fit:\n  maxFontSize: 16\ngrid:\n  startHour: 6\n").unwrap();
        assert_eq!(config.fit.max_font_size, 16.0);
        assert_eq!(config.fit.min_font_size, 10.0);
        assert_eq!(config.grid.start_hour, 6);
        assert_eq!(config.grid.total_columns, 18);
        assert!(config.hazard_keywords.is_none());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = BoardConfig::from_yaml("{}").unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_rejects_inverted_font_sizes() {
        let result = BoardConfig::from_yaml("fit:\n  minFontSize: 13\n");
        assert!(matches!(result, Err(BoardError::InvalidFitConfig { .. })));
    }

    #[test]
    fn test_rejects_zero_step() {
        let fit = FitConfig {
            font_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            fit.validate(),
            Err(BoardError::InvalidFitConfig { field, .. }) if field == "fontStep"
        ));
    }

    #[test]
    fn test_rejects_step_below_float_spacing() {
        let fit = FitConfig {
            font_step: 1e-20,
            ..Default::default()
        };
        assert!(matches!(
            fit.validate(),
            Err(BoardError::InvalidFitConfig { field, .. }) if field == "fontStep"
        ));
    }

    #[test]
    fn test_rejects_step_needing_too_many_measurements() {
        let fit = FitConfig {
            font_step: 1e-9,
            ..Default::default()
        };
        assert!(matches!(
            fit.validate(),
            Err(BoardError::InvalidFitConfig { field, .. }) if field == "fontStep"
        ));

        let result = BoardConfig::from_yaml("fit:\n  fontStep: 0.0000001\n");
        assert!(matches!(result, Err(BoardError::InvalidFitConfig { .. })));
    }

    #[test]
    fn test_accepts_fine_and_coarse_steps() {
        for font_step in [0.001, 0.5, 20.0] {
            let fit = FitConfig {
                font_step,
                ..Default::default()
            };
            assert!(fit.validate().is_ok(), "step {}", font_step);
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        let fit = FitConfig {
            max_font_size: f64::NAN,
            ..Default::default()
        };
        assert!(fit.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_grid() {
        let grid = GridConfig {
            start_hour: 24,
            ..Default::default()
        };
        assert!(matches!(grid.validate(), Err(BoardError::InvalidGridConfig { .. })));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = BoardConfig::from_yaml("fit: [1, 2");
        assert!(matches!(result, Err(BoardError::YamlError(_))));
    }

    #[test]
    fn test_custom_keywords() {
        let config = BoardConfig::from_yaml("hazardKeywords: [пыль, \"пыльная буря\"]").unwrap();
        let parser = config.parser().unwrap();
        assert_eq!(parser.keywords().len(), 2);
        assert!(BoardConfig::from_yaml("hazardKeywords: [\"\"]").is_err());
    }

    #[test]
    fn test_hour_labels() {
        let grid = GridConfig::default();
        assert_eq!(grid.hour_label(0), "07");
        assert_eq!(grid.hour_label(17), "00");
        assert_eq!(grid.hour_label(3), "10");
    }
}
