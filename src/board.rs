use serde::{Deserialize, Serialize};

use crate::condition::ParsedCondition;
use crate::config::{BoardConfig, GridConfig};
use crate::error::{BoardError, BoardResult};
use crate::fit::{FitOutcome, FitRequest, Measure, TextFitter};
use crate::merge::merge_row;
use crate::parser::ConditionParser;

/// Pixel placement of an arrow within its row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowGeometry {
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl ArrowGeometry {
    /// One pixel of inset on each side of the covered cells
    pub fn for_condition(grid: &GridConfig, condition: &ParsedCondition) -> Self {
        Self {
            left: condition.start_column as f64 * grid.cell_width + 1.0,
            width: condition.span_columns as f64 * grid.cell_width - 2.0,
            height: grid.arrow_height,
        }
    }
}

/// An airport row and its condition arrows, ordered by start column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportRow {
    pub airport: String,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub conditions: Vec<ParsedCondition>,
}

/// A row of raw cells as read from a schedule file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub airport: String,
    #[serde(default)]
    pub cells: Vec<String>,
}

/// Schedule file layout:
///
/// ```yaml
/// rows:
///   - airport: UUEE
///     cells: ["600х6", "600х6", "", "туман 50х0.6"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFile {
    #[serde(default)]
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleFile {
    pub fn from_yaml(yaml: &str) -> BoardResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Arrow text fitted to its geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFit {
    pub row: usize,
    pub condition: usize,
    pub geometry: ArrowGeometry,
    pub outcome: FitOutcome,
}

/// Airport rows crossed with hourly columns
#[derive(Debug, Clone, Default)]
pub struct Board {
    grid: GridConfig,
    parser: ConditionParser,
    fitter: TextFitter,
    rows: Vec<AirportRow>,
}

impl Board {
    pub fn new(config: &BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        Ok(Self {
            grid: config.grid.clone(),
            parser: config.parser()?,
            fitter: TextFitter::new(config.fit.clone())?,
            rows: Vec::new(),
        })
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Fitter built from the board's font settings
    pub fn fitter(&self) -> &TextFitter {
        &self.fitter
    }

    pub fn rows(&self) -> &[AirportRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> BoardResult<&AirportRow> {
        self.rows.get(index).ok_or(BoardError::RowNotFound { index })
    }

    /// Replace the board with a spreadsheet-shaped table.
    ///
    /// The first row is a header. Each following row holds the airport name
    /// and then one cell per hourly column. Rows without a name, or without
    /// any condition, are skipped. Returns the number of rows imported.
    pub fn import_table<R, S>(&mut self, table: &[R]) -> usize
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let rows = table.iter().skip(1).filter_map(|row| {
            let (name, cells) = row.as_ref().split_first()?;
            Some((name.as_ref().to_string(), cells))
        });
        self.import(rows)
    }

    /// Replace the board with the rows of a schedule file
    pub fn import_schedule(&mut self, schedule: &ScheduleFile) -> usize {
        self.import(
            schedule
                .rows
                .iter()
                .map(|row| (row.airport.clone(), row.cells.as_slice())),
        )
    }

    fn import<'a, I, S>(&mut self, rows: I) -> usize
    where
        I: Iterator<Item = (String, &'a [S])>,
        S: AsRef<str> + 'a,
    {
        self.rows.clear();
        for (name, cells) in rows {
            let airport = name.trim();
            if airport.is_empty() {
                continue;
            }

            let total = self.grid.total_columns;
            if cells.iter().skip(total).any(|c| !c.as_ref().trim().is_empty()) {
                tracing::warn!(airport, total, "ignoring cells beyond the last column");
            }
            let cells = &cells[..cells.len().min(total)];

            let conditions = merge_row(&self.parser, cells);
            if conditions.is_empty() {
                continue;
            }
            self.rows.push(AirportRow {
                airport: airport.to_string(),
                highlighted: false,
                conditions,
            });
        }
        tracing::debug!(rows = self.rows.len(), "board imported");
        self.rows.len()
    }

    /// Append a row, validating every condition's placement
    pub fn add_row(
        &mut self,
        airport: impl Into<String>,
        conditions: Vec<ParsedCondition>,
    ) -> BoardResult<usize> {
        for condition in &conditions {
            self.check_placement(condition)?;
        }
        let mut conditions = conditions;
        conditions.sort_by_key(|c| c.start_column);
        self.rows.push(AirportRow {
            airport: airport.into(),
            highlighted: false,
            conditions,
        });
        Ok(self.rows.len() - 1)
    }

    /// Insert a manually entered condition into a row
    pub fn add_condition(&mut self, row: usize, condition: ParsedCondition) -> BoardResult<()> {
        self.check_placement(&condition)?;
        let target = self
            .rows
            .get_mut(row)
            .ok_or(BoardError::RowNotFound { index: row })?;
        let at = target
            .conditions
            .partition_point(|c| c.start_column <= condition.start_column);
        target.conditions.insert(at, condition);
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> BoardResult<AirportRow> {
        if index >= self.rows.len() {
            return Err(BoardError::RowNotFound { index });
        }
        Ok(self.rows.remove(index))
    }

    /// Move a row so it ends up at index `to`
    pub fn move_row(&mut self, from: usize, to: usize) -> BoardResult<()> {
        let len = self.rows.len();
        if from >= len {
            return Err(BoardError::RowNotFound { index: from });
        }
        if to >= len {
            return Err(BoardError::RowNotFound { index: to });
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        Ok(())
    }

    /// Flip a row's highlight flag and return the new state
    pub fn toggle_highlight(&mut self, index: usize) -> BoardResult<bool> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(BoardError::RowNotFound { index })?;
        row.highlighted = !row.highlighted;
        Ok(row.highlighted)
    }

    pub fn geometry(&self, condition: &ParsedCondition) -> ArrowGeometry {
        ArrowGeometry::for_condition(&self.grid, condition)
    }

    /// Fit every arrow's text into its arrow, in parallel
    pub fn fit_all<M>(&self, measure: &M) -> BoardResult<Vec<ArrowFit>>
    where
        M: Measure + Sync + ?Sized,
    {
        let mut placements = Vec::new();
        let mut requests = Vec::new();
        for (row_index, row) in self.rows.iter().enumerate() {
            for (condition_index, condition) in row.conditions.iter().enumerate() {
                let geometry = self.geometry(condition);
                placements.push((row_index, condition_index, geometry));
                requests.push(FitRequest {
                    text: condition.text(),
                    container_width: geometry.width.max(0.0),
                    container_height: geometry.height,
                });
            }
        }

        self.fitter
            .fit_batch(&requests, measure)
            .into_iter()
            .zip(placements)
            .map(|(outcome, (row, condition, geometry))| {
                Ok(ArrowFit {
                    row,
                    condition,
                    geometry,
                    outcome: outcome?,
                })
            })
            .collect()
    }

    fn check_placement(&self, condition: &ParsedCondition) -> BoardResult<()> {
        let grid = &self.grid;
        let span = condition.span_columns;
        if span < grid.min_arrow_hours || span > grid.max_arrow_hours {
            return Err(BoardError::InvalidSpan {
                span,
                min: grid.min_arrow_hours,
                max: grid.max_arrow_hours,
            });
        }
        if condition.end_column() > grid.total_columns {
            return Err(BoardError::ColumnOutOfRange {
                start: condition.start_column,
                span,
                total: grid.total_columns,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitConfig;
    use crate::fit::{FitStage, GlyphMetrics};
    use crate::risk::ArrowColor;

    fn board() -> Board {
        Board::new(&BoardConfig::default()).unwrap()
    }

    #[test]
    fn test_geometry() {
        let grid = GridConfig::default();
        let condition = ParsedCondition::from_parts("600х6", "", "", ArrowColor::Green).at(2, 3);
        let geometry = ArrowGeometry::for_condition(&grid, &condition);
        assert_eq!(geometry.left, 121.0);
        assert_eq!(geometry.width, 178.0);
        assert_eq!(geometry.height, 22.0);
    }

    #[test]
    fn test_import_table_skips_header_and_blank_rows() {
        let table = vec![
            vec!["Аэродром", "07", "08", "09"],
            vec!["UUEE", "600х6", "600х6", "300х3"],
            vec!["  ", "600х6", "", ""],
            vec!["UUDD", "", "", ""],
            vec!["ULLI", "минус", "", "гроза"],
        ];
        let mut board = board();
        assert_eq!(board.import_table(&table), 2);
        assert_eq!(board.rows()[0].airport, "UUEE");
        assert_eq!(board.rows()[0].conditions.len(), 2);
        assert_eq!(board.rows()[1].airport, "ULLI");
        assert_eq!(board.rows()[1].conditions[1].start_column, 2);
    }

    #[test]
    fn test_import_truncates_to_grid() {
        let mut cells = vec!["600х6".to_string(); 20];
        cells.insert(0, "UUEE".to_string());
        let table = vec![vec!["header".to_string()], cells];
        let mut board = board();
        board.import_table(&table);
        let run = &board.rows()[0].conditions[0];
        assert_eq!(run.span_columns, 18);
    }

    #[test]
    fn test_add_condition_validates_placement() {
        let mut board = board();
        let row = board.add_row("UUEE", Vec::new()).unwrap();

        let late = ParsedCondition::from_parts("a", "", "", ArrowColor::Red).at(17, 2);
        assert!(matches!(
            board.add_condition(row, late),
            Err(BoardError::ColumnOutOfRange { .. })
        ));

        let long = ParsedCondition::from_parts("a", "", "", ArrowColor::Red).at(0, 19);
        assert!(matches!(
            board.add_condition(row, long),
            Err(BoardError::InvalidSpan { .. })
        ));

        let ok = ParsedCondition::from_parts("600х6", "", "до 12", ArrowColor::Green).at(4, 2);
        board.add_condition(row, ok).unwrap();
        let early = ParsedCondition::from_parts("300х3", "", "", ArrowColor::Blue).at(1, 1);
        board.add_condition(row, early).unwrap();

        let starts: Vec<usize> = board.rows()[row]
            .conditions
            .iter()
            .map(|c| c.start_column)
            .collect();
        assert_eq!(starts, vec![1, 4]);
        assert_eq!(board.rows()[row].conditions[1].after_text, "до 12");
    }

    #[test]
    fn test_row_operations() {
        let mut board = board();
        board.add_row("A", Vec::new()).unwrap();
        board.add_row("B", Vec::new()).unwrap();
        board.add_row("C", Vec::new()).unwrap();

        board.move_row(0, 2).unwrap();
        let names: Vec<&str> = board.rows().iter().map(|r| r.airport.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);

        assert!(board.toggle_highlight(1).unwrap());
        assert!(!board.toggle_highlight(1).unwrap());

        let removed = board.remove_row(0).unwrap();
        assert_eq!(removed.airport, "B");
        assert!(matches!(board.remove_row(5), Err(BoardError::RowNotFound { index: 5 })));
        assert!(board.move_row(0, 9).is_err());
    }

    #[test]
    fn test_fit_all_covers_every_arrow() {
        let table = vec![
            vec!["", "07", "08"],
            vec!["UUEE", "600х6", "туман интенсивный дождь 50х0.6"],
            vec!["UUWW", "300х3", "300х3"],
        ];
        let mut board = board();
        board.import_table(&table);
        let fits = board.fit_all(&GlyphMetrics::default()).unwrap();
        assert_eq!(fits.len(), 3);
        assert_eq!((fits[1].row, fits[1].condition), (0, 1));
        assert_eq!(fits[2].geometry.width, 118.0);
        for fit in &fits {
            let size = fit.outcome.result.font_size_px;
            assert!((10.0..=15.0).contains(&size));
        }
        assert_eq!(fits[0].outcome.stage, FitStage::Start);
        // The long hazard cell only fits a single 58px arrow once wrapped
        assert_eq!(fits[1].outcome.stage, FitStage::EnableWrap);
        assert!(fits[1].outcome.result.wrapped);
    }

    #[test]
    fn test_fit_all_uses_configured_font_sizes() {
        let config = BoardConfig {
            fit: FitConfig {
                max_font_size: 18.0,
                mid_font_size: 14.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut board = Board::new(&config).unwrap();
        board.import_table(&[vec!["", "07", "08"], vec!["UUEE", "600х6", "600х6"]]);
        assert_eq!(board.fitter().config().max_font_size, 18.0);

        let fits = board.fit_all(&GlyphMetrics::default()).unwrap();
        assert_eq!(fits.len(), 1);
        assert_eq!(fits[0].outcome.stage, FitStage::Start);
        assert_eq!(fits[0].outcome.result.font_size_px, 18.0);
    }

    #[test]
    fn test_board_rejects_invalid_fit_config() {
        let config = BoardConfig {
            fit: FitConfig {
                font_step: 1e-20,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            Board::new(&config),
            Err(BoardError::InvalidFitConfig { .. })
        ));
    }
}
