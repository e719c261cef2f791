use crate::condition::{parse_condition, ParsedCondition};
use crate::parser::ConditionParser;

/// Merge per-column conditions into maximal runs of identical, strictly
/// contiguous conditions.
///
/// Columns must arrive in increasing index order. `None` (an empty cell)
/// closes the open run. Each incoming condition's own placement is ignored;
/// the emitted runs carry `start_column` and `span_columns`.
pub fn merge_runs<I>(columns: I) -> Vec<ParsedCondition>
where
    I: IntoIterator<Item = (usize, Option<ParsedCondition>)>,
{
    let mut runs = Vec::new();
    let mut open: Option<ParsedCondition> = None;

    for (column, cell) in columns {
        let Some(condition) = cell else {
            if let Some(run) = open.take() {
                emit(&mut runs, run);
            }
            continue;
        };

        let extends = open
            .as_ref()
            .is_some_and(|run| run.same_condition(&condition) && run.end_column() == column);

        if extends {
            if let Some(run) = open.as_mut() {
                run.span_columns += 1;
            }
        } else {
            if let Some(run) = open.take() {
                emit(&mut runs, run);
            }
            open = Some(condition.at(column, 1));
        }
    }

    if let Some(run) = open {
        emit(&mut runs, run);
    }
    runs
}

fn emit(runs: &mut Vec<ParsedCondition>, run: ParsedCondition) {
    tracing::debug!(
        start = run.start_column,
        span = run.span_columns,
        color = %run.color,
        "condition run"
    );
    runs.push(run);
}

/// Parse a row of raw cells (column 0 first) and merge it into runs
pub fn merge_row<S: AsRef<str>>(parser: &ConditionParser, cells: &[S]) -> Vec<ParsedCondition> {
    merge_runs(
        cells
            .iter()
            .enumerate()
            .map(|(column, raw)| (column, parse_condition(parser, raw.as_ref()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::ArrowColor;

    fn cond(main: &str, color: ArrowColor) -> ParsedCondition {
        ParsedCondition::from_parts(main, "", "", color)
    }

    fn spans(runs: &[ParsedCondition]) -> Vec<(usize, usize)> {
        runs.iter()
            .map(|r| (r.start_column, r.span_columns))
            .collect()
    }

    #[test]
    fn test_empty_cell_splits_runs() {
        let a = cond("600х6", ArrowColor::Green);
        let columns = vec![
            (0, Some(a.clone())),
            (1, Some(a.clone())),
            (2, Some(a.clone())),
            (3, None),
            (4, Some(a.clone())),
        ];
        let runs = merge_runs(columns);
        assert_eq!(spans(&runs), vec![(0, 3), (4, 1)]);
    }

    #[test]
    fn test_different_conditions_split_runs() {
        let a = cond("600х6", ArrowColor::Green);
        let b = cond("300х3", ArrowColor::Blue);
        let runs = merge_runs(vec![
            (0, Some(a.clone())),
            (1, Some(b.clone())),
            (2, Some(b)),
            (3, Some(a)),
        ]);
        assert_eq!(spans(&runs), vec![(0, 1), (1, 2), (3, 1)]);
        assert_eq!(runs[1].main_text, "300х3");
    }

    #[test]
    fn test_color_alone_splits_runs() {
        let runs = merge_runs(vec![
            (0, Some(cond("x", ArrowColor::Red))),
            (1, Some(cond("x", ArrowColor::Yellow))),
        ]);
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_gap_in_indices_splits_runs() {
        let a = cond("600х6", ArrowColor::Green);
        let runs = merge_runs(vec![(0, Some(a.clone())), (2, Some(a))]);
        assert_eq!(spans(&runs), vec![(0, 1), (2, 1)]);
    }

    #[test]
    fn test_no_conditions() {
        assert!(merge_runs(Vec::new()).is_empty());
        assert!(merge_runs(vec![(0, None), (1, None)]).is_empty());
    }

    #[test]
    fn test_merge_row_from_raw_cells() {
        let parser = ConditionParser::new();
        let cells = ["600х6", "600х6 ", "", "туман 50х0.6", "туман  50х0.6", "минус"];
        let runs = merge_row(&parser, &cells);
        assert_eq!(spans(&runs), vec![(0, 2), (3, 2), (5, 1)]);
        assert_eq!(runs[0].color, ArrowColor::Green);
        assert_eq!(runs[1].highlight_text, "50х0.6 туман");
        assert_eq!(runs[1].color, ArrowColor::Red);
        assert_eq!(runs[2].color, ArrowColor::Purple);
    }
}
