use super::corrected::{corrected_times, CorrectionInput};
use super::error::ScoringError;
use super::rank::Lane;
use serde::Serialize;
use std::collections::BTreeMap;

/// Values closer than this count as the same value when finding the
/// second distinct one.
const DISTINCT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    First,
    Second,
}

/// Columns of the exhibition comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Expo,
    Straight,
    Lap,
    Turn,
    Corrected,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Expo,
        Column::Straight,
        Column::Lap,
        Column::Turn,
        Column::Corrected,
    ];

    pub fn direction(&self) -> Direction {
        match self {
            Column::Expo | Column::Lap | Column::Corrected => Direction::LowerIsBetter,
            Column::Straight | Column::Turn => Direction::HigherIsBetter,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Column::Expo => "展示",
            Column::Straight => "直線",
            Column::Lap => "一周",
            Column::Turn => "回り足",
            Column::Corrected => "補正",
        }
    }
}

/// Mark the best and second-best values of one column.
///
/// Every lane equal to the best value gets `First`; every lane equal to the
/// second-best *distinct* value gets `Second`. When all values are the same
/// nobody gets `Second`.
pub fn highlight_top2(values: &[(Lane, f64)], direction: Direction) -> BTreeMap<Lane, Highlight> {
    let mut distinct: Vec<f64> = values.iter().map(|(_, v)| *v).filter(|v| v.is_finite()).collect();
    distinct.sort_by(|a, b| a.total_cmp(b));
    if direction == Direction::HigherIsBetter {
        distinct.reverse();
    }
    distinct.dedup_by(|a, b| (*a - *b).abs() < DISTINCT_EPSILON);

    let same = |a: f64, b: f64| (a - b).abs() < DISTINCT_EPSILON;
    let mut highlights = BTreeMap::new();
    for (lane, value) in values {
        if let Some(first) = distinct.first() {
            if same(*value, *first) {
                highlights.insert(*lane, Highlight::First);
                continue;
            }
        }
        if let Some(second) = distinct.get(1) {
            if same(*value, *second) {
                highlights.insert(*lane, Highlight::Second);
            }
        }
    }
    highlights
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub lane: Lane,
    pub input: CorrectionInput,
    pub corrected: f64,
    pub highlights: BTreeMap<Column, Highlight>,
}

impl ComparisonRow {
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Expo => self.input.expo,
            Column::Straight => self.input.straight,
            Column::Lap => self.input.lap,
            Column::Turn => self.input.turn,
            Column::Corrected => self.corrected,
        }
    }

    pub fn highlight(&self, column: Column) -> Option<Highlight> {
        self.highlights.get(&column).copied()
    }
}

/// Build the comparison table in lane order, highlighting each column.
pub fn comparison_table(
    inputs: &BTreeMap<Lane, CorrectionInput>,
    bias: f64,
) -> Result<Vec<ComparisonRow>, ScoringError> {
    let times = corrected_times(inputs, bias)?;

    let mut rows: Vec<ComparisonRow> = inputs
        .iter()
        .map(|(lane, input)| ComparisonRow {
            lane: *lane,
            input: *input,
            corrected: times[lane],
            highlights: BTreeMap::new(),
        })
        .collect();

    for column in Column::ALL {
        let values: Vec<(Lane, f64)> = rows.iter().map(|r| (r.lane, r.value(column))).collect();
        let marks = highlight_top2(&values, column.direction());
        for row in rows.iter_mut() {
            if let Some(mark) = marks.get(&row.lane) {
                row.highlights.insert(column, *mark);
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Vec<(Lane, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as Lane + 1, *v))
            .collect()
    }

    #[test]
    fn test_second_place_uses_distinct_values() {
        let values = column(&[5.0, 5.0, 5.0, 6.0, 6.0, 7.0]);
        let marks = highlight_top2(&values, Direction::LowerIsBetter);
        assert_eq!(marks.get(&1), Some(&Highlight::First));
        assert_eq!(marks.get(&2), Some(&Highlight::First));
        assert_eq!(marks.get(&3), Some(&Highlight::First));
        assert_eq!(marks.get(&4), Some(&Highlight::Second));
        assert_eq!(marks.get(&5), Some(&Highlight::Second));
        assert_eq!(marks.get(&6), None);
    }

    #[test]
    fn test_higher_is_better_mirrors() {
        let values = column(&[5.0, 5.0, 5.0, 6.0, 6.0, 7.0]);
        let marks = highlight_top2(&values, Direction::HigherIsBetter);
        assert_eq!(marks.get(&6), Some(&Highlight::First));
        assert_eq!(marks.get(&4), Some(&Highlight::Second));
        assert_eq!(marks.get(&5), Some(&Highlight::Second));
        assert_eq!(marks.get(&1), None);
    }

    #[test]
    fn test_all_identical_has_no_second() {
        let values = column(&[6.8, 6.8, 6.8]);
        let marks = highlight_top2(&values, Direction::LowerIsBetter);
        assert_eq!(marks.len(), 3);
        assert!(marks.values().all(|m| *m == Highlight::First));
    }

    #[test]
    fn test_float_noise_does_not_split_ties() {
        let values = column(&[0.1 + 0.2, 0.3, 0.5]);
        let marks = highlight_top2(&values, Direction::LowerIsBetter);
        assert_eq!(marks.get(&1), Some(&Highlight::First));
        assert_eq!(marks.get(&2), Some(&Highlight::First));
        assert_eq!(marks.get(&3), Some(&Highlight::Second));
    }

    #[test]
    fn test_empty_column() {
        assert!(highlight_top2(&[], Direction::LowerIsBetter).is_empty());
    }

    fn run(expo: f64, straight: f64, lap: f64, turn: f64) -> CorrectionInput {
        CorrectionInput {
            expo,
            straight,
            lap,
            turn,
        }
    }

    #[test]
    fn test_comparison_table_columns() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, run(6.70, 7.0, 37.0, 5.0));
        inputs.insert(2, run(6.80, 7.2, 36.8, 4.0));
        inputs.insert(3, run(6.90, 6.9, 37.5, 3.0));

        let rows = comparison_table(&inputs, 0.0).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].lane, 1);

        assert_eq!(rows[0].highlight(Column::Expo), Some(Highlight::First));
        assert_eq!(rows[1].highlight(Column::Expo), Some(Highlight::Second));
        assert_eq!(rows[2].highlight(Column::Expo), None);

        assert_eq!(rows[1].highlight(Column::Straight), Some(Highlight::First));
        assert_eq!(rows[1].highlight(Column::Lap), Some(Highlight::First));
        assert_eq!(rows[0].highlight(Column::Turn), Some(Highlight::First));

        // 1: 6.70+3.70-0.35-0.10+0.05 = 10.00, 2: 6.80+3.68-0.36-0.08 = 10.04
        assert_eq!(rows[0].highlight(Column::Corrected), Some(Highlight::First));
        assert_eq!(rows[1].highlight(Column::Corrected), Some(Highlight::Second));
        assert!((rows[0].value(Column::Corrected) - 10.0).abs() < 1e-9);
    }
}
