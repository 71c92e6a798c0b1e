//! In-memory trajectory table
//!
//! Column-wise storage of `(time, position, velocity)` rows in file order.
//! Rows are expected to be sorted by non-decreasing time; this is not
//! checked. The table is immutable once built.

use std::fmt;

/// The three columns every trajectory file must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Time,
    Position,
    Velocity,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Time, Column::Position, Column::Velocity];

    /// Header name in the input file (case-sensitive)
    pub fn name(self) -> &'static str {
        match self {
            Column::Time => "time",
            Column::Position => "position",
            Column::Velocity => "velocity",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sample of the trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
}

impl Row {
    pub fn new(time: f64, position: f64, velocity: f64) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }

    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Time => self.time,
            Column::Position => self.position,
            Column::Velocity => self.velocity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    time: Vec<f64>,
    position: Vec<f64>,
    velocity: Vec<f64>,
}

impl TimeSeriesTable {
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut table = Self::default();
        for row in rows {
            table.time.push(row.time);
            table.position.push(row.position);
            table.velocity.push(row.velocity);
        }
        table
    }

    /// Build from equally long columns. Returns None when lengths differ.
    pub fn from_columns(time: Vec<f64>, position: Vec<f64>, velocity: Vec<f64>) -> Option<Self> {
        if time.len() != position.len() || time.len() != velocity.len() {
            return None;
        }
        Some(Self {
            time,
            position,
            velocity,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn column(&self, column: Column) -> &[f64] {
        match column {
            Column::Time => &self.time,
            Column::Position => &self.position,
            Column::Velocity => &self.velocity,
        }
    }

    pub fn row(&self, index: usize) -> Option<Row> {
        Some(Row::new(
            *self.time.get(index)?,
            *self.position.get(index)?,
            *self.velocity.get(index)?,
        ))
    }

    pub fn first(&self) -> Option<Row> {
        self.row(0)
    }

    pub fn last(&self) -> Option<Row> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// `(x, y)` pairs in row order, e.g. `(Position, Velocity)` for the phase curve
    pub fn pairs(&self, x: Column, y: Column) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.column(x)
            .iter()
            .copied()
            .zip(self.column(y).iter().copied())
    }

    /// Min and max of the finite values in a column, None when there are none
    pub fn range(&self, column: Column) -> Option<(f64, f64)> {
        self.column(column)
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
            })
    }

    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.range(Column::Time)
    }

    pub fn position_range(&self) -> Option<(f64, f64)> {
        self.range(Column::Position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimeSeriesTable {
        TimeSeriesTable::from_rows([
            Row::new(0.0, 1.0, 0.0),
            Row::new(1.0, 0.0, 1.0),
            Row::new(2.0, -1.0, 0.0),
        ])
    }

    #[test]
    fn test_rows_keep_file_order() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert_eq!(table.first(), Some(Row::new(0.0, 1.0, 0.0)));
        assert_eq!(table.last(), Some(Row::new(2.0, -1.0, 0.0)));
        assert_eq!(table.column(Column::Position), &[1.0, 0.0, -1.0]);

        let phase: Vec<_> = table.pairs(Column::Position, Column::Velocity).collect();
        assert_eq!(phase, vec![(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)]);
    }

    #[test]
    fn test_ranges() {
        let table = sample();
        assert_eq!(table.time_range(), Some((0.0, 2.0)));
        assert_eq!(table.position_range(), Some((-1.0, 1.0)));
        assert_eq!(table.range(Column::Velocity), Some((0.0, 1.0)));
    }

    #[test]
    fn test_range_skips_non_finite() {
        let table = TimeSeriesTable::from_rows([
            Row::new(0.0, f64::NAN, f64::NAN),
            Row::new(1.0, 2.0, f64::NAN),
            Row::new(2.0, f64::INFINITY, f64::NAN),
            Row::new(3.0, -1.0, f64::NAN),
        ]);
        assert_eq!(table.range(Column::Position), Some((-1.0, 2.0)));
        assert_eq!(table.range(Column::Velocity), None);
    }

    #[test]
    fn test_empty_table() {
        let table = TimeSeriesTable::default();
        assert!(table.is_empty());
        assert_eq!(table.first(), None);
        assert_eq!(table.last(), None);
        assert_eq!(table.time_range(), None);
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        assert!(TimeSeriesTable::from_columns(vec![0.0], vec![1.0], vec![]).is_none());
        let table = TimeSeriesTable::from_columns(vec![0.0], vec![1.0], vec![2.0]).unwrap();
        assert_eq!(table.row(0).map(|r| r.get(Column::Velocity)), Some(2.0));
    }

    #[test]
    fn test_column_names() {
        let names: Vec<_> = Column::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["time", "position", "velocity"]);
    }
}
