//! Summary statistics over a trajectory table

use super::table::{Column, TimeSeriesTable};
use crate::error::{ReportError, Result};
use std::fmt;

/// Min/max of position and velocity, plus half the peak-to-peak position range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    pub position_min: f64,
    pub position_max: f64,
    pub velocity_min: f64,
    pub velocity_max: f64,
    pub amplitude: f64,
}

impl SummaryStatistics {
    /// Compute statistics for a table with at least one finite value per column
    ///
    /// Non-finite values are skipped.
    pub fn from_table(table: &TimeSeriesTable) -> Result<Self> {
        let insufficient = || ReportError::InsufficientData {
            operation: "summary statistics",
            required: 1,
            found: 0,
        };
        let (position_min, position_max) =
            table.range(Column::Position).ok_or_else(insufficient)?;
        let (velocity_min, velocity_max) =
            table.range(Column::Velocity).ok_or_else(insufficient)?;

        Ok(Self {
            position_min,
            position_max,
            velocity_min,
            velocity_max,
            amplitude: (position_max - position_min) / 2.0,
        })
    }

    /// Console statistics block, one entry per line
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Position - Max: {:.6}, Min: {:.6}",
                self.position_max, self.position_min
            ),
            format!(
                "Velocity - Max: {:.6}, Min: {:.6}",
                self.velocity_max, self.velocity_min
            ),
            format!("Amplitude: {:.6}", self.amplitude),
        ]
    }
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SummaryStatistics {{ position: [{:.6}, {:.6}], velocity: [{:.6}, {:.6}], amplitude: {:.6} }}",
            self.position_min, self.position_max, self.velocity_min, self.velocity_max, self.amplitude
        )
    }
}

/// Row count and ranges printed right after loading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableOverview {
    pub rows: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub position_min: f64,
    pub position_max: f64,
}

impl TableOverview {
    pub fn from_table(table: &TimeSeriesTable) -> Result<Self> {
        let insufficient = || ReportError::InsufficientData {
            operation: "table overview",
            required: 1,
            found: 0,
        };
        let (time_min, time_max) = table.time_range().ok_or_else(insufficient)?;
        let (position_min, position_max) = table.position_range().ok_or_else(insufficient)?;

        Ok(Self {
            rows: table.len(),
            time_min,
            time_max,
            position_min,
            position_max,
        })
    }

    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("Total data points: {}", self.rows),
            format!("Time range: {:.2} to {:.2}", self.time_min, self.time_max),
            format!(
                "Position range: {:.2} to {:.2}",
                self.position_min, self.position_max
            ),
        ]
    }
}
