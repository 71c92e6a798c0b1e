//! Fixed figure layouts
//!
//! A [`FigureSpec`] describes every panel of the report figure: which columns
//! it plots, styling, markers, reference lines and legend. The layouts are
//! fixed per [`Variant`]; nothing here touches the drawing backend.

use crate::config::Variant;
use crate::series::Column;
use plotters::style::RGBColor;

/// matplotlib 'b', 'r' and 'g'
pub const BLUE: RGBColor = RGBColor(0, 0, 255);
pub const RED: RGBColor = RGBColor(255, 0, 0);
pub const GREEN: RGBColor = RGBColor(0, 128, 0);

/// Default grid line color (#b0b0b0)
pub const GRID_GRAY: RGBColor = RGBColor(176, 176, 176);

/// One polyline, drawn in table row order
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub x: Column,
    pub y: Column,
    pub color: RGBColor,
    pub alpha: f64,
    /// Line width in points
    pub width_pt: f64,
    /// Legend entry, None = not listed
    pub label: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAt {
    FirstRow,
    LastRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
}

/// A filled marker on a single row of the table
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub at: MarkerAt,
    pub x: Column,
    pub y: Column,
    pub shape: MarkerShape,
    pub color: RGBColor,
    /// Marker diameter in points
    pub size_pt: f64,
    pub label: Option<&'static str>,
}

/// Dashed lines through the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZeroLines {
    /// y = 0
    pub horizontal: bool,
    /// x = 0
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSizes {
    pub page_title_pt: f64,
    pub panel_title_pt: f64,
    pub axis_label_pt: f64,
    pub tick_pt: f64,
    pub legend_pt: f64,
    pub bold_titles: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<SeriesSpec>,
    pub markers: Vec<MarkerSpec>,
    pub zero_lines: ZeroLines,
    /// One data unit spans the same number of pixels on both axes
    pub equal_aspect: bool,
    pub legend: bool,
}

impl PanelSpec {
    /// Every column drawn along the x axis (series and markers)
    pub fn x_columns(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self.series.iter().map(|s| s.x).collect();
        columns.extend(self.markers.iter().map(|m| m.x));
        columns.dedup();
        columns
    }

    pub fn y_columns(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self.series.iter().map(|s| s.y).collect();
        columns.extend(self.markers.iter().map(|m| m.y));
        columns.dedup();
        columns
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    pub variant: Variant,
    /// Page title above the grid
    pub title: Option<String>,
    /// (rows, columns)
    pub grid: (usize, usize),
    /// Panels in row-major order
    pub panels: Vec<PanelSpec>,
    pub text: TextSizes,
    /// Opacity of the grid lines
    pub grid_alpha: f64,
}

impl FigureSpec {
    /// Build the fixed layout for a variant
    ///
    /// The page title is only used by the extended layout.
    pub fn for_variant(variant: Variant, title: Option<&str>) -> Self {
        match variant {
            Variant::Brief => Self::brief(),
            Variant::Extended => Self::extended(title),
        }
    }

    fn brief() -> Self {
        let zero = ZeroLines {
            horizontal: true,
            vertical: false,
        };

        let panels = vec![
            PanelSpec {
                title: "Position vs Time",
                x_label: "Time",
                y_label: "Position x",
                series: vec![line(Column::Time, Column::Position, BLUE, 1.0, 2.0, None)],
                markers: Vec::new(),
                zero_lines: zero,
                equal_aspect: false,
                legend: false,
            },
            PanelSpec {
                title: "Velocity vs Time",
                x_label: "Time",
                y_label: "Velocity u",
                series: vec![line(Column::Time, Column::Velocity, RED, 1.0, 2.0, None)],
                markers: Vec::new(),
                zero_lines: zero,
                equal_aspect: false,
                legend: false,
            },
            PanelSpec {
                title: "Phase Portrait",
                x_label: "Position x",
                y_label: "Velocity u",
                series: vec![line(Column::Position, Column::Velocity, GREEN, 1.0, 2.0, None)],
                markers: vec![marker(MarkerAt::FirstRow, MarkerShape::Circle, GREEN, None)],
                zero_lines: ZeroLines::default(),
                equal_aspect: true,
                legend: false,
            },
        ];

        Self {
            variant: Variant::Brief,
            title: None,
            grid: Variant::Brief.grid(),
            panels,
            text: TextSizes {
                page_title_pt: 16.0,
                panel_title_pt: 12.0,
                axis_label_pt: 10.0,
                tick_pt: 10.0,
                legend_pt: 10.0,
                bold_titles: false,
            },
            grid_alpha: 1.0,
        }
    }

    fn extended(title: Option<&str>) -> Self {
        let horizontal = ZeroLines {
            horizontal: true,
            vertical: false,
        };

        let panels = vec![
            PanelSpec {
                title: "Position vs Time",
                x_label: "Time (t)",
                y_label: "Position x(t)",
                series: vec![line(Column::Time, Column::Position, BLUE, 1.0, 1.5, None)],
                markers: Vec::new(),
                zero_lines: horizontal,
                equal_aspect: false,
                legend: false,
            },
            PanelSpec {
                title: "Velocity vs Time",
                x_label: "Time (t)",
                y_label: "Velocity u(t)",
                series: vec![line(Column::Time, Column::Velocity, RED, 1.0, 1.5, None)],
                markers: Vec::new(),
                zero_lines: horizontal,
                equal_aspect: false,
                legend: false,
            },
            PanelSpec {
                title: "Phase Portrait (Limit Cycle)",
                x_label: "Position x",
                y_label: "Velocity u",
                series: vec![line(Column::Position, Column::Velocity, GREEN, 0.7, 2.0, None)],
                markers: vec![
                    marker(MarkerAt::FirstRow, MarkerShape::Circle, GREEN, Some("Start")),
                    marker(MarkerAt::LastRow, MarkerShape::Square, RED, Some("End")),
                ],
                zero_lines: ZeroLines {
                    horizontal: true,
                    vertical: true,
                },
                equal_aspect: true,
                legend: true,
            },
            PanelSpec {
                title: "Position and Velocity",
                x_label: "Time (t)",
                y_label: "Amplitude",
                series: vec![
                    line(
                        Column::Time,
                        Column::Position,
                        BLUE,
                        1.0,
                        2.0,
                        Some("Position x(t)"),
                    ),
                    line(
                        Column::Time,
                        Column::Velocity,
                        RED,
                        1.0,
                        2.0,
                        Some("Velocity u(t)"),
                    ),
                ],
                markers: Vec::new(),
                zero_lines: horizontal,
                equal_aspect: false,
                legend: true,
            },
        ];

        Self {
            variant: Variant::Extended,
            title: title.map(|t| t.to_string()),
            grid: Variant::Extended.grid(),
            panels,
            text: TextSizes {
                page_title_pt: 16.0,
                panel_title_pt: 12.0,
                axis_label_pt: 11.0,
                tick_pt: 10.0,
                legend_pt: 10.0,
                bold_titles: true,
            },
            grid_alpha: 0.3,
        }
    }
}

fn line(
    x: Column,
    y: Column,
    color: RGBColor,
    alpha: f64,
    width_pt: f64,
    label: Option<&'static str>,
) -> SeriesSpec {
    SeriesSpec {
        x,
        y,
        color,
        alpha,
        width_pt,
        label,
    }
}

/// Phase-space marker (position, velocity) of size 10pt
fn marker(
    at: MarkerAt,
    shape: MarkerShape,
    color: RGBColor,
    label: Option<&'static str>,
) -> MarkerSpec {
    MarkerSpec {
        at,
        x: Column::Position,
        y: Column::Velocity,
        shape,
        color,
        size_pt: 10.0,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_layout() {
        let spec = FigureSpec::for_variant(Variant::Brief, Some("ignored"));
        assert_eq!(spec.grid, (1, 3));
        assert_eq!(spec.panels.len(), 3);
        assert!(spec.title.is_none());

        let phase = &spec.panels[2];
        assert_eq!(phase.series[0].x, Column::Position);
        assert_eq!(phase.series[0].y, Column::Velocity);
        assert!(phase.equal_aspect);
        assert_eq!(phase.markers.len(), 1);
        assert_eq!(phase.markers[0].at, MarkerAt::FirstRow);

        assert_eq!(spec.grid_alpha, 1.0);

        // Time series get a y=0 reference line
        assert!(spec.panels[0].zero_lines.horizontal);
        assert!(spec.panels[1].zero_lines.horizontal);
    }

    #[test]
    fn test_extended_layout() {
        let spec = FigureSpec::for_variant(Variant::Extended, Some("Run"));
        assert_eq!(spec.grid, (2, 2));
        assert_eq!(spec.panels.len(), 4);
        assert_eq!(spec.title.as_deref(), Some("Run"));
        assert_eq!(spec.grid_alpha, 0.3);

        let phase = &spec.panels[2];
        assert!(phase.equal_aspect);
        assert!(phase.legend);
        assert_eq!(
            phase.zero_lines,
            ZeroLines {
                horizontal: true,
                vertical: true
            }
        );
        let ends: Vec<_> = phase.markers.iter().map(|m| (m.at, m.shape)).collect();
        assert_eq!(
            ends,
            vec![
                (MarkerAt::FirstRow, MarkerShape::Circle),
                (MarkerAt::LastRow, MarkerShape::Square)
            ]
        );

        let combined = &spec.panels[3];
        assert_eq!(combined.series.len(), 2);
        assert_eq!(combined.x_columns(), vec![Column::Time]);
        assert_eq!(combined.y_columns(), vec![Column::Position, Column::Velocity]);
        assert!(combined.series.iter().all(|s| s.label.is_some()));
    }

    #[test]
    fn test_panel_count_matches_grid() {
        for variant in [Variant::Brief, Variant::Extended] {
            let spec = FigureSpec::for_variant(variant, None);
            assert_eq!(spec.panels.len(), spec.grid.0 * spec.grid.1);
        }
    }
}
