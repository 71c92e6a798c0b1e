//! PNG figure renderer using plotters
//!
//! The figure is drawn into an in-memory RGB buffer, encoded to PNG, written
//! to a temporary file next to the target and renamed into place. A failed
//! render never leaves a file at the output path.

use super::figure::{
    FigureSpec, MarkerAt, MarkerShape, MarkerSpec, PanelSpec, TextSizes, GRID_GRAY,
};
use super::scale::{self as axis, AxisRange};
use crate::config::{PngCompression, ReportConfig};
use crate::error::{ReportError, Result};
use crate::series::TimeSeriesTable;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use log::debug;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Drawing failures carry the backend message only; the caller adds the path
type DrawResult<T = ()> = std::result::Result<T, String>;

type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Description of a successfully written image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFigure {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Encoded PNG size
    pub bytes: usize,
}

/// Converts point sizes (1/72 inch) to pixels at a given DPI
#[derive(Debug, Clone, Copy, PartialEq)]
struct PointScale {
    px_per_pt: f64,
}

impl PointScale {
    fn new(dpi: u32) -> Self {
        Self {
            px_per_pt: dpi as f64 / 72.0,
        }
    }

    fn px(self, pt: f64) -> f64 {
        pt * self.px_per_pt
    }

    fn px_i32(self, pt: f64) -> i32 {
        self.px(pt).round().max(1.0) as i32
    }

    fn px_u32(self, pt: f64) -> u32 {
        self.px(pt).round().max(1.0) as u32
    }

    fn font(self, pt: f64, style: FontStyle) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.px(pt), style)
    }
}

/// Margins and label areas of one panel, derived from its text sizes
struct PanelLayout {
    margin: u32,
    x_label_area: u32,
    y_label_area: u32,
}

impl PanelLayout {
    fn new(text: &TextSizes, scale: PointScale) -> Self {
        let tick = scale.px(text.tick_pt);
        let label = scale.px(text.axis_label_pt);
        Self {
            margin: scale.px_u32(6.0),
            x_label_area: (tick * 1.8 + label * 1.8).round() as u32,
            y_label_area: (tick * 4.0 + label * 1.8).round() as u32,
        }
    }

    fn build<'a, DB: DrawingBackend>(
        &self,
        area: &'a DrawingArea<DB, Shift>,
        x: AxisRange,
        y: AxisRange,
    ) -> DrawResult<PanelChart<'a, DB>> {
        ChartBuilder::on(area)
            .margin(self.margin)
            .x_label_area_size(self.x_label_area)
            .y_label_area_size(self.y_label_area)
            .build_cartesian_2d(x.0..x.1, y.0..y.1)
            .map_err(|e| e.to_string())
    }
}

pub struct FigureRenderer {
    width: u32,
    height: u32,
    dpi: u32,
    compression: PngCompression,
}

impl FigureRenderer {
    pub fn new(width: u32, height: u32, dpi: u32, compression: PngCompression) -> Self {
        Self {
            width,
            height,
            dpi,
            compression,
        }
    }

    /// Renderer sized for the configured variant and DPI
    pub fn from_config(config: &ReportConfig) -> Self {
        let (width, height) = config.resolve_dimensions();
        Self::new(width, height, config.dpi, config.png_compression)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render the figure and write it as a PNG to `path`
    ///
    /// # Errors
    /// - `InsufficientData` if the table has no rows (no file is created)
    /// - `RenderError` if drawing, encoding or writing fails
    pub fn render_to_file(
        &self,
        table: &TimeSeriesTable,
        spec: &FigureSpec,
        path: &Path,
    ) -> Result<RenderedFigure> {
        let buffer = self.render_to_buffer(table, spec, path)?;

        let png = self.encode_png(&buffer, path)?;
        write_atomic(path, &png)?;

        debug!(
            "Wrote {} ({}x{}, {} bytes)",
            path.display(),
            self.width,
            self.height,
            png.len()
        );

        Ok(RenderedFigure {
            path: path.to_path_buf(),
            width: self.width,
            height: self.height,
            bytes: png.len(),
        })
    }

    /// Draw the figure into a packed RGB buffer of `width * height * 3` bytes
    ///
    /// Drawing errors are reported against `path`, the file being rendered.
    fn render_to_buffer(
        &self,
        table: &TimeSeriesTable,
        spec: &FigureSpec,
        path: &Path,
    ) -> Result<Vec<u8>> {
        if table.is_empty() {
            return Err(ReportError::InsufficientData {
                operation: "render",
                required: 1,
                found: 0,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(ReportError::render(
                path,
                format!("invalid figure size {}x{}", self.width, self.height),
            ));
        }

        let mut buffer = vec![0u8; (self.width as usize) * (self.height as usize) * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();

            draw_figure(&root, table, spec, PointScale::new(self.dpi))
                .map_err(|message| ReportError::render(path, message))?;

            root.present()
                .map_err(|e| ReportError::render(path, e))?;
        }

        Ok(buffer)
    }

    fn encode_png(&self, rgb: &[u8], path: &Path) -> Result<Vec<u8>> {
        let compression = match self.compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        };

        let mut png = Vec::new();
        PngEncoder::new_with_quality(&mut png, compression, FilterType::Adaptive)
            .write_image(rgb, self.width, self.height, ExtendedColorType::Rgb8)
            .map_err(|e| ReportError::render(path, e))?;
        Ok(png)
    }
}

/// Write `bytes` to a temporary file in the target directory, then rename
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".oscillator_report")
        .suffix(".png.tmp")
        .tempfile_in(dir)
        .map_err(|e| ReportError::render(path, e))?;

    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ReportError::render(path, e))?;

    tmp.persist(path)
        .map_err(|e| ReportError::render(path, e.error))?;

    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &TimeSeriesTable,
    spec: &FigureSpec,
    scale: PointScale,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let body = match &spec.title {
        Some(title) => root
            .titled(
                title,
                scale.font(spec.text.page_title_pt, FontStyle::Bold),
            )
            .map_err(|e| e.to_string())?,
        None => root.clone(),
    };

    let cells = body.split_evenly(spec.grid);
    for (cell, panel) in cells.iter().zip(&spec.panels) {
        draw_panel(cell, table, panel, spec, scale)?;
    }

    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    cell: &DrawingArea<DB, Shift>,
    table: &TimeSeriesTable,
    panel: &PanelSpec,
    figure: &FigureSpec,
    scale: PointScale,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let text = &figure.text;
    let title_style = if text.bold_titles {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    let area = cell
        .titled(panel.title, scale.font(text.panel_title_pt, title_style))
        .map_err(|e| e.to_string())?;

    let layout = PanelLayout::new(text, scale);
    let mut x_range = axis::padded(axis::data_range(table, &panel.x_columns()));
    let mut y_range = axis::padded(axis::data_range(table, &panel.y_columns()));

    check_drawable(panel, x_range, y_range)?;
    if panel.equal_aspect {
        // Building a chart draws nothing, so a trial chart gives the exact plot size
        let trial = layout.build(&area, x_range, y_range)?;
        let (w, h) = trial.plotting_area().dim_in_pixel();
        (x_range, y_range) = axis::equal_aspect(x_range, y_range, w, h);
        check_drawable(panel, x_range, y_range)?;
    }

    let mut chart = layout.build(&area, x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .axis_desc_style(scale.font(text.axis_label_pt, FontStyle::Normal))
        .label_style(scale.font(text.tick_pt, FontStyle::Normal))
        .bold_line_style(GRID_GRAY.mix(figure.grid_alpha).stroke_width(scale.px_u32(0.8)))
        .light_line_style(TRANSPARENT)
        .x_labels(6)
        .y_labels(6)
        .draw()
        .map_err(|e| e.to_string())?;

    let reference = BLACK.stroke_width(scale.px_u32(0.5));
    let (dash, gap) = (scale.px_i32(3.7), scale.px_i32(1.6));
    if panel.zero_lines.horizontal && axis::contains(y_range, 0.0) {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x_range.0, 0.0), (x_range.1, 0.0)],
                dash,
                gap,
                reference,
            ))
            .map_err(|e| e.to_string())?;
    }
    if panel.zero_lines.vertical && axis::contains(x_range, 0.0) {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, y_range.0), (0.0, y_range.1)],
                dash,
                gap,
                reference,
            ))
            .map_err(|e| e.to_string())?;
    }

    let legend_len = scale.px_i32(20.0);
    for series in &panel.series {
        let style = series
            .color
            .mix(series.alpha)
            .stroke_width(scale.px_u32(series.width_pt));
        let anno = chart
            .draw_series(LineSeries::new(table.pairs(series.x, series.y), style))
            .map_err(|e| e.to_string())?;
        if let Some(label) = series.label {
            anno.label(label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_len, y)], style)
            });
        }
    }

    for marker in &panel.markers {
        draw_marker(&mut chart, table, marker, scale)?;
    }

    if panel.legend {
        chart
            .configure_series_labels()
            .label_font(scale.font(text.legend_pt, FontStyle::Normal))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn check_drawable(panel: &PanelSpec, x: AxisRange, y: AxisRange) -> DrawResult {
    for (name, range) in [("x", x), ("y", y)] {
        if !axis::is_drawable(range) {
            return Err(format!(
                "{} axis of '{}' spans [{:e}, {:e}], too wide to draw",
                name, panel.title, range.0, range.1
            ));
        }
    }
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    table: &TimeSeriesTable,
    marker: &MarkerSpec,
    scale: PointScale,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let row = match marker.at {
        MarkerAt::FirstRow => table.first(),
        MarkerAt::LastRow => table.last(),
    };
    let Some(row) = row else {
        return Ok(());
    };

    let center = (row.get(marker.x), row.get(marker.y));
    let radius = scale.px_i32(marker.size_pt / 2.0);
    let style = marker.color.filled();

    match marker.shape {
        MarkerShape::Circle => {
            let anno = chart
                .draw_series(std::iter::once(Circle::new(center, radius, style)))
                .map_err(|e| e.to_string())?;
            if let Some(label) = marker.label {
                anno.label(label)
                    .legend(move |(x, y)| Circle::new((x, y), radius, style));
            }
        }
        MarkerShape::Square => {
            let anno = chart
                .draw_series(std::iter::once(
                    EmptyElement::at(center)
                        + Rectangle::new([(-radius, -radius), (radius, radius)], style),
                ))
                .map_err(|e| e.to_string())?;
            if let Some(label) = marker.label {
                anno.label(label).legend(move |(x, y)| {
                    Rectangle::new([(x - radius, y - radius), (x + radius, y + radius)], style)
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::error::ErrorKind;
    use crate::series::Row;
    use tempfile::TempDir;

    fn limit_cycle(n: usize) -> TimeSeriesTable {
        TimeSeriesTable::from_rows((0..n).map(|i| {
            let t = i as f64 * 0.1;
            Row::new(t, 2.0 * t.cos(), -2.0 * t.sin())
        }))
    }

    fn small_renderer(variant: Variant) -> FigureRenderer {
        let (w, h) = variant.figure_size();
        let dpi = 50;
        FigureRenderer::new(
            (w * dpi as f64) as u32,
            (h * dpi as f64) as u32,
            dpi,
            PngCompression::Fast,
        )
    }

    #[test]
    fn test_render_writes_png_with_configured_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("figure.png");
        let renderer = small_renderer(Variant::Extended);
        let spec = FigureSpec::for_variant(Variant::Extended, Some("Test"));

        let figure = renderer.render_to_file(&limit_cycle(100), &spec, &path).unwrap();
        assert_eq!(figure.path, path);
        assert_eq!((figure.width, figure.height), (600, 500));
        assert!(figure.bytes > 0);
        assert_eq!(image::image_dimensions(&path).unwrap(), (600, 500));
    }

    #[test]
    fn test_render_twice_same_dimensions() {
        let dir = TempDir::new().unwrap();
        let renderer = small_renderer(Variant::Brief);
        let spec = FigureSpec::for_variant(Variant::Brief, None);
        let table = limit_cycle(60);

        let first = renderer
            .render_to_file(&table, &spec, &dir.path().join("a.png"))
            .unwrap();
        let second = renderer
            .render_to_file(&table, &spec, &dir.path().join("b.png"))
            .unwrap();

        assert_eq!(
            image::image_dimensions(&first.path).unwrap(),
            image::image_dimensions(&second.path).unwrap()
        );
        assert_eq!((first.width, first.height), (700, 200));
    }

    #[test]
    fn test_single_row_renders() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("single.png");
        let table = TimeSeriesTable::from_rows([Row::new(0.0, 0.0, 0.0)]);
        let spec = FigureSpec::for_variant(Variant::Extended, None);

        small_renderer(Variant::Extended)
            .render_to_file(&table, &spec, &path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_table_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        let spec = FigureSpec::for_variant(Variant::Extended, None);

        let err = small_renderer(Variant::Extended)
            .render_to_file(&TimeSeriesTable::default(), &spec, &path)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_output_is_render_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("figure.png");
        let spec = FigureSpec::for_variant(Variant::Brief, None);

        let err = small_renderer(Variant::Brief)
            .render_to_file(&limit_cycle(10), &spec, &path)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderError);
        assert!(err.to_string().contains("figure.png"));
        assert!(!path.exists());
    }

    #[test]
    fn test_buffer_size() {
        let renderer = FigureRenderer::new(504, 144, 36, PngCompression::Fast);
        let spec = FigureSpec::for_variant(Variant::Brief, None);
        let buffer = renderer
            .render_to_buffer(&limit_cycle(20), &spec, Path::new("buffer.png"))
            .unwrap();
        assert_eq!(buffer.len(), 504 * 144 * 3);
        assert_eq!(renderer.dimensions(), (504, 144));
    }

    #[test]
    fn test_overflowing_axis_is_render_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.png");
        let table = TimeSeriesTable::from_rows([
            Row::new(0.0, -9e307, 1.0),
            Row::new(1.0, 9e307, -1.0),
        ]);

        for variant in [Variant::Brief, Variant::Extended] {
            let spec = FigureSpec::for_variant(variant, None);
            let err = small_renderer(variant)
                .render_to_file(&table, &spec, &path)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RenderError);
            assert!(err.to_string().contains("huge.png"));
            assert!(err.to_string().contains("too wide"));
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_large_finite_values_render() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("large.png");
        let table = TimeSeriesTable::from_rows([
            Row::new(0.0, -1e300, 1.0),
            Row::new(1.0, 1e300, -1.0),
        ]);
        let spec = FigureSpec::for_variant(Variant::Brief, None);

        small_renderer(Variant::Brief)
            .render_to_file(&table, &spec, &path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_point_scale() {
        let scale = PointScale::new(144);
        assert_eq!(scale.px(10.0), 20.0);
        assert_eq!(scale.px_u32(0.1), 1);
        assert_eq!(scale.px_i32(5.0), 10);
    }
}
