//! Axis range computation

use crate::series::{Column, TimeSeriesTable};

/// Fraction of the data span added on each side of an axis
pub const AXIS_MARGIN: f64 = 0.05;

/// Widest axis span the renderer accepts; tick and pixel mapping need headroom
pub const MAX_AXIS_SPAN: f64 = 1e306;

/// Data range of one axis: `(min, max)` with `min < max`
pub type AxisRange = (f64, f64);

/// Combined min/max over several columns, ignoring NaN
pub fn data_range(table: &TimeSeriesTable, columns: &[Column]) -> Option<AxisRange> {
    columns
        .iter()
        .filter_map(|&column| table.range(column))
        .filter(|(min, max)| min.is_finite() && max.is_finite())
        .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))
}

/// Add a margin around a data range; a zero-width range is widened so the
/// single value sits in the middle of a non-empty axis.
pub fn padded(range: Option<AxisRange>) -> AxisRange {
    let Some((min, max)) = range else {
        return (-1.0, 1.0);
    };

    let span = max - min;
    if span > 0.0 {
        // Scaled per end so the pad stays finite when the span overflows
        let pad = max * AXIS_MARGIN - min * AXIS_MARGIN;
        (min - pad, max + pad)
    } else {
        let pad = (min.abs() * AXIS_MARGIN).max(0.5);
        (min - pad, max + pad)
    }
}

/// Widen one of the ranges so both axes use the same units per pixel
///
/// Both ranges keep their centers; the result always contains the input.
pub fn equal_aspect(x: AxisRange, y: AxisRange, width_px: u32, height_px: u32) -> (AxisRange, AxisRange) {
    if width_px == 0 || height_px == 0 {
        return (x, y);
    }

    let (w, h) = (width_px as f64, height_px as f64);
    let units_per_px = ((x.1 - x.0) / w).max((y.1 - y.0) / h);

    (
        centered(x, units_per_px * w),
        centered(y, units_per_px * h),
    )
}

fn centered(range: AxisRange, span: f64) -> AxisRange {
    let mid = (range.0 + range.1) / 2.0;
    (mid - span / 2.0, mid + span / 2.0)
}

/// Whether a range has finite ends and a span narrow enough to draw
pub fn is_drawable(range: AxisRange) -> bool {
    let span = range.1 - range.0;
    span.is_finite() && span > 0.0 && span <= MAX_AXIS_SPAN
}

/// Whether `value` lies strictly inside the range
pub fn contains(range: AxisRange, value: f64) -> bool {
    range.0 < value && value < range.1
}
