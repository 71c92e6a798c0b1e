//! Report pipeline
//!
//! Loads the trajectory once, then summarizes and renders it:
//! 1. Load the CSV into a `TimeSeriesTable`
//! 2. Compute the overview and summary statistics
//! 3. Render the figure for the configured variant and write the PNG

use crate::config::ReportConfig;
use crate::error::Result;
use crate::render::{FigureRenderer, FigureSpec, RenderedFigure};
use crate::series::{load_csv, SummaryStatistics, TableOverview};
use log::{debug, info};
use std::time::Instant;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub overview: TableOverview,
    pub statistics: SummaryStatistics,
    pub figure: RenderedFigure,
}

/// Run the full report for one configuration
///
/// Each call is independent; the first failure aborts the run and no image
/// is written.
pub fn run(config: &ReportConfig) -> Result<ReportOutcome> {
    run_with(config, |_| {})
}

/// Like [`run`], calling `on_loaded` with the overview before rendering starts
pub fn run_with<F>(config: &ReportConfig, on_loaded: F) -> Result<ReportOutcome>
where
    F: FnOnce(&TableOverview),
{
    let t0 = Instant::now();

    info!("[1/3] Loading {}", config.input_path.display());
    let table = load_csv(&config.input_path)?;
    let overview = TableOverview::from_table(&table)?;
    info!(
        "  Loaded {} rows in {:.1}ms",
        overview.rows,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    on_loaded(&overview);

    info!("[2/3] Computing statistics");
    let statistics = SummaryStatistics::from_table(&table)?;
    debug!("  {}", statistics);

    info!(
        "[3/3] Rendering {} figure to {}",
        config.variant,
        config.output_path.display()
    );
    let t1 = Instant::now();
    let spec = FigureSpec::for_variant(config.variant, config.title.as_deref());
    let renderer = FigureRenderer::from_config(config);
    let figure = renderer.render_to_file(&table, &spec, &config.output_path)?;
    info!(
        "  Rendered {}x{} ({} bytes) in {:.1}ms",
        figure.width,
        figure.height,
        figure.bytes,
        t1.elapsed().as_secs_f64() * 1000.0
    );

    info!(
        "Report complete in {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ReportOutcome {
        overview,
        statistics,
        figure,
    })
}
