//! Oscillator Report - command-line entry point
//!
//! Loads a trajectory CSV, prints summary statistics and writes the report
//! figure as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use oscillator_report::config::{ReportConfig, ReportOverrides, Variant};
use oscillator_report::pipeline;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Trajectory CSV with time, position and velocity columns
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PNG (default: vanderpol_quick.png or vanderpol_plots.png)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Figure layout: brief or extended
    #[arg(long)]
    variant: Option<String>,

    /// JSON file with property overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// Page title of the extended figure
    #[arg(long, conflicts_with = "no_title")]
    title: Option<String>,

    /// Render the extended figure without a page title
    #[arg(long, default_value_t = false)]
    no_title: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Oscillator Report v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(Args::parse()) {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let extended = config.variant == Variant::Extended;

    let outcome = pipeline::run_with(&config, |overview| {
        if extended {
            println!("Van der Pol Oscillator - Data Loaded");
            for line in overview.report_lines() {
                println!("{}", line);
            }
            println!();
        }
    })
    .with_context(|| format!("Report failed for {}", config.input_path.display()))?;

    println!("✓ Plot saved: {}", outcome.figure.path.display());

    if extended {
        let rule = "=".repeat(50);
        println!("\n{}\nStatistics:\n{}", rule, rule);
        for line in outcome.statistics.report_lines() {
            println!("{}", line);
        }
        println!("{}", rule);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ReportConfig> {
    let overrides = ReportOverrides {
        output_path: args.output.clone(),
        variant: args.variant.clone(),
        dpi: args.dpi,
        title: args.title.clone(),
        no_title: args.no_title,
    };

    ReportConfig::resolve(&args.input, args.config.as_deref(), &overrides).with_context(|| {
        match &args.config {
            Some(path) => format!("Failed to read config {}", path.display()),
            None => "Failed to build configuration".to_string(),
        }
    })
}
