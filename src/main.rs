/// Command line entry point of the towing tank analysis.
/// Author: G0rocks
/// Date: 2026-10-16

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use towing_tank_analysis::{run_analysis, AnalysisConfig, ChartSink, MemorySink, PlotlySink, Scene, SceneFlags};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "towing-tank-analysis", version, about = "Repeat-run statistics and resistance charts of a towing tank campaign")]
struct Cli {
    /// JSON configuration file, missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run table (default: full_resistance_data.dat)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory the _plots tree is created in
    #[arg(long)]
    output: Option<PathBuf>,

    /// Draw only these scenes (repeatable), e.g. --scene prohaska --scene heave
    #[arg(long = "scene")]
    scenes: Vec<Scene>,

    /// Black markers and dash patterns instead of colours
    #[arg(long)]
    black_and_white: bool,

    /// Size figures for an A4 page
    #[arg(long)]
    a4: bool,

    /// Leave out figure titles
    #[arg(long)]
    no_titles: bool,

    /// Build every figure but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();

    let config = build_config(&cli)?;
    tracing::debug!("Configuration: {:?}", config);

    let mut plotly_sink = PlotlySink;
    let mut memory_sink = MemorySink::default();
    let sink: &mut dyn ChartSink = if cli.dry_run { &mut memory_sink } else { &mut plotly_sink };

    let report = run_analysis(&config, sink).with_context(|| format!("analysis of {} failed", config.input.display()))?;

    println!(
        "Loaded {} runs ({} zero rows dropped, {} rows skipped) in {} conditions",
        report.runs_loaded,
        report.zero_rows_dropped,
        report.rows_skipped,
        report.conditions.len()
    );
    if cli.dry_run {
        println!("Dry run: {} figures, {} chart files not written", report.figures, report.chart_files.len());
    } else {
        println!(
            "Wrote {} figures as {} chart files under {}",
            report.figures,
            report.chart_files.len(),
            config.output_root.join(towing_tank_analysis::PLOTS_DIRECTORY).display()
        );
    }
    Ok(())
}

/// Configuration file first, command line flags on top
fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path).with_context(|| format!("could not read configuration {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(input) = &cli.input {
        config.input = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_root = output.clone();
    }
    if !cli.scenes.is_empty() {
        config.scenes = SceneFlags::only(&cli.scenes);
    }
    if cli.black_and_white {
        config.style.black_and_white = true;
    }
    if cli.a4 {
        config.style.a4_paper = true;
    }
    if cli.no_titles {
        config.style.show_titles = false;
    }
    Ok(config)
}
