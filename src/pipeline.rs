/// The analysis batch: load the run table, average the repeats and draw every enabled scene.
/// Author: G0rocks
/// Date: 2026-10-16

use crate::charts::{ChartSink, OutputLayout, Scene, SceneContext};
use crate::conditions::partition_by_condition;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::export::write_averaged_csv;
use crate::records::load_run_table;
use crate::stats::{AveragedRecord, RepeatAggregator, DEFAULT_CHANNELS};
use std::collections::BTreeMap;
use std::path::PathBuf;

// Structs and enums
//----------------------------------------------------
/// What an analysis run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    /// Usable runs in the table
    pub runs_loaded: usize,
    /// All-zero padding rows dropped
    pub zero_rows_dropped: usize,
    /// Rows that could not be parsed
    pub rows_skipped: usize,
    /// Condition codes with at least one run
    pub conditions: Vec<u8>,
    /// Scenes that were drawn
    pub scenes: Vec<Scene>,
    /// Number of figures built
    pub figures: usize,
    /// Chart files handed to the sink, one per figure and format
    pub chart_files: Vec<PathBuf>,
    /// Averaged tables written
    pub csv_files: Vec<PathBuf>,
}


// Functions
//----------------------------------------------------
/// Runs the whole analysis with the given configuration and hands every figure to `sink`
pub fn run_analysis(config: &AnalysisConfig, sink: &mut dyn ChartSink) -> Result<AnalysisReport, AnalysisError> {
    let started = time::UtcDateTime::now();
    tracing::info!("Analysis started at {}", timestamp_to_string(started));

    // Load the table, a missing file stops the analysis
    let table = match load_run_table(&config.input) {
        Ok(table) => table,
        Err(AnalysisError::MissingInput(path)) => {
            tracing::warn!("--------------------------------------------------");
            tracing::warn!("Input file {} not found, nothing to analyse", path.display());
            tracing::warn!("--------------------------------------------------");
            return Err(AnalysisError::MissingInput(path));
        }
        Err(err) => return Err(err),
    };

    let mut report = AnalysisReport {
        runs_loaded: table.records.len(),
        zero_rows_dropped: table.zero_rows_dropped,
        rows_skipped: table.rows_skipped,
        ..AnalysisReport::default()
    };

    // Partition and average the repeats of every condition
    let groups = partition_by_condition(&table.records);
    report.conditions = groups.codes();
    let aggregator = RepeatAggregator::new(config.froude_decimals, DEFAULT_CHANNELS.to_vec());
    let averaged: BTreeMap<u8, Vec<AveragedRecord>> = groups.iter().map(|(code, runs)| (code, aggregator.aggregate(runs))).collect();
    for (code, records) in averaged.iter() {
        tracing::info!("Condition {}: {} runs, {} setpoints", code, groups.group(*code).len(), records.len());
    }

    let layout = OutputLayout::new(&config.output_root);

    // Averaged tables
    if config.export_averaged_csv && sink.writes_files() {
        for (code, records) in averaged.iter() {
            report.csv_files.push(write_averaged_csv(&layout.data_directory(), *code, records)?);
        }
    }

    let ctx = SceneContext {
        groups: &groups,
        averaged: &averaged,
        style: &config.style,
        froude_decimals: config.froude_decimals,
        prohaska_max_froude: config.prohaska_max_froude,
    };
    let scenes: Vec<Scene> = Scene::ALL.iter().copied().filter(|scene| config.scenes.is_enabled(*scene)).collect();

    // Show progress only when someone is watching
    let progress = if atty::is(atty::Stream::Stderr) {
        let bar = indicatif::ProgressBar::new(scenes.len() as u64);
        if let Ok(bar_style) = indicatif::ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            bar.set_style(bar_style);
        }
        bar
    } else {
        indicatif::ProgressBar::hidden()
    };

    for scene in scenes {
        progress.set_message(scene.name());
        let figures = scene.build(&ctx);

        if !figures.is_empty() && sink.writes_files() {
            layout.ensure_directories(scene.plot_set(), &config.formats)?;
        }
        for figure in figures.iter() {
            for format in config.formats.iter() {
                let path = layout.path(figure, *format);
                sink.save(figure, &path, *format, &config.style)?;
                report.chart_files.push(path);
            }
        }

        tracing::debug!("Scene {} ({}): {} figures", scene.number(), scene.name(), figures.len());
        report.figures += figures.len();
        report.scenes.push(scene);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let finished = time::UtcDateTime::now();
    tracing::info!(
        "Analysis finished at {} after {:.1} s: {} figures, {} chart files",
        timestamp_to_string(finished),
        (finished - started).as_seconds_f64(),
        report.figures,
        report.chart_files.len()
    );
    return Ok(report);
}

/// Formats a timestamp as YYYY-MM-DD hh:mm:ss
pub fn timestamp_to_string(time_stamp: time::UtcDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        time_stamp.year(),
        time_stamp.month() as u8,
        time_stamp.day(),
        time_stamp.hour(),
        time_stamp.minute(),
        time_stamp.second()
    )
}
