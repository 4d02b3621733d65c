/// Export of the averaged condition tables.
/// Author: G0rocks
/// Date: 2026-10-16

use crate::error::AnalysisError;
use crate::records::Column;
use crate::stats::AveragedRecord;
use std::path::{Path, PathBuf};

/// File name of the averaged table of a condition
pub fn averaged_file_name(condition: u8) -> String {
    format!("averaged_condition_{:02}.csv", condition)
}

/// Saves the averaged records of a condition to a csv file in `directory`.
/// Will overwrite any file with the same name. The columns are the means of every run table column
/// followed by the repeat count, the run numbers of the repeats and, per aggregated channel, min, max, mean, spread, standard deviation and standard error.
/// All records must have been aggregated over the same channels.
pub fn write_averaged_csv(directory: &Path, condition: u8, records: &[AveragedRecord]) -> Result<PathBuf, AnalysisError> {
    if !directory.is_dir() {
        std::fs::create_dir_all(directory)?;
    }
    let csv_file_path = directory.join(averaged_file_name(condition));

    // Create a CSV writer with a semicolon delimiter
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_path(&csv_file_path)?;

    // Channels of the first record define the statistics columns
    let channels: Vec<Column> = match records.first() {
        Some(record) => record.channels.iter().map(|(column, _)| *column).collect(),
        None => Vec::new(),
    };

    // Write the header
    let mut header: Vec<String> = Column::ALL.iter().map(|c| c.key().to_string()).collect();
    header.push("condition".to_string());
    header.push("repeats".to_string());
    header.push("run_numbers".to_string());
    for channel in &channels {
        for statistic in ["min", "max", "mean", "pct_spread", "std_dev", "std_error"] {
            header.push(format!("{}_{}", channel.key(), statistic));
        }
    }
    wtr.write_record(&header)?;

    // Write one row per setpoint
    for record in records {
        let mut row: Vec<String> = record.mean.values().iter().map(|v| v.to_string()).collect();
        row.push(condition.to_string());
        row.push(record.repeats.to_string());
        // Space separated so the field never clashes with the delimiter
        let run_numbers: Vec<String> = record.run_numbers.iter().map(|n| n.to_string()).collect();
        row.push(run_numbers.join(" "));
        for channel in &channels {
            match record.stats(*channel) {
                Some(stats) => {
                    for value in [stats.min, stats.max, stats.mean, stats.pct_spread, stats.std_dev, stats.std_error] {
                        row.push(value.to_string());
                    }
                }
                None => row.extend(std::iter::repeat_n(String::new(), 6)),
            }
        }
        wtr.write_record(&row)?;
    }

    // Flush and close the writer
    wtr.flush()?;
    tracing::debug!("Saved averaged table of condition {} to {}", condition, csv_file_path.display());
    return Ok(csv_file_path);
}
