/// Repeat-run statistics.
/// Author: G0rocks
/// Date: 2026-10-16
///
/// Every speed setpoint of a condition is run several times. The runs of one setpoint are found by
/// their Froude number and reduced to one averaged record holding the mean of every column and the
/// spread of the measured channels.

use crate::records::{Column, RunRecord};
use std::ops::Range;

// Constants
//----------------------------------------------------
/// Measured channels the spread is reported for
pub const DEFAULT_CHANNELS: [Column; 4] = [Column::ModelSpeed, Column::FwdLvdt, Column::AftLvdt, Column::Drag];

/// Decimals of the Froude number used to recognise repeats of the same setpoint
pub const DEFAULT_FROUDE_DECIMALS: u32 = 2;


// Structs and enums
//----------------------------------------------------
/// Statistics of one channel over the repeats of a setpoint
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChannelStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Deviation of the maximum from the mean relative to the maximum, in [%]
    pub pct_spread: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Standard deviation of the mean, std_dev / sqrt(n)
    pub std_error: f64,
    /// Number of repeats
    pub count: usize,
}

impl ChannelStats {
    /// Reduces a set of repeat observations. Non-finite values are ignored,
    /// returns None if no finite observation is left.
    pub fn from_values(values: &[f64]) -> Option<ChannelStats> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut mean = values.iter().sum::<f64>() / n;
        // Rounding must not push the mean outside the observed range
        mean = mean.clamp(min, max);

        // Percentage deviation of max from mean, relative to max
        let pct_spread = if max == 0.0 { 0.0 } else { (max - mean) / max * 100.0 };

        // Population variance, a single repeat has none
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        return Some(ChannelStats {
            min,
            max,
            mean,
            pct_spread,
            std_dev,
            std_error: std_dev / n.sqrt(),
            count: values.len(),
        });
    }
}

/// Mean of the repeats of one setpoint plus the spread of the measured channels
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedRecord {
    /// Column-wise mean of the repeats
    pub mean: RunRecord,
    /// Number of repeats averaged
    pub repeats: usize,
    /// Run numbers of the repeats, in input order
    pub run_numbers: Vec<f64>,
    /// Statistics per channel, in the order of the aggregator's channel set
    pub channels: Vec<(Column, ChannelStats)>,
}

impl AveragedRecord {
    /// Statistics of a channel, None if the channel was not aggregated
    pub fn stats(&self, column: Column) -> Option<&ChannelStats> {
        self.channels.iter().find(|(c, _)| *c == column).map(|(_, stats)| stats)
    }

    pub fn froude_number(&self) -> f64 {
        self.mean.froude_number()
    }
}

/// Groups repeat runs by Froude number and averages them
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatAggregator {
    /// Decimals of the Froude number two runs must share to be repeats
    pub froude_decimals: u32,
    /// Channels to compute the spread for
    pub channels: Vec<Column>,
}

impl Default for RepeatAggregator {
    fn default() -> Self {
        RepeatAggregator {
            froude_decimals: DEFAULT_FROUDE_DECIMALS,
            channels: DEFAULT_CHANNELS.to_vec(),
        }
    }
}

impl RepeatAggregator {
    pub fn new(froude_decimals: u32, channels: Vec<Column>) -> Self {
        RepeatAggregator { froude_decimals, channels }
    }

    /// Key two repeats of the same setpoint share
    fn setpoint_key(&self, froude: f64) -> i64 {
        let scale = 10f64.powi(self.froude_decimals as i32);
        (froude * scale).round() as i64
    }

    /// Averages the runs of a condition, one record per Froude setpoint in order of first appearance
    pub fn aggregate(&self, records: &[RunRecord]) -> Vec<AveragedRecord> {
        // Group indices by setpoint, keeping first-appearance order
        let mut setpoints: Vec<(i64, Vec<&RunRecord>)> = Vec::new();
        for record in records {
            let key = self.setpoint_key(record.froude_number());
            match setpoints.iter_mut().find(|(k, _)| *k == key) {
                Some((_, group)) => group.push(record),
                None => setpoints.push((key, vec![record])),
            }
        }

        setpoints.into_iter().map(|(_, group)| self.average(&group)).collect()
    }

    /// Averages one group of repeats
    fn average(&self, group: &[&RunRecord]) -> AveragedRecord {
        let n = group.len() as f64;

        // Column-wise mean
        let mut values = [0.0; Column::COUNT];
        for record in group {
            for (sum, value) in values.iter_mut().zip(record.values().iter()) {
                *sum += value;
            }
        }
        for value in values.iter_mut() {
            *value /= n;
        }

        // Spread of the measured channels
        let mut channels: Vec<(Column, ChannelStats)> = Vec::with_capacity(self.channels.len());
        for column in &self.channels {
            let observations: Vec<f64> = group.iter().map(|r| r.get(*column)).collect();
            if let Some(stats) = ChannelStats::from_values(&observations) {
                channels.push((*column, stats));
            }
        }

        AveragedRecord {
            mean: RunRecord::new(values, group[0].condition),
            repeats: group.len(),
            run_numbers: group.iter().map(|r| r.get(Column::RunNo)).collect(),
            channels,
        }
    }
}


// Functions
//----------------------------------------------------
/// Aggregates the repeats in a row-index range of a table for the given channels.
/// An out-of-bounds range is clipped to the table.
pub fn stats_avg(records: &[RunRecord], range: Range<usize>, channels: &[Column], froude_decimals: u32) -> Vec<AveragedRecord> {
    let end = range.end.min(records.len());
    let start = range.start.min(end);
    RepeatAggregator::new(froude_decimals, channels.to_vec()).aggregate(&records[start..end])
}


// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;
    use crate::records::tests::run;
    use rand::Rng;

    #[test]
    fn single_repeat_has_no_spread() {
        let stats = ChannelStats::from_values(&[3.5]).unwrap();
        assert_eq!(stats.min, 3.5);
        assert_eq!(stats.max, 3.5);
        assert_eq!(stats.mean, 3.5);
        assert_eq!(stats.pct_spread, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.std_error, 0.0);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn empty_set_has_no_stats() {
        assert!(ChannelStats::from_values(&[]).is_none());
    }

    #[test]
    fn non_finite_values_are_ignored() {
        assert!(ChannelStats::from_values(&[f64::NAN]).is_none());
        assert!(ChannelStats::from_values(&[f64::NAN, f64::INFINITY]).is_none());

        let stats = ChannelStats::from_values(&[2.0, f64::NAN, 4.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert_close!(stats.mean, 3.0, 1e-12);
        assert_close!(stats.std_dev, 1.0, 1e-12);
    }

    #[test]
    fn known_values() {
        let stats = ChannelStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_close!(stats.mean, 5.0, 1e-12);
        assert_close!(stats.std_dev, 2.0, 1e-12);
        assert_close!(stats.std_error, 2.0 / 8f64.sqrt(), 1e-12);
        assert_close!(stats.pct_spread, (9.0 - 5.0) / 9.0 * 100.0, 1e-12);
    }

    #[test]
    fn zero_maximum_gives_zero_spread() {
        let stats = ChannelStats::from_values(&[-3.0, -1.0, 0.0]).unwrap();
        assert_eq!(stats.pct_spread, 0.0);
    }

    #[test]
    fn random_sets_keep_mean_inside_range_and_spread_non_negative() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let n = rng.random_range(1..12);
            let values: Vec<f64> = (0..n).map(|_| rng.random_range(0.01..500.0)).collect();
            let stats = ChannelStats::from_values(&values).unwrap();
            assert!(stats.mean >= stats.min && stats.mean <= stats.max);
            assert!(stats.pct_spread >= 0.0);

            // Shift leaves the standard deviation alone, scaling scales it
            let shift = rng.random_range(-100.0..100.0);
            let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
            let shifted_stats = ChannelStats::from_values(&shifted).unwrap();
            assert_close!(shifted_stats.std_dev, stats.std_dev, 1e-8);

            let factor = rng.random_range(0.1..10.0);
            let scaled: Vec<f64> = values.iter().map(|v| v * factor).collect();
            let scaled_stats = ChannelStats::from_values(&scaled).unwrap();
            assert_close!(scaled_stats.std_dev, stats.std_dev * factor, 1e-8);
        }
    }

    #[test]
    fn aggregate_groups_repeats_by_froude_number() {
        let records = vec![
            run(7, 0.201, 1.00, 100.0),
            run(7, 0.302, 1.50, 200.0),
            run(7, 0.199, 1.02, 110.0),
            run(7, 0.298, 1.48, 210.0),
            run(7, 0.400, 2.00, 400.0),
        ];
        let averaged = RepeatAggregator::default().aggregate(&records);

        assert_eq!(averaged.len(), 3);
        assert_eq!(averaged[0].repeats, 2);
        assert_eq!(averaged[2].repeats, 1);
        assert_close!(averaged[0].froude_number(), 0.2, 1e-12);
        assert_eq!(averaged[0].mean.condition, 7);

        let drag = averaged[0].stats(Column::Drag).unwrap();
        assert_eq!(drag.min, 100.0);
        assert_eq!(drag.max, 110.0);
        assert_close!(drag.mean, 105.0, 1e-12);
        assert_close!(averaged[0].mean.get(Column::Drag), 105.0, 1e-12);
        assert_close!(drag.std_dev, 5.0, 1e-12);

        let single = averaged[2].stats(Column::ModelSpeed).unwrap();
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.pct_spread, 0.0);
        assert!(averaged[0].stats(Column::Ctm).is_none());
    }

    #[test]
    fn stats_avg_restricts_to_range() {
        let records = vec![
            run(1, 0.20, 1.0, 100.0),
            run(1, 0.20, 1.0, 120.0),
            run(1, 0.30, 1.5, 200.0),
        ];
        let averaged = stats_avg(&records, 1..3, &[Column::Drag], 2);
        assert_eq!(averaged.len(), 2);
        assert_eq!(averaged[0].repeats, 1);
        assert_eq!(averaged[0].stats(Column::Drag).unwrap().mean, 120.0);
        assert_eq!(averaged[0].channels.len(), 1);

        // Out of bounds ranges are clipped
        assert_eq!(stats_avg(&records, 2..10, &[Column::Drag], 2).len(), 1);
        assert!(stats_avg(&records, 5..10, &[Column::Drag], 2).is_empty());
    }
}
