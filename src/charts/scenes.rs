/// Chart scenes. Each scene picks the conditions and columns it compares and turns them into figures.
/// Author: G0rocks
/// Date: 2026-10-16

use crate::charts::{base_layout, series_color, series_line, series_trace, sorted_by_x, Figure, PlotSet};
use crate::conditions::{Condition, ConditionGroups, CONDITIONS};
use crate::config::PlotStyle;
use crate::fit::prohaska_fit;
use crate::hydro::FrictionLine;
use crate::records::Column;
use crate::stats::{AveragedRecord, DEFAULT_CHANNELS};
use plotly::common::{DashType, ErrorData, ErrorType, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::layout::{Axis, AxisType, BarMode};
use plotly::{Bar, Plot, Scatter};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// Constants
//----------------------------------------------------
/// Tick spacing of Froude number axes
const FROUDE_TICK: f64 = 0.05;

/// Reynolds number range of the friction line overlay, as powers of ten
const REYNOLDS_RANGE: (f64, f64) = (5.0, 8.0);

/// Points per friction line in the overlay
const FRICTION_LINE_POINTS: usize = 120;


// Structs and enums
//----------------------------------------------------
/// The chart scenes, in the order they are drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scene {
    TurbulenceStimulator,
    TrimTab,
    ResistanceSummary,
    EffectivePower,
    Heave,
    Trim,
    Prohaska,
    ErrorPercentages,
    StandardDeviation,
    ReynoldsFriction,
    StimulatorDelta,
    RepeatedRuns,
}

/// Data every scene draws from
pub struct SceneContext<'a> {
    pub groups: &'a ConditionGroups,
    /// Averaged records per condition code
    pub averaged: &'a BTreeMap<u8, Vec<AveragedRecord>>,
    pub style: &'a PlotStyle,
    /// Decimals of the Froude number shared by runs of the same setpoint
    pub froude_decimals: u32,
    pub prohaska_max_froude: Option<f64>,
}

impl Scene {
    pub const ALL: [Scene; 12] = [
        Scene::TurbulenceStimulator,
        Scene::TrimTab,
        Scene::ResistanceSummary,
        Scene::EffectivePower,
        Scene::Heave,
        Scene::Trim,
        Scene::Prohaska,
        Scene::ErrorPercentages,
        Scene::StandardDeviation,
        Scene::ReynoldsFriction,
        Scene::StimulatorDelta,
        Scene::RepeatedRuns,
    ];

    /// Scene number used in file names, starting at 1
    pub fn number(&self) -> u8 {
        match Scene::ALL.iter().position(|s| s == self) {
            Some(i) => i as u8 + 1,
            None => 0,
        }
    }

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Scene::TurbulenceStimulator => "turbulence-stimulator",
            Scene::TrimTab => "trim-tab",
            Scene::ResistanceSummary => "resistance-summary",
            Scene::EffectivePower => "effective-power",
            Scene::Heave => "heave",
            Scene::Trim => "trim",
            Scene::Prohaska => "prohaska",
            Scene::ErrorPercentages => "error-percentages",
            Scene::StandardDeviation => "standard-deviation",
            Scene::ReynoldsFriction => "reynolds-friction",
            Scene::StimulatorDelta => "stimulator-delta",
            Scene::RepeatedRuns => "repeated-runs",
        }
    }

    /// Prefix of the file names of the scene's figures
    pub fn slug(&self) -> String {
        self.name().replace('-', "_")
    }

    pub fn plot_set(&self) -> PlotSet {
        match self {
            Scene::RepeatedRuns => PlotSet::Repeated,
            _ => PlotSet::Averaged,
        }
    }

    /// Builds the figures of the scene. Conditions without runs are skipped,
    /// a scene with nothing to draw returns no figures.
    pub fn build(&self, ctx: &SceneContext) -> Vec<Figure> {
        let figures: Vec<Option<Figure>> = match self {
            Scene::TurbulenceStimulator => {
                let codes = ctx.codes_where(Condition::is_turbulence_stimulator);
                vec![
                    ctx.comparison(*self, "ctm_vs_fr", "Turbulence stimulator comparison: Ctm", &codes, Column::FroudeNumber, Column::Ctm),
                    ctx.comparison(*self, "rtm_vs_fr", "Turbulence stimulator comparison: Rtm", &codes, Column::FroudeNumber, Column::Rtm),
                ]
            }
            Scene::TrimTab => {
                let codes = ctx.codes_where(Condition::is_trim_tab);
                vec![
                    ctx.comparison(*self, "ctm_vs_fr", "Trim tab comparison: Ctm", &codes, Column::FroudeNumber, Column::Ctm),
                    ctx.comparison(*self, "heave_vs_fr", "Trim tab comparison: heave", &codes, Column::FroudeNumber, Column::Heave),
                    ctx.comparison(*self, "trim_vs_fr", "Trim tab comparison: trim", &codes, Column::FroudeNumber, Column::Trim),
                ]
            }
            Scene::ResistanceSummary => {
                let codes = ctx.codes_where(Condition::is_displacement);
                vec![
                    ctx.comparison(*self, "ctm_vs_fr", "Total resistance coefficient", &codes, Column::FroudeNumber, Column::Ctm),
                    ctx.comparison(*self, "rtm_vs_fr", "Total resistance", &codes, Column::FroudeNumber, Column::Rtm),
                    ctx.comparison(*self, "crm_vs_fr", "Residual resistance coefficient (ITTC'57)", &codes, Column::FroudeNumber, Column::CrmIttc57),
                ]
            }
            Scene::EffectivePower => {
                let codes = ctx.codes_where(Condition::is_displacement);
                vec![
                    ctx.comparison(*self, "pes_vs_vs", "Full scale effective power", &codes, Column::FullScaleSpeed, Column::Pes),
                    ctx.comparison(*self, "rts_vs_vs", "Full scale total resistance", &codes, Column::FullScaleSpeed, Column::Rts),
                ]
            }
            Scene::Heave => {
                let codes = ctx.codes_where(Condition::is_displacement);
                vec![ctx.comparison(*self, "heave_vs_fr", "Heave", &codes, Column::FroudeNumber, Column::Heave)]
            }
            Scene::Trim => {
                let codes = ctx.codes_where(Condition::is_displacement);
                vec![ctx.comparison(*self, "trim_vs_fr", "Running trim", &codes, Column::FroudeNumber, Column::Trim)]
            }
            Scene::Prohaska => ctx.groups.codes().into_iter().map(|code| ctx.prohaska(*self, code)).collect(),
            Scene::ErrorPercentages => ctx.averaged.keys().map(|code| ctx.error_percentages(*self, *code)).collect(),
            Scene::StandardDeviation => {
                let mut figures: Vec<Option<Figure>> = ctx.averaged.keys().map(|code| ctx.standard_deviation(*self, *code)).collect();
                figures.push(ctx.standard_deviation_summary(*self));
                figures
            }
            Scene::ReynoldsFriction => vec![Some(ctx.reynolds_friction(*self))],
            Scene::StimulatorDelta => ctx
                .codes_where(Condition::is_displacement)
                .into_iter()
                .flat_map(|code| ctx.stimulator_delta(*self, code))
                .collect(),
            Scene::RepeatedRuns => ctx.groups.codes().into_iter().map(|code| ctx.repeated_runs(*self, code)).collect(),
        };

        let figures: Vec<Figure> = figures.into_iter().flatten().collect();
        if figures.is_empty() {
            tracing::debug!("Scene {} has nothing to draw", self.name());
        }
        figures
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Scene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Scene::ALL
            .iter()
            .copied()
            .find(|scene| scene.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Scene::ALL.iter().map(|scene| scene.name()).collect();
                format!("unknown scene {:?}, expected one of: {}", s, names.join(", "))
            })
    }
}

impl<'a> SceneContext<'a> {
    /// Codes of the conditions matching `predicate` that have runs
    fn codes_where(&self, predicate: impl Fn(&Condition) -> bool) -> Vec<u8> {
        CONDITIONS
            .iter()
            .filter(|condition| predicate(*condition))
            .map(|condition| condition.code)
            .filter(|code| !self.groups.group(*code).is_empty())
            .collect()
    }

    /// Averaged (x, y) points of a condition, display factors applied
    fn averaged_points(&self, code: u8, x: Column, y: Column) -> Vec<(f64, f64)> {
        match self.averaged.get(&code) {
            Some(records) => records.iter().map(|r| (r.mean.display(x), r.mean.display(y))).collect(),
            None => Vec::new(),
        }
    }

    fn figure(&self, scene: Scene, suffix: &str, plot: Plot) -> Figure {
        Figure {
            set: scene.plot_set(),
            number: scene.number(),
            slug: format!("{}_{}", scene.slug(), suffix),
            plot,
        }
    }

    /// Layout with a Froude number x axis ticked every 0.05
    fn froude_layout(&self, title: &str, y_label: &str) -> plotly::Layout {
        base_layout(title, Column::FroudeNumber.label(), y_label, self.style).x_axis(
            Axis::new()
                .title(Title::with_text(Column::FroudeNumber.label()))
                .dtick(FROUDE_TICK)
                .show_grid(true)
                .zero_line(false),
        )
    }

    /// One averaged curve per condition of y against x
    fn comparison(&self, scene: Scene, suffix: &str, title: &str, codes: &[u8], x: Column, y: Column) -> Option<Figure> {
        let mut plot = Plot::new();
        let mut traces: usize = 0;

        for code in codes {
            let points = self.averaged_points(*code, x, y);
            if points.is_empty() {
                continue;
            }
            let (xs, ys) = sorted_by_x(points);
            plot.add_trace(series_trace(xs, ys, *code, condition_label(*code), Mode::LinesMarkers, self.style));
            traces += 1;
        }
        if traces == 0 {
            return None;
        }

        let layout = if x == Column::FroudeNumber {
            self.froude_layout(title, y.label())
        } else {
            base_layout(title, x.label(), y.label(), self.style)
        };
        plot.set_layout(layout);
        Some(self.figure(scene, suffix, plot))
    }

    /// Prohaska points and fitted lines of one condition, both friction lines
    fn prohaska(&self, scene: Scene, code: u8) -> Option<Figure> {
        let runs = self.groups.group(code);
        let mut plot = Plot::new();
        let mut traces: usize = 0;

        for (slot, line) in FrictionLine::ALL.iter().enumerate() {
            let fit = match prohaska_fit(runs, *line, self.prohaska_max_froude) {
                Ok(fit) => fit,
                Err(err) => {
                    tracing::debug!("No Prohaska fit for condition {} ({}): {}", code, line.label(), err);
                    continue;
                }
            };
            let (xs, ys) = sorted_by_x(fit.points.clone());
            let (x_min, x_max) = (xs[0], xs[xs.len() - 1]);
            let (color, symbol, dash) = friction_line_style(slot, self.style);

            plot.add_trace(
                Scatter::new(xs, ys)
                    .name(format!("{} data", line.label()).as_str())
                    .mode(Mode::Markers)
                    .marker(Marker::new().symbol(symbol).size(8).color(color)),
            );
            plot.add_trace(
                Scatter::new(vec![x_min, x_max], vec![fit.fit.evaluate(x_min), fit.fit.evaluate(x_max)])
                    .name(format!("{} fit: 1+k = {:.3}, c = {:.3}, R² = {:.3}", line.label(), fit.form_factor(), fit.slope(), fit.fit.r_squared).as_str())
                    .mode(Mode::Lines)
                    .line(Line::new().color(color).dash(dash).width(1.5)),
            );
            traces += 2;
        }
        if traces == 0 {
            return None;
        }

        let title = format!("Prohaska plot, {}", condition_label(code));
        plot.set_layout(base_layout(&title, "Fr⁴/Cfm [-]", "Ctm/Cfm [-]", self.style));
        Some(self.figure(scene, &format!("condition_{:02}", code), plot))
    }

    /// Percentage spread of every measured channel of one condition
    fn error_percentages(&self, scene: Scene, code: u8) -> Option<Figure> {
        let records = self.averaged.get(&code)?;
        let mut plot = Plot::new();
        let mut traces: usize = 0;

        for (slot, channel) in DEFAULT_CHANNELS.iter().enumerate() {
            let points: Vec<(f64, f64)> = records
                .iter()
                .filter_map(|r| r.stats(*channel).map(|stats| (r.froude_number(), stats.pct_spread)))
                .collect();
            if points.is_empty() {
                continue;
            }
            let (xs, ys) = sorted_by_x(points);
            plot.add_trace(series_trace(xs, ys, slot as u8 + 1, channel.label(), Mode::LinesMarkers, self.style));
            traces += 1;
        }
        if traces == 0 {
            return None;
        }

        let title = format!("Error percentage (max - mean) / max, {}", condition_label(code));
        plot.set_layout(self.froude_layout(&title, "Error [%]"));
        Some(self.figure(scene, &format!("condition_{:02}", code), plot))
    }

    /// Mean drag of one condition with one standard deviation error bars
    fn standard_deviation(&self, scene: Scene, code: u8) -> Option<Figure> {
        let records = self.averaged.get(&code)?;
        let mut points: Vec<(f64, f64, f64)> = records
            .iter()
            .filter_map(|r| r.stats(Column::Drag).map(|stats| (r.froude_number(), stats.mean, stats.std_dev)))
            .collect();
        if points.is_empty() {
            return None;
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let means: Vec<f64> = points.iter().map(|p| p.1).collect();
        let std_devs: Vec<f64> = points.iter().map(|p| p.2).collect();

        let mut plot = Plot::new();
        plot.add_trace(
            series_trace(xs, means, code, condition_label(code), Mode::Markers, self.style)
                .error_y(ErrorData::new(ErrorType::Data).array(std_devs).visible(true)),
        );

        let title = format!("Drag with standard deviation, {}", condition_label(code));
        plot.set_layout(self.froude_layout(&title, Column::Drag.label()));
        Some(self.figure(scene, &format!("condition_{:02}", code), plot))
    }

    /// Standard deviation of drag per setpoint, all conditions side by side
    fn standard_deviation_summary(&self, scene: Scene) -> Option<Figure> {
        let mut plot = Plot::new();
        let mut traces: usize = 0;

        for (code, records) in self.averaged.iter() {
            let points: Vec<(f64, f64)> = records
                .iter()
                .filter_map(|r| r.stats(Column::Drag).map(|stats| (r.froude_number(), stats.std_dev)))
                .collect();
            if points.is_empty() {
                continue;
            }
            let (xs, ys) = sorted_by_x(points);
            plot.add_trace(
                Bar::new(xs, ys)
                    .name(condition_label(*code))
                    .marker(Marker::new().color(series_color(*code, self.style))),
            );
            traces += 1;
        }
        if traces == 0 {
            return None;
        }

        let layout = self.froude_layout("Standard deviation of drag", "Standard deviation of drag [g]").bar_mode(BarMode::Group);
        plot.set_layout(layout);
        Some(self.figure(scene, "all_conditions", plot))
    }

    /// ITTC'57 and Grigson lines over the Reynolds number with the measured model coefficients
    fn reynolds_friction(&self, scene: Scene) -> Figure {
        let mut plot = Plot::new();
        let (log_min, log_max) = REYNOLDS_RANGE;
        let step = (log_max - log_min) / (FRICTION_LINE_POINTS - 1) as f64;
        let reynolds: Vec<f64> = (0..FRICTION_LINE_POINTS).map(|i| 10f64.powf(log_min + step * i as f64)).collect();

        for (slot, line) in FrictionLine::ALL.iter().enumerate() {
            let (color, symbol, dash) = friction_line_style(slot, self.style);

            // Correlation line
            let points: Vec<(f64, f64)> = reynolds
                .iter()
                .filter_map(|re| line.coefficient(*re).map(|cf| (*re, cf * line.cfm_column().display_factor())))
                .collect();
            let (xs, ys) = sorted_by_x(points);
            plot.add_trace(
                Scatter::new(xs, ys)
                    .name(line.label())
                    .mode(Mode::Lines)
                    .line(Line::new().color(color).dash(dash).width(1.5)),
            );

            // Measured points of every condition
            let measured: Vec<(f64, f64)> = self
                .averaged
                .values()
                .flatten()
                .map(|r| (r.mean.get(Column::ReynoldsNumber), r.mean.display(line.cfm_column())))
                .filter(|(re, cf)| *re > 0.0 && *cf > 0.0)
                .collect();
            if measured.is_empty() {
                continue;
            }
            let (xs, ys) = sorted_by_x(measured);
            plot.add_trace(
                Scatter::new(xs, ys)
                    .name(format!("Model, {}", line.label()).as_str())
                    .mode(Mode::Markers)
                    .marker(Marker::new().symbol(symbol).size(7).color(color)),
            );
        }

        let layout = base_layout("Frictional resistance coefficient vs. Reynolds number", Column::ReynoldsNumber.label(), "Cf×10³ [-]", self.style)
            .x_axis(
                Axis::new()
                    .title(Title::with_text(Column::ReynoldsNumber.label()))
                    .type_(AxisType::Log)
                    .show_grid(true),
            );
        plot.set_layout(layout);
        self.figure(scene, "cf_vs_re", plot)
    }

    /// Resistance with and without turbulence stimulators at matching setpoints, and their difference
    fn stimulator_delta(&self, scene: Scene, code: u8) -> Vec<Option<Figure>> {
        let counterpart = match Condition::from_code(code).and_then(|c| c.without_stimulator_counterpart()) {
            Some(counterpart) => counterpart,
            None => return Vec::new(),
        };
        let (with, without) = match (self.averaged.get(&code), self.averaged.get(&counterpart.code)) {
            (Some(with), Some(without)) => (with, without),
            _ => return Vec::new(),
        };

        // Pair setpoints by rounded Froude number
        let scale = 10f64.powi(self.froude_decimals as i32);
        let key = |fr: f64| (fr * scale).round() as i64;
        let mut pairs: Vec<(f64, f64, f64)> = Vec::new();
        for record in with {
            if let Some(other) = without.iter().find(|o| key(o.froude_number()) == key(record.froude_number())) {
                pairs.push((record.froude_number(), record.mean.get(Column::Rtm), other.mean.get(Column::Rtm)));
            }
        }
        if pairs.is_empty() {
            tracing::debug!("Conditions {} and {} share no setpoints", code, counterpart.code);
            return Vec::new();
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let fr: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let rtm_with: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let rtm_without: Vec<f64> = pairs.iter().map(|p| p.2).collect();
        let delta: Vec<f64> = pairs.iter().map(|p| p.1 - p.2).collect();
        let delta_pct: Vec<f64> = pairs.iter().map(|p| if p.2 == 0.0 { 0.0 } else { (p.1 - p.2) / p.2 * 100.0 }).collect();

        // Absolute resistance and difference
        let mut plot = Plot::new();
        plot.add_trace(series_trace(fr.clone(), rtm_with, code, condition_label(code), Mode::LinesMarkers, self.style));
        plot.add_trace(series_trace(fr.clone(), rtm_without, counterpart.code, counterpart.label, Mode::LinesMarkers, self.style));
        plot.add_trace(series_trace(fr.clone(), delta, 4, "Difference (with - without)", Mode::LinesMarkers, self.style));
        plot.set_layout(self.froude_layout(&format!("Turbulence stimulator resistance, {}", condition_label(code)), Column::Rtm.label()));
        let absolute = self.figure(scene, &format!("rtm_condition_{:02}_vs_{:02}", code, counterpart.code), plot);

        // Relative difference
        let mut plot = Plot::new();
        plot.add_trace(series_trace(fr, delta_pct, code, "Rtm with / without - 1", Mode::LinesMarkers, self.style));
        plot.set_layout(self.froude_layout(&format!("Turbulence stimulator resistance increase, {}", condition_label(code)), "Resistance increase [%]"));
        let relative = self.figure(scene, &format!("rtm_increase_condition_{:02}_vs_{:02}", code, counterpart.code), plot);

        vec![Some(absolute), Some(relative)]
    }

    /// Every repeated run of one condition with the averaged curve on top
    fn repeated_runs(&self, scene: Scene, code: u8) -> Option<Figure> {
        let runs = self.groups.group(code);
        if runs.is_empty() {
            return None;
        }

        let mut plot = Plot::new();
        let xs: Vec<f64> = runs.iter().map(|r| r.froude_number()).collect();
        let ys: Vec<f64> = runs.iter().map(|r| r.display(Column::Ctm)).collect();
        plot.add_trace(series_trace(xs, ys, code, &format!("{} runs", condition_label(code)), Mode::Markers, self.style));

        let averaged = self.averaged_points(code, Column::FroudeNumber, Column::Ctm);
        if !averaged.is_empty() {
            let (xs, ys) = sorted_by_x(averaged);
            plot.add_trace(
                Scatter::new(xs, ys)
                    .name("Averaged")
                    .mode(Mode::Lines)
                    .line(series_line(code, self.style).dash(DashType::Dash)),
            );
        }

        plot.set_layout(self.froude_layout(&format!("Repeated runs, {}", condition_label(code)), Column::Ctm.label()));
        Some(self.figure(scene, &format!("condition_{:02}", code), plot))
    }
}


// Functions
//----------------------------------------------------
/// Legend label of a condition code
fn condition_label(code: u8) -> &'static str {
    match Condition::from_code(code) {
        Some(condition) => condition.label,
        None => "Unknown condition",
    }
}

/// Colour, marker and dash of a friction line series
fn friction_line_style(slot: usize, style: &PlotStyle) -> (plotly::color::Rgb, MarkerSymbol, DashType) {
    // Slots 1 and 4 of the palette are the most distinct pair
    let palette_slot = if slot == 0 { 1 } else { 4 };
    let marker_symbol = if slot == 0 { MarkerSymbol::Circle } else { MarkerSymbol::Square };
    let dash = if slot == 0 { DashType::Solid } else { DashType::Dash };
    (series_color(palette_slot, style), marker_symbol, dash)
}


// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::partition_by_condition;
    use crate::records::tests::run;
    use crate::records::RunRecord;
    use crate::stats::RepeatAggregator;

    fn campaign() -> Vec<RunRecord> {
        let mut records = Vec::new();
        for code in [1u8, 2, 7, 13] {
            for (i, fr) in [0.10, 0.12, 0.14, 0.16, 0.30].iter().enumerate() {
                for repeat in 0..2 {
                    let mut record = run(code, *fr, 1.0 + i as f64, 100.0 + code as f64 + repeat as f64);
                    record.set(Column::Rtm, 1.0 + fr * 10.0 + if code == 13 { 0.0 } else { 0.1 });
                    record.set(Column::ReynoldsNumber, 1e6 * (1.0 + i as f64));
                    records.push(record);
                }
            }
        }
        records
    }

    fn with_context<T>(records: &[RunRecord], f: impl FnOnce(&SceneContext) -> T) -> T {
        let groups = partition_by_condition(records);
        let aggregator = RepeatAggregator::default();
        let averaged: BTreeMap<u8, Vec<AveragedRecord>> = groups.iter().map(|(code, runs)| (code, aggregator.aggregate(runs))).collect();
        let style = PlotStyle::default();
        let ctx = SceneContext {
            groups: &groups,
            averaged: &averaged,
            style: &style,
            froude_decimals: 2,
            prohaska_max_froude: Some(0.2),
        };
        f(&ctx)
    }

    #[test]
    fn scene_numbers_and_names_round_trip() {
        for (i, scene) in Scene::ALL.iter().enumerate() {
            assert_eq!(scene.number() as usize, i + 1);
            assert_eq!(scene.name().parse::<Scene>().unwrap(), *scene);
        }
        assert_eq!("error_percentages".parse::<Scene>().unwrap(), Scene::ErrorPercentages);
        assert!("nonsense".parse::<Scene>().is_err());
    }

    #[test]
    fn turbulence_stimulator_scene_skips_empty_conditions() {
        let figures = with_context(&campaign(), |ctx| Scene::TurbulenceStimulator.build(ctx));
        assert_eq!(figures.len(), 2);
        let json = figures[0].plot.to_json();
        assert!(json.contains("1 - Bare hull"));
        assert!(json.contains("2 - 1st row"));
        assert!(!json.contains("3 - 1st and 2nd row"));
        assert_eq!(figures[0].file_stem(), "Plot_01_turbulence_stimulator_ctm_vs_fr");
    }

    #[test]
    fn trim_tab_scene_without_runs_draws_nothing() {
        let figures = with_context(&campaign(), |ctx| Scene::TrimTab.build(ctx));
        assert!(figures.is_empty());
    }

    #[test]
    fn prohaska_scene_reports_form_factor() {
        let figures = with_context(&campaign(), |ctx| Scene::Prohaska.build(ctx));
        assert_eq!(figures.len(), 4);
        let json = figures[0].plot.to_json();
        assert!(json.contains("ITTC'57 fit: 1+k"));
        assert!(json.contains("Grigson fit: 1+k"));
    }

    #[test]
    fn stimulator_delta_pairs_condition_7_with_13() {
        let figures = with_context(&campaign(), |ctx| Scene::StimulatorDelta.build(ctx));
        assert_eq!(figures.len(), 2);
        assert_eq!(figures[0].file_stem(), "Plot_11_stimulator_delta_rtm_condition_07_vs_13");
        assert!(figures[0].plot.to_json().contains("Difference (with - without)"));
    }

    #[test]
    fn statistics_scenes_draw_one_figure_per_condition() {
        let records = campaign();
        let errors = with_context(&records, |ctx| Scene::ErrorPercentages.build(ctx));
        assert_eq!(errors.len(), 4);
        let std_devs = with_context(&records, |ctx| Scene::StandardDeviation.build(ctx));
        // One per condition plus the summary
        assert_eq!(std_devs.len(), 5);
        assert_eq!(std_devs[4].file_stem(), "Plot_09_standard_deviation_all_conditions");
    }

    #[test]
    fn repeated_runs_go_to_their_own_set() {
        let figures = with_context(&campaign(), |ctx| Scene::RepeatedRuns.build(ctx));
        assert_eq!(figures.len(), 4);
        assert!(figures.iter().all(|f| f.set == PlotSet::Repeated));
    }

    #[test]
    fn reynolds_overlay_always_has_the_friction_lines() {
        let figures = with_context(&campaign(), |ctx| Scene::ReynoldsFriction.build(ctx));
        assert_eq!(figures.len(), 1);
        let json = figures[0].plot.to_json();
        assert!(json.contains("Model, ITTC'57"));
        assert!(json.contains("\"log\""));
    }
}
