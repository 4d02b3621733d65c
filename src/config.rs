/// Configuration of an analysis run: which chart scenes to draw, how they look and where they go.
/// Author: G0rocks
/// Date: 2026-10-16
///
/// Every field has a default, so a JSON file only needs the fields that differ, e.g.
/// ```json
/// { "style": { "black_and_white": true }, "scenes": { "repeated_runs": false } }
/// ```

use crate::charts::{ChartFormat, Scene};
use crate::error::AnalysisError;
use crate::records::DEFAULT_INPUT_FILE;
use crate::stats::DEFAULT_FROUDE_DECIMALS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Constants
//----------------------------------------------------
/// Figure size on screen in pixels
const SCREEN_SIZE: (usize, usize) = (1000, 700);
/// A4 landscape at 96 dpi
const A4_SIZE: (usize, usize) = (1123, 794);
/// Upper Froude number of the runs used for the Prohaska fit
pub const DEFAULT_PROHASKA_MAX_FROUDE: f64 = 0.2;


// Structs and enums
//----------------------------------------------------
/// Enable flag per chart scene
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFlags {
    pub turbulence_stimulator: bool,
    pub trim_tab: bool,
    pub resistance_summary: bool,
    pub effective_power: bool,
    pub heave: bool,
    pub trim: bool,
    pub prohaska: bool,
    pub error_percentages: bool,
    pub standard_deviation: bool,
    pub reynolds_friction: bool,
    pub stimulator_delta: bool,
    pub repeated_runs: bool,
}

impl Default for SceneFlags {
    fn default() -> Self {
        SceneFlags::all(true)
    }
}

impl SceneFlags {
    /// Every flag set to `enabled`
    pub fn all(enabled: bool) -> SceneFlags {
        SceneFlags {
            turbulence_stimulator: enabled,
            trim_tab: enabled,
            resistance_summary: enabled,
            effective_power: enabled,
            heave: enabled,
            trim: enabled,
            prohaska: enabled,
            error_percentages: enabled,
            standard_deviation: enabled,
            reynolds_friction: enabled,
            stimulator_delta: enabled,
            repeated_runs: enabled,
        }
    }

    /// Only the given scenes enabled
    pub fn only(scenes: &[Scene]) -> SceneFlags {
        let mut flags = SceneFlags::all(false);
        for scene in scenes {
            *flags.flag_mut(*scene) = true;
        }
        flags
    }

    pub fn is_enabled(&self, scene: Scene) -> bool {
        match scene {
            Scene::TurbulenceStimulator => self.turbulence_stimulator,
            Scene::TrimTab => self.trim_tab,
            Scene::ResistanceSummary => self.resistance_summary,
            Scene::EffectivePower => self.effective_power,
            Scene::Heave => self.heave,
            Scene::Trim => self.trim,
            Scene::Prohaska => self.prohaska,
            Scene::ErrorPercentages => self.error_percentages,
            Scene::StandardDeviation => self.standard_deviation,
            Scene::ReynoldsFriction => self.reynolds_friction,
            Scene::StimulatorDelta => self.stimulator_delta,
            Scene::RepeatedRuns => self.repeated_runs,
        }
    }

    fn flag_mut(&mut self, scene: Scene) -> &mut bool {
        match scene {
            Scene::TurbulenceStimulator => &mut self.turbulence_stimulator,
            Scene::TrimTab => &mut self.trim_tab,
            Scene::ResistanceSummary => &mut self.resistance_summary,
            Scene::EffectivePower => &mut self.effective_power,
            Scene::Heave => &mut self.heave,
            Scene::Trim => &mut self.trim,
            Scene::Prohaska => &mut self.prohaska,
            Scene::ErrorPercentages => &mut self.error_percentages,
            Scene::StandardDeviation => &mut self.standard_deviation,
            Scene::ReynoldsFriction => &mut self.reynolds_friction,
            Scene::StimulatorDelta => &mut self.stimulator_delta,
            Scene::RepeatedRuns => &mut self.repeated_runs,
        }
    }
}

/// Look of the figures
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Black markers and dash patterns instead of the colour palette
    pub black_and_white: bool,
    /// Size figures for an A4 page instead of the screen
    pub a4_paper: bool,
    /// Draw the figure title
    pub show_titles: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            black_and_white: false,
            a4_paper: false,
            show_titles: true,
        }
    }
}

impl PlotStyle {
    /// Width and height of a figure in pixels
    pub fn figure_size(&self) -> (usize, usize) {
        if self.a4_paper { A4_SIZE } else { SCREEN_SIZE }
    }
}

/// Everything an analysis run needs to know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run table to read
    pub input: PathBuf,
    /// Directory the `_plots` tree is created in
    pub output_root: PathBuf,
    pub scenes: SceneFlags,
    pub style: PlotStyle,
    /// Formats every figure is written in
    pub formats: Vec<ChartFormat>,
    /// Decimals of the Froude number two runs must share to be repeats
    pub froude_decimals: u32,
    /// Runs above this Froude number are left out of the Prohaska fit, None uses all runs
    pub prohaska_max_froude: Option<f64>,
    /// Also write the averaged condition tables as csv under `_data`
    pub export_averaged_csv: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output_root: PathBuf::from("."),
            scenes: SceneFlags::default(),
            style: PlotStyle::default(),
            formats: vec![ChartFormat::Pdf, ChartFormat::Png, ChartFormat::Eps],
            froude_decimals: DEFAULT_FROUDE_DECIMALS,
            prohaska_max_froude: Some(DEFAULT_PROHASKA_MAX_FROUDE),
            export_averaged_csv: true,
        }
    }
}

impl AnalysisConfig {
    /// Reads a configuration from a JSON file, missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<AnalysisConfig, AnalysisError> {
        let text = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&text).map_err(|source| AnalysisError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Read configuration from {}", path.display());
        return Ok(config);
    }
}


// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{ "style": { "black_and_white": true }, "scenes": { "heave": false } }"#).unwrap();
        assert!(config.style.black_and_white);
        assert!(config.style.show_titles);
        assert!(!config.scenes.heave);
        assert!(config.scenes.trim);
        assert_eq!(config.formats, vec![ChartFormat::Pdf, ChartFormat::Png, ChartFormat::Eps]);
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT_FILE));
    }

    #[test]
    fn formats_parse_lowercase() {
        let config: AnalysisConfig = serde_json::from_str(r#"{ "formats": ["png", "html"] }"#).unwrap();
        assert_eq!(config.formats, vec![ChartFormat::Png, ChartFormat::Html]);
    }

    #[test]
    fn only_enables_listed_scenes() {
        let flags = SceneFlags::only(&[Scene::Prohaska, Scene::Trim]);
        for scene in Scene::ALL {
            assert_eq!(flags.is_enabled(scene), scene == Scene::Prohaska || scene == Scene::Trim);
        }
    }

    #[test]
    fn a4_changes_figure_size() {
        let style = PlotStyle { a4_paper: true, ..PlotStyle::default() };
        assert_eq!(style.figure_size(), A4_SIZE);
        assert_eq!(PlotStyle::default().figure_size(), SCREEN_SIZE);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("towing_tank_config_{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AnalysisConfig::from_file(&path), Err(AnalysisError::Config { .. })));
    }
}
