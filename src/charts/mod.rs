/// Chart figures and where they are written.
/// Author: G0rocks
/// Date: 2026-10-16
///
/// Figures are plotly plots. They are handed to a [`ChartSink`] once per output format,
/// [`PlotlySink`] writes them to disk, [`MemorySink`] only records them (dry runs and tests).

use crate::config::PlotStyle;
use crate::error::AnalysisError;
use plotly::color::Rgb;
use plotly::common::{DashType, Font, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::layout::{Axis, Legend};
use plotly::{Layout, Plot, Scatter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod scenes;
pub use crate::charts::scenes::*;

// Constants
//----------------------------------------------------
/// Directory all chart sets are written under
pub const PLOTS_DIRECTORY: &str = "_plots";

/// One colour per condition code, index = code - 1
const PALETTE: [(u8, u8, u8); 13] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
    (0, 0, 128),
    (128, 0, 0),
    (0, 100, 0),
];

/// One marker per condition code, index = code - 1
const MARKERS: [MarkerSymbol; 13] = [
    MarkerSymbol::Circle,
    MarkerSymbol::Square,
    MarkerSymbol::Diamond,
    MarkerSymbol::TriangleUp,
    MarkerSymbol::TriangleDown,
    MarkerSymbol::TriangleLeft,
    MarkerSymbol::TriangleRight,
    MarkerSymbol::Pentagon,
    MarkerSymbol::Hexagon,
    MarkerSymbol::Star,
    MarkerSymbol::Cross,
    MarkerSymbol::X,
    MarkerSymbol::Octagon,
];

/// Dash patterns cycled through in black and white
const DASHES: [DashType; 4] = [DashType::Solid, DashType::Dash, DashType::Dot, DashType::DashDot];


// Structs and enums
//----------------------------------------------------
/// File format a figure is written in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    Pdf,
    Png,
    Eps,
    /// Interactive plotly page
    Html,
}

impl ChartFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Pdf => "pdf",
            ChartFormat::Png => "png",
            ChartFormat::Eps => "eps",
            ChartFormat::Html => "html",
        }
    }

    /// Name of the directory the format is collected in
    pub fn directory(&self) -> &'static str {
        match self {
            ChartFormat::Pdf => "PDF",
            ChartFormat::Png => "PNG",
            ChartFormat::Eps => "EPS",
            ChartFormat::Html => "HTML",
        }
    }

    /// Static image format for kaleido, None for html
    fn image_format(&self) -> Option<plotly::ImageFormat> {
        match self {
            ChartFormat::Pdf => Some(plotly::ImageFormat::PDF),
            ChartFormat::Png => Some(plotly::ImageFormat::PNG),
            ChartFormat::Eps => Some(plotly::ImageFormat::EPS),
            ChartFormat::Html => None,
        }
    }
}

/// Group of charts sharing an output directory
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlotSet {
    /// Charts of the averaged condition curves
    Averaged,
    /// Charts of the individual repeated runs
    Repeated,
}

impl PlotSet {
    pub fn directory(&self) -> &'static str {
        match self {
            PlotSet::Averaged => "_averaged",
            PlotSet::Repeated => "_repeated",
        }
    }
}

/// A finished chart waiting to be written
pub struct Figure {
    pub set: PlotSet,
    /// Number of the scene the figure belongs to
    pub number: u8,
    /// Lowercase description used in the file name
    pub slug: String,
    pub plot: Plot,
}

impl Figure {
    /// File name without extension, e.g. `Plot_07_prohaska_condition_07`
    pub fn file_stem(&self) -> String {
        format!("Plot_{:02}_{}", self.number, self.slug)
    }
}

/// Directory layout of the output tree, `<root>/_plots/<set>/<FORMAT>/`
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> OutputLayout {
        OutputLayout { root: root.to_path_buf() }
    }

    /// Directory of a plot set and format
    pub fn directory(&self, set: PlotSet, format: ChartFormat) -> PathBuf {
        self.root.join(PLOTS_DIRECTORY).join(set.directory()).join(format.directory())
    }

    /// Full path of a figure in a format
    pub fn path(&self, figure: &Figure, format: ChartFormat) -> PathBuf {
        self.directory(figure.set, format).join(format!("{}.{}", figure.file_stem(), format.extension()))
    }

    /// Directory the averaged csv tables go to
    pub fn data_directory(&self) -> PathBuf {
        self.root.join("_data")
    }

    /// Creates the directories of a plot set for every format. Existing directories are left alone.
    pub fn ensure_directories(&self, set: PlotSet, formats: &[ChartFormat]) -> Result<(), AnalysisError> {
        for format in formats {
            let directory = self.directory(set, *format);
            if !directory.is_dir() {
                std::fs::create_dir_all(&directory)?;
                tracing::debug!("Created {}", directory.display());
            }
        }
        Ok(())
    }
}

/// Destination of finished figures
pub trait ChartSink {
    /// Whether the sink needs the output directories on disk
    fn writes_files(&self) -> bool {
        true
    }

    /// Writes one figure in one format to `path`
    fn save(&mut self, figure: &Figure, path: &Path, format: ChartFormat, style: &PlotStyle) -> Result<(), AnalysisError>;
}

/// Writes figures with plotly, static formats through kaleido
#[derive(Debug, Default)]
pub struct PlotlySink;

impl ChartSink for PlotlySink {
    fn save(&mut self, figure: &Figure, path: &Path, format: ChartFormat, style: &PlotStyle) -> Result<(), AnalysisError> {
        match format.image_format() {
            Some(image_format) => {
                let (width, height) = style.figure_size();
                figure.plot.write_image(path, image_format, width, height, 1.0);
            }
            None => figure.plot.write_html(path),
        }

        // A figure counts as written only once the file is on disk
        if !path.exists() {
            return Err(AnalysisError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("plotly did not write {}", path.display()),
            )));
        }
        return Ok(());
    }
}

/// A figure recorded by [`MemorySink`]
#[derive(Debug, Clone)]
pub struct SavedFigure {
    pub path: PathBuf,
    pub format: ChartFormat,
    /// Plotly JSON of the figure
    pub json: String,
}

/// Keeps the figures in memory instead of writing them
#[derive(Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<SavedFigure>,
}

impl ChartSink for MemorySink {
    fn writes_files(&self) -> bool {
        false
    }

    fn save(&mut self, figure: &Figure, path: &Path, format: ChartFormat, _style: &PlotStyle) -> Result<(), AnalysisError> {
        tracing::debug!("Would write {}", path.display());
        self.saved.push(SavedFigure {
            path: path.to_path_buf(),
            format,
            json: figure.plot.to_json(),
        });
        Ok(())
    }
}


// Styling helpers
//----------------------------------------------------
/// Colour of a palette slot (the condition code for per-condition traces), black in black and white
pub fn series_color(slot: u8, style: &PlotStyle) -> Rgb {
    if style.black_and_white {
        return Rgb::new(0, 0, 0);
    }
    let (r, g, b) = PALETTE[palette_index(slot)];
    Rgb::new(r, g, b)
}

/// Marker of a palette slot
pub fn series_marker(slot: u8, style: &PlotStyle) -> Marker {
    Marker::new()
        .symbol(MARKERS[palette_index(slot)].clone())
        .size(8)
        .color(series_color(slot, style))
}

/// Line of a palette slot, dashed patterns only in black and white
pub fn series_line(slot: u8, style: &PlotStyle) -> Line {
    let dash = if style.black_and_white { DASHES[palette_index(slot) % DASHES.len()].clone() } else { DashType::Solid };
    Line::new().color(series_color(slot, style)).dash(dash).width(1.5)
}

/// Scatter trace of one series, styled by its palette slot
pub fn series_trace(x: Vec<f64>, y: Vec<f64>, slot: u8, name: &str, mode: Mode, style: &PlotStyle) -> Box<Scatter<f64, f64>> {
    Scatter::new(x, y)
        .name(name)
        .mode(mode)
        .marker(series_marker(slot, style))
        .line(series_line(slot, style))
}

/// Layout shared by every figure: axis titles, grid, legend and page size
pub fn base_layout(title: &str, x_label: &str, y_label: &str, style: &PlotStyle) -> Layout {
    let (width, height) = style.figure_size();
    let font_size = if style.a4_paper { 14 } else { 12 };

    let mut layout = Layout::new()
        .font(Font::new().family("Times New Roman").size(font_size))
        .x_axis(Axis::new().title(Title::with_text(x_label)).show_grid(true).zero_line(false))
        .y_axis(Axis::new().title(Title::with_text(y_label)).show_grid(true).zero_line(false))
        .legend(Legend::new().x(0.01).y(0.99))
        .show_legend(true)
        .width(width)
        .height(height);

    if style.show_titles {
        layout = layout.title(Title::with_text(title));
    }
    layout
}

/// Sorts paired values by x so lines do not zig-zag
pub fn sorted_by_x(mut points: Vec<(f64, f64)>) -> (Vec<f64>, Vec<f64>) {
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points.into_iter().unzip()
}

fn palette_index(slot: u8) -> usize {
    (slot.max(1) as usize - 1) % PALETTE.len()
}
