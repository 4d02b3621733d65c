/// Towing tank analysis reads the run table of a ship model resistance test campaign,
/// averages the repeated runs of every condition and draws the resistance, power, heave, trim,
/// Prohaska and error charts of the campaign.
/// Author: G0rocks
/// Date: 2026-10-16
///
/// # Example:
/// ```no_run
/// use towing_tank_analysis::{run_analysis, AnalysisConfig, PlotlySink};
///
/// let config = AnalysisConfig::default();
/// let report = run_analysis(&config, &mut PlotlySink).unwrap();
/// println!("{} figures written", report.figures);
/// ```

// Internal modules
pub mod charts;
pub use crate::charts::*;
pub mod conditions;
pub use crate::conditions::*;
pub mod config;
pub use crate::config::*;
pub mod error;
pub use crate::error::*;
pub mod export;
pub use crate::export::*;
pub mod fit;
pub use crate::fit::*;
pub mod hydro;
pub use crate::hydro::*;
pub mod pipeline;
pub use crate::pipeline::*;
pub mod records;
pub use crate::records::*;
pub mod stats;
pub use crate::stats::*;


/// Asserts that two floats are within `tol` of each other
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tol:expr) => {{
        let (left, right, tol): (f64, f64, f64) = ($left, $right, $tol);
        assert!(
            (left - right).abs() <= tol,
            "assertion failed: |{} - {}| = {} > {}",
            left,
            right,
            (left - right).abs(),
            tol
        );
    }};
}
