/// Least squares line fit and the Prohaska form factor estimate.
/// Author: G0rocks
/// Date: 2026-10-16

use crate::error::AnalysisError;
use crate::hydro::FrictionLine;
use crate::records::{Column, RunRecord};

// Structs and enums
//----------------------------------------------------
/// Straight line y = slope * x + intercept with its coefficient of determination
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, 1 - SSres / SStot
    pub r_squared: f64,
}

impl LinearFit {
    /// Value of the line at x
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Prohaska fit of one condition for one friction line
#[derive(Debug, Clone, PartialEq)]
pub struct ProhaskaFit {
    pub friction_line: FrictionLine,
    /// Fitted line of Ctm/Cfm against Fr^4/Cfm
    pub fit: LinearFit,
    /// The fitted points (Fr^4/Cfm, Ctm/Cfm)
    pub points: Vec<(f64, f64)>,
}

impl ProhaskaFit {
    /// Form factor (1+k), the intercept of Ctm/Cfm = (1+k) + c Fr^4/Cfm
    pub fn form_factor(&self) -> f64 {
        self.fit.intercept
    }

    /// Slope c of the Prohaska line
    pub fn slope(&self) -> f64 {
        self.fit.slope
    }
}


// Functions
//----------------------------------------------------
/// Ordinary least squares fit of a straight line through (x, y).
/// Needs at least two points with different x values.
pub fn least_squares(x: &[f64], y: &[f64]) -> Result<LinearFit, AnalysisError> {
    // Check that the vectors pair up
    if x.len() != y.len() {
        return Err(AnalysisError::InsufficientData(format!("{} x values for {} y values", x.len(), y.len())));
    }
    if x.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!("a line fit needs at least 2 points, got {}", x.len())));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    // Centered sums
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut ss_tot = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        sxx += (xi - x_mean).powi(2);
        sxy += (xi - x_mean) * (yi - y_mean);
        ss_tot += (yi - y_mean).powi(2);
    }

    if sxx == 0.0 {
        return Err(AnalysisError::DegenerateFit);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    // Residual sum of squares
    let ss_res: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| (yi - (slope * xi + intercept)).powi(2)).sum();

    // A horizontal line through constant y is an exact fit
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    return Ok(LinearFit { slope, intercept, r_squared });
}

/// Prohaska plot coordinates (Fr^4/Cfm, Ctm/Cfm) of the runs with Fr <= max_froude.
/// Runs without a friction coefficient are left out.
pub fn prohaska_points(records: &[RunRecord], friction_line: FrictionLine, max_froude: Option<f64>) -> Vec<(f64, f64)> {
    records
        .iter()
        .filter(|r| max_froude.is_none_or(|limit| r.froude_number() <= limit))
        .filter_map(|r| {
            let cfm = r.get(friction_line.cfm_column());
            if cfm <= 0.0 {
                return None;
            }
            Some((r.froude_number().powi(4) / cfm, r.get(Column::Ctm) / cfm))
        })
        .collect()
}

/// Fits the Prohaska line of a set of runs for one friction line
pub fn prohaska_fit(records: &[RunRecord], friction_line: FrictionLine, max_froude: Option<f64>) -> Result<ProhaskaFit, AnalysisError> {
    let points = prohaska_points(records, friction_line, max_froude);
    let x: Vec<f64> = points.iter().map(|p| p.0).collect();
    let y: Vec<f64> = points.iter().map(|p| p.1).collect();
    let fit = least_squares(&x, &y)?;

    tracing::debug!(
        "Prohaska {}: 1+k = {:.4}, c = {:.4}, R² = {:.4} from {} points",
        friction_line.label(),
        fit.intercept,
        fit.slope,
        fit.r_squared,
        points.len()
    );
    return Ok(ProhaskaFit { friction_line, fit, points });
}


// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;
    use crate::records::tests::run;

    #[test]
    fn collinear_points_are_recovered_exactly() {
        let x = vec![0.5, 1.0, 2.0, 3.5, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 1.25).collect();
        let fit = least_squares(&x, &y).unwrap();
        assert_close!(fit.slope, 2.5, 1e-12);
        assert_close!(fit.intercept, -1.25, 1e-12);
        assert_close!(fit.r_squared, 1.0, 1e-12);
        assert_close!(fit.evaluate(4.0), 8.75, 1e-12);
    }

    #[test]
    fn noisy_points_have_r_squared_below_one() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![1.1, 1.9, 3.2, 3.8];
        let fit = least_squares(&x, &y).unwrap();
        assert!(fit.r_squared < 1.0 && fit.r_squared > 0.9);
    }

    #[test]
    fn constant_y_is_an_exact_horizontal_fit() {
        let fit = least_squares(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(matches!(least_squares(&[1.0], &[2.0]), Err(AnalysisError::InsufficientData(_))));
        assert!(matches!(least_squares(&[1.0, 2.0], &[2.0]), Err(AnalysisError::InsufficientData(_))));
        assert!(matches!(least_squares(&[1.0, 1.0], &[2.0, 3.0]), Err(AnalysisError::DegenerateFit)));
    }

    #[test]
    fn prohaska_recovers_form_factor() {
        // Ctm = Cfm * (1.2 + 3 Fr^4 / Cfm) for a constant Cfm
        let cfm = 0.004;
        let records: Vec<RunRecord> = [0.10, 0.12, 0.14, 0.16, 0.18, 0.30]
            .iter()
            .map(|fr: &f64| {
                let mut record = run(7, *fr, 1.0, 100.0);
                record.set(Column::CfmIttc57, cfm);
                record.set(Column::Ctm, cfm * (1.2 + 3.0 * fr.powi(4) / cfm));
                record
            })
            .collect();

        let fit = prohaska_fit(&records, FrictionLine::Ittc57, Some(0.2)).unwrap();
        assert_eq!(fit.points.len(), 5);
        assert_close!(fit.form_factor(), 1.2, 1e-9);
        assert_close!(fit.slope(), 3.0, 1e-6);
        assert_close!(fit.fit.r_squared, 1.0, 1e-9);
    }

    #[test]
    fn prohaska_skips_runs_without_friction_coefficient() {
        let mut record = run(7, 0.1, 1.0, 100.0);
        record.set(Column::CfmGrigson, 0.0);
        assert!(prohaska_points(&[record], FrictionLine::Grigson, None).is_empty());
    }
}
