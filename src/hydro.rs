/// Friction lines and non-dimensional numbers used by the towing tank analysis.
/// Author: G0rocks
/// Date: 2026-10-16
///
/// Quantities enter as `uom` types so callers cannot mix up millimetres and metres,
/// the returned coefficients are plain f64 since they are dimensionless.

use crate::records::Column;
use uom::si::f64::{DiffusionCoefficient, Length, ThermodynamicTemperature, Velocity};
use uom::si::{diffusion_coefficient, length, thermodynamic_temperature, velocity};

// Constants
//----------------------------------------------------
/// Standard gravity in [m/s^2]
pub const GRAVITY: f64 = 9.80665;

/// Reynolds number where the Grigson line switches from the model range correction to the full scale correction
const GRIGSON_SWITCH_LOG_RE: f64 = 8.0;


// Structs and enums
//----------------------------------------------------
/// Correlation line used to estimate the frictional resistance coefficient from the Reynolds number
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrictionLine {
    /// ITTC 1957 model-ship correlation line
    Ittc57,
    /// Grigson's correction of the ITTC 1957 line
    Grigson,
}

impl FrictionLine {
    /// Both lines, in the order they are plotted
    pub const ALL: [FrictionLine; 2] = [FrictionLine::Ittc57, FrictionLine::Grigson];

    /// Frictional resistance coefficient at Reynolds number `re`.
    /// Returns None where the line is undefined (Re <= 100 or not finite).
    pub fn coefficient(&self, re: f64) -> Option<f64> {
        match self {
            FrictionLine::Ittc57 => ittc57_friction_coefficient(re),
            FrictionLine::Grigson => grigson_friction_coefficient(re),
        }
    }

    /// Label used in legends
    pub fn label(&self) -> &'static str {
        match self {
            FrictionLine::Ittc57 => "ITTC'57",
            FrictionLine::Grigson => "Grigson",
        }
    }

    /// Column of the run table holding the model frictional coefficient for this line
    pub fn cfm_column(&self) -> Column {
        match self {
            FrictionLine::Ittc57 => Column::CfmIttc57,
            FrictionLine::Grigson => Column::CfmGrigson,
        }
    }

    /// Column of the run table holding the model residual coefficient for this line
    pub fn crm_column(&self) -> Column {
        match self {
            FrictionLine::Ittc57 => Column::CrmIttc57,
            FrictionLine::Grigson => Column::CrmGrigson,
        }
    }
}


// Functions
//----------------------------------------------------
/// ITTC 1957 line: Cf = 0.075 / (log10(Re) - 2)^2
pub fn ittc57_friction_coefficient(re: f64) -> Option<f64> {
    if !re.is_finite() || re <= 100.0 {
        return None;
    }
    let denominator = re.log10() - 2.0;
    return Some(0.075 / (denominator * denominator));
}

/// Grigson line, a polynomial correction of the ITTC 1957 line.
/// Below Re = 1e8 the model range correction is used, above it the full scale correction.
pub fn grigson_friction_coefficient(re: f64) -> Option<f64> {
    let ittc = ittc57_friction_coefficient(re)?;
    let log_re = re.log10();

    let correction = if log_re < GRIGSON_SWITCH_LOG_RE {
        let a = log_re - 6.3;
        0.93 + 0.1377 * a.powi(2) - 0.06334 * a.powi(4)
    } else {
        let b = log_re - 8.0;
        1.032 + 0.02816 * b - 0.006273 * b.powi(2)
    };

    return Some(correction * ittc);
}

/// Froude number Fr = V / sqrt(g L)
pub fn froude_number(speed: Velocity, waterline_length: Length) -> f64 {
    let v = speed.get::<velocity::meter_per_second>();
    let l = waterline_length.get::<length::meter>();
    if l <= 0.0 {
        return 0.0;
    }
    v / (GRAVITY * l).sqrt()
}

/// Reynolds number Re = V L / nu
pub fn reynolds_number(speed: Velocity, waterline_length: Length, viscosity: DiffusionCoefficient) -> f64 {
    if viscosity.get::<diffusion_coefficient::square_meter_per_second>() <= 0.0 {
        return 0.0;
    }
    // Dimensionless, so the base unit value is the number itself
    (speed * waterline_length / viscosity).value
}

/// Kinematic viscosity of fresh water (ITTC 7.5-02-01-03)
pub fn fresh_water_viscosity(temperature: ThermodynamicTemperature) -> DiffusionCoefficient {
    let t = temperature.get::<thermodynamic_temperature::degree_celsius>() - 12.0;
    let nu = ((0.000585 * t - 0.03361) * t + 1.235) * 1e-6;
    DiffusionCoefficient::new::<diffusion_coefficient::square_meter_per_second>(nu)
}

/// Density of fresh water in [kg/m^3] (ITTC 7.5-02-01-03)
pub fn fresh_water_density(temperature: ThermodynamicTemperature) -> f64 {
    let t = temperature.get::<thermodynamic_temperature::degree_celsius>();
    1000.1 + 0.0552 * t - 0.0077 * t.powi(2) + 0.00004 * t.powi(3)
}
