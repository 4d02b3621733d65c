/// Run records and the loader for the full resistance data table.
/// Author: G0rocks
/// Date: 2026-10-16
///
/// The table is a comma separated file without header. Every row is one towing tank run,
/// the first 27 fields follow the layout of [`Column`] and the LAST field is the condition code.
/// Longer rows (older layouts carry up to ~53 fields) are accepted, the extra fields are ignored.

use crate::error::AnalysisError;
use crate::hydro::{self, FrictionLine};
use std::path::{Path, PathBuf};
use uom::si::f64::{DiffusionCoefficient, Length, ThermodynamicTemperature, Velocity};
use uom::si::{diffusion_coefficient, length, thermodynamic_temperature, velocity};

// Constants
//----------------------------------------------------
/// Default file name of the run table
pub const DEFAULT_INPUT_FILE: &str = "full_resistance_data.dat";

/// Grams to newtons
const GRAMS_TO_NEWTONS: f64 = hydro::GRAVITY / 1000.0;


// Structs and enums
//----------------------------------------------------
/// Columns of the run table, in file order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    RunNo,
    /// Sampling frequency [Hz]
    SampleFrequency,
    SampleCount,
    /// Record time [s]
    RecordTime,
    /// Model speed [m/s]
    ModelSpeed,
    /// Forward LVDT [mm]
    FwdLvdt,
    /// Aft LVDT [mm]
    AftLvdt,
    /// Drag [g]
    Drag,
    /// Model total resistance [N]
    Rtm,
    /// Water temperature [°C]
    WaterTemperature,
    /// Kinematic viscosity [m^2/s]
    KinematicViscosity,
    /// Water density [kg/m^3]
    WaterDensity,
    /// Model waterline length [m]
    ModelLength,
    /// Model wetted surface area [m^2]
    WettedSurface,
    FroudeNumber,
    ReynoldsNumber,
    Ctm,
    CfmIttc57,
    CfmGrigson,
    CrmIttc57,
    CrmGrigson,
    /// Heave [mm]
    Heave,
    /// Trim [deg]
    Trim,
    /// Full scale speed [knots]
    FullScaleSpeed,
    Cts,
    /// Full scale total resistance [kN]
    Rts,
    /// Full scale effective power [kW]
    Pes,
}

impl Column {
    /// Number of value columns in front of the condition code
    pub const COUNT: usize = 27;

    /// All value columns in file order
    pub const ALL: [Column; Column::COUNT] = [
        Column::RunNo,
        Column::SampleFrequency,
        Column::SampleCount,
        Column::RecordTime,
        Column::ModelSpeed,
        Column::FwdLvdt,
        Column::AftLvdt,
        Column::Drag,
        Column::Rtm,
        Column::WaterTemperature,
        Column::KinematicViscosity,
        Column::WaterDensity,
        Column::ModelLength,
        Column::WettedSurface,
        Column::FroudeNumber,
        Column::ReynoldsNumber,
        Column::Ctm,
        Column::CfmIttc57,
        Column::CfmGrigson,
        Column::CrmIttc57,
        Column::CrmGrigson,
        Column::Heave,
        Column::Trim,
        Column::FullScaleSpeed,
        Column::Cts,
        Column::Rts,
        Column::Pes,
    ];

    /// Position of the column in a row
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Axis and legend label, including the display scale and unit
    pub fn label(&self) -> &'static str {
        match self {
            Column::RunNo => "Run number",
            Column::SampleFrequency => "Sampling frequency [Hz]",
            Column::SampleCount => "Number of samples",
            Column::RecordTime => "Record time [s]",
            Column::ModelSpeed => "Model speed [m/s]",
            Column::FwdLvdt => "Fwd LVDT [mm]",
            Column::AftLvdt => "Aft LVDT [mm]",
            Column::Drag => "Drag [g]",
            Column::Rtm => "Rtm [N]",
            Column::WaterTemperature => "Water temperature [°C]",
            Column::KinematicViscosity => "Kinematic viscosity [m²/s]",
            Column::WaterDensity => "Water density [kg/m³]",
            Column::ModelLength => "Model LWL [m]",
            Column::WettedSurface => "Model wetted surface [m²]",
            Column::FroudeNumber => "Froude number, Fr [-]",
            Column::ReynoldsNumber => "Reynolds number, Re [-]",
            Column::Ctm => "Ctm×10³ [-]",
            Column::CfmIttc57 => "Cfm ITTC'57×10³ [-]",
            Column::CfmGrigson => "Cfm Grigson×10³ [-]",
            Column::CrmIttc57 => "Crm ITTC'57×10³ [-]",
            Column::CrmGrigson => "Crm Grigson×10³ [-]",
            Column::Heave => "Heave [mm]",
            Column::Trim => "Trim [deg]",
            Column::FullScaleSpeed => "Full scale speed, Vs [knots]",
            Column::Cts => "Cts×10³ [-]",
            Column::Rts => "Rts [kN]",
            Column::Pes => "PEs [kW]",
        }
    }

    /// Factor applied before plotting so coefficients read as small integers
    pub fn display_factor(&self) -> f64 {
        match self {
            Column::Ctm | Column::CfmIttc57 | Column::CfmGrigson | Column::CrmIttc57 | Column::CrmGrigson | Column::Cts => 1000.0,
            _ => 1.0,
        }
    }

    /// Snake case name used for csv headers
    pub fn key(&self) -> &'static str {
        match self {
            Column::RunNo => "run_no",
            Column::SampleFrequency => "sample_frequency_hz",
            Column::SampleCount => "sample_count",
            Column::RecordTime => "record_time_s",
            Column::ModelSpeed => "model_speed_m_s",
            Column::FwdLvdt => "fwd_lvdt_mm",
            Column::AftLvdt => "aft_lvdt_mm",
            Column::Drag => "drag_g",
            Column::Rtm => "rtm_n",
            Column::WaterTemperature => "water_temperature_c",
            Column::KinematicViscosity => "kinematic_viscosity_m2_s",
            Column::WaterDensity => "water_density_kg_m3",
            Column::ModelLength => "model_lwl_m",
            Column::WettedSurface => "model_wetted_surface_m2",
            Column::FroudeNumber => "froude_number",
            Column::ReynoldsNumber => "reynolds_number",
            Column::Ctm => "ctm",
            Column::CfmIttc57 => "cfm_ittc57",
            Column::CfmGrigson => "cfm_grigson",
            Column::CrmIttc57 => "crm_ittc57",
            Column::CrmGrigson => "crm_grigson",
            Column::Heave => "heave_mm",
            Column::Trim => "trim_deg",
            Column::FullScaleSpeed => "full_scale_speed_knots",
            Column::Cts => "cts",
            Column::Rts => "rts_kn",
            Column::Pes => "pes_kw",
        }
    }
}

/// One towing tank run
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    values: [f64; Column::COUNT],
    /// Condition code, 1..=13 for the conditions of the campaign
    pub condition: u8,
}

impl RunRecord {
    /// Creates a run record from the value columns and a condition code
    pub fn new(values: [f64; Column::COUNT], condition: u8) -> RunRecord {
        RunRecord { values, condition }
    }

    /// Builds a run record from a full row of parsed numbers, the last number being the condition code
    pub fn from_row(row: &[f64]) -> Result<RunRecord, String> {
        // Value columns plus the trailing condition code
        if row.len() < Column::COUNT + 1 {
            return Err(format!("expected at least {} fields, found {}", Column::COUNT + 1, row.len()));
        }

        // Get condition code from the last field
        let code = row[row.len() - 1];
        if !code.is_finite() || code < 0.0 || code > u8::MAX as f64 || code.fract().abs() > 1e-6 {
            return Err(format!("invalid condition code {}", code));
        }

        let mut values = [0.0; Column::COUNT];
        values.copy_from_slice(&row[..Column::COUNT]);
        return Ok(RunRecord::new(values, code.round() as u8));
    }

    /// Value of a column
    pub fn get(&self, column: Column) -> f64 {
        self.values[column.index()]
    }

    /// Value of a column multiplied by its display factor
    pub fn display(&self, column: Column) -> f64 {
        self.get(column) * column.display_factor()
    }

    /// Sets the value of a column
    pub fn set(&mut self, column: Column, value: f64) {
        self.values[column.index()] = value;
    }

    /// All value columns in file order
    pub fn values(&self) -> &[f64; Column::COUNT] {
        &self.values
    }

    pub fn froude_number(&self) -> f64 {
        self.get(Column::FroudeNumber)
    }

    /// Drag converted from grams to newtons
    pub fn drag_newtons(&self) -> f64 {
        self.get(Column::Drag) * GRAMS_TO_NEWTONS
    }

    /// True if every value column and the condition code are zero (padding rows of the table)
    pub fn is_zero(&self) -> bool {
        self.condition == 0 && self.values.iter().all(|v| *v == 0.0)
    }

    /// Recomputes derived columns that are missing (zero) in the table from the measured channels.
    /// Values present in the file are never overwritten.
    pub fn fill_derived(&mut self) {
        let speed = Velocity::new::<velocity::meter_per_second>(self.get(Column::ModelSpeed));
        let lwl = Length::new::<length::meter>(self.get(Column::ModelLength));
        let temperature = ThermodynamicTemperature::new::<thermodynamic_temperature::degree_celsius>(self.get(Column::WaterTemperature));

        // Nothing can be derived without speed and length
        if self.get(Column::ModelSpeed) <= 0.0 || self.get(Column::ModelLength) <= 0.0 {
            return;
        }

        if self.get(Column::Rtm) == 0.0 && self.get(Column::Drag) != 0.0 {
            self.set(Column::Rtm, self.drag_newtons());
        }
        if self.get(Column::KinematicViscosity) == 0.0 && self.get(Column::WaterTemperature) != 0.0 {
            let nu = hydro::fresh_water_viscosity(temperature);
            self.set(Column::KinematicViscosity, nu.get::<diffusion_coefficient::square_meter_per_second>());
        }
        if self.get(Column::WaterDensity) == 0.0 && self.get(Column::WaterTemperature) != 0.0 {
            self.set(Column::WaterDensity, hydro::fresh_water_density(temperature));
        }
        if self.get(Column::FroudeNumber) == 0.0 {
            self.set(Column::FroudeNumber, hydro::froude_number(speed, lwl));
        }
        if self.get(Column::ReynoldsNumber) == 0.0 && self.get(Column::KinematicViscosity) > 0.0 {
            let nu = DiffusionCoefficient::new::<diffusion_coefficient::square_meter_per_second>(self.get(Column::KinematicViscosity));
            self.set(Column::ReynoldsNumber, hydro::reynolds_number(speed, lwl, nu));
        }

        // Friction coefficients from the Reynolds number
        let re = self.get(Column::ReynoldsNumber);
        for line in FrictionLine::ALL {
            if self.get(line.cfm_column()) == 0.0 {
                if let Some(cf) = line.coefficient(re) {
                    self.set(line.cfm_column(), cf);
                }
            }
        }

        // Ctm = Rtm / (0.5 rho S V^2)
        let rho = self.get(Column::WaterDensity);
        let wetted_surface = self.get(Column::WettedSurface);
        let v = self.get(Column::ModelSpeed);
        if self.get(Column::Ctm) == 0.0 && rho > 0.0 && wetted_surface > 0.0 {
            self.set(Column::Ctm, self.get(Column::Rtm) / (0.5 * rho * wetted_surface * v * v));
        }

        // Residual resistance is what is left when friction is removed
        if self.get(Column::Ctm) != 0.0 {
            for line in FrictionLine::ALL {
                let cfm = self.get(line.cfm_column());
                if self.get(line.crm_column()) == 0.0 && cfm != 0.0 {
                    self.set(line.crm_column(), self.get(Column::Ctm) - cfm);
                }
            }
        }

        if self.get(Column::Heave) == 0.0 && (self.get(Column::FwdLvdt) != 0.0 || self.get(Column::AftLvdt) != 0.0) {
            self.set(Column::Heave, (self.get(Column::FwdLvdt) + self.get(Column::AftLvdt)) / 2.0);
        }
    }
}

/// The loaded run table, zero rows already removed
#[derive(Debug, Clone)]
pub struct RunTable {
    /// Where the table was loaded from
    pub source: PathBuf,
    /// Usable run records in file order
    pub records: Vec<RunRecord>,
    /// Number of all-zero padding rows that were dropped
    pub zero_rows_dropped: usize,
    /// Number of rows skipped because they could not be parsed
    pub rows_skipped: usize,
}


// Functions
//----------------------------------------------------
/// Loads the run table from a comma separated file.
/// Rows that cannot be parsed are skipped with a warning, all-zero rows are dropped
/// and missing derived columns are filled in.
pub fn load_run_table(file_path: &Path) -> Result<RunTable, AnalysisError> {
    // Check that the file exists before handing it to the csv reader
    if !file_path.exists() {
        return Err(AnalysisError::MissingInput(file_path.to_path_buf()));
    }

    // Read the CSV file
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(file_path)?;

    let mut records: Vec<RunRecord> = Vec::new();
    let mut rows_skipped: usize = 0;

    // Iterate through each line of the CSV file and parse it into a run record
    for (i, result) in csv_reader.records().enumerate() {
        let row_number = i + 1;
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!("Skipping row {}: {}", row_number, err);
                rows_skipped += 1;
                continue;
            }
        };

        // Skip blank lines
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }

        match parse_row(row_number, &row) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!("Skipping {}", err);
                rows_skipped += 1;
            }
        }
    }

    // Drop padding rows
    let total = records.len();
    let mut records = filter_zero_rows(records);
    let zero_rows_dropped = total - records.len();
    if zero_rows_dropped > 0 {
        tracing::debug!("Dropped {} all-zero rows", zero_rows_dropped);
    }

    if records.is_empty() {
        return Err(AnalysisError::EmptyTable(file_path.to_path_buf()));
    }

    for record in records.iter_mut() {
        record.fill_derived();
    }

    tracing::info!("Loaded {} runs from {}", records.len(), file_path.display());
    return Ok(RunTable {
        source: file_path.to_path_buf(),
        records,
        zero_rows_dropped,
        rows_skipped,
    });
}

/// Removes the rows that are entirely zero
pub fn filter_zero_rows(records: Vec<RunRecord>) -> Vec<RunRecord> {
    records.into_iter().filter(|record| !record.is_zero()).collect()
}

/// Parses every field of a csv row as f64 and turns it into a run record
fn parse_row(row_number: usize, row: &csv::StringRecord) -> Result<RunRecord, AnalysisError> {
    let mut numbers: Vec<f64> = Vec::with_capacity(row.len());
    for (col, field) in row.iter().enumerate() {
        let value = field.parse::<f64>().map_err(|_| AnalysisError::InvalidRow {
            row: row_number,
            message: format!("field {} is not a number: {:?}", col + 1, field),
        })?;
        // "NaN" and "inf" parse as f64 but are no measurements
        if !value.is_finite() {
            return Err(AnalysisError::InvalidRow {
                row: row_number,
                message: format!("field {} is not finite: {:?}", col + 1, field),
            });
        }
        numbers.push(value);
    }

    // Padding rows may be shorter than the layout, keep them so they are counted as zero rows
    if numbers.iter().all(|v| *v == 0.0) {
        return Ok(RunRecord::new([0.0; Column::COUNT], 0));
    }

    RunRecord::from_row(&numbers).map_err(|message| AnalysisError::InvalidRow { row: row_number, message })
}


// Set up tests here
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::assert_close;

    /// Builds a run record with the columns the analysis uses
    pub(crate) fn run(condition: u8, froude: f64, speed: f64, drag: f64) -> RunRecord {
        let mut values = [0.0; Column::COUNT];
        values[Column::RunNo.index()] = 1.0;
        values[Column::ModelSpeed.index()] = speed;
        values[Column::FwdLvdt.index()] = -1.0;
        values[Column::AftLvdt.index()] = -2.0;
        values[Column::Drag.index()] = drag;
        values[Column::FroudeNumber.index()] = froude;
        values[Column::Ctm.index()] = 0.004;
        values[Column::CfmIttc57.index()] = 0.003;
        values[Column::CfmGrigson.index()] = 0.0028;
        RunRecord::new(values, condition)
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("towing_tank_records_{}_{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(DEFAULT_INPUT_FILE);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn row(condition: u8, froude: f64) -> String {
        let mut fields = vec!["1.0"; Column::COUNT].iter().map(|s| s.to_string()).collect::<Vec<String>>();
        fields[Column::FroudeNumber.index()] = format!("{:e}", froude);
        fields.push(format!("{:e}", condition as f64));
        fields.join(",")
    }

    #[test]
    fn from_row_reads_condition_from_last_field() {
        let mut row = vec![0.5; 40];
        row[39] = 7.0;
        let record = RunRecord::from_row(&row).unwrap();
        assert_eq!(record.condition, 7);
        assert_eq!(record.get(Column::Pes), 0.5);
    }

    #[test]
    fn from_row_rejects_short_rows_and_bad_codes() {
        assert!(RunRecord::from_row(&[1.0; 10]).is_err());
        let mut row = vec![1.0; 28];
        row[27] = 2.5;
        assert!(RunRecord::from_row(&row).is_err());
    }

    #[test]
    fn display_applies_factor() {
        let record = run(1, 0.2, 1.0, 100.0);
        assert_close!(record.display(Column::Ctm), 4.0, 1e-12);
        assert_close!(record.display(Column::Drag), 100.0, 1e-12);
    }

    #[test]
    fn zero_rows_are_filtered() {
        let records = vec![run(1, 0.2, 1.0, 10.0), RunRecord::new([0.0; Column::COUNT], 0), run(2, 0.3, 1.2, 12.0)];
        let filtered = filter_zero_rows(records);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| !r.is_zero()));
    }

    #[test]
    fn fill_derived_computes_missing_columns() {
        let mut values = [0.0; Column::COUNT];
        values[Column::ModelSpeed.index()] = 2.0;
        values[Column::ModelLength.index()] = 4.0;
        values[Column::WaterTemperature.index()] = 12.0;
        values[Column::WettedSurface.index()] = 1.0;
        values[Column::Drag.index()] = 1000.0;
        let mut record = RunRecord::new(values, 1);
        record.fill_derived();

        assert_close!(record.get(Column::Rtm), hydro::GRAVITY, 1e-9);
        assert_close!(record.get(Column::KinematicViscosity), 1.235e-6, 1e-12);
        assert_close!(record.froude_number(), 2.0 / (hydro::GRAVITY * 4.0).sqrt(), 1e-12);
        assert_close!(record.get(Column::ReynoldsNumber), 8.0 / 1.235e-6, 1.0);
        let cfm = hydro::ittc57_friction_coefficient(record.get(Column::ReynoldsNumber)).unwrap();
        assert_close!(record.get(Column::CfmIttc57), cfm, 1e-15);
        assert!(record.get(Column::Ctm) > 0.0);
        assert_close!(record.get(Column::CrmIttc57), record.get(Column::Ctm) - cfm, 1e-15);
        assert_close!(record.get(Column::Heave), 0.0, 1e-15);
    }

    #[test]
    fn fill_derived_keeps_file_values() {
        let mut record = run(1, 0.25, 2.0, 100.0);
        record.set(Column::ModelLength, 4.0);
        record.fill_derived();
        assert_eq!(record.froude_number(), 0.25);
        assert_eq!(record.get(Column::Ctm), 0.004);
    }

    #[test]
    fn load_run_table_skips_zero_and_bad_rows() {
        let zero_row = vec!["0.0"; Column::COUNT + 1].join(",");
        let contents = format!("# run table\n{}\n{}\nnot,a,row\n{}\n", row(1, 0.2), zero_row, row(2, 0.3));
        let path = temp_file("load", &contents);

        let table = load_run_table(&path).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.zero_rows_dropped, 1);
        assert_eq!(table.rows_skipped, 1);
        assert_eq!(table.records[1].condition, 2);
        assert_close!(table.records[0].froude_number(), 0.2, 1e-12);
    }

    #[test]
    fn load_run_table_skips_non_finite_rows() {
        let mut nan_row: Vec<String> = row(3, 0.25).split(',').map(|s| s.to_string()).collect();
        nan_row[Column::Drag.index()] = "NaN".to_string();
        let mut inf_row: Vec<String> = row(3, 0.25).split(',').map(|s| s.to_string()).collect();
        inf_row[Column::ModelSpeed.index()] = "inf".to_string();
        let contents = format!("{}\n{}\n{}\n", row(3, 0.2), nan_row.join(","), inf_row.join(","));
        let path = temp_file("non_finite", &contents);

        let table = load_run_table(&path).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.rows_skipped, 2);
        assert!(table.records[0].values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn load_run_table_reports_missing_and_empty_tables() {
        let missing = std::env::temp_dir().join("towing_tank_does_not_exist.dat");
        assert!(matches!(load_run_table(&missing), Err(AnalysisError::MissingInput(_))));

        let path = temp_file("empty", &vec!["0"; Column::COUNT + 1].join(","));
        assert!(matches!(load_run_table(&path), Err(AnalysisError::EmptyTable(_))));
    }
}
