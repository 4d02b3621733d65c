/// Experimental conditions of the resistance test campaign and the partitioning of runs by condition.
/// Author: G0rocks
/// Date: 2026-10-16

use crate::records::RunRecord;
use std::collections::BTreeMap;

// Constants
//----------------------------------------------------
/// Highest condition code used in the campaign
pub const CONDITION_COUNT: u8 = 13;


// Structs and enums
//----------------------------------------------------
/// What was varied in a condition
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConditionKind {
    /// Number of turbulence stimulator rows fitted (0 is bare hull)
    TurbulenceStimulator { rows: u8 },
    /// Trim tab angle in degrees, with the first and second row of turbulence stimulators fitted
    TrimTab { angle_deg: f64 },
    /// Displacement and static trim, with turbulence stimulators fitted
    Displacement { tonnes: f64, static_trim_deg: f64 },
    /// Displacement and static trim, turbulence stimulators removed
    WithoutStimulator { tonnes: f64, static_trim_deg: f64 },
}

/// One experimental configuration
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Condition {
    /// Code in the last column of the run table
    pub code: u8,
    /// Legend label
    pub label: &'static str,
    pub kind: ConditionKind,
}

/// All conditions of the campaign, indexed by code - 1
pub static CONDITIONS: [Condition; CONDITION_COUNT as usize] = [
    Condition { code: 1, label: "1 - Bare hull", kind: ConditionKind::TurbulenceStimulator { rows: 0 } },
    Condition { code: 2, label: "2 - 1st row", kind: ConditionKind::TurbulenceStimulator { rows: 1 } },
    Condition { code: 3, label: "3 - 1st and 2nd row", kind: ConditionKind::TurbulenceStimulator { rows: 2 } },
    Condition { code: 4, label: "4 - 1st and 2nd row, trim tab 5°", kind: ConditionKind::TrimTab { angle_deg: 5.0 } },
    Condition { code: 5, label: "5 - 1st and 2nd row, trim tab 0°", kind: ConditionKind::TrimTab { angle_deg: 0.0 } },
    Condition { code: 6, label: "6 - 1st and 2nd row, trim tab 10°", kind: ConditionKind::TrimTab { angle_deg: 10.0 } },
    Condition { code: 7, label: "7 - 1,500t, 0° static trim", kind: ConditionKind::Displacement { tonnes: 1500.0, static_trim_deg: 0.0 } },
    Condition { code: 8, label: "8 - 1,500t, -0.5° static trim", kind: ConditionKind::Displacement { tonnes: 1500.0, static_trim_deg: -0.5 } },
    Condition { code: 9, label: "9 - 1,500t, 0.5° static trim", kind: ConditionKind::Displacement { tonnes: 1500.0, static_trim_deg: 0.5 } },
    Condition { code: 10, label: "10 - 1,804t, 0° static trim", kind: ConditionKind::Displacement { tonnes: 1804.0, static_trim_deg: 0.0 } },
    Condition { code: 11, label: "11 - 1,804t, -0.5° static trim", kind: ConditionKind::Displacement { tonnes: 1804.0, static_trim_deg: -0.5 } },
    Condition { code: 12, label: "12 - 1,804t, 0.5° static trim", kind: ConditionKind::Displacement { tonnes: 1804.0, static_trim_deg: 0.5 } },
    Condition { code: 13, label: "13 - 1,500t, 0° static trim, no turbulence stimulators", kind: ConditionKind::WithoutStimulator { tonnes: 1500.0, static_trim_deg: 0.0 } },
];

impl Condition {
    /// Looks up a condition by code
    pub fn from_code(code: u8) -> Option<&'static Condition> {
        if code == 0 || code > CONDITION_COUNT {
            return None;
        }
        Some(&CONDITIONS[(code - 1) as usize])
    }

    pub fn is_turbulence_stimulator(&self) -> bool {
        matches!(self.kind, ConditionKind::TurbulenceStimulator { .. })
    }

    pub fn is_trim_tab(&self) -> bool {
        matches!(self.kind, ConditionKind::TrimTab { .. })
    }

    pub fn is_displacement(&self) -> bool {
        matches!(self.kind, ConditionKind::Displacement { .. })
    }

    /// Condition with the same displacement and static trim but the turbulence stimulators removed
    pub fn without_stimulator_counterpart(&self) -> Option<&'static Condition> {
        match self.kind {
            ConditionKind::Displacement { tonnes, static_trim_deg } => CONDITIONS.iter().find(|c| {
                c.kind == ConditionKind::WithoutStimulator { tonnes, static_trim_deg }
            }),
            _ => None,
        }
    }
}

/// Run records partitioned by condition code, input order kept inside each group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroups {
    groups: BTreeMap<u8, Vec<RunRecord>>,
}

impl ConditionGroups {
    /// Runs of a condition, empty if no run carries the code
    pub fn group(&self, code: u8) -> &[RunRecord] {
        match self.groups.get(&code) {
            Some(records) => records.as_slice(),
            None => &[],
        }
    }

    /// Codes with at least one run, ascending
    pub fn codes(&self) -> Vec<u8> {
        self.groups.keys().copied().collect()
    }

    /// Number of non-empty groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over (code, runs) of the non-empty groups, ascending by code
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[RunRecord])> {
        self.groups.iter().map(|(code, records)| (*code, records.as_slice()))
    }
}


// Functions
//----------------------------------------------------
/// Groups run records by their condition code.
/// Records with a code outside 1..=13 are left out with a warning.
pub fn partition_by_condition(records: &[RunRecord]) -> ConditionGroups {
    let mut groups: BTreeMap<u8, Vec<RunRecord>> = BTreeMap::new();
    let mut unknown: usize = 0;

    for record in records {
        if Condition::from_code(record.condition).is_none() {
            unknown += 1;
            continue;
        }
        groups.entry(record.condition).or_default().push(record.clone());
    }

    if unknown > 0 {
        tracing::warn!("{} runs carry a condition code outside 1..={} and were left out", unknown, CONDITION_COUNT);
    }
    for (code, group) in groups.iter() {
        tracing::debug!("Condition {}: {} runs", code, group.len());
    }

    ConditionGroups { groups }
}


// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::run;
    use crate::records::filter_zero_rows;
    use crate::records::{Column, RunRecord};

    fn sample() -> Vec<RunRecord> {
        vec![
            run(1, 0.20, 1.0, 10.0),
            run(2, 0.20, 1.0, 11.0),
            RunRecord::new([0.0; Column::COUNT], 0),
            run(1, 0.25, 1.2, 14.0),
            run(13, 0.30, 1.5, 20.0),
            run(14, 0.30, 1.5, 20.0),
        ]
    }

    #[test]
    fn catalogue_codes_match_positions() {
        for (i, condition) in CONDITIONS.iter().enumerate() {
            assert_eq!(condition.code as usize, i + 1);
        }
        assert!(Condition::from_code(0).is_none());
        assert!(Condition::from_code(14).is_none());
    }

    #[test]
    fn counterpart_of_level_1500t_is_condition_13() {
        let seven = Condition::from_code(7).unwrap();
        assert_eq!(seven.without_stimulator_counterpart().map(|c| c.code), Some(13));
        assert!(Condition::from_code(10).unwrap().without_stimulator_counterpart().is_none());
        assert!(Condition::from_code(1).unwrap().without_stimulator_counterpart().is_none());
    }

    #[test]
    fn partition_keeps_input_order_and_skips_empty_codes() {
        let groups = partition_by_condition(&filter_zero_rows(sample()));
        assert_eq!(groups.codes(), vec![1, 2, 13]);
        assert_eq!(groups.group(1).len(), 2);
        assert_eq!(groups.group(1)[0].froude_number(), 0.20);
        assert_eq!(groups.group(1)[1].froude_number(), 0.25);
        assert!(groups.group(5).is_empty());
    }

    #[test]
    fn partitions_are_disjoint_and_cover_the_filtered_input() {
        let filtered: Vec<RunRecord> = filter_zero_rows(sample())
            .into_iter()
            .filter(|r| Condition::from_code(r.condition).is_some())
            .collect();
        let groups = partition_by_condition(&filtered);

        let total: usize = groups.iter().map(|(_, g)| g.len()).sum();
        assert_eq!(total, filtered.len());
        for (code, group) in groups.iter() {
            assert!(group.iter().all(|r| r.condition == code));
            assert!(group.iter().all(|r| !r.is_zero()));
        }
    }

    #[test]
    fn partitioning_a_group_is_idempotent() {
        let groups = partition_by_condition(&sample());
        let again = partition_by_condition(groups.group(1));
        assert_eq!(again.codes(), vec![1]);
        assert_eq!(again.group(1), groups.group(1));
    }
}
