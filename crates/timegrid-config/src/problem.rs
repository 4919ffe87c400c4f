//! Read-only lookup tables consumed by the constraint catalogue.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Lab batching constants and the full-group exemption list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchingPolicy {
    /// Seats per lab batch; groups larger than this must split into B1/B2.
    #[serde(default = "default_lab_batch_size")]
    pub lab_batch_size: u32,

    /// Nominal full-class strength used by loaders for theory rooms.
    #[serde(default = "default_class_strength")]
    pub class_strength: u32,

    /// Course codes whose labs may run unbatched for oversized groups.
    #[serde(default)]
    pub full_group_exempt: BTreeSet<String>,
}

fn default_lab_batch_size() -> u32 {
    35
}

fn default_class_strength() -> u32 {
    70
}

impl Default for BatchingPolicy {
    fn default() -> Self {
        BatchingPolicy {
            lab_batch_size: default_lab_batch_size(),
            class_strength: default_class_strength(),
            full_group_exempt: BTreeSet::new(),
        }
    }
}

impl BatchingPolicy {
    /// True when a lab for a group of this size must be split into batches
    /// (unless the course is exempt).
    pub fn must_batch(&self, group_size: u32) -> bool {
        group_size > self.lab_batch_size
    }

    pub fn is_exempt(&self, course_code: &str) -> bool {
        self.full_group_exempt.contains(course_code)
    }
}

/// Department → preferred block map for theory/tutorial sessions.
///
/// A department missing from the map has no preference and is never
/// penalized for block placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentBlocks {
    map: BTreeMap<String, String>,
}

impl DepartmentBlocks {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        DepartmentBlocks {
            map: map
                .into_iter()
                .map(|(d, b)| (d.to_uppercase(), b.to_uppercase()))
                .collect(),
        }
    }

    /// The campus-standard assignment: computing departments in block A,
    /// electronics/bio in block B, mechanical/civil in block C.
    pub fn campus_default() -> Self {
        let mut map = BTreeMap::new();
        for dept in ["CSE", "IT", "CSD", "CSBS", "AIDS"] {
            map.insert(dept.to_string(), "A".to_string());
        }
        for dept in ["AIML", "ECE", "EEE", "BT", "FT", "BM", "CH"] {
            map.insert(dept.to_string(), "B".to_string());
        }
        for dept in ["MECH", "CIVIL", "AERO", "AUTO", "R&A", "MT", "RO", "AE", "AT"] {
            map.insert(dept.to_string(), "C".to_string());
        }
        DepartmentBlocks { map }
    }

    pub fn preferred_block(&self, department: &str) -> Option<&str> {
        self.map.get(&department.to_uppercase()).map(String::as_str)
    }

    pub fn has_preference(&self, department: &str) -> bool {
        self.preferred_block(department).is_some()
    }
}

/// How department workday violations are scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkdaySeverity {
    #[default]
    Hard,
    Soft,
}

/// Department → allowed weekday set.
///
/// The campus runs two shifts of the week: some departments teach Monday
/// through Friday, the rest Tuesday through Saturday. Departments in
/// neither set may use all six days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DepartmentWorkdays {
    #[serde(default)]
    pub monday_friday: BTreeSet<String>,
    #[serde(default)]
    pub tuesday_saturday: BTreeSet<String>,
    #[serde(default)]
    pub severity: WorkdaySeverity,
}

impl Default for DepartmentWorkdays {
    fn default() -> Self {
        DepartmentWorkdays {
            monday_friday: ["AERO", "AUTO", "MECH", "MCT", "RA", "R&A", "CIVIL", "CHEM", "EEE", "ECE"]
                .into_iter()
                .map(String::from)
                .collect(),
            tuesday_saturday: ["BME", "BT", "FT", "AIDS", "CSBS", "CSE", "CSD", "AIML", "IT"]
                .into_iter()
                .map(String::from)
                .collect(),
            severity: WorkdaySeverity::Hard,
        }
    }
}

impl DepartmentWorkdays {
    pub fn is_allowed(&self, department: &str, day: Weekday) -> bool {
        let dept = department.trim().to_uppercase();
        if self.monday_friday.contains(&dept) {
            !matches!(day, Weekday::Sat | Weekday::Sun)
        } else if self.tuesday_saturday.contains(&dept) {
            !matches!(day, Weekday::Mon | Weekday::Sun)
        } else {
            day != Weekday::Sun
        }
    }

    /// Allowed days for a department, Monday-first.
    pub fn allowed_days(&self, department: &str) -> Vec<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .into_iter()
        .filter(|day| self.is_allowed(department, *day))
        .collect()
    }
}

/// Course → ordered priority-lab list.
///
/// Rank 1 is the most preferred room. A course absent from the mapping is
/// exempt from both priority constraints: any lab room is permitted at no
/// penalty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityLabs {
    map: BTreeMap<String, Vec<String>>,
}

impl PriorityLabs {
    pub fn new(map: BTreeMap<String, Vec<String>>) -> Self {
        PriorityLabs { map }
    }

    pub fn is_mapped(&self, course_code: &str) -> bool {
        self.map.contains_key(course_code)
    }

    pub fn labs_for(&self, course_code: &str) -> Option<&[String]> {
        self.map.get(course_code).map(Vec::as_slice)
    }

    /// 1-based rank of the room in the course's list, or `None` when the
    /// room is off-list or the course is unmapped.
    pub fn rank_of(&self, course_code: &str, room_name: &str) -> Option<usize> {
        self.map
            .get(course_code)?
            .iter()
            .position(|lab| lab == room_name)
            .map(|pos| pos + 1)
    }
}

/// All lookup tables the constraint catalogue reads, bundled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProblemConfig {
    #[serde(default)]
    pub batching: BatchingPolicy,
    #[serde(default)]
    pub blocks: DepartmentBlocks,
    #[serde(default)]
    pub workdays: DepartmentWorkdays,
    #[serde(default)]
    pub priority_labs: PriorityLabs,
}

impl ProblemConfig {
    /// Campus defaults: standard batching constants, the A/B/C block map
    /// and the two workday shifts; no priority-lab mapping.
    pub fn campus_default() -> Self {
        ProblemConfig {
            batching: BatchingPolicy::default(),
            blocks: DepartmentBlocks::campus_default(),
            workdays: DepartmentWorkdays::default(),
            priority_labs: PriorityLabs::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }
}
