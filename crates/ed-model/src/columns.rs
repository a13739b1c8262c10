//! Column names shared across stages, and the cohort projection.

use serde::{Deserialize, Serialize};

pub const SUBJECT_ID: &str = "subject_id";
pub const HADM_ID: &str = "hadm_id";
pub const STAY_ID: &str = "stay_id";
pub const INTIME: &str = "intime";
pub const CHIEF_COMPLAINT: &str = "chiefcomplaint";
pub const ADMISSION_TYPE: &str = "admission_type";
pub const ADMISSION_LOCATION: &str = "admission_location";
pub const ETHNICITY: &str = "ethnicity";
pub const ANCHOR_AGE: &str = "anchor_age";
pub const ANCHOR_YEAR: &str = "anchor_year";
pub const GENDER: &str = "gender";
pub const DOD: &str = "dod";

pub const TEMPERATURE: &str = "temperature";
pub const HEARTRATE: &str = "heartrate";
pub const RESPRATE: &str = "resprate";
pub const O2SAT: &str = "o2sat";
pub const SBP: &str = "sbp";
pub const DBP: &str = "dbp";
pub const PAIN: &str = "pain";
pub const ACUITY: &str = "acuity";

pub const AGE_AT_VISIT: &str = "age_at_visit";
pub const PREV_VISIT: &str = "prev_visit";
pub const PREV_ADM: &str = "prev_adm";
pub const LABEL: &str = "y";

/// Marker matched against `admission_type` for observation-status stays.
pub const OBSERVATION_MARKER: &str = "OBSERVATION";

/// Which columns survive each pruning step of the cohort selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortColumns {
    /// Projection applied right after age derivation.
    pub retained: Vec<String>,
    /// Columns added after the projection, in output order.
    pub derived: Vec<String>,
    /// Linkage columns removed just before output.
    pub audit: Vec<String>,
    /// Substring of `admission_type` that excludes an admitted stay.
    pub observation_marker: String,
}

impl Default for CohortColumns {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|name| (*name).to_string()).collect();
        Self {
            retained: owned(&[
                SUBJECT_ID,
                HADM_ID,
                INTIME,
                ADMISSION_TYPE,
                ADMISSION_LOCATION,
                TEMPERATURE,
                HEARTRATE,
                RESPRATE,
                O2SAT,
                SBP,
                DBP,
                PAIN,
                ACUITY,
                ETHNICITY,
                CHIEF_COMPLAINT,
                GENDER,
                AGE_AT_VISIT,
            ]),
            derived: owned(&[PREV_VISIT, PREV_ADM, LABEL]),
            audit: owned(&[HADM_ID, SUBJECT_ID, INTIME, ADMISSION_LOCATION, ADMISSION_TYPE]),
            observation_marker: OBSERVATION_MARKER.to_string(),
        }
    }
}

impl CohortColumns {
    /// Final column order handed to the writer.
    pub fn output_columns(&self) -> Vec<String> {
        self.retained
            .iter()
            .chain(self.derived.iter())
            .filter(|name| !self.audit.contains(*name))
            .cloned()
            .collect()
    }

    /// Retained columns that must be sourced from an input table rather than derived.
    pub fn sourced_columns(&self) -> impl Iterator<Item = &str> {
        self.retained
            .iter()
            .map(String::as_str)
            .filter(|name| *name != AGE_AT_VISIT)
    }
}
