//! Source table identities and the columns each one must provide.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::columns::{
    ACUITY, ADMISSION_LOCATION, ADMISSION_TYPE, ANCHOR_AGE, ANCHOR_YEAR, DBP, GENDER, HADM_ID,
    HEARTRATE, INTIME, O2SAT, PAIN, RESPRATE, SBP, STAY_ID, SUBJECT_ID, TEMPERATURE,
};

/// One of the four raw tables consumed by the linker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Admissions,
    EdStays,
    Triage,
    Patients,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Admissions,
        TableKind::EdStays,
        TableKind::Triage,
        TableKind::Patients,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Admissions => "admissions",
            TableKind::EdStays => "edstays",
            TableKind::Triage => "triage",
            TableKind::Patients => "patients",
        }
    }

    /// Columns that must be present before any join runs.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Admissions => &[SUBJECT_ID, HADM_ID, ADMISSION_TYPE, ADMISSION_LOCATION],
            TableKind::EdStays => &[SUBJECT_ID, HADM_ID, STAY_ID, INTIME],
            TableKind::Triage => &[
                STAY_ID,
                TEMPERATURE,
                HEARTRATE,
                RESPRATE,
                O2SAT,
                SBP,
                DBP,
                PAIN,
                ACUITY,
            ],
            TableKind::Patients => &[SUBJECT_ID, ANCHOR_AGE, ANCHOR_YEAR, GENDER],
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
