//! Options controlling a cohort build.

use serde::{Deserialize, Serialize};

use crate::columns::CohortColumns;
use crate::ranges::OutlierRanges;

/// How admission attributes are attached to an ED stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdmissionLink {
    /// Join admissions on `subject_id`, then keep one row per stay.
    ///
    /// A subject with several admissions fans out; the earliest-listed
    /// admission supplies `admission_type` and `admission_location`.
    #[default]
    FirstListed,
    /// Keep the same subjects as `FirstListed`. Subject-level attributes
    /// such as `ethnicity` still come from the earliest-listed admission;
    /// `admission_type` and `admission_location` come from the admission
    /// matching the stay's own `hadm_id` and are null for stays that did
    /// not lead to one.
    StayAdmission,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub admission_link: AdmissionLink,
    pub ranges: OutlierRanges,
    pub columns: CohortColumns,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admission_link(mut self, link: AdmissionLink) -> Self {
        self.admission_link = link;
        self
    }

    pub fn with_ranges(mut self, ranges: OutlierRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_columns(mut self, columns: CohortColumns) -> Self {
        self.columns = columns;
        self
    }
}
