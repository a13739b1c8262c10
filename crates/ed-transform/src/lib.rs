//! Cohort construction for ED triage visits.
//!
//! - **link**: joins the four source tables into one row per ED stay
//! - **features**: age at visit and per-subject visit history
//! - **outliers**: nulls implausible vital-sign values
//! - **cohort**: label, observation exclusion, projections and summary
//! - **pipeline**: runs every stage in order

pub mod cohort;
pub mod datetime;
pub mod error;
pub mod features;
pub mod frame;
pub mod link;
pub mod outliers;
pub mod pipeline;

pub use cohort::{
    CohortSummary, add_label, exclude_observation, output_frame, retain_columns, summarize,
};
pub use error::{Result, TransformError};
pub use features::{VisitHistory, add_age_at_visit, add_visit_history, fold_history};
pub use link::{LinkReport, LinkedVisits, link_visits, validate_sources};
pub use outliers::{OutlierReport, remove_outliers};
pub use pipeline::{CohortOutput, build_cohort};
