//! Label derivation, cohort exclusion and column projection.

use std::collections::BTreeSet;

use ed_model::CohortColumns;
use ed_model::columns::{ADMISSION_TYPE, HADM_ID, LABEL, STAY_ID, SUBJECT_ID};
use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::frame::{
    filter_rows, present_mask, require_columns, required_keys, string_values, with_new_column,
};

/// `y` is true when the stay led to an admission (`hadm_id` present).
pub fn add_label(df: &DataFrame) -> Result<DataFrame> {
    let admitted = present_mask(df, HADM_ID)?;
    with_new_column(df, Series::new(LABEL.into(), admitted))
}

/// Drop admitted stays whose `admission_type` contains `marker`.
///
/// Returns the remaining rows and how many were removed.
pub fn exclude_observation(df: &DataFrame, marker: &str) -> Result<(DataFrame, usize)> {
    let labels = df.column(LABEL)?.bool()?;
    let admission_types = string_values(df, ADMISSION_TYPE)?;

    let keep: Vec<bool> = labels
        .into_iter()
        .zip(admission_types.iter())
        .map(|(label, admission_type)| {
            let observed = admission_type
                .as_deref()
                .is_some_and(|value| value.contains(marker));
            !(label.unwrap_or(false) && observed)
        })
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    Ok((filter_rows(df, &keep)?, removed))
}

/// Project onto `stay_id` plus the retained columns.
pub fn retain_columns(df: &DataFrame, columns: &CohortColumns) -> Result<DataFrame> {
    let mut names: Vec<&str> = vec![STAY_ID];
    names.extend(
        columns
            .retained
            .iter()
            .map(String::as_str)
            .filter(|name| *name != STAY_ID),
    );
    select(df, &names)
}

/// Final feature matrix in writer order, linkage columns removed.
pub fn output_frame(df: &DataFrame, columns: &CohortColumns) -> Result<DataFrame> {
    let names = columns.output_columns();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    select(df, &names)
}

fn select(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    require_columns(df, "cohort", names.iter().copied())?;
    Ok(df.select(names.iter().copied())?)
}

/// Headline counts for a built cohort.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortSummary {
    pub rows: usize,
    pub admitted: usize,
    pub not_admitted: usize,
    pub patients_admitted: usize,
    pub patients_not_admitted: usize,
    /// Share of rows with `y == true`; 0 for an empty cohort.
    pub case_rate: f64,
    pub is_empty: bool,
}

/// Summarize a labelled cohort that still carries `subject_id`.
pub fn summarize(df: &DataFrame) -> Result<CohortSummary> {
    let subjects = required_keys(df, SUBJECT_ID)?;
    let labels = df.column(LABEL)?.bool()?;

    let mut admitted = 0usize;
    let mut patients_admitted = BTreeSet::new();
    let mut patients_not_admitted = BTreeSet::new();
    for (subject, label) in subjects.iter().zip(labels.into_iter()) {
        if label.unwrap_or(false) {
            admitted += 1;
            patients_admitted.insert(*subject);
        } else {
            patients_not_admitted.insert(*subject);
        }
    }

    let rows = df.height();
    Ok(CohortSummary {
        rows,
        admitted,
        not_admitted: rows - admitted,
        patients_admitted: patients_admitted.len(),
        patients_not_admitted: patients_not_admitted.len(),
        case_rate: if rows == 0 {
            0.0
        } else {
            admitted as f64 / rows as f64
        },
        is_empty: rows == 0,
    })
}
