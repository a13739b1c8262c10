//! Per-visit derived features.
//!
//! `age_at_visit` is row-local. `prev_visit` and `prev_adm` are folded over
//! each subject's visits in table order, which the linker guarantees is
//! `intime` ascending. Results are reattached by `stay_id`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDateTime};
use ed_model::columns::{
    AGE_AT_VISIT, ANCHOR_AGE, ANCHOR_YEAR, HADM_ID, PREV_ADM, PREV_VISIT, STAY_ID, SUBJECT_ID,
};
use polars::prelude::*;

use crate::datetime::{intime_values, nulls_last};
use crate::error::{Result, TransformError};
use crate::frame::{integer_values, present_mask, required_keys, with_new_column};

/// Historical counts for one visit, excluding the visit itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitHistory {
    pub prev_visit: i64,
    pub prev_adm: i64,
}

/// Fold one subject's ordered visits, given whether each led to admission.
pub fn fold_history(admitted: &[bool]) -> Vec<VisitHistory> {
    let mut history = Vec::with_capacity(admitted.len());
    let mut state = VisitHistory::default();
    for &was_admitted in admitted {
        history.push(state);
        state.prev_visit += 1;
        if was_admitted {
            state.prev_adm += 1;
        }
    }
    history
}

/// `anchor_age + year(intime) - anchor_year`; null when any input is missing.
pub fn add_age_at_visit(df: &DataFrame) -> Result<DataFrame> {
    let intimes = intime_values(df)?;
    let anchor_ages = integer_values(df, ANCHOR_AGE)?;
    let anchor_years = integer_values(df, ANCHOR_YEAR)?;

    let ages: Vec<Option<i64>> = intimes
        .iter()
        .zip(anchor_ages.iter().zip(anchor_years.iter()))
        .map(|(intime, (age, year))| {
            let visit_year = i64::from(intime.as_ref()?.year());
            Some((*age)? + visit_year - (*year)?)
        })
        .collect();

    with_new_column(df, Series::new(AGE_AT_VISIT.into(), ages))
}

/// Add `prev_visit` and `prev_adm`.
pub fn add_visit_history(df: &DataFrame) -> Result<DataFrame> {
    let subjects = required_keys(df, SUBJECT_ID)?;
    let stays = required_keys(df, STAY_ID)?;
    let admitted = present_mask(df, HADM_ID)?;
    let intimes = intime_values(df)?;

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, subject) in subjects.iter().enumerate() {
        groups.entry(*subject).or_default().push(idx);
    }

    let mut by_stay: HashMap<i64, VisitHistory> = HashMap::with_capacity(df.height());
    for (subject, rows) in &groups {
        ensure_ordered(*subject, rows, &intimes)?;
        let flags: Vec<bool> = rows.iter().map(|&idx| admitted[idx]).collect();
        for (&idx, history) in rows.iter().zip(fold_history(&flags)) {
            if by_stay.insert(stays[idx], history).is_some() {
                return Err(TransformError::DuplicateStay {
                    stay_id: stays[idx],
                });
            }
        }
    }

    let (prev_visit, prev_adm): (Vec<Option<i64>>, Vec<Option<i64>>) = stays
        .iter()
        .map(|stay| {
            let history = by_stay.get(stay);
            (
                history.map(|h| h.prev_visit),
                history.map(|h| h.prev_adm),
            )
        })
        .unzip();

    let out = with_new_column(df, Series::new(PREV_VISIT.into(), prev_visit))?;
    with_new_column(&out, Series::new(PREV_ADM.into(), prev_adm))
}

fn ensure_ordered(subject: i64, rows: &[usize], intimes: &[Option<NaiveDateTime>]) -> Result<()> {
    let ordered = rows
        .windows(2)
        .all(|pair| nulls_last(intimes[pair[0]], intimes[pair[1]]) != Ordering::Greater);
    if ordered {
        Ok(())
    } else {
        Err(TransformError::UnorderedVisits {
            subject_id: subject,
        })
    }
}
