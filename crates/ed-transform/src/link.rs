//! Record linkage of the four source tables into one row per ED stay.
//!
//! The linker:
//! 1. Validates every source schema before any join
//! 2. Inner-joins ED stays with triage on `stay_id`
//! 3. Attaches admission attributes per [`AdmissionLink`]
//! 4. Inner-joins patients on `subject_id`
//! 5. Orders rows by `intime` and keeps one row per `stay_id`
//!
//! Each source row carries its position in the source table through the
//! joins, so the row kept for a duplicated stay never depends on join
//! output order.
//!
//! ED stays are authoritative for `subject_id` and `hadm_id`. When a later
//! table repeats a column already present, the later copy is dropped.

use std::collections::HashSet;
use std::time::Instant;

use ed_ingest::SourceTables;
use ed_model::columns::{
    ADMISSION_LOCATION, ADMISSION_TYPE, ANCHOR_AGE, ANCHOR_YEAR, DOD, HADM_ID, STAY_ID, SUBJECT_ID,
};
use ed_model::{AdmissionLink, CohortColumns, TableKind};
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::datetime::{intime_values, nulls_last};
use crate::error::{Result, TransformError};
use crate::frame::{
    cast_integer_columns, drop_present, filter_rows, has_column, integer_values, require_columns,
    required_keys, with_new_column,
};

/// Source row positions, compared in this order when breaking ties.
const TRIAGE_ORDINAL: &str = "_triage_ordinal";
const ADMISSION_ORDINAL: &str = "_admission_ordinal";
const PATIENT_ORDINAL: &str = "_patient_ordinal";
const ORDINALS: [&str; 3] = [TRIAGE_ORDINAL, ADMISSION_ORDINAL, PATIENT_ORDINAL];

/// Admission columns describing one episode rather than the subject.
const EPISODE_COLUMNS: [&str; 3] = [HADM_ID, ADMISSION_TYPE, ADMISSION_LOCATION];

/// Row counts observed while linking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub ed_stays: usize,
    pub after_triage: usize,
    pub after_admissions: usize,
    pub after_patients: usize,
    pub duplicates_removed: usize,
    pub visits: usize,
}

impl LinkReport {
    /// The admission join multiplied rows.
    pub fn fanned_out(&self) -> bool {
        self.after_admissions > self.after_triage
    }
}

/// Linked visits ordered by `intime`, unique by `stay_id`.
#[derive(Debug, Clone)]
pub struct LinkedVisits {
    pub frame: DataFrame,
    pub report: LinkReport,
}

/// Check every source table before linking.
///
/// Each table must carry its own required columns, and every projected
/// column that is not derived must come from at least one table.
pub fn validate_sources(sources: &SourceTables, columns: &CohortColumns) -> Result<()> {
    for kind in TableKind::ALL {
        require_columns(
            sources.get(kind),
            kind.as_str(),
            kind.required_columns().iter().copied(),
        )?;
    }
    let unsourced: Vec<String> = columns
        .sourced_columns()
        .filter(|name| {
            !TableKind::ALL
                .iter()
                .any(|kind| has_column(sources.get(*kind), name))
        })
        .map(str::to_string)
        .collect();
    if unsourced.is_empty() {
        Ok(())
    } else {
        Err(TransformError::UnsourcedColumns { columns: unsourced })
    }
}

/// Join the source tables into one visit-indexed table.
pub fn link_visits(sources: &SourceTables, link: AdmissionLink) -> Result<LinkedVisits> {
    let span = info_span!("link", admission_link = ?link);
    let _guard = span.enter();
    let start = Instant::now();

    let ed_stays = cast_integer_columns(&sources.ed_stays, &[SUBJECT_ID, HADM_ID, STAY_ID])?;
    required_keys(&ed_stays, STAY_ID)?;
    let triage = with_ordinal(
        &cast_integer_columns(&drop_present(&sources.triage, &[SUBJECT_ID])?, &[STAY_ID])?,
        TRIAGE_ORDINAL,
    )?;
    let admissions = with_ordinal(
        &cast_integer_columns(&sources.admissions, &[SUBJECT_ID, HADM_ID])?,
        ADMISSION_ORDINAL,
    )?;
    let patients = with_ordinal(
        &cast_integer_columns(
            &drop_present(&sources.patients, &[DOD])?,
            &[SUBJECT_ID, ANCHOR_AGE, ANCHOR_YEAR],
        )?,
        PATIENT_ORDINAL,
    )?;

    let mut report = LinkReport {
        ed_stays: ed_stays.height(),
        ..LinkReport::default()
    };

    let visits = join_table(&ed_stays, &triage, STAY_ID, TableKind::Triage, JoinType::Inner)?;
    report.after_triage = visits.height();

    let visits = match link {
        AdmissionLink::FirstListed => join_table(
            &visits,
            &admissions.drop(HADM_ID)?,
            SUBJECT_ID,
            TableKind::Admissions,
            JoinType::Inner,
        )?,
        AdmissionLink::StayAdmission => {
            // subject-level attributes from the first-listed admission,
            // episode attributes from the stay's own admission
            let subjects =
                first_per_key(&drop_present(&admissions, &EPISODE_COLUMNS)?, SUBJECT_ID)?;
            let episodes = first_per_key(&admissions.select(EPISODE_COLUMNS)?, HADM_ID)?;

            let visits = join_table(
                &visits,
                &subjects,
                SUBJECT_ID,
                TableKind::Admissions,
                JoinType::Inner,
            )?;
            join_table(
                &visits,
                &episodes,
                HADM_ID,
                TableKind::Admissions,
                JoinType::Left,
            )?
        }
    };
    report.after_admissions = visits.height();

    let visits = join_table(
        &visits,
        &patients,
        SUBJECT_ID,
        TableKind::Patients,
        JoinType::Inner,
    )?;
    report.after_patients = visits.height();

    let (frame, duplicates_removed) = order_unique_stays(&visits)?;
    report.duplicates_removed = duplicates_removed;
    report.visits = frame.height();

    if report.duplicates_removed > 0 {
        warn!(
            after_triage = report.after_triage,
            after_admissions = report.after_admissions,
            admission_fan_out = report.fanned_out(),
            duplicates_removed = report.duplicates_removed,
            "duplicate stays removed after joins"
        );
    }
    info!(
        ed_stays = report.ed_stays,
        visits = report.visits,
        duration_ms = start.elapsed().as_millis(),
        "link complete"
    );

    Ok(LinkedVisits { frame, report })
}

fn with_ordinal(df: &DataFrame, name: &str) -> Result<DataFrame> {
    let ordinals: Vec<i64> = (0..df.height() as i64).collect();
    with_new_column(df, Series::new(name.into(), ordinals))
}

/// First row per non-null key, in table order.
fn first_per_key(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let mut seen = HashSet::with_capacity(df.height());
    let keep: Vec<bool> = integer_values(df, key)?
        .into_iter()
        .map(|value| value.is_some_and(|id| seen.insert(id)))
        .collect();
    filter_rows(df, &keep)
}

/// Join `right` onto `left`, dropping right-hand columns the left already has.
fn join_table(
    left: &DataFrame,
    right: &DataFrame,
    key: &str,
    right_table: TableKind,
    how: JoinType,
) -> Result<DataFrame> {
    let repeated: Vec<&str> = right
        .get_column_names_str()
        .into_iter()
        .filter(|name| *name != key && has_column(left, name))
        .collect();
    if !repeated.is_empty() {
        debug!(
            table = %right_table,
            columns = %repeated.join(","),
            "dropping repeated columns before join"
        );
    }
    let right = drop_present(right, &repeated)?;

    let joined = left
        .clone()
        .lazy()
        .join(right.lazy(), [col(key)], [col(key)], JoinArgs::new(how))
        .collect()?;

    debug!(
        table = %right_table,
        key,
        input_rows = left.height(),
        output_rows = joined.height(),
        "join complete"
    );
    if joined.height() == 0 {
        warn!(table = %right_table, key, input_rows = left.height(), "join produced no rows");
    }
    Ok(joined)
}

/// Stable order by (`intime`, `stay_id`, source ordinals), first row per stay kept.
fn order_unique_stays(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let stays = required_keys(df, STAY_ID)?;
    let intimes = intime_values(df)?;
    let ordinals = ORDINALS
        .iter()
        .map(|name| integer_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut order: Vec<usize> = (0..df.height()).collect();
    order.sort_by(|&a, &b| {
        ordinals.iter().fold(
            nulls_last(intimes[a], intimes[b]).then_with(|| stays[a].cmp(&stays[b])),
            |ordering, values| ordering.then_with(|| nulls_last(values[a], values[b])),
        )
    });

    let mut seen = HashSet::with_capacity(order.len());
    let keep: Vec<IdxSize> = order
        .into_iter()
        .filter(|&idx| seen.insert(stays[idx]))
        .map(|idx| idx as IdxSize)
        .collect();
    let removed = df.height() - keep.len();

    let indices = IdxCa::from_vec("order".into(), keep);
    let ordered = df.take(&indices)?;
    Ok((drop_present(&ordered, &ORDINALS)?, removed))
}
