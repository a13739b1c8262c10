//! Cohort build pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Link**: validate sources, join, order by `intime`, one row per stay
//! 2. **Features**: `age_at_visit`, projection, `prev_visit` / `prev_adm`
//! 3. **Cohort**: label `y`, drop observation admissions
//! 4. **Outliers**: null implausible vital signs
//! 5. **Output**: summarize, then prune to the feature matrix
//!
//! Each stage consumes the previous stage's table and returns a new one.

use std::time::Instant;

use ed_ingest::SourceTables;
use ed_model::PipelineOptions;
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use crate::cohort::{
    CohortSummary, add_label, exclude_observation, output_frame, retain_columns, summarize,
};
use crate::error::Result;
use crate::features::{add_age_at_visit, add_visit_history};
use crate::link::{LinkReport, link_visits, validate_sources};
use crate::outliers::{OutlierReport, remove_outliers};

/// Everything a cohort build produces.
#[derive(Debug, Clone)]
pub struct CohortOutput {
    /// Feature matrix in writer order.
    pub frame: DataFrame,
    pub link: LinkReport,
    pub outliers: OutlierReport,
    /// Admitted stays dropped for observation status.
    pub observation_excluded: usize,
    pub summary: CohortSummary,
}

/// Run every stage over the loaded sources.
pub fn build_cohort(sources: &SourceTables, options: &PipelineOptions) -> Result<CohortOutput> {
    validate_sources(sources, &options.columns)?;
    let linked = link_visits(sources, options.admission_link)?;

    let visits = info_span!("features").in_scope(|| -> Result<DataFrame> {
        let start = Instant::now();
        let with_age = add_age_at_visit(&linked.frame)?;
        let retained = retain_columns(&with_age, &options.columns)?;
        let visits = add_visit_history(&retained)?;
        info!(
            rows = visits.height(),
            duration_ms = start.elapsed().as_millis(),
            "features complete"
        );
        Ok(visits)
    })?;

    let (cohort, observation_excluded) =
        info_span!("cohort").in_scope(|| -> Result<(DataFrame, usize)> {
            let start = Instant::now();
            let labelled = add_label(&visits)?;
            let (cohort, excluded) =
                exclude_observation(&labelled, &options.columns.observation_marker)?;
            info!(
                input_rows = labelled.height(),
                output_rows = cohort.height(),
                observation_excluded = excluded,
                duration_ms = start.elapsed().as_millis(),
                "cohort selection complete"
            );
            Ok((cohort, excluded))
        })?;

    let (cleaned, outliers) =
        info_span!("outliers").in_scope(|| -> Result<(DataFrame, OutlierReport)> {
            let start = Instant::now();
            let (cleaned, report) = remove_outliers(&cohort, &options.ranges)?;
            for (column, removed) in &report.removed {
                debug!(column = %column, removed, "outliers nulled");
            }
            info!(
                rows = cleaned.height(),
                values_nulled = report.total(),
                duration_ms = start.elapsed().as_millis(),
                "outlier filter complete"
            );
            Ok((cleaned, report))
        })?;

    let summary = summarize(&cleaned)?;
    if summary.is_empty {
        warn!(visits = linked.report.visits, "cohort is empty");
    }
    let frame = output_frame(&cleaned, &options.columns)?;
    info!(
        rows = frame.height(),
        columns = frame.width(),
        admitted = summary.admitted,
        case_rate = summary.case_rate,
        "cohort built"
    );

    Ok(CohortOutput {
        frame,
        link: linked.report,
        outliers,
        observation_excluded,
        summary,
    })
}
