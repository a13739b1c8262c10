//! Writers for the cohort CSV and the JSON run report.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ed_model::AdmissionLink;
use ed_transform::{CohortOutput, CohortSummary, LinkReport, OutlierReport};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;
use tracing::info;

/// Write the feature matrix with a header row and no index.
///
/// Missing values are written as empty fields.
pub fn write_cohort_csv(path: &Path, frame: &mut DataFrame) -> Result<()> {
    create_parent_dir(path)?;
    let file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(BufWriter::new(file))
        .include_header(true)
        .with_separator(b',')
        .with_null_value(String::new())
        .finish(frame)
        .with_context(|| format!("write cohort csv {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "cohort written"
    );
    Ok(())
}

/// Counts from one run, serialized for `--summary-json`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub admission_link: AdmissionLink,
    /// `None` for a dry run.
    pub output: Option<PathBuf>,
    pub summary: &'a CohortSummary,
    pub link: &'a LinkReport,
    pub outliers: &'a OutlierReport,
    pub observation_excluded: usize,
}

impl<'a> RunReport<'a> {
    pub fn new(
        admission_link: AdmissionLink,
        output: Option<PathBuf>,
        cohort: &'a CohortOutput,
    ) -> Self {
        Self {
            admission_link,
            output,
            summary: &cohort.summary,
            link: &cohort.link,
            outliers: &cohort.outliers,
            observation_excluded: cohort.observation_excluded,
        }
    }
}

pub fn write_run_report(path: &Path, report: &RunReport<'_>) -> Result<()> {
    create_parent_dir(path)?;
    let file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("write run report {}", path.display()))?;
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}
