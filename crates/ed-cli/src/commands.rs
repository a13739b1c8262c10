use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use ed_ingest::{SourcePaths, load_sources};
use ed_model::{AdmissionLink, OutlierRanges, PipelineOptions, TableKind};
use ed_transform::{CohortOutput, build_cohort};
use tracing::{info, info_span};

use crate::cli::Cli;
use crate::output::{RunReport, write_cohort_csv, write_run_report};

/// Result of one invocation.
pub struct RunResult {
    pub cohort: CohortOutput,
    /// Where the cohort was written; `None` for a dry run.
    pub output: Option<PathBuf>,
}

impl RunResult {
    /// Process exit status; an empty cohort fails only when asked to.
    pub fn exit_code(&self, fail_on_empty: bool) -> i32 {
        if fail_on_empty && self.cohort.summary.is_empty {
            1
        } else {
            0
        }
    }
}

pub fn run(cli: &Cli) -> Result<RunResult> {
    let span = info_span!("run", dry_run = cli.dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    let paths = source_paths(cli);
    let options = pipeline_options(cli)?;

    let sources = load_sources(&paths).context("load source tables")?;
    let mut cohort = build_cohort(&sources, &options).context("build cohort")?;

    let output = if cli.dry_run {
        info!(path = %cli.output.display(), "dry run, cohort not written");
        None
    } else {
        write_cohort_csv(&cli.output, &mut cohort.frame)?;
        Some(cli.output.clone())
    };

    if let Some(path) = &cli.summary_json {
        let report = RunReport::new(options.admission_link, output.clone(), &cohort);
        write_run_report(path, &report)?;
        info!(path = %path.display(), "run report written");
    }

    info!(
        rows = cohort.summary.rows,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult { cohort, output })
}

pub fn source_paths(cli: &Cli) -> SourcePaths {
    SourcePaths::new(&cli.data_dir)
        .with_relative(TableKind::Admissions, &cli.admissions_file)
        .with_relative(TableKind::EdStays, &cli.ed_file)
        .with_relative(TableKind::Triage, &cli.triage_file)
        .with_relative(TableKind::Patients, &cli.patients_file)
}

/// Options for the build, with every `--vital-range` override applied.
pub fn pipeline_options(cli: &Cli) -> Result<PipelineOptions> {
    let mut ranges = OutlierRanges::default();
    for range in &cli.vital_ranges {
        ranges = ranges
            .with_override(range.clone())
            .with_context(|| format!("apply --vital-range for {}", range.column))?;
    }
    Ok(PipelineOptions::new()
        .with_admission_link(AdmissionLink::from(cli.admission_link))
        .with_ranges(ranges))
}
