//! CLI argument definitions for the cohort builder.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ed_ingest::sources::{
    DEFAULT_ADMISSIONS_FILE, DEFAULT_BASE_DIR, DEFAULT_ED_FILE, DEFAULT_PATIENTS_FILE,
    DEFAULT_TRIAGE_FILE,
};
use ed_model::{AdmissionLink, VitalRange};

#[derive(Parser)]
#[command(
    name = "ed-cohort",
    version,
    about = "Build an ED triage admission-prediction cohort",
    long_about = "Link admissions, ED stays, triage and patient tables into one row per\n\
                  ED stay with visit history features and an admission label, then\n\
                  write the feature matrix as CSV."
)]
pub struct Cli {
    /// Base directory holding the source tables.
    #[arg(long = "data-dir", value_name = "DIR", default_value = DEFAULT_BASE_DIR)]
    pub data_dir: PathBuf,

    /// Admissions table, relative to the data directory.
    #[arg(long = "admissions-file", value_name = "PATH", default_value = DEFAULT_ADMISSIONS_FILE)]
    pub admissions_file: PathBuf,

    /// ED stays table, relative to the data directory.
    #[arg(long = "ed-file", value_name = "PATH", default_value = DEFAULT_ED_FILE)]
    pub ed_file: PathBuf,

    /// Triage table, relative to the data directory.
    #[arg(long = "triage-file", value_name = "PATH", default_value = DEFAULT_TRIAGE_FILE)]
    pub triage_file: PathBuf,

    /// Patients table, relative to the data directory.
    #[arg(long = "patients-file", value_name = "PATH", default_value = DEFAULT_PATIENTS_FILE)]
    pub patients_file: PathBuf,

    /// Output CSV path.
    #[arg(long = "output", short = 'o', value_name = "PATH", default_value = "final.csv")]
    pub output: PathBuf,

    /// How admission attributes attach to a stay.
    #[arg(long = "admission-link", value_enum, default_value = "first-listed")]
    pub admission_link: AdmissionLinkArg,

    /// Override a plausible vital-sign range, e.g. `heartrate=30:250`.
    ///
    /// May be given several times. Only listed vital-sign columns accept an override.
    #[arg(long = "vital-range", value_name = "NAME=MIN:MAX")]
    pub vital_ranges: Vec<VitalRange>,

    /// Write the run summary with link and outlier counts as JSON.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Run every stage and report without writing the cohort.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 1 when the cohort has no rows.
    #[arg(long = "fail-on-empty")]
    pub fail_on_empty: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AdmissionLinkArg {
    /// Join on subject; the earliest-listed admission wins.
    FirstListed,
    /// Take attributes from the admission matching the stay's `hadm_id`.
    StayAdmission,
}

impl From<AdmissionLinkArg> for AdmissionLink {
    fn from(arg: AdmissionLinkArg) -> Self {
        match arg {
            AdmissionLinkArg::FirstListed => AdmissionLink::FirstListed,
            AdmissionLinkArg::StayAdmission => AdmissionLink::StayAdmission,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
