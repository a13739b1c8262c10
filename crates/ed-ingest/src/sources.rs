//! Source file layout and the loaded table bundle.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ed_model::TableKind;
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::error::Result;
use crate::reader::read_table;

pub const DEFAULT_BASE_DIR: &str = "./data";
pub const DEFAULT_ADMISSIONS_FILE: &str = "core/admissions.csv.gz";
pub const DEFAULT_ED_FILE: &str = "ed/edstays.csv.gz";
pub const DEFAULT_TRIAGE_FILE: &str = "ed/triage.csv.gz";
pub const DEFAULT_PATIENTS_FILE: &str = "core/patients.csv.gz";

/// Where the four source tables live, relative to a base data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub base_dir: PathBuf,
    pub admissions: PathBuf,
    pub ed_stays: PathBuf,
    pub triage: PathBuf,
    pub patients: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            admissions: PathBuf::from(DEFAULT_ADMISSIONS_FILE),
            ed_stays: PathBuf::from(DEFAULT_ED_FILE),
            triage: PathBuf::from(DEFAULT_TRIAGE_FILE),
            patients: PathBuf::from(DEFAULT_PATIENTS_FILE),
        }
    }
}

impl SourcePaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_relative(mut self, kind: TableKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match kind {
            TableKind::Admissions => self.admissions = path,
            TableKind::EdStays => self.ed_stays = path,
            TableKind::Triage => self.triage = path,
            TableKind::Patients => self.patients = path,
        }
        self
    }

    pub fn relative(&self, kind: TableKind) -> &Path {
        match kind {
            TableKind::Admissions => &self.admissions,
            TableKind::EdStays => &self.ed_stays,
            TableKind::Triage => &self.triage,
            TableKind::Patients => &self.patients,
        }
    }

    /// Full path of a source table. An absolute table path ignores the base.
    pub fn resolve(&self, kind: TableKind) -> PathBuf {
        self.base_dir.join(self.relative(kind))
    }
}

/// The four raw tables, as loaded.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub admissions: DataFrame,
    pub ed_stays: DataFrame,
    pub triage: DataFrame,
    pub patients: DataFrame,
}

impl SourceTables {
    pub fn get(&self, kind: TableKind) -> &DataFrame {
        match kind {
            TableKind::Admissions => &self.admissions,
            TableKind::EdStays => &self.ed_stays,
            TableKind::Triage => &self.triage,
            TableKind::Patients => &self.patients,
        }
    }
}

/// Read every source table named by `paths`.
pub fn load_sources(paths: &SourcePaths) -> Result<SourceTables> {
    let span = info_span!("ingest", base_dir = %paths.base_dir.display());
    let _guard = span.enter();

    let load = |kind: TableKind| -> Result<DataFrame> {
        let path = paths.resolve(kind);
        let start = Instant::now();
        let df = read_table(&path)?;
        info!(
            table = %kind,
            source_file = %path.display(),
            rows = df.height(),
            columns = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "table loaded"
        );
        Ok(df)
    };

    Ok(SourceTables {
        admissions: load(TableKind::Admissions)?,
        ed_stays: load(TableKind::EdStays)?,
        triage: load(TableKind::Triage)?,
        patients: load(TableKind::Patients)?,
    })
}
