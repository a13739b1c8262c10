//! Vital-sign outlier filtering.
//!
//! Values outside a column's inclusive range become null. Rows are never
//! dropped and columns outside the range table are never touched.

use std::collections::BTreeMap;

use ed_model::OutlierRanges;
use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::frame::require_columns;

/// Values nulled per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutlierReport {
    pub removed: BTreeMap<String, usize>,
}

impl OutlierReport {
    pub fn removed_in(&self, column: &str) -> usize {
        self.removed.get(column).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.removed.values().sum()
    }
}

/// Null every out-of-range value in the listed vital-sign columns.
///
/// Each listed column is coerced to `Float64`. Text that is not a number and
/// float NaN become null without being counted as out of range.
pub fn remove_outliers(df: &DataFrame, ranges: &OutlierRanges) -> Result<(DataFrame, OutlierReport)> {
    require_columns(df, "cohort", ranges.iter().map(|range| range.column.as_str()))?;

    let mut out = df.clone();
    let mut report = OutlierReport::default();
    for range in ranges.iter() {
        let column = df.column(&range.column)?.cast(&DataType::Float64)?;
        let mut removed = 0usize;
        let cleaned: Vec<Option<f64>> = column
            .f64()?
            .into_iter()
            .map(|value| match value {
                Some(v) if v.is_nan() => None,
                Some(v) if range.contains(v) => Some(v),
                Some(_) => {
                    removed += 1;
                    None
                }
                None => None,
            })
            .collect();
        out.with_column(Series::new(range.column.as_str().into(), cleaned))?;
        report.removed.insert(range.column.clone(), removed);
    }
    Ok((out, report))
}
