//! Clinically plausible ranges for triage vital signs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns::{ACUITY, DBP, HEARTRATE, O2SAT, PAIN, RESPRATE, SBP, TEMPERATURE};
use crate::error::{ModelError, Result};

/// Inclusive bounds for one vital-sign column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRange {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl VitalRange {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }

    /// Both bounds are valid values.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl FromStr for VitalRange {
    type Err = ModelError;

    /// Parses `column=min:max`, e.g. `heartrate=30:300`.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = |reason: &str| ModelError::InvalidRange {
            text: text.to_string(),
            reason: reason.to_string(),
        };
        let (column, bounds) = text
            .split_once('=')
            .ok_or_else(|| invalid("expected NAME=MIN:MAX"))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(invalid("column name is empty"));
        }
        let (min, max) = bounds
            .split_once(':')
            .ok_or_else(|| invalid("expected MIN:MAX"))?;
        let min: f64 = min
            .trim()
            .parse()
            .map_err(|_| invalid("minimum is not a number"))?;
        let max: f64 = max
            .trim()
            .parse()
            .map_err(|_| invalid("maximum is not a number"))?;
        if min.is_nan() || max.is_nan() {
            return Err(invalid("bounds must not be NaN"));
        }
        if min > max {
            return Err(invalid("minimum exceeds maximum"));
        }
        Ok(Self::new(column, min, max))
    }
}

/// Ordered range table consumed by the outlier filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRanges {
    ranges: Vec<VitalRange>,
}

impl Default for OutlierRanges {
    fn default() -> Self {
        Self {
            ranges: vec![
                VitalRange::new(TEMPERATURE, 95.0, 105.0),
                VitalRange::new(HEARTRATE, 30.0, 300.0),
                VitalRange::new(RESPRATE, 2.0, 200.0),
                VitalRange::new(O2SAT, 50.0, 100.0),
                VitalRange::new(SBP, 30.0, 400.0),
                VitalRange::new(DBP, 30.0, 300.0),
                VitalRange::new(PAIN, 0.0, 20.0),
                VitalRange::new(ACUITY, 1.0, 5.0),
            ],
        }
    }
}

impl OutlierRanges {
    pub fn iter(&self) -> impl Iterator<Item = &VitalRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&VitalRange> {
        self.ranges.iter().find(|range| range.column == column)
    }

    /// Replace the bounds of an already listed column.
    ///
    /// Only the listed vital signs are ever filtered, so an override for any
    /// other column is rejected.
    pub fn with_override(mut self, range: VitalRange) -> Result<Self> {
        let Some(slot) = self
            .ranges
            .iter_mut()
            .find(|existing| existing.column == range.column)
        else {
            return Err(ModelError::UnknownVital {
                column: range.column,
            });
        };
        *slot = range;
        Ok(self)
    }
}
