//! Tests for vital-sign outlier filtering.

mod common;

use ed_model::{OutlierRanges, VitalRange};
use ed_transform::{TransformError, remove_outliers};
use polars::prelude::*;
use proptest::prelude::*;

use common::{f64_column, i64_column, str_column};

fn vitals(heartrate: Vec<Option<f64>>) -> DataFrame {
    let n = heartrate.len();
    df!(
        "stay_id" => (0..n as i64).collect::<Vec<_>>(),
        "temperature" => vec![98.6f64; n],
        "heartrate" => heartrate,
        "resprate" => vec![16.0f64; n],
        "o2sat" => vec![98.0f64; n],
        "sbp" => vec![120.0f64; n],
        "dbp" => vec![80.0f64; n],
        "pain" => vec![3.0f64; n],
        "acuity" => vec![2.0f64; n],
        "gender" => vec!["F"; n],
    )
    .unwrap()
}

#[test]
fn out_of_range_becomes_missing_and_boundary_is_kept() {
    let df = vitals(vec![Some(400.0), Some(300.0), Some(30.0), Some(29.0), None]);
    let (cleaned, report) = remove_outliers(&df, &OutlierRanges::default()).unwrap();

    assert_eq!(
        f64_column(&cleaned, "heartrate"),
        vec![None, Some(300.0), Some(30.0), None, None]
    );
    assert_eq!(cleaned.height(), 5);
    assert_eq!(report.removed_in("heartrate"), 2);
    assert_eq!(report.removed_in("temperature"), 0);
    assert_eq!(report.total(), 2);
}

#[test]
fn columns_outside_the_table_are_untouched() {
    let df = vitals(vec![Some(500.0)]);
    let (cleaned, _) = remove_outliers(&df, &OutlierRanges::default()).unwrap();
    assert_eq!(str_column(&cleaned, "gender"), str_column(&df, "gender"));
    assert_eq!(i64_column(&cleaned, "stay_id"), i64_column(&df, "stay_id"));
    assert_eq!(cleaned.get_column_names(), df.get_column_names());
}

#[test]
fn non_numeric_pain_is_marked_missing() {
    let mut df = vitals(vec![Some(80.0), Some(80.0), Some(80.0)]);
    df.with_column(Series::new("pain".into(), ["4", "unable", "30"]))
        .unwrap();

    let (cleaned, report) = remove_outliers(&df, &OutlierRanges::default()).unwrap();
    assert_eq!(f64_column(&cleaned, "pain"), vec![Some(4.0), None, None]);
    // only the numeric 30 counts as out of range
    assert_eq!(report.removed_in("pain"), 1);
}

#[test]
fn nan_is_treated_as_missing() {
    let df = vitals(vec![Some(f64::NAN), Some(75.0)]);
    let (cleaned, report) = remove_outliers(&df, &OutlierRanges::default()).unwrap();
    assert_eq!(f64_column(&cleaned, "heartrate"), vec![None, Some(75.0)]);
    assert_eq!(report.removed_in("heartrate"), 0);
}

#[test]
fn overridden_range_is_applied() {
    let ranges = OutlierRanges::default()
        .with_override(VitalRange::new("heartrate", 40.0, 200.0))
        .unwrap();
    let df = vitals(vec![Some(35.0), Some(250.0), Some(120.0)]);
    let (cleaned, _) = remove_outliers(&df, &ranges).unwrap();
    assert_eq!(f64_column(&cleaned, "heartrate"), vec![None, None, Some(120.0)]);
}

#[test]
fn missing_vital_column_is_a_schema_error() {
    let df = vitals(vec![Some(80.0)]).drop("acuity").unwrap();
    let err = remove_outliers(&df, &OutlierRanges::default()).unwrap_err();
    assert!(matches!(err, TransformError::MissingColumns { columns, .. } if columns == vec!["acuity".to_string()]));
}

proptest! {
    #[test]
    fn filtering_twice_equals_filtering_once(
        heartrate in prop::collection::vec(prop::option::of(-50.0f64..600.0), 1..50)
    ) {
        let ranges = OutlierRanges::default();
        let (once, _) = remove_outliers(&vitals(heartrate), &ranges).unwrap();
        let (twice, second) = remove_outliers(&once, &ranges).unwrap();
        prop_assert!(once.equals_missing(&twice));
        prop_assert_eq!(second.total(), 0);
    }
}
