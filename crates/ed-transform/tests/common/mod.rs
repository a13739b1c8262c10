//! Shared source tables for the transform integration tests.
#![allow(dead_code)]

use ed_ingest::SourceTables;
use polars::prelude::*;

/// Three linkable subjects plus one without admissions and one without a
/// patient record.
///
/// - subject 1: the reference scenario, stays 10/11/12 listed out of order
/// - subject 2: two admissions (fan-out), the first listed is observation
/// - subject 3: no admissions
/// - subject 4: no patient record
pub fn scenario_sources() -> SourceTables {
    let ed_stays = df!(
        "subject_id" => [1i64, 1, 1, 2, 2, 3, 4],
        "hadm_id" => [None, None, Some(500i64), Some(600), Some(601), None, Some(700)],
        "stay_id" => [12i64, 10, 11, 20, 21, 30, 40],
        "intime" => [
            "2181-02-01 09:00:00",
            "2180-01-01 10:00:00",
            "2180-06-01 08:30:00",
            "2180-03-01 12:00:00",
            "2180-04-01 12:00:00",
            "2180-05-01 00:00:00",
            "2180-05-02 00:00:00",
        ],
    )
    .unwrap();

    let triage = df!(
        "subject_id" => [1i64, 1, 1, 2, 2, 3, 4],
        "stay_id" => [10i64, 11, 12, 20, 21, 30, 40],
        "temperature" => [98.6f64, 99.1, 97.8, 98.0, 98.2, 98.4, 98.5],
        "heartrate" => [400.0f64, 300.0, 80.0, 90.0, 85.0, 70.0, 75.0],
        "resprate" => [16.0f64, 18.0, 14.0, 16.0, 16.0, 16.0, 16.0],
        "o2sat" => [98.0f64, 97.0, 99.0, 96.0, 95.0, 100.0, 98.0],
        "sbp" => [120.0f64, 130.0, 110.0, 140.0, 135.0, 125.0, 120.0],
        "dbp" => [80.0f64, 85.0, 70.0, 90.0, 88.0, 82.0, 80.0],
        "pain" => [3.0f64, 5.0, 25.0, 0.0, 2.0, 1.0, 4.0],
        "acuity" => [2.0f64, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0],
        "chiefcomplaint" => [
            "Chest pain",
            "Abd pain",
            "Headache",
            "Dyspnea",
            "Fever",
            "Rash",
            "Fall",
        ],
    )
    .unwrap();

    let admissions = df!(
        "subject_id" => [1i64, 2, 2, 4],
        "hadm_id" => [500i64, 600, 601, 700],
        "admission_type" => ["EW EMER.", "EU OBSERVATION", "URGENT", "URGENT"],
        "admission_location" => [
            "EMERGENCY ROOM",
            "EMERGENCY ROOM",
            "PHYSICIAN REFERRAL",
            "EMERGENCY ROOM",
        ],
        "ethnicity" => ["WHITE", "BLACK/AFRICAN AMERICAN", "BLACK/AFRICAN AMERICAN", "ASIAN"],
    )
    .unwrap();

    let patients = df!(
        "subject_id" => [1i64, 2, 3],
        "gender" => ["F", "M", "M"],
        "anchor_age" => [50i64, 30, 70],
        "anchor_year" => [2180i64, 2179, 2180],
        "dod" => [None::<&str>, None, None],
    )
    .unwrap();

    SourceTables {
        admissions,
        ed_stays,
        triage,
        patients,
    }
}

pub fn i64_column(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

pub fn f64_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

pub fn bool_column(df: &DataFrame, name: &str) -> Vec<Option<bool>> {
    df.column(name)
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect()
}

pub fn str_column(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}
